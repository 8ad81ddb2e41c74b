//! Visual effects as plain data
//!
//! Confetti, celebration bursts, emoji rain and the unlock curtain are
//! generated here from the seeded RNG and aged by `advance(dt_ms)`. The
//! view turns them into absolutely positioned elements; nothing here
//! touches the DOM.

use rand::Rng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Pieces per confetti shower
pub const CONFETTI_PIECES: usize = 80;
pub const CONFETTI_LIFETIME_MS: u32 = 2600;
/// Time a piece takes to fall off screen (slightly shorter than its life)
pub const CONFETTI_FALL_MS: u32 = 2500;

pub const EMOJI_RAIN: [&str; 7] = ["🎉", "🥳", "✨", "🎈", "🎊", "🚀", "🦄"];
pub const EMOJI_RAIN_COUNT: usize = 24;
/// Falling emoji start their transition shortly after spawning
pub const EMOJI_FALL_DELAY_MS: u32 = 60;
pub const EMOJI_FALL_MS: u32 = 2700;

/// Upper bound on live particles, keeps repeated clicks cheap
pub const MAX_PIECES: usize = 480;

/// One confetti particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfettiPiece {
    /// Horizontal position (vw)
    pub left_vw: f32,
    pub size_px: f32,
    pub hue: f32,
    /// Launch direction in degrees, 90 = straight up; `None` for a shower
    pub angle_deg: Option<f32>,
    pub age_ms: u32,
    pub ttl_ms: u32,
}

impl ConfettiPiece {
    /// 0.0 at spawn, 1.0 when it should be gone
    pub fn progress(&self) -> f32 {
        (self.age_ms as f32 / self.ttl_ms.max(1) as f32).min(1.0)
    }

    /// Vertical position (vh) for a shower piece falling from above
    pub fn top_vh(&self) -> f32 {
        let t = (self.age_ms as f32 / CONFETTI_FALL_MS as f32).min(1.0);
        -4.0 + t * 114.0
    }
}

/// A directed burst, as in the level 14 celebration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfettiBurst {
    pub angle_deg: f32,
    pub spread_deg: f32,
    pub particle_count: usize,
    /// Vertical origin as a fraction of the viewport
    pub origin_y: f32,
    pub delay_ms: u32,
}

/// The four celebration bursts, fanning out from 60°
pub fn celebration_bursts() -> Vec<ConfettiBurst> {
    (0..4)
        .map(|i| ConfettiBurst {
            angle_deg: 60.0 + 30.0 * i as f32,
            spread_deg: 70.0,
            particle_count: 60,
            origin_y: 0.4,
            delay_ms: 400 + 350 * i,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingEmoji {
    pub emoji: &'static str,
    pub left_vw: f32,
    pub size_em: f32,
    pub opacity: f32,
    /// Total fall distance (vh)
    pub fall_vh: f32,
    pub age_ms: u32,
    pub ttl_ms: u32,
}

impl FallingEmoji {
    /// Current offset from the top and opacity
    pub fn pose(&self) -> (f32, f32) {
        if self.age_ms < EMOJI_FALL_DELAY_MS {
            return (0.0, self.opacity);
        }
        let t = ((self.age_ms - EMOJI_FALL_DELAY_MS) as f32 / EMOJI_FALL_MS as f32).min(1.0);
        let opacity = self.opacity + (0.1 - self.opacity) * t;
        (self.fall_vh * t, opacity)
    }
}

/// 24 emoji falling from random positions
pub fn emoji_rain(rng: &mut Pcg32) -> Vec<FallingEmoji> {
    (0..EMOJI_RAIN_COUNT)
        .map(|_| FallingEmoji {
            emoji: EMOJI_RAIN.choose(rng).copied().unwrap_or("🎉"),
            left_vw: rng.random::<f32>() * 100.0,
            size_em: 1.5 + rng.random::<f32>() * 1.5,
            opacity: 0.7 + rng.random::<f32>() * 0.3,
            fall_vh: 80.0 + rng.random::<f32>() * 10.0,
            age_ms: 0,
            ttl_ms: 3000 + rng.random_range(0..600),
        })
        .collect()
}

/// Live particles on the overlay
#[derive(Debug, Clone, Default)]
pub struct EffectLayer {
    reduced_motion: bool,
    pieces: Vec<ConfettiPiece>,
    emoji: Vec<FallingEmoji>,
}

impl EffectLayer {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            ..Default::default()
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn pieces(&self) -> &[ConfettiPiece] {
        &self.pieces
    }

    pub fn emoji(&self) -> &[FallingEmoji] {
        &self.emoji
    }

    pub fn is_idle(&self) -> bool {
        self.pieces.is_empty() && self.emoji.is_empty()
    }

    fn push_piece(&mut self, piece: ConfettiPiece) {
        if self.pieces.len() < MAX_PIECES {
            self.pieces.push(piece);
        }
    }

    /// Full-width shower falling from the top
    pub fn shower(&mut self, rng: &mut Pcg32) {
        if self.reduced_motion {
            return;
        }
        for _ in 0..CONFETTI_PIECES {
            let piece = ConfettiPiece {
                left_vw: rng.random::<f32>() * 100.0,
                size_px: 4.0 + rng.random::<f32>() * 8.0,
                hue: rng.random::<f32>() * 360.0,
                angle_deg: None,
                age_ms: 0,
                ttl_ms: CONFETTI_LIFETIME_MS,
            };
            self.push_piece(piece);
        }
        log::debug!("Confetti shower, {} pieces live", self.pieces.len());
    }

    /// Directed burst; each piece gets an angle inside the spread
    pub fn burst(&mut self, burst: &ConfettiBurst, rng: &mut Pcg32) {
        if self.reduced_motion {
            return;
        }
        let half = burst.spread_deg / 2.0;
        for _ in 0..burst.particle_count {
            let piece = ConfettiPiece {
                left_vw: 50.0,
                size_px: 4.0 + rng.random::<f32>() * 8.0,
                hue: rng.random::<f32>() * 360.0,
                angle_deg: Some(burst.angle_deg - half + rng.random::<f32>() * burst.spread_deg),
                age_ms: 0,
                ttl_ms: CONFETTI_LIFETIME_MS,
            };
            self.push_piece(piece);
        }
    }

    pub fn add_emoji(&mut self, emoji: Vec<FallingEmoji>) {
        if !self.reduced_motion {
            self.emoji.extend(emoji);
        }
    }

    /// Age everything and drop what expired
    pub fn advance(&mut self, dt_ms: u32) {
        for piece in self.pieces.iter_mut() {
            piece.age_ms = piece.age_ms.saturating_add(dt_ms);
        }
        self.pieces.retain(|p| p.age_ms < p.ttl_ms);
        for emoji in self.emoji.iter_mut() {
            emoji.age_ms = emoji.age_ms.saturating_add(dt_ms);
        }
        self.emoji.retain(|e| e.age_ms < e.ttl_ms);
    }
}

/// Steps of the unlock animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionCue {
    Confetti,
    CurtainClose,
    /// Show the hidden section behind the curtain
    Reveal,
    CurtainOpen,
    ToastShow,
    ToastHide,
    Done,
}

pub const CURTAIN_CLOSE_MS: u32 = 600;
pub const CURTAIN_OPEN_MS: u32 = 600;
pub const TOAST_MS: u32 = 2500;

const FULL_TIMELINE: [(u32, TransitionCue); 7] = [
    (0, TransitionCue::Confetti),
    (0, TransitionCue::CurtainClose),
    (CURTAIN_CLOSE_MS, TransitionCue::Reveal),
    (CURTAIN_CLOSE_MS, TransitionCue::CurtainOpen),
    (CURTAIN_CLOSE_MS, TransitionCue::ToastShow),
    (CURTAIN_CLOSE_MS + TOAST_MS, TransitionCue::ToastHide),
    (CURTAIN_CLOSE_MS + TOAST_MS, TransitionCue::Done),
];

const REDUCED_TIMELINE: [(u32, TransitionCue); 4] = [
    (0, TransitionCue::Reveal),
    (0, TransitionCue::ToastShow),
    (TOAST_MS, TransitionCue::ToastHide),
    (TOAST_MS, TransitionCue::Done),
];

/// Confetti, curtain wipe and toast played before revealing the section
#[derive(Debug, Clone)]
pub struct UnlockTransition {
    timeline: &'static [(u32, TransitionCue)],
    elapsed_ms: u32,
    next: usize,
}

impl UnlockTransition {
    pub fn new(reduced_motion: bool) -> Self {
        let timeline: &'static [(u32, TransitionCue)] = if reduced_motion {
            &REDUCED_TIMELINE
        } else {
            &FULL_TIMELINE
        };
        Self {
            timeline,
            elapsed_ms: 0,
            next: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.next >= self.timeline.len()
    }

    /// Cues that became due, in order. Call with 0 to get the t=0 cues.
    pub fn advance(&mut self, dt_ms: u32) -> Vec<TransitionCue> {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let mut due = Vec::new();
        while let Some(&(at, cue)) = self.timeline.get(self.next) {
            if at > self.elapsed_ms {
                break;
            }
            due.push(cue);
            self.next += 1;
        }
        due
    }
}
