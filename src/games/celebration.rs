//! Level 14: terminal celebration
//!
//! Never completes. Schedules the confetti bursts, hands out one batch of
//! emoji rain and reveals a single random surprise.

use rand::Rng;
use rand_pcg::Pcg32;

use super::{Completion, MiniGame};
use crate::effects::{self, ConfettiBurst, FallingEmoji};

pub const SURPRISES: &[&str] = &[
    "You're a coding superstar! 🌟",
    "May your bugs be tiny and your features grand! 🐞✨",
    "You just leveled up in awesomeness! 🚀",
    "Keep shining bright, developer! 💡",
    "Secret: Try typing 'hari' anywhere on the homepage 😉",
];

#[derive(Debug, Clone)]
pub struct Celebration {
    elapsed_ms: u32,
    scheduled: Vec<ConfettiBurst>,
    due: Vec<ConfettiBurst>,
    rain: Option<Vec<FallingEmoji>>,
    surprise: Option<&'static str>,
}

impl Celebration {
    pub fn new(rng: &mut Pcg32) -> Self {
        Self {
            elapsed_ms: 0,
            scheduled: effects::celebration_bursts(),
            due: Vec::new(),
            rain: Some(effects::emoji_rain(rng)),
            surprise: None,
        }
    }

    pub fn surprise(&self) -> Option<&'static str> {
        self.surprise
    }

    /// Reveal a surprise. Only the first press picks one.
    pub fn reveal_surprise(&mut self, rng: &mut Pcg32) -> &'static str {
        *self
            .surprise
            .get_or_insert_with(|| SURPRISES[rng.random_range(0..SURPRISES.len())])
    }

    /// Bursts whose delay has passed since the last call
    pub fn drain_bursts(&mut self) -> Vec<ConfettiBurst> {
        std::mem::take(&mut self.due)
    }

    /// Emoji rain, handed out once
    pub fn take_emoji_rain(&mut self) -> Option<Vec<FallingEmoji>> {
        self.rain.take()
    }
}

impl MiniGame for Celebration {
    fn advance(&mut self, dt_ms: u32, _rng: &mut Pcg32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
        let now = self.elapsed_ms;
        let (due, later): (Vec<_>, Vec<_>) = self
            .scheduled
            .drain(..)
            .partition(|burst| burst.delay_ms <= now);
        self.scheduled = later;
        self.due.extend(due);
    }

    fn take_completion(&mut self) -> Option<Completion> {
        None
    }
}
