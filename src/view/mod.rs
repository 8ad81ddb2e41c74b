//! HTML projection of engine state
//!
//! Pure functions from plain data to markup. The wasm entry point decides
//! when to write them into the DOM.

pub mod games;
pub mod input;

pub use input::Action;

use std::fmt::Write;

use crate::effects::{ConfettiPiece, EffectLayer};
use crate::levels::LevelEngine;

/// Escape text for element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Markup for one level's game root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelView {
    /// Element the game renders into
    pub root_id: &'static str,
    /// Rebuilt when the engine generation changes
    pub shell: String,
    /// Content of the `[data-live]` slot
    pub live: String,
}

/// Current level's markup, if it has a running game
pub fn level_view(engine: &LevelEngine) -> Option<LevelView> {
    let game = engine.current_game()?;
    Some(LevelView {
        root_id: game.kind().root_id(),
        shell: games::shell(game),
        live: games::live(game),
    })
}

/// Timer and progress bar text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub timer: String,
    /// `Level n of 14` and bar width in percent
    pub progress: Option<(String, u32)>,
}

pub fn hud(engine: &LevelEngine) -> Hud {
    Hud {
        timer: engine.countdown().label(),
        progress: engine.progress().map(|p| (p.label(), p.percent)),
    }
}

/// Where a confetti piece is drawn, in viewport units
fn piece_position(piece: &ConfettiPiece) -> (f32, f32) {
    match piece.angle_deg {
        None => (piece.left_vw, piece.top_vh()),
        Some(angle) => {
            // Launched from 40% height, arcing under gravity
            let t = piece.age_ms as f32 / 1000.0;
            let rad = angle.to_radians();
            let x = piece.left_vw + rad.cos() * 45.0 * t;
            let y = 60.0 - (rad.sin() * 70.0 * t - 60.0 * t * t);
            (x, 100.0 - y)
        }
    }
}

/// Confetti and emoji overlay
pub fn effects_html(layer: &EffectLayer) -> String {
    let mut html = String::new();
    for piece in layer.pieces() {
        let fade = 0.7 * (1.0 - piece.progress() * 0.3);
        let (left, top) = piece_position(piece);
        let _ = write!(
            html,
            r#"<div class="confetti" style="left:{:.2}vw;top:{:.2}vh;width:{:.1}px;height:{:.1}px;background:hsl({:.0},90%,60%);opacity:{:.2}"></div>"#,
            left, top, piece.size_px, piece.size_px, piece.hue, fade
        );
    }
    for emoji in layer.emoji() {
        let (offset_vh, opacity) = emoji.pose();
        let _ = write!(
            html,
            r#"<div class="emoji-rain" style="left:{:.2}vw;font-size:{:.2}em;opacity:{:.2};transform:translateY({:.2}vh)">{}</div>"#,
            emoji.left_vw, emoji.size_em, opacity, offset_vh, emoji.emoji
        );
    }
    html
}

/// Developer level-skip panel
pub fn debug_panel_html(total: u32) -> String {
    format!(
        r#"<b>DEBUG: Skip to Level</b> <input id="dbg-lvl-skip" type="number" min="1" max="{}" style="width:3em;"> <button id="dbg-skip-btn">Go</button>"#,
        total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_hud_and_level_view() {
        let mut engine = LevelEngine::standard(&Settings::default(), 3);
        assert!(level_view(&engine).is_none());
        engine.begin().unwrap();
        let hud = hud(&engine);
        assert_eq!(hud.timer, "Time Left: 01:00");
        assert_eq!(hud.progress, Some(("Level 1 of 14".to_string(), 7)));
        let view = level_view(&engine).unwrap();
        assert_eq!(view.root_id, "confetti-counter");
        assert_eq!(view.live, "Clicks left to unlock: 5");
    }

    #[test]
    fn test_effects_overlay() {
        let mut layer = EffectLayer::new(false);
        assert!(effects_html(&layer).is_empty());
        layer.shower(&mut Pcg32::seed_from_u64(1));
        let html = effects_html(&layer);
        assert_eq!(html.matches("class=\"confetti\"").count(), crate::effects::CONFETTI_PIECES);
    }

    #[test]
    fn test_bursts_and_showers_share_markup() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut layer = EffectLayer::new(false);
        for burst in crate::effects::celebration_bursts() {
            layer.burst(&burst, &mut rng);
        }
        layer.shower(&mut rng);
        let html = effects_html(&layer);
        assert_eq!(html.matches("class=\"confetti\"").count(), layer.pieces().len());

        let launched = layer
            .pieces()
            .iter()
            .find(|p| p.angle_deg.is_some())
            .expect("burst piece");
        // Fresh burst pieces start at the launch height
        let (left, top) = piece_position(launched);
        assert_eq!(left, launched.left_vw);
        assert!((top - 40.0).abs() < 1e-4);
    }
}
