//! Fun Levels - the hidden minigame chain behind a portfolio site
//!
//! Core modules:
//! - `levels`: Level registry and progression engine
//! - `timer`: Shared countdown
//! - `games`: Minigame session state (pure, deterministic)
//! - `unlock`: Secret input gates that reveal the progression
//! - `effects`: Confetti, emoji rain and unlock transition data
//! - `view`: HTML projection of engine state
//! - `persistence`: Key/value storage (LocalStorage on web)
//! - `platform`: Browser DOM helpers

pub mod effects;
pub mod error;
pub mod games;
pub mod levels;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod timer;
pub mod unlock;
pub mod view;

pub use error::{GameError, LevelError, StorageError};
pub use levels::{EngineEvent, LevelEngine, LevelRegistry};
pub use settings::Settings;
pub use timer::Countdown;
pub use unlock::{UnlockEvent, UnlockGate};

/// Progression constants
pub mod consts {
    /// Number of levels in the progression
    pub const TOTAL_LEVELS: u32 = 14;
    /// Countdown at level 1
    pub const INITIAL_COUNTDOWN_SECS: u32 = 60;
    /// Countdown bonus per level advance
    pub const LEVEL_BONUS_SECS: u32 = 60;
    /// Progress bar never drops below this width (percent)
    pub const PROGRESS_FLOOR_PCT: u32 = 6;
    /// Countdown tick length
    pub const TICK_MS: u32 = 1000;

    /// LocalStorage flag handed from the unlock page to the game page
    pub const UNLOCK_FLAG_KEY: &str = "funUnlocked";
    /// Page the secret word redirects to
    pub const GAME_PAGE: &str = "fun.html";
    /// Page the game redirects back to without the unlock flag
    pub const HOME_PAGE: &str = "index.html";

    /// Secret word typed on the home page (and level 13's command)
    pub const SECRET_WORD: &str = "hari";
}

/// Format seconds as zero-padded `MM:SS`
pub fn format_mm_ss(total_secs: u32) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Progress bar width for a level: `max(6, round(level / total * 100))`
pub fn progress_percent(level: u32, total: u32) -> u32 {
    if total == 0 {
        return consts::PROGRESS_FLOOR_PCT;
    }
    let pct = (level as f64 / total as f64 * 100.0).round() as u32;
    pct.max(consts::PROGRESS_FLOOR_PCT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mm_ss() {
        assert_eq!(format_mm_ss(0), "00:00");
        assert_eq!(format_mm_ss(59), "00:59");
        assert_eq!(format_mm_ss(60), "01:00");
        assert_eq!(format_mm_ss(3_599), "59:59");
    }

    #[test]
    fn test_progress_percent_floor() {
        assert_eq!(progress_percent(1, 14), 7);
        assert_eq!(progress_percent(0, 14), 6);
        assert_eq!(progress_percent(7, 14), 50);
        assert_eq!(progress_percent(14, 14), 100);
    }
}
