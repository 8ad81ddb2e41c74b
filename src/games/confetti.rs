//! Level 1: click the confetti button five times

use serde::{Deserialize, Serialize};

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};

pub const CONFETTI_THRESHOLD: u32 = 5;
const NEXT: Completion = Completion::new(2, 250, BonusTiming::OnTransition);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfettiClicks {
    clicks: u32,
    latch: CompletionLatch,
}

impl ConfettiClicks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a click. Returns true if this click reached the threshold.
    pub fn click(&mut self) -> bool {
        if self.clicks >= CONFETTI_THRESHOLD {
            return false;
        }
        self.clicks += 1;
        log::debug!(
            "Confetti button clicked {}/{} times",
            self.clicks,
            CONFETTI_THRESHOLD
        );
        if self.clicks == CONFETTI_THRESHOLD {
            log::debug!("Confetti threshold reached, progressing to level 2");
            return self.latch.fire(NEXT);
        }
        false
    }

    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn remaining(&self) -> u32 {
        CONFETTI_THRESHOLD.saturating_sub(self.clicks)
    }

    /// Counter text, hidden once the threshold is reached
    pub fn counter_text(&self) -> Option<String> {
        match self.remaining() {
            0 => None,
            n => Some(format!("Clicks left to unlock: {}", n)),
        }
    }
}

impl MiniGame for ConfettiClicks {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifth_click_completes() {
        let mut game = ConfettiClicks::new();
        for _ in 0..4 {
            assert!(!game.click());
        }
        assert_eq!(game.counter_text().as_deref(), Some("Clicks left to unlock: 1"));
        assert!(game.click());
        assert_eq!(game.take_completion(), Some(NEXT));
        assert_eq!(game.counter_text(), None);
    }

    #[test]
    fn test_extra_clicks_ignored() {
        let mut game = ConfettiClicks::new();
        for _ in 0..5 {
            game.click();
        }
        game.take_completion();
        assert!(!game.click());
        assert_eq!(game.clicks(), 5);
        assert_eq!(game.take_completion(), None);
    }
}
