//! Level 2: drag a card onto the drop target
//!
//! Desktop drops complete immediately. Touch devices select a card first,
//! then tap the target.

use serde::{Deserialize, Serialize};

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};

pub const CARDS: &[&str] = &["🦀 Rust", "🕸️ WASM", "⚡ Web"];
const NEXT: Completion = Completion::new(3, 700, BonusTiming::OnTransition);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragDrop {
    selected: Option<usize>,
    latch: CompletionLatch,
}

impl DragDrop {
    pub fn new() -> Self {
        Self::default()
    }

    /// A card was dropped on the target
    pub fn drop_card(&mut self) -> bool {
        if self.latch.has_fired() {
            return false;
        }
        log::debug!("Card dropped on drop target, progressing to level 3");
        self.latch.fire(NEXT)
    }

    /// Touch: highlight a card
    pub fn select_card(&mut self, idx: usize) {
        if idx < CARDS.len() && !self.latch.has_fired() {
            self.selected = Some(idx);
        }
    }

    /// Touch: tap the target. Completes only with a card selected.
    pub fn tap_target(&mut self) -> bool {
        if self.selected.is_none() || self.latch.has_fired() {
            return false;
        }
        self.selected = None;
        self.latch.fire(NEXT)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_complete(&self) -> bool {
        self.latch.has_fired()
    }
}

impl MiniGame for DragDrop {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_completes_once() {
        let mut game = DragDrop::new();
        assert!(game.drop_card());
        assert!(!game.drop_card());
        assert_eq!(game.take_completion(), Some(NEXT));
        assert_eq!(game.take_completion(), None);
    }

    #[test]
    fn test_tap_needs_selection() {
        let mut game = DragDrop::new();
        assert!(!game.tap_target());
        game.select_card(1);
        assert_eq!(game.selected(), Some(1));
        assert!(game.tap_target());
        assert_eq!(game.selected(), None);
        assert!(game.is_complete());
    }

    #[test]
    fn test_select_out_of_range_ignored() {
        let mut game = DragDrop::new();
        game.select_card(CARDS.len());
        assert_eq!(game.selected(), None);
    }
}
