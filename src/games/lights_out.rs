//! Level 7: Lights Out
//!
//! Pressing a cell flips it and its orthogonal neighbours. The level uses a
//! fixed 2x2 board that one press solves.

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};
use crate::error::GameError;

pub const STANDARD_SIZE: usize = 2;
pub const STANDARD_BOARD: [bool; 4] = [true, true, true, false];

const NEXT: Completion = Completion::new(8, 1300, BonusTiming::Immediate);

#[derive(Debug, Clone)]
pub struct LightsOut {
    size: usize,
    cells: Vec<bool>,
    latch: CompletionLatch,
}

impl LightsOut {
    pub fn standard() -> Self {
        Self {
            size: STANDARD_SIZE,
            cells: STANDARD_BOARD.to_vec(),
            latch: CompletionLatch::default(),
        }
    }

    pub fn from_cells(size: usize, cells: Vec<bool>) -> Result<Self, GameError> {
        let expected = size * size;
        if size == 0 || cells.len() != expected {
            return Err(GameError::BoardShape {
                size,
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            size,
            cells,
            latch: CompletionLatch::default(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|lit| !lit)
    }

    /// Indices flipped by pressing `idx`: itself, above, below, and left /
    /// right without wrapping across rows
    pub fn affected(&self, idx: usize) -> Vec<usize> {
        let n = self.size * self.size;
        if idx >= n {
            return Vec::new();
        }
        let mut out = vec![idx];
        if idx >= self.size {
            out.push(idx - self.size);
        }
        if idx + self.size < n {
            out.push(idx + self.size);
        }
        if idx % self.size != 0 {
            out.push(idx - 1);
        }
        if (idx + 1) % self.size != 0 {
            out.push(idx + 1);
        }
        out
    }

    /// Press a cell. Returns true if this press solved the board.
    pub fn toggle(&mut self, idx: usize) -> bool {
        // Board is frozen once solved
        if self.latch.has_fired() || idx >= self.cells.len() {
            return false;
        }
        for i in self.affected(idx) {
            self.cells[i] = !self.cells[i];
        }
        if self.is_solved() {
            log::debug!("Lights out solved");
            return self.latch.fire(NEXT);
        }
        false
    }
}

impl MiniGame for LightsOut {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_standard_board_solves_in_one_move() {
        let mut game = LightsOut::standard();
        assert_eq!(game.affected(0), vec![0, 2, 1]);
        assert!(game.toggle(0));
        assert_eq!(game.cells(), &[false, false, false, false]);
        assert_eq!(game.take_completion(), Some(NEXT));
    }

    #[test]
    fn test_no_row_wrap() {
        let game = LightsOut::from_cells(3, vec![false; 9]).unwrap();
        let mut right_edge = game.affected(2);
        right_edge.sort();
        assert_eq!(right_edge, vec![1, 2, 5]);
        let mut left_edge = game.affected(3);
        left_edge.sort();
        assert_eq!(left_edge, vec![0, 3, 4, 6]);
    }

    #[test]
    fn test_solved_board_ignores_presses() {
        let mut game = LightsOut::standard();
        game.toggle(0);
        assert!(!game.toggle(1));
        assert!(game.is_solved());
    }

    #[test]
    fn test_bad_shape_rejected() {
        assert!(LightsOut::from_cells(2, vec![true; 3]).is_err());
        assert!(LightsOut::from_cells(0, vec![]).is_err());
    }

    proptest! {
        #[test]
        fn test_double_press_restores_board(
            cells in proptest::collection::vec(any::<bool>(), 9),
            idx in 0usize..9,
        ) {
            // Skip boards that a single press would solve (they freeze)
            let mut game = LightsOut::from_cells(3, cells.clone()).unwrap();
            prop_assume!(!game.toggle(idx));
            game.toggle(idx);
            prop_assert_eq!(game.cells(), &cells[..]);
        }
    }
}
