//! Level 8: paint the grid to match the heart

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};

pub const GRID_SIZE: usize = 6;
pub const PALETTE: [&str; 3] = ["#181f2a", "#ff6f61", "#ffd166"];
pub const PALETTE_NAMES: [&str; 3] = ["Background", "Red", "Yellow"];

/// 0 = background, 1 = red, 2 = yellow
pub const HEART: [[u8; GRID_SIZE]; GRID_SIZE] = [
    [0, 1, 1, 1, 1, 0],
    [1, 2, 2, 2, 2, 1],
    [2, 2, 2, 2, 2, 2],
    [2, 2, 2, 2, 2, 2],
    [0, 2, 2, 2, 2, 0],
    [0, 0, 2, 2, 0, 0],
];

const NEXT: Completion = Completion::new(9, 1400, BonusTiming::Immediate);

#[derive(Debug, Clone)]
pub struct PixelArt {
    grid: [[u8; GRID_SIZE]; GRID_SIZE],
    selected: u8,
    latch: CompletionLatch,
}

impl Default for PixelArt {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelArt {
    pub fn new() -> Self {
        Self {
            grid: [[0; GRID_SIZE]; GRID_SIZE],
            selected: 1,
            latch: CompletionLatch::default(),
        }
    }

    pub fn grid(&self) -> &[[u8; GRID_SIZE]; GRID_SIZE] {
        &self.grid
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }

    pub fn is_complete(&self) -> bool {
        self.latch.has_fired()
    }

    pub fn select_color(&mut self, color: u8) {
        if (color as usize) < PALETTE.len() {
            self.selected = color;
        }
    }

    /// Paint a cell with the selected colour. Returns true on the stroke
    /// that completes the pattern.
    pub fn paint(&mut self, row: usize, col: usize) -> bool {
        if self.latch.has_fired() || row >= GRID_SIZE || col >= GRID_SIZE {
            return false;
        }
        self.grid[row][col] = self.selected;
        if self.grid == HEART {
            log::debug!("Pixel art complete");
            return self.latch.fire(NEXT);
        }
        false
    }
}

impl MiniGame for PixelArt {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}
