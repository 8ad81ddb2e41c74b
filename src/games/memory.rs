//! Level 4: memory match
//!
//! Six emoji pairs, shuffled with Fisher-Yates. Two face-up cards lock the
//! board; after the compare delay they either stay matched or flip back.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, tick_delay};

pub const MEMORY_EMOJIS: &[&str] = &["🍎", "🍌", "🍇", "🍒", "🍉", "🍋"];
/// Delay between the second flip and the compare/flip-back
pub const COMPARE_DELAY_MS: u32 = 700;

const NEXT: Completion = Completion::new(5, 900, BonusTiming::OnTransition);

/// Result of clicking a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipResult {
    /// Locked, already face up, or already matched
    Ignored,
    /// First card of a pair turned over
    Revealed,
    /// Second card turned over; compare pending
    Comparing,
}

#[derive(Debug, Clone)]
pub struct MemoryMatch {
    cards: Vec<&'static str>,
    matched: Vec<bool>,
    /// Face-up, unmatched cards (at most two)
    flipped: Vec<usize>,
    /// Remaining compare delay; input is locked while non-zero
    compare_ms: u32,
    latch: CompletionLatch,
}

impl MemoryMatch {
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut cards: Vec<&'static str> = MEMORY_EMOJIS
            .iter()
            .chain(MEMORY_EMOJIS.iter())
            .copied()
            .collect();
        cards.shuffle(rng);
        Self::with_deck(cards)
    }

    /// Fixed deck, for replays and tests
    pub fn with_deck(cards: Vec<&'static str>) -> Self {
        let len = cards.len();
        Self {
            cards,
            matched: vec![false; len],
            flipped: Vec::with_capacity(2),
            compare_ms: 0,
            latch: CompletionLatch::default(),
        }
    }

    pub fn cards(&self) -> &[&'static str] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.compare_ms > 0
    }

    pub fn is_face_up(&self, idx: usize) -> bool {
        self.is_matched(idx) || self.flipped.contains(&idx)
    }

    pub fn is_matched(&self, idx: usize) -> bool {
        self.matched.get(idx).copied().unwrap_or(false)
    }

    pub fn pairs_matched(&self) -> usize {
        self.matched.iter().filter(|m| **m).count() / 2
    }

    pub fn all_matched(&self) -> bool {
        !self.matched.is_empty() && self.matched.iter().all(|m| *m)
    }

    /// Turn a card over
    pub fn flip(&mut self, idx: usize) -> FlipResult {
        if idx >= self.cards.len()
            || self.is_locked()
            || self.is_matched(idx)
            || self.flipped.contains(&idx)
            || self.flipped.len() >= 2
        {
            return FlipResult::Ignored;
        }
        self.flipped.push(idx);
        if self.flipped.len() == 2 {
            self.compare_ms = COMPARE_DELAY_MS;
            FlipResult::Comparing
        } else {
            FlipResult::Revealed
        }
    }

    fn resolve(&mut self) {
        if let &[a, b] = self.flipped.as_slice() {
            if self.cards[a] == self.cards[b] {
                self.matched[a] = true;
                self.matched[b] = true;
                if self.all_matched() {
                    log::debug!("All {} pairs matched", self.pairs_matched());
                    self.latch.fire(NEXT);
                }
            }
        }
        self.flipped.clear();
    }
}

impl MiniGame for MemoryMatch {
    fn advance(&mut self, dt_ms: u32, _rng: &mut Pcg32) {
        if tick_delay(&mut self.compare_ms, dt_ms) {
            self.resolve();
        }
    }

    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}
