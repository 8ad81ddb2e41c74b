//! Level 12: guess what the emoji spell out

use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, pick_index};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmojiPuzzle {
    pub emoji: &'static str,
    pub options: [&'static str; 4],
    pub answer: usize,
}

pub const PUZZLES: &[EmojiPuzzle] = &[
    EmojiPuzzle {
        emoji: "🌧️☔",
        options: ["Rainy Day", "Picnic", "Thunderstorm", "Swim"],
        answer: 0,
    },
    EmojiPuzzle {
        emoji: "🦄🌈",
        options: ["Unicorn Party", "Dreams", "Fairy Tale", "Rainbow Unicorn"],
        answer: 3,
    },
    EmojiPuzzle {
        emoji: "🍕🍔🍟",
        options: ["Healthy Food", "Fast Food", "Dessert", "Picnic"],
        answer: 1,
    },
    EmojiPuzzle {
        emoji: "🎓📚",
        options: ["Graduation", "Reading", "School", "Exam"],
        answer: 0,
    },
];

pub const CORRECT_STATUS: &str = "🎉 Correct!";
pub const WRONG_STATUS: &str = "❌ Try again!";

const NEXT: Completion = Completion::new(13, 900, BonusTiming::OnTransition);

#[derive(Debug, Clone)]
pub struct EmojiGuess {
    puzzle: &'static EmojiPuzzle,
    verdict: Option<bool>,
    latch: CompletionLatch,
}

impl EmojiGuess {
    pub fn random(rng: &mut Pcg32) -> Result<Self, GameError> {
        let idx = pick_index(rng, PUZZLES, "emoji puzzle")?;
        Ok(Self::with_puzzle(&PUZZLES[idx]))
    }

    pub fn with_puzzle(puzzle: &'static EmojiPuzzle) -> Self {
        Self {
            puzzle,
            verdict: None,
            latch: CompletionLatch::default(),
        }
    }

    pub fn puzzle(&self) -> &'static EmojiPuzzle {
        self.puzzle
    }

    pub fn status(&self) -> Option<&'static str> {
        self.verdict
            .map(|ok| if ok { CORRECT_STATUS } else { WRONG_STATUS })
    }

    /// Pick an option. Out-of-range picks are ignored.
    pub fn guess(&mut self, option: usize) -> Option<bool> {
        if option >= self.puzzle.options.len() {
            return None;
        }
        if self.latch.has_fired() {
            return Some(true);
        }
        let correct = option == self.puzzle.answer;
        self.verdict = Some(correct);
        if correct {
            self.latch.fire(NEXT);
        }
        Some(correct)
    }
}

impl MiniGame for EmojiGuess {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}
