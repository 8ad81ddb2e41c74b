//! Level 9: spin the wheel, answer the question

use rand::Rng;
use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriviaQuestion {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const TRIVIA: &[TriviaQuestion] = &[
    TriviaQuestion { question: "What is the capital of France?", answer: "Paris" },
    TriviaQuestion { question: "Who wrote \"Hamlet\"?", answer: "Shakespeare" },
    TriviaQuestion { question: "What is 9 x 7?", answer: "63" },
    TriviaQuestion { question: "What planet is known as the Red Planet?", answer: "Mars" },
    TriviaQuestion { question: "What is the chemical symbol for water?", answer: "H2O" },
    TriviaQuestion { question: "Who painted the Mona Lisa?", answer: "Da Vinci" },
    TriviaQuestion { question: "What is the largest mammal?", answer: "Blue whale" },
    TriviaQuestion { question: "What is the square root of 64?", answer: "8" },
];

const NEXT: Completion = Completion::new(10, 1200, BonusTiming::Immediate);

/// Trimmed, case-insensitive exact match
pub fn answers_match(given: &str, expected: &str) -> bool {
    given.trim().to_lowercase() == expected.to_lowercase()
}

#[derive(Debug, Clone, Default)]
pub struct TriviaWheel {
    picked: Option<usize>,
    /// Verdict on the last submission for the current question
    verdict: Option<bool>,
    latch: CompletionLatch,
}

impl TriviaWheel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question(&self) -> Option<&'static TriviaQuestion> {
        self.picked.and_then(|i| TRIVIA.get(i))
    }

    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    pub fn is_solved(&self) -> bool {
        self.latch.has_fired()
    }

    /// Pick a new random question
    pub fn spin(&mut self, rng: &mut Pcg32) -> Option<&'static TriviaQuestion> {
        if self.is_solved() {
            return self.question();
        }
        self.picked = Some(rng.random_range(0..TRIVIA.len()));
        self.verdict = None;
        self.question()
    }

    /// Submit an answer. `None` before the first spin.
    pub fn submit(&mut self, answer: &str) -> Option<bool> {
        let question = self.question()?;
        if self.is_solved() {
            return Some(true);
        }
        let correct = answers_match(answer, question.answer);
        self.verdict = Some(correct);
        if correct {
            self.latch.fire(NEXT);
        }
        Some(correct)
    }
}

impl MiniGame for TriviaWheel {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    #[test]
    fn test_submit_before_spin() {
        let mut game = TriviaWheel::new();
        assert_eq!(game.submit("Paris"), None);
    }

    #[test]
    fn test_case_insensitive_answer() {
        let mut rng = rng();
        let mut game = TriviaWheel::new();
        let question = game.spin(&mut rng).unwrap();
        assert_eq!(game.submit("definitely wrong"), Some(false));
        let shouted = format!("  {}  ", question.answer.to_uppercase());
        assert_eq!(game.submit(&shouted), Some(true));
        assert_eq!(game.take_completion(), Some(NEXT));
    }

    #[test]
    fn test_spin_clears_verdict() {
        let mut rng = rng();
        let mut game = TriviaWheel::new();
        game.spin(&mut rng);
        game.submit("nope");
        assert_eq!(game.verdict(), Some(false));
        game.spin(&mut rng);
        assert_eq!(game.verdict(), None);
    }

    #[test]
    fn test_answers_match() {
        assert!(answers_match(" da vinci ", "Da Vinci"));
        assert!(!answers_match("davinci", "Da Vinci"));
    }
}
