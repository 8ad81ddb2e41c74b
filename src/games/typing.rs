//! Level 6: typing challenge
//!
//! Live per-character diff against a target sentence. The clock starts on
//! the first input and stops when the input equals the target exactly.

use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, pick_index};
use crate::error::GameError;

pub const SENTENCES: &[&str] = &[
    "The quick brown fox jumps over the lazy dog.",
    "JavaScript makes web pages interactive.",
    "Typing fast is a useful skill.",
    "Practice makes perfect!",
    "Cascade is your coding copilot.",
];

const NEXT: Completion = Completion::new(7, 1600, BonusTiming::Immediate);

/// Highlight state of one target character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharMark {
    Pending,
    Correct,
    Wrong,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingResult {
    pub elapsed_secs: f64,
    pub wpm: u32,
    pub accuracy: u32,
}

#[derive(Debug, Clone)]
pub struct TypingChallenge {
    target: &'static str,
    typed: String,
    /// Time advanced since the level was shown
    clock_ms: u64,
    started_at_ms: Option<u64>,
    /// Wrong characters seen as they were typed
    mistakes: u32,
    result: Option<TypingResult>,
    latch: CompletionLatch,
}

impl TypingChallenge {
    pub fn random(rng: &mut Pcg32) -> Result<Self, GameError> {
        let idx = pick_index(rng, SENTENCES, "typing sentence")?;
        Ok(Self::with_target(SENTENCES[idx]))
    }

    pub fn with_target(target: &'static str) -> Self {
        Self {
            target,
            typed: String::new(),
            clock_ms: 0,
            started_at_ms: None,
            mistakes: 0,
            result: None,
            latch: CompletionLatch::default(),
        }
    }

    pub fn target(&self) -> &'static str {
        self.target
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn result(&self) -> Option<TypingResult> {
        self.result
    }

    /// Input is disabled once the sentence is done
    pub fn is_done(&self) -> bool {
        self.result.is_some()
    }

    /// New value of the input field
    pub fn input(&mut self, value: &str) -> Option<TypingResult> {
        if self.is_done() {
            return None;
        }
        if self.started_at_ms.is_none() {
            self.started_at_ms = Some(self.clock_ms);
        }

        // Wrong characters at positions this edit changed, wherever they are
        let previous: Vec<char> = self.typed.chars().collect();
        let introduced = value
            .chars()
            .zip(self.target.chars().map(Some).chain(std::iter::repeat(None)))
            .enumerate()
            .filter(|&(i, (ch, expected))| expected != Some(ch) && previous.get(i) != Some(&ch))
            .count();
        self.mistakes += introduced as u32;
        self.typed = value.to_string();

        if self.typed == self.target {
            let result = self.finish();
            self.result = Some(result);
            self.latch.fire(NEXT);
            log::debug!(
                "Typing done in {:.2}s, {} wpm, {}% accuracy",
                result.elapsed_secs,
                result.wpm,
                result.accuracy
            );
            return Some(result);
        }
        None
    }

    fn finish(&self) -> TypingResult {
        let started = self.started_at_ms.unwrap_or(self.clock_ms);
        let elapsed_secs = (self.clock_ms - started) as f64 / 1000.0;
        let words = self.target.split_whitespace().count() as f64;
        let wpm = if elapsed_secs > 0.0 {
            (words / (elapsed_secs / 60.0)).round() as u32
        } else {
            0
        };
        let len = self.target.chars().count() as f64;
        let accuracy = (len / (len + self.mistakes as f64) * 100.0).round() as u32;
        TypingResult {
            elapsed_secs,
            wpm,
            accuracy,
        }
    }

    /// Per-character highlight of the target
    pub fn marks(&self) -> Vec<CharMark> {
        let mut typed = self.typed.chars();
        self.target
            .chars()
            .map(|expected| match typed.next() {
                None => CharMark::Pending,
                Some(ch) if ch == expected => CharMark::Correct,
                Some(_) => CharMark::Wrong,
            })
            .collect()
    }
}

impl MiniGame for TypingChallenge {
    fn advance(&mut self, dt_ms: u32, _rng: &mut Pcg32) {
        self.clock_ms += dt_ms as u64;
    }

    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    #[test]
    fn test_marks_live_diff() {
        let mut game = TypingChallenge::with_target("abc");
        game.input("ax");
        assert_eq!(
            game.marks(),
            vec![CharMark::Correct, CharMark::Wrong, CharMark::Pending]
        );
    }

    #[test]
    fn test_completion_stats() {
        let mut rng = rng();
        let mut game = TypingChallenge::with_target("Practice makes perfect!");
        game.input("P");
        // 3 words in 6 seconds = 30 wpm
        game.advance(6_000, &mut rng);
        let result = game.input("Practice makes perfect!").expect("complete");
        assert_eq!(result.wpm, 30);
        assert_eq!(result.accuracy, 100);
        assert!((result.elapsed_secs - 6.0).abs() < 1e-9);
        assert_eq!(game.take_completion(), Some(NEXT));
        assert!(game.input("more").is_none());
    }

    #[test]
    fn test_mistakes_lower_accuracy() {
        let mut rng = rng();
        let mut game = TypingChallenge::with_target("abcd");
        game.input("x");
        game.input("");
        game.advance(1_000, &mut rng);
        let result = game.input("abcd").expect("complete");
        // 4 / (4 + 1)
        assert_eq!(result.accuracy, 80);
    }

    #[test]
    fn test_mid_string_edits_and_pastes_count_mistakes() {
        let mut rng = rng();
        let mut game = TypingChallenge::with_target("abcd");
        game.input("ab");
        // Caret moved back, first char overwritten
        game.input("xb");
        // Same value again adds nothing
        game.input("xb");
        // Pasted tail with two wrong chars
        game.input("abxx");
        game.advance(1_000, &mut rng);
        let result = game.input("abcd").expect("complete");
        // 4 / (4 + 3)
        assert_eq!(result.accuracy, 57);
    }

    #[test]
    fn test_pasted_answer_reports_zero_wpm() {
        let mut game = TypingChallenge::with_target("hi there");
        let result = game.input("hi there").expect("complete");
        assert_eq!(result.wpm, 0);
    }

    #[test]
    fn test_random_picks_from_pool() {
        let game = TypingChallenge::random(&mut rng()).unwrap();
        assert!(SENTENCES.contains(&game.target()));
    }
}
