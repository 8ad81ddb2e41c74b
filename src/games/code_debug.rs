//! Level 11: fix the bug in a small function
//!
//! The submission is accepted when the validation pattern matches anywhere
//! in it, so surrounding code (the function header, comments) is fine.

use rand_pcg::Pcg32;
use regex::Regex;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, pick_index};
use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugChallenge {
    pub description: &'static str,
    pub buggy_code: &'static str,
    pub pattern: &'static str,
    pub answer: &'static str,
}

pub const CHALLENGES: &[DebugChallenge] = &[
    DebugChallenge {
        description: "The following function is supposed to return the sum of a and b, but it contains a bug. Fix the bug and submit!",
        buggy_code: "function add(a, b) {\n    return a - b; // Bug: should be +\n}",
        pattern: r"return\s+a\s*\+\s*b\s*;",
        answer: "return a + b;",
    },
    DebugChallenge {
        description: "This function should return the product of x and y. Fix the bug!",
        buggy_code: "function multiply(x, y) {\n    return x + y; // Bug: should be *\n}",
        pattern: r"return\s+x\s*\*\s*y\s*;",
        answer: "return x * y;",
    },
    DebugChallenge {
        description: "The function should return true if n is even. Fix the bug!",
        buggy_code: "function isEven(n) {\n    return n % 2 === 1; // Bug: should be 0\n}",
        pattern: r"return\s+n\s*%\s*2\s*===\s*0\s*;",
        answer: "return n % 2 === 0;",
    },
    DebugChallenge {
        description: "This function is supposed to return the first character of str. Fix the bug!",
        buggy_code: "function firstChar(str) {\n    return str[str.length-1]; // Bug: should be 0\n}",
        pattern: r"return\s+str\[0\];",
        answer: "return str[0];",
    },
    DebugChallenge {
        description: "The function should return the array length. Fix the bug!",
        buggy_code: "function getLength(arr) {\n    return arr.size; // Bug: should be length\n}",
        pattern: r"return\s+arr\.length\s*;",
        answer: "return arr.length;",
    },
];

pub const SUCCESS_STATUS: &str = "Correct! Bug fixed. 🎉";
pub const FAILURE_STATUS: &str = "Still buggy! Try again.";
/// Shown in a modal after the fix, pointing at level 13
pub const HINT: &str = "Pro tip: Sometimes, the simplest key, like hari, can unlock hidden doors. 😉";

const NEXT: Completion = Completion::new(12, 5200, BonusTiming::Immediate);

#[derive(Debug, Clone)]
pub struct CodeDebug {
    challenge: &'static DebugChallenge,
    validator: Regex,
    /// Last verdict, drives the status line
    verdict: Option<bool>,
    latch: CompletionLatch,
}

impl CodeDebug {
    pub fn random(rng: &mut Pcg32) -> Result<Self, GameError> {
        let idx = pick_index(rng, CHALLENGES, "code debug challenge")?;
        Self::with_challenge(&CHALLENGES[idx])
    }

    pub fn with_challenge(challenge: &'static DebugChallenge) -> Result<Self, GameError> {
        let validator = Regex::new(challenge.pattern)?;
        Ok(Self {
            challenge,
            validator,
            verdict: None,
            latch: CompletionLatch::default(),
        })
    }

    pub fn challenge(&self) -> &'static DebugChallenge {
        self.challenge
    }

    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    pub fn status(&self) -> Option<&'static str> {
        self.verdict
            .map(|ok| if ok { SUCCESS_STATUS } else { FAILURE_STATUS })
    }

    /// The fixed line and the hint, once solved
    pub fn reveal(&self) -> Option<(&'static str, &'static str)> {
        self.latch
            .has_fired()
            .then_some((self.challenge.answer, HINT))
    }

    pub fn submit(&mut self, code: &str) -> bool {
        if self.latch.has_fired() {
            return true;
        }
        let fixed = self.validator.is_match(code);
        self.verdict = Some(fixed);
        if fixed {
            self.latch.fire(NEXT);
        }
        fixed
    }
}

impl MiniGame for CodeDebug {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    #[test]
    fn test_every_pattern_compiles_and_accepts_answer() {
        for challenge in CHALLENGES {
            let mut game = CodeDebug::with_challenge(challenge).unwrap();
            assert!(!game.submit(challenge.buggy_code), "{}", challenge.answer);
            assert!(game.submit(challenge.answer));
        }
    }

    #[test]
    fn test_whole_function_submission() {
        let mut game = CodeDebug::with_challenge(&CHALLENGES[0]).unwrap();
        assert!(game.submit("function add(a, b) {\n    return a+b;\n}"));
        assert_eq!(game.status(), Some(SUCCESS_STATUS));
        assert_eq!(game.reveal(), Some(("return a + b;", HINT)));
        assert_eq!(game.take_completion(), Some(NEXT));
    }

    #[test]
    fn test_wrong_fix_keeps_level() {
        let mut game = CodeDebug::random(&mut rng()).unwrap();
        assert!(!game.submit("return 42;"));
        assert_eq!(game.status(), Some(FAILURE_STATUS));
        assert!(game.reveal().is_none());
        assert_eq!(game.take_completion(), None);
    }
}
