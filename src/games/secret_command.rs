//! Level 13: type the secret command

use super::{BonusTiming, Completion, CompletionLatch, MiniGame};
use crate::consts::SECRET_WORD;

pub const UNLOCKED_STATUS: &str = "🎉 Unlocked!";
pub const INCORRECT_STATUS: &str = "❌ Incorrect!";

const NEXT: Completion = Completion::new(14, 900, BonusTiming::OnTransition);

#[derive(Debug, Clone)]
pub struct SecretCommand {
    secret: &'static str,
    verdict: Option<bool>,
    latch: CompletionLatch,
}

impl Default for SecretCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretCommand {
    pub fn new() -> Self {
        Self {
            secret: SECRET_WORD,
            verdict: None,
            latch: CompletionLatch::default(),
        }
    }

    pub fn status(&self) -> Option<&'static str> {
        self.verdict
            .map(|ok| if ok { UNLOCKED_STATUS } else { INCORRECT_STATUS })
    }

    pub fn submit(&mut self, input: &str) -> bool {
        if self.latch.has_fired() {
            return true;
        }
        let ok = input.trim().to_lowercase() == self.secret;
        self.verdict = Some(ok);
        if ok {
            self.latch.fire(NEXT);
        }
        ok
    }
}

impl MiniGame for SecretCommand {
    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}
