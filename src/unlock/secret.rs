//! Typed secret word matcher

use std::collections::VecDeque;

/// Trailing buffer of the last K typed characters, K = secret length
#[derive(Debug, Clone)]
pub struct SecretBuffer {
    secret: Vec<char>,
    recent: VecDeque<char>,
}

impl SecretBuffer {
    pub fn new(secret: &str) -> Self {
        let secret: Vec<char> = secret.to_lowercase().chars().collect();
        Self {
            recent: VecDeque::with_capacity(secret.len()),
            secret,
        }
    }

    /// Feed a key value. Multi-character keys (Shift, Enter, ...) are
    /// ignored. True when the trailing characters spell the secret.
    pub fn feed(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return false;
        };
        if self.secret.is_empty() {
            return false;
        }
        self.recent.extend(ch.to_lowercase());
        while self.recent.len() > self.secret.len() {
            self.recent.pop_front();
        }
        self.recent.iter().eq(self.secret.iter())
    }
}
