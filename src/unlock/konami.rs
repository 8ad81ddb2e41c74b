//! Arrow-key sequence matcher

/// ↑ ↑ ↓ ↓ ← → ← →
pub const KONAMI: [&str; 8] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Matched the next element
    Progress,
    /// Sequence complete
    Matched,
    /// Mismatch from a non-zero position
    Failed,
    /// Mismatch with nothing entered yet
    Ignored,
}

/// Position index into a fixed key pattern
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    pattern: &'static [&'static str],
    position: usize,
    failures: u32,
}

impl Default for SequenceMatcher {
    fn default() -> Self {
        Self::konami()
    }
}

impl SequenceMatcher {
    pub fn new(pattern: &'static [&'static str]) -> Self {
        Self {
            pattern,
            position: 0,
            failures: 0,
        }
    }

    pub fn konami() -> Self {
        Self::new(&KONAMI)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Consecutive failed attempts since the last success
    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Feed one key. A mismatch always resets to 0, even when the key
    /// equals the first element of the pattern.
    pub fn feed(&mut self, key: &str) -> KeyOutcome {
        if self.pattern.get(self.position) == Some(&key) {
            self.position += 1;
            if self.position == self.pattern.len() {
                self.position = 0;
                self.failures = 0;
                return KeyOutcome::Matched;
            }
            return KeyOutcome::Progress;
        }
        if self.position == 0 {
            return KeyOutcome::Ignored;
        }
        self.position = 0;
        self.failures += 1;
        log::debug!("Arrow sequence failed ({} in a row)", self.failures);
        KeyOutcome::Failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(m: &mut SequenceMatcher, keys: &[&str]) -> Vec<KeyOutcome> {
        keys.iter().map(|k| m.feed(k)).collect()
    }

    #[test]
    fn test_full_sequence_matches() {
        let mut m = SequenceMatcher::konami();
        let out = feed_all(&mut m, &KONAMI);
        assert_eq!(out.last(), Some(&KeyOutcome::Matched));
        assert_eq!(m.position(), 0);
    }

    #[test]
    fn test_mismatch_resets_without_overlap() {
        let mut m = SequenceMatcher::konami();
        // The third ArrowUp breaks the run and does not count as a restart
        feed_all(&mut m, &["ArrowUp", "ArrowUp", "ArrowUp"]);
        assert_eq!(m.position(), 0);
        assert_eq!(m.failures(), 1);
        assert_eq!(m.feed("ArrowUp"), KeyOutcome::Progress);
    }

    #[test]
    fn test_failures_counted_and_cleared() {
        let mut m = SequenceMatcher::konami();
        assert_eq!(m.feed("x"), KeyOutcome::Ignored);
        for _ in 0..3 {
            feed_all(&mut m, &["ArrowUp", "x"]);
        }
        assert_eq!(m.failures(), 3);
        feed_all(&mut m, &KONAMI);
        assert_eq!(m.failures(), 0);
    }
}
