//! Secret input gates on the home page
//!
//! Four independent ways in:
//! - Arrow-key sequence (`konami`)
//! - Five quick clicks on the trigger (`clicks`)
//! - Typing the secret word anywhere (`secret`), which redirects straight
//!   to the game page
//! - A short quiz, offered after three failed arrow attempts
//!
//! The first three reveal the hidden section in place, once.

pub mod clicks;
pub mod konami;
pub mod secret;

pub use clicks::ClickCounter;
pub use konami::{KeyOutcome, SequenceMatcher};
pub use secret::SecretBuffer;

use crate::consts::{GAME_PAGE, SECRET_WORD};
use crate::error::{GameError, StorageError};
use crate::games::MiniGame;
use crate::games::quiz::{QUIZ_QUESTIONS, Quiz};
use crate::persistence::{self, KeyValueStore};

/// Failed arrow attempts before the quiz is offered
pub const QUIZ_FALLBACK_AFTER: u32 = 3;
/// Key that opens the fallback quiz once armed
pub const QUIZ_TRIGGER_KEY: &str = "q";

/// Which gate opened the section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockSource {
    ArrowSequence,
    ClickCounter,
    Quiz,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockEvent {
    /// Play the unlock transition and reveal the hidden section
    Reveal(UnlockSource),
    /// Set the unlock flag and navigate
    Redirect { page: &'static str },
    /// Fallback quiz is now open
    QuizOpened,
}

#[derive(Debug, Clone)]
pub struct UnlockGate {
    arrows: SequenceMatcher,
    clicks: ClickCounter,
    secret: SecretBuffer,
    quiz: Option<Quiz>,
    unlocked: bool,
    redirected: bool,
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self::new()
    }
}

impl UnlockGate {
    pub fn new() -> Self {
        Self {
            arrows: SequenceMatcher::konami(),
            clicks: ClickCounter::default(),
            secret: SecretBuffer::new(SECRET_WORD),
            quiz: None,
            unlocked: false,
            redirected: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Quiz fallback is available
    pub fn quiz_armed(&self) -> bool {
        !self.unlocked && self.arrows.failures() >= QUIZ_FALLBACK_AFTER
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    fn reveal(&mut self, source: UnlockSource) -> Option<UnlockEvent> {
        if self.unlocked {
            return None;
        }
        self.unlocked = true;
        self.quiz = None;
        log::info!("Unlocked via {:?}", source);
        Some(UnlockEvent::Reveal(source))
    }

    /// Keydown anywhere on the page
    pub fn handle_key(&mut self, key: &str, input_focused: bool) -> Vec<UnlockEvent> {
        let mut events = Vec::new();

        if !self.unlocked {
            match self.arrows.feed(key) {
                KeyOutcome::Matched => events.extend(self.reveal(UnlockSource::ArrowSequence)),
                KeyOutcome::Failed if self.quiz_armed() => {
                    log::debug!("Quiz fallback armed");
                }
                _ => {}
            }
        }

        if !input_focused
            && self.quiz.is_none()
            && self.quiz_armed()
            && key.eq_ignore_ascii_case(QUIZ_TRIGGER_KEY)
        {
            match self.open_quiz() {
                Ok(()) => events.push(UnlockEvent::QuizOpened),
                Err(e) => log::error!("Could not open unlock quiz: {}", e),
            }
        }

        if !input_focused && self.secret.feed(key) && !self.redirected {
            self.redirected = true;
            log::info!("Secret word typed, redirecting to {}", GAME_PAGE);
            events.push(UnlockEvent::Redirect { page: GAME_PAGE });
        }

        events
    }

    fn open_quiz(&mut self) -> Result<(), GameError> {
        self.quiz = Some(Quiz::new(QUIZ_QUESTIONS)?);
        Ok(())
    }

    /// Click on the trigger element
    pub fn handle_click(&mut self, now_ms: u64) -> Option<UnlockEvent> {
        if self.unlocked {
            return None;
        }
        if self.clicks.click(now_ms) {
            return self.reveal(UnlockSource::ClickCounter);
        }
        None
    }

    pub fn answer_quiz(&mut self, option: usize) -> Option<bool> {
        self.quiz.as_mut()?.answer(option)
    }

    /// Run quiz feedback timers; finishing the quiz unlocks
    pub fn advance(&mut self, dt_ms: u32) -> Option<UnlockEvent> {
        let quiz = self.quiz.as_mut()?;
        quiz.tick(dt_ms);
        if quiz.take_completion().is_some() {
            log::debug!("Unlock quiz finished with {}/{}", quiz.score(), quiz.total());
            return self.reveal(UnlockSource::Quiz);
        }
        None
    }

    /// Some gate has opened (in-place reveal or secret word)
    pub fn can_enter(&self) -> bool {
        self.unlocked || self.redirected
    }

    /// Set the unlock flag for the game page and return where to go.
    /// `None` while every gate is still closed.
    pub fn enter_game(
        &self,
        store: &mut dyn KeyValueStore,
    ) -> Result<Option<&'static str>, StorageError> {
        if !self.can_enter() {
            log::warn!("Game page requested before any gate opened");
            return Ok(None);
        }
        persistence::grant_access(store)?;
        Ok(Some(GAME_PAGE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::quiz::{ANSWER_FEEDBACK_MS, SUMMARY_MS};
    use crate::persistence::MemoryStore;
    use super::konami::KONAMI;

    fn type_text(gate: &mut UnlockGate, text: &str, focused: bool) -> Vec<UnlockEvent> {
        text.chars()
            .flat_map(|c| gate.handle_key(&c.to_string(), focused))
            .collect()
    }

    #[test]
    fn test_secret_word_redirects_once() {
        let mut gate = UnlockGate::new();
        let events = type_text(&mut gate, "xyzHARI", false);
        assert_eq!(events, vec![UnlockEvent::Redirect { page: GAME_PAGE }]);
        assert!(type_text(&mut gate, "hari", false).is_empty());
    }

    #[test]
    fn test_secret_ignored_in_text_field() {
        let mut gate = UnlockGate::new();
        assert!(type_text(&mut gate, "hari", true).is_empty());
    }

    #[test]
    fn test_arrow_sequence_reveals_once() {
        let mut gate = UnlockGate::new();
        let events: Vec<_> = KONAMI
            .iter()
            .flat_map(|k| gate.handle_key(k, false))
            .collect();
        assert_eq!(events, vec![UnlockEvent::Reveal(UnlockSource::ArrowSequence)]);
        assert!(gate.is_unlocked());
        let again: Vec<_> = KONAMI
            .iter()
            .flat_map(|k| gate.handle_key(k, false))
            .collect();
        assert!(again.is_empty());
        assert_eq!(gate.handle_click(0), None);
    }

    #[test]
    fn test_clicks_reveal() {
        let mut gate = UnlockGate::new();
        for i in 0..4 {
            assert_eq!(gate.handle_click(i * 200), None);
        }
        assert_eq!(
            gate.handle_click(1_000),
            Some(UnlockEvent::Reveal(UnlockSource::ClickCounter))
        );
    }

    #[test]
    fn test_quiz_fallback_after_three_failures() {
        let mut gate = UnlockGate::new();
        assert!(gate.handle_key("q", false).is_empty());
        for attempt in 0..3 {
            assert!(!gate.quiz_armed(), "armed early at attempt {}", attempt);
            gate.handle_key("ArrowUp", false);
            gate.handle_key("ArrowLeft", false);
        }
        assert!(gate.quiz_armed());
        assert_eq!(gate.handle_key("q", true), vec![]);
        assert_eq!(gate.handle_key("q", false), vec![UnlockEvent::QuizOpened]);

        let total = gate.quiz().map(|q| q.total()).unwrap_or(0);
        for _ in 0..total {
            assert!(gate.answer_quiz(0).is_some());
            assert_eq!(gate.advance(ANSWER_FEEDBACK_MS), None);
        }
        assert_eq!(
            gate.advance(SUMMARY_MS),
            Some(UnlockEvent::Reveal(UnlockSource::Quiz))
        );
        assert!(gate.quiz().is_none());
    }

    fn assert_enters(gate: &UnlockGate) {
        let mut store = MemoryStore::new();
        assert_eq!(gate.enter_game(&mut store).unwrap(), Some(GAME_PAGE));
        assert!(persistence::consume_access(&mut store).unwrap());
        assert!(!persistence::consume_access(&mut store).unwrap());
    }

    #[test]
    fn test_enter_game_needs_an_open_gate() {
        let gate = UnlockGate::new();
        let mut store = MemoryStore::new();
        assert_eq!(gate.enter_game(&mut store).unwrap(), None);
        assert!(!persistence::consume_access(&mut store).unwrap());
    }

    #[test]
    fn test_every_gate_grants_game_access() {
        let mut arrows = UnlockGate::new();
        for key in KONAMI {
            arrows.handle_key(key, false);
        }
        assert!(arrows.is_unlocked());
        assert_enters(&arrows);

        let mut clicks = UnlockGate::new();
        for i in 0..5 {
            clicks.handle_click(i * 100);
        }
        assert!(clicks.is_unlocked());
        assert_enters(&clicks);

        let mut quiz = UnlockGate::new();
        for _ in 0..QUIZ_FALLBACK_AFTER {
            quiz.handle_key("ArrowUp", false);
            quiz.handle_key("ArrowLeft", false);
        }
        quiz.handle_key(QUIZ_TRIGGER_KEY, false);
        let total = quiz.quiz().map(|q| q.total()).unwrap_or(0);
        for _ in 0..total {
            quiz.answer_quiz(1);
            quiz.advance(ANSWER_FEEDBACK_MS);
        }
        quiz.advance(SUMMARY_MS);
        assert!(quiz.is_unlocked());
        assert_enters(&quiz);

        let mut secret = UnlockGate::new();
        type_text(&mut secret, "hari", false);
        assert!(!secret.is_unlocked());
        assert_enters(&secret);
    }
}
