//! DOM input mapped onto engine calls
//!
//! Elements carry `data-action` (and `data-idx` where needed); text fields
//! carry `data-input`. The wasm layer reads those attributes and hands them
//! to `Action::parse` / `Action::from_key`.

use crate::games::simon::SimonColor;
use crate::games::{ActiveGame, pixel_art::GRID_SIZE};
use crate::levels::LevelEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ConfettiClick,
    DragSelect(usize),
    DragTarget,
    /// HTML5 drop on the target
    Drop,
    QuizAnswer(usize),
    MemoryFlip(usize),
    SimonPress(usize),
    LightsToggle(usize),
    PixelColor(u8),
    PixelPaint(usize),
    TriviaSpin,
    TriviaSubmit(String),
    Jump,
    TypingInput(String),
    DebugSubmit(String),
    EmojiGuess(usize),
    SecretSubmit(String),
    Surprise,
}

impl Action {
    /// From a clicked element's `data-action` and `data-idx`, plus the
    /// current value of the level's text field
    pub fn parse(action: &str, idx: Option<&str>, text: Option<&str>) -> Option<Self> {
        let idx = || idx.and_then(|s| s.trim().parse::<usize>().ok());
        let text = || text.unwrap_or_default().to_string();
        Some(match action {
            "confetti" => Action::ConfettiClick,
            "drag-select" => Action::DragSelect(idx()?),
            "drag-target" => Action::DragTarget,
            "quiz-answer" => Action::QuizAnswer(idx()?),
            "memory-flip" => Action::MemoryFlip(idx()?),
            "simon-press" => Action::SimonPress(idx()?),
            "lights-toggle" => Action::LightsToggle(idx()?),
            "pixel-color" => Action::PixelColor(u8::try_from(idx()?).ok()?),
            "pixel-paint" => Action::PixelPaint(idx()?),
            "trivia-spin" => Action::TriviaSpin,
            "trivia-submit" => Action::TriviaSubmit(text()),
            "platform-jump" => Action::Jump,
            "debug-submit" => Action::DebugSubmit(text()),
            "emoji-guess" => Action::EmojiGuess(idx()?),
            "secret-submit" => Action::SecretSubmit(text()),
            "surprise" => Action::Surprise,
            other => {
                log::debug!("Unknown data-action {:?}", other);
                return None;
            }
        })
    }

    /// Keyboard shortcuts. `input` is the focused field's `data-input` kind
    /// and value.
    pub fn from_key(key: &str, ctrl: bool, input: Option<(&str, &str)>) -> Option<Self> {
        match (key, input) {
            (" " | "ArrowUp", None) => Some(Action::Jump),
            ("Enter", Some(("trivia", value))) => Some(Action::TriviaSubmit(value.to_string())),
            ("Enter", Some(("secret", value))) => Some(Action::SecretSubmit(value.to_string())),
            ("Enter", Some(("debug", value))) if ctrl => Some(Action::DebugSubmit(value.to_string())),
            _ => None,
        }
    }

    /// `input` event on a text field
    pub fn from_input(kind: &str, value: &str) -> Option<Self> {
        (kind == "typing").then(|| Action::TypingInput(value.to_string()))
    }

    /// Apply to the current level's game. False when the game ignored it
    /// (wrong level, locked input, out of range).
    pub fn apply(self, engine: &mut LevelEngine) -> bool {
        engine
            .interact(|game, rng| match (self, game) {
                (Action::ConfettiClick, ActiveGame::ConfettiClicks(g)) => {
                    g.click();
                    true
                }
                (Action::DragSelect(i), ActiveGame::DragDrop(g)) => {
                    g.select_card(i);
                    g.selected() == Some(i)
                }
                (Action::DragTarget, ActiveGame::DragDrop(g)) => g.tap_target(),
                (Action::Drop, ActiveGame::DragDrop(g)) => g.drop_card(),
                (Action::QuizAnswer(i), ActiveGame::Quiz(g)) => g.answer(i).is_some(),
                (Action::MemoryFlip(i), ActiveGame::MemoryMatch(g)) => {
                    g.flip(i) != crate::games::memory::FlipResult::Ignored
                }
                (Action::SimonPress(i), ActiveGame::SimonSays(g)) => SimonColor::ALL
                    .get(i)
                    .and_then(|color| g.press(*color))
                    .is_some(),
                (Action::LightsToggle(i), ActiveGame::LightsOut(g)) => {
                    g.toggle(i);
                    true
                }
                (Action::PixelColor(c), ActiveGame::PixelArt(g)) => {
                    g.select_color(c);
                    g.selected() == c
                }
                (Action::PixelPaint(i), ActiveGame::PixelArt(g)) => {
                    g.paint(i / GRID_SIZE, i % GRID_SIZE);
                    true
                }
                (Action::TriviaSpin, ActiveGame::TriviaWheel(g)) => g.spin(rng).is_some(),
                (Action::TriviaSubmit(answer), ActiveGame::TriviaWheel(g)) => {
                    g.submit(&answer).is_some()
                }
                (Action::Jump, ActiveGame::Platformer(g)) => {
                    g.jump();
                    true
                }
                (Action::TypingInput(value), ActiveGame::TypingChallenge(g)) => {
                    g.input(&value);
                    true
                }
                (Action::DebugSubmit(code), ActiveGame::CodeDebug(g)) => {
                    g.submit(&code);
                    true
                }
                (Action::EmojiGuess(i), ActiveGame::EmojiGuess(g)) => g.guess(i).is_some(),
                (Action::SecretSubmit(text), ActiveGame::SecretCommand(g)) => {
                    g.submit(&text);
                    true
                }
                (Action::Surprise, ActiveGame::Celebration(g)) => {
                    g.reveal_surprise(rng);
                    true
                }
                (action, game) => {
                    log::debug!("{:?} does not apply to {:?}", action, game.kind());
                    false
                }
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_parse_attributes() {
        assert_eq!(Action::parse("memory-flip", Some("3"), None), Some(Action::MemoryFlip(3)));
        assert_eq!(Action::parse("memory-flip", Some("x"), None), None);
        assert_eq!(Action::parse("pixel-color", Some("300"), None), None);
        assert_eq!(
            Action::parse("secret-submit", None, Some("hari")),
            Some(Action::SecretSubmit("hari".into()))
        );
        assert_eq!(Action::parse("nope", None, None), None);
    }

    #[test]
    fn test_keys() {
        assert_eq!(Action::from_key(" ", false, None), Some(Action::Jump));
        assert_eq!(Action::from_key(" ", false, Some(("typing", "a b"))), None);
        assert_eq!(Action::from_key("Enter", false, Some(("debug", "x"))), None);
        assert_eq!(
            Action::from_key("Enter", true, Some(("debug", "x"))),
            Some(Action::DebugSubmit("x".into()))
        );
    }

    #[test]
    fn test_jump_key_only_taken_by_platformer() {
        let mut engine = LevelEngine::standard(&Settings::default(), 5);
        engine.begin().unwrap();
        let jump = Action::from_key(" ", false, None).unwrap();
        assert!(!jump.clone().apply(&mut engine));

        engine.debug_skip(10).unwrap();
        assert!(jump.apply(&mut engine));
    }

    #[test]
    fn test_full_run_through_actions() {
        let mut engine = LevelEngine::standard(&Settings::default(), 5);
        engine.begin().unwrap();
        for _ in 0..5 {
            assert!(Action::ConfettiClick.apply(&mut engine));
        }
        engine.advance(250);
        assert_eq!(engine.current_level(), Some(2));

        // Wrong level for a confetti click
        assert!(!Action::ConfettiClick.apply(&mut engine));
        assert!(Action::Drop.apply(&mut engine));
        engine.advance(700);
        assert_eq!(engine.current_level(), Some(3));

        engine.debug_skip(13).unwrap();
        assert!(Action::SecretSubmit(" HARI ".into()).apply(&mut engine));
        engine.advance(900);
        assert_eq!(engine.current_level(), Some(14));
        assert!(Action::Surprise.apply(&mut engine));
    }
}
