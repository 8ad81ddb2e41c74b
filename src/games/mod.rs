//! Minigame session state
//!
//! Every level owns one of these. They are plain data: no DOM, no clocks.
//! Time only moves through `advance(dt_ms)`, randomness only comes from the
//! engine's seeded `Pcg32`, and a win is reported once through
//! `take_completion()`.

pub mod celebration;
pub mod code_debug;
pub mod confetti;
pub mod drag_drop;
pub mod emoji;
pub mod lights_out;
pub mod memory;
pub mod pixel_art;
pub mod platformer;
pub mod quiz;
pub mod secret_command;
pub mod simon;
pub mod trivia;
pub mod typing;

pub use celebration::Celebration;
pub use code_debug::CodeDebug;
pub use confetti::ConfettiClicks;
pub use drag_drop::DragDrop;
pub use emoji::EmojiGuess;
pub use lights_out::LightsOut;
pub use memory::MemoryMatch;
pub use pixel_art::PixelArt;
pub use platformer::Platformer;
pub use quiz::Quiz;
pub use secret_command::SecretCommand;
pub use simon::SimonSays;
pub use trivia::TriviaWheel;
pub use typing::TypingChallenge;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// When the countdown bonus for a win is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusTiming {
    /// As soon as the win is detected
    Immediate,
    /// When the delayed level transition fires
    OnTransition,
}

/// A minigame's win signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub next_level: u32,
    /// Time the success message stays up before the transition
    pub delay_ms: u32,
    pub bonus: BonusTiming,
}

impl Completion {
    pub const fn new(next_level: u32, delay_ms: u32, bonus: BonusTiming) -> Self {
        Self {
            next_level,
            delay_ms,
            bonus,
        }
    }
}

/// Fires a completion at most once per session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionLatch {
    fired: bool,
    pending: Option<Completion>,
}

impl CompletionLatch {
    /// Record the win. Returns false if it already fired.
    pub fn fire(&mut self, completion: Completion) -> bool {
        if self.fired {
            return false;
        }
        self.fired = true;
        self.pending = Some(completion);
        true
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn take(&mut self) -> Option<Completion> {
        self.pending.take()
    }
}

/// Common contract of all minigames
pub trait MiniGame {
    /// Advance internal timers (feedback delays, playback, physics)
    fn advance(&mut self, _dt_ms: u32, _rng: &mut Pcg32) {}

    /// Hand the win signal to the engine, once
    fn take_completion(&mut self) -> Option<Completion>;

    /// The game wants its initializer re-run (lost platformer run)
    fn wants_reinit(&self) -> bool {
        false
    }
}

/// Which minigame a level hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    ConfettiClicks,
    DragDrop,
    Quiz,
    MemoryMatch,
    SimonSays,
    TypingChallenge,
    LightsOut,
    PixelArt,
    TriviaWheel,
    Platformer,
    CodeDebug,
    EmojiGuess,
    SecretCommand,
    Celebration,
}

impl GameKind {
    pub const fn name(&self) -> &'static str {
        match self {
            GameKind::ConfettiClicks => "Confetti Clicks",
            GameKind::DragDrop => "Drag & Drop",
            GameKind::Quiz => "Quiz",
            GameKind::MemoryMatch => "Memory Game",
            GameKind::SimonSays => "Simon Says",
            GameKind::TypingChallenge => "Typing Challenge",
            GameKind::LightsOut => "Logic Puzzle",
            GameKind::PixelArt => "Pixel Art",
            GameKind::TriviaWheel => "Trivia Wheel",
            GameKind::Platformer => "Platformer",
            GameKind::CodeDebug => "Code Debugging",
            GameKind::EmojiGuess => "Emoji Guessing",
            GameKind::SecretCommand => "Secret Command",
            GameKind::Celebration => "Celebration",
        }
    }

    /// DOM element the game renders into
    pub fn root_id(&self) -> &'static str {
        match self {
            GameKind::ConfettiClicks => "confetti-counter",
            GameKind::DragDrop => "draggable-area",
            GameKind::Quiz => "quiz-container",
            GameKind::MemoryMatch => "memory-game-root",
            GameKind::SimonSays => "simon-says-root",
            GameKind::TypingChallenge => "typing-challenge-root",
            GameKind::LightsOut => "logic-puzzle-root",
            GameKind::PixelArt => "pixel-art-root",
            GameKind::TriviaWheel => "trivia-wheel-root",
            GameKind::Platformer => "platformer-root",
            GameKind::CodeDebug => "fun-level11",
            GameKind::EmojiGuess => "fun-level12",
            GameKind::SecretCommand => "secret-command-root",
            GameKind::Celebration => "fun-level14",
        }
    }

    /// Build fresh session state
    pub fn build(&self, rng: &mut Pcg32) -> Result<ActiveGame, GameError> {
        Ok(match self {
            GameKind::ConfettiClicks => ActiveGame::ConfettiClicks(ConfettiClicks::new()),
            GameKind::DragDrop => ActiveGame::DragDrop(DragDrop::new()),
            GameKind::Quiz => ActiveGame::Quiz(Quiz::new(quiz::QUIZ_QUESTIONS)?),
            GameKind::MemoryMatch => ActiveGame::MemoryMatch(MemoryMatch::new(rng)),
            GameKind::SimonSays => ActiveGame::SimonSays(SimonSays::new(rng)),
            GameKind::TypingChallenge => {
                ActiveGame::TypingChallenge(TypingChallenge::random(rng)?)
            }
            GameKind::LightsOut => ActiveGame::LightsOut(LightsOut::standard()),
            GameKind::PixelArt => ActiveGame::PixelArt(PixelArt::new()),
            GameKind::TriviaWheel => ActiveGame::TriviaWheel(TriviaWheel::new()),
            GameKind::Platformer => ActiveGame::Platformer(Platformer::new()),
            GameKind::CodeDebug => ActiveGame::CodeDebug(CodeDebug::random(rng)?),
            GameKind::EmojiGuess => ActiveGame::EmojiGuess(EmojiGuess::random(rng)?),
            GameKind::SecretCommand => ActiveGame::SecretCommand(SecretCommand::new()),
            GameKind::Celebration => ActiveGame::Celebration(Celebration::new(rng)),
        })
    }
}

/// Live session state of one level
#[derive(Debug, Clone)]
pub enum ActiveGame {
    ConfettiClicks(ConfettiClicks),
    DragDrop(DragDrop),
    Quiz(Quiz),
    MemoryMatch(MemoryMatch),
    SimonSays(SimonSays),
    TypingChallenge(TypingChallenge),
    LightsOut(LightsOut),
    PixelArt(PixelArt),
    TriviaWheel(TriviaWheel),
    Platformer(Platformer),
    CodeDebug(CodeDebug),
    EmojiGuess(EmojiGuess),
    SecretCommand(SecretCommand),
    Celebration(Celebration),
}

impl ActiveGame {
    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::ConfettiClicks(_) => GameKind::ConfettiClicks,
            ActiveGame::DragDrop(_) => GameKind::DragDrop,
            ActiveGame::Quiz(_) => GameKind::Quiz,
            ActiveGame::MemoryMatch(_) => GameKind::MemoryMatch,
            ActiveGame::SimonSays(_) => GameKind::SimonSays,
            ActiveGame::TypingChallenge(_) => GameKind::TypingChallenge,
            ActiveGame::LightsOut(_) => GameKind::LightsOut,
            ActiveGame::PixelArt(_) => GameKind::PixelArt,
            ActiveGame::TriviaWheel(_) => GameKind::TriviaWheel,
            ActiveGame::Platformer(_) => GameKind::Platformer,
            ActiveGame::CodeDebug(_) => GameKind::CodeDebug,
            ActiveGame::EmojiGuess(_) => GameKind::EmojiGuess,
            ActiveGame::SecretCommand(_) => GameKind::SecretCommand,
            ActiveGame::Celebration(_) => GameKind::Celebration,
        }
    }

    fn as_mini_game_mut(&mut self) -> &mut dyn MiniGame {
        match self {
            ActiveGame::ConfettiClicks(g) => g,
            ActiveGame::DragDrop(g) => g,
            ActiveGame::Quiz(g) => g,
            ActiveGame::MemoryMatch(g) => g,
            ActiveGame::SimonSays(g) => g,
            ActiveGame::TypingChallenge(g) => g,
            ActiveGame::LightsOut(g) => g,
            ActiveGame::PixelArt(g) => g,
            ActiveGame::TriviaWheel(g) => g,
            ActiveGame::Platformer(g) => g,
            ActiveGame::CodeDebug(g) => g,
            ActiveGame::EmojiGuess(g) => g,
            ActiveGame::SecretCommand(g) => g,
            ActiveGame::Celebration(g) => g,
        }
    }

    pub fn advance(&mut self, dt_ms: u32, rng: &mut Pcg32) {
        self.as_mini_game_mut().advance(dt_ms, rng);
    }

    pub fn take_completion(&mut self) -> Option<Completion> {
        self.as_mini_game_mut().take_completion()
    }

    pub fn wants_reinit(&mut self) -> bool {
        self.as_mini_game_mut().wants_reinit()
    }
}

/// Pick a random index into a content pool
pub fn pick_index<T>(rng: &mut Pcg32, pool: &[T], what: &'static str) -> Result<usize, GameError> {
    if pool.is_empty() {
        return Err(GameError::EmptyPool(what));
    }
    Ok(rng.random_range(0..pool.len()))
}

/// Count down a delay; true when it reaches zero on this call
pub(crate) fn tick_delay(remaining_ms: &mut u32, dt_ms: u32) -> bool {
    if *remaining_ms == 0 {
        return false;
    }
    *remaining_ms = remaining_ms.saturating_sub(dt_ms);
    *remaining_ms == 0
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    pub fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(12345)
    }
}
