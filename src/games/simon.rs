//! Level 5: Simon Says
//!
//! Each round appends one random colour and plays the whole sequence back.
//! A wrong press throws the sequence away and starts over from round 0.

use rand::Rng;
use rand_pcg::Pcg32;

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, tick_delay};

pub const ROUNDS_TO_WIN: u32 = 5;
/// Pause before the first playback flash
pub const PLAYBACK_LEAD_MS: u32 = 700;
/// Interval between playback flashes
pub const PLAYBACK_STEP_MS: u32 = 800;
pub const PLAYBACK_FLASH_MS: u32 = 650;
pub const PRESS_FLASH_MS: u32 = 220;
pub const ROUND_PAUSE_MS: u32 = 700;
pub const WRONG_PAUSE_MS: u32 = 1200;

const NEXT: Completion = Completion::new(6, 900, BonusTiming::Immediate);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimonColor {
    Red,
    Green,
    Blue,
    Yellow,
}

impl SimonColor {
    pub const ALL: [SimonColor; 4] = [
        SimonColor::Red,
        SimonColor::Green,
        SimonColor::Blue,
        SimonColor::Yellow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SimonColor::Red => "red",
            SimonColor::Green => "green",
            SimonColor::Blue => "blue",
            SimonColor::Yellow => "yellow",
        }
    }

    pub fn hex(&self) -> &'static str {
        match self {
            SimonColor::Red => "#ff4d4d",
            SimonColor::Green => "#4dff4d",
            SimonColor::Blue => "#4db8ff",
            SimonColor::Yellow => "#ffe066",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimonPhase {
    /// Showing the sequence; `step` flashes when `remaining_ms` runs out
    Playback { step: usize, remaining_ms: u32 },
    /// Player repeats the sequence
    AwaitingInput,
    /// Round cleared, next colour coming
    RoundPause { remaining_ms: u32 },
    /// Wrong press, restarting
    WrongPause { remaining_ms: u32 },
    Won,
}

#[derive(Debug, Clone)]
pub struct SimonSays {
    sequence: Vec<SimonColor>,
    user_step: usize,
    round: u32,
    phase: SimonPhase,
    /// Currently highlighted button and how long it stays lit
    lit: Option<(SimonColor, u32)>,
    status: &'static str,
    latch: CompletionLatch,
}

impl SimonSays {
    pub fn new(rng: &mut Pcg32) -> Self {
        let mut game = Self {
            sequence: Vec::new(),
            user_step: 0,
            round: 0,
            phase: SimonPhase::AwaitingInput,
            lit: None,
            status: "",
            latch: CompletionLatch::default(),
        };
        game.next_round(rng);
        game
    }

    pub fn sequence(&self) -> &[SimonColor] {
        &self.sequence
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> SimonPhase {
        self.phase
    }

    pub fn status(&self) -> &'static str {
        self.status
    }

    pub fn lit(&self) -> Option<SimonColor> {
        self.lit.map(|(color, _)| color)
    }

    pub fn accepts_input(&self) -> bool {
        self.phase == SimonPhase::AwaitingInput
    }

    fn next_round(&mut self, rng: &mut Pcg32) {
        self.user_step = 0;
        let color = SimonColor::ALL[rng.random_range(0..SimonColor::ALL.len())];
        self.sequence.push(color);
        self.status = "Watch the sequence!";
        self.phase = SimonPhase::Playback {
            step: 0,
            remaining_ms: PLAYBACK_LEAD_MS,
        };
    }

    /// Player pressed a colour. `None` while input is locked.
    pub fn press(&mut self, color: SimonColor) -> Option<bool> {
        if !self.accepts_input() {
            return None;
        }
        self.lit = Some((color, PRESS_FLASH_MS));

        if self.sequence.get(self.user_step) != Some(&color) {
            self.status = "Wrong! Try again.";
            self.phase = SimonPhase::WrongPause {
                remaining_ms: WRONG_PAUSE_MS,
            };
            return Some(false);
        }

        self.user_step += 1;
        if self.user_step == self.sequence.len() {
            self.round += 1;
            if self.round == ROUNDS_TO_WIN {
                self.status = "You win! 🎉";
                self.phase = SimonPhase::Won;
                self.latch.fire(NEXT);
            } else {
                self.status = "Good! Next round...";
                self.phase = SimonPhase::RoundPause {
                    remaining_ms: ROUND_PAUSE_MS,
                };
            }
        }
        Some(true)
    }
}

impl MiniGame for SimonSays {
    fn advance(&mut self, dt_ms: u32, rng: &mut Pcg32) {
        if let Some((_, remaining)) = &mut self.lit {
            if tick_delay(remaining, dt_ms) {
                self.lit = None;
            }
        }

        match &mut self.phase {
            SimonPhase::Playback { step, remaining_ms } => {
                if tick_delay(remaining_ms, dt_ms) {
                    let step = *step;
                    match self.sequence.get(step) {
                        Some(color) => {
                            self.lit = Some((*color, PLAYBACK_FLASH_MS));
                            self.phase = SimonPhase::Playback {
                                step: step + 1,
                                remaining_ms: PLAYBACK_STEP_MS,
                            };
                        }
                        None => {
                            self.user_step = 0;
                            self.status = "Your turn!";
                            self.phase = SimonPhase::AwaitingInput;
                        }
                    }
                }
            }
            SimonPhase::RoundPause { remaining_ms } => {
                if tick_delay(remaining_ms, dt_ms) {
                    self.next_round(rng);
                }
            }
            SimonPhase::WrongPause { remaining_ms } => {
                if tick_delay(remaining_ms, dt_ms) {
                    self.round = 0;
                    self.sequence.clear();
                    self.next_round(rng);
                }
            }
            SimonPhase::AwaitingInput | SimonPhase::Won => {}
        }
    }

    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    fn wait_for_input(game: &mut SimonSays, rng: &mut Pcg32) {
        for _ in 0..200 {
            if game.accepts_input() {
                return;
            }
            game.advance(100, rng);
        }
        panic!("playback never finished");
    }

    fn repeat_sequence(game: &mut SimonSays) {
        let sequence = game.sequence().to_vec();
        for color in sequence {
            assert_eq!(game.press(color), Some(true));
        }
    }

    #[test]
    fn test_input_locked_during_playback() {
        let mut rng = rng();
        let mut game = SimonSays::new(&mut rng);
        assert_eq!(game.sequence().len(), 1);
        assert_eq!(game.press(SimonColor::Red), None);
        game.advance(PLAYBACK_LEAD_MS, &mut rng);
        assert_eq!(game.lit(), Some(game.sequence()[0]));
        game.advance(PLAYBACK_STEP_MS, &mut rng);
        assert!(game.accepts_input());
        assert_eq!(game.status(), "Your turn!");
    }

    #[test]
    fn test_sequence_length_tracks_round() {
        let mut rng = rng();
        let mut game = SimonSays::new(&mut rng);
        for round in 1..ROUNDS_TO_WIN {
            wait_for_input(&mut game, &mut rng);
            repeat_sequence(&mut game);
            assert_eq!(game.round(), round);
            assert_eq!(game.sequence().len(), round as usize);
            assert_eq!(game.press(SimonColor::Red), None);
            game.advance(ROUND_PAUSE_MS, &mut rng);
        }
    }

    #[test]
    fn test_wrong_press_resets() {
        let mut rng = rng();
        let mut game = SimonSays::new(&mut rng);
        wait_for_input(&mut game, &mut rng);
        repeat_sequence(&mut game);
        game.advance(ROUND_PAUSE_MS, &mut rng);
        wait_for_input(&mut game, &mut rng);
        assert_eq!(game.round(), 1);

        let first = game.sequence()[0];
        let wrong = SimonColor::ALL
            .into_iter()
            .find(|c| *c != first)
            .unwrap();
        assert_eq!(game.press(wrong), Some(false));
        assert_eq!(game.status(), "Wrong! Try again.");
        assert_eq!(game.round(), 1);

        game.advance(WRONG_PAUSE_MS, &mut rng);
        assert_eq!(game.round(), 0);
        assert_eq!(game.sequence().len(), 1);
        assert!(matches!(game.phase(), SimonPhase::Playback { step: 0, .. }));
    }

    #[test]
    fn test_five_rounds_win() {
        let mut rng = rng();
        let mut game = SimonSays::new(&mut rng);
        for _ in 0..ROUNDS_TO_WIN {
            wait_for_input(&mut game, &mut rng);
            repeat_sequence(&mut game);
            game.advance(ROUND_PAUSE_MS, &mut rng);
        }
        assert_eq!(game.phase(), SimonPhase::Won);
        assert_eq!(game.take_completion(), Some(NEXT));
        assert_eq!(game.take_completion(), None);
    }

    #[test]
    fn test_color_names_round_trip() {
        for color in SimonColor::ALL {
            assert_eq!(SimonColor::from_name(color.name()), Some(color));
        }
        assert_eq!(SimonColor::from_name("purple"), None);
    }
}
