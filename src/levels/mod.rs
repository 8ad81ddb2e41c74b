//! Level progression engine
//!
//! Owns the countdown, the per-level game sessions and the delayed
//! transitions. Everything is driven by `advance(dt_ms)` from the frame
//! loop and by `interact` for input, so a run is fully reproducible from a
//! seed and a sequence of calls.

pub mod registry;

pub use registry::{LevelDefinition, LevelRegistry};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::LevelError;
use crate::games::{ActiveGame, BonusTiming, Completion};
use crate::settings::Settings;
use crate::timer::Countdown;

/// Things the presentation layer reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A level became current
    LevelShown(u32),
    /// Countdown reached zero; every level is hidden
    TimeUp,
    /// Countdown extended
    BonusAdded { seconds: u32, remaining: u32 },
    /// A game rebuilt itself (lost platformer run)
    GameReset(u32),
    /// A level initializer failed; the level is shown without a game
    InitFailed { level: u32, message: String },
}

/// Progress bar state for the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub total: u32,
    pub percent: u32,
}

impl Progress {
    pub fn label(&self) -> String {
        format!("Level {} of {}", self.level, self.total)
    }
}

/// A win waiting out its display delay
#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    remaining_ms: u32,
    next_level: u32,
    /// Apply the countdown bonus when this fires
    bonus_on_fire: bool,
}

pub struct LevelEngine {
    registry: LevelRegistry,
    current: Option<u32>,
    /// Session state per level, index = level - 1
    games: Vec<Option<ActiveGame>>,
    countdown: Countdown,
    pending: Vec<PendingTransition>,
    rng: Pcg32,
    bonus_secs: u32,
    /// Bumped whenever the visible level or its session is replaced
    generation: u64,
    events: Vec<EngineEvent>,
}

impl LevelEngine {
    pub fn new(registry: LevelRegistry, settings: &Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut events = Vec::new();

        // Levels without an initializer are set up once, up front
        let games = registry
            .iter()
            .map(|def| {
                if def.reinit_on_show {
                    return None;
                }
                match def.game.build(&mut rng) {
                    Ok(game) => Some(game),
                    Err(e) => {
                        log::error!("Failed to set up level {}: {}", def.level, e);
                        events.push(EngineEvent::InitFailed {
                            level: def.level,
                            message: e.to_string(),
                        });
                        None
                    }
                }
            })
            .collect();

        log::info!(
            "Level engine ready: {} levels, {}s countdown, seed {}",
            registry.len(),
            settings.initial_seconds,
            seed
        );

        Self {
            registry,
            current: None,
            games,
            countdown: Countdown::new(settings.initial_seconds),
            pending: Vec::new(),
            rng,
            bonus_secs: settings.bonus_seconds,
            generation: 0,
            events,
        }
    }

    /// Standard 14-level progression
    pub fn standard(settings: &Settings, seed: u64) -> Self {
        Self::new(LevelRegistry::standard(), settings, seed)
    }

    /// Start the countdown and show level 1
    pub fn begin(&mut self) -> Result<(), LevelError> {
        if self.current.is_some() {
            log::warn!("Progression already started");
            return Ok(());
        }
        self.countdown.start();
        self.show_level(1)
    }

    pub fn registry(&self) -> &LevelRegistry {
        &self.registry
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn current_level(&self) -> Option<u32> {
        self.current
    }

    pub fn is_expired(&self) -> bool {
        self.countdown.is_expired()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn game(&self, level: u32) -> Option<&ActiveGame> {
        let idx = (level as usize).checked_sub(1)?;
        self.games.get(idx)?.as_ref()
    }

    pub fn current_game(&self) -> Option<&ActiveGame> {
        self.game(self.current?)
    }

    /// Whether the container for `level` is displayed
    pub fn is_visible(&self, level: u32) -> bool {
        !self.is_expired() && self.current == Some(level)
    }

    /// Display state of every level container, in order
    pub fn container_visibility(&self) -> Vec<(String, bool)> {
        self.registry
            .iter()
            .map(|def| (def.container_id(), self.is_visible(def.level)))
            .collect()
    }

    /// Progress bar state, only for levels inside the registry
    pub fn progress(&self) -> Option<Progress> {
        let level = self.current?;
        let total = self.registry.len();
        if !(1..=total).contains(&level) {
            return None;
        }
        Some(Progress {
            level,
            total,
            percent: crate::progress_percent(level, total),
        })
    }

    /// Make `n` the only visible level, running its initializer
    pub fn show_level(&mut self, n: i64) -> Result<(), LevelError> {
        if n < 1 {
            log::error!("show_level called with invalid value: {}", n);
            return Err(LevelError::Invalid(n));
        }
        if self.is_expired() {
            log::error!("show_level({}) after the countdown expired", n);
            return Err(LevelError::Expired(n));
        }

        let total = self.registry.len();
        let level = u32::try_from(n).unwrap_or(u32::MAX);
        self.current = Some(level);
        self.generation += 1;

        let Some(def) = self.registry.get(level).copied() else {
            log::warn!(
                "show_level called with level {} which exceeds total levels ({})",
                n,
                total
            );
            return Ok(());
        };

        log::debug!("Showing level {} ({})", level, def.name);
        if def.reinit_on_show {
            let idx = (level - 1) as usize;
            self.games[idx] = match def.game.build(&mut self.rng) {
                Ok(game) => Some(game),
                Err(e) => {
                    log::error!("Error initializing level {}: {}", level, e);
                    self.events.push(EngineEvent::InitFailed {
                        level,
                        message: e.to_string(),
                    });
                    None
                }
            };
        }
        self.events.push(EngineEvent::LevelShown(level));
        Ok(())
    }

    /// Advance to `next` and extend the countdown
    pub fn complete_level(&mut self, next: i64) -> Result<(), LevelError> {
        self.show_level(next)?;
        self.add_bonus();
        Ok(())
    }

    /// Complete-level marker; `text` is its `data-next` attribute
    pub fn complete_level_attr(&mut self, text: &str) -> Result<(), LevelError> {
        match text.trim().parse::<i64>() {
            Ok(next) if next != 0 => self.complete_level(next),
            _ => {
                log::warn!("Ignoring complete-level marker with data-next {:?}", text);
                Err(LevelError::Unparsable(text.to_string()))
            }
        }
    }

    /// Developer level skip
    pub fn debug_skip(&mut self, level: i64) -> Result<(), LevelError> {
        let total = self.registry.len();
        if level < 1 || level > total as i64 {
            return Err(LevelError::OutOfRange { level, total });
        }
        log::info!("Debug skip to level {}", level);
        self.complete_level(level)
    }

    fn add_bonus(&mut self) {
        if self.is_expired() {
            return;
        }
        let remaining = self.countdown.extend(self.bonus_secs);
        self.events.push(EngineEvent::BonusAdded {
            seconds: self.bonus_secs,
            remaining,
        });
    }

    /// Act on the current level's game, then pick up any win it produced
    pub fn interact<R>(&mut self, f: impl FnOnce(&mut ActiveGame, &mut Pcg32) -> R) -> Option<R> {
        if self.is_expired() {
            return None;
        }
        let level = self.current?;
        let idx = (level as usize).checked_sub(1)?;
        let game = self.games.get_mut(idx)?.as_mut()?;
        let out = f(game, &mut self.rng);
        self.harvest(level);
        Some(out)
    }

    fn harvest(&mut self, level: u32) {
        let Some(completion) = (level as usize)
            .checked_sub(1)
            .and_then(|idx| self.games.get_mut(idx))
            .and_then(|slot| slot.as_mut())
            .and_then(|game| game.take_completion())
        else {
            return;
        };
        self.schedule(level, completion);
    }

    fn schedule(&mut self, level: u32, completion: Completion) {
        log::info!(
            "Level {} complete, level {} in {}ms",
            level,
            completion.next_level,
            completion.delay_ms
        );
        if completion.bonus == BonusTiming::Immediate {
            self.add_bonus();
        }
        self.pending.push(PendingTransition {
            remaining_ms: completion.delay_ms,
            next_level: completion.next_level,
            bonus_on_fire: completion.bonus == BonusTiming::OnTransition,
        });
        if completion.delay_ms == 0 {
            self.fire_due(0);
        }
    }

    fn fire_due(&mut self, dt_ms: u32) {
        let mut due = Vec::new();
        self.pending.retain_mut(|p| {
            p.remaining_ms = p.remaining_ms.saturating_sub(dt_ms);
            if p.remaining_ms == 0 {
                due.push(*p);
                false
            } else {
                true
            }
        });
        for transition in due {
            let next = transition.next_level as i64;
            let result = if transition.bonus_on_fire {
                self.complete_level(next)
            } else {
                self.show_level(next)
            };
            if let Err(e) = result {
                log::error!("Transition to level {} failed: {}", next, e);
            }
        }
    }

    /// One frame: countdown, delayed transitions, the current game
    pub fn advance(&mut self, dt_ms: u32) -> Vec<EngineEvent> {
        if self.countdown.advance(dt_ms) {
            log::info!("Time's up, hiding all levels");
            self.pending.clear();
            self.current = None;
            self.generation += 1;
            self.events.push(EngineEvent::TimeUp);
        }
        if self.is_expired() {
            return self.drain_events();
        }

        self.fire_due(dt_ms);

        if let Some(level) = self.current {
            self.advance_game(level, dt_ms);
        }
        self.drain_events()
    }

    fn advance_game(&mut self, level: u32, dt_ms: u32) {
        let Some(idx) = (level as usize).checked_sub(1) else {
            return;
        };
        let Some(game) = self.games.get_mut(idx).and_then(|slot| slot.as_mut()) else {
            return;
        };
        game.advance(dt_ms, &mut self.rng);

        if game.wants_reinit() {
            let kind = game.kind();
            match kind.build(&mut self.rng) {
                Ok(fresh) => {
                    log::debug!("Re-initializing level {}", level);
                    *game = fresh;
                    self.generation += 1;
                    self.events.push(EngineEvent::GameReset(level));
                }
                Err(e) => log::error!("Error re-initializing level {}: {}", level, e),
            }
            return;
        }
        self.harvest(level);
    }

    /// Events produced outside `advance` (show, complete, interact)
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::TOTAL_LEVELS;
    use crate::games::platformer;
    use proptest::prelude::*;

    fn engine() -> LevelEngine {
        let mut engine = LevelEngine::standard(&Settings::default(), 99);
        engine.begin().unwrap();
        engine.drain_events();
        engine
    }

    fn visible_count(engine: &LevelEngine) -> usize {
        engine
            .container_visibility()
            .iter()
            .filter(|(_, shown)| *shown)
            .count()
    }

    #[test]
    fn test_begin_shows_level_one() {
        let engine = engine();
        assert_eq!(engine.current_level(), Some(1));
        assert_eq!(visible_count(&engine), 1);
        assert!(engine.countdown().is_running());
        assert_eq!(engine.progress().map(|p| p.label()), Some("Level 1 of 14".into()));
    }

    #[test]
    fn test_confetti_clicks_advance_with_bonus() {
        let mut engine = engine();
        for _ in 0..5 {
            engine.interact(|game, _| {
                if let ActiveGame::ConfettiClicks(g) = game {
                    g.click();
                }
            });
        }
        // Bonus waits for the transition
        assert_eq!(engine.countdown().remaining_secs(), 60);
        let events = engine.advance(249);
        assert!(events.is_empty());
        let events = engine.advance(1);
        assert!(events.contains(&EngineEvent::LevelShown(2)));
        assert_eq!(engine.current_level(), Some(2));
        assert_eq!(engine.countdown().remaining_secs(), 120);
        assert_eq!(engine.progress().map(|p| p.percent), Some(14));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let mut engine = engine();
        let generation = engine.generation();
        assert_eq!(engine.show_level(0), Err(LevelError::Invalid(0)));
        assert_eq!(engine.show_level(-3), Err(LevelError::Invalid(-3)));
        assert_eq!(engine.current_level(), Some(1));
        assert_eq!(engine.generation(), generation);
    }

    #[test]
    fn test_level_past_end_hides_everything() {
        let mut engine = engine();
        engine.show_level(15).unwrap();
        assert_eq!(visible_count(&engine), 0);
        assert_eq!(engine.progress(), None);
    }

    #[test]
    fn test_expiry_is_terminal() {
        let mut engine = engine();
        let events = engine.advance(60_000);
        assert_eq!(events, vec![EngineEvent::TimeUp]);
        assert!(engine.is_expired());
        assert_eq!(visible_count(&engine), 0);
        assert_eq!(engine.countdown().label(), "Time's up!");
        assert!(engine.advance(5_000).is_empty());
        assert_eq!(engine.show_level(2), Err(LevelError::Expired(2)));
        assert!(engine.interact(|_, _| ()).is_none());
    }

    #[test]
    fn test_expiry_drops_pending_transition() {
        let mut engine = LevelEngine::standard(
            &Settings {
                initial_seconds: 1,
                ..Settings::default()
            },
            1,
        );
        engine.begin().unwrap();
        engine.debug_skip(2).unwrap();
        engine.interact(|game, _| {
            if let ActiveGame::DragDrop(g) = game {
                g.drop_card();
            }
        });
        engine.advance(61_000);
        engine.advance(1_000);
        assert!(engine.current_level().is_none());
    }

    #[test]
    fn test_lights_out_immediate_bonus() {
        let mut engine = engine();
        engine.debug_skip(7).unwrap();
        let before = engine.countdown().remaining_secs();
        let solved = engine.interact(|game, _| match game {
            ActiveGame::LightsOut(g) => g.toggle(0),
            _ => false,
        });
        assert_eq!(solved, Some(true));
        assert_eq!(engine.countdown().remaining_secs(), before + 60);
        engine.advance(1_299);
        assert_eq!(engine.current_level(), Some(7));
        engine.advance(1);
        assert_eq!(engine.current_level(), Some(8));
        // No second bonus on transition
        assert_eq!(engine.countdown().remaining_secs(), before + 60 - 1);
    }

    #[test]
    fn test_quiz_transitions_after_summary() {
        let mut engine = engine();
        engine.debug_skip(3).unwrap();
        for _ in 0..4 {
            engine.interact(|game, _| {
                if let ActiveGame::Quiz(q) = game {
                    q.answer(0);
                }
            });
            engine.advance(crate::games::quiz::ANSWER_FEEDBACK_MS);
        }
        assert_eq!(engine.current_level(), Some(3));
        let events = engine.advance(crate::games::quiz::SUMMARY_MS);
        assert!(events.contains(&EngineEvent::LevelShown(4)));
        assert!(matches!(engine.current_game(), Some(ActiveGame::MemoryMatch(_))));
    }

    #[test]
    fn test_platformer_loss_reinitializes() {
        let mut engine = engine();
        engine.debug_skip(10).unwrap();
        let mut reset = false;
        for _ in 0..400 {
            let events = engine.advance(16);
            if events.contains(&EngineEvent::GameReset(10)) {
                reset = true;
                break;
            }
        }
        assert!(reset);
        match engine.current_game() {
            Some(ActiveGame::Platformer(p)) => {
                assert_eq!(p.state(), platformer::RunState::Running);
                assert_eq!(p.elapsed_ms(), 0);
                assert_eq!(p.speed(), platformer::BASE_SPEED);
                assert_eq!(p.obstacle_x(), platformer::OBSTACLE_START_X);
                assert_eq!(p.player_y(), 0.0);
                assert!(!p.is_airborne());
            }
            other => panic!("unexpected game {:?}", other.map(|g| g.kind())),
        }
    }

    #[test]
    fn test_complete_level_attr() {
        let mut engine = engine();
        assert!(matches!(
            engine.complete_level_attr("abc"),
            Err(LevelError::Unparsable(_))
        ));
        assert!(matches!(
            engine.complete_level_attr("0"),
            Err(LevelError::Unparsable(_))
        ));
        assert_eq!(engine.current_level(), Some(1));
        engine.complete_level_attr(" 5 ").unwrap();
        assert_eq!(engine.current_level(), Some(5));
        assert_eq!(engine.countdown().remaining_secs(), 120);
    }

    #[test]
    fn test_debug_skip_range() {
        let mut engine = engine();
        assert_eq!(
            engine.debug_skip(15),
            Err(LevelError::OutOfRange {
                level: 15,
                total: TOTAL_LEVELS
            })
        );
        assert!(engine.debug_skip(0).is_err());
        engine.debug_skip(14).unwrap();
        assert!(matches!(engine.current_game(), Some(ActiveGame::Celebration(_))));
    }

    #[test]
    fn test_static_levels_keep_state() {
        let mut engine = engine();
        engine.interact(|game, _| {
            if let ActiveGame::ConfettiClicks(g) = game {
                g.click();
            }
        });
        engine.show_level(2).unwrap();
        engine.show_level(1).unwrap();
        match engine.current_game() {
            Some(ActiveGame::ConfettiClicks(g)) => assert_eq!(g.clicks(), 1),
            _ => panic!("expected confetti"),
        }
    }

    #[test]
    fn test_initializer_runs_on_every_show() {
        let mut engine = engine();
        engine.show_level(7).unwrap();
        engine.interact(|game, _| {
            if let ActiveGame::LightsOut(g) = game {
                g.toggle(1);
            }
        });
        engine.show_level(7).unwrap();
        match engine.current_game() {
            Some(ActiveGame::LightsOut(g)) => {
                assert_eq!(g.cells(), &crate::games::lights_out::STANDARD_BOARD)
            }
            _ => panic!("expected lights out"),
        }
    }

    proptest! {
        #[test]
        fn test_exactly_one_visible(levels in proptest::collection::vec(1i64..=14, 1..20)) {
            let mut engine = engine();
            for level in levels {
                engine.show_level(level).unwrap();
                prop_assert_eq!(visible_count(&engine), 1);
                prop_assert!(engine.is_visible(level as u32));
            }
        }
    }
}
