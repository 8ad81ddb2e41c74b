//! Level 10: endless-runner platformer
//!
//! One physics step per animation frame (no fixed timestep). The win is
//! wall-clock: survive 12 seconds. A collision freezes the run and asks
//! the engine to re-run the initializer after a short delay.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{BonusTiming, Completion, CompletionLatch, MiniGame, tick_delay};

/// Jump velocity (px/frame)
pub const JUMP_POWER: f32 = 32.0;
/// Vertical acceleration (px/frame²)
pub const GRAVITY: f32 = -2.3;
pub const OBSTACLE_START_X: f32 = 540.0;
pub const BASE_SPEED: f32 = 5.2;
/// Speed added each time the obstacle wraps around
pub const SPEED_STEP: f32 = 0.2;
/// Obstacle wraps once its left edge passes this
pub const OBSTACLE_EXIT_X: f32 = -28.0;
/// Respawn x is drawn from [RESPAWN_MIN_X, RESPAWN_MIN_X + RESPAWN_SPREAD)
pub const RESPAWN_MIN_X: f32 = 340.0;
pub const RESPAWN_SPREAD: f32 = 40.0;
/// Ground offset used when rendering the player
pub const GROUND_PX: f32 = 18.0;

pub const SURVIVE_MS: u32 = 12_000;
pub const RETRY_DELAY_MS: u32 = 1_200;

const PLAYER_HITBOX: Aabb = Aabb::new(Vec2::new(40.0, 0.0), Vec2::new(32.0, 32.0));
const OBSTACLE_HITBOX: Aabb = Aabb::new(Vec2::new(0.0, 18.0), Vec2::new(28.0, 36.0));

const NEXT: Completion = Completion::new(11, 1300, BonusTiming::Immediate);

/// Axis-aligned box, `min` is the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self::new(self.min + by, self.size)
    }

    /// Strict overlap; touching edges don't count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let a_max = self.min + self.size;
        let b_max = other.min + other.size;
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Hit the obstacle; re-initialize when the delay runs out
    Failed { retry_in_ms: u32 },
    Won,
}

#[derive(Debug, Clone)]
pub struct Platformer {
    /// Player height above the ground
    y: f32,
    vy: f32,
    jumping: bool,
    obstacle_x: f32,
    speed: f32,
    elapsed_ms: u32,
    state: RunState,
    latch: CompletionLatch,
}

impl Default for Platformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Platformer {
    pub fn new() -> Self {
        Self {
            y: 0.0,
            vy: 0.0,
            jumping: false,
            obstacle_x: OBSTACLE_START_X,
            speed: BASE_SPEED,
            elapsed_ms: 0,
            state: RunState::Running,
            latch: CompletionLatch::default(),
        }
    }

    pub fn player_y(&self) -> f32 {
        self.y
    }

    pub fn obstacle_x(&self) -> f32 {
        self.obstacle_x
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_airborne(&self) -> bool {
        self.jumping
    }

    pub fn jump(&mut self) {
        if self.state == RunState::Running && !self.jumping {
            self.vy = JUMP_POWER;
            self.jumping = true;
        }
    }

    fn player_box(&self) -> Aabb {
        PLAYER_HITBOX.offset(Vec2::new(0.0, self.y))
    }

    fn obstacle_box(&self) -> Aabb {
        OBSTACLE_HITBOX.offset(Vec2::new(self.obstacle_x, 0.0))
    }

    /// One animation frame of physics. Returns true on collision.
    pub fn step_frame(&mut self, rng: &mut Pcg32) -> bool {
        if self.state != RunState::Running {
            return false;
        }

        self.vy += GRAVITY;
        self.y += self.vy;
        if self.y < 0.0 {
            self.y = 0.0;
            self.vy = 0.0;
            self.jumping = false;
        }

        self.obstacle_x -= self.speed;
        if self.obstacle_x < OBSTACLE_EXIT_X {
            self.obstacle_x = RESPAWN_MIN_X + rng.random::<f32>() * RESPAWN_SPREAD;
            self.speed += SPEED_STEP;
        }

        if self.player_box().overlaps(&self.obstacle_box()) {
            log::debug!("Platformer collision at {}ms", self.elapsed_ms);
            self.state = RunState::Failed {
                retry_in_ms: RETRY_DELAY_MS,
            };
            return true;
        }
        false
    }
}

impl MiniGame for Platformer {
    fn advance(&mut self, dt_ms: u32, rng: &mut Pcg32) {
        match &mut self.state {
            RunState::Running => {
                self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms);
                if self.elapsed_ms >= SURVIVE_MS {
                    self.state = RunState::Won;
                    self.latch.fire(NEXT);
                    return;
                }
                self.step_frame(rng);
            }
            RunState::Failed { retry_in_ms } => {
                tick_delay(retry_in_ms, dt_ms);
            }
            RunState::Won => {}
        }
    }

    fn take_completion(&mut self) -> Option<Completion> {
        self.latch.take()
    }

    fn wants_reinit(&self) -> bool {
        matches!(self.state, RunState::Failed { retry_in_ms: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::rng;

    const FRAME_MS: u32 = 16;

    #[test]
    fn test_idle_player_collides() {
        let mut rng = rng();
        let mut game = Platformer::new();
        let mut frames = 0;
        while game.state() == RunState::Running {
            game.advance(FRAME_MS, &mut rng);
            frames += 1;
            assert!(frames < 1_000);
        }
        assert!(matches!(game.state(), RunState::Failed { .. }));
        assert!(game.elapsed_ms() < SURVIVE_MS);
        assert!(!game.wants_reinit());

        game.advance(RETRY_DELAY_MS, &mut rng);
        assert!(game.wants_reinit());
        assert_eq!(game.take_completion(), None);
    }

    #[test]
    fn test_jump_arc_lands() {
        let mut rng = rng();
        let mut game = Platformer::new();
        game.jump();
        assert!(game.is_airborne());
        game.step_frame(&mut rng);
        assert!(game.player_y() > 0.0);
        // A second jump mid-air does nothing
        let first = game.player_y();
        game.jump();
        game.step_frame(&mut rng);
        let second = game.player_y();
        assert!(second - first < first);
        for _ in 0..40 {
            game.step_frame(&mut rng);
        }
        assert!(!game.is_airborne());
        assert_eq!(game.player_y(), 0.0);
    }

    #[test]
    fn test_obstacle_wraps_and_speeds_up() {
        let mut rng = rng();
        let mut game = Platformer::new();
        game.obstacle_x = -25.0;
        assert!(!game.step_frame(&mut rng));
        assert!((game.speed() - (BASE_SPEED + SPEED_STEP)).abs() < 1e-5);
        assert!(game.obstacle_x() >= RESPAWN_MIN_X);
        assert!(game.obstacle_x() < RESPAWN_MIN_X + RESPAWN_SPREAD);
    }

    #[test]
    fn test_surviving_twelve_seconds_wins() {
        let mut rng = rng();
        let mut game = Platformer::new();
        // Park the obstacle out of reach and let the clock run
        game.obstacle_x = 10_000.0;
        game.advance(SURVIVE_MS, &mut rng);
        assert_eq!(game.state(), RunState::Won);
        assert_eq!(game.take_completion(), Some(NEXT));
        game.jump();
        assert!(!game.is_airborne());
    }

    #[test]
    fn test_aabb_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.overlaps(&a.offset(Vec2::new(5.0, 5.0))));
        assert!(!a.overlaps(&a.offset(Vec2::new(10.0, 0.0))));
    }
}
