//! Shared countdown clock
//!
//! One countdown per session. It ticks once per whole second of advanced
//! wall-clock time, can be extended while running, and stops for good when
//! it reaches zero. Callers drive it with `advance(dt_ms)`; there is no
//! internal interval.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_MS;
use crate::format_mm_ss;

/// Lifecycle of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownPhase {
    /// Created, not yet started
    Idle,
    /// Decrementing once per second
    Running,
    /// Reached zero; terminal
    Expired,
}

/// The single shared time budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    remaining_secs: u32,
    phase: CountdownPhase,
    /// Milliseconds advanced since the last whole-second tick
    carry_ms: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining_secs: seconds,
            phase: CountdownPhase::Idle,
            carry_ms: 0,
        }
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }

    pub fn is_expired(&self) -> bool {
        self.phase == CountdownPhase::Expired
    }

    /// Start decrementing. Returns false if already running or expired.
    pub fn start(&mut self) -> bool {
        match self.phase {
            CountdownPhase::Idle => {
                log::debug!("Starting countdown with {} seconds", self.remaining_secs);
                self.phase = CountdownPhase::Running;
                true
            }
            CountdownPhase::Running => {
                log::warn!("Countdown already running, ignoring start request");
                false
            }
            CountdownPhase::Expired => {
                log::warn!("Countdown expired, ignoring start request");
                false
            }
        }
    }

    /// Add seconds to the remaining time. Returns the new remaining count.
    pub fn extend(&mut self, seconds: u32) -> u32 {
        if self.is_expired() {
            log::warn!("Countdown expired, ignoring +{}s extension", seconds);
            return self.remaining_secs;
        }
        let old = self.remaining_secs;
        self.remaining_secs = self.remaining_secs.saturating_add(seconds);
        log::debug!(
            "Added {} seconds to countdown ({} -> {})",
            seconds,
            old,
            self.remaining_secs
        );
        self.remaining_secs
    }

    /// Advance wall-clock time. Returns true exactly once, on the call that
    /// takes the countdown to zero.
    pub fn advance(&mut self, dt_ms: u32) -> bool {
        if !self.is_running() {
            return false;
        }

        self.carry_ms = self.carry_ms.saturating_add(dt_ms);
        while self.carry_ms >= TICK_MS {
            self.carry_ms -= TICK_MS;
            self.remaining_secs = self.remaining_secs.saturating_sub(1);

            if self.remaining_secs % 30 == 0 || self.remaining_secs <= 10 {
                log::debug!("Countdown: {} seconds remaining", self.remaining_secs);
            }

            if self.remaining_secs == 0 {
                log::info!("Countdown reached zero");
                self.phase = CountdownPhase::Expired;
                self.carry_ms = 0;
                return true;
            }
        }
        false
    }

    /// `MM:SS`
    pub fn display(&self) -> String {
        format_mm_ss(self.remaining_secs)
    }

    /// Text for the `fun-timer` element
    pub fn label(&self) -> String {
        if self.is_expired() {
            "Time's up!".to_string()
        } else {
            format!("Time Left: {}", self.display())
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(crate::consts::INITIAL_COUNTDOWN_SECS)
    }
}
