//! Repeated-click trigger

pub const CLICKS_TO_UNLOCK: u32 = 5;
/// Count resets after this long without a click
pub const CLICK_RESET_MS: u64 = 3_500;

#[derive(Debug, Clone)]
pub struct ClickCounter {
    required: u32,
    reset_after_ms: u64,
    count: u32,
    last_click_ms: Option<u64>,
}

impl Default for ClickCounter {
    fn default() -> Self {
        Self::new(CLICKS_TO_UNLOCK, CLICK_RESET_MS)
    }
}

impl ClickCounter {
    pub fn new(required: u32, reset_after_ms: u64) -> Self {
        Self {
            required,
            reset_after_ms,
            count: 0,
            last_click_ms: None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Register a click at `now_ms`. True when the threshold is reached.
    pub fn click(&mut self, now_ms: u64) -> bool {
        let idle = self
            .last_click_ms
            .is_some_and(|last| now_ms.saturating_sub(last) >= self.reset_after_ms);
        if idle {
            log::debug!("Click counter idle, resetting");
            self.count = 0;
        }
        self.last_click_ms = Some(now_ms);
        self.count += 1;
        if self.count >= self.required {
            self.count = 0;
            self.last_click_ms = None;
            return true;
        }
        false
    }
}
