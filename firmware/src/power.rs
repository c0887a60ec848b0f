//! Inactivity tracking for auto-sleep

use std::time::{Duration, Instant};

/// Measures time since the last touch.
#[derive(Debug, Clone, Copy)]
pub struct SleepTimer {
    last_activity: Instant,
}

impl SleepTimer {
    pub fn new(now: Instant) -> Self {
        Self { last_activity: now }
    }

    /// Record user activity.
    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// Whether `timeout_secs` of inactivity have passed. Zero disables sleep.
    pub fn expired(&self, now: Instant, timeout_secs: u16) -> bool {
        timeout_secs > 0
            && now.saturating_duration_since(self.last_activity)
                >= Duration::from_secs(u64::from(timeout_secs))
    }
}
