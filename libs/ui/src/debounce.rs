use std::time::{Duration, Instant};

/// Suppresses repeat actions that arrive within `window` of the last one
/// that fired. Noisy touch hardware can report one tap twice.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Debounce {
    pub const BUTTON: Duration = Duration::from_millis(150);
    pub const LIFE_CONTROL: Duration = Duration::from_millis(100);

    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Returns `true` and arms the window if the action may fire at `now`.
    pub fn fire(&mut self, now: Instant) -> bool {
        if self
            .last_fired
            .is_some_and(|last| now.saturating_duration_since(last) < self.window)
        {
            return false;
        }
        self.last_fired = Some(now);
        true
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
