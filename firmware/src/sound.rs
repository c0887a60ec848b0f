//! Audible tap feedback
//!
//! The panel has no buzzer of its own. When a click command is configured
//! (for example `aplay` with a short sample) it is started for each tap
//! while sound is enabled.

use crate::util;
use std::cell::Cell;

pub struct Sound {
    command: Vec<String>,
    enabled: Cell<bool>,
}

impl Sound {
    pub fn new(command: Vec<String>, enabled: bool) -> Self {
        Self {
            command,
            enabled: Cell::new(enabled),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.set(enabled);
    }

    /// Whether `click` would start the command.
    pub fn is_audible(&self) -> bool {
        self.is_enabled() && !self.command.is_empty()
    }

    pub fn click(&self) {
        if !self.is_audible() {
            return;
        }
        let Some((cmd, args)) = self.command.split_first() else {
            return;
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        if let Err(e) = util::spawn_command(cmd, &args) {
            log::debug!("Click sound failed: {e}");
        }
    }
}

#[cfg(test)]
impl Sound {
    /// No command, never audible.
    pub fn silent() -> Self {
        Self::new(Vec::new(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audible_only_when_enabled_with_command() {
        let sound = Sound::new(vec!["/bin/true".to_string()], true);
        assert!(sound.is_audible());
        sound.set_enabled(false);
        assert!(!sound.is_audible());
        assert!(!Sound::silent().is_audible());
    }

    #[test]
    fn click_without_command_is_harmless() {
        let sound = Sound::new(Vec::new(), true);
        sound.click();
    }
}
