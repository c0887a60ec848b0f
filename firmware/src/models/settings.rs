use inkdeck_storage::{SharedPreferences, scoped, schema::{self, settings as keys}};

pub const DEFAULT_SLEEP_SECS: u16 = 300;

/// Auto-sleep choices shown in system settings.
pub const SLEEP_OPTIONS: [(&str, u16); 4] = [("OFF", 0), ("1m", 60), ("5m", 300), ("10m", 600)];

/// Index shown for a stored value that is not one of the choices.
const FALLBACK_SLEEP_INDEX: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub sound_on: bool,
    /// Zero disables auto-sleep
    pub sleep_secs: u16,
    pub wifi_auto: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_on: true,
            sleep_secs: DEFAULT_SLEEP_SECS,
            wifi_auto: false,
        }
    }
}

impl Settings {
    /// Position of `sleep_secs` in `SLEEP_OPTIONS`.
    pub fn sleep_index(&self) -> usize {
        SLEEP_OPTIONS
            .iter()
            .position(|(_, secs)| *secs == self.sleep_secs)
            .unwrap_or(FALLBACK_SLEEP_INDEX)
    }

    /// Load from the `settings` namespace. On failure the settings are reset
    /// to defaults and `false` returned.
    pub fn load(&mut self, prefs: &SharedPreferences) -> bool {
        let loaded = scoped(prefs, keys::NAMESPACE, true, |store| {
            schema::is_supported(store).then(|| Self {
                sound_on: store.get_bool(keys::SOUND_ON, true),
                sleep_secs: store.get_u16(keys::SLEEP_SECS, DEFAULT_SLEEP_SECS),
                wifi_auto: store.get_bool(keys::WIFI_AUTO, false),
            })
        })
        .flatten();
        *self = loaded.unwrap_or_default();
        loaded.is_some()
    }

    pub fn save(&self, prefs: &SharedPreferences) -> bool {
        let saved = scoped(prefs, keys::NAMESPACE, false, |store| {
            schema::stamp(store)
                && store.put_bool(keys::SOUND_ON, self.sound_on)
                && store.put_u16(keys::SLEEP_SECS, self.sleep_secs)
                && store.put_bool(keys::WIFI_AUTO, self.wifi_auto)
        })
        .unwrap_or(false);
        if !saved {
            log::warn!("Failed to save settings");
        }
        saved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkdeck_storage::{MemoryPreferences, shared};

    #[test]
    fn defaults_on_first_boot() {
        let prefs = shared(MemoryPreferences::new());
        let mut settings = Settings {
            sound_on: false,
            sleep_secs: 0,
            wifi_auto: true,
        };
        assert!(settings.load(&prefs));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn save_then_load() {
        let prefs = shared(MemoryPreferences::new());
        let settings = Settings {
            sound_on: false,
            sleep_secs: 600,
            wifi_auto: true,
        };
        assert!(settings.save(&prefs));
        let mut loaded = Settings::default();
        assert!(loaded.load(&prefs));
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unknown_sleep_value_shows_five_minutes() {
        let settings = Settings {
            sleep_secs: 42,
            ..Settings::default()
        };
        assert_eq!(SLEEP_OPTIONS[settings.sleep_index()].0, "5m");
        let off = Settings {
            sleep_secs: 0,
            ..Settings::default()
        };
        assert_eq!(off.sleep_index(), 0);
    }

    #[test]
    fn newer_layout_is_not_loaded() {
        let prefs = shared(MemoryPreferences::new());
        {
            let mut store = prefs.borrow_mut();
            store.begin(keys::NAMESPACE, false);
            store.put_u8(schema::VERSION_KEY, schema::SCHEMA_VERSION + 1);
            store.put_bool(keys::SOUND_ON, false);
            store.end();
        }
        let mut settings = Settings::default();
        assert!(!settings.load(&prefs));
        assert!(settings.sound_on);
    }
}
