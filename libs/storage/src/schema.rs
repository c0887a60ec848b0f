//! Persisted-state layout
//!
//! Every namespace the firmware writes carries a `ver` key. Key names here
//! must stay stable across firmware updates: renaming one silently resets
//! that setting to its default on the next read.

use crate::preferences::Preferences;

/// Current layout version written to every namespace.
pub const SCHEMA_VERSION: u8 = 1;

/// Key holding the layout version inside each namespace.
pub const VERSION_KEY: &str = "ver";

/// Navigation position, restored at boot.
pub mod nav {
    pub const NAMESPACE: &str = "nav";
    pub const APP_ID: &str = "appId";
    pub const SCREEN_ID: &str = "screenId";
}

/// Life counter game state.
pub mod mtg {
    pub const NAMESPACE: &str = "mtg";
    pub const PLAYER_COUNT: &str = "playerCnt";
    pub const STARTING_LIFE: &str = "startLife";

    /// `p{N}name`, players numbered from 1.
    pub fn player_name_key(player: usize) -> String {
        format!("p{player}name")
    }

    /// `p{N}life`, players numbered from 1.
    pub fn player_life_key(player: usize) -> String {
        format!("p{player}life")
    }
}

/// System settings.
pub mod settings {
    pub const NAMESPACE: &str = "settings";
    pub const SOUND_ON: &str = "soundOn";
    /// Inactivity timeout in seconds, 0 disables sleep.
    pub const SLEEP_SECS: &str = "sleepSecs";
    pub const WIFI_AUTO: &str = "wifiAuto";
}

/// Stored Wi-Fi credentials, cleared on explicit disconnect.
pub mod wifi {
    pub const NAMESPACE: &str = "wifi";
    pub const SSID: &str = "ssid";
    pub const PASS: &str = "pass";
}

/// Whether the open namespace was written by a layout this firmware
/// understands. A namespace without a version key predates versioning and is
/// read as version 1.
pub fn is_supported(prefs: &dyn Preferences) -> bool {
    let version = prefs.get_u8(VERSION_KEY, 1);
    if version > SCHEMA_VERSION {
        log::warn!("Stored layout version {version} is newer than {SCHEMA_VERSION}, using defaults");
        return false;
    }
    true
}

/// Record the current layout version in the open namespace.
pub fn stamp(prefs: &mut dyn Preferences) -> bool {
    prefs.put_u8(VERSION_KEY, SCHEMA_VERSION)
}
