//! Device-specific paths for the inkdeck image
//!
//! Everything the firmware reads or writes outside its own preferences
//! directory is named here.

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "INKDECK_CONFIG";

/// Config file read at boot
pub const DEFAULT_CONFIG_PATH: &str = "/etc/inkdeck/config.json";

/// Preferences store, one JSON document per namespace
pub const DEFAULT_PREFS_DIR: &str = "/var/lib/inkdeck/prefs";

/// NetworkManager command-line client
pub const NMCLI: &str = "nmcli";

/// Wireless interface managed by NetworkManager
pub const DEFAULT_WIFI_INTERFACE: &str = "wlan0";
