//! Clock and battery readings shown in the toolbar.

use std::fs;
use std::path::{Path, PathBuf};

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReading {
    /// Local time as `HH:MM`.
    pub clock: String,
    /// Battery charge in percent, `None` when no battery is present.
    pub battery: Option<u8>,
}

pub trait StatusSource {
    fn read(&self) -> StatusReading;
}

/// A fixed reading, for tests and screenshots.
impl StatusSource for StatusReading {
    fn read(&self) -> StatusReading {
        self.clone()
    }
}

/// Reads the local clock and the first battery under
/// `/sys/class/power_supply`.
pub struct SystemStatus {
    capacity_file: Option<PathBuf>,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemStatus {
    pub fn new() -> Self {
        let capacity_file = find_battery(Path::new(POWER_SUPPLY_DIR));
        match &capacity_file {
            Some(path) => log::info!("Battery capacity from {}", path.display()),
            None => log::info!("No battery found under {POWER_SUPPLY_DIR}"),
        }
        Self { capacity_file }
    }
}

impl StatusSource for SystemStatus {
    fn read(&self) -> StatusReading {
        StatusReading {
            clock: chrono::Local::now().format("%H:%M").to_string(),
            battery: self.capacity_file.as_deref().and_then(read_capacity),
        }
    }
}

fn find_battery(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    entries.flatten().map(|e| e.path()).find_map(|supply| {
        let kind = fs::read_to_string(supply.join("type")).ok()?;
        let capacity = supply.join("capacity");
        (kind.trim() == "Battery" && capacity.exists()).then_some(capacity)
    })
}

fn read_capacity(path: &Path) -> Option<u8> {
    let raw = fs::read_to_string(path).ok()?;
    raw.trim().parse::<u8>().ok().map(|pct| pct.min(100))
}
