//! Wi-Fi control through NetworkManager's command-line client

use crate::constants::NMCLI;
use crate::models::WifiCredentials;
use crate::util;
use inkdeck_storage::SharedPreferences;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    pub ssid: String,
    /// Approximate dBm, derived from the 0-100 quality nmcli reports
    pub rssi: i32,
    pub secured: bool,
    pub connected: bool,
}

#[derive(Debug, Error)]
pub enum WifiError {
    #[error("{0}")]
    Command(String),

    #[error("could not join '{ssid}': {reason}")]
    Connect { ssid: String, reason: String },
}

pub trait WifiControl {
    /// Visible networks, strongest first with the joined one on top.
    fn scan(&mut self) -> Result<Vec<Network>, WifiError>;

    /// Join `ssid`, waiting at most `timeout`. An empty password joins an
    /// open network.
    fn connect(&mut self, ssid: &str, password: &str, timeout: Duration) -> Result<(), WifiError>;

    fn disconnect(&mut self) -> Result<(), WifiError>;

    fn connected_ssid(&mut self) -> Option<String>;
}

pub struct NmcliWifi {
    interface: String,
}

impl NmcliWifi {
    pub fn new(interface: &str) -> Self {
        Self {
            interface: interface.to_string(),
        }
    }
}

impl WifiControl for NmcliWifi {
    fn scan(&mut self) -> Result<Vec<Network>, WifiError> {
        let output = util::command_output(
            NMCLI,
            &[
                "-t",
                "-f",
                "IN-USE,SSID,SIGNAL,SECURITY",
                "dev",
                "wifi",
                "list",
                "ifname",
                self.interface.as_str(),
                "--rescan",
                "yes",
            ],
        )
        .map_err(WifiError::Command)?;
        let networks = sort_networks(output.lines().filter_map(parse_network).collect());
        log::info!("Scan found {} networks", networks.len());
        Ok(networks)
    }

    fn connect(&mut self, ssid: &str, password: &str, timeout: Duration) -> Result<(), WifiError> {
        let wait = timeout.as_secs().max(1).to_string();
        let mut args = vec!["--wait", wait.as_str(), "dev", "wifi", "connect", ssid];
        if !password.is_empty() {
            args.extend(["password", password]);
        }
        args.extend(["ifname", self.interface.as_str()]);
        log::info!("Connecting to '{ssid}'");
        util::run_command(NMCLI, &args).map_err(|reason| WifiError::Connect {
            ssid: ssid.to_string(),
            reason,
        })
    }

    fn disconnect(&mut self) -> Result<(), WifiError> {
        log::info!("Disconnecting {}", self.interface);
        util::run_command(NMCLI, &["dev", "disconnect", self.interface.as_str()]).map_err(WifiError::Command)
    }

    fn connected_ssid(&mut self) -> Option<String> {
        let output = util::command_output(
            NMCLI,
            &["-t", "-f", "ACTIVE,SSID", "dev", "wifi", "list", "--rescan", "no"],
        )
        .map_err(|e| log::debug!("Connection query failed: {e}"))
        .ok()?;
        output.lines().find_map(|line| {
            let fields = split_terse(line);
            match fields.as_slice() {
                [active, ssid] if active == "yes" && !ssid.is_empty() => Some(ssid.clone()),
                _ => None,
            }
        })
    }
}

/// Split one line of `nmcli -t` output. Colons inside values are escaped
/// as `\:` and backslashes as `\\`.
fn split_terse(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    field.push(escaped);
                }
            }
            ':' => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// One `IN-USE:SSID:SIGNAL:SECURITY` line. Hidden networks are skipped.
fn parse_network(line: &str) -> Option<Network> {
    let fields = split_terse(line);
    let [in_use, ssid, signal, security] = fields.as_slice() else {
        log::trace!("Unexpected nmcli line: {line}");
        return None;
    };
    if ssid.is_empty() {
        return None;
    }
    let quality: i32 = signal.trim().parse().ok()?;
    let security = security.trim();
    Some(Network {
        ssid: ssid.clone(),
        rssi: quality_to_rssi(quality),
        secured: !security.is_empty() && security != "--",
        connected: in_use.trim() == "*",
    })
}

fn quality_to_rssi(quality: i32) -> i32 {
    quality.clamp(0, 100) / 2 - 100
}

/// Joined network first, then strongest signal. Access points sharing an
/// SSID collapse into the strongest one.
pub fn sort_networks(mut networks: Vec<Network>) -> Vec<Network> {
    networks.retain(|n| !n.ssid.is_empty());
    networks.sort_by(|a, b| b.connected.cmp(&a.connected).then(b.rssi.cmp(&a.rssi)));
    let mut seen: Vec<String> = Vec::new();
    networks.retain(|n| {
        if seen.contains(&n.ssid) {
            return false;
        }
        seen.push(n.ssid.clone());
        true
    });
    networks
}

/// Four-character signal meter.
pub fn signal_bars(rssi: i32) -> &'static str {
    match rssi {
        r if r >= -50 => "####",
        r if r >= -60 => "###-",
        r if r >= -70 => "##--",
        r if r >= -80 => "#---",
        _ => "----",
    }
}

/// Join the stored network at boot. Failures are logged only.
pub fn auto_connect(wifi: &mut dyn WifiControl, prefs: &SharedPreferences, timeout: Duration) -> bool {
    let Some(credentials) = WifiCredentials::load(prefs) else {
        log::info!("Wi-Fi auto-connect enabled but no network stored");
        return false;
    };
    if wifi.connected_ssid().as_deref() == Some(credentials.ssid.as_str()) {
        log::info!("Already connected to '{}'", credentials.ssid);
        return true;
    }
    match wifi.connect(&credentials.ssid, &credentials.password, timeout) {
        Ok(()) => {
            log::info!("Auto-connected to '{}'", credentials.ssid);
            true
        }
        Err(e) => {
            log::warn!("Auto-connect failed: {e}");
            false
        }
    }
}
