mod apps;
mod config;
mod constants;
mod events;
mod models;
mod power;
mod sound;
mod util;
mod wifi;

use apps::AppContext;
use config::FirmwareConfig;
use crossbeam_channel::RecvTimeoutError;
use epd_2in13_v4::{Device, DeviceConfig};
use events::AppEvent;
use inkdeck_launcher::Navigation;
use inkdeck_storage::{FilePreferences, MemoryPreferences, SharedPreferences, shared};
use inkdeck_ui::{SystemStatus, Touch};
use models::Settings;
use power::SleepTimer;
use sound::Sound;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;
use wifi::{NmcliWifi, WifiControl};

/// File-backed preferences, or an in-memory store when the directory is
/// unusable so the device still boots.
fn open_preferences(config: &FirmwareConfig) -> SharedPreferences {
    match FilePreferences::new(&config.prefs_dir) {
        Ok(prefs) => {
            log::info!("Preferences in {}", config.prefs_dir.display());
            shared(prefs)
        }
        Err(e) => {
            log::error!("{e}, settings will not survive a restart");
            shared(MemoryPreferences::new())
        }
    }
}

fn main() -> epd_2in13_v4::EpdResult<()> {
    env_logger::init();
    let config = FirmwareConfig::load();

    let (tx, rx) = crossbeam_channel::unbounded();

    let tx_for_signal = tx.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        log::info!("Received Ctrl+C, shutting down...");
        let _ = tx_for_signal.send(AppEvent::Shutdown);
    }) {
        log::error!("Failed to set Ctrl-C handler: {e}");
    }

    let (mut device, touch_events) = Device::new(DeviceConfig::default())?;
    device.display.set_max_partial_refreshes(config.max_partial_refreshes);

    let tx_touch = tx.clone();
    std::thread::spawn(move || {
        for sample in touch_events {
            if tx_touch.send(AppEvent::Touch(sample)).is_err() {
                break;
            }
        }
    });
    drop(tx);

    let prefs = open_preferences(&config);
    let mut settings = Settings::default();
    if !settings.load(&prefs) {
        log::info!("No saved settings, using defaults");
    }
    let settings = Rc::new(RefCell::new(settings));
    let sound = Rc::new(Sound::new(config.click_command.clone(), settings.borrow().sound_on));

    let mut wifi = NmcliWifi::new(&config.wifi_interface);
    if settings.borrow().wifi_auto {
        wifi::auto_connect(&mut wifi, &prefs, config.wifi_connect_timeout());
    }

    let (navigator, commands) = inkdeck_launcher::channel();
    let ctx = AppContext {
        prefs: prefs.clone(),
        navigator,
        status: Rc::new(SystemStatus::new()),
        sound,
        label: config.device_label.clone(),
    };
    let wifi: Box<dyn WifiControl> = Box::new(wifi);
    let registry = apps::registry(&ctx, Rc::clone(&settings), wifi, config.wifi_connect_timeout());
    log::info!("{} apps registered", registry.len());

    let mut nav = Navigation::new(registry, prefs, commands);
    nav.restore_state();

    let frame_interval = config.frame_interval();
    let mut timer = SleepTimer::new(Instant::now());

    loop {
        match rx.recv_timeout(frame_interval) {
            Ok(AppEvent::Touch(sample)) => {
                let now = Instant::now();
                timer.touch(now);
                nav.handle_touch(&Touch::from_sample(sample, now));
            }
            Ok(AppEvent::Shutdown) => {
                nav.prepare_for_sleep();
                device.sleep()?;
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                log::info!("Event channel disconnected, exiting event loop");
                nav.prepare_for_sleep();
                break;
            }
        }

        let now = Instant::now();
        nav.update(now);
        nav.draw(&mut device.display)?;

        let sleep_secs = settings.borrow().sleep_secs;
        if timer.expired(now, sleep_secs) {
            log::info!("Idle for {sleep_secs}s, powering down");
            if !nav.prepare_for_sleep() {
                log::warn!("Navigation state was not saved");
            }
            device.sleep()?;
            if let Err(e) = util::run_argv(&config.poweroff_command) {
                log::error!("{e}");
            }
            break;
        }
    }

    log::info!("Shutdown complete");
    Ok(())
}
