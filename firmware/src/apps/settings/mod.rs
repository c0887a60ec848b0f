//! Device settings and Wi-Fi setup

mod networks;
mod system;

use super::AppContext;
use crate::models::Settings;
use crate::sound::Sound;
use crate::wifi::WifiControl;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::{App, AppMetadata, LaunchContext};
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::Screen;
use networks::WifiScreen;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use system::SystemScreen;

/// Id of the network picker, persisted in the navigation stack.
pub const WIFI_SCREEN_ID: &str = "wifi";

static METADATA: AppMetadata = AppMetadata {
    id: "settings",
    name: "Settings",
    // Open Iconic cog
    icon: Some('\u{0081}'),
    show_in_launcher: true,
};

pub struct SettingsApp {
    settings: Rc<RefCell<Settings>>,
    prefs: SharedPreferences,
    sound: Rc<Sound>,
    system: SystemScreen,
    wifi: WifiScreen,
}

impl SettingsApp {
    pub fn new(
        ctx: &AppContext,
        settings: Rc<RefCell<Settings>>,
        wifi: Box<dyn WifiControl>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            system: SystemScreen::new(ctx, Rc::clone(&settings)),
            wifi: WifiScreen::new(ctx, wifi, connect_timeout),
            prefs: ctx.prefs.clone(),
            sound: Rc::clone(&ctx.sound),
            settings,
        }
    }
}

impl<D: DrawTarget<Color = BinaryColor>> App<D> for SettingsApp {
    fn metadata(&self) -> &'static AppMetadata {
        &METADATA
    }

    fn on_launch(&mut self, _context: &LaunchContext<'_>) {
        let mut settings = self.settings.borrow_mut();
        if !settings.load(&self.prefs) {
            log::debug!("No saved settings, using defaults");
        }
        self.sound.set_enabled(settings.sound_on);
    }

    fn on_suspend(&mut self) {
        self.settings.borrow().save(&self.prefs);
    }

    fn main_screen(&mut self) -> &mut dyn Screen<D> {
        &mut self.system
    }

    fn screen(&mut self, id: &str) -> Option<&mut dyn Screen<D>> {
        (id == WIFI_SCREEN_ID).then_some(&mut self.wifi as &mut dyn Screen<D>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing;
    use crate::wifi::fake::FakeWifi;
    use inkdeck_ui::MemoryDisplay;

    fn app() -> (SettingsApp, AppContext) {
        let (ctx, _receiver) = testing::context();
        let app = SettingsApp::new(
            &ctx,
            Rc::new(RefCell::new(Settings::default())),
            Box::new(FakeWifi::default()),
            Duration::from_secs(5),
        );
        (app, ctx)
    }

    #[test]
    fn launch_applies_the_stored_sound_setting() {
        let (mut app, ctx) = app();
        Settings {
            sound_on: false,
            ..Settings::default()
        }
        .save(&ctx.prefs);
        App::<MemoryDisplay>::on_launch(&mut app, &LaunchContext { launchable: &[] });
        assert!(!app.settings.borrow().sound_on);
        assert!(!ctx.sound.is_enabled());
    }

    #[test]
    fn wifi_screen_is_reachable_by_id() {
        let (mut app, _ctx) = app();
        let screen = App::<MemoryDisplay>::screen(&mut app, WIFI_SCREEN_ID).map(|s| s.screen_id());
        assert_eq!(screen, Some(WIFI_SCREEN_ID));
        assert!(App::<MemoryDisplay>::screen(&mut app, "nope").is_none());
    }
}
