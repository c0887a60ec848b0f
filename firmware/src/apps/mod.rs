//! The apps this firmware ships with

pub mod home;
pub mod mtg;
pub mod settings;

use crate::models::Settings;
use crate::sound::Sound;
use crate::wifi::WifiControl;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::{AppRegistry, Navigator};
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::StatusSource;
use inkdeck_ui::widgets::Toolbar;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Handles every app receives at construction.
#[derive(Clone)]
pub struct AppContext {
    pub prefs: SharedPreferences,
    pub navigator: Navigator,
    pub status: Rc<dyn StatusSource>,
    pub sound: Rc<Sound>,
    /// Shown at the left of the toolbar
    pub label: String,
}

impl AppContext {
    pub fn toolbar(&self) -> Toolbar {
        Toolbar::new(&self.label, Rc::clone(&self.status))
    }
}

/// Register Home, the life counter and system settings.
pub fn registry<D>(
    ctx: &AppContext,
    settings: Rc<RefCell<Settings>>,
    wifi: Box<dyn WifiControl>,
    connect_timeout: Duration,
) -> AppRegistry<D>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let mut registry = AppRegistry::new();
    registry.register_app(Box::new(home::HomeApp::new(ctx)));
    registry.register_app(Box::new(mtg::MtgApp::new(ctx)));
    registry.register_app(Box::new(settings::SettingsApp::new(
        ctx,
        settings,
        wifi,
        connect_timeout,
    )));
    registry
}
