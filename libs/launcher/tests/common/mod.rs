#![allow(dead_code)]

use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::{App, AppMetadata, AppRegistry, LaunchContext, Navigator};
use inkdeck_storage::{MemoryPreferences, SharedPreferences};
use inkdeck_ui::{Component, MemoryDisplay, Redraw, Screen, Touch, widgets::Button};
use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

pub type Log = Rc<RefCell<Vec<String>>>;

pub static HOME: AppMetadata = AppMetadata {
    id: "home",
    name: "Home",
    icon: None,
    show_in_launcher: false,
};

pub static MTG: AppMetadata = AppMetadata {
    id: "mtg",
    name: "Life Counter",
    icon: Some('\u{00b7}'),
    show_in_launcher: true,
};

pub static SETTINGS: AppMetadata = AppMetadata {
    id: "settings",
    name: "Settings",
    icon: None,
    show_in_launcher: true,
};

pub static DEEP: AppMetadata = AppMetadata {
    id: "deep",
    name: "Deep",
    icon: None,
    show_in_launcher: true,
};

/// Screen that records its lifecycle and paints one button.
pub struct RecordingScreen {
    app: &'static str,
    id: &'static str,
    log: Log,
    full: bool,
    button: Button,
    /// Request pushed through the navigator when the button is released.
    on_click: Option<(Navigator, &'static str)>,
}

impl RecordingScreen {
    pub fn new(app: &'static str, id: &'static str, log: &Log) -> Self {
        let mut button = Button::new(id);
        button.set_bounds(inkdeck_ui::Rect::new(10, 40, 60, 30));
        Self {
            app,
            id,
            log: log.clone(),
            full: true,
            button,
            on_click: None,
        }
    }

    pub fn pushing(mut self, navigator: Navigator, screen_id: &'static str) -> Self {
        self.on_click = Some((navigator, screen_id));
        self
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}/{}:{event}", self.app, self.id));
    }
}

impl Screen<MemoryDisplay> for RecordingScreen {
    fn screen_id(&self) -> &'static str {
        self.id
    }

    fn on_enter(&mut self) {
        self.record("enter");
    }

    fn on_exit(&mut self) {
        self.record("exit");
    }

    fn draw(&mut self, display: &mut MemoryDisplay) -> Result<Redraw, Infallible> {
        if self.full {
            self.full = false;
            display.clear(BinaryColor::On)?;
            self.button.mark_dirty();
            self.button.draw(display)?;
            return Ok(Redraw::Full);
        }
        Ok(if self.button.draw(display)? {
            Redraw::Partial
        } else {
            Redraw::None
        })
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        let event = self.button.handle_touch(touch);
        if event == inkdeck_ui::widgets::ButtonEvent::Clicked
            && let Some((navigator, target)) = &self.on_click
        {
            navigator.push(*target);
        }
        event.consumed()
    }

    fn needs_full_redraw(&self) -> bool {
        self.full
    }

    fn request_full_redraw(&mut self) {
        self.full = true;
    }
}

/// App with a main screen and any number of named secondary screens.
pub struct RecordingApp {
    metadata: &'static AppMetadata,
    log: Log,
    main: RecordingScreen,
    screens: Vec<RecordingScreen>,
    pub launched_with: Vec<&'static str>,
}

impl RecordingApp {
    pub fn new(metadata: &'static AppMetadata, secondary: &[&'static str], log: &Log) -> Self {
        Self {
            metadata,
            log: log.clone(),
            main: RecordingScreen::new(metadata.id, "main", log),
            screens: secondary
                .iter()
                .map(|id| RecordingScreen::new(metadata.id, id, log))
                .collect(),
            launched_with: Vec::new(),
        }
    }

    pub fn with_main(mut self, main: RecordingScreen) -> Self {
        self.main = main;
        self
    }
}

impl App<MemoryDisplay> for RecordingApp {
    fn metadata(&self) -> &'static AppMetadata {
        self.metadata
    }

    fn on_launch(&mut self, context: &LaunchContext<'_>) {
        self.launched_with = context.launchable.iter().map(|m| m.id).collect();
        self.log.borrow_mut().push(format!("{}:launch", self.metadata.id));
    }

    fn on_suspend(&mut self) {
        self.log.borrow_mut().push(format!("{}:suspend", self.metadata.id));
    }

    fn main_screen(&mut self) -> &mut dyn Screen<MemoryDisplay> {
        &mut self.main
    }

    fn screen(&mut self, id: &str) -> Option<&mut dyn Screen<MemoryDisplay>> {
        self.screens
            .iter_mut()
            .find(|screen| screen.id == id)
            .map(|screen| screen as &mut dyn Screen<MemoryDisplay>)
    }
}

/// Home, MTG (with a "settings" screen), Settings (with "wifi") and an app
/// deep enough to overflow the stack, registered in that order.
pub fn registry(log: &Log) -> AppRegistry<MemoryDisplay> {
    let mut registry = AppRegistry::new();
    registry.register_app(Box::new(RecordingApp::new(&HOME, &[], log)));
    registry.register_app(Box::new(RecordingApp::new(&MTG, &["settings"], log)));
    registry.register_app(Box::new(RecordingApp::new(&SETTINGS, &["wifi"], log)));
    registry.register_app(Box::new(RecordingApp::new(&DEEP, &["a", "b", "c", "d"], log)));
    registry
}

pub fn memory_prefs() -> (Rc<RefCell<MemoryPreferences>>, SharedPreferences) {
    let memory = Rc::new(RefCell::new(MemoryPreferences::new()));
    let shared: SharedPreferences = memory.clone();
    (memory, shared)
}

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn take(log: &Log) -> Vec<String> {
    std::mem::take(&mut *log.borrow_mut())
}
