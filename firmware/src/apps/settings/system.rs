use super::WIFI_SCREEN_ID;
use crate::apps::AppContext;
use crate::models::Settings;
use crate::models::settings::SLEEP_OPTIONS;
use crate::sound::Sound;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_launcher::Navigator;
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::{
    Chrome, Component, Rect, Redraw, Screen, Touch, fonts,
    layout::{self, MARGIN},
    text,
    widgets::{Button, ButtonEvent, HeaderBar, HeaderEvent},
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

const LABEL_WIDTH: i16 = 40;
const CONFIGURE_WIDTH: i16 = 76;
const AUTO_LABEL_WIDTH: i16 = 30;
const ROW_GAP: i16 = 3;
const SPACING: i16 = 2;

/// What a tapped button changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ConfigureWifi,
    WifiAuto(bool),
    Sound(bool),
    Sleep(u16),
}

/// Wi-Fi, sound and auto-sleep options. Every change is saved at once.
pub struct SystemScreen {
    chrome: Chrome,
    settings: Rc<RefCell<Settings>>,
    prefs: SharedPreferences,
    navigator: Navigator,
    sound: Rc<Sound>,
    configure: Button,
    wifi_auto: [Button; 2],
    sound_on: [Button; 2],
    sleep: [Button; 4],
    /// Caption and where it goes
    labels: Vec<(&'static str, Rect)>,
}

fn on_off() -> [Button; 2] {
    [Button::new("OFF"), Button::new("ON")]
}

impl SystemScreen {
    pub fn new(ctx: &AppContext, settings: Rc<RefCell<Settings>>) -> Self {
        Self {
            chrome: Chrome::new(ctx.toolbar())
                .with_header(HeaderBar::new("SYSTEM SETTINGS").with_left("< HOME")),
            settings,
            prefs: ctx.prefs.clone(),
            navigator: ctx.navigator.clone(),
            sound: Rc::clone(&ctx.sound),
            configure: Button::new("Configure >"),
            wifi_auto: on_off(),
            sound_on: on_off(),
            sleep: SLEEP_OPTIONS.map(|(label, _)| Button::new(label)),
            labels: Vec::new(),
        }
    }

    fn sync_selection(&mut self) {
        let settings = *self.settings.borrow();
        for (button, on) in self.wifi_auto.iter_mut().zip([false, true]) {
            button.set_selected(settings.wifi_auto == on);
        }
        for (button, on) in self.sound_on.iter_mut().zip([false, true]) {
            button.set_selected(settings.sound_on == on);
        }
        let selected = settings.sleep_index();
        for (i, button) in self.sleep.iter_mut().enumerate() {
            button.set_selected(i == selected);
        }
    }

    fn layout(&mut self, content: Rect) {
        let rows = layout::rows(content.inset(MARGIN), 3, ROW_GAP);
        let [wifi_row, sound_row, sleep_row] = rows.as_slice() else {
            return;
        };
        self.labels.clear();

        let (label, rest) = split_left(*wifi_row, LABEL_WIDTH);
        self.labels.push(("WiFi", label));
        let (configure, rest) = split_left(rest, CONFIGURE_WIDTH);
        self.configure.set_bounds(Rect::new(configure.x, configure.y, configure.w - 4, configure.h));
        let (auto, options) = split_left(rest, AUTO_LABEL_WIDTH);
        self.labels.push(("Auto", auto));
        layout::fill_row(&mut self.wifi_auto, options, SPACING);

        let (label, options) = split_left(*sound_row, LABEL_WIDTH);
        self.labels.push(("Sound", label));
        layout::fill_row(&mut self.sound_on, options, SPACING);

        let (label, options) = split_left(*sleep_row, LABEL_WIDTH);
        self.labels.push(("Sleep", label));
        layout::fill_row(&mut self.sleep, options, SPACING);
    }

    fn buttons(&mut self) -> impl Iterator<Item = (&mut Button, Action)> {
        std::iter::once((&mut self.configure, Action::ConfigureWifi))
            .chain(self.wifi_auto.iter_mut().zip([false, true]).map(|(b, on)| (b, Action::WifiAuto(on))))
            .chain(self.sound_on.iter_mut().zip([false, true]).map(|(b, on)| (b, Action::Sound(on))))
            .chain(
                self.sleep
                    .iter_mut()
                    .zip(SLEEP_OPTIONS)
                    .map(|(b, (_, secs))| (b, Action::Sleep(secs))),
            )
    }

    fn apply(&mut self, action: Action) {
        self.sound.click();
        if action == Action::ConfigureWifi {
            self.navigator.push(WIFI_SCREEN_ID);
            return;
        }
        {
            let mut settings = self.settings.borrow_mut();
            match action {
                Action::WifiAuto(on) => settings.wifi_auto = on,
                Action::Sound(on) => {
                    settings.sound_on = on;
                    self.sound.set_enabled(on);
                }
                Action::Sleep(secs) => settings.sleep_secs = secs,
                Action::ConfigureWifi => {}
            }
            log::info!("Settings changed: {action:?}");
            settings.save(&self.prefs);
        }
        self.sync_selection();
    }
}

fn split_left(area: Rect, width: i16) -> (Rect, Rect) {
    let width = width.clamp(0, area.w.max(0));
    (
        Rect::new(area.x, area.y, width, area.h),
        Rect::new(area.x + width, area.y, area.w - width, area.h),
    )
}

impl<D: DrawTarget<Color = BinaryColor>> Screen<D> for SystemScreen {
    fn on_enter(&mut self) {
        let mut settings = self.settings.borrow_mut();
        settings.load(&self.prefs);
        self.sound.set_enabled(settings.sound_on);
        drop(settings);
        self.sync_selection();
        self.chrome.request_full_redraw();
    }

    fn on_exit(&mut self) {
        self.settings.borrow().save(&self.prefs);
    }

    fn update(&mut self, now: Instant) {
        self.chrome.update(now);
    }

    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let mut frame = self.chrome.begin(display)?;
        if frame.is_full() {
            self.layout(frame.content());
            for (caption, area) in &self.labels {
                text::left::<fonts::FONT_SMALL, D>(frame.display(), caption, *area, 0, BinaryColor::Off)?;
            }
        }
        for (button, _) in self.buttons() {
            frame.draw(button)?;
        }
        Ok(frame.finish())
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        match self.chrome.handle_touch(touch) {
            HeaderEvent::Left => {
                self.sound.click();
                self.navigator.home();
                return true;
            }
            HeaderEvent::Consumed | HeaderEvent::Right => return true,
            HeaderEvent::Ignored => {}
        }

        let mut consumed = false;
        let mut fired = None;
        for (button, action) in self.buttons() {
            let event = button.handle_touch(touch);
            consumed |= event.consumed();
            if event == ButtonEvent::Clicked {
                fired = Some(action);
            }
        }
        if let Some(action) = fired {
            self.apply(action);
        }
        consumed
    }

    fn needs_full_redraw(&self) -> bool {
        self.chrome.needs_full_redraw()
    }

    fn request_full_redraw(&mut self) {
        self.chrome.request_full_redraw();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apps::testing::{self, commands, tap};
    use inkdeck_launcher::NavCommand;
    use inkdeck_ui::MemoryDisplay;
    use std::time::Duration;

    struct Fixture {
        screen: SystemScreen,
        settings: Rc<RefCell<Settings>>,
        ctx: AppContext,
        receiver: crossbeam_channel::Receiver<NavCommand>,
        now: Instant,
    }

    impl Fixture {
        fn new() -> Self {
            let (ctx, receiver) = testing::context();
            let settings = Rc::new(RefCell::new(Settings::default()));
            let mut screen = SystemScreen::new(&ctx, Rc::clone(&settings));
            let mut display = MemoryDisplay::panel();
            Screen::<MemoryDisplay>::on_enter(&mut screen);
            Screen::<MemoryDisplay>::draw(&mut screen, &mut display).unwrap();
            Self {
                screen,
                settings,
                ctx,
                receiver,
                now: Instant::now(),
            }
        }

        fn tap(&mut self, rect: Rect) {
            self.now += Duration::from_millis(200);
            let c = rect.center();
            let (x, y) = (i16::try_from(c.x).unwrap(), i16::try_from(c.y).unwrap());
            tap(&mut self.screen, x, y, self.now);
        }

        fn stored(&self) -> Settings {
            let mut stored = Settings {
                sound_on: false,
                sleep_secs: 1,
                wifi_auto: false,
            };
            stored.load(&self.ctx.prefs);
            stored
        }
    }

    #[test]
    fn defaults_are_selected() {
        let fixture = Fixture::new();
        assert!(fixture.screen.sound_on[1].is_selected());
        assert!(fixture.screen.wifi_auto[0].is_selected());
        assert!(fixture.screen.sleep[2].is_selected());
    }

    #[test]
    fn sound_toggle_applies_and_saves() {
        let mut fixture = Fixture::new();
        let off = fixture.screen.sound_on[0].bounds();
        fixture.tap(off);
        assert!(!fixture.settings.borrow().sound_on);
        assert!(!fixture.ctx.sound.is_enabled());
        assert!(!fixture.stored().sound_on);
        assert!(fixture.screen.sound_on[0].is_selected());
    }

    #[test]
    fn sleep_option_is_saved() {
        let mut fixture = Fixture::new();
        let ten = fixture.screen.sleep[3].bounds();
        fixture.tap(ten);
        assert_eq!(fixture.stored().sleep_secs, 600);
        let off = fixture.screen.sleep[0].bounds();
        fixture.tap(off);
        assert_eq!(fixture.stored().sleep_secs, 0);
        assert!(fixture.screen.sleep[0].is_selected());
    }

    #[test]
    fn wifi_auto_is_saved() {
        let mut fixture = Fixture::new();
        let on = fixture.screen.wifi_auto[1].bounds();
        fixture.tap(on);
        assert!(fixture.stored().wifi_auto);
    }

    #[test]
    fn configure_pushes_the_wifi_screen() {
        let mut fixture = Fixture::new();
        let configure = fixture.screen.configure.bounds();
        fixture.tap(configure);
        assert_eq!(commands(&fixture.receiver), [NavCommand::Push("wifi")]);
    }

    #[test]
    fn buttons_stay_inside_the_panel() {
        let fixture = Fixture::new();
        let screen = &fixture.screen;
        let all = std::iter::once(&screen.configure)
            .chain(&screen.wifi_auto)
            .chain(&screen.sound_on)
            .chain(&screen.sleep);
        for button in all {
            let b = button.bounds();
            assert!(b.w > 0 && b.x >= 0 && b.right() <= 250 && b.bottom() <= 122, "{b:?}");
        }
    }
}
