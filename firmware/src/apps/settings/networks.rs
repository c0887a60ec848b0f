use super::WIFI_SCREEN_ID;
use crate::apps::AppContext;
use crate::models::WifiCredentials;
use crate::sound::Sound;
use crate::wifi::{Network, WifiControl, signal_bars, sort_networks};
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle},
};
use inkdeck_launcher::Navigator;
use inkdeck_storage::SharedPreferences;
use inkdeck_ui::{
    Chrome, Component, ComponentState, Rect, Redraw, Screen, Touch, fonts,
    layout::{self, MARGIN},
    text,
    widgets::{BusyOverlay, HeaderBar, HeaderEvent, Keyboard, KeyboardEvent},
};
use std::rc::Rc;
use std::time::{Duration, Instant};

/// WPA passphrases are at most 63 characters.
pub const MAX_PASSWORD_LEN: usize = 63;
const MAX_ROWS: usize = 3;
const STATUS_HEIGHT: i16 = 12;
const BARS_WIDTH: i16 = 30;
const SSID_CHARS: usize = 20;

/// A blocking operation, run on the frame after its overlay is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Job {
    Scan,
    Connect { ssid: String, password: String },
    Disconnect,
}

impl Job {
    fn message(&self) -> String {
        match self {
            Self::Scan => "Scanning...".to_string(),
            Self::Connect { ssid, .. } => format!("Connecting to {}...", text::truncate(ssid, SSID_CHARS)),
            Self::Disconnect => "Disconnecting...".to_string(),
        }
    }
}

/// One visible network. Tapped on release.
struct NetworkRow {
    state: ComponentState,
    network: Network,
    pressed: bool,
}

impl NetworkRow {
    fn new(network: Network) -> Self {
        Self {
            state: ComponentState::default(),
            network,
            pressed: false,
        }
    }
}

impl Component for NetworkRow {
    fn state(&self) -> &ComponentState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ComponentState {
        &mut self.state
    }

    fn render<D>(&mut self, display: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let bounds = self.bounds();
        let (fill, ink) = if self.pressed {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        display.fill_solid(&bounds.into(), fill)?;

        let (bars, rest) = (
            Rect::new(bounds.x, bounds.y, BARS_WIDTH, bounds.h),
            Rect::new(bounds.x + BARS_WIDTH, bounds.y, bounds.w - BARS_WIDTH, bounds.h),
        );
        text::left::<fonts::FONT_SMALL, D>(display, signal_bars(self.network.rssi), bars, 2, ink)?;
        let ssid = text::truncate(&self.network.ssid, SSID_CHARS);
        text::left::<fonts::FONT_SMALL, D>(display, &ssid, rest, 0, ink)?;
        let tag = if self.network.connected {
            "* CONNECTED"
        } else if self.network.secured {
            "[SECURED]"
        } else {
            ""
        };
        text::right::<fonts::FONT_SMALL, D>(display, tag, rest, 2, ink)?;

        let y = i32::from(bounds.bottom()) - 1;
        Line::new(Point::new(i32::from(bounds.x), y), Point::new(i32::from(bounds.right()) - 1, y))
            .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
            .draw(display)
    }
}

/// Scan, join and leave Wi-Fi networks.
pub struct WifiScreen {
    chrome: Chrome,
    prefs: SharedPreferences,
    navigator: Navigator,
    sound: Rc<Sound>,
    wifi: Box<dyn WifiControl>,
    connect_timeout: Duration,
    scanned: bool,
    status: String,
    rows: Vec<NetworkRow>,
    /// Network waiting for its password
    password: Option<(String, Keyboard)>,
    busy: Option<(Job, BusyOverlay)>,
    busy_shown: bool,
}

impl WifiScreen {
    pub fn new(ctx: &AppContext, wifi: Box<dyn WifiControl>, connect_timeout: Duration) -> Self {
        Self {
            chrome: Chrome::new(ctx.toolbar()).with_header(
                HeaderBar::new("SELECT WIFI NETWORK")
                    .with_left("< BACK")
                    .with_right("SCAN"),
            ),
            prefs: ctx.prefs.clone(),
            navigator: ctx.navigator.clone(),
            sound: Rc::clone(&ctx.sound),
            wifi,
            connect_timeout,
            scanned: false,
            status: "Press SCAN to search".to_string(),
            rows: Vec::new(),
            password: None,
            busy: None,
            busy_shown: false,
        }
    }

    fn start(&mut self, job: Job) {
        log::debug!("Wi-Fi job queued: {job:?}");
        let overlay = BusyOverlay::new(&job.message());
        self.busy = Some((job, overlay));
        self.busy_shown = false;
        self.chrome.request_full_redraw();
    }

    fn set_networks(&mut self, networks: Vec<Network>) {
        self.rows = sort_networks(networks)
            .into_iter()
            .take(MAX_ROWS)
            .map(NetworkRow::new)
            .collect();
        self.status = if self.rows.is_empty() {
            "No networks found".to_string()
        } else {
            format!("Available Networks ({})", self.rows.len())
        };
    }

    fn mark_connected(&mut self, ssid: Option<&str>) {
        let networks = self
            .rows
            .drain(..)
            .map(|row| {
                let mut network = row.network;
                network.connected = Some(network.ssid.as_str()) == ssid;
                network
            })
            .collect();
        self.set_networks(networks);
    }

    fn run(&mut self, job: Job) {
        match job {
            Job::Scan => match self.wifi.scan() {
                Ok(networks) => {
                    self.scanned = true;
                    log::info!("Wi-Fi scan found {} networks", networks.len());
                    self.set_networks(networks);
                }
                Err(e) => {
                    log::warn!("Wi-Fi scan failed: {e}");
                    self.status = "Scan failed".to_string();
                }
            },
            Job::Connect { ssid, password } => {
                match self.wifi.connect(&ssid, &password, self.connect_timeout) {
                    Ok(()) => {
                        log::info!("Joined '{ssid}'");
                        WifiCredentials {
                            ssid: ssid.clone(),
                            password,
                        }
                        .save(&self.prefs);
                        self.mark_connected(Some(&ssid));
                        self.status = format!("Connected to {}", text::truncate(&ssid, SSID_CHARS));
                    }
                    Err(e) => {
                        log::warn!("{e}");
                        self.status = "Connection failed".to_string();
                    }
                }
            }
            Job::Disconnect => match self.wifi.disconnect() {
                Ok(()) => {
                    log::info!("Wi-Fi disconnected");
                    WifiCredentials::clear(&self.prefs);
                    self.mark_connected(None);
                    self.status = "Disconnected".to_string();
                }
                Err(e) => {
                    log::warn!("Wi-Fi disconnect failed: {e}");
                    self.status = "Disconnect failed".to_string();
                }
            },
        }
    }

    fn choose(&mut self, network: Network) {
        self.sound.click();
        if network.connected {
            self.start(Job::Disconnect);
        } else if network.secured {
            log::debug!("Asking for the password of '{}'", network.ssid);
            self.password = Some((network.ssid, Keyboard::new("Password", "", MAX_PASSWORD_LEN)));
            self.chrome.request_full_redraw();
        } else {
            self.start(Job::Connect {
                ssid: network.ssid,
                password: String::new(),
            });
        }
    }

    fn handle_keyboard(&mut self, touch: &Touch) {
        let Some((ssid, keyboard)) = self.password.as_mut() else {
            return;
        };
        match keyboard.handle_touch(touch) {
            KeyboardEvent::Consumed => {}
            KeyboardEvent::Ignored => {
                if touch.released {
                    self.password = None;
                    self.chrome.request_full_redraw();
                }
            }
            KeyboardEvent::Done(password) => {
                let ssid = std::mem::take(ssid);
                self.password = None;
                self.start(Job::Connect { ssid, password });
            }
            KeyboardEvent::Cancelled(_) => {
                self.password = None;
                self.chrome.request_full_redraw();
            }
        }
    }

    fn handle_rows(&mut self, touch: &Touch) -> bool {
        let mut consumed = false;
        let mut chosen = None;
        for row in &mut self.rows {
            let inside = row.bounds().contains(touch.x, touch.y);
            if touch.pressed {
                if row.pressed != inside {
                    row.pressed = inside;
                    row.mark_dirty();
                }
                consumed |= inside;
            } else if touch.released && row.pressed {
                row.pressed = false;
                row.mark_dirty();
                consumed = true;
                if inside {
                    chosen = Some(row.network.clone());
                }
            }
        }
        if let Some(network) = chosen {
            self.choose(network);
        }
        consumed
    }
}

#[cfg(test)]
impl WifiScreen {
    fn ssids(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.network.ssid.as_str()).collect()
    }
}

impl<D: DrawTarget<Color = BinaryColor>> Screen<D> for WifiScreen {
    fn screen_id(&self) -> &'static str {
        WIFI_SCREEN_ID
    }

    fn on_enter(&mut self) {
        self.chrome.request_full_redraw();
    }

    fn on_exit(&mut self) {
        self.password = None;
        self.busy = None;
    }

    fn update(&mut self, now: Instant) {
        self.chrome.update(now);
        if self.busy_shown {
            if let Some((job, _)) = self.busy.take() {
                self.busy_shown = false;
                self.run(job);
                self.chrome.request_full_redraw();
            }
        }
    }

    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let mut frame = self.chrome.begin(display)?;
        let content = frame.content();
        if frame.is_full() {
            let (status, list) = content.inset(MARGIN).split_top(STATUS_HEIGHT);
            text::left::<fonts::FONT_SMALL, D>(frame.display(), &self.status, status, 0, BinaryColor::Off)?;
            let rects = layout::rows(list, MAX_ROWS, 1);
            for (row, rect) in self.rows.iter_mut().zip(rects) {
                row.set_bounds(rect);
            }
            if let Some((_, keyboard)) = self.password.as_mut() {
                keyboard.layout(frame.body());
            }
            if let Some((_, overlay)) = self.busy.as_mut() {
                overlay.set_bounds(layout::centered(content, 180, 40));
            }
        }

        if let Some((_, keyboard)) = self.password.as_mut() {
            frame.draw(keyboard)?;
        } else {
            for row in &mut self.rows {
                frame.draw(row)?;
            }
        }
        if let Some((_, overlay)) = self.busy.as_mut() {
            frame.draw(overlay)?;
            self.busy_shown = true;
        }
        Ok(frame.finish())
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        if self.busy.is_some() {
            return true;
        }
        if self.password.is_some() {
            self.handle_keyboard(touch);
            return true;
        }
        match self.chrome.handle_touch(touch) {
            HeaderEvent::Left => {
                self.sound.click();
                self.navigator.pop();
                return true;
            }
            HeaderEvent::Right => {
                self.sound.click();
                self.start(Job::Scan);
                return true;
            }
            HeaderEvent::Consumed => return true,
            HeaderEvent::Ignored => {}
        }
        self.handle_rows(touch)
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
    use crate::wifi::fake::{FakeWifi, network};
    use inkdeck_launcher::NavCommand;
    use inkdeck_ui::MemoryDisplay;
    use std::cell::RefCell;

    struct Fixture {
        screen: WifiScreen,
        wifi: Rc<RefCell<FakeWifi>>,
        ctx: AppContext,
        display: MemoryDisplay,
        receiver: crossbeam_channel::Receiver<NavCommand>,
        now: Instant,
    }

    fn center(rect: Rect) -> (i16, i16) {
        let c = rect.center();
        (i16::try_from(c.x).unwrap(), i16::try_from(c.y).unwrap())
    }

    impl Fixture {
        fn new(networks: Vec<Network>) -> Self {
            let (ctx, receiver) = testing::context();
            let wifi = Rc::new(RefCell::new(FakeWifi {
                networks,
                ..FakeWifi::default()
            }));
            let backend: Box<dyn WifiControl> = Box::new(Rc::clone(&wifi));
            let mut screen = WifiScreen::new(&ctx, backend, Duration::from_secs(5));
            let mut display = MemoryDisplay::panel();
            Screen::<MemoryDisplay>::on_enter(&mut screen);
            Screen::<MemoryDisplay>::draw(&mut screen, &mut display).unwrap();
            Self {
                screen,
                wifi,
                ctx,
                display,
                receiver,
                now: Instant::now(),
            }
        }

        fn view(&mut self) -> &mut dyn Screen<MemoryDisplay> {
            &mut self.screen
        }

        fn tap(&mut self, (x, y): (i16, i16)) -> bool {
            self.now += Duration::from_millis(200);
            let now = self.now;
            tap(self.view(), x, y, now)
        }

        /// One main-loop iteration.
        fn frame(&mut self) -> Redraw {
            self.now += Duration::from_millis(50);
            let now = self.now;
            self.view().update(now);
            let Self { screen, display, .. } = self;
            Screen::<MemoryDisplay>::draw(screen, display).unwrap()
        }

        fn scan(&mut self) {
            self.tap((230, 24));
            self.frame();
            self.frame();
        }

        fn tap_row(&mut self, index: usize) {
            let bounds = self.screen.rows[index].bounds();
            self.tap(center(bounds));
        }

        fn tap_key(&mut self, label: &str) {
            let bounds = self.screen.password.as_ref().and_then(|(_, kb)| kb.key_bounds(label));
            self.tap(center(bounds.unwrap()));
        }
    }

    fn home_networks() -> Vec<Network> {
        vec![
            network("cafe", -75, false),
            network("home", -48, true),
            network("office", -62, true),
            network("garage", -88, true),
        ]
    }

    #[test]
    fn does_not_scan_until_asked() {
        let mut fixture = Fixture::new(home_networks());
        fixture.frame();
        assert_eq!(fixture.wifi.borrow().scans, 0);
        assert!(fixture.screen.rows.is_empty());
    }

    #[test]
    fn overlay_is_shown_before_the_scan_runs() {
        let mut fixture = Fixture::new(home_networks());
        fixture.tap((230, 24));
        assert!(fixture.screen.busy.is_some());

        assert_eq!(fixture.frame(), Redraw::Full);
        assert_eq!(fixture.wifi.borrow().scans, 0);

        assert_eq!(fixture.frame(), Redraw::Full);
        assert_eq!(fixture.wifi.borrow().scans, 1);
        assert!(fixture.screen.busy.is_none());
    }

    #[test]
    fn scan_lists_the_strongest_networks() {
        let mut fixture = Fixture::new(home_networks());
        fixture.scan();
        assert_eq!(fixture.screen.ssids(), ["home", "office", "cafe"]);
        assert_eq!(fixture.screen.status, "Available Networks (3)");
    }

    #[test]
    fn empty_scan_says_so() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.scan();
        assert_eq!(fixture.screen.status, "No networks found");
    }

    #[test]
    fn open_network_connects_directly() {
        let mut fixture = Fixture::new(home_networks());
        fixture.scan();
        fixture.tap_row(2);
        assert!(fixture.screen.password.is_none());
        fixture.frame();
        fixture.frame();

        assert_eq!(fixture.wifi.borrow().connects, [("cafe".to_string(), String::new())]);
        assert_eq!(fixture.screen.ssids()[0], "cafe");
        assert!(fixture.screen.rows[0].network.connected);
        let stored = WifiCredentials::load(&fixture.ctx.prefs).unwrap();
        assert_eq!(stored.ssid, "cafe");
    }

    #[test]
    fn secured_network_asks_for_a_password() {
        let mut fixture = Fixture::new(home_networks());
        fixture.scan();
        fixture.tap_row(0);
        assert!(fixture.screen.password.is_some());
        fixture.frame();

        fixture.tap_key("A");
        fixture.tap_key("b");
        fixture.tap_key("DONE");
        fixture.frame();
        fixture.frame();

        assert_eq!(fixture.wifi.borrow().connects, [("home".to_string(), "Ab".to_string())]);
        let stored = WifiCredentials::load(&fixture.ctx.prefs).unwrap();
        assert_eq!(stored.password, "Ab");
        assert_eq!(fixture.screen.status, "Connected to home");
    }

    #[test]
    fn touch_outside_the_keyboard_cancels() {
        let mut fixture = Fixture::new(home_networks());
        fixture.scan();
        fixture.tap_row(0);
        fixture.frame();
        fixture.tap((5, 5));
        assert!(fixture.screen.password.is_none());
        assert!(fixture.wifi.borrow().connects.is_empty());
    }

    #[test]
    fn failed_join_keeps_old_credentials() {
        let mut fixture = Fixture::new(home_networks());
        WifiCredentials {
            ssid: "office".to_string(),
            password: "secret".to_string(),
        }
        .save(&fixture.ctx.prefs);
        fixture.wifi.borrow_mut().fail_connect = true;
        fixture.scan();
        fixture.tap_row(2);
        fixture.frame();
        fixture.frame();

        assert_eq!(fixture.screen.status, "Connection failed");
        assert_eq!(WifiCredentials::load(&fixture.ctx.prefs).unwrap().ssid, "office");
    }

    #[test]
    fn tapping_the_joined_network_disconnects_and_forgets_it() {
        let mut networks = home_networks();
        networks[2].connected = true;
        let mut fixture = Fixture::new(networks);
        WifiCredentials {
            ssid: "office".to_string(),
            password: "secret".to_string(),
        }
        .save(&fixture.ctx.prefs);
        fixture.scan();
        assert_eq!(fixture.screen.ssids()[0], "office");

        fixture.tap_row(0);
        fixture.frame();
        fixture.frame();
        assert_eq!(fixture.wifi.borrow().disconnects, 1);
        assert!(WifiCredentials::load(&fixture.ctx.prefs).is_none());
        assert!(fixture.screen.rows.iter().all(|row| !row.network.connected));
    }

    #[test]
    fn touches_are_absorbed_while_busy() {
        let mut fixture = Fixture::new(home_networks());
        fixture.tap((230, 24));
        assert!(fixture.tap((12, 24)));
        assert!(commands(&fixture.receiver).is_empty());
    }

    #[test]
    fn back_pops() {
        let mut fixture = Fixture::new(Vec::new());
        fixture.tap((12, 24));
        assert_eq!(commands(&fixture.receiver), [NavCommand::Pop]);
    }
}
