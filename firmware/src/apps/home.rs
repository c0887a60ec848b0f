use super::AppContext;
use crate::sound::Sound;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};
use inkdeck_launcher::{App, AppMetadata, LaunchContext, Navigator};
use inkdeck_ui::{
    Chrome, Component, ComponentState, Debounce, Rect, Redraw, Screen, Touch, fonts, text,
};
use std::rc::Rc;
use std::time::Instant;
use u8g2_fonts::types::{HorizontalAlignment, VerticalPosition};

const CARD_WIDTH: i16 = 80;
const CARD_HEIGHT: i16 = 70;
const CARD_SPACING: i16 = 10;
const ICON_TOP: i16 = 14;
const LABEL_BOTTOM: i16 = 14;

static METADATA: AppMetadata = AppMetadata {
    id: "home",
    name: "Home",
    icon: None,
    show_in_launcher: false,
};

/// Launcher tile for one app. Launches on release inside the tile.
struct AppCard {
    state: ComponentState,
    metadata: &'static AppMetadata,
    pressed: bool,
    debounce: Debounce,
}

impl AppCard {
    fn new(metadata: &'static AppMetadata) -> Self {
        Self {
            state: ComponentState::default(),
            metadata,
            pressed: false,
            debounce: Debounce::new(Debounce::BUTTON),
        }
    }

    fn set_pressed(&mut self, pressed: bool) {
        if pressed != self.pressed {
            self.pressed = pressed;
            self.mark_dirty();
        }
    }

    /// Returns whether the touch was for this card and, on release,
    /// whether it should launch.
    fn handle_touch(&mut self, touch: &Touch) -> (bool, bool) {
        let inside = self.bounds().contains(touch.x, touch.y);
        if touch.pressed {
            self.set_pressed(inside);
            return (inside, false);
        }
        if touch.released && self.pressed {
            self.set_pressed(false);
            return (true, inside && self.debounce.fire(touch.at));
        }
        (false, false)
    }
}

impl Component for AppCard {
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
        let rect = Rectangle::from(bounds);
        let (fill, ink) = if self.pressed {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };
        rect.into_styled(PrimitiveStyle::with_fill(fill)).draw(display)?;
        rect.into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
            .draw(display)?;

        if let Some(icon) = self.metadata.icon {
            let mut glyph = [0; 4];
            text::render::<fonts::ICON_APPS, D>(
                display,
                icon.encode_utf8(&mut glyph),
                Point::new(bounds.center().x, i32::from(bounds.y + ICON_TOP)),
                VerticalPosition::Top,
                HorizontalAlignment::Center,
                ink,
            )?;
        }

        let (_, label_area) = bounds.split_bottom(LABEL_BOTTOM + 6);
        text::centered::<fonts::FONT_SMALL, D>(display, self.metadata.name, label_area, ink)
    }
}

/// Centred row of launcher cards below the toolbar.
fn card_rects(count: usize, area: Rect) -> Vec<Rect> {
    let Ok(n) = i16::try_from(count) else {
        return Vec::new();
    };
    if n == 0 {
        return Vec::new();
    }
    let width = CARD_WIDTH.min((area.w - CARD_SPACING * (n + 1)) / n);
    let total = n * width + (n - 1) * CARD_SPACING;
    let x = area.x + (area.w - total) / 2;
    let height = CARD_HEIGHT.min(area.h);
    let y = area.y + (area.h - height) / 2;
    (0..n)
        .map(|i| Rect::new(x + i * (width + CARD_SPACING), y, width, height))
        .collect()
}

/// Launcher grid, rebuilt from the registry each time Home is launched.
pub struct HomeScreen {
    chrome: Chrome,
    navigator: Navigator,
    sound: Rc<Sound>,
    cards: Vec<AppCard>,
}

impl HomeScreen {
    fn new(ctx: &AppContext) -> Self {
        Self {
            chrome: Chrome::new(ctx.toolbar()),
            navigator: ctx.navigator.clone(),
            sound: Rc::clone(&ctx.sound),
            cards: Vec::new(),
        }
    }

    fn set_apps(&mut self, launchable: &[&'static AppMetadata]) {
        self.cards = launchable.iter().map(|metadata| AppCard::new(metadata)).collect();
        self.chrome.request_full_redraw();
    }
}

impl<D: DrawTarget<Color = BinaryColor>> Screen<D> for HomeScreen {
    fn on_enter(&mut self) {
        self.chrome.request_full_redraw();
    }

    fn update(&mut self, now: Instant) {
        self.chrome.update(now);
    }

    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error> {
        let mut frame = self.chrome.begin(display)?;
        if frame.is_full() {
            let rects = card_rects(self.cards.len(), frame.content());
            for (card, rect) in self.cards.iter_mut().zip(rects) {
                card.set_bounds(rect);
            }
        }
        for card in &mut self.cards {
            frame.draw(card)?;
        }
        Ok(frame.finish())
    }

    fn handle_touch(&mut self, touch: &Touch) -> bool {
        let mut consumed = false;
        let mut launch = None;
        for card in &mut self.cards {
            let (hit, fire) = card.handle_touch(touch);
            consumed |= hit;
            if fire {
                launch = Some(card.metadata.id);
            }
        }
        if let Some(id) = launch {
            log::info!("Launcher tapped '{id}'");
            self.sound.click();
            self.navigator.launch(id);
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

pub struct HomeApp {
    screen: HomeScreen,
}

impl HomeApp {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            screen: HomeScreen::new(ctx),
        }
    }
}

impl<D: DrawTarget<Color = BinaryColor>> App<D> for HomeApp {
    fn metadata(&self) -> &'static AppMetadata {
        &METADATA
    }

    fn on_launch(&mut self, context: &LaunchContext<'_>) {
        self.screen.set_apps(context.launchable);
    }

    fn main_screen(&mut self) -> &mut dyn Screen<D> {
        &mut self.screen
    }
}
