use super::button::{Button, ButtonEvent};
use crate::component::{Component, ComponentState};
use crate::fonts;
use crate::rect::Rect;
use crate::text;
use crate::touch::Touch;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{Line, PrimitiveStyle, Rectangle},
};

const BUTTON_PAD: i16 = 2;
const CHAR_WIDTH: i16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEvent {
    /// Touch was outside the header.
    Ignored,
    /// Touch landed on the header but fired nothing.
    Consumed,
    Left,
    Right,
}

/// Title bar with optional buttons at either end.
pub struct HeaderBar {
    state: ComponentState,
    title: String,
    left: Option<Button>,
    right: Option<Button>,
}

impl HeaderBar {
    pub fn new(title: &str) -> Self {
        Self {
            state: ComponentState::default(),
            title: title.to_string(),
            left: None,
            right: None,
        }
    }

    #[must_use]
    pub fn with_left(mut self, label: &str) -> Self {
        self.left = Some(Button::new(label));
        self
    }

    #[must_use]
    pub fn with_right(mut self, label: &str) -> Self {
        self.right = Some(Button::new(label));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
            self.mark_dirty();
        }
    }

    /// Position the bar and its buttons.
    pub fn layout(&mut self, bounds: Rect) {
        self.set_bounds(bounds);
        let height = bounds.h - 2 * BUTTON_PAD;
        let y = bounds.y + BUTTON_PAD;
        if let Some(left) = &mut self.left {
            let width = button_width(left.label());
            left.set_bounds(Rect::new(bounds.x + BUTTON_PAD, y, width, height));
        }
        if let Some(right) = &mut self.right {
            let width = button_width(right.label());
            right.set_bounds(Rect::new(bounds.right() - BUTTON_PAD - width, y, width, height));
        }
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> HeaderEvent {
        let mut result = HeaderEvent::Ignored;
        let mut changed = false;
        for (button, fired) in [
            (self.left.as_mut(), HeaderEvent::Left),
            (self.right.as_mut(), HeaderEvent::Right),
        ] {
            let Some(button) = button else { continue };
            match button.handle_touch(touch) {
                ButtonEvent::Ignored => {}
                ButtonEvent::Clicked => {
                    changed = true;
                    result = fired;
                }
                ButtonEvent::Pressed | ButtonEvent::Cancelled => {
                    changed = true;
                    if result == HeaderEvent::Ignored {
                        result = HeaderEvent::Consumed;
                    }
                }
            }
        }
        if changed {
            self.mark_dirty();
        }
        if result == HeaderEvent::Ignored && self.bounds().contains(touch.x, touch.y) {
            return HeaderEvent::Consumed;
        }
        result
    }
}

fn button_width(label: &str) -> i16 {
    let chars = i16::try_from(label.chars().count()).unwrap_or(i16::MAX / CHAR_WIDTH);
    chars.saturating_mul(CHAR_WIDTH).saturating_add(10)
}

impl Component for HeaderBar {
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
        display.fill_solid(&Rectangle::from(bounds), BinaryColor::On)?;
        let bottom = i32::from(bounds.bottom()) - 1;
        Line::new(
            Point::new(i32::from(bounds.x), bottom),
            Point::new(i32::from(bounds.right()) - 1, bottom),
        )
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 1))
        .draw(display)?;

        text::centered::<fonts::FONT_HEADER, D>(display, &self.title, bounds, BinaryColor::Off)?;

        for button in [self.left.as_mut(), self.right.as_mut()].into_iter().flatten() {
            button.mark_dirty();
            button.draw(display)?;
        }
        Ok(())
    }
}
