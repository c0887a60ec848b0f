use crate::component::{Component, ComponentState};
use crate::debounce::Debounce;
use crate::fonts;
use crate::text;
use crate::touch::Touch;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle, RoundedRectangle},
};
use std::time::Duration;

/// Longest label a button keeps.
pub const MAX_LABEL_LEN: usize = 15;

/// Outcome of offering a touch to a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// The touch was not for this button.
    Ignored,
    /// Finger went down on the button; nothing fires yet.
    Pressed,
    /// Finger left the button or the tap was debounced.
    Cancelled,
    /// Released inside after a press: fire the action.
    Clicked,
}

impl ButtonEvent {
    pub fn consumed(self) -> bool {
        self != Self::Ignored
    }
}

#[derive(Clone)]
pub struct Button {
    state: ComponentState,
    label: String,
    pressed: bool,
    selected: bool,
    debounce: Debounce,
}

impl Button {
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self {
            state: ComponentState::default(),
            label: text::truncate(label, MAX_LABEL_LEN),
            pressed: false,
            selected: false,
            debounce: Debounce::new(Debounce::BUTTON),
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, window: Duration) -> Self {
        self.debounce = Debounce::new(window);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: &str) {
        let label = text::truncate(label, MAX_LABEL_LEN);
        if label != self.label {
            self.label = label;
            self.mark_dirty();
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Selected buttons render inverted, for option rows.
    pub fn set_selected(&mut self, selected: bool) {
        if selected != self.selected {
            self.selected = selected;
            self.mark_dirty();
        }
    }

    fn set_pressed(&mut self, pressed: bool) {
        if pressed != self.pressed {
            self.pressed = pressed;
            self.mark_dirty();
        }
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> ButtonEvent {
        let inside = self.bounds().contains(touch.x, touch.y);

        if touch.pressed {
            if inside {
                self.set_pressed(true);
                return ButtonEvent::Pressed;
            }
            if self.pressed {
                self.set_pressed(false);
                return ButtonEvent::Cancelled;
            }
            return ButtonEvent::Ignored;
        }

        if touch.released && self.pressed {
            self.set_pressed(false);
            if inside && self.debounce.fire(touch.at) {
                return ButtonEvent::Clicked;
            }
            return ButtonEvent::Cancelled;
        }

        ButtonEvent::Ignored
    }
}

impl Component for Button {
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
        let rect = Rectangle::from(self.bounds());
        let inverted = self.pressed || self.selected;
        let (fill, ink) = if inverted {
            (BinaryColor::Off, BinaryColor::On)
        } else {
            (BinaryColor::On, BinaryColor::Off)
        };

        display.fill_solid(&rect, BinaryColor::On)?;
        let style = PrimitiveStyle::with_stroke(BinaryColor::Off, 1);
        let shape = RoundedRectangle::with_equal_corners(rect, Size::new(3, 3));
        if inverted {
            shape
                .into_styled(PrimitiveStyle::with_fill(fill))
                .draw(display)?;
        } else {
            shape.into_styled(style).draw(display)?;
        }

        text::centered::<fonts::FONT_SMALL, D>(display, &self.label, self.bounds(), ink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;
    use crate::surface::MemoryDisplay;
    use std::time::Instant;

    fn button() -> Button {
        let mut b = Button::new("+1");
        b.set_bounds(Rect::new(10, 10, 30, 20));
        b
    }

    #[test]
    fn press_then_release_inside_clicks() {
        let mut b = button();
        let t = Instant::now();
        assert_eq!(b.handle_touch(&Touch::press(15, 15, t)), ButtonEvent::Pressed);
        assert!(b.is_pressed());
        assert_eq!(b.handle_touch(&Touch::release(15, 15, t)), ButtonEvent::Clicked);
        assert!(!b.is_pressed());
    }

    #[test]
    fn release_outside_cancels() {
        let mut b = button();
        let t = Instant::now();
        b.handle_touch(&Touch::press(15, 15, t));
        assert_eq!(b.handle_touch(&Touch::release(100, 100, t)), ButtonEvent::Cancelled);
    }

    #[test]
    fn press_moving_off_cancels() {
        let mut b = button();
        let t = Instant::now();
        b.handle_touch(&Touch::press(15, 15, t));
        assert_eq!(b.handle_touch(&Touch::press(90, 15, t)), ButtonEvent::Cancelled);
        assert_eq!(b.handle_touch(&Touch::release(15, 15, t)), ButtonEvent::Ignored);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut b = button();
        assert_eq!(b.handle_touch(&Touch::release(15, 15, Instant::now())), ButtonEvent::Ignored);
    }

    #[test]
    fn double_tap_within_window_fires_once() {
        let mut b = button();
        let t = Instant::now();
        b.handle_touch(&Touch::press(15, 15, t));
        assert_eq!(b.handle_touch(&Touch::release(15, 15, t)), ButtonEvent::Clicked);
        let again = t + Duration::from_millis(50);
        b.handle_touch(&Touch::press(15, 15, again));
        assert_eq!(b.handle_touch(&Touch::release(15, 15, again)), ButtonEvent::Cancelled);
        let later = t + Duration::from_millis(200);
        b.handle_touch(&Touch::press(15, 15, later));
        assert_eq!(b.handle_touch(&Touch::release(15, 15, later)), ButtonEvent::Clicked);
    }

    #[test]
    fn label_is_truncated() {
        let b = Button::new("A very long button label");
        assert_eq!(b.label().chars().count(), MAX_LABEL_LEN);
    }

    #[test]
    fn press_feedback_marks_dirty() {
        let mut display = MemoryDisplay::new(60, 40);
        let mut b = button();
        b.draw(&mut display).unwrap();
        assert!(!b.is_dirty());
        b.handle_touch(&Touch::press(15, 15, Instant::now()));
        assert!(b.is_dirty());
        assert!(b.draw(&mut display).unwrap());
    }

    #[test]
    fn unchanged_selection_stays_clean() {
        let mut display = MemoryDisplay::new(60, 40);
        let mut b = button();
        b.draw(&mut display).unwrap();
        b.set_selected(false);
        b.set_label("+1");
        assert!(!b.is_dirty());
        b.set_selected(true);
        assert!(b.is_dirty());
    }
}
