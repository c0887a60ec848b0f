use super::button::{Button, ButtonEvent};
use crate::component::{Component, ComponentState};
use crate::fonts;
use crate::layout;
use crate::rect::Rect;
use crate::text;
use crate::touch::Touch;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

const DIALOG_WIDTH: i16 = 190;
const DIALOG_HEIGHT: i16 = 64;
const BUTTON_HEIGHT: i16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    /// Touch absorbed; the dialog stays open.
    Consumed,
    Confirmed,
    Cancelled,
}

/// Modal yes/no question. While open it absorbs every touch.
pub struct ConfirmDialog {
    state: ComponentState,
    message: String,
    buttons: [Button; 2],
}

impl ConfirmDialog {
    pub fn new(message: &str) -> Self {
        Self {
            state: ComponentState::default(),
            message: message.to_string(),
            buttons: [Button::new("Cancel"), Button::new("Confirm")],
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Centre the dialog in `area`.
    pub fn layout(&mut self, area: Rect) {
        let bounds = layout::centered(area, DIALOG_WIDTH, DIALOG_HEIGHT);
        self.set_bounds(bounds);
        let (_, row) = bounds.inset(6).split_bottom(BUTTON_HEIGHT);
        layout::fill_row(&mut self.buttons, row, 10);
    }

    pub fn handle_touch(&mut self, touch: &Touch) -> DialogEvent {
        let [cancel, confirm] = &mut self.buttons;
        let (cancel_event, confirm_event) = (cancel.handle_touch(touch), confirm.handle_touch(touch));
        if cancel_event != ButtonEvent::Ignored || confirm_event != ButtonEvent::Ignored {
            self.mark_dirty();
        }
        match (cancel_event, confirm_event) {
            (ButtonEvent::Clicked, _) => DialogEvent::Cancelled,
            (_, ButtonEvent::Clicked) => DialogEvent::Confirmed,
            _ => DialogEvent::Consumed,
        }
    }
}

impl Component for ConfirmDialog {
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
        rect.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
        rect.into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 2))
            .draw(display)?;

        let (message_area, _) = bounds.inset(6).split_bottom(BUTTON_HEIGHT);
        text::wrapped(display, fonts::FONT_SMALL, &self.message, message_area, BinaryColor::Off)?;

        for button in &mut self.buttons {
            button.mark_dirty();
            button.draw(display)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn dialog() -> ConfirmDialog {
        let mut d = ConfirmDialog::new("Reset all life totals?");
        d.layout(Rect::new(0, 34, 250, 88));
        d
    }

    fn tap(d: &mut ConfirmDialog, x: i16, y: i16) -> DialogEvent {
        let t = Instant::now();
        d.handle_touch(&Touch::press(x, y, t));
        d.handle_touch(&Touch::release(x, y, t))
    }

    #[test]
    fn is_centered() {
        assert_eq!(dialog().bounds(), Rect::new(30, 46, 190, 64));
    }

    #[test]
    fn confirm_and_cancel() {
        let mut d = dialog();
        let cancel = d.buttons[0].bounds().center();
        let confirm = d.buttons[1].bounds().center();
        let (cx, cy) = (i16::try_from(cancel.x).unwrap(), i16::try_from(cancel.y).unwrap());
        assert_eq!(tap(&mut d, cx, cy), DialogEvent::Cancelled);

        let mut d = dialog();
        let (kx, ky) = (i16::try_from(confirm.x).unwrap(), i16::try_from(confirm.y).unwrap());
        assert_eq!(tap(&mut d, kx, ky), DialogEvent::Confirmed);
    }

    #[test]
    fn touches_elsewhere_are_absorbed() {
        let mut d = dialog();
        assert_eq!(tap(&mut d, 5, 40), DialogEvent::Consumed);
    }
}
