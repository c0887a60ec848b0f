use crate::component::{Component, ComponentState};
use crate::fonts;
use crate::text;
use embedded_graphics::{
    Drawable,
    pixelcolor::BinaryColor,
    prelude::*,
    primitives::{PrimitiveStyle, Rectangle},
};

/// Boxed "please wait" message painted before a blocking operation.
pub struct BusyOverlay {
    state: ComponentState,
    message: String,
}

impl BusyOverlay {
    pub fn new(message: &str) -> Self {
        Self {
            state: ComponentState::default(),
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Component for BusyOverlay {
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
        rect.into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(display)?;
        rect.into_styled(PrimitiveStyle::with_stroke(BinaryColor::Off, 2))
            .draw(display)?;
        text::wrapped(display, fonts::FONT_MEDIUM, &self.message, self.bounds(), BinaryColor::Off)
    }
}
