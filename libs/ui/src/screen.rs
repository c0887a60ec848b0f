use crate::surface::Refresh;
use crate::touch::Touch;
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use std::time::Instant;

/// Persistence key of an app's main screen.
pub const MAIN_SCREEN_ID: &str = "main";

/// What a screen's `draw` call painted this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Redraw {
    /// Nothing changed; the panel must not be refreshed.
    #[default]
    None,
    /// Some components were repainted.
    Partial,
    /// The whole surface was cleared and repainted.
    Full,
}

impl Redraw {
    /// The panel refresh this redraw calls for.
    pub fn refresh(self) -> Option<Refresh> {
        match self {
            Self::None => None,
            Self::Partial => Some(Refresh::Partial),
            Self::Full => Some(Refresh::Full),
        }
    }
}

/// A full-view UI state.
///
/// Screens are allocated once by their app and live as long as it does.
/// Only the screen on top of the navigation stack receives `update`, `draw`
/// and `handle_touch`. `on_enter` and `on_exit` bracket each stay on top.
pub trait Screen<D: DrawTarget<Color = BinaryColor>> {
    /// Key used to persist the navigation position. Not used for equality.
    fn screen_id(&self) -> &'static str {
        MAIN_SCREEN_ID
    }

    fn on_enter(&mut self) {}

    fn on_exit(&mut self) {}

    /// Per-frame tick. Must not draw.
    fn update(&mut self, _now: Instant) {}

    /// Repaint what changed. A pending full redraw clears the surface and
    /// repaints everything; otherwise only dirty components are painted.
    fn draw(&mut self, display: &mut D) -> Result<Redraw, D::Error>;

    /// Returns whether the touch was consumed.
    fn handle_touch(&mut self, _touch: &Touch) -> bool {
        false
    }

    fn needs_full_redraw(&self) -> bool;

    fn request_full_redraw(&mut self);
}
