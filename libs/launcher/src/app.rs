use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};
use inkdeck_ui::Screen;

/// Static description of an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppMetadata {
    /// Stable identifier, persisted as the navigation position.
    pub id: &'static str,
    pub name: &'static str,
    /// Glyph in the launcher icon font.
    pub icon: Option<char>,
    /// `false` marks the home app, which is never listed in the launcher.
    pub show_in_launcher: bool,
}

/// Passed to `App::on_launch`.
#[derive(Debug, Clone, Copy)]
pub struct LaunchContext<'a> {
    /// Launchable apps in registration order.
    pub launchable: &'a [&'static AppMetadata],
}

/// A single-purpose app owning one main screen and any number of secondary
/// screens. Apps live for the whole process; navigation toggles them between
/// active and suspended.
pub trait App<D: DrawTarget<Color = BinaryColor>> {
    fn metadata(&self) -> &'static AppMetadata;

    /// The app became current. Load persisted state here.
    fn on_launch(&mut self, _context: &LaunchContext<'_>) {}

    /// The app is being switched away from. Flush persisted state here.
    fn on_suspend(&mut self) {}

    fn main_screen(&mut self) -> &mut dyn Screen<D>;

    /// Secondary screen by id, `None` if the app has no such screen.
    fn screen(&mut self, _id: &str) -> Option<&mut dyn Screen<D>> {
        None
    }
}
