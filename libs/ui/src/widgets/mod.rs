pub mod busy;
pub mod button;
pub mod dialog;
pub mod header;
pub mod keyboard;
pub mod toolbar;

pub use busy::BusyOverlay;
pub use button::{Button, ButtonEvent};
pub use dialog::{ConfirmDialog, DialogEvent};
pub use header::{HeaderBar, HeaderEvent};
pub use keyboard::{Keyboard, KeyboardEvent};
pub use toolbar::Toolbar;
