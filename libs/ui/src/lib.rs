//! Screens, components and the redraw protocol for inkdeck
//!
//! E-ink refresh is slow and a full refresh visibly flashes the panel, so
//! drawing is split in two tiers. A screen that was just entered, or whose
//! layout changed, repaints everything and asks for a full refresh. In the
//! steady state only components whose dirty flag is set are repainted and
//! the panel gets a fast partial refresh. Nothing drawn means no refresh.

pub mod chrome;
pub mod component;
pub mod debounce;
pub mod fonts;
pub mod layout;
pub mod rect;
pub mod screen;
pub mod status;
pub mod surface;
pub mod text;
pub mod touch;
pub mod widgets;

pub use chrome::{Chrome, Frame};
pub use component::{Component, ComponentState};
pub use debounce::Debounce;
pub use rect::Rect;
pub use screen::{MAIN_SCREEN_ID, Redraw, Screen};
pub use status::{StatusReading, StatusSource, SystemStatus};
pub use surface::{MemoryDisplay, Refresh, Surface};
pub use touch::Touch;
