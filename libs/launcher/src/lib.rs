//! App registry and navigation engine for inkdeck
//!
//! Apps are registered once at startup. `Navigation` owns the registry and
//! a bounded stack of screens belonging to the current app; only the top
//! screen is updated, drawn and receives touches. Screens ask for
//! navigation through a `Navigator`, and the requests are applied once the
//! screen has returned control.

pub mod app;
pub mod navigation;
pub mod navigator;
pub mod registry;

pub use app::{App, AppMetadata, LaunchContext};
pub use navigation::{MAX_DEPTH, Navigation};
pub use navigator::{NavCommand, Navigator, channel};
pub use registry::{AppRegistry, MAX_APPS};
