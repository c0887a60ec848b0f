pub mod common;
pub mod device;
pub mod display;
mod display_driver;
mod error;
mod touch;
mod touch_driver;

pub use common::{RefreshMode, TouchPhase, TouchSample};
pub use device::{Device, DeviceConfig, EpdResult, Error};
