//! Persistent preferences for inkdeck
//!
//! A small namespaced key-value store in the style of embedded NVS
//! preferences: open a namespace with `begin`, read and write typed values,
//! close it with `end`. Two backends are provided, an in-memory store used by
//! tests and first boot, and a directory of JSON documents used on the device.

pub mod file;
pub mod memory;
pub mod preferences;
pub mod schema;

pub use file::{FilePreferences, StoreError};
pub use memory::MemoryPreferences;
pub use preferences::{Preferences, SharedPreferences, Value, scoped, shared};
