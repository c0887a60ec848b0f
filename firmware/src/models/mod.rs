//! Persisted app state

pub mod credentials;
pub mod game;
pub mod player;
pub mod settings;

pub use credentials::WifiCredentials;
pub use game::GameState;
pub use player::Player;
pub use settings::Settings;
