use crate::app::{App, AppMetadata};
use embedded_graphics::{pixelcolor::BinaryColor, prelude::DrawTarget};

pub const MAX_APPS: usize = 8;

/// Fixed-capacity set of apps, populated once at startup.
pub struct AppRegistry<D: DrawTarget<Color = BinaryColor>> {
    apps: heapless::Vec<Box<dyn App<D>>, MAX_APPS>,
    home: Option<usize>,
}

impl<D: DrawTarget<Color = BinaryColor>> Default for AppRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: DrawTarget<Color = BinaryColor>> AppRegistry<D> {
    pub fn new() -> Self {
        Self {
            apps: heapless::Vec::new(),
            home: None,
        }
    }

    /// Add `app`. Rejected with an error log when the registry is full or
    /// the id is taken. An app hidden from the launcher becomes the home
    /// app, replacing any earlier one.
    pub fn register_app(&mut self, app: Box<dyn App<D>>) -> bool {
        let metadata = app.metadata();
        if self.position(metadata.id).is_some() {
            log::error!("App '{}' is already registered", metadata.id);
            return false;
        }
        let index = self.apps.len();
        if self.apps.push(app).is_err() {
            log::error!("App registry full ({MAX_APPS}), '{}' not registered", metadata.id);
            return false;
        }
        if !metadata.show_in_launcher {
            if let Some(previous) = self.home.and_then(|i| self.apps.get(i)) {
                log::warn!(
                    "Home app '{}' replaced by '{}'",
                    previous.metadata().id,
                    metadata.id
                );
            }
            self.home = Some(index);
        }
        log::info!("Registered app '{}'", metadata.id);
        true
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    pub fn launchable_app_count(&self) -> usize {
        self.launchable().count()
    }

    /// The `index`th launchable app, in registration order.
    pub fn launchable_app(&self, index: usize) -> Option<&'static AppMetadata> {
        self.launchable().nth(index)
    }

    /// Metadata of every launchable app, in registration order.
    pub fn launchable_metadata(&self) -> heapless::Vec<&'static AppMetadata, MAX_APPS> {
        self.launchable().collect()
    }

    pub fn find_app(&self, id: &str) -> Option<&dyn App<D>> {
        self.position(id).and_then(|i| self.get(i))
    }

    pub fn home_app(&self) -> Option<&dyn App<D>> {
        self.home.and_then(|i| self.get(i))
    }

    pub(crate) fn home_index(&self) -> Option<usize> {
        self.home
    }

    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.apps.iter().position(|app| app.metadata().id == id)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&dyn App<D>> {
        self.apps.get(index).map(AsRef::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut (dyn App<D> + 'static)> {
        self.apps.get_mut(index).map(AsMut::as_mut)
    }

    fn launchable(&self) -> impl Iterator<Item = &'static AppMetadata> + '_ {
        self.apps
            .iter()
            .map(|app| app.metadata())
            .filter(|metadata| metadata.show_in_launcher)
    }
}
