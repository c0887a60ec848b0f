use crate::preferences::{Preferences, Value};
use std::collections::{BTreeMap, HashMap};

struct OpenNamespace {
    name: String,
    read_only: bool,
}

/// Volatile preferences store.
///
/// Used by tests and as the fallback when the on-disk store cannot be
/// created. `set_available(false)` makes every `begin` fail, which is how the
/// storage-failure paths are exercised.
pub struct MemoryPreferences {
    namespaces: HashMap<String, BTreeMap<String, Value>>,
    open: Option<OpenNamespace>,
    available: bool,
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespaces: HashMap::new(),
            open: None,
            available: true,
        }
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Whether `namespace` holds any key. Does not require `begin`.
    pub fn contains(&self, namespace: &str, key: &str) -> bool {
        self.namespaces
            .get(namespace)
            .is_some_and(|entries| entries.contains_key(key))
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn writable(&mut self) -> Option<&mut BTreeMap<String, Value>> {
        match &self.open {
            Some(open) if !open.read_only => {
                Some(self.namespaces.entry(open.name.clone()).or_default())
            }
            _ => None,
        }
    }
}

impl Preferences for MemoryPreferences {
    fn begin(&mut self, namespace: &str, read_only: bool) -> bool {
        if !self.available {
            return false;
        }
        if let Some(open) = &self.open {
            log::warn!(
                "Namespace '{}' still open while opening '{namespace}'",
                open.name
            );
        }
        self.open = Some(OpenNamespace {
            name: namespace.to_string(),
            read_only,
        });
        true
    }

    fn end(&mut self) {
        self.open = None;
    }

    fn get(&self, key: &str) -> Option<Value> {
        let open = self.open.as_ref()?;
        self.namespaces.get(&open.name)?.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) -> bool {
        self.writable()
            .map(|entries| entries.insert(key.to_string(), value))
            .is_some()
    }

    fn remove(&mut self, key: &str) -> bool {
        self.writable()
            .and_then(|entries| entries.remove(key))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_written_namespace_reads_defaults() {
        let mut prefs = MemoryPreferences::new();
        assert!(prefs.begin("fresh", true));
        assert_eq!(prefs.get_u16("sleepSecs", 300), 300);
        prefs.end();
    }

    #[test]
    fn read_only_rejects_writes() {
        let mut prefs = MemoryPreferences::new();
        prefs.begin("ns", true);
        assert!(!prefs.put_bool("soundOn", false));
        prefs.end();
        assert!(!prefs.contains("ns", "soundOn"));
    }

    #[test]
    fn namespaces_are_isolated() {
        let mut prefs = MemoryPreferences::new();
        prefs.begin("a", false);
        prefs.put_string("key", "one");
        prefs.end();
        prefs.begin("b", true);
        assert_eq!(prefs.get_string("key", "none"), "none");
        prefs.end();
    }

    #[test]
    fn remove_deletes_key() {
        let mut prefs = MemoryPreferences::new();
        prefs.begin("wifi", false);
        prefs.put_string("ssid", "home");
        assert!(prefs.remove("ssid"));
        assert!(!prefs.remove("ssid"));
        prefs.end();
        assert!(!prefs.contains("wifi", "ssid"));
    }

    #[test]
    fn access_outside_begin_is_rejected() {
        let mut prefs = MemoryPreferences::new();
        assert!(!prefs.put_u8("k", 1));
        assert_eq!(prefs.get("k"), None);
    }

    #[test]
    fn unavailable_store_fails_to_open() {
        let mut prefs = MemoryPreferences::new();
        prefs.set_available(false);
        assert!(!prefs.begin("nav", false));
        assert!(!prefs.is_open());
    }
}
