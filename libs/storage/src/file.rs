use crate::preferences::{Preferences, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Corrupt preferences file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid namespace name '{0}'")]
    InvalidNamespace(String),
}

struct OpenNamespace {
    name: String,
    read_only: bool,
    entries: BTreeMap<String, Value>,
    modified: bool,
}

/// Preferences stored as one JSON document per namespace.
///
/// A namespace is read into memory on `begin` and written back on `end` if it
/// changed. Writes go to a temporary file that is renamed over the old one so
/// a power cut never leaves a half-written document behind.
pub struct FilePreferences {
    dir: PathBuf,
    open: Option<OpenNamespace>,
}

impl FilePreferences {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir, open: None })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn namespace_path(&self, namespace: &str) -> Result<PathBuf, StoreError> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.dir.join(format!("{namespace}.json")))
    }

    fn load(&self, namespace: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        let path = self.namespace_path(namespace)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt { path, source })
    }

    fn commit(&self, open: &OpenNamespace) -> Result<(), StoreError> {
        let path = self.namespace_path(&open.name)?;
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(&open.entries).map_err(|source| {
            StoreError::Corrupt {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn writable(&mut self) -> Option<&mut OpenNamespace> {
        self.open.as_mut().filter(|open| !open.read_only)
    }
}

impl Preferences for FilePreferences {
    fn begin(&mut self, namespace: &str, read_only: bool) -> bool {
        if self.open.is_some() {
            self.end();
        }
        match self.load(namespace) {
            Ok(entries) => {
                self.open = Some(OpenNamespace {
                    name: namespace.to_string(),
                    read_only,
                    entries,
                    modified: false,
                });
                true
            }
            Err(e) => {
                log::error!("Failed to open preferences: {e}");
                false
            }
        }
    }

    fn end(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        if open.modified
            && let Err(e) = self.commit(&open)
        {
            log::error!("Failed to write preferences: {e}");
        }
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.open.as_ref()?.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) -> bool {
        let Some(open) = self.writable() else {
            return false;
        };
        if open.entries.get(key) != Some(&value) {
            open.entries.insert(key.to_string(), value);
            open.modified = true;
        }
        true
    }

    fn remove(&mut self, key: &str) -> bool {
        let Some(open) = self.writable() else {
            return false;
        };
        let removed = open.entries.remove(key).is_some();
        open.modified |= removed;
        removed
    }
}

impl Drop for FilePreferences {
    fn drop(&mut self) {
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut prefs = FilePreferences::new(dir.path()).unwrap();
            assert!(prefs.begin("mtg", false));
            prefs.put_u8("playerCnt", 4);
            prefs.put_string("p1name", "Chandra");
            prefs.put_i16("p1life", -3);
            prefs.end();
        }

        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        assert!(prefs.begin("mtg", true));
        assert_eq!(prefs.get_u8("playerCnt", 2), 4);
        assert_eq!(prefs.get_string("p1name", ""), "Chandra");
        assert_eq!(prefs.get_i16("p1life", 20), -3);
        prefs.end();
    }

    #[test]
    fn missing_namespace_opens_read_only() {
        let dir = tempdir().unwrap();
        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        assert!(prefs.begin("settings", true));
        assert!(prefs.get_bool("soundOn", true));
        prefs.end();
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn corrupt_file_fails_to_open() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("nav.json"), "{not json").unwrap();
        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        assert!(!prefs.begin("nav", true));
    }

    #[test]
    fn invalid_namespace_is_rejected() {
        let dir = tempdir().unwrap();
        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        assert!(!prefs.begin("../escape", false));
        assert!(!prefs.begin("", false));
    }

    #[test]
    fn unchanged_namespace_is_not_rewritten() {
        let dir = tempdir().unwrap();
        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        prefs.begin("wifi", true);
        prefs.end();
        prefs.begin("wifi", false);
        prefs.end();
        assert!(!dir.path().join("wifi.json").exists());
    }

    #[test]
    fn removed_key_is_persisted() {
        let dir = tempdir().unwrap();
        let mut prefs = FilePreferences::new(dir.path()).unwrap();
        prefs.begin("wifi", false);
        prefs.put_string("ssid", "cafe");
        prefs.put_string("pass", "secret");
        prefs.end();

        prefs.begin("wifi", false);
        assert!(prefs.remove("pass"));
        prefs.end();

        prefs.begin("wifi", true);
        assert_eq!(prefs.get_string("ssid", ""), "cafe");
        assert_eq!(prefs.get_string("pass", "none"), "none");
        prefs.end();
        assert!(!dir.path().join("wifi.json.tmp").exists());
    }
}
