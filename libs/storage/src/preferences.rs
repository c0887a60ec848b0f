use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// A stored value. Integers share one representation so a value written as
/// `u8` can be read back as `i16` and vice versa when it fits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Namespaced key-value store.
///
/// Reads and writes only succeed between a successful `begin` and the
/// matching `end`. Writes are rejected on a namespace opened read-only.
/// Opening a namespace that was never written succeeds and reads return the
/// caller's defaults.
pub trait Preferences {
    /// Open `namespace`. Returns `false` if the store is unavailable.
    fn begin(&mut self, namespace: &str, read_only: bool) -> bool;

    /// Close the open namespace, committing any writes.
    fn end(&mut self);

    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`. Returns `false` when no namespace is open
    /// for writing.
    fn put(&mut self, key: &str, value: Value) -> bool;

    fn remove(&mut self, key: &str) -> bool;

    fn get_string(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(Value::Str(s)) => s,
            _ => default.to_string(),
        }
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => b,
            _ => default,
        }
    }

    fn get_u8(&self, key: &str, default: u8) -> u8 {
        self.get_int(key).and_then(|v| u8::try_from(v).ok()).unwrap_or(default)
    }

    fn get_i16(&self, key: &str, default: i16) -> i16 {
        self.get_int(key).and_then(|v| i16::try_from(v).ok()).unwrap_or(default)
    }

    fn get_u16(&self, key: &str, default: u16) -> u16 {
        self.get_int(key).and_then(|v| u16::try_from(v).ok()).unwrap_or(default)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(Value::Int(v)) => Some(v),
            _ => None,
        }
    }

    fn put_string(&mut self, key: &str, value: &str) -> bool {
        self.put(key, Value::Str(value.to_string()))
    }

    fn put_bool(&mut self, key: &str, value: bool) -> bool {
        self.put(key, Value::Bool(value))
    }

    fn put_u8(&mut self, key: &str, value: u8) -> bool {
        self.put(key, Value::Int(i64::from(value)))
    }

    fn put_i16(&mut self, key: &str, value: i16) -> bool {
        self.put(key, Value::Int(i64::from(value)))
    }

    fn put_u16(&mut self, key: &str, value: u16) -> bool {
        self.put(key, Value::Int(i64::from(value)))
    }
}

/// Single-threaded handle shared by everything that persists state.
pub type SharedPreferences = Rc<RefCell<dyn Preferences>>;

pub fn shared<P: Preferences + 'static>(prefs: P) -> SharedPreferences {
    Rc::new(RefCell::new(prefs))
}

/// Open `namespace`, run `f`, and close it again.
///
/// Returns `None` when the namespace could not be opened.
pub fn scoped<R>(
    prefs: &SharedPreferences,
    namespace: &str,
    read_only: bool,
    f: impl FnOnce(&mut dyn Preferences) -> R,
) -> Option<R> {
    let mut store = prefs.borrow_mut();
    if !store.begin(namespace, read_only) {
        log::warn!("Preferences namespace '{namespace}' unavailable");
        return None;
    }
    let result = f(&mut *store);
    store.end();
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryPreferences;

    #[test]
    fn integers_read_back_across_widths() {
        let mut prefs = MemoryPreferences::new();
        assert!(prefs.begin("ns", false));
        assert!(prefs.put_u8("count", 4));
        assert!(prefs.put_i16("life", -12));
        assert_eq!(prefs.get_i16("count", 0), 4);
        assert_eq!(prefs.get_u16("count", 0), 4);
        // -12 does not fit an unsigned type
        assert_eq!(prefs.get_u8("life", 7), 7);
        prefs.end();
    }

    #[test]
    fn mismatched_type_falls_back_to_default() {
        let mut prefs = MemoryPreferences::new();
        prefs.begin("ns", false);
        prefs.put_string("flag", "yes");
        assert!(prefs.get_bool("flag", true));
        assert_eq!(prefs.get_string("missing", "fallback"), "fallback");
        prefs.end();
    }

    #[test]
    fn scoped_reports_unavailable_store() {
        let mut memory = MemoryPreferences::new();
        memory.set_available(false);
        let prefs = shared(memory);
        assert_eq!(scoped(&prefs, "ns", true, |_| 1), None);
    }

    #[test]
    fn scoped_closes_namespace() {
        let prefs = shared(MemoryPreferences::new());
        let written = scoped(&prefs, "ns", false, |p| p.put_bool("on", true));
        assert_eq!(written, Some(true));
        // Namespace is closed again, so a bare write is rejected
        assert!(!prefs.borrow_mut().put_bool("on", false));
        let read = scoped(&prefs, "ns", true, |p| p.get_bool("on", false));
        assert_eq!(read, Some(true));
    }
}
