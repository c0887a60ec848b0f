use inkdeck_storage::{SharedPreferences, scoped, schema::{self, wifi}};

/// Network joined last, kept for auto-connect at boot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String,
    pub password: String,
}

impl WifiCredentials {
    pub fn load(prefs: &SharedPreferences) -> Option<Self> {
        scoped(prefs, wifi::NAMESPACE, true, |store| {
            if !schema::is_supported(store) {
                return None;
            }
            let ssid = store.get_string(wifi::SSID, "");
            (!ssid.is_empty()).then(|| Self {
                ssid,
                password: store.get_string(wifi::PASS, ""),
            })
        })
        .flatten()
    }

    pub fn save(&self, prefs: &SharedPreferences) -> bool {
        scoped(prefs, wifi::NAMESPACE, false, |store| {
            schema::stamp(store)
                && store.put_string(wifi::SSID, &self.ssid)
                && store.put_string(wifi::PASS, &self.password)
        })
        .unwrap_or(false)
    }

    /// Forget stored credentials.
    pub fn clear(prefs: &SharedPreferences) -> bool {
        scoped(prefs, wifi::NAMESPACE, false, |store| {
            store.remove(wifi::SSID);
            store.remove(wifi::PASS);
        })
        .is_some()
    }
}
