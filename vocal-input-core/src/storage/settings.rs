use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::traits::settings_store::SettingsStore;

/// In-memory settings, for embedding applications that persist elsewhere.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values.lock().insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.values.lock().remove(key);
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }
}

/// Settings persisted as a flat JSON object of string values.
///
/// The file is re-read on every lookup so edits apply without a restart.
/// A missing or unreadable file behaves like an empty one.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(_) => return HashMap::new(),
        };
        match serde_json::from_str(&json) {
            Ok(values) => values,
            Err(e) => {
                log::warn!("Ignoring malformed settings file {}: {}", self.path.display(), e);
                HashMap::new()
            }
        }
    }
}

impl SettingsStore for JsonFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.load().remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vocal-input-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn memory_settings_roundtrip() {
        let settings = MemorySettings::new();
        settings.set("mic_debug", "1");
        assert_eq!(settings.get("mic_debug").as_deref(), Some("1"));
        settings.remove("mic_debug");
        assert_eq!(settings.get("mic_debug"), None);
    }

    #[test]
    fn json_file_is_reread_on_each_lookup() {
        let path = temp_path("reread");
        fs::write(&path, r#"{"mic_debug":"0"}"#).unwrap();
        let settings = JsonFileSettings::new(&path);
        assert_eq!(settings.get("mic_debug").as_deref(), Some("0"));

        fs::write(&path, r#"{"mic_debug":"1"}"#).unwrap();
        assert_eq!(settings.get("mic_debug").as_deref(), Some("1"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn missing_or_malformed_file_reads_empty() {
        let missing = JsonFileSettings::new(temp_path("missing"));
        assert_eq!(missing.get("mic_debug"), None);

        let path = temp_path("malformed");
        fs::write(&path, "[1, 2").unwrap();
        assert_eq!(JsonFileSettings::new(&path).get("mic_debug"), None);
        fs::remove_file(&path).ok();
    }
}
