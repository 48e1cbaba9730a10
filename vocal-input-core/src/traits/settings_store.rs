/// Read access to persisted user settings.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}
