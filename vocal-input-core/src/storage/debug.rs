use std::sync::Arc;

use crate::traits::settings_store::SettingsStore;

/// Persisted setting that turns on verbose capture diagnostics.
pub const MIC_DEBUG_KEY: &str = "mic_debug";

/// Log target for gated diagnostics.
pub const MIC_LOG_TARGET: &str = "vocal_input::mic";

/// Verbose diagnostic logging toggle.
///
/// Enabled only while the `mic_debug` setting is exactly `"1"`. The setting
/// is read on every check.
#[derive(Clone)]
pub struct MicDebug {
    settings: Option<Arc<dyn SettingsStore>>,
}

impl MicDebug {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings: Some(settings),
        }
    }

    pub fn disabled() -> Self {
        Self { settings: None }
    }

    pub fn enabled(&self) -> bool {
        self.settings
            .as_ref()
            .and_then(|s| s.get(MIC_DEBUG_KEY))
            .is_some_and(|v| v == "1")
    }
}

impl Default for MicDebug {
    fn default() -> Self {
        Self::disabled()
    }
}

impl std::fmt::Debug for MicDebug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MicDebug").field("enabled", &self.enabled()).finish()
    }
}

/// `log::debug!` to the mic target, only while `MicDebug` is enabled.
#[macro_export]
macro_rules! mic_log {
    ($debug:expr, $($arg:tt)+) => {
        if $debug.enabled() {
            log::debug!(target: $crate::storage::debug::MIC_LOG_TARGET, $($arg)+);
        }
    };
}
