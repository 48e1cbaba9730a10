use serde::{Deserialize, Serialize};

use super::constraints::ReservedDeviceIds;

/// What the sampling job does when a tick fires while the previous tick's
/// frequency requests are still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Drop the new tick; readings keep the last completed values.
    #[default]
    SkipWhileInFlight,
    /// Issue anyway. Whichever request resolves last writes the readings.
    LastWriteWins,
}

/// Started-flag handling when the pipeline fails after a successful acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineFailurePolicy {
    /// Stay "started": a new start is refused until `stop_monitoring` runs.
    /// Keeps a flapping pipeline from re-prompting for device access.
    #[default]
    StayStarted,
    /// Clear the flag so the next start re-acquires immediately.
    ResetForRetry,
}

/// Monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfiguration {
    /// Samples per analysis buffer (default: 2048).
    pub frame_size: usize,

    /// Analysis noise floor in dB (default: -100).
    pub min_decibels: f32,

    /// Processing context rate in Hz (default: 48000).
    pub context_sample_rate: f64,

    /// End-to-end latency reported to the game, in ms (default: 180).
    pub input_lag_ms: u32,

    /// Device ids never sent as exact constraints.
    pub reserved_device_ids: ReservedDeviceIds,

    pub overlap_policy: OverlapPolicy,

    pub pipeline_failure_policy: PipelineFailurePolicy,

    /// Tick-summary cadence for debug logging (default: every 40 ticks).
    pub debug_log_every_ticks: u64,
}

impl MonitorConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if self.frame_size < 32 || !self.frame_size.is_power_of_two() {
            return Err(format!("unsupported frame size: {}", self.frame_size));
        }
        if self.context_sample_rate <= 0.0 {
            return Err("sample rate must be positive".into());
        }
        if self.min_decibels >= 0.0 {
            return Err(format!("noise floor must be negative: {}", self.min_decibels));
        }
        Ok(())
    }

    /// Load from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| format!("failed to parse configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Interval between sampling ticks.
    ///
    /// `sample_rate / frame_size`, taken as milliseconds (about 23.4 ms at
    /// 48 kHz with 2048-sample frames).
    pub fn sampling_period(&self) -> std::time::Duration {
        let millis = self.context_sample_rate / self.frame_size as f64;
        std::time::Duration::from_secs_f64(millis.max(1.0) / 1000.0)
    }
}

impl Default for MonitorConfiguration {
    fn default() -> Self {
        Self {
            frame_size: 2048,
            min_decibels: -100.0,
            context_sample_rate: 48000.0,
            input_lag_ms: 180,
            reserved_device_ids: ReservedDeviceIds::default(),
            overlap_policy: OverlapPolicy::default(),
            pipeline_failure_policy: PipelineFailurePolicy::default(),
            debug_log_every_ticks: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MonitorConfiguration::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_size, 2048);
        assert_eq!(config.input_lag_ms, 180);
    }

    #[test]
    fn rejects_odd_frame_size() {
        let config = MonitorConfiguration {
            frame_size: 1000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn sampling_period_follows_rate_over_frame() {
        let period = MonitorConfiguration::default().sampling_period();
        let expected = 48000.0 / 2048.0 / 1000.0;
        assert!((period.as_secs_f64() - expected).abs() < 1e-9);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = MonitorConfiguration::from_json(
            r#"{"overlap_policy":"last_write_wins","reserved_device_ids":["default"]}"#,
        )
        .unwrap();
        assert_eq!(config.overlap_policy, OverlapPolicy::LastWriteWins);
        assert_eq!(config.frame_size, 2048);
        assert!(!config.reserved_device_ids.contains("communications"));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(MonitorConfiguration::from_json(r#"{"frame_size":3}"#).is_err());
        assert!(MonitorConfiguration::from_json("not json").is_err());
    }
}
