use serde::{Deserialize, Serialize};

/// Kind of device reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    #[serde(rename = "audioinput")]
    AudioInput,
    #[serde(rename = "audiooutput")]
    AudioOutput,
}

/// An audio device exposed by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSource {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
    pub is_default: bool,
}

/// Settings actually applied to an acquired capture track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackSettings {
    pub device_id: Option<String>,
    pub sample_rate: f64,
    pub channel_count: u16,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for TrackSettings {
    fn default() -> Self {
        Self {
            device_id: None,
            sample_rate: 48000.0,
            channel_count: 1,
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
        }
    }
}
