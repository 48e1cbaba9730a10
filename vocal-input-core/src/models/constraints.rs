use serde::{Deserialize, Serialize};

/// Device ids that must never be requested as an exact constraint.
///
/// Some platforms hang or fail acquisition when asked for the exact
/// "system default" or "communications" pseudo-device. Such ids are sent
/// without a device constraint, letting the platform pick its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservedDeviceIds(Vec<String>);

impl ReservedDeviceIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(ids.into_iter().map(Into::into).collect())
    }

    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.0.iter().any(|id| id == device_id)
    }
}

impl Default for ReservedDeviceIds {
    fn default() -> Self {
        Self::new(["default", "communications"])
    }
}

/// Audio acquisition constraints passed to the capture layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConstraints {
    /// Exact device id. `None` lets the platform choose.
    pub device_id: Option<String>,
    pub echo_cancellation: Option<bool>,
    pub noise_suppression: Option<bool>,
    pub auto_gain_control: Option<bool>,
}

impl CaptureConstraints {
    /// Raw input for pitch analysis: echo cancellation off, exact device
    /// unless the id is reserved.
    pub fn raw_input(device_id: Option<&str>, reserved: &ReservedDeviceIds) -> Self {
        let device_id = device_id
            .filter(|id| !id.is_empty() && !reserved.contains(id))
            .map(str::to_string);

        Self {
            device_id,
            echo_cancellation: Some(false),
            noise_suppression: None,
            auto_gain_control: None,
        }
    }

    /// Default device with echo cancellation and noise suppression on and
    /// automatic gain off. Some mobile browsers deliver intermittent silence
    /// with echo cancellation disabled.
    pub fn voice_processed() -> Self {
        Self {
            device_id: None,
            echo_cancellation: Some(true),
            noise_suppression: Some(true),
            auto_gain_control: Some(false),
        }
    }
}
