use async_trait::async_trait;
use uuid::Uuid;

use super::engine::{ConstraintMode, MonitorEngine, MonitorProfile};
use super::services::MonitorServices;
use crate::models::assignment::PlayerAssignment;
use crate::models::error::CaptureError;
use crate::models::readings::ChannelPair;
use crate::models::state::InputStatus;
use crate::telemetry::Severity;
use crate::traits::pitch_input::PitchInput;

/// How many analysis paths a monitor builds from its device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    /// The device signal, down-mixed, feeds one analysis channel.
    Mono,
    /// Source channels 0 and 1 feed one analysis channel each.
    Split,
}

impl ChannelLayout {
    pub fn channel_count(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Split => 2,
        }
    }
}

/// Per-device capture-and-analysis unit, polled for readings.
///
/// Readings are always a pair; a mono monitor reports its single value
/// in both slots.
pub struct ChannelMonitor {
    engine: MonitorEngine,
}

impl ChannelMonitor {
    pub fn new(layout: ChannelLayout, services: MonitorServices) -> Self {
        let profile = MonitorProfile {
            label: "ChannelMonitor",
            channels: layout.channel_count(),
            constraints: ConstraintMode::RawInput,
            permission_denied_severity: Severity::Warning,
            push_samples: false,
        };
        Self {
            engine: MonitorEngine::new(profile, services),
        }
    }

    pub fn channels(&self) -> usize {
        self.engine.channels()
    }

    pub fn is_started(&self) -> bool {
        self.engine.is_started()
    }

    /// True while the device, context and sampling job are all held.
    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.engine.session_id()
    }
}

#[async_trait]
impl PitchInput for ChannelMonitor {
    async fn start_monitoring(
        &self,
        device_id: Option<&str>,
        _assignments: &[PlayerAssignment],
    ) -> Result<(), CaptureError> {
        self.engine.start(device_id).await
    }

    async fn stop_monitoring(&self, _device_id: Option<&str>) {
        self.engine.stop().await
    }

    fn get_frequencies(&self, _device_id: Option<&str>) -> ChannelPair {
        self.engine.readings().frequencies
    }

    fn get_volumes(&self, _device_id: Option<&str>) -> ChannelPair {
        self.engine.readings().volumes
    }

    fn clear_frequencies(&self, _device_id: Option<&str>) {}

    fn get_input_lag(&self, _device_id: Option<&str>) -> u32 {
        self.engine.services().config.input_lag_ms
    }

    async fn request_readiness(&self, _device_id: Option<&str>) -> bool {
        true
    }

    fn get_status(&self, _device_id: Option<&str>, _channel: Option<u32>) -> InputStatus {
        InputStatus::Ok
    }
}
