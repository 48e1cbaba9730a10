use async_trait::async_trait;

use super::engine::{ConstraintMode, MonitorEngine, MonitorProfile};
use super::services::MonitorServices;
use crate::events::listener::Subscription;
use crate::models::assignment::PlayerAssignment;
use crate::models::error::CaptureError;
use crate::models::readings::ChannelPair;
use crate::models::state::InputStatus;
use crate::telemetry::Severity;
use crate::traits::pitch_input::PitchInput;

/// Single-device, single-channel monitor that also pushes every completed
/// sample to subscribers.
///
/// Acquires the default device with voice processing enabled. A declined
/// permission prompt is an expected outcome here and is reported at debug
/// severity.
pub struct SimplifiedMonitor {
    engine: MonitorEngine,
}

impl SimplifiedMonitor {
    pub fn new(services: MonitorServices) -> Self {
        let profile = MonitorProfile {
            label: "SimplifiedMonitor",
            channels: 1,
            constraints: ConstraintMode::VoiceProcessed,
            permission_denied_severity: Severity::Debug,
            push_samples: true,
        };
        Self {
            engine: MonitorEngine::new(profile, services),
        }
    }

    /// Receive `(frequency, volume)` after every completed sample, in
    /// registration order.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(f32, f32) + Send + Sync + 'static,
    {
        self.engine
            .shared()
            .samples()
            .subscribe(move |&(frequency, volume)| callback(frequency, volume))
    }

    pub fn is_started(&self) -> bool {
        self.engine.is_started()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }
}

#[async_trait]
impl PitchInput for SimplifiedMonitor {
    async fn start_monitoring(
        &self,
        _device_id: Option<&str>,
        _assignments: &[PlayerAssignment],
    ) -> Result<(), CaptureError> {
        self.engine.start(None).await
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
