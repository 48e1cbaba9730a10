use async_trait::async_trait;

use crate::models::assignment::PlayerAssignment;
use crate::models::error::CaptureError;
use crate::models::readings::ChannelPair;
use crate::models::state::InputStatus;

/// Call surface shared by every input variant.
///
/// Device ids are ignored by single-device variants and used as routing
/// keys by the multi-device registry.
#[async_trait]
pub trait PitchInput: Send + Sync {
    /// Begin monitoring. Only acquisition failures are returned; later
    /// pipeline faults are reported and absorbed.
    async fn start_monitoring(
        &self,
        device_id: Option<&str>,
        assignments: &[PlayerAssignment],
    ) -> Result<(), CaptureError>;

    async fn stop_monitoring(&self, device_id: Option<&str>);

    fn get_frequencies(&self, device_id: Option<&str>) -> ChannelPair;

    fn get_volumes(&self, device_id: Option<&str>) -> ChannelPair;

    fn clear_frequencies(&self, device_id: Option<&str>);

    fn get_input_lag(&self, device_id: Option<&str>) -> u32;

    async fn request_readiness(&self, device_id: Option<&str>) -> bool;

    fn get_status(&self, device_id: Option<&str>, channel: Option<u32>) -> InputStatus;
}
