use async_trait::async_trait;

use super::capture_stream::CaptureStream;
use crate::models::audio_models::AudioSource;
use crate::models::constraints::CaptureConstraints;
use crate::models::error::CaptureError;

/// Platform audio acquisition layer.
///
/// `get_user_media` may suspend for a long time (permission prompt) or, on
/// some platforms, indefinitely for reserved device ids.
#[async_trait]
pub trait MediaDevices: Send + Sync {
    async fn get_user_media(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError>;

    async fn enumerate_devices(&self) -> Result<Vec<AudioSource>, CaptureError>;
}
