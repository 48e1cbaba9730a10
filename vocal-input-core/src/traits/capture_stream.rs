use std::sync::Arc;

use crate::models::audio_models::TrackSettings;
use crate::models::error::CaptureError;

/// Callback invoked when a capture buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples.
/// - `sample_rate`: The rate the samples were delivered at.
/// - `channels`: Number of interleaved channels.
pub type AudioBufferCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// An acquired capture device handle.
///
/// Owned exclusively by the monitor that acquired it.
pub trait CaptureStream: Send + Sync {
    /// Settings applied by the platform to the audio track.
    fn settings(&self) -> TrackSettings;

    /// Begin delivering buffers via `callback`.
    ///
    /// The callback may fire on a platform audio thread; keep it short.
    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), CaptureError>;

    /// Stop every track of the stream. Further buffers are not delivered.
    fn stop_tracks(&mut self);
}
