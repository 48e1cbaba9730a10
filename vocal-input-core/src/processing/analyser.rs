use parking_lot::Mutex;

use super::ring_buffer::RingBuffer;
use super::signal;

/// One analysis path: exposes fixed-size time-domain frames of the most
/// recent audio routed into it.
#[derive(Debug)]
pub struct AnalysisChannel {
    frame_size: usize,
    min_decibels: f32,
    window: Mutex<RingBuffer>,
}

impl AnalysisChannel {
    pub fn new(frame_size: usize, min_decibels: f32) -> Self {
        Self {
            frame_size,
            min_decibels,
            window: Mutex::new(RingBuffer::new(frame_size)),
        }
    }

    /// Copy the newest `out.len()` samples into `out`, oldest first.
    pub fn get_float_time_domain_data(&self, out: &mut [f32]) {
        self.window.lock().copy_into(out);
    }

    /// A fresh `frame_size` buffer of the newest samples.
    pub fn time_domain_frame(&self) -> Vec<f32> {
        let mut frame = vec![0.0f32; self.frame_size];
        self.get_float_time_domain_data(&mut frame);
        frame
    }

    /// Current RMS level in dB, clamped to the noise floor.
    pub fn level_db(&self) -> f32 {
        signal::to_decibels(signal::rms_level(&self.time_domain_frame()), self.min_decibels)
    }

    pub(crate) fn feed(&self, samples: &[f32]) {
        self.window.lock().write(samples);
    }
}
