use async_trait::async_trait;

use crate::models::error::PipelineError;
use crate::traits::pitch_strategy::{ContextInfo, PitchDetectionStrategy};

/// Below this cumulative-mean-normalized difference a dip counts as a pitch.
const CLARITY_THRESHOLD: f32 = 0.1;

/// Lowest frequency reported; anything below is treated as no pitch.
const MIN_FREQUENCY: f32 = 20.0;

/// YIN fundamental-frequency estimator.
///
/// Silent frames (RMS below `amplitude_threshold`) and frames without a
/// clear periodic dip report 0 Hz. Estimation runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct YinStrategy {
    amplitude_threshold: f32,
    sample_rate: Option<f64>,
}

impl YinStrategy {
    pub fn new() -> Self {
        Self::with_threshold(0.01)
    }

    pub fn with_threshold(amplitude_threshold: f32) -> Self {
        Self {
            amplitude_threshold,
            sample_rate: None,
        }
    }
}

impl Default for YinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PitchDetectionStrategy for YinStrategy {
    async fn init(&mut self, context: ContextInfo, frame_size: usize) -> Result<(), PipelineError> {
        if !(context.sample_rate > 0.0) {
            return Err(PipelineError::StrategyInit(format!(
                "invalid sample rate {}",
                context.sample_rate
            )));
        }
        if frame_size < 32 {
            return Err(PipelineError::StrategyInit(format!(
                "frame size {} too small for YIN",
                frame_size
            )));
        }
        self.sample_rate = Some(context.sample_rate);
        log::debug!("YIN strategy ready: {} Hz, {} samples", context.sample_rate, frame_size);
        Ok(())
    }

    async fn get_frequency(&self, buffer: &[f32]) -> f32 {
        let Some(sample_rate) = self.sample_rate else {
            return 0.0;
        };
        let signal = buffer.to_vec();
        let threshold = self.amplitude_threshold;

        match tokio::task::spawn_blocking(move || detect_pitch(&signal, sample_rate, threshold)).await {
            Ok(frequency) => frequency.unwrap_or(0.0),
            Err(e) => {
                log::warn!("YIN estimation task failed: {}", e);
                0.0
            }
        }
    }
}

/// Estimate the fundamental of `signal`.
///
/// Returns `None` for silence, noise, or frequencies below 20 Hz.
pub fn detect_pitch(signal: &[f32], sample_rate: f64, amplitude_threshold: f32) -> Option<f32> {
    let half = signal.len() / 2;
    if half < 3 {
        return None;
    }

    let rms = (signal.iter().map(|&s| s * s).sum::<f32>() / signal.len() as f32).sqrt();
    if rms < amplitude_threshold {
        return None;
    }

    let mut diff = vec![0.0f32; half];
    for (tau, slot) in diff.iter_mut().enumerate().skip(1) {
        *slot = signal[..half]
            .iter()
            .zip(&signal[tau..tau + half])
            .map(|(a, b)| (a - b) * (a - b))
            .sum();
    }

    // Cumulative mean normalized difference.
    diff[0] = 1.0;
    let mut running_sum = 0.0f32;
    for tau in 1..half {
        running_sum += diff[tau];
        diff[tau] = if running_sum > 0.0 {
            diff[tau] * tau as f32 / running_sum
        } else {
            1.0
        };
    }

    // First dip close to the global minimum, to avoid octave errors.
    let floor = diff[1..].iter().copied().fold(f32::INFINITY, f32::min);
    let mut period = (2..half).find(|&tau| diff[tau] < floor + 0.05 && diff[tau] < diff[tau - 1])?;
    while period + 1 < half && diff[period + 1] < diff[period] {
        period += 1;
    }
    if diff[period] > CLARITY_THRESHOLD || period + 1 >= half {
        return None;
    }

    let (y1, y2, y3) = (diff[period - 1], diff[period], diff[period + 1]);
    let curvature = y1 - 2.0 * y2 + y3;
    let refined = if curvature != 0.0 {
        period as f32 + (y1 - y3) / (2.0 * curvature)
    } else {
        period as f32
    };

    let frequency = sample_rate as f32 / refined;
    (frequency.is_finite() && frequency > MIN_FREQUENCY).then_some(frequency)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;

    fn sine(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| 0.5 * (2.0 * PI * frequency * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn detects_a440() {
        let frequency = detect_pitch(&sine(440.0, 48000.0, 2048), 48000.0, 0.01).unwrap();
        assert!((frequency - 440.0).abs() < 2.0, "got {}", frequency);
    }

    #[test]
    fn detects_low_e() {
        let frequency = detect_pitch(&sine(82.41, 48000.0, 2048), 48000.0, 0.01).unwrap();
        assert!((frequency - 82.41).abs() < 1.0, "got {}", frequency);
    }

    #[test]
    fn silence_has_no_pitch() {
        assert_eq!(detect_pitch(&vec![0.0; 2048], 48000.0, 0.01), None);
    }

    #[test]
    fn tiny_frames_have_no_pitch() {
        assert_eq!(detect_pitch(&[0.5, -0.5, 0.5, -0.5], 48000.0, 0.01), None);
    }

    #[tokio::test]
    async fn uninitialized_strategy_reports_zero() {
        let strategy = YinStrategy::new();
        assert_eq!(strategy.get_frequency(&sine(440.0, 48000.0, 2048)).await, 0.0);
    }

    #[tokio::test]
    async fn estimates_after_init() {
        let mut strategy = YinStrategy::new();
        strategy
            .init(ContextInfo { sample_rate: 48000.0 }, 2048)
            .await
            .unwrap();

        let frequency = strategy.get_frequency(&sine(440.0, 48000.0, 2048)).await;
        assert!((frequency - 440.0).abs() < 2.0);
        assert_eq!(strategy.get_frequency(&vec![0.0; 2048]).await, 0.0);
    }

    #[tokio::test]
    async fn init_rejects_bad_context() {
        let mut strategy = YinStrategy::new();
        let err = strategy
            .init(ContextInfo { sample_rate: 0.0 }, 2048)
            .await
            .unwrap_err();
        assert_eq!(err.name(), "StrategyInitError");
        assert!(strategy.init(ContextInfo { sample_rate: 48000.0 }, 16).await.is_err());
    }
}
