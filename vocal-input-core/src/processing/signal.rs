//! Pure-math helpers over `&[f32]` sample buffers.

/// Root-mean-square level: `sqrt(mean(sample²))`. Empty input reads as 0.
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_sq / samples.len() as f64).sqrt() as f32
}

/// Convert a linear level to dBFS, clamped at `floor_db`.
pub fn to_decibels(level: f32, floor_db: f32) -> f32 {
    if level <= 0.0 {
        return floor_db;
    }
    (20.0 * level.log10()).max(floor_db)
}

/// Downmix interleaved multi-channel audio to mono by averaging channels per frame.
pub fn downmix_to_mono(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    let scale = 1.0 / channels as f32;
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() * scale)
        .collect()
}

/// Split interleaved audio into `outputs` planar paths.
///
/// Output `i` carries source channel `i`; outputs beyond the source's
/// channel count carry silence of the same length.
pub fn split_channels(samples: &[f32], channels: usize, outputs: usize) -> Vec<Vec<f32>> {
    let channels = channels.max(1);
    let frame_count = samples.len() / channels;
    (0..outputs)
        .map(|out| {
            if out < channels {
                samples
                    .chunks_exact(channels)
                    .map(|frame| frame[out])
                    .collect()
            } else {
                vec![0.0; frame_count]
            }
        })
        .collect()
}

/// Linear-interpolation resampler for planar (mono) audio.
#[derive(Debug, Clone)]
pub struct Resampler {
    pub target_sample_rate: f64,
}

impl Resampler {
    pub fn new(target_sample_rate: f64) -> Self {
        Self { target_sample_rate }
    }

    /// Resample from `source_sample_rate` to the target rate.
    /// Returns input unchanged if rates match.
    pub fn resample(&self, samples: &[f32], source_sample_rate: f64) -> Vec<f32> {
        if (source_sample_rate - self.target_sample_rate).abs() < 0.01
            || samples.is_empty()
            || source_sample_rate <= 0.0
        {
            return samples.to_vec();
        }

        let ratio = self.target_sample_rate / source_sample_rate;
        let output_count = (samples.len() as f64 * ratio) as usize;

        (0..output_count)
            .map(|i| {
                let source_index = i as f64 / ratio;
                let index = source_index as usize;
                let fraction = (source_index - index as f64) as f32;
                match (samples.get(index), samples.get(index + 1)) {
                    (Some(a), Some(b)) => a * (1.0 - fraction) + b * fraction,
                    (Some(a), None) => *a,
                    _ => 0.0,
                }
            })
            .collect()
    }
}
