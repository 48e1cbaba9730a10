/// A per-channel pair of values. Single-channel inputs duplicate their
/// reading into both slots.
pub type ChannelPair = [f32; 2];

/// Latest frequency (Hz) and volume (RMS) readings of one input.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    pub frequencies: ChannelPair,
    pub volumes: ChannelPair,
}

impl Readings {
    /// Build readings from per-channel results, padding a single channel
    /// into both slots. Missing values read as 0.
    pub fn from_channels(frequencies: &[f32], volumes: &[f32]) -> Self {
        Self {
            frequencies: pad_pair(frequencies),
            volumes: pad_pair(volumes),
        }
    }
}

fn pad_pair(values: &[f32]) -> ChannelPair {
    match values {
        [] => [0.0, 0.0],
        [only] => [*only, *only],
        [first, second, ..] => [*first, *second],
    }
}
