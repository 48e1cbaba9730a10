use std::sync::Arc;

use async_trait::async_trait;

use crate::models::error::PipelineError;

/// What a strategy learns about the processing context at init.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextInfo {
    pub sample_rate: f64,
}

/// Fundamental-frequency estimator.
///
/// `get_frequency` may take longer than one sampling period; calls from
/// consecutive ticks can be in flight at the same time.
#[async_trait]
pub trait PitchDetectionStrategy: Send + Sync {
    async fn init(&mut self, context: ContextInfo, frame_size: usize) -> Result<(), PipelineError>;

    /// Estimated frequency in Hz, 0 when no pitch is found.
    async fn get_frequency(&self, buffer: &[f32]) -> f32;
}

/// Builds a fresh strategy for every monitoring session.
pub type StrategyFactory = Arc<dyn Fn() -> Box<dyn PitchDetectionStrategy> + Send + Sync>;
