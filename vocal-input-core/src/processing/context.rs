use std::sync::Arc;

use parking_lot::Mutex;

use super::analyser::AnalysisChannel;
use super::signal::{self, Resampler};
use crate::models::error::PipelineError;
use crate::models::state::ContextState;
use crate::traits::capture_stream::{AudioBufferCallback, CaptureStream};
use crate::traits::pitch_strategy::ContextInfo;

/// Audio processing graph for one monitor.
///
/// Routes a capture stream into analysis channels, converting delivered
/// audio to the context rate. Starts suspended; audio only flows while
/// running.
///
/// ```text
/// [CaptureStream] → resample ─┬→ downmix → [AnalysisChannel]        (1 channel)
///                             └→ split   → [AnalysisChannel] × 2    (2 channels)
/// ```
pub struct ProcessingContext {
    sample_rate: f64,
    state: Arc<Mutex<ContextState>>,
}

impl ProcessingContext {
    pub fn new(sample_rate: f64) -> Result<Self, PipelineError> {
        if sample_rate <= 0.0 {
            return Err(PipelineError::Configuration(format!(
                "invalid context sample rate: {}",
                sample_rate
            )));
        }
        Ok(Self {
            sample_rate,
            state: Arc::new(Mutex::new(ContextState::Suspended)),
        })
    }

    pub fn state(&self) -> ContextState {
        *self.state.lock()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn info(&self) -> ContextInfo {
        ContextInfo {
            sample_rate: self.sample_rate,
        }
    }

    pub fn resume(&self) -> Result<(), PipelineError> {
        let mut state = self.state.lock();
        if state.is_closed() {
            return Err(PipelineError::ContextClosed);
        }
        *state = ContextState::Running;
        Ok(())
    }

    pub fn create_analyser(
        &self,
        frame_size: usize,
        min_decibels: f32,
    ) -> Result<Arc<AnalysisChannel>, PipelineError> {
        if self.state().is_closed() {
            return Err(PipelineError::ContextClosed);
        }
        Ok(Arc::new(AnalysisChannel::new(frame_size, min_decibels)))
    }

    /// Start `stream` and route it into `analysers`.
    ///
    /// One analyser receives the down-mixed signal; two analysers receive
    /// source channels 0 and 1 respectively.
    pub fn connect_source(
        &self,
        stream: &mut dyn CaptureStream,
        analysers: &[Arc<AnalysisChannel>],
    ) -> Result<(), PipelineError> {
        if self.state().is_closed() {
            return Err(PipelineError::ContextClosed);
        }
        if !(1..=2).contains(&analysers.len()) {
            return Err(PipelineError::InvalidChannelCount(analysers.len()));
        }

        let state = Arc::clone(&self.state);
        let resampler = Resampler::new(self.sample_rate);
        let analysers: Vec<Arc<AnalysisChannel>> = analysers.to_vec();

        let callback: AudioBufferCallback =
            Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
                if !state.lock().is_running() {
                    return;
                }
                let channels = channels.max(1) as usize;

                if analysers.len() == 1 {
                    let mono = signal::downmix_to_mono(samples, channels);
                    analysers[0].feed(&resampler.resample(&mono, sample_rate));
                } else {
                    let paths = signal::split_channels(samples, channels, analysers.len());
                    for (analyser, path) in analysers.iter().zip(paths) {
                        analyser.feed(&resampler.resample(&path, sample_rate));
                    }
                }
            });

        stream.start(callback)?;
        Ok(())
    }

    /// Close the context. Closing twice is an error.
    pub fn close(&self) -> Result<(), PipelineError> {
        let mut state = self.state.lock();
        if state.is_closed() {
            return Err(PipelineError::ContextClosed);
        }
        *state = ContextState::Closed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::error::CaptureError;
    use crate::test_support::FakeStream;

    #[test]
    fn starts_suspended_and_resumes() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        assert_eq!(ctx.state(), ContextState::Suspended);
        ctx.resume().unwrap();
        assert!(ctx.state().is_running());
    }

    #[test]
    fn double_close_fails() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        ctx.close().unwrap();
        assert_eq!(ctx.close(), Err(PipelineError::ContextClosed));
        assert_eq!(ctx.resume(), Err(PipelineError::ContextClosed));
    }

    #[test]
    fn split_routes_each_source_channel() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        ctx.resume().unwrap();
        let left = ctx.create_analyser(4, -100.0).unwrap();
        let right = ctx.create_analyser(4, -100.0).unwrap();

        let (mut stream, feed) = FakeStream::new(48000.0, 2);
        ctx.connect_source(&mut stream, &[left.clone(), right.clone()]).unwrap();
        feed.push(&[0.1, 0.9, 0.2, 0.8], 48000.0, 2);

        assert_eq!(&left.time_domain_frame()[2..], &[0.1, 0.2]);
        assert_eq!(&right.time_domain_frame()[2..], &[0.9, 0.8]);
    }

    #[test]
    fn single_analyser_receives_downmix() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        ctx.resume().unwrap();
        let mono = ctx.create_analyser(2, -100.0).unwrap();

        let (mut stream, feed) = FakeStream::new(48000.0, 2);
        ctx.connect_source(&mut stream, &[mono.clone()]).unwrap();
        feed.push(&[1.0, 0.0, 0.0, 1.0], 48000.0, 2);

        assert_eq!(mono.time_domain_frame(), vec![0.5, 0.5]);
    }

    #[test]
    fn suspended_context_drops_audio() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        let analyser = ctx.create_analyser(2, -100.0).unwrap();

        let (mut stream, feed) = FakeStream::new(48000.0, 1);
        ctx.connect_source(&mut stream, &[analyser.clone()]).unwrap();
        feed.push(&[0.7, 0.7], 48000.0, 1);

        assert_eq!(analyser.time_domain_frame(), vec![0.0, 0.0]);
    }

    #[test]
    fn delivered_audio_is_resampled_to_context_rate() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        ctx.resume().unwrap();
        let analyser = ctx.create_analyser(16, -100.0).unwrap();

        let (mut stream, feed) = FakeStream::new(24000.0, 1);
        ctx.connect_source(&mut stream, &[analyser.clone()]).unwrap();
        feed.push(&[0.5; 4], 24000.0, 1);

        let frame = analyser.time_domain_frame();
        assert_eq!(frame.iter().filter(|&&s| s != 0.0).count(), 8);
    }

    #[test]
    fn rejects_three_analysers() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        let a = ctx.create_analyser(4, -100.0).unwrap();
        let (mut stream, _feed) = FakeStream::new(48000.0, 2);
        let err = ctx
            .connect_source(&mut stream, &[a.clone(), a.clone(), a])
            .unwrap_err();
        assert_eq!(err, PipelineError::InvalidChannelCount(3));
    }

    #[test]
    fn stream_start_failure_is_a_routing_error() {
        let ctx = ProcessingContext::new(48000.0).unwrap();
        let a = ctx.create_analyser(4, -100.0).unwrap();
        let (mut stream, _feed) = FakeStream::new(48000.0, 1);
        stream.fail_start(CaptureError::DeviceBusy("in use".into()));

        let err = ctx.connect_source(&mut stream, &[a]).unwrap_err();
        assert!(matches!(err, PipelineError::Routing(CaptureError::DeviceBusy(_))));
    }
}
