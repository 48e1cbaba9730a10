use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::sampler::{SamplerJob, SamplerShared};
use super::services::MonitorServices;
use crate::events::MonitorEvent;
use crate::models::config::PipelineFailurePolicy;
use crate::models::constraints::CaptureConstraints;
use crate::models::error::{CaptureError, PipelineError};
use crate::models::readings::Readings;
use crate::models::state::ContextState;
use crate::processing::analyser::AnalysisChannel;
use crate::processing::context::ProcessingContext;
use crate::telemetry::{ErrorReport, Severity};
use crate::traits::capture_stream::CaptureStream;
use crate::traits::pitch_strategy::PitchDetectionStrategy;

/// How a monitor variant shapes its acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintMode {
    /// Exact device (unless reserved), echo cancellation off.
    RawInput,
    /// Default device, echo cancellation and noise suppression on.
    VoiceProcessed,
}

/// Per-variant behavior of a `MonitorEngine`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MonitorProfile {
    pub label: &'static str,
    pub channels: usize,
    pub constraints: ConstraintMode,
    pub permission_denied_severity: Severity,
    pub push_samples: bool,
}

/// Resources owned while monitoring. All `Some` or all `None` outside of
/// `start`/`stop`.
struct EngineState {
    started: bool,
    stream: Option<Box<dyn CaptureStream>>,
    context: Option<ProcessingContext>,
    sampler: Option<JoinHandle<()>>,
    session_id: Option<Uuid>,
}

struct Pipeline {
    context: ProcessingContext,
    analysers: Vec<Arc<AnalysisChannel>>,
    strategy: Box<dyn PitchDetectionStrategy>,
}

/// Capture-and-analysis engine behind every monitor variant.
///
/// ```text
/// [AccessBroker] → [CaptureStream] → [ProcessingContext] → [AnalysisChannel] × 1..2
///                                                                  ↓ every period
///                                   [PitchDetectionStrategy] ← [SamplerJob] → readings
/// ```
pub(crate) struct MonitorEngine {
    profile: MonitorProfile,
    services: MonitorServices,
    state: Mutex<EngineState>,
    shared: Arc<SamplerShared>,
}

impl MonitorEngine {
    pub(crate) fn new(profile: MonitorProfile, services: MonitorServices) -> Self {
        Self {
            profile,
            services,
            state: Mutex::new(EngineState {
                started: false,
                stream: None,
                context: None,
                sampler: None,
                session_id: None,
            }),
            shared: Arc::new(SamplerShared::new()),
        }
    }

    pub(crate) fn channels(&self) -> usize {
        self.profile.channels
    }

    pub(crate) fn services(&self) -> &MonitorServices {
        &self.services
    }

    pub(crate) fn shared(&self) -> &SamplerShared {
        &self.shared
    }

    pub(crate) fn is_started(&self) -> bool {
        self.state.lock().started
    }

    /// Whether a capture handle, context and sampling job are all held.
    pub(crate) fn is_running(&self) -> bool {
        let state = self.state.lock();
        state.stream.is_some() && state.context.is_some() && state.sampler.is_some()
    }

    pub(crate) fn session_id(&self) -> Option<Uuid> {
        self.state.lock().session_id
    }

    pub(crate) fn readings(&self) -> Readings {
        self.shared.readings()
    }

    fn constraints(&self, device_id: Option<&str>) -> CaptureConstraints {
        match self.profile.constraints {
            ConstraintMode::RawInput => {
                CaptureConstraints::raw_input(device_id, &self.services.config.reserved_device_ids)
            }
            ConstraintMode::VoiceProcessed => CaptureConstraints::voice_processed(),
        }
    }

    /// Acquire the device and start sampling.
    ///
    /// A call while already started is a no-op. Acquisition failures clear
    /// the started flag and are returned; pipeline failures are reported and
    /// absorbed.
    pub(crate) async fn start(&self, device_id: Option<&str>) -> Result<(), CaptureError> {
        let epoch = {
            let mut state = self.state.lock();
            if state.started {
                return Ok(());
            }
            state.started = true;
            self.shared.advance_epoch()
        };
        let session_id = Uuid::new_v4();

        let label = self.profile.label;
        let debug = &self.services.debug;
        let constraints = self.constraints(device_id);
        crate::mic_log!(
            debug,
            "{}.start_monitoring - requesting stream: device={:?} constraints={:?}",
            label,
            device_id,
            constraints
        );

        let mut stream = match self.services.broker.get_user_media(&constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                self.release_start_claim(epoch);
                self.report_acquisition_failure(&e, session_id);
                return Err(e);
            }
        };

        let settings = stream.settings();
        crate::mic_log!(
            debug,
            "{} stream acquired: requested={:?} settings={:?}",
            label,
            device_id,
            settings
        );

        let pipeline = match self.build_pipeline(stream.as_mut()).await {
            Ok(pipeline) => pipeline,
            Err(e) => {
                stream.stop_tracks();
                if self.services.config.pipeline_failure_policy == PipelineFailurePolicy::ResetForRetry {
                    self.release_start_claim(epoch);
                }
                self.report_pipeline_failure(&e, session_id);
                return Ok(());
            }
        };

        let strategy: Arc<dyn PitchDetectionStrategy> = Arc::from(pipeline.strategy);
        {
            let mut state = self.state.lock();
            if !state.started || self.shared.epoch() != epoch {
                // Stopped (and possibly restarted) while acquiring.
                drop(state);
                stream.stop_tracks();
                let _ = pipeline.context.close();
                crate::mic_log!(debug, "{} start superseded by stop", label);
                return Ok(());
            }

            let job = SamplerJob {
                epoch,
                label,
                analysers: pipeline.analysers,
                strategy,
                shared: Arc::clone(&self.shared),
                period: self.services.config.sampling_period(),
                overlap: self.services.config.overlap_policy,
                push_samples: self.profile.push_samples,
                debug: debug.clone(),
                log_every: self.services.config.debug_log_every_ticks,
            };

            state.stream = Some(stream);
            state.context = Some(pipeline.context);
            state.sampler = Some(job.spawn());
            state.session_id = Some(session_id);
        }

        log::info!(
            "{} monitoring started (session {}, {} channel(s), {} Hz)",
            label,
            session_id,
            self.profile.channels,
            self.services.config.context_sample_rate
        );
        self.services.events.publish(MonitorEvent::MonitoringStarted);
        Ok(())
    }

    async fn build_pipeline(&self, stream: &mut dyn CaptureStream) -> Result<Pipeline, PipelineError> {
        let config = &self.services.config;
        let debug = &self.services.debug;
        config.validate().map_err(PipelineError::Configuration)?;

        let context = ProcessingContext::new(config.context_sample_rate)?;
        crate::mic_log!(
            debug,
            "processing context created: state={:?} sample_rate={}",
            context.state(),
            context.sample_rate()
        );

        match self.wire(&context, stream).await {
            Ok((analysers, strategy)) => Ok(Pipeline {
                context,
                analysers,
                strategy,
            }),
            Err(e) => {
                let _ = context.close();
                Err(e)
            }
        }
    }

    async fn wire(
        &self,
        context: &ProcessingContext,
        stream: &mut dyn CaptureStream,
    ) -> Result<(Vec<Arc<AnalysisChannel>>, Box<dyn PitchDetectionStrategy>), PipelineError> {
        let config = &self.services.config;
        let debug = &self.services.debug;

        if context.state() == ContextState::Suspended {
            context.resume()?;
            crate::mic_log!(debug, "processing context resumed: state={:?}", context.state());
        }

        let analysers = (0..self.profile.channels)
            .map(|_| context.create_analyser(config.frame_size, config.min_decibels))
            .collect::<Result<Vec<_>, _>>()?;
        context.connect_source(stream, &analysers)?;

        let mut strategy = (self.services.strategy_factory)();
        strategy.init(context.info(), config.frame_size).await?;
        crate::mic_log!(debug, "pitch strategy init OK");

        Ok((analysers, strategy))
    }

    /// Stop sampling and release every owned resource. No-op when not started.
    pub(crate) async fn stop(&self) {
        let (sampler, stream, context, session_id) = {
            let mut state = self.state.lock();
            if !state.started {
                return;
            }
            state.started = false;
            self.shared.advance_epoch();
            (
                state.sampler.take(),
                state.stream.take(),
                state.context.take(),
                state.session_id.take(),
            )
        };

        crate::mic_log!(self.services.debug, "{}.stop_monitoring", self.profile.label);

        if let Some(sampler) = sampler {
            sampler.abort();
        }
        if let Some(mut stream) = stream {
            stream.stop_tracks();
        }
        if let Some(context) = context {
            if let Err(e) = context.close() {
                log::warn!("{}.stop_monitoring: closing context failed: {}", self.profile.label, e);
            }
        }

        match session_id {
            Some(id) => log::info!("{} monitoring stopped (session {})", self.profile.label, id),
            None => log::info!("{} monitoring stopped", self.profile.label),
        }
        self.services.events.publish(MonitorEvent::MonitoringStopped);
    }

    /// Clear the started flag unless a stop/start already superseded `epoch`.
    fn release_start_claim(&self, epoch: u64) {
        let mut state = self.state.lock();
        if state.started && self.shared.epoch() == epoch {
            state.started = false;
        }
    }

    fn report_acquisition_failure(&self, error: &CaptureError, session_id: Uuid) {
        let label = self.profile.label;
        let severity = if error.is_permission_denied() {
            self.profile.permission_denied_severity
        } else {
            Severity::Warning
        };

        crate::mic_log!(
            self.services.debug,
            "{} get_user_media failed: name={} message={} constraint={:?}",
            label,
            error.name(),
            error,
            error.constraint()
        );
        match severity {
            Severity::Debug => log::debug!("{} acquisition declined: {}", label, error),
            _ => log::warn!("{} acquisition failed: {}", label, error),
        }

        self.services.reporter.report(ErrorReport::new(
            severity,
            format!("{}.start_monitoring", label),
            error.name(),
            error.to_string(),
        )
        .with_session(session_id));
    }

    fn report_pipeline_failure(&self, error: &PipelineError, session_id: Uuid) {
        let label = self.profile.label;
        log::error!("{} pipeline setup failed: {}", label, error);
        self.services.reporter.report(ErrorReport::new(
            Severity::Error,
            format!("{}.start_monitoring", label),
            error.name(),
            error.to_string(),
        )
        .with_session(session_id));
    }
}

impl Drop for MonitorEngine {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if let Some(sampler) = state.sampler.take() {
            sampler.abort();
        }
        if let Some(mut stream) = state.stream.take() {
            stream.stop_tracks();
        }
        if let Some(context) = state.context.take() {
            let _ = context.close();
        }
    }
}
