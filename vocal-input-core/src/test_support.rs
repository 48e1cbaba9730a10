//! Fakes for the external collaborators, shared by unit tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::models::audio_models::{AudioSource, DeviceKind, TrackSettings};
use crate::models::constraints::CaptureConstraints;
use crate::models::error::{CaptureError, PipelineError};
use crate::telemetry::ErrorReport;
use crate::traits::capture_stream::{AudioBufferCallback, CaptureStream};
use crate::traits::error_reporter::ErrorReporter;
use crate::traits::media_devices::MediaDevices;
use crate::traits::pitch_strategy::{ContextInfo, PitchDetectionStrategy, StrategyFactory};

type SharedCallback = Arc<Mutex<Option<AudioBufferCallback>>>;

pub struct FakeStream {
    settings: TrackSettings,
    callback: SharedCallback,
    stopped: Arc<AtomicBool>,
    start_error: Option<CaptureError>,
}

/// Test-side handle that pushes audio into a `FakeStream`.
#[derive(Clone)]
pub struct StreamFeed {
    callback: SharedCallback,
    stopped: Arc<AtomicBool>,
}

impl FakeStream {
    pub fn new(sample_rate: f64, channels: u16) -> (Self, StreamFeed) {
        let callback: SharedCallback = Arc::new(Mutex::new(None));
        let stopped = Arc::new(AtomicBool::new(false));
        let stream = Self {
            settings: TrackSettings {
                sample_rate,
                channel_count: channels,
                ..TrackSettings::default()
            },
            callback: Arc::clone(&callback),
            stopped: Arc::clone(&stopped),
            start_error: None,
        };
        (stream, StreamFeed { callback, stopped })
    }

    pub fn fail_start(&mut self, error: CaptureError) {
        self.start_error = Some(error);
    }
}

impl CaptureStream for FakeStream {
    fn settings(&self) -> TrackSettings {
        self.settings.clone()
    }

    fn start(&mut self, callback: AudioBufferCallback) -> Result<(), CaptureError> {
        if let Some(e) = self.start_error.take() {
            return Err(e);
        }
        *self.callback.lock() = Some(callback);
        Ok(())
    }

    fn stop_tracks(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
        *self.callback.lock() = None;
    }
}

impl StreamFeed {
    pub fn push(&self, samples: &[f32], sample_rate: f64, channels: u16) {
        let callback = self.callback.lock().clone();
        if let Some(cb) = callback {
            cb(samples, sample_rate, channels);
        }
    }

    /// Push `frames` frames where every sample of channel `c` is `levels[c]`.
    pub fn push_constant(&self, levels: &[f32], frames: usize) {
        let samples: Vec<f32> = (0..frames).flat_map(|_| levels.iter().copied()).collect();
        self.push(&samples, 48000.0, levels.len() as u16);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// Scripted acquisition layer.
pub struct FakeDevices {
    failures: Mutex<VecDeque<CaptureError>>,
    stream_start_failures: Mutex<VecDeque<CaptureError>>,
    requests: Mutex<Vec<CaptureConstraints>>,
    feeds: Mutex<Vec<StreamFeed>>,
    channels: Mutex<u16>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeDevices {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            failures: Mutex::new(VecDeque::new()),
            stream_start_failures: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            feeds: Mutex::new(Vec::new()),
            channels: Mutex::new(2),
            gate: Mutex::new(None),
        })
    }

    pub fn fail_next(&self, error: CaptureError) {
        self.failures.lock().push_back(error);
    }

    /// The next acquired stream refuses to start (pipeline failure).
    pub fn fail_next_stream_start(&self, error: CaptureError) {
        self.stream_start_failures.lock().push_back(error);
    }

    /// Acquisitions wait until `release` is called.
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.add_permits(Semaphore::MAX_PERMITS / 2);
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn last_request(&self) -> Option<CaptureConstraints> {
        self.requests.lock().last().cloned()
    }

    pub fn feed(&self, index: usize) -> StreamFeed {
        self.feeds.lock()[index].clone()
    }

    pub fn last_feed(&self) -> StreamFeed {
        self.feeds.lock().last().cloned().expect("no stream acquired")
    }
}

#[async_trait]
impl MediaDevices for FakeDevices {
    async fn get_user_media(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        self.requests.lock().push(constraints.clone());

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        if let Some(e) = self.failures.lock().pop_front() {
            return Err(e);
        }

        let (mut stream, feed) = FakeStream::new(48000.0, *self.channels.lock());
        if let Some(e) = self.stream_start_failures.lock().pop_front() {
            stream.fail_start(e);
        }
        self.feeds.lock().push(feed);
        Ok(Box::new(stream))
    }

    async fn enumerate_devices(&self) -> Result<Vec<AudioSource>, CaptureError> {
        if let Some(e) = self.failures.lock().pop_front() {
            return Err(e);
        }
        Ok(vec![AudioSource {
            id: "fake-mic".into(),
            label: "Fake Microphone".into(),
            kind: DeviceKind::AudioInput,
            is_default: true,
        }])
    }
}

/// Strategy whose estimate is the last sample of the buffer × 1000, after
/// an optional delay. Lets tests tell channels apart.
pub struct ScriptedStrategy {
    delay: Duration,
    init_error: Option<PipelineError>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PitchDetectionStrategy for ScriptedStrategy {
    async fn init(&mut self, _context: ContextInfo, _frame_size: usize) -> Result<(), PipelineError> {
        match self.init_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn get_frequency(&self, buffer: &[f32]) -> f32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        buffer.last().copied().unwrap_or(0.0) * 1000.0
    }
}

pub fn scripted_factory(delay: Duration) -> (StrategyFactory, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let factory: StrategyFactory = Arc::new(move || {
        Box::new(ScriptedStrategy {
            delay,
            init_error: None,
            calls: Arc::clone(&counter),
        })
    });
    (factory, calls)
}

pub fn failing_init_factory() -> StrategyFactory {
    Arc::new(|| {
        Box::new(ScriptedStrategy {
            delay: Duration::ZERO,
            init_error: Some(PipelineError::StrategyInit("wasm module missing".into())),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    })
}

/// Strategy that panics on its first estimate and answers 123 Hz after.
pub struct PanicOnceStrategy {
    panicked: AtomicBool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl PitchDetectionStrategy for PanicOnceStrategy {
    async fn init(&mut self, _context: ContextInfo, _frame_size: usize) -> Result<(), PipelineError> {
        Ok(())
    }

    async fn get_frequency(&self, _buffer: &[f32]) -> f32 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("estimator crashed");
        }
        123.0
    }
}

pub fn panic_once_factory() -> (StrategyFactory, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let factory: StrategyFactory = Arc::new(move || {
        Box::new(PanicOnceStrategy {
            panicked: AtomicBool::new(false),
            calls: Arc::clone(&counter),
        })
    });
    (factory, calls)
}

#[derive(Default)]
pub struct RecordingReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, report: ErrorReport) {
        self.reports.lock().push(report);
    }
}
