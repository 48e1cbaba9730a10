use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::events::listener::Listener;
use crate::models::config::OverlapPolicy;
use crate::models::readings::Readings;
use crate::processing::analyser::AnalysisChannel;
use crate::processing::signal;
use crate::storage::debug::MicDebug;
use crate::traits::pitch_strategy::PitchDetectionStrategy;

/// Readings shared between a monitor and its sampling job.
pub(crate) struct SamplerShared {
    readings: Mutex<Readings>,
    /// Current session. Writes tagged with an older epoch are dropped.
    epoch: AtomicU64,
    samples: Listener<(f32, f32)>,
}

impl SamplerShared {
    pub(crate) fn new() -> Self {
        Self {
            readings: Mutex::new(Readings::default()),
            epoch: AtomicU64::new(0),
            samples: Listener::new(),
        }
    }

    pub(crate) fn readings(&self) -> Readings {
        *self.readings.lock()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Invalidate the current session and return the new epoch.
    pub(crate) fn advance_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn samples(&self) -> &Listener<(f32, f32)> {
        &self.samples
    }

    /// Store one tick's results. Returns false for a stale epoch.
    fn complete(&self, epoch: u64, frequencies: &[f32], volumes: &[f32], push: bool) -> bool {
        let readings = Readings::from_channels(frequencies, volumes);
        {
            let mut current = self.readings.lock();
            if self.epoch() != epoch {
                return false;
            }
            *current = readings;
        }
        if push {
            self.samples
                .notify(&(readings.frequencies[0], readings.volumes[0]));
        }
        true
    }
}

/// Clears the in-flight flag when the frequency task ends.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The recurring sampling task of one monitoring session.
pub(crate) struct SamplerJob {
    pub epoch: u64,
    pub label: &'static str,
    pub analysers: Vec<Arc<AnalysisChannel>>,
    pub strategy: Arc<dyn PitchDetectionStrategy>,
    pub shared: Arc<SamplerShared>,
    pub period: Duration,
    pub overlap: OverlapPolicy,
    pub push_samples: bool,
    pub debug: MicDebug,
    pub log_every: u64,
}

impl SamplerJob {
    pub(crate) fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        // First tick one period after start, like a plain repeating timer.
        let mut interval = time::interval_at(Instant::now() + self.period, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let in_flight = Arc::new(AtomicBool::new(false));
        let mut tick: u64 = 0;

        loop {
            interval.tick().await;
            if self.shared.epoch() != self.epoch {
                break;
            }
            tick += 1;
            self.sample_once(tick, &in_flight);
        }
    }

    /// Read one frame per channel, compute volumes now and frequencies in
    /// a detached task.
    fn sample_once(&self, tick: u64, in_flight: &Arc<AtomicBool>) {
        let guarded = self.overlap == OverlapPolicy::SkipWhileInFlight;
        if guarded && in_flight.swap(true, Ordering::SeqCst) {
            crate::mic_log!(self.debug, "{} tick {} skipped: previous estimate pending", self.label, tick);
            return;
        }

        let buffers: Vec<Vec<f32>> = self
            .analysers
            .iter()
            .map(|a| a.time_domain_frame())
            .collect();
        let volumes: Vec<f32> = buffers.iter().map(|b| signal::rms_level(b)).collect();

        let log_tick = self.log_every > 0 && tick % self.log_every == 0 && self.debug.enabled();
        let levels_db: Option<Vec<f32>> =
            log_tick.then(|| self.analysers.iter().map(|a| a.level_db()).collect());

        let strategy = Arc::clone(&self.strategy);
        let shared = Arc::clone(&self.shared);
        let guard = guarded.then(|| InFlightGuard(Arc::clone(in_flight)));
        let epoch = self.epoch;
        let push = self.push_samples;
        let debug = self.debug.clone();
        let label = self.label;

        tokio::spawn(async move {
            // Held until the task ends, even if the strategy panics.
            let _guard = guard;
            let frequencies =
                join_all(buffers.iter().map(|buffer| strategy.get_frequency(buffer))).await;
            let written = shared.complete(epoch, &frequencies, &volumes, push);
            if let (true, Some(levels_db)) = (written, levels_db) {
                let readings = shared.readings();
                crate::mic_log!(
                    debug,
                    "{} tick {}: vols={:?} levels_db={:?} freqs={:?}",
                    label,
                    tick,
                    readings.volumes,
                    levels_db,
                    readings.frequencies
                );
            }
        });
    }
}
