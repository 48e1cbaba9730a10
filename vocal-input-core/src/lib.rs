//! # vocal-input-core
//!
//! Microphone pitch-input core for a multiplayer singing game.
//!
//! Acquires capture devices through a permission-tracking broker, routes
//! their audio into one or two analysis channels, and samples frequency and
//! volume on a fixed cadence. Platform backends implement `MediaDevices` and
//! `CaptureStream`; pitch estimators implement `PitchDetectionStrategy`.
//!
//! ## Architecture
//!
//! ```text
//! vocal-input-core (this crate)
//! ├── traits/       ← MediaDevices, CaptureStream, PitchDetectionStrategy, PitchInput, ErrorReporter, SettingsStore
//! ├── models/       ← CaptureError, PipelineError, AccessStatus, MonitorConfiguration, Readings, etc.
//! ├── access/       ← AccessBroker (process-wide permission status)
//! ├── processing/   ← ProcessingContext, AnalysisChannel, RingBuffer, signal math
//! ├── monitor/      ← ChannelMonitor, MultiDeviceRegistry, SimplifiedMonitor, InputKind
//! ├── strategy/     ← YinStrategy
//! ├── events/       ← Listener/Subscription fan-out, EventBus
//! ├── telemetry/    ← ErrorReport, LogReporter
//! └── storage/      ← settings stores, MicDebug toggle
//! ```

pub mod access;
pub mod events;
pub mod models;
pub mod monitor;
pub mod processing;
pub mod storage;
pub mod strategy;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export key types at crate root for convenience.
pub use access::AccessBroker;
pub use events::{EventBus, Listener, MonitorEvent, Subscription};
pub use models::access::AccessStatus;
pub use models::assignment::PlayerAssignment;
pub use models::audio_models::{AudioSource, DeviceKind, TrackSettings};
pub use models::config::{MonitorConfiguration, OverlapPolicy, PipelineFailurePolicy};
pub use models::constraints::{CaptureConstraints, ReservedDeviceIds};
pub use models::error::{CaptureError, PipelineError};
pub use models::readings::{ChannelPair, Readings};
pub use models::state::{ContextState, InputStatus};
pub use monitor::{ChannelLayout, ChannelMonitor, InputKind, MonitorServices, MultiDeviceRegistry, SimplifiedMonitor};
pub use processing::analyser::AnalysisChannel;
pub use processing::context::ProcessingContext;
pub use processing::ring_buffer::RingBuffer;
pub use storage::debug::MicDebug;
pub use storage::settings::{JsonFileSettings, MemorySettings};
pub use strategy::YinStrategy;
pub use telemetry::{ErrorReport, LogReporter, Severity};
pub use traits::capture_stream::{AudioBufferCallback, CaptureStream};
pub use traits::error_reporter::ErrorReporter;
pub use traits::media_devices::MediaDevices;
pub use traits::pitch_input::PitchInput;
pub use traits::pitch_strategy::{ContextInfo, PitchDetectionStrategy, StrategyFactory};
pub use traits::settings_store::SettingsStore;
