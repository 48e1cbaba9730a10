pub mod capture_stream;
pub mod error_reporter;
pub mod media_devices;
pub mod pitch_input;
pub mod pitch_strategy;
pub mod settings_store;
