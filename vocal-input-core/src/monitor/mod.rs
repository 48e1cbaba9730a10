pub mod channel;
pub(crate) mod engine;
pub mod kind;
pub mod registry;
pub(crate) mod sampler;
pub mod services;
pub mod simplified;

pub use channel::{ChannelLayout, ChannelMonitor};
pub use kind::InputKind;
pub use registry::MultiDeviceRegistry;
pub use services::MonitorServices;
pub use simplified::SimplifiedMonitor;
