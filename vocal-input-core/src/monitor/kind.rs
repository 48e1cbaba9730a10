use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::channel::{ChannelLayout, ChannelMonitor};
use super::registry::MultiDeviceRegistry;
use super::services::MonitorServices;
use super::simplified::SimplifiedMonitor;
use crate::traits::pitch_input::PitchInput;

/// Monitor variant selected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// One device, down-mixed to a single analysis channel.
    SingleChannel,
    /// One device, source channels 0 and 1 analysed separately.
    MultiChannel,
    /// Any number of devices keyed by id, channel count decided per device
    /// from the player assignments.
    MultiDevice,
    /// One device, one channel, readings pushed to subscribers.
    Simplified,
}

impl InputKind {
    pub fn build(self, services: MonitorServices) -> Arc<dyn PitchInput> {
        log::debug!("building {:?} pitch input", self);
        match self {
            Self::SingleChannel => Arc::new(ChannelMonitor::new(ChannelLayout::Mono, services)),
            Self::MultiChannel => Arc::new(ChannelMonitor::new(ChannelLayout::Split, services)),
            Self::MultiDevice => Arc::new(MultiDeviceRegistry::new(services)),
            Self::Simplified => Arc::new(SimplifiedMonitor::new(services)),
        }
    }
}
