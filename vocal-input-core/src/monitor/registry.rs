use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use parking_lot::Mutex;

use super::channel::{ChannelLayout, ChannelMonitor};
use super::services::MonitorServices;
use crate::models::assignment::{needs_channel_split, PlayerAssignment};
use crate::models::error::CaptureError;
use crate::models::readings::ChannelPair;
use crate::models::state::InputStatus;
use crate::traits::pitch_input::PitchInput;

/// Routes monitor calls to one `ChannelMonitor` per device id.
///
/// Monitors are created lazily on first start, sized from the player
/// assignment table, and removed when their device is stopped. Calls for
/// unknown devices answer with idle defaults. A missing or empty device id
/// starts nothing.
pub struct MultiDeviceRegistry {
    services: MonitorServices,
    devices: Mutex<HashMap<String, Arc<ChannelMonitor>>>,
}

impl MultiDeviceRegistry {
    pub fn new(services: MonitorServices) -> Self {
        Self {
            services,
            devices: Mutex::new(HashMap::new()),
        }
    }

    fn monitor(&self, device_id: Option<&str>) -> Option<Arc<ChannelMonitor>> {
        let device_id = device_id?;
        self.devices.lock().get(device_id).cloned()
    }

    /// Channel count of the monitor for `device_id`, if one exists.
    pub fn channels_for(&self, device_id: &str) -> Option<usize> {
        self.monitor(Some(device_id)).map(|m| m.channels())
    }

    pub fn device_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.devices.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }
}

#[async_trait]
impl PitchInput for MultiDeviceRegistry {
    async fn start_monitoring(
        &self,
        device_id: Option<&str>,
        assignments: &[PlayerAssignment],
    ) -> Result<(), CaptureError> {
        let Some(device_id) = device_id.filter(|id| !id.is_empty()) else {
            return Ok(());
        };

        let monitor = {
            let mut devices = self.devices.lock();
            let monitor = devices.entry(device_id.to_string()).or_insert_with(|| {
                let layout = if needs_channel_split(assignments, device_id) {
                    ChannelLayout::Split
                } else {
                    ChannelLayout::Mono
                };
                log::debug!("Creating {:?} monitor for device {}", layout, device_id);
                Arc::new(ChannelMonitor::new(layout, self.services.clone()))
            });
            Arc::clone(monitor)
        };

        monitor.start_monitoring(Some(device_id), assignments).await
    }

    /// Stop one device (and forget its monitor), or every device when no
    /// id is given.
    async fn stop_monitoring(&self, device_id: Option<&str>) {
        match device_id {
            Some(id) => {
                let removed = self.devices.lock().remove(id);
                if let Some(monitor) = removed {
                    monitor.stop_monitoring(Some(id)).await;
                }
            }
            None => {
                let all: Vec<Arc<ChannelMonitor>> =
                    self.devices.lock().drain().map(|(_, m)| m).collect();
                join_all(all.iter().map(|m| m.stop_monitoring(None))).await;
            }
        }
    }

    fn get_frequencies(&self, device_id: Option<&str>) -> ChannelPair {
        self.monitor(device_id)
            .map(|m| m.get_frequencies(device_id))
            .unwrap_or([0.0, 0.0])
    }

    fn get_volumes(&self, device_id: Option<&str>) -> ChannelPair {
        self.monitor(device_id)
            .map(|m| m.get_volumes(device_id))
            .unwrap_or([0.0, 0.0])
    }

    fn clear_frequencies(&self, device_id: Option<&str>) {
        if let Some(monitor) = self.monitor(device_id) {
            monitor.clear_frequencies(device_id);
        }
    }

    fn get_input_lag(&self, device_id: Option<&str>) -> u32 {
        self.monitor(device_id)
            .map(|m| m.get_input_lag(device_id))
            .unwrap_or(self.services.config.input_lag_ms)
    }

    async fn request_readiness(&self, device_id: Option<&str>) -> bool {
        match self.monitor(device_id) {
            Some(monitor) => monitor.request_readiness(device_id).await,
            None => true,
        }
    }

    fn get_status(&self, device_id: Option<&str>, channel: Option<u32>) -> InputStatus {
        self.monitor(device_id)
            .map(|m| m.get_status(device_id, channel))
            .unwrap_or(InputStatus::Ok)
    }
}
