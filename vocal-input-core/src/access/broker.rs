use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::events::listener::{Listener, Subscription};
use crate::models::access::AccessStatus;
use crate::models::audio_models::AudioSource;
use crate::models::constraints::CaptureConstraints;
use crate::models::error::CaptureError;
use crate::storage::debug::MicDebug;
use crate::traits::capture_stream::CaptureStream;
use crate::traits::media_devices::MediaDevices;

/// Owner of the process-wide capture access status.
///
/// Every acquisition and enumeration goes through the broker so one shared
/// `AccessStatus` tracks whether the user is currently being asked for
/// microphone access. Create one per process and share it via `Arc`; it
/// lives for the process lifetime.
///
/// The broker never retries. Failures are handed back unchanged.
pub struct AccessBroker {
    devices: Arc<dyn MediaDevices>,
    status: Mutex<AccessStatus>,
    /// Serializes store-then-notify so subscribers see transitions in
    /// the order they were stored.
    transitions: Mutex<()>,
    listeners: Listener<AccessStatus>,
    debug: MicDebug,
}

impl AccessBroker {
    pub fn new(devices: Arc<dyn MediaDevices>) -> Self {
        Self::with_debug(devices, MicDebug::disabled())
    }

    pub fn with_debug(devices: Arc<dyn MediaDevices>, debug: MicDebug) -> Self {
        Self {
            devices,
            status: Mutex::new(AccessStatus::Uninitialized),
            transitions: Mutex::new(()),
            listeners: Listener::new(),
            debug,
        }
    }

    pub fn status(&self) -> AccessStatus {
        *self.status.lock()
    }

    /// Observe status transitions. Every set is delivered, including
    /// repeats of the current value.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AccessStatus) + Send + Sync + 'static,
    {
        self.listeners.subscribe(callback)
    }

    /// Acquire a capture device.
    pub async fn get_user_media(
        &self,
        constraints: &CaptureConstraints,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        crate::mic_log!(self.debug, "get_user_media called with: {:?}", constraints);
        self.request_and_track(self.devices.get_user_media(constraints))
            .await
    }

    /// List available devices. Tracked like an acquisition, since
    /// enumeration can also trigger a permission prompt.
    pub async fn enumerate_devices(&self) -> Result<Vec<AudioSource>, CaptureError> {
        crate::mic_log!(self.debug, "enumerate_devices called");
        self.request_and_track(self.devices.enumerate_devices()).await
    }

    async fn request_and_track<T, F>(&self, operation: F) -> Result<T, CaptureError>
    where
        F: Future<Output = Result<T, CaptureError>>,
    {
        self.mark_requested();

        match operation.await {
            Ok(result) => {
                self.set_status(AccessStatus::Accepted);
                crate::mic_log!(self.debug, "access accepted");
                Ok(result)
            }
            Err(e) => {
                self.set_status(AccessStatus::Declined);
                crate::mic_log!(
                    self.debug,
                    "access declined: name={} message={} constraint={:?}",
                    e.name(),
                    e,
                    e.constraint()
                );
                Err(e)
            }
        }
    }

    fn mark_requested(&self) {
        let _order = self.transitions.lock();
        {
            let mut current = self.status.lock();
            if current.is_accepted() {
                return;
            }
            *current = AccessStatus::Requested;
        }
        self.listeners.notify(&AccessStatus::Requested);
    }

    fn set_status(&self, status: AccessStatus) {
        let _order = self.transitions.lock();
        *self.status.lock() = status;
        self.listeners.notify(&status);
    }
}
