use std::sync::{Arc, Weak};

use parking_lot::Mutex;

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct Subscribers<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Ordered subscriber list with push notification.
///
/// Callbacks run in registration order, outside the internal lock, so a
/// callback may subscribe or unsubscribe without deadlocking.
pub struct Listener<T> {
    subscribers: Arc<Mutex<Subscribers<T>>>,
}

impl<T: 'static> Listener<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register `callback`. It stays registered until the returned
    /// `Subscription` is dropped or unsubscribed.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut subs = self.subscribers.lock();
            let id = subs.next_id;
            subs.next_id += 1;
            subs.entries.push((id, Arc::new(callback)));
            id
        };

        let weak: Weak<Mutex<Subscribers<T>>> = Arc::downgrade(&self.subscribers);
        Subscription {
            remove: Some(Box::new(move || {
                if let Some(subs) = weak.upgrade() {
                    subs.lock().entries.retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn notify(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = self
            .subscribers
            .lock()
            .entries
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }
}

impl<T: 'static> Default for Listener<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered callback. Unsubscribes on drop.
pub struct Subscription {
    remove: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }

    /// Keep the callback registered for the listener's whole lifetime.
    pub fn detach(mut self) {
        self.remove = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(remove) = self.remove.take() {
            remove();
        }
    }
}
