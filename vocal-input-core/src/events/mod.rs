//! Push notification primitives: ordered subscriber lists and the
//! monitoring lifecycle bus.

pub mod bus;
pub mod listener;

pub use bus::{EventBus, MonitorEvent};
pub use listener::{Listener, Subscription};
