use std::sync::Arc;

use crate::access::AccessBroker;
use crate::events::EventBus;
use crate::models::config::MonitorConfiguration;
use crate::storage::debug::MicDebug;
use crate::telemetry::LogReporter;
use crate::traits::error_reporter::ErrorReporter;
use crate::traits::pitch_strategy::StrategyFactory;

/// Collaborators shared by every monitor in the process.
#[derive(Clone)]
pub struct MonitorServices {
    pub broker: Arc<AccessBroker>,
    pub events: Arc<EventBus>,
    pub reporter: Arc<dyn ErrorReporter>,
    pub strategy_factory: StrategyFactory,
    pub debug: MicDebug,
    pub config: MonitorConfiguration,
}

impl MonitorServices {
    /// Services with a fresh event bus, log-backed error reporting, debug
    /// logging off and the default configuration.
    pub fn new(broker: Arc<AccessBroker>, strategy_factory: StrategyFactory) -> Self {
        Self {
            broker,
            events: Arc::new(EventBus::new()),
            reporter: Arc::new(LogReporter),
            strategy_factory,
            debug: MicDebug::disabled(),
            config: MonitorConfiguration::default(),
        }
    }

    pub fn with_events(mut self, events: Arc<EventBus>) -> Self {
        self.events = events;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_debug(mut self, debug: MicDebug) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_config(mut self, config: MonitorConfiguration) -> Self {
        self.config = config;
        self
    }
}
