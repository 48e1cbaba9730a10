use crate::telemetry::ErrorReport;

/// Sink for error telemetry.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, report: ErrorReport);
}
