//! Error telemetry reports and the default log-backed reporter.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::traits::error_reporter::ErrorReporter;

/// How loudly a failure should be surfaced by the collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Expected outcome (e.g. user declined permission); not alerted.
    Debug,
    Warning,
    Error,
}

/// One failure sent to the telemetry collector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    pub severity: Severity,
    /// Name of the failing operation, e.g. `"ChannelMonitor.start_monitoring"`.
    pub operation: String,
    /// Failure kind, e.g. `"NotAllowedError"`.
    pub kind: String,
    pub message: String,
    /// Start attempt the failure belongs to.
    pub session_id: Option<String>,
    pub reported_at: DateTime<Utc>,
}

impl ErrorReport {
    pub fn new(
        severity: Severity,
        operation: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            operation: operation.into(),
            kind: kind.into(),
            message: message.into(),
            session_id: None,
            reported_at: Utc::now(),
        }
    }

    /// Tag the report with the monitoring attempt it belongs to.
    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }
}

/// Reporter that writes reports through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, report: ErrorReport) {
        let level = match report.severity {
            Severity::Debug => log::Level::Debug,
            Severity::Warning => log::Level::Warn,
            Severity::Error => log::Level::Error,
        };
        log::log!(
            level,
            "{} failed ({}): {}",
            report.operation,
            report.kind,
            report.message
        );
    }
}
