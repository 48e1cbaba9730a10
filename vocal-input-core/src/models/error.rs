use thiserror::Error;

/// Errors raised by the capture/acquisition layer.
///
/// The access broker hands these back to callers unchanged, so they carry
/// enough detail (`name()`, `constraint()`) for diagnostics and telemetry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("constraint cannot be satisfied: {constraint}")]
    ConstraintNotSatisfiable { constraint: String },

    #[error("device busy: {0}")]
    DeviceBusy(String),

    #[error("acquisition aborted")]
    Aborted,

    #[error("unknown error: {0}")]
    Unknown(String),
}

impl CaptureError {
    /// Stable failure-kind identifier, used in logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "NotAllowedError",
            Self::DeviceNotFound(_) => "NotFoundError",
            Self::ConstraintNotSatisfiable { .. } => "OverconstrainedError",
            Self::DeviceBusy(_) => "NotReadableError",
            Self::Aborted => "AbortError",
            Self::Unknown(_) => "UnknownError",
        }
    }

    /// The offending constraint, if the failure was caused by one.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            Self::ConstraintNotSatisfiable { constraint } => Some(constraint),
            _ => None,
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

/// Failures while building the processing pipeline after a device was acquired.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("processing context is closed")]
    ContextClosed,

    #[error("unsupported analysis channel count: {0}")]
    InvalidChannelCount(usize),

    #[error("failed to route capture stream: {0}")]
    Routing(#[from] CaptureError),

    #[error("pitch strategy init failed: {0}")]
    StrategyInit(String),

    #[error("configuration invalid: {0}")]
    Configuration(String),
}

impl PipelineError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ContextClosed => "InvalidStateError",
            Self::InvalidChannelCount(_) => "IndexSizeError",
            Self::Routing(inner) => inner.name(),
            Self::StrategyInit(_) => "StrategyInitError",
            Self::Configuration(_) => "ConfigurationError",
        }
    }
}
