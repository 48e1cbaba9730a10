use serde::{Deserialize, Serialize};

/// Health reported by an input. There is no real health model at this layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStatus {
    #[default]
    Ok,
}

impl InputStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
        }
    }
}

/// Processing context lifecycle.
///
/// ```text
/// suspended ⇄ running → closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    Suspended,
    Running,
    Closed,
}

impl ContextState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}
