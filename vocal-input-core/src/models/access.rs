use serde::{Deserialize, Serialize};

/// Process-wide audio-capture permission status.
///
/// ```text
/// uninitialized → requested → accepted
///                     ↓  ↑        ↓
///                   declined ← ───┘
/// ```
///
/// Only the access broker mutates it. Any acquisition anywhere in the
/// process may overwrite it, so it answers "is the user being asked right
/// now" and must never gate a single monitor's own logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessStatus {
    #[default]
    Uninitialized,
    Requested,
    Accepted,
    Declined,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Requested => "requested",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}
