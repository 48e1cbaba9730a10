use serde::{Deserialize, Serialize};

/// One row of the player-to-device-to-channel table.
///
/// The table itself is owned by the player manager; monitors only read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerAssignment {
    pub device_id: String,
    pub channel: u32,
}

impl PlayerAssignment {
    pub fn new(device_id: impl Into<String>, channel: u32) -> Self {
        Self {
            device_id: device_id.into(),
            channel,
        }
    }
}

/// Whether two or more players are mapped to distinct channels of `device_id`.
///
/// Compares every matching row against the first matching row's channel.
pub fn needs_channel_split(assignments: &[PlayerAssignment], device_id: &str) -> bool {
    let mut channels = assignments
        .iter()
        .filter(|a| a.device_id == device_id)
        .map(|a| a.channel);

    match channels.next() {
        Some(first) => channels.any(|c| c != first),
        None => false,
    }
}
