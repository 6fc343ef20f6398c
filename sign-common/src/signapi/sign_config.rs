use crate::{config::Schedule, timezone::Timezone};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of the sign configuration endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignConfigPayload {
    #[serde(default)]
    pub payload_version: u32,
    pub config: RemoteSignConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSignConfig {
    #[serde(default)]
    pub display: Option<RemoteDisplay>,
    #[serde(default)]
    pub schedule: Option<RemoteSchedule>,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDisplay {
    #[serde(default)]
    pub brightness: Option<u8>,
    #[serde(default)]
    pub rotation_interval_seconds: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSchedule {
    pub enabled: bool,
    pub on_time: String,
    pub off_time: String,
    #[serde(default)]
    pub timezone: String,
}

impl RemoteSchedule {
    /// Converts to a local [`Schedule`]. An empty or unknown timezone leaves
    /// `current_timezone` in place.
    pub fn to_schedule(&self, current_timezone: Timezone) -> Schedule {
        let timezone = if self.timezone.is_empty() {
            current_timezone
        } else {
            self.timezone.parse().unwrap_or_else(|e| {
                warn!("Remote config: {e}, keeping {current_timezone}");
                current_timezone
            })
        };

        Schedule {
            enabled: self.enabled,
            on_time: self.on_time.clone(),
            off_time: self.off_time.clone(),
            timezone,
        }
    }
}
