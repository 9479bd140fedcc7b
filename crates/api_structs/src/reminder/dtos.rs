use campanile_domain::{ChannelKind, DeliveryLogEntry, DeliveryStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogEntryDTO {
    pub id: ID,
    pub class_id: ID,
    pub occurrence_start: i64,
    pub user_id: ID,
    pub channel: ChannelKind,
    pub status: DeliveryStatus,
    pub response: String,
    pub timestamp: i64,
}

impl DeliveryLogEntryDTO {
    pub fn new(entry: DeliveryLogEntry) -> Self {
        Self {
            id: entry.id,
            class_id: entry.key.class_id,
            occurrence_start: entry.key.occurrence_start,
            user_id: entry.key.user_id,
            channel: entry.channel,
            status: entry.status,
            response: entry.response,
            timestamp: entry.timestamp,
        }
    }
}
