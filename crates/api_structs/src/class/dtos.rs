use campanile_domain::{ClassDefinition, Occurrence, Recurrence, ID};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinitionDTO {
    pub id: ID,
    pub title: String,
    pub room: String,
    pub teacher_email: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub recurrence: Recurrence,
}

impl ClassDefinitionDTO {
    pub fn new(class: ClassDefinition) -> Self {
        Self {
            id: class.id,
            title: class.title,
            room: class.room,
            teacher_email: class.teacher_email,
            start_time: class.start_time,
            end_time: class.end_time,
            recurrence: class.recurrence,
        }
    }
}

/// One concrete calendar instance, joined with the class it came from so
/// listings do not need a second lookup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceDTO {
    pub class_id: ID,
    pub title: String,
    pub room: String,
    pub start_ts: i64,
    pub end_ts: i64,
}

impl OccurrenceDTO {
    pub fn new(class: &ClassDefinition, occurrence: Occurrence) -> Self {
        Self {
            class_id: occurrence.class_id,
            title: class.title.clone(),
            room: class.room.clone(),
            start_ts: occurrence.start_ts,
            end_ts: occurrence.end_ts,
        }
    }
}
