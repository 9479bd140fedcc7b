use crate::dtos::{ClassDefinitionDTO, OccurrenceDTO};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassResponse {
    pub class: ClassDefinitionDTO,
    pub warning: Option<String>,
}

pub mod create_class {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub room: String,
        pub teacher_email: String,
        pub start_time: NaiveDateTime,
        pub end_time: NaiveDateTime,
        pub recurrence: Option<String>,
    }

    pub type APIResponse = ClassResponse;
}

pub mod upload_timetable {
    use super::*;

    /// One validated row from the uploaded spreadsheet, as produced by the
    /// out-of-scope parser collaborator.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TimetableRow {
        pub title: String,
        pub room: String,
        pub teacher_email: String,
        pub start_time: NaiveDateTime,
        pub end_time: NaiveDateTime,
        pub recurrence: Option<String>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub rows: Vec<TimetableRow>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub created: usize,
        pub warnings: Vec<String>,
    }
}

pub mod get_upcoming_occurrences {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub hours: i64,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub occurrences: Vec<OccurrenceDTO>,
    }
}

pub mod get_my_classes {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub days: i64,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub occurrences: Vec<OccurrenceDTO>,
    }
}

pub mod get_my_timetable {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub classes: Vec<ClassDefinitionDTO>,
    }
}
