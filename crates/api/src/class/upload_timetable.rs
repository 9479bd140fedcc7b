use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::upload_timetable::*;
use campanile_domain::{ClassDefinition, Recurrence};
use campanile_infra::Context;
use chrono::NaiveDateTime;

pub async fn upload_timetable_admin_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    let rows = body
        .0
        .rows
        .into_iter()
        .map(|row| UploadRow {
            title: row.title,
            room: row.room,
            teacher_email: row.teacher_email,
            start_time: row.start_time,
            end_time: row.end_time,
            recurrence: row.recurrence,
        })
        .collect();
    let usecase = UploadTimetableUseCase { rows };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse {
                created: res.created,
                warnings: res.warnings,
            })
        })
        .map_err(CampanileError::from)
}

/// One class definition from an already parsed and validated upload. The
/// spreadsheet itself never reaches this service; a collaborator turns it
/// into rows.
#[derive(Debug)]
pub struct UploadRow {
    pub title: String,
    pub room: String,
    pub teacher_email: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub recurrence: Option<String>,
}

#[derive(Debug)]
pub struct UploadTimetableUseCase {
    pub rows: Vec<UploadRow>,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub created: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UploadTimetableUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "UploadTimetable";

    /// Inserts rows fail-soft: a row with an unknown recurrence value is
    /// stored as a one-off with a warning, a row with inverted times is
    /// skipped with a warning. One bad row never sinks the whole upload.
    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut created = 0;
        let mut warnings = Vec::new();

        for (index, row) in self.rows.iter().enumerate() {
            let (recurrence, warning) = Recurrence::parse_lenient(row.recurrence.as_deref());
            if let Some(warning) = warning {
                warnings.push(format!("Row {}: {}", index + 1, warning));
            }

            let class = match ClassDefinition::new(
                row.title.clone(),
                row.room.clone(),
                row.teacher_email.clone(),
                row.start_time,
                row.end_time,
                recurrence,
                ctx.sys.get_timestamp_millis(),
            ) {
                Ok(class) => class,
                Err(e) => {
                    warnings.push(format!("Row {}: {}, skipping row", index + 1, e));
                    continue;
                }
            };

            ctx.repos
                .classes
                .insert(&class)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
            created += 1;
        }

        Ok(UseCaseResponse { created, warnings })
    }
}
