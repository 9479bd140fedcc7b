use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::create_class::*;
use campanile_api_structs::dtos::ClassDefinitionDTO;
use campanile_domain::{ClassDefinition, Recurrence};
use campanile_infra::Context;
use chrono::NaiveDateTime;

pub async fn create_class_admin_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = CreateClassUseCase {
        title: body.title,
        room: body.room,
        teacher_email: body.teacher_email,
        start_time: body.start_time,
        end_time: body.end_time,
        recurrence: body.recurrence,
    };

    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Created().json(APIResponse {
                class: ClassDefinitionDTO::new(res.class),
                warning: res.warning,
            })
        })
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct CreateClassUseCase {
    pub title: String,
    pub room: String,
    pub teacher_email: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub recurrence: Option<String>,
}

#[derive(Debug)]
pub struct UseCaseResponse {
    pub class: ClassDefinition,
    pub warning: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidTimes(String),
    StorageError,
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidTimes(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateClassUseCase {
    type Response = UseCaseResponse;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateClass";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let (recurrence, warning) = Recurrence::parse_lenient(self.recurrence.as_deref());

        let class = ClassDefinition::new(
            self.title.clone(),
            self.room.clone(),
            self.teacher_email.clone(),
            self.start_time,
            self.end_time,
            recurrence,
            ctx.sys.get_timestamp_millis(),
        )
        .map_err(|e| UseCaseError::InvalidTimes(e.to_string()))?;

        ctx.repos
            .classes
            .insert(&class)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(UseCaseResponse { class, warning })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    fn usecase_with(recurrence: Option<&str>, duration_minutes: i64) -> CreateClassUseCase {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        CreateClassUseCase {
            title: "Linear Algebra".into(),
            room: "B-201".into(),
            teacher_email: "turing@example.edu".into(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(duration_minutes),
            recurrence: recurrence.map(|r| r.to_string()),
        }
    }

    #[actix_web::test]
    async fn creates_and_persists_class() {
        let ctx = Context::create_inmemory();
        let res = execute(usecase_with(Some("WEEKLY"), 90), &ctx).await.unwrap();
        assert_eq!(res.class.recurrence, Recurrence::Weekly);
        assert!(res.warning.is_none());
        assert_eq!(ctx.repos.classes.find_active().await.len(), 1);
    }

    #[actix_web::test]
    async fn unknown_recurrence_falls_back_to_once_with_warning() {
        let ctx = Context::create_inmemory();
        let res = execute(usecase_with(Some("FORTNIGHTLY"), 90), &ctx)
            .await
            .unwrap();
        assert_eq!(res.class.recurrence, Recurrence::Once);
        assert!(res.warning.is_some());
    }

    #[actix_web::test]
    async fn rejects_end_before_start() {
        let ctx = Context::create_inmemory();
        assert!(execute(usecase_with(None, 0), &ctx).await.is_err());
        assert!(ctx.repos.classes.find_active().await.is_empty());
    }
}
