use crate::error::CampanileError;
use crate::shared::{
    auth::protect_staff_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::dtos::OccurrenceDTO;
use campanile_api_structs::get_my_classes::*;
use campanile_domain::{ClassDefinition, Occurrence, TimeSpan, User};
use campanile_infra::Context;

pub async fn get_my_classes_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    let user = protect_staff_route(&http_req, &ctx).await?;

    let usecase = GetMyClassesUseCase {
        user,
        days: query_params.days,
    };

    execute(usecase, &ctx)
        .await
        .map(|occurrences| {
            HttpResponse::Ok().json(APIResponse {
                occurrences: occurrences
                    .into_iter()
                    .map(|(class, occurrence)| OccurrenceDTO::new(&class, occurrence))
                    .collect(),
            })
        })
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct GetMyClassesUseCase {
    pub user: User,
    pub days: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidWindow(String),
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidWindow(msg) => Self::BadClientData(msg),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMyClassesUseCase {
    type Response = Vec<(ClassDefinition, Occurrence)>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetMyClasses";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.get_timestamp_millis();
        let duration = self
            .days
            .checked_mul(24 * 60 * 60 * 1000)
            .filter(|d| *d > 0)
            .ok_or_else(|| UseCaseError::InvalidWindow(format!("Invalid days: {}", self.days)))?;
        if duration > ctx.config.occurrence_query_duration_limit {
            return Err(UseCaseError::InvalidWindow(format!(
                "Query duration is too long, maximum is {} millis",
                ctx.config.occurrence_query_duration_limit
            )));
        }
        let window = TimeSpan::new(now, now + duration)
            .map_err(|e| UseCaseError::InvalidWindow(e.to_string()))?;

        let settings = ctx.config.institution_settings();
        let mut occurrences = Vec::new();
        for class in ctx
            .repos
            .classes
            .find_by_teacher_email(&self.user.email)
            .await
        {
            for occurrence in class.expand(&window, &settings, ctx.config.max_expansion_count) {
                occurrences.push((class.clone(), occurrence));
            }
        }
        occurrences.sort_by_key(|(_, occurrence)| occurrence.start_ts);

        Ok(occurrences)
    }
}
