use crate::error::CampanileError;
use crate::shared::{
    auth::protect_staff_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::dtos::ClassDefinitionDTO;
use campanile_api_structs::get_my_timetable::*;
use campanile_domain::{ClassDefinition, User};
use campanile_infra::Context;

pub async fn get_my_timetable_controller(
    http_req: HttpRequest,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    let user = protect_staff_route(&http_req, &ctx).await?;

    let usecase = GetMyTimetableUseCase { user };

    execute(usecase, &ctx)
        .await
        .map(|classes| {
            HttpResponse::Ok().json(APIResponse {
                classes: classes.into_iter().map(ClassDefinitionDTO::new).collect(),
            })
        })
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct GetMyTimetableUseCase {
    pub user: User,
}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CampanileError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetMyTimetableUseCase {
    type Response = Vec<ClassDefinition>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetMyTimetable";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .repos
            .classes
            .find_by_teacher_email(&self.user.email)
            .await)
    }
}
