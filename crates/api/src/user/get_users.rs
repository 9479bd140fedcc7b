use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::dtos::UserDTO;
use campanile_api_structs::get_users::*;
use campanile_domain::User;
use campanile_infra::Context;

pub async fn get_users_admin_controller(
    http_req: HttpRequest,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    execute(GetUsersUseCase {}, &ctx)
        .await
        .map(|users| {
            HttpResponse::Ok().json(APIResponse {
                users: users.into_iter().map(UserDTO::new).collect(),
            })
        })
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct GetUsersUseCase {}

#[derive(Debug)]
pub enum UseCaseError {}

impl From<UseCaseError> for CampanileError {
    fn from(_: UseCaseError) -> Self {
        Self::InternalError
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUsersUseCase {
    type Response = Vec<User>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUsers";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        Ok(ctx.repos.users.find_all().await)
    }
}
