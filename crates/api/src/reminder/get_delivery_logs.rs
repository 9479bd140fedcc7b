use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::dtos::DeliveryLogEntryDTO;
use campanile_api_structs::get_delivery_logs::*;
use campanile_domain::DeliveryLogEntry;
use campanile_infra::Context;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 1000;

pub async fn get_delivery_logs_admin_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    let usecase = GetDeliveryLogsUseCase {
        limit: query_params.limit.unwrap_or(DEFAULT_LIMIT),
    };

    execute(usecase, &ctx)
        .await
        .map(|logs| {
            HttpResponse::Ok().json(APIResponse {
                logs: logs.into_iter().map(DeliveryLogEntryDTO::new).collect(),
            })
        })
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct GetDeliveryLogsUseCase {
    pub limit: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidLimit(usize),
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidLimit(limit) => Self::BadClientData(format!(
                "Limit: {} is not valid, must be between 1 and {}",
                limit, MAX_LIMIT
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetDeliveryLogsUseCase {
    type Response = Vec<DeliveryLogEntry>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetDeliveryLogs";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(UseCaseError::InvalidLimit(self.limit));
        }
        Ok(ctx.repos.delivery_logs.query(self.limit).await)
    }
}
