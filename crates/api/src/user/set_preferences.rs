use crate::error::CampanileError;
use crate::shared::{
    auth::protect_staff_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::set_preferences::*;
use campanile_domain::{
    parse_time_of_day, Channels, NotificationPreferences, QuietHours, User, ALLOWED_LEAD_TIMES,
};
use campanile_infra::Context;

pub async fn set_preferences_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    let user = protect_staff_route(&http_req, &ctx).await?;

    let body = body.0;
    let usecase = SetPreferencesUseCase {
        user,
        enabled: body.enabled,
        lead_time_minutes: body.lead_time_minutes,
        channels: Channels {
            email: body.channels.email,
            sms: body.channels.sms,
            push: body.channels.push,
        },
        quiet_hours_enabled: body.quiet_hours.enabled,
        quiet_hours_start: body.quiet_hours.start,
        quiet_hours_end: body.quiet_hours.end,
    };

    execute(usecase, &ctx)
        .await
        .map(|user| HttpResponse::Ok().json(APIResponse::new(user)))
        .map_err(CampanileError::from)
}

#[derive(Debug)]
pub struct SetPreferencesUseCase {
    pub user: User,
    pub enabled: bool,
    pub lead_time_minutes: i64,
    pub channels: Channels,
    pub quiet_hours_enabled: bool,
    pub quiet_hours_start: String,
    pub quiet_hours_end: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidLeadTime(i64),
    InvalidTimeOfDay(String),
    StorageError,
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidLeadTime(minutes) => Self::BadClientData(format!(
                "Lead time: {} is not supported, allowed values are: {:?}",
                minutes, ALLOWED_LEAD_TIMES
            )),
            UseCaseError::InvalidTimeOfDay(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SetPreferencesUseCase {
    type Response = User;

    type Error = UseCaseError;

    const NAME: &'static str = "SetPreferences";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if !ALLOWED_LEAD_TIMES.contains(&self.lead_time_minutes) {
            return Err(UseCaseError::InvalidLeadTime(self.lead_time_minutes));
        }
        let start = parse_time_of_day(&self.quiet_hours_start)
            .map_err(|e| UseCaseError::InvalidTimeOfDay(e.to_string()))?;
        let end = parse_time_of_day(&self.quiet_hours_end)
            .map_err(|e| UseCaseError::InvalidTimeOfDay(e.to_string()))?;

        let mut user = self.user.clone();
        user.preferences = NotificationPreferences {
            enabled: self.enabled,
            lead_time_minutes: self.lead_time_minutes,
            channels: self.channels,
            quiet_hours: QuietHours {
                enabled: self.quiet_hours_enabled,
                start,
                end,
            },
        };

        ctx.repos
            .users
            .save(&user)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(user)
    }
}
