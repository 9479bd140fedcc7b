use super::channel_dispatcher::{dispatch_to_channels, ReminderNotice};
use crate::error::CampanileError;
use crate::shared::{
    auth::protect_admin_route,
    usecase::{execute, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use campanile_api_structs::dtos::DeliveryLogEntryDTO;
use campanile_api_structs::send_test_reminder::*;
use campanile_domain::DeliveryLogEntry;
use campanile_infra::Context;

pub async fn send_test_reminder_admin_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, CampanileError> {
    protect_admin_route(&http_req, &ctx).await?;

    let usecase = SendTestReminderUseCase {
        user_email: query_params.user_email.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|entries| {
            HttpResponse::Ok().json(APIResponse {
                deliveries: entries.into_iter().map(DeliveryLogEntryDTO::new).collect(),
            })
        })
        .map_err(CampanileError::from)
}

/// Single-shot dispatch for one user, bypassing the scheduler and its
/// idempotency claims entirely. Always allowed, always logged; the caller
/// gets the per-channel statuses back immediately.
#[derive(Debug)]
pub struct SendTestReminderUseCase {
    pub user_email: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    UserNotFound(String),
}

impl From<UseCaseError> for CampanileError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::UserNotFound(email) => {
                Self::NotFound(format!("The user with email: {}, was not found.", email))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestReminderUseCase {
    type Response = Vec<DeliveryLogEntry>;

    type Error = UseCaseError;

    const NAME: &'static str = "SendTestReminder";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let user = ctx
            .repos
            .users
            .find_by_email(&self.user_email)
            .await
            .ok_or_else(|| UseCaseError::UserNotFound(self.user_email.clone()))?;

        let notice = ReminderNotice::test_for_user(&user, ctx.sys.get_timestamp_millis());
        let channels = user.preferences.channels.enabled();

        Ok(dispatch_to_channels(&notice, &channels, ctx).await)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use campanile_domain::{DeliveryStatus, Role, User};
    use campanile_infra::RecordingEmailSender;
    use std::sync::Arc;

    #[actix_web::test]
    async fn dispatches_immediately_and_logs() {
        let mut ctx = Context::create_inmemory();
        let sender = Arc::new(RecordingEmailSender::new());
        ctx.email_sender = sender.clone();
        let user = User::new(
            "Alan Turing".into(),
            "turing@example.edu".into(),
            Role::Staff,
            0,
        );
        ctx.repos.users.insert(&user).await.unwrap();

        let usecase = SendTestReminderUseCase {
            user_email: "turing@example.edu".into(),
        };
        let entries = execute(usecase, &ctx).await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].status, DeliveryStatus::Sent);
        assert_eq!(sender.sent_count(), 1);
        assert_eq!(ctx.repos.delivery_logs.query(10).await.len(), 1);
    }

    #[actix_web::test]
    async fn unknown_user_is_a_not_found() {
        let ctx = Context::create_inmemory();
        let usecase = SendTestReminderUseCase {
            user_email: "nobody@example.edu".into(),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::UserNotFound(_))
        ));
    }
}
