mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{
    IClassRepo, IDeliveryLogRepo, IReminderClaimRepo, ISchedulerStateRepo, IUserRepo, Repos,
};
pub use services::*;
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::warn;

#[derive(Clone)]
pub struct Context {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub email_sender: Arc<dyn IEmailSender>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl Context {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        Self {
            repos,
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            email_sender: email_sender_from_env(),
        }
    }

    /// Context backed entirely by in-memory repositories, used by tests and
    /// by deployments running without a database.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            email_sender: email_sender_from_env(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> Context {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    match std::env::var(PSQL_CONNECTION_STRING) {
        Ok(connection_string) => {
            Context::create(ContextParams {
                postgres_connection_string: connection_string,
            })
            .await
        }
        Err(_) => {
            warn!(
                "Did not find {} environment variable. Falling back to in-memory repositories, nothing will be persisted across restarts.",
                PSQL_CONNECTION_STRING
            );
            Context::create_inmemory()
        }
    }
}

fn email_sender_from_env() -> Arc<dyn IEmailSender> {
    match SmtpEmailSender::from_env() {
        Ok(sender) => Arc::new(sender),
        Err(e) => {
            warn!(
                "SMTP transport not configured ({}). Reminder emails will only be logged.",
                e
            );
            Arc::new(LoggingEmailSender {})
        }
    }
}
