mod class;
mod delivery_log;
mod reminder_claim;
mod scheduler_state;
mod shared;
mod user;

pub use class::IClassRepo;
pub use delivery_log::IDeliveryLogRepo;
pub use reminder_claim::IReminderClaimRepo;
pub use scheduler_state::ISchedulerStateRepo;
pub use user::IUserRepo;

use class::{InMemoryClassRepo, PostgresClassRepo};
use delivery_log::{InMemoryDeliveryLogRepo, PostgresDeliveryLogRepo};
use reminder_claim::{InMemoryReminderClaimRepo, PostgresReminderClaimRepo};
use scheduler_state::{InMemorySchedulerStateRepo, PostgresSchedulerStateRepo};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use user::{InMemoryUserRepo, PostgresUserRepo};

#[derive(Clone)]
pub struct Repos {
    pub classes: Arc<dyn IClassRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub delivery_logs: Arc<dyn IDeliveryLogRepo>,
    pub reminder_claims: Arc<dyn IReminderClaimRepo>,
    pub scheduler_state: Arc<dyn ISchedulerStateRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        sqlx::migrate!().run(&pool).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            classes: Arc::new(PostgresClassRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            delivery_logs: Arc::new(PostgresDeliveryLogRepo::new(pool.clone())),
            reminder_claims: Arc::new(PostgresReminderClaimRepo::new(pool.clone())),
            scheduler_state: Arc::new(PostgresSchedulerStateRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            classes: Arc::new(InMemoryClassRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            delivery_logs: Arc::new(InMemoryDeliveryLogRepo::new()),
            reminder_claims: Arc::new(InMemoryReminderClaimRepo::new()),
            scheduler_state: Arc::new(InMemorySchedulerStateRepo::new()),
        }
    }
}
