use super::ISchedulerStateRepo;
use sqlx::{FromRow, PgPool};

const DISPATCH_WATERMARK: &str = "dispatch_watermark";

pub struct PostgresSchedulerStateRepo {
    pool: PgPool,
}

impl PostgresSchedulerStateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct SchedulerStateRaw {
    watermark: i64,
}

#[async_trait::async_trait]
impl ISchedulerStateRepo for PostgresSchedulerStateRepo {
    async fn get_watermark(&self) -> Option<i64> {
        sqlx::query_as::<_, SchedulerStateRaw>(
            r#"
            SELECT watermark FROM scheduler_state
            WHERE name = $1
            "#,
        )
        .bind(DISPATCH_WATERMARK)
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|raw| raw.watermark)
    }

    async fn set_watermark(&self, ts: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO scheduler_state (name, watermark)
            VALUES($1, $2)
            ON CONFLICT (name) DO UPDATE
            SET watermark = $2
            "#,
        )
        .bind(DISPATCH_WATERMARK)
        .bind(ts)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
