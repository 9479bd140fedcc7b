use super::IDeliveryLogRepo;
use campanile_domain::{DeliveryLogEntry, TaskKey};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresDeliveryLogRepo {
    pool: PgPool,
}

impl PostgresDeliveryLogRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DeliveryLogRaw {
    log_uid: Uuid,
    class_uid: Uuid,
    occurrence_start: i64,
    user_uid: Uuid,
    channel: String,
    status: String,
    response: String,
    timestamp: i64,
}

impl From<DeliveryLogRaw> for DeliveryLogEntry {
    fn from(raw: DeliveryLogRaw) -> Self {
        Self {
            id: raw.log_uid.into(),
            key: TaskKey {
                class_id: raw.class_uid.into(),
                occurrence_start: raw.occurrence_start,
                user_id: raw.user_uid.into(),
            },
            channel: raw.channel.parse().unwrap_or(
                campanile_domain::ChannelKind::Email,
            ),
            status: raw
                .status
                .parse()
                .unwrap_or(campanile_domain::DeliveryStatus::Failed),
            response: raw.response,
            timestamp: raw.timestamp,
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryLogRepo for PostgresDeliveryLogRepo {
    async fn append(&self, entry: &DeliveryLogEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO delivery_logs
            (log_uid, class_uid, occurrence_start, user_uid, channel, status, response, timestamp)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id.inner_ref())
        .bind(entry.key.class_id.inner_ref())
        .bind(entry.key.occurrence_start)
        .bind(entry.key.user_id.inner_ref())
        .bind(entry.channel.to_string())
        .bind(entry.status.to_string())
        .bind(&entry.response)
        .bind(entry.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(&self, limit: usize) -> Vec<DeliveryLogEntry> {
        sqlx::query_as::<_, DeliveryLogRaw>(
            r#"
            SELECT * FROM delivery_logs
            ORDER BY timestamp DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }

    async fn find_by_key(&self, key: &TaskKey) -> Vec<DeliveryLogEntry> {
        sqlx::query_as::<_, DeliveryLogRaw>(
            r#"
            SELECT * FROM delivery_logs
            WHERE class_uid = $1 AND occurrence_start = $2 AND user_uid = $3
            ORDER BY timestamp
            "#,
        )
        .bind(key.class_id.inner_ref())
        .bind(key.occurrence_start)
        .bind(key.user_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }
}
