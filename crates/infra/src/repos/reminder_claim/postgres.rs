use super::IReminderClaimRepo;
use campanile_domain::{ClaimStatus, ReminderClaim, TaskKey};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderClaimRepo {
    pool: PgPool,
}

impl PostgresReminderClaimRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderClaimRaw {
    class_uid: Uuid,
    occurrence_start: i64,
    user_uid: Uuid,
    status: String,
    updated: i64,
}

impl From<ReminderClaimRaw> for ReminderClaim {
    fn from(raw: ReminderClaimRaw) -> Self {
        Self {
            key: TaskKey {
                class_id: raw.class_uid.into(),
                occurrence_start: raw.occurrence_start,
                user_id: raw.user_uid.into(),
            },
            status: raw.status.parse().unwrap_or(ClaimStatus::Pending),
            updated: raw.updated,
        }
    }
}

#[async_trait::async_trait]
impl IReminderClaimRepo for PostgresReminderClaimRepo {
    async fn claim(&self, key: &TaskKey, now: i64, stale_after: i64) -> anyhow::Result<bool> {
        // Single upsert round-trip: the conflict arm only fires for failed
        // claims and pending claims whose holder went silent, so concurrent
        // claimants race on exactly one winning row.
        let res = sqlx::query(
            r#"
            INSERT INTO reminder_claims
            (class_uid, occurrence_start, user_uid, status, updated)
            VALUES($1, $2, $3, 'pending', $4)
            ON CONFLICT (class_uid, occurrence_start, user_uid) DO UPDATE
            SET status = 'pending', updated = $4
            WHERE reminder_claims.status = 'failed'
            OR (reminder_claims.status = 'pending' AND reminder_claims.updated <= $4 - $5)
            "#,
        )
        .bind(key.class_id.inner_ref())
        .bind(key.occurrence_start)
        .bind(key.user_id.inner_ref())
        .bind(now)
        .bind(stale_after)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() > 0)
    }

    async fn settle(&self, key: &TaskKey, status: ClaimStatus, now: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_claims
            SET status = $4, updated = $5
            WHERE class_uid = $1 AND occurrence_start = $2 AND user_uid = $3
            "#,
        )
        .bind(key.class_id.inner_ref())
        .bind(key.occurrence_start)
        .bind(key.user_id.inner_ref())
        .bind(status.to_string())
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, key: &TaskKey) -> Option<ReminderClaim> {
        sqlx::query_as::<_, ReminderClaimRaw>(
            r#"
            SELECT * FROM reminder_claims
            WHERE class_uid = $1 AND occurrence_start = $2 AND user_uid = $3
            "#,
        )
        .bind(key.class_id.inner_ref())
        .bind(key.occurrence_start)
        .bind(key.user_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|raw| raw.into())
    }
}
