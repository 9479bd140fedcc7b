use super::IClassRepo;
use campanile_domain::{ClassDefinition, ID};
use chrono::NaiveDateTime;
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresClassRepo {
    pool: PgPool,
}

impl PostgresClassRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClassRaw {
    class_uid: Uuid,
    title: String,
    room: String,
    teacher_email: String,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    recurrence: String,
    created: i64,
}

impl From<ClassRaw> for ClassDefinition {
    fn from(raw: ClassRaw) -> Self {
        Self {
            id: raw.class_uid.into(),
            title: raw.title,
            room: raw.room,
            teacher_email: raw.teacher_email,
            start_time: raw.start_time,
            end_time: raw.end_time,
            recurrence: raw.recurrence.parse().unwrap_or_default(),
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl IClassRepo for PostgresClassRepo {
    async fn insert(&self, class: &ClassDefinition) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO classes
            (class_uid, title, room, teacher_email, start_time, end_time, recurrence, created)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(class.id.inner_ref())
        .bind(&class.title)
        .bind(&class.room)
        .bind(&class.teacher_email)
        .bind(class.start_time)
        .bind(class.end_time)
        .bind(class.recurrence.to_string())
        .bind(class.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, class_id: &ID) -> Option<ClassDefinition> {
        sqlx::query_as::<_, ClassRaw>(
            r#"
            SELECT * FROM classes
            WHERE class_uid = $1
            "#,
        )
        .bind(class_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|raw| raw.into())
    }

    async fn find_active(&self) -> Vec<ClassDefinition> {
        sqlx::query_as::<_, ClassRaw>(
            r#"
            SELECT * FROM classes
            ORDER BY start_time
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }

    async fn find_by_teacher_email(&self, email: &str) -> Vec<ClassDefinition> {
        sqlx::query_as::<_, ClassRaw>(
            r#"
            SELECT * FROM classes
            WHERE teacher_email = $1
            ORDER BY start_time
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }
}
