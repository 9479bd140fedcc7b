use super::IUserRepo;
use campanile_domain::{Role, User, ID};
use sqlx::{
    types::{Json, Uuid},
    FromRow, PgPool,
};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    email: String,
    role: String,
    preferences: serde_json::Value,
    created: i64,
}

impl From<UserRaw> for User {
    fn from(raw: UserRaw) -> Self {
        Self {
            id: raw.user_uid.into(),
            name: raw.name,
            email: raw.email,
            role: raw.role.parse().unwrap_or(Role::Staff),
            preferences: serde_json::from_value(raw.preferences).unwrap_or_default(),
            created: raw.created,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users
            (user_uid, name, email, role, preferences, created)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(Json(&user.preferences))
        .bind(user.created)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2,
            email = $3,
            role = $4,
            preferences = $5
            WHERE user_uid = $1
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(Json(&user.preferences))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|raw| raw.into())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .ok()
        .map(|raw| raw.into())
    }

    async fn find_all(&self) -> Vec<User> {
        sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users
            ORDER BY created
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|raw| raw.into())
        .collect()
    }
}
