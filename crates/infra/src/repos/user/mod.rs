mod inmemory;
mod postgres;

pub use inmemory::InMemoryUserRepo;
pub use postgres::PostgresUserRepo;

use campanile_domain::{User, ID};

#[async_trait::async_trait]
pub trait IUserRepo: Send + Sync {
    async fn insert(&self, user: &User) -> anyhow::Result<()>;
    async fn save(&self, user: &User) -> anyhow::Result<()>;
    async fn find(&self, user_id: &ID) -> Option<User>;
    async fn find_by_email(&self, email: &str) -> Option<User>;
    async fn find_all(&self) -> Vec<User>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;
    use campanile_domain::Role;

    #[tokio::test]
    async fn saves_preference_changes() {
        let ctx = Context::create_inmemory();

        let mut user = User::new(
            "Alan Turing".into(),
            "turing@example.edu".into(),
            Role::Staff,
            0,
        );
        ctx.repos.users.insert(&user).await.expect("To insert user");

        user.preferences.lead_time_minutes = 30;
        ctx.repos.users.save(&user).await.expect("To save user");

        let found = ctx
            .repos
            .users
            .find_by_email("turing@example.edu")
            .await
            .expect("To find user");
        assert_eq!(found.preferences.lead_time_minutes, 30);
        assert_eq!(ctx.repos.users.find_all().await.len(), 1);
    }
}
