mod inmemory;
mod postgres;

pub use inmemory::InMemoryClassRepo;
pub use postgres::PostgresClassRepo;

use campanile_domain::{ClassDefinition, ID};

#[async_trait::async_trait]
pub trait IClassRepo: Send + Sync {
    async fn insert(&self, class: &ClassDefinition) -> anyhow::Result<()>;
    async fn find(&self, class_id: &ID) -> Option<ClassDefinition>;
    /// All class definitions reminders may be dispatched against.
    /// Definitions are insert-only, so this is the full timetable.
    async fn find_active(&self) -> Vec<ClassDefinition>;
    async fn find_by_teacher_email(&self, email: &str) -> Vec<ClassDefinition>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Context;
    use campanile_domain::Recurrence;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn finds_classes_by_teacher_email() {
        let ctx = Context::create_inmemory();

        let start = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let class = ClassDefinition::new(
            "Linear Algebra".into(),
            "B-201".into(),
            "turing@example.edu".into(),
            start,
            start + chrono::Duration::minutes(90),
            Recurrence::Weekly,
            0,
        )
        .unwrap();
        ctx.repos
            .classes
            .insert(&class)
            .await
            .expect("To insert class");

        assert_eq!(ctx.repos.classes.find_active().await.len(), 1);
        assert_eq!(
            ctx.repos
                .classes
                .find_by_teacher_email("turing@example.edu")
                .await
                .len(),
            1
        );
        assert!(ctx
            .repos
            .classes
            .find_by_teacher_email("lovelace@example.edu")
            .await
            .is_empty());
        assert_eq!(ctx.repos.classes.find(&class.id).await, Some(class));
    }
}
