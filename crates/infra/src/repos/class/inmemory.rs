use super::IClassRepo;
use crate::repos::shared::inmemory_repo::*;
use campanile_domain::{ClassDefinition, ID};

pub struct InMemoryClassRepo {
    classes: std::sync::Mutex<Vec<ClassDefinition>>,
}

impl InMemoryClassRepo {
    pub fn new() -> Self {
        Self {
            classes: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IClassRepo for InMemoryClassRepo {
    async fn insert(&self, class: &ClassDefinition) -> anyhow::Result<()> {
        insert(class, &self.classes);
        Ok(())
    }

    async fn find(&self, class_id: &ID) -> Option<ClassDefinition> {
        find(class_id, &self.classes)
    }

    async fn find_active(&self) -> Vec<ClassDefinition> {
        find_by(&self.classes, |_| true)
    }

    async fn find_by_teacher_email(&self, email: &str) -> Vec<ClassDefinition> {
        find_by(&self.classes, |class| class.teacher_email == email)
    }
}
