use super::IDeliveryLogRepo;
use crate::repos::shared::inmemory_repo::*;
use campanile_domain::{DeliveryLogEntry, TaskKey};

pub struct InMemoryDeliveryLogRepo {
    entries: std::sync::Mutex<Vec<DeliveryLogEntry>>,
}

impl InMemoryDeliveryLogRepo {
    pub fn new() -> Self {
        Self {
            entries: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IDeliveryLogRepo for InMemoryDeliveryLogRepo {
    async fn append(&self, entry: &DeliveryLogEntry) -> anyhow::Result<()> {
        insert(entry, &self.entries);
        Ok(())
    }

    async fn query(&self, limit: usize) -> Vec<DeliveryLogEntry> {
        let mut entries = find_by(&self.entries, |_| true);
        entries.sort_by_key(|entry| std::cmp::Reverse(entry.timestamp));
        entries.truncate(limit);
        entries
    }

    async fn find_by_key(&self, key: &TaskKey) -> Vec<DeliveryLogEntry> {
        find_by(&self.entries, |entry| entry.key == *key)
    }
}
