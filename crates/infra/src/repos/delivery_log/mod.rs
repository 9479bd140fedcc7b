mod inmemory;
mod postgres;

pub use inmemory::InMemoryDeliveryLogRepo;
pub use postgres::PostgresDeliveryLogRepo;

use campanile_domain::{DeliveryLogEntry, TaskKey};

/// Append-only audit trail of every dispatch attempt. Entries are never
/// mutated or deleted.
#[async_trait::async_trait]
pub trait IDeliveryLogRepo: Send + Sync {
    async fn append(&self, entry: &DeliveryLogEntry) -> anyhow::Result<()>;
    /// The most recent entries, newest first.
    async fn query(&self, limit: usize) -> Vec<DeliveryLogEntry>;
    async fn find_by_key(&self, key: &TaskKey) -> Vec<DeliveryLogEntry>;
}
