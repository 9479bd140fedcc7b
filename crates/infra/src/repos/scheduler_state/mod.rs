mod inmemory;
mod postgres;

pub use inmemory::InMemorySchedulerStateRepo;
pub use postgres::PostgresSchedulerStateRepo;

/// Persisted dispatch watermark: the end of the last fully processed tick
/// window. Kept out of process memory so a restarted scheduler resumes
/// where the previous instance stopped.
#[async_trait::async_trait]
pub trait ISchedulerStateRepo: Send + Sync {
    async fn get_watermark(&self) -> Option<i64>;
    async fn set_watermark(&self, ts: i64) -> anyhow::Result<()>;
}
