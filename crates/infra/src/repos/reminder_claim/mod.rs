mod inmemory;
mod postgres;

pub use inmemory::InMemoryReminderClaimRepo;
pub use postgres::PostgresReminderClaimRepo;

use campanile_domain::{ClaimStatus, ReminderClaim, TaskKey};

/// Write-ahead claims keyed by `(class, occurrence start, user)`. A claim
/// must be taken before any channel send, so at most one scheduler instance
/// dispatches a given task even across restarts and overlapping ticks.
#[async_trait::async_trait]
pub trait IReminderClaimRepo: Send + Sync {
    /// Attempts to take the claim for a task key in a single atomic
    /// read-modify-write. Returns true when the caller won and must
    /// dispatch. A `failed` claim may be retaken; a `pending` claim only
    /// once it is older than `stale_after` millis (its holder crashed);
    /// terminal claims are never retaken.
    async fn claim(&self, key: &TaskKey, now: i64, stale_after: i64) -> anyhow::Result<bool>;
    /// Records the dispatch outcome for a previously claimed key.
    async fn settle(&self, key: &TaskKey, status: ClaimStatus, now: i64) -> anyhow::Result<()>;
    async fn find(&self, key: &TaskKey) -> Option<ReminderClaim>;
}
