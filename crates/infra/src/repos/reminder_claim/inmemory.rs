use super::IReminderClaimRepo;
use campanile_domain::{ClaimStatus, ReminderClaim, TaskKey};
use std::collections::HashMap;
use std::sync::Mutex;

pub struct InMemoryReminderClaimRepo {
    // one mutex over the whole map gives the same at-most-one-winner
    // guarantee as the transactional upsert in the postgres version
    claims: Mutex<HashMap<TaskKey, ReminderClaim>>,
}

impl InMemoryReminderClaimRepo {
    pub fn new() -> Self {
        Self {
            claims: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderClaimRepo for InMemoryReminderClaimRepo {
    async fn claim(&self, key: &TaskKey, now: i64, stale_after: i64) -> anyhow::Result<bool> {
        let mut claims = self.claims.lock().unwrap();
        if let Some(existing) = claims.get(key) {
            let retakable = match existing.status {
                ClaimStatus::Failed => true,
                ClaimStatus::Pending => now - existing.updated >= stale_after,
                ClaimStatus::Sent | ClaimStatus::Suppressed => false,
            };
            if !retakable {
                return Ok(false);
            }
        }
        claims.insert(
            key.clone(),
            ReminderClaim {
                key: key.clone(),
                status: ClaimStatus::Pending,
                updated: now,
            },
        );
        Ok(true)
    }

    async fn settle(&self, key: &TaskKey, status: ClaimStatus, now: i64) -> anyhow::Result<()> {
        let mut claims = self.claims.lock().unwrap();
        claims.insert(
            key.clone(),
            ReminderClaim {
                key: key.clone(),
                status,
                updated: now,
            },
        );
        Ok(())
    }

    async fn find(&self, key: &TaskKey) -> Option<ReminderClaim> {
        self.claims.lock().unwrap().get(key).cloned()
    }
}
