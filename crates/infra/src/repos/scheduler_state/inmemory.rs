use super::ISchedulerStateRepo;
use std::sync::Mutex;

pub struct InMemorySchedulerStateRepo {
    watermark: Mutex<Option<i64>>,
}

impl InMemorySchedulerStateRepo {
    pub fn new() -> Self {
        Self {
            watermark: Mutex::new(None),
        }
    }
}

#[async_trait::async_trait]
impl ISchedulerStateRepo for InMemorySchedulerStateRepo {
    async fn get_watermark(&self) -> Option<i64> {
        *self.watermark.lock().unwrap()
    }

    async fn set_watermark(&self, ts: i64) -> anyhow::Result<()> {
        *self.watermark.lock().unwrap() = Some(ts);
        Ok(())
    }
}
