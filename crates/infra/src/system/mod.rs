use chrono::Utc;

/// Clock abstraction so that scheduling logic can be tested against a
/// frozen time.
pub trait ISys: Send + Sync {
    /// The current timestamp in epoch millis
    fn get_timestamp_millis(&self) -> i64;
}

/// Wall-clock implementation used outside of tests
pub struct RealSys {}

impl ISys for RealSys {
    fn get_timestamp_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Frozen clock for tests
pub struct StaticTimeSys {
    pub timestamp_millis: i64,
}

impl ISys for StaticTimeSys {
    fn get_timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }
}
