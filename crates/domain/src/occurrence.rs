use crate::shared::entity::ID;
use serde::{Deserialize, Serialize};

/// One concrete calendar instance of a (possibly recurring) class.
/// Derived on demand by expansion, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub class_id: ID,
    pub start_ts: i64,
    pub end_ts: i64,
}

impl Occurrence {
    pub fn duration(&self) -> i64 {
        self.end_ts - self.start_ts
    }
}
