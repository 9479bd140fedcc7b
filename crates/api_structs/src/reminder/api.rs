use serde::{Deserialize, Serialize};

use crate::dtos::DeliveryLogEntryDTO;

pub mod send_test_reminder {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub user_email: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub deliveries: Vec<DeliveryLogEntryDTO>,
    }
}

pub mod get_delivery_logs {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub limit: Option<usize>,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub logs: Vec<DeliveryLogEntryDTO>,
    }
}
