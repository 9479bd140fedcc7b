use campanile_domain::{Role, User};
use serde::{Deserialize, Serialize};

use crate::dtos::UserDTO;

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user: UserDTO,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self {
            user: UserDTO::new(user),
        }
    }
}

pub mod create_user {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub name: String,
        pub email: String,
        pub role: Role,
    }

    pub type APIResponse = UserResponse;
}

pub mod get_users {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub users: Vec<UserDTO>,
    }
}

pub mod set_preferences {
    use super::*;

    /// Quiet-hours times travel as raw "HH:MM" strings so validation errors
    /// can name the malformed value instead of failing deserialization.
    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QuietHoursBody {
        pub enabled: bool,
        pub start: String,
        pub end: String,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ChannelsBody {
        pub email: bool,
        pub sms: bool,
        pub push: bool,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub enabled: bool,
        pub lead_time_minutes: i64,
        pub channels: ChannelsBody,
        pub quiet_hours: QuietHoursBody,
    }

    pub type APIResponse = UserResponse;
}
