use campanile_domain::{NotificationPreferences, Role, User, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDTO {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub preferences: NotificationPreferences,
}

impl UserDTO {
    pub fn new(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            preferences: user.preferences,
        }
    }
}
