use std::{fmt::Display, str::FromStr};

use crate::{
    preferences::NotificationPreferences,
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum InvalidRoleError {
    #[error("Invalid role specified: {0}")]
    Unknown(String),
}

impl FromStr for Role {
    type Err = InvalidRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            _ => Err(InvalidRoleError::Unknown(s.to_string())),
        }
    }
}

/// A staff or admin account. A user is subscribed to every class whose
/// `teacher_email` matches their own email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub preferences: NotificationPreferences,
    pub created: i64,
}

impl User {
    pub fn new(name: String, email: String, role: Role, created: i64) -> Self {
        Self {
            id: Default::default(),
            name,
            email,
            role,
            preferences: Default::default(),
            created,
        }
    }
}

impl Entity for User {
    fn id(&self) -> &ID {
        &self.id
    }
}
