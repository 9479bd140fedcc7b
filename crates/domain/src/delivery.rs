use std::{fmt::Display, str::FromStr};

use crate::{
    preferences::ChannelKind,
    reminder::TaskKey,
    shared::entity::{Entity, ID},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of one dispatch attempt on one channel.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
    Suppressed,
}

impl Display for DeliveryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Suppressed => "suppressed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum InvalidDeliveryStatusError {
    #[error("Invalid delivery status: {0}")]
    Unknown(String),
}

impl FromStr for DeliveryStatus {
    type Err = InvalidDeliveryStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "suppressed" => Ok(Self::Suppressed),
            _ => Err(InvalidDeliveryStatusError::Unknown(s.to_string())),
        }
    }
}

/// Append-only record of a dispatch attempt. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryLogEntry {
    pub id: ID,
    pub key: TaskKey,
    pub channel: ChannelKind,
    pub status: DeliveryStatus,
    pub response: String,
    pub timestamp: i64,
}

impl Entity for DeliveryLogEntry {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl DeliveryLogEntry {
    pub fn new(
        key: TaskKey,
        channel: ChannelKind,
        status: DeliveryStatus,
        response: String,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Default::default(),
            key,
            channel,
            status,
            response,
            timestamp,
        }
    }
}

/// Write-ahead claim state for a task key. `Sent` and `Suppressed` are
/// terminal; `Failed` claims may be retaken on a later tick; `Pending`
/// blocks concurrent claimants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimStatus {
    Pending,
    Sent,
    Failed,
    Suppressed,
}

impl ClaimStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Sent | Self::Suppressed)
    }
}

impl Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Suppressed => "suppressed",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum InvalidClaimStatusError {
    #[error("Invalid claim status: {0}")]
    Unknown(String),
}

impl FromStr for ClaimStatus {
    type Err = InvalidClaimStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "suppressed" => Ok(Self::Suppressed),
            _ => Err(InvalidClaimStatusError::Unknown(s.to_string())),
        }
    }
}

impl From<DeliveryStatus> for ClaimStatus {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Sent => Self::Sent,
            DeliveryStatus::Failed => Self::Failed,
            DeliveryStatus::Suppressed => Self::Suppressed,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReminderClaim {
    pub key: TaskKey,
    pub status: ClaimStatus,
    pub updated: i64,
}

/// Settles the channel outcomes of one dispatched task into a single claim
/// status: any sent wins, otherwise any failure is retryable, otherwise
/// everything was suppressed.
pub fn settle_outcomes(entries: &[DeliveryLogEntry]) -> ClaimStatus {
    let mut any_failed = false;
    for entry in entries {
        match entry.status {
            DeliveryStatus::Sent => return ClaimStatus::Sent,
            DeliveryStatus::Failed => any_failed = true,
            DeliveryStatus::Suppressed => {}
        }
    }
    if any_failed {
        ClaimStatus::Failed
    } else {
        ClaimStatus::Suppressed
    }
}
