use std::{fmt::Display, str::FromStr};

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lead times (minutes before class start) a user may pick from.
pub const ALLOWED_LEAD_TIMES: [i64; 5] = [5, 10, 15, 30, 60];

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Email,
    Sms,
    Push,
}

impl Display for ChannelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Push => "push",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum InvalidChannelError {
    #[error("Invalid channel specified: {0}")]
    Unknown(String),
}

impl FromStr for ChannelKind {
    type Err = InvalidChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "sms" => Ok(Self::Sms),
            "push" => Ok(Self::Push),
            _ => Err(InvalidChannelError::Unknown(s.to_string())),
        }
    }
}

/// Independently toggled delivery channels. Only email is live today; sms
/// and push are accepted and stored but dispatch as no-ops.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channels {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
}

impl Channels {
    pub fn enabled(&self) -> Vec<ChannelKind> {
        let mut channels = Vec::new();
        if self.email {
            channels.push(ChannelKind::Email);
        }
        if self.sms {
            channels.push(ChannelKind::Sms);
        }
        if self.push {
            channels.push(ChannelKind::Push);
        }
        channels
    }

    pub fn any_enabled(&self) -> bool {
        self.email || self.sms || self.push
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: false,
        }
    }
}

pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, InvalidTimeOfDayError> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|_| InvalidTimeOfDayError::Malformed(s.to_string()))
}

#[derive(Error, Debug)]
pub enum InvalidTimeOfDayError {
    #[error("Time of day: {0} is malformed, expected HH:MM")]
    Malformed(String),
}

mod time_of_day {
    use chrono::NaiveTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(D::Error::custom)
    }
}

/// A local time-of-day window during which reminders are deferred or
/// suppressed. The window may wrap past midnight (22:00-07:00).
/// Containment is start-inclusive and end-exclusive.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuietHours {
    pub enabled: bool,
    #[serde(with = "time_of_day")]
    pub start: NaiveTime,
    #[serde(with = "time_of_day")]
    pub end: NaiveTime,
}

impl QuietHours {
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if !self.enabled || self.start == self.end {
            // equal bounds describe an empty window, not a full day
            return false;
        }
        if self.wraps() {
            time >= self.start || time < self.end
        } else {
            time >= self.start && time < self.end
        }
    }
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(22, 0, 0).expect("valid time"),
            end: NaiveTime::from_hms_opt(7, 0, 0).expect("valid time"),
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub enabled: bool,
    pub lead_time_minutes: i64,
    pub channels: Channels,
    pub quiet_hours: QuietHours,
}

impl NotificationPreferences {
    pub fn is_valid(&self) -> bool {
        ALLOWED_LEAD_TIMES.contains(&self.lead_time_minutes)
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_time_minutes: 15,
            channels: Default::default(),
            quiet_hours: Default::default(),
        }
    }
}
