use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a class definition repeats. Week parity for the `OddWeeks` /
/// `EvenWeeks` variants is relative to the definition's own first
/// occurrence (step index 0 is even), never to calendar week numbers.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recurrence {
    Once,
    Weekly,
    OddWeeks,
    EvenWeeks,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::Once
    }
}

#[derive(Error, Debug)]
pub enum InvalidRecurrenceError {
    #[error("Invalid recurrence specified: {0}")]
    Unknown(String),
}

impl FromStr for Recurrence {
    type Err = InvalidRecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ONCE" => Ok(Self::Once),
            "WEEKLY" => Ok(Self::Weekly),
            "ODD_WEEKS" => Ok(Self::OddWeeks),
            "EVEN_WEEKS" => Ok(Self::EvenWeeks),
            _ => Err(InvalidRecurrenceError::Unknown(s.to_string())),
        }
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Once => "ONCE",
            Self::Weekly => "WEEKLY",
            Self::OddWeeks => "ODD_WEEKS",
            Self::EvenWeeks => "EVEN_WEEKS",
        };
        write!(f, "{}", s)
    }
}

impl Recurrence {
    /// Lenient parse used on the admin ingest path. An unknown or missing
    /// value falls back to `Once` and a warning is handed back to the
    /// caller instead of failing the whole upload.
    pub fn parse_lenient(value: Option<&str>) -> (Self, Option<String>) {
        match value {
            None => (Self::Once, None),
            Some(raw) => match raw.parse::<Self>() {
                Ok(recurrence) => (recurrence, None),
                Err(_) => (
                    Self::Once,
                    Some(format!(
                        "Unknown recurrence value: {}, falling back to ONCE",
                        raw
                    )),
                ),
            },
        }
    }

    pub fn is_repeating(&self) -> bool {
        !matches!(self, Self::Once)
    }

    /// Whether an occurrence exists at the given weekly step from the
    /// definition's first start.
    pub fn occurs_on_step(&self, step: u32) -> bool {
        match self {
            Self::Once => step == 0,
            Self::Weekly => true,
            Self::EvenWeeks => step % 2 == 0,
            Self::OddWeeks => step % 2 == 1,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_known_values() {
        assert_eq!("ONCE".parse::<Recurrence>().unwrap(), Recurrence::Once);
        assert_eq!("weekly".parse::<Recurrence>().unwrap(), Recurrence::Weekly);
        assert_eq!(
            "ODD_WEEKS".parse::<Recurrence>().unwrap(),
            Recurrence::OddWeeks
        );
        assert_eq!(
            "even_weeks".parse::<Recurrence>().unwrap(),
            Recurrence::EvenWeeks
        );
    }

    #[test]
    fn rejects_unknown_values() {
        assert!("BIWEEKLY".parse::<Recurrence>().is_err());
        assert!("".parse::<Recurrence>().is_err());
    }

    #[test]
    fn lenient_parse_falls_back_to_once() {
        let (recurrence, warning) = Recurrence::parse_lenient(Some("FORTNIGHTLY"));
        assert_eq!(recurrence, Recurrence::Once);
        assert!(warning.is_some());

        let (recurrence, warning) = Recurrence::parse_lenient(None);
        assert_eq!(recurrence, Recurrence::Once);
        assert!(warning.is_none());

        let (recurrence, warning) = Recurrence::parse_lenient(Some("WEEKLY"));
        assert_eq!(recurrence, Recurrence::Weekly);
        assert!(warning.is_none());
    }

    #[test]
    fn parity_is_relative_to_first_occurrence() {
        // step 0 always belongs to the even variant
        assert!(Recurrence::EvenWeeks.occurs_on_step(0));
        assert!(!Recurrence::OddWeeks.occurs_on_step(0));

        for step in 0..10 {
            let even = Recurrence::EvenWeeks.occurs_on_step(step);
            let odd = Recurrence::OddWeeks.occurs_on_step(step);
            // disjoint and together equal to weekly
            assert_ne!(even, odd);
            assert!(Recurrence::Weekly.occurs_on_step(step));
        }
    }

    #[test]
    fn serde_round_trip_uses_screaming_snake_case() {
        let json = serde_json::to_string(&Recurrence::OddWeeks).unwrap();
        assert_eq!(json, "\"ODD_WEEKS\"");
        let parsed: Recurrence = serde_json::from_str("\"EVEN_WEEKS\"").unwrap();
        assert_eq!(parsed, Recurrence::EvenWeeks);
    }
}
