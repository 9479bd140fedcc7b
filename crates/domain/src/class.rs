use crate::{
    date::local_to_instant,
    occurrence::Occurrence,
    recurrence::Recurrence,
    shared::entity::{Entity, ID},
    timespan::TimeSpan,
};
use chrono::{Duration, NaiveDateTime};
use chrono_tz::{Tz, UTC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Institution-wide settings that class wall-clock times are interpreted
/// against.
#[derive(Debug, Clone)]
pub struct InstitutionSettings {
    pub timezone: Tz,
}

impl InstitutionSettings {
    pub fn set_timezone(&mut self, timezone: &str) -> bool {
        match timezone.parse::<Tz>() {
            Ok(tz) => {
                self.timezone = tz;
                true
            }
            Err(_) => false,
        }
    }
}

impl Default for InstitutionSettings {
    fn default() -> Self {
        Self { timezone: UTC }
    }
}

/// A stored class definition. `start_time` / `end_time` are naive
/// institution-local wall-clock values; instants are only materialized at
/// expansion time. Definitions are insert-only once reminders have been
/// dispatched against them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    pub id: ID,
    pub title: String,
    pub room: String,
    pub teacher_email: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub recurrence: Recurrence,
    pub created: i64,
}

impl Entity for ClassDefinition {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Error, Debug)]
pub enum InvalidClassError {
    #[error("Class end time: {1} must be after start time: {0}")]
    EndNotAfterStart(NaiveDateTime, NaiveDateTime),
}

impl ClassDefinition {
    pub fn new(
        title: String,
        room: String,
        teacher_email: String,
        start_time: NaiveDateTime,
        end_time: NaiveDateTime,
        recurrence: Recurrence,
        created: i64,
    ) -> Result<Self, InvalidClassError> {
        if end_time <= start_time {
            return Err(InvalidClassError::EndNotAfterStart(start_time, end_time));
        }
        Ok(Self {
            id: Default::default(),
            title,
            room,
            teacher_email,
            start_time,
            end_time,
            recurrence,
            created,
        })
    }

    pub fn duration_millis(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }

    /// Expands the definition into concrete occurrences whose start instant
    /// falls inside `window`. Pure function of its inputs: the same
    /// definition and window always produce the same occurrences, ordered by
    /// start. At most `cap` occurrences are emitted per call.
    ///
    /// Weekly steps advance in local wall-clock so occurrences keep their
    /// local start time across DST transitions. Nothing is emitted before
    /// the definition's own first start.
    pub fn expand(
        &self,
        window: &TimeSpan,
        settings: &InstitutionSettings,
        cap: usize,
    ) -> Vec<Occurrence> {
        if cap == 0 {
            return Vec::new();
        }
        let duration = self.duration_millis();
        let mut occurrences = Vec::new();
        let mut step: u32 = 0;
        loop {
            let local_start = self.start_time + Duration::weeks(i64::from(step));
            if let Some(start_ts) = local_to_instant(local_start, settings.timezone) {
                if start_ts >= window.end() {
                    break;
                }
                if self.recurrence.occurs_on_step(step) && window.contains(start_ts) {
                    occurrences.push(Occurrence {
                        class_id: self.id.clone(),
                        start_ts,
                        end_ts: start_ts + duration,
                    });
                    if occurrences.len() >= cap {
                        break;
                    }
                }
            }
            if !self.recurrence.is_repeating() {
                break;
            }
            step += 1;
        }
        occurrences
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use chrono_tz::Europe::Oslo;

    const WEEK_MILLIS: i64 = 7 * 24 * 60 * 60 * 1000;

    fn monday_nine() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn class_with(recurrence: Recurrence) -> ClassDefinition {
        ClassDefinition::new(
            "Linear Algebra".into(),
            "B-201".into(),
            "turing@example.edu".into(),
            monday_nine(),
            monday_nine() + Duration::minutes(90),
            recurrence,
            0,
        )
        .unwrap()
    }

    fn utc_settings() -> InstitutionSettings {
        Default::default()
    }

    fn window_weeks(weeks: i64) -> TimeSpan {
        let start = local_to_instant(monday_nine(), chrono_tz::UTC).unwrap();
        TimeSpan::new(start - 1000, start + weeks * WEEK_MILLIS).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let res = ClassDefinition::new(
            "X".into(),
            "Y".into(),
            "z@example.edu".into(),
            monday_nine(),
            monday_nine(),
            Recurrence::Once,
            0,
        );
        assert!(res.is_err());
    }

    #[test]
    fn once_emits_single_occurrence_inside_window() {
        let class = class_with(Recurrence::Once);
        let occurrences = class.expand(&window_weeks(4), &utc_settings(), 100);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].duration(), 90 * 60 * 1000);
    }

    #[test]
    fn once_outside_window_is_empty() {
        let class = class_with(Recurrence::Once);
        let start = local_to_instant(monday_nine(), chrono_tz::UTC).unwrap();
        let later = TimeSpan::new(start + WEEK_MILLIS, start + 2 * WEEK_MILLIS).unwrap();
        assert!(class.expand(&later, &utc_settings(), 100).is_empty());
    }

    #[test]
    fn weekly_emits_one_per_week_seven_days_apart() {
        let class = class_with(Recurrence::Weekly);
        let occurrences = class.expand(&window_weeks(6), &utc_settings(), 100);
        assert_eq!(occurrences.len(), 6);
        for pair in occurrences.windows(2) {
            assert_eq!(pair[1].start_ts - pair[0].start_ts, WEEK_MILLIS);
        }
        for occurrence in &occurrences {
            assert_eq!(occurrence.duration(), class.duration_millis());
        }
    }

    #[test]
    fn parity_variants_are_disjoint_and_union_to_weekly() {
        let weekly = class_with(Recurrence::Weekly);
        let mut odd = class_with(Recurrence::OddWeeks);
        let mut even = class_with(Recurrence::EvenWeeks);
        // same identity so start instants are comparable
        odd.id = weekly.id.clone();
        even.id = weekly.id.clone();

        let window = window_weeks(8);
        let all = weekly.expand(&window, &utc_settings(), 100);
        let odd = odd.expand(&window, &utc_settings(), 100);
        let even = even.expand(&window, &utc_settings(), 100);

        assert_eq!(odd.len() + even.len(), all.len());
        for occurrence in &odd {
            assert!(!even.contains(occurrence));
            assert!(all.contains(occurrence));
        }
        // the first occurrence belongs to the even variant
        assert_eq!(even[0].start_ts, all[0].start_ts);
    }

    #[test]
    fn never_expands_before_first_start() {
        let class = class_with(Recurrence::Weekly);
        let start = local_to_instant(monday_nine(), chrono_tz::UTC).unwrap();
        let window = TimeSpan::new(start - 4 * WEEK_MILLIS, start + WEEK_MILLIS).unwrap();
        let occurrences = class.expand(&window, &utc_settings(), 100);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].start_ts, start);
    }

    #[test]
    fn caps_emitted_occurrences() {
        let class = class_with(Recurrence::Weekly);
        let occurrences = class.expand(&window_weeks(52), &utc_settings(), 10);
        assert_eq!(occurrences.len(), 10);
    }

    #[test]
    fn weekly_keeps_local_start_time_across_dst() {
        let class = class_with(Recurrence::Weekly);
        let settings = InstitutionSettings { timezone: Oslo };
        let start = local_to_instant(monday_nine(), Oslo).unwrap();
        // Window spanning Oslo's spring-forward on 2024-03-31
        let window = TimeSpan::new(start - 1000, start + 6 * WEEK_MILLIS).unwrap();
        let occurrences = class.expand(&window, &settings, 100);
        assert_eq!(occurrences.len(), 6);
        for occurrence in &occurrences {
            let local = chrono::TimeZone::timestamp_millis_opt(&Oslo, occurrence.start_ts)
                .unwrap()
                .time();
            assert_eq!(local, chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        }
        // the week crossing the transition is one hour shorter in UTC terms
        let gaps: Vec<i64> = occurrences
            .windows(2)
            .map(|pair| pair[1].start_ts - pair[0].start_ts)
            .collect();
        assert!(gaps.contains(&(WEEK_MILLIS - 60 * 60 * 1000)));
    }
}
