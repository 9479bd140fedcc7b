use crate::{
    date::local_to_instant, occurrence::Occurrence, preferences::NotificationPreferences,
    shared::entity::ID,
};
use chrono::{Duration, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// The unit of scheduling: one reminder for one user about one occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderTask {
    pub class_id: ID,
    pub occurrence_start: i64,
    pub user_id: ID,
    pub planned_fire_ts: i64,
}

impl ReminderTask {
    pub fn key(&self) -> TaskKey {
        TaskKey {
            class_id: self.class_id.clone(),
            occurrence_start: self.occurrence_start,
            user_id: self.user_id.clone(),
        }
    }
}

/// Idempotency key guaranteeing at-most-one delivered reminder per
/// occurrence per user, across restarts and concurrent scheduler instances.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskKey {
    pub class_id: ID,
    pub occurrence_start: i64,
    pub user_id: ID,
}

/// Outcome of the reminder time calculation: zero or one fire instant per
/// occurrence per user. Channels fan out later, they do not multiply here.
#[derive(Debug, Clone, PartialEq)]
pub enum FirePlan {
    /// Fire at this instant, possibly deferred past quiet hours.
    At(i64),
    /// Quiet-hours deferral would land at or after class start; drop the
    /// reminder and log it as suppressed. Carries the candidate instant the
    /// reminder would have fired at.
    Suppressed { candidate: i64 },
    /// Reminders are switched off for this user; nothing fires, nothing is
    /// logged.
    Disabled,
}

/// Computes when, if ever, a reminder for `occurrence` should fire for a
/// user with the given preferences.
///
/// Quiet-hours containment is evaluated on the candidate instant's local
/// time, not on the occurrence start: the two may fall on different sides
/// of a quiet-hours boundary. A candidate inside quiet hours defers to the
/// window's end on the matching local day; a deferral landing at or after
/// class start suppresses the reminder entirely.
pub fn fire_plan(
    occurrence: &Occurrence,
    prefs: &NotificationPreferences,
    tz: Tz,
) -> FirePlan {
    if !prefs.enabled {
        return FirePlan::Disabled;
    }
    let candidate = occurrence.start_ts - prefs.lead_time_minutes * 60 * 1000;
    let quiet = &prefs.quiet_hours;

    let local = match tz.timestamp_millis_opt(candidate).earliest() {
        Some(local) => local,
        // out of chrono's representable range, quiet hours cannot apply
        None => return FirePlan::At(candidate),
    };
    let time = local.time();
    if !quiet.contains(time) {
        return FirePlan::At(candidate);
    }

    // Defer to the end of the quiet window: same local day unless the
    // window wraps and the candidate sits in its pre-midnight part.
    let date = if quiet.wraps() && time >= quiet.start {
        local.date_naive() + Duration::days(1)
    } else {
        local.date_naive()
    };
    match local_to_instant(date.and_time(quiet.end), tz) {
        Some(deferred) if deferred < occurrence.start_ts => FirePlan::At(deferred),
        _ => FirePlan::Suppressed { candidate },
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::preferences::QuietHours;
    use chrono::{NaiveDate, NaiveTime};
    use chrono_tz::UTC;

    fn hm(hours: u32, minutes: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hours, minutes, 0).unwrap()
    }

    fn instant(day: u32, hours: u32, minutes: u32) -> i64 {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hours, minutes, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis()
    }

    fn occurrence_at(day: u32, hours: u32, minutes: u32) -> Occurrence {
        let start_ts = instant(day, hours, minutes);
        Occurrence {
            class_id: Default::default(),
            start_ts,
            end_ts: start_ts + 60 * 60 * 1000,
        }
    }

    fn prefs_with_quiet(lead: i64, start: NaiveTime, end: NaiveTime) -> NotificationPreferences {
        NotificationPreferences {
            lead_time_minutes: lead,
            quiet_hours: QuietHours {
                enabled: true,
                start,
                end,
            },
            ..Default::default()
        }
    }

    #[test]
    fn task_key_drops_the_fire_instant() {
        let task = ReminderTask {
            class_id: Default::default(),
            occurrence_start: 1000,
            user_id: Default::default(),
            planned_fire_ts: 700,
        };
        let key = task.key();
        assert_eq!(key.class_id, task.class_id);
        assert_eq!(key.occurrence_start, task.occurrence_start);
        assert_eq!(key.user_id, task.user_id);
    }

    #[test]
    fn fires_lead_time_before_class() {
        // Monday 2024-03-04 09:00, lead 15 -> 08:45
        let plan = fire_plan(
            &occurrence_at(4, 9, 0),
            &NotificationPreferences::default(),
            UTC,
        );
        assert_eq!(plan, FirePlan::At(instant(4, 8, 45)));
    }

    #[test]
    fn disabled_preferences_produce_nothing() {
        let prefs = NotificationPreferences {
            enabled: false,
            ..Default::default()
        };
        assert_eq!(fire_plan(&occurrence_at(4, 9, 0), &prefs, UTC), FirePlan::Disabled);
    }

    #[test]
    fn lead_sixty_outside_quiet_hours_is_unaffected() {
        // class Monday 09:00, lead 60 -> candidate 08:00, quiet 22:00-07:00
        let plan = fire_plan(
            &occurrence_at(4, 9, 0),
            &prefs_with_quiet(60, hm(22, 0), hm(7, 0)),
            UTC,
        );
        assert_eq!(plan, FirePlan::At(instant(4, 8, 0)));
    }

    #[test]
    fn candidate_in_quiet_tail_defers_to_window_end_same_day() {
        // class Tuesday 07:30, lead 60 -> candidate 06:30 inside the
        // post-midnight tail of 22:00-07:00, defers to 07:00
        let plan = fire_plan(
            &occurrence_at(5, 7, 30),
            &prefs_with_quiet(60, hm(22, 0), hm(7, 0)),
            UTC,
        );
        assert_eq!(plan, FirePlan::At(instant(5, 7, 0)));
    }

    #[test]
    fn pre_midnight_candidate_defers_to_next_day_or_suppresses() {
        // candidate Monday 23:00: defers to Tuesday 07:00 when the class
        // starts later than that, else suppresses
        let quiet = prefs_with_quiet(600, hm(22, 0), hm(7, 0));
        let plan = fire_plan(&occurrence_at(5, 9, 0), &quiet, UTC);
        assert_eq!(plan, FirePlan::At(instant(5, 7, 0)));

        let plan = fire_plan(
            &occurrence_at(5, 0, 0),
            &prefs_with_quiet(60, hm(22, 0), hm(7, 0)),
            UTC,
        );
        assert_eq!(
            plan,
            FirePlan::Suppressed {
                candidate: instant(4, 23, 0)
            }
        );
    }

    #[test]
    fn deferral_at_class_start_is_suppressed() {
        // class 07:00, lead 30 -> candidate 06:30 inside quiet, deferral
        // 07:00 == class start -> suppressed, reminders after start are
        // worthless
        let plan = fire_plan(
            &occurrence_at(5, 7, 0),
            &prefs_with_quiet(30, hm(22, 0), hm(7, 0)),
            UTC,
        );
        assert_eq!(
            plan,
            FirePlan::Suppressed {
                candidate: instant(5, 6, 30)
            }
        );
    }

    #[test]
    fn boundary_candidates_follow_inclusive_exclusive_convention() {
        // candidate exactly at quiet end 07:00 is outside the window
        let plan = fire_plan(
            &occurrence_at(5, 7, 15),
            &prefs_with_quiet(15, hm(22, 0), hm(7, 0)),
            UTC,
        );
        assert_eq!(plan, FirePlan::At(instant(5, 7, 0)));

        // candidate exactly at quiet start 22:00 is inside the window
        let plan = fire_plan(
            &occurrence_at(5, 22, 15),
            &prefs_with_quiet(15, hm(22, 0), hm(23, 0)),
            UTC,
        );
        assert_eq!(
            plan,
            FirePlan::Suppressed {
                candidate: instant(5, 22, 0)
            }
        );
    }
}
