use chrono::{Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Resolves an institution-local wall-clock time to an epoch millisecond
/// instant. Ambiguous times (DST fold) resolve to the earlier instant; a
/// time inside a DST gap is shifted forward one hour, past the gap.
pub fn local_to_instant(local: NaiveDateTime, tz: Tz) -> Option<i64> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.timestamp_millis()),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.timestamp_millis()),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.timestamp_millis()),
    }
}
