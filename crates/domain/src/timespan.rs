use thiserror::Error;

/// A half-open interval `[start_ts, end_ts)` of epoch millisecond instants.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSpan {
    start_ts: i64,
    end_ts: i64,
}

#[derive(Error, Debug)]
pub enum InvalidTimeSpanError {
    #[error("Timespan end: {1} must be greater than start: {0}")]
    EndNotAfterStart(i64, i64),
}

impl TimeSpan {
    pub fn new(start_ts: i64, end_ts: i64) -> Result<Self, InvalidTimeSpanError> {
        if end_ts <= start_ts {
            return Err(InvalidTimeSpanError::EndNotAfterStart(start_ts, end_ts));
        }
        Ok(Self { start_ts, end_ts })
    }

    pub fn start(&self) -> i64 {
        self.start_ts
    }

    pub fn end(&self) -> i64 {
        self.end_ts
    }

    pub fn duration(&self) -> i64 {
        self.end_ts - self.start_ts
    }

    pub fn contains(&self, ts: i64) -> bool {
        self.start_ts <= ts && ts < self.end_ts
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_empty_or_inverted_span() {
        assert!(TimeSpan::new(10, 10).is_err());
        assert!(TimeSpan::new(10, 5).is_err());
    }

    #[test]
    fn half_open_containment() {
        let span = TimeSpan::new(0, 100).unwrap();
        assert!(span.contains(0));
        assert!(span.contains(99));
        assert!(!span.contains(100));
        assert!(!span.contains(-1));
    }
}
