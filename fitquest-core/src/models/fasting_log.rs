use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::clock::day_key;
use crate::stats::elapsed_fast_duration;

/// A finished fast. Only ever built from a session's start and stop instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FastingLog {
    pub id: Uuid,
    /// Elapsed time as `"{h}h {m}m"`.
    pub duration: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub date: NaiveDate,
}

impl FastingLog {
    pub fn completed(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            duration: elapsed_fast_duration(start_time, end_time).log_label(),
            start_time,
            end_time,
            date: day_key(end_time),
        }
    }

    /// Whole seconds fasted, never negative.
    pub fn elapsed_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds().max(0)
    }
}

impl fmt::Display for FastingLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} - {})",
            self.date,
            self.duration,
            self.start_time.format("%Y-%m-%d %H:%M"),
            self.end_time.format("%Y-%m-%d %H:%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_completed_fast_duration_label() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 2, 12, 15, 30).unwrap();
        let log = FastingLog::completed(start, end);

        assert_eq!(log.duration, "16h 15m");
        assert_eq!(log.elapsed_seconds(), 16 * 3600 + 15 * 60 + 30);
        assert_eq!(log.date, day_key(end));
    }

    #[test]
    fn test_end_before_start_clamps_to_zero() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let log = FastingLog::completed(start, start - chrono::Duration::hours(1));

        assert_eq!(log.duration, "0h 0m");
        assert_eq!(log.elapsed_seconds(), 0);
    }
}
