use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::FastingLog;
use crate::stats::{elapsed_fast_duration, FastDuration};
use crate::store::DailyLogStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FastingError {
    #[error("a fast is already running (started {0})")]
    ConflictingSession(DateTime<Utc>),
}

/// At most one fast runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum FastingSession {
    #[default]
    Inactive,
    Active { start_time: DateTime<Utc> },
}

impl FastingSession {
    /// Restores a session from a persisted start time.
    pub fn from_start(start_time: Option<DateTime<Utc>>) -> Self {
        match start_time {
            Some(start_time) => FastingSession::Active { start_time },
            None => FastingSession::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, FastingSession::Active { .. })
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        match self {
            FastingSession::Active { start_time } => Some(*start_time),
            FastingSession::Inactive => None,
        }
    }

    /// Begins a fast at `now`. A second start while one is running is
    /// rejected and leaves the running fast untouched.
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), FastingError> {
        match self {
            FastingSession::Active { start_time } => {
                Err(FastingError::ConflictingSession(*start_time))
            }
            FastingSession::Inactive => {
                *self = FastingSession::Active { start_time: now };
                Ok(())
            }
        }
    }

    /// Ends the fast at `now`, appending its log to `store`. Stopping when no
    /// fast is running does nothing and returns `None`.
    pub fn stop(&mut self, now: DateTime<Utc>, store: &mut DailyLogStore) -> Option<FastingLog> {
        let start_time = self.start_time()?;
        let log = FastingLog::completed(start_time, now);
        store.fasting_mut().add(log.clone());
        *self = FastingSession::Inactive;
        Some(log)
    }

    /// Elapsed time so far, only while active.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<FastDuration> {
        self.start_time()
            .map(|start_time| elapsed_fast_duration(start_time, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap()
    }

    #[test]
    fn test_start_then_stop_appends_log() {
        let mut store = DailyLogStore::new();
        let mut session = FastingSession::default();

        session.start(t0()).unwrap();
        assert!(session.is_active());

        let end = t0() + chrono::Duration::minutes(90);
        assert_eq!(
            session.elapsed(end).unwrap(),
            FastDuration::from_seconds(5400)
        );

        let log = session.stop(end, &mut store).unwrap();
        assert_eq!(log.duration, "1h 30m");
        assert!(!session.is_active());
        assert_eq!(session.elapsed(end), None);
        assert_eq!(store.fasting().len(), 1);
        assert_eq!(store.fasting().get(log.id), Some(&log));
    }

    #[test]
    fn test_second_start_is_rejected() {
        let mut session = FastingSession::default();
        session.start(t0()).unwrap();

        let later = t0() + chrono::Duration::hours(2);
        assert_eq!(
            session.start(later),
            Err(FastingError::ConflictingSession(t0()))
        );
        assert_eq!(session.start_time(), Some(t0()));
    }

    #[test]
    fn test_stop_when_inactive_is_noop() {
        let mut store = DailyLogStore::new();
        let mut session = FastingSession::Inactive;

        assert!(session.stop(t0(), &mut store).is_none());
        assert!(store.fasting().is_empty());
    }

    #[test]
    fn test_restarts_cleanly_after_stop() {
        let mut store = DailyLogStore::new();
        let mut session = FastingSession::default();
        session.start(t0()).unwrap();
        session.stop(t0() + chrono::Duration::hours(1), &mut store);

        let next = t0() + chrono::Duration::hours(3);
        session.start(next).unwrap();
        assert_eq!(session.start_time(), Some(next));
    }

    #[test]
    fn test_from_start() {
        assert_eq!(FastingSession::from_start(None), FastingSession::Inactive);
        assert_eq!(
            FastingSession::from_start(Some(t0())).start_time(),
            Some(t0())
        );
    }
}
