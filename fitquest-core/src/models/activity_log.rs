use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::clock::{day_key, time_label};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Workout,
    Meditation,
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityKind::Workout => write!(f, "workout"),
            ActivityKind::Meditation => write!(f, "meditation"),
        }
    }
}

impl FromStr for ActivityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "workout" => Ok(ActivityKind::Workout),
            "meditation" => Ok(ActivityKind::Meditation),
            _ => Err(format!(
                "Invalid activity kind '{}'. Valid options: workout, meditation",
                s
            )),
        }
    }
}

/// One completed workout or meditation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub kind: ActivityKind,
    pub title: String,
    pub icon: String,
    /// Session length as `MM:SS`.
    pub duration: String,
    pub timestamp: String,
    pub date: NaiveDate,
    pub calories: Option<u32>,
    pub color: Option<String>,
}

impl ActivityLog {
    pub fn new(kind: ActivityKind, title: impl Into<String>, duration: impl Into<String>) -> Self {
        Self::recorded_at(kind, title, duration, Utc::now())
    }

    /// Builds a log filed under the day and time of `at`.
    pub fn recorded_at(
        kind: ActivityKind,
        title: impl Into<String>,
        duration: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let icon = match kind {
            ActivityKind::Workout => "dumbbell",
            ActivityKind::Meditation => "lotus",
        };
        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.into(),
            icon: icon.to_string(),
            duration: duration.into(),
            timestamp: time_label(at),
            date: day_key(at),
            calories: None,
            color: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_calories(mut self, calories: u32) -> Self {
        self.calories = Some(calories);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

impl fmt::Display for ActivityLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}] {} ({})",
            self.date, self.timestamp, self.kind, self.title, self.duration
        )?;
        if let Some(calories) = self.calories {
            write!(f, " - {} kcal", calories)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_activity_kind_from_str() {
        assert_eq!(
            ActivityKind::from_str("Workout").unwrap(),
            ActivityKind::Workout
        );
        assert_eq!(
            ActivityKind::from_str("MEDITATION").unwrap(),
            ActivityKind::Meditation
        );
        assert!(ActivityKind::from_str("yoga").is_err());
    }

    #[test]
    fn test_recorded_at_files_under_day_of_creation() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let log = ActivityLog::recorded_at(ActivityKind::Workout, "Leg Day", "45:00", at);

        assert_eq!(log.date, day_key(at));
        assert_eq!(log.icon, "dumbbell");
        assert!(log.calories.is_none());
    }

    #[test]
    fn test_activity_display() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let log = ActivityLog::new(ActivityKind::Meditation, "Breathing", "10:00")
            .with_date(date)
            .with_calories(15);

        let output = format!("{}", log);
        assert!(output.contains("2024-05-01"));
        assert!(output.contains("[meditation] Breathing (10:00)"));
        assert!(output.contains("15 kcal"));
    }

    #[test]
    fn test_activity_kind_wire_name() {
        let json = serde_json::to_string(&ActivityKind::Meditation).unwrap();
        assert_eq!(json, "\"meditation\"");
    }
}
