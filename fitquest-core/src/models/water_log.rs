use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::clock::{day_key, time_label};

/// A glass of water, in millilitres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterLogItem {
    pub id: Uuid,
    pub amount: u32,
    pub timestamp: String,
    pub date: NaiveDate,
}

impl WaterLogItem {
    pub fn new(amount: u32) -> Self {
        Self::recorded_at(amount, Utc::now())
    }

    pub fn recorded_at(amount: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            timestamp: time_label(at),
            date: day_key(at),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }
}

impl fmt::Display for WaterLogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ml", self.date, self.timestamp, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_log_display() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut item = WaterLogItem::new(250).with_date(date);
        item.timestamp = "09:15".to_string();

        assert_eq!(format!("{}", item), "2024-05-01 09:15 250 ml");
    }
}
