use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::clock::day_key;
use crate::units::{convert_length, convert_weight, UnitSystem};

/// Body measurements taken alongside a weigh-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub waist: Option<f64>,
    pub chest: Option<f64>,
    pub arms: Option<f64>,
    pub thighs: Option<f64>,
    pub unit: UnitSystem,
}

impl Dimensions {
    pub fn empty(unit: UnitSystem) -> Self {
        Self {
            waist: None,
            chest: None,
            arms: None,
            thighs: None,
            unit,
        }
    }

    pub fn converted_to(&self, unit: UnitSystem) -> Self {
        let convert = |v: Option<f64>| v.map(|v| convert_length(v, self.unit, unit));
        Self {
            waist: convert(self.waist),
            chest: convert(self.chest),
            arms: convert(self.arms),
            thighs: convert(self.thighs),
            unit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLog {
    pub id: Uuid,
    pub date: NaiveDate,
    pub value: f64,
    pub unit: UnitSystem,
    pub dimensions: Dimensions,
}

impl WeightLog {
    pub fn new(value: f64, unit: UnitSystem) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: day_key(Utc::now()),
            value,
            unit,
            dimensions: Dimensions::empty(unit),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Same weigh-in expressed in another unit system, measurements included.
    pub fn converted_to(&self, unit: UnitSystem) -> Self {
        Self {
            id: self.id,
            date: self.date,
            value: convert_weight(self.value, self.unit, unit),
            unit,
            dimensions: self.dimensions.converted_to(unit),
        }
    }
}

impl fmt::Display for WeightLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.value, self.unit.weight_unit())?;
        let d = &self.dimensions;
        let parts: Vec<String> = [
            ("waist", d.waist),
            ("chest", d.chest),
            ("arms", d.arms),
            ("thighs", d.thighs),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| format!("{} {}{}", name, v, d.unit.length_unit())))
        .collect();
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converted_to_imperial_and_back() {
        let log = WeightLog::new(70.0, UnitSystem::Metric).with_dimensions(Dimensions {
            waist: Some(81.0),
            chest: None,
            arms: Some(30.5),
            thighs: None,
            unit: UnitSystem::Metric,
        });

        let imperial = log.converted_to(UnitSystem::Imperial);
        assert_eq!(imperial.id, log.id);
        assert_eq!(imperial.value, 154.3);
        assert_eq!(imperial.unit, UnitSystem::Imperial);
        assert_eq!(imperial.dimensions.waist, Some(31.9));
        assert_eq!(imperial.dimensions.chest, None);

        let back = imperial.converted_to(UnitSystem::Metric);
        assert!((back.value - 70.0).abs() <= 0.1);
        assert!((back.dimensions.waist.unwrap() - 81.0).abs() <= 0.1);
    }

    #[test]
    fn test_same_unit_conversion_is_identity() {
        let log = WeightLog::new(72.4, UnitSystem::Metric);
        assert_eq!(log.converted_to(UnitSystem::Metric), log);
    }

    #[test]
    fn test_weight_display() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut dims = Dimensions::empty(UnitSystem::Metric);
        dims.waist = Some(80.0);
        let log = WeightLog::new(70.5, UnitSystem::Metric)
            .with_date(date)
            .with_dimensions(dims);

        assert_eq!(format!("{}", log), "2024-05-01 70.5 kg (waist 80cm)");
    }
}
