use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Add;
use uuid::Uuid;

use crate::clock::{day_key, time_label};

/// Macronutrients in grams.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl Macros {
    pub fn new(protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            protein,
            carbs,
            fat,
        }
    }
}

impl Add for Macros {
    type Output = Macros;

    fn add(self, rhs: Macros) -> Macros {
        Macros {
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl fmt::Display for Macros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Protein: {:.0}g | Carbs: {:.0}g | Fat: {:.0}g",
            self.protein, self.carbs, self.fat
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodLogItem {
    pub id: Uuid,
    pub name: String,
    pub calories: u32,
    pub macros: Macros,
    pub micros: Option<BTreeMap<String, f64>>,
    pub icon: String,
    pub timestamp: String,
    pub date: NaiveDate,
    /// Portion as the user typed it, e.g. `"1 cup"`.
    pub display_amount: Option<String>,
    pub category: Option<String>,
    pub feedback: Option<String>,
    pub zpd_status: Option<String>,
}

impl FoodLogItem {
    pub fn new(name: impl Into<String>, calories: u32) -> Self {
        Self::recorded_at(name, calories, Utc::now())
    }

    pub fn recorded_at(name: impl Into<String>, calories: u32, at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            calories,
            macros: Macros::default(),
            micros: None,
            icon: "utensils".to_string(),
            timestamp: time_label(at),
            date: day_key(at),
            display_amount: None,
            category: None,
            feedback: None,
            zpd_status: None,
        }
    }

    pub fn with_macros(mut self, macros: Macros) -> Self {
        self.macros = macros;
        self
    }

    pub fn with_micros(mut self, micros: BTreeMap<String, f64>) -> Self {
        self.micros = Some(micros);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_display_amount(mut self, amount: impl Into<String>) -> Self {
        self.display_amount = Some(amount.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }
}

impl fmt::Display for FoodLogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.timestamp, self.name)?;
        if let Some(amount) = &self.display_amount {
            write!(f, " ({})", amount)?;
        }
        write!(f, " - {} kcal", self.calories)?;
        writeln!(f)?;
        write!(f, "    {}", self.macros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_log_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let item = FoodLogItem::new("Oatmeal", 300)
            .with_macros(Macros::new(10.0, 54.0, 5.0))
            .with_display_amount("1 bowl")
            .with_date(date);

        assert_eq!(item.calories, 300);
        assert_eq!(item.macros.carbs, 54.0);
        assert_eq!(item.date, date);
        assert_eq!(item.display_amount.as_deref(), Some("1 bowl"));
        assert!(item.micros.is_none());
    }

    #[test]
    fn test_macros_add() {
        let total = Macros::new(10.0, 20.0, 5.0) + Macros::new(2.5, 0.0, 1.0);
        assert_eq!(total, Macros::new(12.5, 20.0, 6.0));
    }

    #[test]
    fn test_macros_missing_fields_default_to_zero() {
        let macros: Macros = serde_json::from_str(r#"{"protein": 12}"#).unwrap();
        assert_eq!(macros, Macros::new(12.0, 0.0, 0.0));
    }

    #[test]
    fn test_food_display() {
        let item = FoodLogItem::new("Apple", 95)
            .with_macros(Macros::new(0.5, 25.0, 0.3))
            .with_display_amount("1 medium");

        let output = format!("{}", item);
        assert!(output.contains("Apple (1 medium) - 95 kcal"));
        assert!(output.contains("Carbs: 25g"));
    }
}
