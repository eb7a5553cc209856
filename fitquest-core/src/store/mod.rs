//! The daily-log store: single owner of every log collection for a session.

mod collection;

pub use collection::{LogCollection, LogRecord};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::models::{
    ActivityKind, ActivityLog, FastingLog, FoodLogItem, WaterLogItem, WeightLog,
};
use crate::units::UnitSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Workout,
    Meditation,
    Food,
    Water,
    Fasting,
    Weight,
}

impl LogCategory {
    pub const ALL: [LogCategory; 6] = [
        LogCategory::Workout,
        LogCategory::Meditation,
        LogCategory::Food,
        LogCategory::Water,
        LogCategory::Fasting,
        LogCategory::Weight,
    ];
}

impl From<ActivityKind> for LogCategory {
    fn from(kind: ActivityKind) -> Self {
        match kind {
            ActivityKind::Workout => LogCategory::Workout,
            ActivityKind::Meditation => LogCategory::Meditation,
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogCategory::Workout => "workout",
            LogCategory::Meditation => "meditation",
            LogCategory::Food => "food",
            LogCategory::Water => "water",
            LogCategory::Fasting => "fasting",
            LogCategory::Weight => "weight",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogCategory::ALL
            .into_iter()
            .find(|c| c.to_string() == s.to_lowercase())
            .ok_or_else(|| {
                format!(
                    "Invalid log category '{}'. Valid options: workout, meditation, food, water, fasting, weight",
                    s
                )
            })
    }
}

/// Holds one collection per log category.
///
/// Each category has a read accessor and a `_mut` accessor; there are no
/// setters that replace a whole collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLogStore {
    workouts: LogCollection<ActivityLog>,
    meditations: LogCollection<ActivityLog>,
    food: LogCollection<FoodLogItem>,
    water: LogCollection<WaterLogItem>,
    fasting: LogCollection<FastingLog>,
    weight: LogCollection<WeightLog>,
}

impl DailyLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activities(&self, kind: ActivityKind) -> &LogCollection<ActivityLog> {
        match kind {
            ActivityKind::Workout => &self.workouts,
            ActivityKind::Meditation => &self.meditations,
        }
    }

    pub fn activities_mut(&mut self, kind: ActivityKind) -> &mut LogCollection<ActivityLog> {
        match kind {
            ActivityKind::Workout => &mut self.workouts,
            ActivityKind::Meditation => &mut self.meditations,
        }
    }

    /// Files an activity under the collection matching its kind.
    pub fn add_activity(&mut self, log: ActivityLog) {
        self.activities_mut(log.kind).add(log);
    }

    pub fn food(&self) -> &LogCollection<FoodLogItem> {
        &self.food
    }

    pub fn food_mut(&mut self) -> &mut LogCollection<FoodLogItem> {
        &mut self.food
    }

    pub fn water(&self) -> &LogCollection<WaterLogItem> {
        &self.water
    }

    pub fn water_mut(&mut self) -> &mut LogCollection<WaterLogItem> {
        &mut self.water
    }

    pub fn fasting(&self) -> &LogCollection<FastingLog> {
        &self.fasting
    }

    pub fn fasting_mut(&mut self) -> &mut LogCollection<FastingLog> {
        &mut self.fasting
    }

    pub fn weight(&self) -> &LogCollection<WeightLog> {
        &self.weight
    }

    pub fn weight_mut(&mut self) -> &mut LogCollection<WeightLog> {
        &mut self.weight
    }

    /// Removes the entry with `id` from `category`. No-op when absent.
    pub fn remove(&mut self, category: LogCategory, id: Uuid) -> bool {
        match category {
            LogCategory::Workout => self.workouts.remove(id).is_some(),
            LogCategory::Meditation => self.meditations.remove(id).is_some(),
            LogCategory::Food => self.food.remove(id).is_some(),
            LogCategory::Water => self.water.remove(id).is_some(),
            LogCategory::Fasting => self.fasting.remove(id).is_some(),
            LogCategory::Weight => self.weight.remove(id).is_some(),
        }
    }

    pub fn contains(&self, category: LogCategory, id: Uuid) -> bool {
        match category {
            LogCategory::Workout => self.workouts.contains(id),
            LogCategory::Meditation => self.meditations.contains(id),
            LogCategory::Food => self.food.contains(id),
            LogCategory::Water => self.water.contains(id),
            LogCategory::Fasting => self.fasting.contains(id),
            LogCategory::Weight => self.weight.contains(id),
        }
    }

    /// Finds which category holds `id`, if any.
    pub fn category_of(&self, id: Uuid) -> Option<LogCategory> {
        LogCategory::ALL
            .into_iter()
            .find(|c| self.contains(*c, id))
    }

    pub fn len(&self, category: LogCategory) -> usize {
        match category {
            LogCategory::Workout => self.workouts.len(),
            LogCategory::Meditation => self.meditations.len(),
            LogCategory::Food => self.food.len(),
            LogCategory::Water => self.water.len(),
            LogCategory::Fasting => self.fasting.len(),
            LogCategory::Weight => self.weight.len(),
        }
    }

    /// Every day with at least one entry in any category.
    pub fn active_days(&self) -> BTreeSet<NaiveDate> {
        let mut days = self.workouts.dates();
        days.extend(self.meditations.dates());
        days.extend(self.food.dates());
        days.extend(self.water.dates());
        days.extend(self.fasting.dates());
        days.extend(self.weight.dates());
        days
    }

    /// Rewrites every weigh-in in the given unit system.
    pub fn convert_weights(&mut self, units: UnitSystem) {
        let converted: Vec<WeightLog> = self
            .weight
            .iter()
            .map(|w| w.converted_to(units))
            .collect();
        self.weight = LogCollection::from_entries(converted);
    }

    /// All categories filtered to one day.
    pub fn day_snapshot(&self, day: NaiveDate) -> DaySnapshot<'_> {
        DaySnapshot {
            day,
            workouts: self.workouts.filter_by_date(day),
            meditations: self.meditations.filter_by_date(day),
            food: self.food.filter_by_date(day),
            water: self.water.filter_by_date(day),
            fasting: self.fasting.filter_by_date(day),
            weight: self.weight.filter_by_date(day),
        }
    }
}

/// A read-only view of one day's logs.
#[derive(Debug, Clone)]
pub struct DaySnapshot<'a> {
    pub day: NaiveDate,
    pub workouts: Vec<&'a ActivityLog>,
    pub meditations: Vec<&'a ActivityLog>,
    pub food: Vec<&'a FoodLogItem>,
    pub water: Vec<&'a WaterLogItem>,
    pub fasting: Vec<&'a FastingLog>,
    pub weight: Vec<&'a WeightLog>,
}

impl DaySnapshot<'_> {
    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
            && self.meditations.is_empty()
            && self.food.is_empty()
            && self.water.is_empty()
            && self.fasting.is_empty()
            && self.weight.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Macros;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_switching_selected_date_has_no_stale_entries() {
        let mut store = DailyLogStore::new();
        let first = FoodLogItem::new("Eggs", 150)
            .with_macros(Macros::new(12.0, 1.0, 10.0))
            .with_date(day(1));
        let second = FoodLogItem::new("Toast", 120).with_date(day(2));
        store.food_mut().add(first.clone());
        store.food_mut().add(second.clone());

        let selected = store.food().filter_by_date(day(1));
        assert_eq!(selected, vec![&first]);

        let selected = store.food().filter_by_date(day(2));
        assert_eq!(selected, vec![&second]);
    }

    #[test]
    fn test_add_activity_routes_by_kind() {
        let mut store = DailyLogStore::new();
        store.add_activity(ActivityLog::new(ActivityKind::Workout, "Run", "30:00"));
        store.add_activity(ActivityLog::new(ActivityKind::Meditation, "Calm", "10:00"));
        store.add_activity(ActivityLog::new(ActivityKind::Meditation, "Focus", "05:00"));

        assert_eq!(store.len(LogCategory::Workout), 1);
        assert_eq!(store.len(LogCategory::Meditation), 2);
        assert_eq!(
            store.activities(ActivityKind::Meditation).iter().next().unwrap().title,
            "Focus"
        );
    }

    #[test]
    fn test_remove_by_category() {
        let mut store = DailyLogStore::new();
        let glass = WaterLogItem::new(250);
        store.water_mut().add(glass.clone());

        assert_eq!(store.category_of(glass.id), Some(LogCategory::Water));
        assert!(!store.remove(LogCategory::Food, glass.id));
        assert!(store.remove(LogCategory::Water, glass.id));
        assert!(!store.remove(LogCategory::Water, glass.id));
        assert_eq!(store.category_of(glass.id), None);
    }

    #[test]
    fn test_remove_unknown_id_leaves_store_unchanged() {
        let mut store = DailyLogStore::new();
        store.water_mut().add(WaterLogItem::new(250));
        store.food_mut().add(FoodLogItem::new("Rice", 200));
        let before = store.clone();

        for category in LogCategory::ALL {
            assert!(!store.remove(category, Uuid::new_v4()));
        }
        assert_eq!(store, before);
    }

    #[test]
    fn test_day_snapshot() {
        let mut store = DailyLogStore::new();
        store.water_mut().add(WaterLogItem::new(250).with_date(day(1)));
        store.water_mut().add(WaterLogItem::new(500).with_date(day(2)));
        store.add_activity(
            ActivityLog::new(ActivityKind::Workout, "Swim", "40:00").with_date(day(2)),
        );

        let snapshot = store.day_snapshot(day(2));
        assert_eq!(snapshot.water.len(), 1);
        assert_eq!(snapshot.water[0].amount, 500);
        assert_eq!(snapshot.workouts.len(), 1);
        assert!(snapshot.food.is_empty());

        assert!(store.day_snapshot(day(9)).is_empty());
    }

    #[test]
    fn test_active_days_spans_categories() {
        let mut store = DailyLogStore::new();
        store.water_mut().add(WaterLogItem::new(250).with_date(day(1)));
        store.food_mut().add(FoodLogItem::new("Soup", 180).with_date(day(3)));
        store
            .weight_mut()
            .add(WeightLog::new(70.0, UnitSystem::Metric).with_date(day(3)));

        let days: Vec<NaiveDate> = store.active_days().into_iter().collect();
        assert_eq!(days, vec![day(1), day(3)]);
    }

    #[test]
    fn test_convert_weights() {
        let mut store = DailyLogStore::new();
        let log = WeightLog::new(70.0, UnitSystem::Metric);
        store.weight_mut().add(log.clone());

        store.convert_weights(UnitSystem::Imperial);
        let converted = store.weight().get(log.id).unwrap();
        assert_eq!(converted.unit, UnitSystem::Imperial);
        assert_eq!(converted.value, 154.3);
    }

    #[test]
    fn test_log_category_from_str() {
        assert_eq!("Water".parse::<LogCategory>().unwrap(), LogCategory::Water);
        assert!("sleep".parse::<LogCategory>().is_err());
    }
}
