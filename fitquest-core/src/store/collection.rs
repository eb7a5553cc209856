//! A single ordered log collection.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::models::{ActivityLog, FastingLog, FoodLogItem, WaterLogItem, WeightLog};

/// Anything that can live in a [`LogCollection`].
pub trait LogRecord {
    fn id(&self) -> Uuid;
    fn date(&self) -> NaiveDate;
}

macro_rules! impl_log_record {
    ($($ty:ty),* $(,)?) => {
        $(
            impl LogRecord for $ty {
                fn id(&self) -> Uuid {
                    self.id
                }

                fn date(&self) -> NaiveDate {
                    self.date
                }
            }
        )*
    };
}

impl_log_record!(ActivityLog, FoodLogItem, WaterLogItem, FastingLog, WeightLog);

/// Entries of one category, most recent first.
///
/// Lookups by id that match nothing are no-ops: `update`, `replace` and
/// `remove` report the miss through their return value and never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogCollection<T> {
    entries: Vec<T>,
}

impl<T> Default for LogCollection<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: LogRecord> LogCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps entries that are already in display order.
    pub fn from_entries(entries: Vec<T>) -> Self {
        Self { entries }
    }

    pub fn add(&mut self, entry: T) {
        self.entries.insert(0, entry);
    }

    /// Applies `patch` to the entry with `id`. Returns false when nothing
    /// matched. The patch must leave the id alone.
    pub fn update<F>(&mut self, id: Uuid, patch: F) -> bool
    where
        F: FnOnce(&mut T),
    {
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(entry) => {
                patch(entry);
                true
            }
            None => false,
        }
    }

    /// Swaps in `entry` for the stored entry with the same id.
    pub fn replace(&mut self, entry: T) -> bool {
        let id = entry.id();
        match self.entries.iter_mut().find(|e| e.id() == id) {
            Some(slot) => {
                *slot = entry;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Option<T> {
        let index = self.entries.iter().position(|e| e.id() == id)?;
        Some(self.entries.remove(index))
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.get(id).is_some()
    }

    pub fn filter_by_date(&self, day: NaiveDate) -> Vec<&T> {
        self.entries.iter().filter(|e| e.date() == day).collect()
    }

    /// Entries dated within `start..=end`. An inverted range is empty.
    pub fn filter_by_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<&T> {
        self.entries
            .iter()
            .filter(|e| (start..=end).contains(&e.date()))
            .collect()
    }

    /// Distinct days that have at least one entry.
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.entries.iter().map(|e| e.date()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a LogCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn water(amount: u32, d: u32) -> WaterLogItem {
        WaterLogItem::new(amount).with_date(day(d))
    }

    #[test]
    fn test_add_puts_newest_first() {
        let mut logs = LogCollection::new();
        let first = water(250, 1);
        let second = water(500, 1);
        logs.add(first.clone());
        logs.add(second.clone());

        let order: Vec<Uuid> = logs.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![second.id, first.id]);
    }

    #[test]
    fn test_filter_by_date_contains_added_entry() {
        let mut logs = LogCollection::new();
        for d in 1..=5 {
            let entry = water(100 * d, d);
            logs.add(entry.clone());
            assert!(logs.filter_by_date(entry.date).contains(&&entry));
        }
    }

    #[test]
    fn test_filter_by_date_is_side_effect_free() {
        let mut logs = LogCollection::new();
        logs.add(water(250, 1));
        logs.add(water(300, 2));
        let before = logs.clone();

        let first = logs.filter_by_date(day(1)).len();
        let second = logs.filter_by_date(day(1)).len();
        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert_eq!(logs, before);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut logs = LogCollection::new();
        logs.add(water(250, 1));
        let before = logs.clone();

        let matched = logs.update(Uuid::new_v4(), |e| e.amount = 999);
        assert!(!matched);
        assert_eq!(logs, before);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut logs = LogCollection::new();
        logs.add(water(250, 1));
        let before = logs.clone();

        assert!(logs.remove(Uuid::new_v4()).is_none());
        assert_eq!(logs, before);
    }

    #[test]
    fn test_update_and_remove_by_id() {
        let mut logs = LogCollection::new();
        let entry = water(250, 1);
        logs.add(entry.clone());
        logs.add(water(400, 1));

        assert!(logs.update(entry.id, |e| e.amount = 330));
        assert_eq!(logs.get(entry.id).unwrap().amount, 330);

        let removed = logs.remove(entry.id).unwrap();
        assert_eq!(removed.amount, 330);
        assert_eq!(logs.len(), 1);
        assert!(!logs.contains(entry.id));
    }

    #[test]
    fn test_replace_by_id() {
        let mut logs = LogCollection::new();
        let entry = water(250, 1);
        logs.add(entry.clone());

        let mut edited = entry.clone();
        edited.amount = 750;
        assert!(logs.replace(edited));
        assert_eq!(logs.get(entry.id).unwrap().amount, 750);

        assert!(!logs.replace(water(1, 1)));
        assert_eq!(logs.len(), 1);
    }

    #[test]
    fn test_filter_by_range_is_inclusive() {
        let mut logs = LogCollection::new();
        for d in 1..=6 {
            logs.add(water(100, d));
        }

        assert_eq!(logs.filter_by_range(day(2), day(4)).len(), 3);
        assert_eq!(logs.filter_by_range(day(6), day(6)).len(), 1);
        assert!(logs.filter_by_range(day(4), day(2)).is_empty());
    }

    #[test]
    fn test_dates_are_distinct() {
        let mut logs = LogCollection::new();
        logs.add(water(100, 1));
        logs.add(water(100, 1));
        logs.add(water(100, 3));

        let dates: Vec<NaiveDate> = logs.dates().into_iter().collect();
        assert_eq!(dates, vec![day(1), day(3)]);
    }
}
