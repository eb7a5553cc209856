//! Derived statistics: pure, total functions over a day's logs.
//!
//! Nothing here mutates the store, and nothing here fails. Empty inputs give
//! zero aggregates; non-positive targets give zero percentages; unparseable
//! biometrics give a zero BMI. Results are never NaN or negative.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ActivityLog, FoodLogItem, Macros, UserStats, WaterLogItem};
use crate::store::DaySnapshot;
use crate::units::{height_in_meters, round1, weight_in_kg, UnitSystem};

/// Elapsed wall-clock time in whole hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FastDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl FastDuration {
    pub const ZERO: FastDuration = FastDuration {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// The label stored on a finished fast, e.g. `"1h 30m"`.
    pub fn log_label(&self) -> String {
        format!("{}h {}m", self.hours, self.minutes)
    }
}

/// Ticking display form, `HH:MM:SS`.
impl fmt::Display for FastDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

pub fn total_calories<'a>(food: impl IntoIterator<Item = &'a FoodLogItem>) -> u32 {
    food.into_iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.calories))
}

pub fn macro_totals<'a>(food: impl IntoIterator<Item = &'a FoodLogItem>) -> Macros {
    food.into_iter()
        .fold(Macros::default(), |acc, item| acc + item.macros)
}

pub fn remaining_calories(target: u32, consumed: u32) -> u32 {
    target.saturating_sub(consumed)
}

/// `consumed / target` as a percentage clamped to `0..=100`.
pub fn progress_percent(consumed: f64, target: f64) -> f64 {
    if target.is_nan() || target <= 0.0 || !consumed.is_finite() || consumed <= 0.0 {
        return 0.0;
    }
    (100.0 * consumed / target).min(100.0)
}

pub fn total_water_ml<'a>(water: impl IntoIterator<Item = &'a WaterLogItem>) -> u32 {
    water
        .into_iter()
        .fold(0u32, |acc, item| acc.saturating_add(item.amount))
}

pub fn hydration_percent(total_ml: u32, target_ml: u32) -> f64 {
    progress_percent(total_ml as f64, target_ml as f64)
}

/// Time between `start` and `now`; zero if `now` is earlier.
pub fn elapsed_fast_duration(start: DateTime<Utc>, now: DateTime<Utc>) -> FastDuration {
    let seconds = (now - start).num_seconds().max(0) as u64;
    FastDuration::from_seconds(seconds)
}

pub fn fasting_goal_percent(elapsed_seconds: u64, goal_hours: u32) -> f64 {
    progress_percent(elapsed_seconds as f64, goal_hours as f64 * 3600.0)
}

/// Body-mass index from the profile's weight and height text.
///
/// Imperial weights are pounds; heights follow [`height_in_meters`]. Rounded
/// to one decimal place; zero when either input is missing or invalid.
pub fn bmi(weight: &str, height: &str, units: UnitSystem) -> f64 {
    let kg = weight_in_kg(weight, units);
    let meters = height_in_meters(height, units);
    if kg <= 0.0 || meters <= 0.0 {
        return 0.0;
    }
    round1(kg / (meters * meters))
}

/// Parses an `MM:SS` (or `HH:MM:SS`) duration to seconds. Anything else is 0.
pub fn parse_mm_ss(duration: &str) -> u64 {
    let parts: Vec<&str> = duration.trim().split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return 0;
    }
    let mut total = 0u64;
    for part in parts {
        let Ok(n) = part.trim().parse::<u64>() else {
            return 0;
        };
        match total.checked_mul(60).and_then(|t| t.checked_add(n)) {
            Some(t) => total = t,
            None => return 0,
        }
    }
    total
}

pub fn total_active_calories<'a>(activities: impl IntoIterator<Item = &'a ActivityLog>) -> u32 {
    activities
        .into_iter()
        .filter_map(|a| a.calories)
        .fold(0u32, |acc, c| acc.saturating_add(c))
}

/// Whole minutes across all sessions.
pub fn total_active_minutes<'a>(activities: impl IntoIterator<Item = &'a ActivityLog>) -> u64 {
    let seconds = activities
        .into_iter()
        .map(|a| parse_mm_ss(&a.duration))
        .fold(0u64, |acc, s| acc.saturating_add(s));
    seconds / 60
}

/// Every display aggregate for one day, computed fresh from a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub calories_consumed: u32,
    pub calorie_target: u32,
    pub calories_remaining: u32,
    pub calorie_progress: f64,
    pub macros: Macros,
    pub water_ml: u32,
    pub water_target_ml: u32,
    pub hydration_percent: f64,
    pub workout_minutes: u64,
    pub meditation_minutes: u64,
    pub active_calories: u32,
    pub fasts_completed: usize,
    pub fast_elapsed: Option<FastDuration>,
    pub fast_goal_percent: f64,
    pub bmi: f64,
}

impl DailySummary {
    /// `fast_elapsed` is the running fast, if any; pass `None` when inactive.
    pub fn compute(
        snapshot: &DaySnapshot<'_>,
        profile: &UserStats,
        fast_elapsed: Option<FastDuration>,
    ) -> Self {
        let calories_consumed = total_calories(snapshot.food.iter().copied());
        let water_ml = total_water_ml(snapshot.water.iter().copied());
        let fast_goal_percent = fast_elapsed
            .map(|d| fasting_goal_percent(d.total_seconds(), profile.fasting_plan_hours))
            .unwrap_or(0.0);

        Self {
            date: snapshot.day,
            calories_consumed,
            calorie_target: profile.calorie_target,
            calories_remaining: remaining_calories(profile.calorie_target, calories_consumed),
            calorie_progress: progress_percent(
                calories_consumed as f64,
                profile.calorie_target as f64,
            ),
            macros: macro_totals(snapshot.food.iter().copied()),
            water_ml,
            water_target_ml: profile.water_target_ml,
            hydration_percent: hydration_percent(water_ml, profile.water_target_ml),
            workout_minutes: total_active_minutes(snapshot.workouts.iter().copied()),
            meditation_minutes: total_active_minutes(snapshot.meditations.iter().copied()),
            active_calories: total_active_calories(
                snapshot
                    .workouts
                    .iter()
                    .chain(snapshot.meditations.iter())
                    .copied(),
            ),
            fasts_completed: snapshot.fasting.len(),
            fast_elapsed,
            fast_goal_percent,
            bmi: bmi(&profile.weight, &profile.height, profile.units),
        }
    }
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary for {}", self.date)?;
        writeln!(f, "{}", "-".repeat(60))?;
        writeln!(
            f,
            "Calories:  {} / {} kcal ({:.0}%), {} remaining",
            self.calories_consumed,
            self.calorie_target,
            self.calorie_progress,
            self.calories_remaining
        )?;
        writeln!(f, "Macros:    {}", self.macros)?;
        writeln!(
            f,
            "Water:     {} / {} ml ({:.0}%)",
            self.water_ml, self.water_target_ml, self.hydration_percent
        )?;
        writeln!(
            f,
            "Activity:  {} min workout, {} min meditation, {} kcal burned",
            self.workout_minutes, self.meditation_minutes, self.active_calories
        )?;
        match self.fast_elapsed {
            Some(elapsed) => writeln!(
                f,
                "Fasting:   {} elapsed ({:.0}% of goal)",
                elapsed, self.fast_goal_percent
            )?,
            None => writeln!(f, "Fasting:   not fasting ({} completed)", self.fasts_completed)?,
        }
        if self.bmi > 0.0 {
            write!(f, "BMI:       {:.1}", self.bmi)?;
        } else {
            write!(f, "BMI:       set height and weight in your profile")?;
        }
        Ok(())
    }
}
