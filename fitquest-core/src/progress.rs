//! Character progression (XP and levels) and achievements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{ActivityKind, UserStats};
use crate::stats::{total_calories, total_water_ml};
use crate::store::{DailyLogStore, LogCategory};

pub const STARTING_MAX_XP: u32 = 100;

/// XP granted for logging one entry of a category.
pub fn xp_reward(category: LogCategory) -> u32 {
    match category {
        LogCategory::Workout => 50,
        LogCategory::Meditation => 30,
        LogCategory::Food => 10,
        LogCategory::Water => 5,
        LogCategory::Fasting => 100,
        LogCategory::Weight => 20,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub xp: u32,
    pub max_xp: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            max_xp: STARTING_MAX_XP,
        }
    }
}

impl Progression {
    /// Adds XP and levels up as many times as it covers. Overflow carries
    /// into the next level, whose threshold is 50% higher. Returns the number
    /// of levels gained.
    pub fn gain(&mut self, amount: u32) -> u32 {
        let mut gained = 0;
        self.xp = self.xp.saturating_add(amount);
        while self.max_xp > 0 && self.xp >= self.max_xp {
            self.xp -= self.max_xp;
            self.level += 1;
            self.max_xp = next_threshold(self.max_xp);
            gained += 1;
        }
        gained
    }

    pub fn percent_to_next(&self) -> f64 {
        crate::stats::progress_percent(self.xp as f64, self.max_xp as f64)
    }
}

fn next_threshold(current: u32) -> u32 {
    ((current as f64) * 1.5).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementKind {
    FirstWorkout,
    FirstMeditation,
    FirstFast,
    HydrationHero,
    OnTarget,
    FullFast,
    WeekStreak,
}

impl AchievementKind {
    pub const ALL: [AchievementKind; 7] = [
        AchievementKind::FirstWorkout,
        AchievementKind::FirstMeditation,
        AchievementKind::FirstFast,
        AchievementKind::HydrationHero,
        AchievementKind::OnTarget,
        AchievementKind::FullFast,
        AchievementKind::WeekStreak,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            AchievementKind::FirstWorkout => "First Sweat",
            AchievementKind::FirstMeditation => "Inner Peace",
            AchievementKind::FirstFast => "Fasting Initiate",
            AchievementKind::HydrationHero => "Hydration Hero",
            AchievementKind::OnTarget => "On Target",
            AchievementKind::FullFast => "Full Fast",
            AchievementKind::WeekStreak => "Week Warrior",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementKind::FirstWorkout => "Log your first workout",
            AchievementKind::FirstMeditation => "Log your first meditation",
            AchievementKind::FirstFast => "Complete your first fast",
            AchievementKind::HydrationHero => "Reach your water target in a single day",
            AchievementKind::OnTarget => {
                "Eat at least 90% of your calorie target without going over"
            }
            AchievementKind::FullFast => "Complete a fast as long as your fasting plan",
            AchievementKind::WeekStreak => "Log something seven days in a row",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub kind: AchievementKind,
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

impl fmt::Display for Achievement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.unlocked { "[x]" } else { "[ ]" };
        write!(f, "{} {} - {}", mark, self.title, self.description)
    }
}

/// Evaluates every achievement against the current store contents.
pub fn evaluate_achievements(store: &DailyLogStore, profile: &UserStats) -> Vec<Achievement> {
    AchievementKind::ALL
        .into_iter()
        .map(|kind| Achievement {
            kind,
            title: kind.title(),
            description: kind.description(),
            unlocked: is_unlocked(kind, store, profile),
        })
        .collect()
}

fn is_unlocked(kind: AchievementKind, store: &DailyLogStore, profile: &UserStats) -> bool {
    match kind {
        AchievementKind::FirstWorkout => !store.activities(ActivityKind::Workout).is_empty(),
        AchievementKind::FirstMeditation => {
            !store.activities(ActivityKind::Meditation).is_empty()
        }
        AchievementKind::FirstFast => !store.fasting().is_empty(),
        AchievementKind::HydrationHero => {
            profile.water_target_ml > 0
                && store.water().dates().into_iter().any(|day| {
                    total_water_ml(store.water().filter_by_date(day)) >= profile.water_target_ml
                })
        }
        AchievementKind::OnTarget => {
            let target = profile.calorie_target as f64;
            target > 0.0
                && store.food().dates().into_iter().any(|day| {
                    let eaten = total_calories(store.food().filter_by_date(day)) as f64;
                    eaten >= target * 0.9 && eaten <= target
                })
        }
        AchievementKind::FullFast => {
            let goal = profile.fasting_plan_hours as i64 * 3600;
            goal > 0 && store.fasting().iter().any(|f| f.elapsed_seconds() >= goal)
        }
        AchievementKind::WeekStreak => {
            longest_streak(&store.active_days().into_iter().collect::<Vec<_>>()) >= 7
        }
    }
}

/// Longest run of consecutive days in an ascending list of distinct days.
pub fn longest_streak(days: &[NaiveDate]) -> u32 {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;
    for &day in days {
        current = match previous {
            Some(prev) if prev.succ_opt() == Some(day) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }
    longest
}

/// Length of the streak ending on `today` (or yesterday, so an unlogged
/// morning does not break it).
pub fn current_streak(store: &DailyLogStore, today: NaiveDate) -> u32 {
    let days = store.active_days();
    let mut cursor = if days.contains(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) if days.contains(&yesterday) => yesterday,
            _ => return 0,
        }
    };
    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor = match cursor.pred_opt() {
            Some(prev) => prev,
            None => break,
        };
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLog, FastingLog, FoodLogItem, WaterLogItem};
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_gain_without_level_up() {
        let mut p = Progression::default();
        assert_eq!(p.gain(40), 0);
        assert_eq!(p, Progression { level: 1, xp: 40, max_xp: 100 });
        assert_eq!(p.percent_to_next(), 40.0);
    }

    #[test]
    fn test_gain_carries_overflow() {
        let mut p = Progression::default();
        assert_eq!(p.gain(120), 1);
        assert_eq!(p, Progression { level: 2, xp: 20, max_xp: 150 });
    }

    #[test]
    fn test_gain_multiple_levels() {
        let mut p = Progression::default();
        // 100 + 150 + 225 = 475
        assert_eq!(p.gain(480), 3);
        assert_eq!(p.level, 4);
        assert_eq!(p.xp, 5);
        assert_eq!(p.max_xp, 338);
    }

    #[test]
    fn test_achievements_on_empty_store() {
        let achievements = evaluate_achievements(&DailyLogStore::new(), &UserStats::default());
        assert_eq!(achievements.len(), AchievementKind::ALL.len());
        assert!(achievements.iter().all(|a| !a.unlocked));
    }

    #[test]
    fn test_hydration_and_calorie_achievements() {
        let mut store = DailyLogStore::new();
        store.water_mut().add(WaterLogItem::new(1500).with_date(day(1)));
        store.water_mut().add(WaterLogItem::new(1000).with_date(day(1)));
        store.food_mut().add(FoodLogItem::new("Plate", 1900).with_date(day(2)));
        let profile = UserStats::default();

        let unlocked: Vec<AchievementKind> = evaluate_achievements(&store, &profile)
            .into_iter()
            .filter(|a| a.unlocked)
            .map(|a| a.kind)
            .collect();
        assert_eq!(
            unlocked,
            vec![AchievementKind::HydrationHero, AchievementKind::OnTarget]
        );
    }

    #[test]
    fn test_calorie_overshoot_is_not_on_target() {
        let mut store = DailyLogStore::new();
        store.food_mut().add(FoodLogItem::new("Feast", 2600).with_date(day(1)));

        let achievements = evaluate_achievements(&store, &UserStats::default());
        let on_target = achievements
            .iter()
            .find(|a| a.kind == AchievementKind::OnTarget)
            .unwrap();
        assert!(!on_target.unlocked);
    }

    #[test]
    fn test_fasting_achievements() {
        let mut store = DailyLogStore::new();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        store
            .fasting_mut()
            .add(FastingLog::completed(start, start + chrono::Duration::hours(12)));
        let profile = UserStats::default();

        let is = |kind| {
            evaluate_achievements(&store, &profile)
                .into_iter()
                .any(|a| a.kind == kind && a.unlocked)
        };
        assert!(is(AchievementKind::FirstFast));
        assert!(!is(AchievementKind::FullFast));

        store
            .fasting_mut()
            .add(FastingLog::completed(start, start + chrono::Duration::hours(16)));
        assert!(evaluate_achievements(&store, &profile)
            .into_iter()
            .any(|a| a.kind == AchievementKind::FullFast && a.unlocked));
    }

    #[test]
    fn test_week_streak() {
        let mut store = DailyLogStore::new();
        for d in 1..=6 {
            store.water_mut().add(WaterLogItem::new(100).with_date(day(d)));
        }
        let profile = UserStats::default();
        let streak_unlocked = |store: &DailyLogStore| {
            evaluate_achievements(store, &profile)
                .into_iter()
                .any(|a| a.kind == AchievementKind::WeekStreak && a.unlocked)
        };
        assert!(!streak_unlocked(&store));

        store.add_activity(
            ActivityLog::new(ActivityKind::Workout, "Ride", "20:00").with_date(day(7)),
        );
        assert!(streak_unlocked(&store));
    }

    #[test]
    fn test_longest_streak() {
        assert_eq!(longest_streak(&[]), 0);
        assert_eq!(longest_streak(&[day(1), day(2), day(4), day(5), day(6)]), 3);
    }

    #[test]
    fn test_current_streak() {
        let mut store = DailyLogStore::new();
        for d in [1, 3, 4, 5] {
            store.water_mut().add(WaterLogItem::new(100).with_date(day(d)));
        }
        assert_eq!(current_streak(&store, day(5)), 3);
        assert_eq!(current_streak(&store, day(6)), 3);
        assert_eq!(current_streak(&store, day(7)), 0);
    }
}
