//! FitQuest Core Library
//!
//! Log models, the daily-log store, derived statistics, fasting sessions and
//! character progression shared by FitQuest front ends.

pub mod clock;
pub mod fasting;
pub mod models;
pub mod progress;
pub mod stats;
pub mod store;
pub mod units;

pub use clock::{day_key, Clock, ManualClock, SharedClock, SystemClock};
pub use fasting::{FastingError, FastingSession, FastingTicker};
pub use models::{
    ActivityKind, ActivityLog, Character, Dimensions, FastingLog, FoodLogItem, Macros,
    UserStats, WaterLogItem, WeightLog,
};
pub use progress::{evaluate_achievements, Achievement, AchievementKind, Progression};
pub use stats::{DailySummary, FastDuration};
pub use store::{DailyLogStore, DaySnapshot, LogCategory, LogCollection, LogRecord};
pub use units::UnitSystem;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
