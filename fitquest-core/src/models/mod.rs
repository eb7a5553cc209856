mod activity_log;
mod character;
mod fasting_log;
mod food_log;
mod user_stats;
mod water_log;
mod weight_log;

pub use activity_log::{ActivityKind, ActivityLog};
pub use character::{Character, ACCESSORIES, DEFAULT_CHARACTER_ID};
pub use fasting_log::FastingLog;
pub use food_log::{FoodLogItem, Macros};
pub use user_stats::{
    UserStats, DEFAULT_CALORIE_TARGET, DEFAULT_FASTING_PLAN_HOURS, DEFAULT_WATER_TARGET_ML,
};
pub use water_log::WaterLogItem;
pub use weight_log::{Dimensions, WeightLog};
