use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::character::DEFAULT_CHARACTER_ID;
use crate::progress::Progression;
use crate::units::{convert_height_text, convert_weight_text, UnitSystem};

pub const DEFAULT_CALORIE_TARGET: u32 = 2000;
pub const DEFAULT_WATER_TARGET_ML: u32 = 2500;
pub const DEFAULT_FASTING_PLAN_HOURS: u32 = 16;

/// The user's profile: biometrics, goals and character selection.
///
/// Height and weight are kept as entered text so that both decimal and
/// `feet'inches` heights survive a round trip; the calculator parses them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub name: String,
    pub age: Option<u32>,
    pub height: String,
    pub weight: String,
    pub goal: String,
    pub calorie_target: u32,
    pub water_target_ml: u32,
    pub fasting_plan_hours: u32,
    pub units: UnitSystem,
    pub character_id: String,
    pub progression: Progression,
    pub accessory: Option<String>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: None,
            height: String::new(),
            weight: String::new(),
            goal: "Stay healthy".to_string(),
            calorie_target: DEFAULT_CALORIE_TARGET,
            water_target_ml: DEFAULT_WATER_TARGET_ML,
            fasting_plan_hours: DEFAULT_FASTING_PLAN_HOURS,
            units: UnitSystem::Metric,
            character_id: DEFAULT_CHARACTER_ID.to_string(),
            progression: Progression::default(),
            accessory: None,
        }
    }
}

impl UserStats {
    /// Switches the active unit system, converting height and weight.
    pub fn switch_units(&mut self, units: UnitSystem) {
        if units == self.units {
            return;
        }
        self.height = convert_height_text(&self.height, self.units, units);
        self.weight = convert_weight_text(&self.weight, self.units, units);
        self.units = units;
    }
}

impl fmt::Display for UserStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "(unnamed)"
        } else {
            self.name.as_str()
        };
        writeln!(f, "Profile: {}", name)?;
        writeln!(f, "{}", "=".repeat(30))?;
        if let Some(age) = self.age {
            writeln!(f, "Age: {}", age)?;
        }
        if !self.height.is_empty() {
            writeln!(f, "Height: {} {}", self.height, self.units.length_unit())?;
        }
        if !self.weight.is_empty() {
            writeln!(f, "Weight: {} {}", self.weight, self.units.weight_unit())?;
        }
        writeln!(f, "Goal: {}", self.goal)?;
        writeln!(f, "Calorie target: {} kcal", self.calorie_target)?;
        writeln!(f, "Water target: {} ml", self.water_target_ml)?;
        writeln!(f, "Fasting plan: {}h", self.fasting_plan_hours)?;
        writeln!(f, "Units: {}", self.units)?;
        write!(f, "Character: {}", self.character_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let stats = UserStats::default();
        assert_eq!(stats.water_target_ml, 2500);
        assert_eq!(stats.fasting_plan_hours, 16);
        assert_eq!(stats.units, UnitSystem::Metric);
        assert_eq!(stats.progression.level, 1);
    }

    #[test]
    fn test_switch_units_converts_biometrics() {
        let mut stats = UserStats {
            height: "175".to_string(),
            weight: "70".to_string(),
            ..UserStats::default()
        };

        stats.switch_units(UnitSystem::Imperial);
        assert_eq!(stats.units, UnitSystem::Imperial);
        assert_eq!(stats.height, "68.9");
        assert_eq!(stats.weight, "154.3");

        stats.switch_units(UnitSystem::Metric);
        assert_eq!(stats.height, "175");
        assert_eq!(stats.weight, "70");
    }

    #[test]
    fn test_switch_units_keeps_unparseable_text() {
        let mut stats = UserStats {
            weight: "unknown".to_string(),
            ..UserStats::default()
        };
        stats.switch_units(UnitSystem::Imperial);
        assert_eq!(stats.weight, "unknown");
    }
}
