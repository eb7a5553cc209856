//! Unit systems and the conversions applied when the user switches between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const KG_TO_LB: f64 = 2.20462;
pub const LB_TO_KG: f64 = 0.453592;
pub const CM_TO_IN: f64 = 0.393701;
pub const IN_TO_M: f64 = 0.0254;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn weight_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "kg",
            UnitSystem::Imperial => "lb",
        }
    }

    pub fn length_unit(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "cm",
            UnitSystem::Imperial => "in",
        }
    }

    /// Maps a stored unit label (`kg`, `lbs`, `cm`, ...) back to its system.
    pub fn from_unit_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "kg" | "cm" | "metric" => Some(UnitSystem::Metric),
            "lb" | "lbs" | "in" | "imperial" => Some(UnitSystem::Imperial),
            _ => None,
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitSystem::Metric => write!(f, "metric"),
            UnitSystem::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitSystem::from_unit_label(s).ok_or_else(|| {
            format!(
                "Invalid unit system '{}'. Valid options: metric, imperial",
                s
            )
        })
    }
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn kg_to_lb(kg: f64) -> f64 {
    round1(kg * KG_TO_LB)
}

pub fn lb_to_kg(lb: f64) -> f64 {
    round1(lb / KG_TO_LB)
}

pub fn cm_to_in(cm: f64) -> f64 {
    round1(cm * CM_TO_IN)
}

pub fn in_to_cm(inches: f64) -> f64 {
    round1(inches / CM_TO_IN)
}

/// Converts a weight between systems. Same-system conversion is the identity.
pub fn convert_weight(value: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => kg_to_lb(value),
        (UnitSystem::Imperial, UnitSystem::Metric) => lb_to_kg(value),
        _ => value,
    }
}

/// Converts a length between systems. Same-system conversion is the identity.
pub fn convert_length(value: f64, from: UnitSystem, to: UnitSystem) -> f64 {
    match (from, to) {
        (UnitSystem::Metric, UnitSystem::Imperial) => cm_to_in(value),
        (UnitSystem::Imperial, UnitSystem::Metric) => in_to_cm(value),
        _ => value,
    }
}

/// Lenient numeric parse: anything non-numeric, negative or non-finite
/// becomes `0.0`.
pub fn parse_number(input: &str) -> f64 {
    let cleaned: String = input
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
        .to_string();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Parses a height into metres.
///
/// Metric heights are centimetres (`"175"`). Imperial heights are either a
/// `feet'inches` token (`5'10`, `5'10"`, `5' 10`) or a decimal number of
/// inches (`"68.9"`). Unparseable input yields `0.0`.
pub fn height_in_meters(input: &str, units: UnitSystem) -> f64 {
    let input = input.trim();
    if let Some((feet, inches)) = input.split_once('\'') {
        let feet = parse_number(feet);
        let inches = parse_number(inches.trim().trim_end_matches('"'));
        return (feet * 12.0 + inches) * IN_TO_M;
    }
    let value = parse_number(input);
    match units {
        UnitSystem::Metric => value / 100.0,
        UnitSystem::Imperial => value * IN_TO_M,
    }
}

/// Parses a weight into kilograms.
pub fn weight_in_kg(input: &str, units: UnitSystem) -> f64 {
    let value = parse_number(input);
    match units {
        UnitSystem::Metric => value,
        UnitSystem::Imperial => value * LB_TO_KG,
    }
}

/// Re-expresses a stored height string in another unit system.
///
/// The result is always a plain decimal (centimetres or inches) rounded to
/// one place, which [`height_in_meters`] reads back.
pub fn convert_height_text(input: &str, from: UnitSystem, to: UnitSystem) -> String {
    if from == to {
        return input.to_string();
    }
    let meters = height_in_meters(input, from);
    if meters <= 0.0 {
        return input.to_string();
    }
    let converted = match to {
        UnitSystem::Metric => round1(meters * 100.0),
        UnitSystem::Imperial => round1(meters / IN_TO_M),
    };
    format_decimal(converted)
}

/// Re-expresses a stored weight string in another unit system.
pub fn convert_weight_text(input: &str, from: UnitSystem, to: UnitSystem) -> String {
    if from == to {
        return input.to_string();
    }
    let value = parse_number(input);
    if value <= 0.0 {
        return input.to_string();
    }
    format_decimal(convert_weight(value, from, to))
}

fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_system_from_str() {
        assert_eq!("metric".parse::<UnitSystem>().unwrap(), UnitSystem::Metric);
        assert_eq!("LBS".parse::<UnitSystem>().unwrap(), UnitSystem::Imperial);
        assert!("stone".parse::<UnitSystem>().is_err());
    }

    #[test]
    fn test_weight_round_trip_within_tolerance() {
        for kg in [45.0, 70.0, 82.3, 120.7] {
            let back = lb_to_kg(kg_to_lb(kg));
            assert!((back - kg).abs() <= 0.1, "{} -> {}", kg, back);
        }
    }

    #[test]
    fn test_length_round_trip_within_tolerance() {
        for cm in [30.5, 50.0, 81.0, 175.0] {
            let back = in_to_cm(cm_to_in(cm));
            assert!((back - cm).abs() <= 0.1, "{} -> {}", cm, back);
        }
    }

    #[test]
    fn test_parse_number_is_lenient() {
        assert_eq!(parse_number("72.5"), 72.5);
        assert_eq!(parse_number(" 80 kg"), 80.0);
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number("-3"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number(""), 0.0);
    }

    #[test]
    fn test_height_parsing() {
        assert!((height_in_meters("175", UnitSystem::Metric) - 1.75).abs() < 1e-9);
        let feet_inches = height_in_meters("5'10", UnitSystem::Imperial);
        assert!((feet_inches - 1.778).abs() < 1e-3);
        let quoted = height_in_meters("5' 10\"", UnitSystem::Imperial);
        assert!((quoted - feet_inches).abs() < 1e-9);
        let inches = height_in_meters("70", UnitSystem::Imperial);
        assert!((inches - feet_inches).abs() < 1e-9);
        assert_eq!(height_in_meters("tall", UnitSystem::Metric), 0.0);
    }

    #[test]
    fn test_convert_height_text() {
        assert_eq!(
            convert_height_text("175", UnitSystem::Metric, UnitSystem::Imperial),
            "68.9"
        );
        assert_eq!(
            convert_height_text("68.9", UnitSystem::Imperial, UnitSystem::Metric),
            "175"
        );
        assert_eq!(
            convert_height_text("5'10", UnitSystem::Imperial, UnitSystem::Metric),
            "177.8"
        );
        assert_eq!(
            convert_height_text("", UnitSystem::Metric, UnitSystem::Imperial),
            ""
        );
    }

    #[test]
    fn test_convert_weight_text() {
        assert_eq!(
            convert_weight_text("70", UnitSystem::Metric, UnitSystem::Imperial),
            "154.3"
        );
        assert_eq!(
            convert_weight_text("70", UnitSystem::Metric, UnitSystem::Metric),
            "70"
        );
    }
}
