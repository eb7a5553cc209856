//! Generative-AI annotations: food photo analysis and daily briefings.
//!
//! Everything here is best effort. Callers treat an `AiError` as "no
//! enrichment" and carry on with the local operation.

mod client;

pub use client::GenAiClient;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::models::{FoodLogItem, Macros};

/// Errors that can occur talking to the generative-AI service.
#[derive(Debug)]
pub enum AiError {
    /// No API key configured
    NotConfigured,
    /// Request could not be sent or timed out
    HttpError(String),
    /// Service answered with a non-success status
    ServerError { status: u16, message: String },
    /// Service answered but not with what was asked for
    InvalidResponse(String),
    /// Image could not be read
    IoError(std::io::Error),
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiError::NotConfigured => {
                write!(f, "AI service not configured. Set ai.api_key in config.")
            }
            AiError::HttpError(e) => write!(f, "HTTP error: {}", e),
            AiError::ServerError { status, message } => {
                write!(f, "AI service returned {}: {}", status, message)
            }
            AiError::InvalidResponse(e) => write!(f, "Invalid AI response: {}", e),
            AiError::IoError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for AiError {}

impl From<std::io::Error> for AiError {
    fn from(e: std::io::Error) -> Self {
        AiError::IoError(e)
    }
}

/// Nutrition estimate for a photographed meal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysis {
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub zpd_status: Option<String>,
}

impl FoodAnalysis {
    /// Parses the JSON text the model produced. Tolerates a markdown code
    /// fence around the object.
    pub fn from_model_text(text: &str) -> Result<Self, AiError> {
        let trimmed = strip_code_fence(text);
        serde_json::from_str(trimmed).map_err(|e| AiError::InvalidResponse(e.to_string()))
    }

    /// Builds a food log entry recorded at `at`.
    pub fn into_food_log(self, at: DateTime<Utc>) -> FoodLogItem {
        let calories = if self.calories.is_finite() && self.calories > 0.0 {
            self.calories.round().min(u32::MAX as f64) as u32
        } else {
            0
        };

        let mut item = FoodLogItem::recorded_at(self.name, calories, at)
            .with_macros(self.macros)
            .with_icon("camera");
        if let Some(category) = self.category {
            item = item.with_category(category);
        }
        if let Some(feedback) = self.feedback {
            item = item.with_feedback(feedback);
        }
        item.zpd_status = self.zpd_status;
        item
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Image mime type from a file extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}
