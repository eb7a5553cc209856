use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use super::{AiError, FoodAnalysis};
use crate::config::AiConfig;
use crate::models::Character;
use fitquest_core::DailySummary;

/// Client for a `generateContent`-style generative-AI endpoint.
#[derive(Debug, Clone)]
pub struct GenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenAiClient {
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let api_key = match &config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => return Err(AiError::NotConfigured),
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::HttpError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Estimates nutrition for a meal photo, in the voice of `persona`.
    pub async fn analyze_food(
        &self,
        image: &[u8],
        mime_type: &str,
        persona: &Character,
    ) -> Result<FoodAnalysis, AiError> {
        let prompt = format!(
            "You are {name}, a {role} fitness coach. Identify the food in this photo and \
             estimate its nutrition. Respond with JSON only: \
             {{\"name\": string, \"calories\": number, \
             \"macros\": {{\"protein\": number, \"carbs\": number, \"fat\": number}}, \
             \"category\": string, \"feedback\": string (one short sentence in your voice), \
             \"zpdStatus\": \"under\" | \"optimal\" | \"over\"}}",
            name = persona.name,
            role = persona.role,
        );

        let body = json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": mime_type, "data": STANDARD.encode(image) } },
                    { "text": prompt }
                ]
            }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        tracing::debug!(bytes = image.len(), mime_type, "requesting food analysis");
        let text = self.generate(&body).await?;
        FoodAnalysis::from_model_text(&text)
    }

    /// A short motivational briefing on today's numbers.
    pub async fn briefing(
        &self,
        summary: &DailySummary,
        goal: &str,
        persona: &Character,
    ) -> Result<String, AiError> {
        let prompt = format!(
            "You are {name}, a {role} fitness coach. The user's goal is \"{goal}\". \
             Here is their day so far:\n{summary}\n\
             Write a motivational briefing of at most three sentences, in character.",
            name = persona.name,
            role = persona.role,
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(goal, "requesting briefing");
        let text = self.generate(&body).await?;
        Ok(text.trim().to_string())
    }

    async fn generate(&self, body: &Value) -> Result<String, AiError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::HttpError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(AiError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        first_text(parsed)
    }
}

fn first_text(response: GenerateResponse) -> Result<String, AiError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
        .ok_or_else(|| AiError::InvalidResponse("no text in response".to_string()))
}
