//! Theme-based prize list generation
//!
//! Asks a text-generation API for 8-12 prizes matching a free-text theme.
//! Any failure comes back as a single `GenerateError`; callers keep their
//! existing prizes untouched and may retry.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::palette_color;
use crate::wheel::Prize;

/// Fewest/most prizes requested per theme
pub const MIN_GENERATED: usize = 8;
pub const MAX_GENERATED: usize = 12;
/// Weight range requested from the model
pub const MAX_GENERATED_WEIGHT: u32 = 10;

/// Prize generation failure (all variants are user-recoverable)
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("no API key configured")]
    MissingCredential,
    #[error("theme is empty")]
    EmptyTheme,
    #[error("request failed: {0}")]
    Network(String),
    #[error("service returned HTTP {0}")]
    Status(u16),
    #[error("unexpected response: {0}")]
    Malformed(String),
}

impl GenerateError {
    /// Whether trying again unchanged may succeed
    ///
    /// Model output varies between calls, so a malformed reply is worth
    /// another attempt; missing input is not.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerateError::MissingCredential | GenerateError::EmptyTheme)
    }

    /// Status line shown next to the generate button
    pub fn user_message(&self) -> String {
        match self {
            GenerateError::MissingCredential => {
                "Set an API key in settings to generate prizes.".to_string()
            }
            GenerateError::EmptyTheme => "Enter a theme first.".to_string(),
            e if e.is_retryable() => format!("Could not generate prizes ({}). Try again.", e),
            e => format!("Could not generate prizes ({}).", e),
        }
    }
}

/// Text-generation service settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl GeneratorConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";
    pub const DEFAULT_ENDPOINT: &'static str =
        "https://generativelanguage.googleapis.com/v1beta/models";

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint.trim_end_matches('/'), self.model)
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: Self::DEFAULT_MODEL.to_string(),
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
        }
    }
}

/// One prize as the model returns it
#[derive(Debug, Clone, Deserialize, Serialize)]
struct GeneratedPrize {
    name: String,
    weight: i64,
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
    #[serde(default)]
    text: String,
}

fn prompt(theme: &str) -> String {
    format!(
        "Generate a list of {MIN_GENERATED} to {MAX_GENERATED} fun and creative prizes for a lucky draw based on the theme: \"{theme}\". \
         Assign a reasonable \"weight\" (probability factor, integer between 1 and {MAX_GENERATED_WEIGHT}) to each prize, \
         where higher weight means higher chance. \
         Keep names concise (under 10 characters if possible). \
         Return JSON only."
    )
}

fn request_body(theme: &str) -> serde_json::Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt(theme) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "name": { "type": "STRING", "description": "Name of the prize" },
                        "weight": { "type": "INTEGER", "description": "Weight of the prize (1-10)" }
                    },
                    "required": ["name", "weight"]
                }
            }
        }
    })
}

/// Generate prizes for a theme
///
/// `now` (Unix ms) seeds the fresh prize ids.
pub async fn generate_prizes(
    config: &GeneratorConfig,
    theme: &str,
    now: i64,
) -> Result<Vec<Prize>, GenerateError> {
    let theme = theme.trim();
    if theme.is_empty() {
        return Err(GenerateError::EmptyTheme);
    }
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(GenerateError::MissingCredential)?;

    log::info!("Generating prizes for theme {:?}", theme);

    let response = reqwest::Client::new()
        .post(config.url())
        .header("x-goog-api-key", api_key)
        .json(&request_body(theme))
        .send()
        .await
        .map_err(|e| GenerateError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        log::warn!("Prize generation failed with HTTP {}", status.as_u16());
        return Err(GenerateError::Status(status.as_u16()));
    }

    let body: GenerateResponse = response
        .json()
        .await
        .map_err(|e| GenerateError::Malformed(e.to_string()))?;
    let text = body
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .map(|p| p.text.as_str())
        .ok_or_else(|| GenerateError::Malformed("no candidates".to_string()))?;

    let prizes = parse_prizes(text, now)?;
    log::info!("Generated {} prizes", prizes.len());
    Ok(prizes)
}

/// Turn the model's JSON array into wheel prizes
///
/// Blank names are dropped, weights clamped to 1..=10, and the list capped
/// at MAX_GENERATED. Colors cycle the palette; ids are `{now}{index}`.
pub fn parse_prizes(text: &str, now: i64) -> Result<Vec<Prize>, GenerateError> {
    let raw: Vec<GeneratedPrize> =
        serde_json::from_str(text.trim()).map_err(|e| GenerateError::Malformed(e.to_string()))?;

    let prizes: Vec<Prize> = raw
        .into_iter()
        .filter(|p| !p.name.trim().is_empty())
        .take(MAX_GENERATED)
        .enumerate()
        .map(|(i, p)| Prize {
            id: format!("{}{}", now, i),
            label: p.name.trim().to_string(),
            weight: p.weight.clamp(1, MAX_GENERATED_WEIGHT as i64) as u32,
            color: palette_color(i).to_string(),
        })
        .collect();

    if prizes.is_empty() {
        return Err(GenerateError::Malformed("no prizes in response".to_string()));
    }
    Ok(prizes)
}
