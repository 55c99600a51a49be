//! User preferences
//!
//! Persisted separately from scenarios and history in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::generator::GeneratorConfig;

/// Wheel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence ticks and fanfare
    pub muted: bool,

    // === Visual Effects ===
    /// Confetti burst on win
    pub confetti: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses confetti)
    pub reduced_motion: bool,

    // === Prize generator ===
    /// API key override (falls back to the build-time key)
    pub generator_api_key: Option<String>,
    /// Text-generation model name
    pub generator_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            confetti: true,

            reduced_motion: false,

            generator_api_key: None,
            generator_model: GeneratorConfig::DEFAULT_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "lucky_wheel_settings";

    /// Effective confetti (respects reduced_motion)
    pub fn effective_confetti(&self) -> bool {
        self.confetti && !self.reduced_motion
    }

    /// Effective sound effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Generator configuration, preferring the stored key over the build-time one
    pub fn generator_config(&self) -> GeneratorConfig {
        let api_key = self
            .generator_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| option_env!("LUCKY_WHEEL_API_KEY").map(str::to_string));
        GeneratorConfig {
            api_key,
            model: self.generator_model.clone(),
            ..GeneratorConfig::default()
        }
    }

    /// Store an API key from a text field; blank clears the override
    pub fn set_api_key(&mut self, key: &str) {
        let key = key.trim();
        self.generator_api_key = (!key.is_empty()).then(|| key.to_string());
    }

    /// Store a model name from a text field; blank restores the default
    pub fn set_model(&mut self, model: &str) {
        let model = model.trim();
        self.generator_model = if model.is_empty() {
            GeneratorConfig::DEFAULT_MODEL.to_string()
        } else {
            model.to_string()
        };
    }
}

/// Parse a 0-100 slider value into a 0.0-1.0 volume
pub fn volume_from_percent(text: &str) -> Option<f32> {
    let percent: f32 = text.trim().parse().ok()?;
    percent.is_finite().then(|| (percent / 100.0).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_motion_disables_confetti() {
        let mut settings = Settings::default();
        assert!(settings.effective_confetti());
        settings.reduced_motion = true;
        assert!(!settings.effective_confetti());
    }

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"muted":true}"#).unwrap();
        assert!(settings.muted);
        assert_eq!(settings.generator_model, GeneratorConfig::DEFAULT_MODEL);
    }

    #[test]
    fn test_text_field_setters() {
        let mut settings = Settings::default();
        settings.set_api_key("  secret ");
        assert_eq!(settings.generator_api_key.as_deref(), Some("secret"));
        settings.set_api_key("   ");
        assert_eq!(settings.generator_api_key, None);

        settings.set_model("gemini-pro");
        assert_eq!(settings.generator_model, "gemini-pro");
        settings.set_model("");
        assert_eq!(settings.generator_model, GeneratorConfig::DEFAULT_MODEL);
    }

    #[test]
    fn test_volume_from_percent() {
        assert_eq!(volume_from_percent("50"), Some(0.5));
        assert_eq!(volume_from_percent("250"), Some(1.0));
        assert_eq!(volume_from_percent("-3"), Some(0.0));
        assert_eq!(volume_from_percent("loud"), None);
        assert_eq!(volume_from_percent("NaN"), None);
    }

    #[test]
    fn test_stored_key_wins() {
        let settings = Settings {
            generator_api_key: Some("abc".into()),
            ..Settings::default()
        };
        assert_eq!(settings.generator_config().api_key.as_deref(), Some("abc"));
    }
}
