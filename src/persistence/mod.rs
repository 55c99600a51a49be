//! Scenario, history, and settings persistence
//!
//! Features:
//! - JSON values under fixed LocalStorage keys
//! - Missing or malformed values fall back to built-in defaults
//! - Backend-agnostic via `KeyValueStore`

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::history::History;
use crate::platform::{KeyValueStore, StorageError};
use crate::scenario::{ScenarioBook, WheelScenario};
use crate::settings::Settings;

/// Scenario list key
pub const SCENARIOS_KEY: &str = "lucky_wheel_scenarios";
/// Selected scenario id key
pub const CURRENT_ID_KEY: &str = "lucky_wheel_current_id";
/// History key
pub const HISTORY_KEY: &str = "lucky_wheel_history";

/// Typed access to the app's persisted state
pub struct AppStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> AppStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read and decode a JSON value; malformed data is logged and ignored
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let json = self.store.get(key)?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring malformed `{}`: {}", key, e);
                None
            }
        }
    }

    fn save_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|e| StorageError::Encode {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.store.set(key, &json)
    }

    /// Load scenarios and the current selection (defaults if absent/corrupt)
    pub fn load_book(&self) -> ScenarioBook {
        let scenarios: Vec<WheelScenario> = self.load_json(SCENARIOS_KEY).unwrap_or_default();
        // Older saves stored the id as a bare string rather than JSON
        let current_id = self.store.get(CURRENT_ID_KEY).map(|raw| {
            serde_json::from_str::<String>(&raw).unwrap_or(raw)
        });

        if scenarios.is_empty() {
            log::info!("Using default scenarios");
        } else {
            log::info!("Loaded {} scenarios", scenarios.len());
        }
        ScenarioBook::new(scenarios, current_id)
    }

    pub fn save_book(&mut self, book: &ScenarioBook) -> Result<(), StorageError> {
        self.save_json(SCENARIOS_KEY, &book.scenarios())?;
        self.save_json(CURRENT_ID_KEY, &book.current_id())
    }

    pub fn load_history(&self) -> History {
        let history: History = self.load_json(HISTORY_KEY).unwrap_or_default();
        log::info!("Loaded {} history entries", history.len());
        history
    }

    pub fn save_history(&mut self, history: &History) -> Result<(), StorageError> {
        self.save_json(HISTORY_KEY, history)
    }

    pub fn load_settings(&self) -> Settings {
        match self.load_json(Settings::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings from storage");
                settings
            }
            None => {
                log::info!("Using default settings");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.save_json(Settings::STORAGE_KEY, settings)
    }
}
