//! Player and developer preferences
//!
//! Persisted as JSON under their own key, separate from the unlock flag.

use serde::{Deserialize, Serialize};

use crate::consts::{INITIAL_COUNTDOWN_SECS, LEVEL_BONUS_SECS};
use crate::error::StorageError;
use crate::persistence::KeyValueStore;

/// Settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Developer ===
    /// Level-skip panel and error toasts
    pub debug_tools: bool,
    /// Fixed RNG seed; the clock is used when unset
    pub seed: Option<u64>,

    // === Countdown ===
    /// Countdown at level 1
    pub initial_seconds: u32,
    /// Added on every level advance
    pub bonus_seconds: u32,

    // === Accessibility ===
    /// Reduced motion (no confetti, emoji rain or curtain wipe)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_tools: false,
            seed: None,
            initial_seconds: INITIAL_COUNTDOWN_SECS,
            bonus_seconds: LEVEL_BONUS_SECS,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "fun_levels_settings";

    /// Effects are shown unless reduced motion is on
    pub fn effects_enabled(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings, falling back to defaults when absent or corrupt
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings, using defaults: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings, writing the defaults back when none are stored yet so
    /// they can be edited from the browser's storage panel
    pub fn load_or_init(store: &mut dyn KeyValueStore) -> Self {
        let missing = matches!(store.get(Self::STORAGE_KEY), Ok(None));
        let settings = Self::load(store);
        if missing {
            if let Err(e) = settings.save(store) {
                log::warn!("Could not store default settings: {}", e);
            }
        }
        settings
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), StorageError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            debug_tools: true,
            seed: Some(42),
            bonus_seconds: 30,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_corrupt_json_falls_back() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"reduced_motion":true}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(settings.reduced_motion);
        assert!(!settings.effects_enabled());
        assert_eq!(settings.initial_seconds, INITIAL_COUNTDOWN_SECS);
    }

    #[test]
    fn test_load_or_init_writes_defaults_once() {
        let mut store = MemoryStore::new();
        assert_eq!(Settings::load_or_init(&mut store), Settings::default());
        assert!(store.get(Settings::STORAGE_KEY).unwrap().is_some());

        // Existing values are left alone
        store
            .set(Settings::STORAGE_KEY, r#"{"debug_tools":true}"#)
            .unwrap();
        assert!(Settings::load_or_init(&mut store).debug_tools);
        assert_eq!(
            store.get(Settings::STORAGE_KEY).unwrap().as_deref(),
            Some(r#"{"debug_tools":true}"#)
        );
    }
}
