//! Player preferences
//!
//! Persisted separately from the score lists, under one key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};
use crate::sim::flappy::Theme;
use crate::sim::memory::Difficulty;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Selected flappy theme
    pub flappy_theme: Theme,
    /// Memory card deck size
    pub memory_difficulty: Difficulty,
}

impl Settings {
    const STORAGE_KEY: &'static str = "pixel_arcade_settings";

    /// Stored settings, or defaults when absent or unreadable
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_defaults_when_absent() {
        let store = MemoryStore::new();
        let settings = Settings::load(&store);
        assert_eq!(settings.flappy_theme, Theme::Ufo);
        assert_eq!(settings.memory_difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_save_and_reload() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            flappy_theme: Theme::Balloon,
            memory_difficulty: Difficulty::Hard,
        };
        settings.save(&mut store);
        assert_eq!(
            store.get("pixel_arcade_settings").as_deref(),
            Some(r#"{"flappy_theme":"balloon","memory_difficulty":"hard"}"#)
        );
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn test_partial_blob_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set("pixel_arcade_settings", r#"{"flappy_theme":"ghost"}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert_eq!(settings.flappy_theme, Theme::Ghost);
        assert_eq!(settings.memory_difficulty, Difficulty::Medium);
    }
}
