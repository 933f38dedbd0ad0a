//! Global user settings.

use super::{keys, load_or_default, save, KvStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Hi,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

/// Stored values are merged over the defaults field by field, so settings
/// written by an older build still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub theme: Theme,
    pub language: Language,
    pub voice_enabled: bool,
    pub auto_execute: bool,
    pub show_confidence: bool,
    pub font_size: FontSize,
    /// Category filter id applied when a session opens.
    pub default_category: String,
    pub tts_enabled: bool,
    pub show_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Dark,
            language: Language::Auto,
            voice_enabled: true,
            auto_execute: false,
            show_confidence: false,
            font_size: FontSize::Medium,
            default_category: "all".to_string(),
            tts_enabled: false,
            show_mode: true,
        }
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KvStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Settings {
        load_or_default(self.store.as_ref(), keys::PREFERENCES)
    }

    /// Apply `f` to the current settings and persist the result.
    pub fn update<F: FnOnce(&mut Settings)>(&self, f: F) -> Settings {
        let mut settings = self.get();
        f(&mut settings);
        save(self.store.as_ref(), keys::PREFERENCES, &settings);
        settings
    }

    pub fn reset(&self) -> Settings {
        let settings = Settings::default();
        save(self.store.as_ref(), keys::PREFERENCES, &settings);
        settings
    }
}
