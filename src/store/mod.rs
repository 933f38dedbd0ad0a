//! Local persistence.
//!
//! Every logical store (chat sessions, active session pointer, tool
//! preferences, settings, analytics, relationship) is one JSON blob under a
//! fixed key in a [`KvStore`]. Each repository owns one or two keys and is the
//! only code that reads or writes them.
//!
//! ## Failure policy
//! Reads never fail: a missing key, a backend error, or a value that does not
//! deserialize all produce the repository's documented default. Writes that
//! fail are logged and dropped; the caller keeps its in-memory value.

pub mod analytics;
pub mod chats;
pub mod kv;
pub mod preferences;
pub mod relationship;
pub mod settings;

pub use analytics::{Analytics, AnalyticsRepository, LinkClicks};
pub use chats::{ChatMessage, ChatRepository, ChatSession, NewMessage, Role};
pub use kv::{KvStore, MemoryKvStore, SqliteKvStore};
pub use preferences::{ToolPreference, ToolPreferenceRepository, ToolPreferences};
pub use relationship::{Interaction, Relationship, RelationshipLevel, RelationshipRepository};
pub use settings::{FontSize, Language, Settings, SettingsRepository, Theme};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Fixed storage keys, one per logical store.
pub mod keys {
    pub const CHATS: &str = "jarvis_chats";
    pub const ACTIVE_CHAT: &str = "jarvis_active_chat";
    pub const LINK_PREFS: &str = "jarvis_link_prefs";
    pub const PREFERENCES: &str = "jarvis_preferences";
    pub const OWNER_ANALYTICS: &str = "jarvis_owner_analytics";
    pub const RELATIONSHIP: &str = "jarvis_relationship";
}

/// Read and decode `key`, falling back on any failure.
pub(crate) fn load_or_else<T, F>(store: &dyn KvStore, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, "Corrupt stored value, using default: {e}");
                fallback()
            }
        },
        Ok(None) => fallback(),
        Err(e) => {
            tracing::warn!(key, "Storage read failed, using default: {e:#}");
            fallback()
        }
    }
}

pub(crate) fn load_or_default<T>(store: &dyn KvStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    load_or_else(store, key, T::default)
}

/// Encode and write `value`. Failures are logged, never returned.
pub(crate) fn save<T: Serialize>(store: &dyn KvStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, "Failed to serialize value for storage: {e}");
            return;
        }
    };
    if let Err(e) = store.set(key, &raw) {
        tracing::warn!(key, "Storage write failed: {e:#}");
    }
}

pub(crate) fn remove(store: &dyn KvStore, key: &str) {
    if let Err(e) = store.remove(key) {
        tracing::warn!(key, "Storage remove failed: {e:#}");
    }
}

/// All repositories over one shared backend.
#[derive(Clone)]
pub struct Stores {
    pub chats: ChatRepository,
    pub tool_prefs: ToolPreferenceRepository,
    pub settings: SettingsRepository,
    pub analytics: AnalyticsRepository,
    pub relationship: RelationshipRepository,
}

impl Stores {
    pub fn new(backend: Arc<dyn KvStore>) -> Self {
        Self {
            chats: ChatRepository::new(backend.clone()),
            tool_prefs: ToolPreferenceRepository::new(backend.clone()),
            settings: SettingsRepository::new(backend.clone()),
            analytics: AnalyticsRepository::new(backend.clone()),
            relationship: RelationshipRepository::new(backend),
        }
    }

    /// Fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKvStore::new()))
    }
}
