//! Per-tool usage counters, favorites and hidden flags.

use super::{keys, load_or_default, save, KvStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Persisted state for one tool. Tools never interacted with have no entry
/// and read as [`ToolPreference::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolPreference {
    pub tool_id: String,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_hidden: bool,
}

impl ToolPreference {
    pub fn new(tool_id: &str) -> Self {
        Self {
            tool_id: tool_id.to_string(),
            usage_count: 0,
            last_used_at: None,
            is_favorite: false,
            is_hidden: false,
        }
    }
}

/// Snapshot of all stored preferences keyed by tool id.
pub type ToolPreferences = BTreeMap<String, ToolPreference>;

#[derive(Clone)]
pub struct ToolPreferenceRepository {
    store: Arc<dyn KvStore>,
}

impl ToolPreferenceRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn all(&self) -> ToolPreferences {
        load_or_default(self.store.as_ref(), keys::LINK_PREFS)
    }

    pub fn get(&self, tool_id: &str) -> ToolPreference {
        self.all()
            .remove(tool_id)
            .unwrap_or_else(|| ToolPreference::new(tool_id))
    }

    /// Bump the usage counter and stamp `last_used_at`.
    pub fn record_usage(&self, tool_id: &str) -> ToolPreference {
        self.update(tool_id, |pref| {
            pref.usage_count = pref.usage_count.saturating_add(1);
            pref.last_used_at = Some(Utc::now());
        })
    }

    /// Flip the favorite flag; returns the new value.
    pub fn toggle_favorite(&self, tool_id: &str) -> bool {
        self.update(tool_id, |pref| pref.is_favorite = !pref.is_favorite)
            .is_favorite
    }

    /// Flip the hidden flag; returns the new value.
    pub fn toggle_hidden(&self, tool_id: &str) -> bool {
        self.update(tool_id, |pref| pref.is_hidden = !pref.is_hidden)
            .is_hidden
    }

    /// Forget every preference.
    pub fn reset(&self) {
        save(self.store.as_ref(), keys::LINK_PREFS, &ToolPreferences::new());
    }

    fn update<F>(&self, tool_id: &str, f: F) -> ToolPreference
    where
        F: FnOnce(&mut ToolPreference),
    {
        let mut all = self.all();
        let pref = all
            .entry(tool_id.to_string())
            .or_insert_with(|| ToolPreference::new(tool_id));
        f(pref);
        let updated = pref.clone();
        save(self.store.as_ref(), keys::LINK_PREFS, &all);
        updated
    }
}
