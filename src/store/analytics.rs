//! Owner analytics: aggregate counters, never per-message content.

use super::{keys, load_or_default, save, KvStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Analytics {
    pub link_clicks: BTreeMap<String, u64>,
    pub category_usage: BTreeMap<String, u64>,
    pub session_count: u64,
    pub total_messages: u64,
    pub error_count: u64,
    pub last_updated: DateTime<Utc>,
}

impl Default for Analytics {
    fn default() -> Self {
        Self {
            link_clicks: BTreeMap::new(),
            category_usage: BTreeMap::new(),
            session_count: 0,
            total_messages: 0,
            error_count: 0,
            last_updated: Utc::now(),
        }
    }
}

/// One row of [`AnalyticsRepository::top_links`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkClicks {
    pub tool_id: String,
    pub clicks: u64,
}

#[derive(Clone)]
pub struct AnalyticsRepository {
    store: Arc<dyn KvStore>,
}

impl AnalyticsRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Analytics {
        load_or_default(self.store.as_ref(), keys::OWNER_ANALYTICS)
    }

    pub fn record_link_click(&self, tool_id: &str) {
        self.bump(|a| *a.link_clicks.entry(tool_id.to_string()).or_default() += 1);
    }

    pub fn record_category_usage(&self, category: &str) {
        self.bump(|a| *a.category_usage.entry(category.to_string()).or_default() += 1);
    }

    pub fn record_message(&self) {
        self.bump(|a| a.total_messages += 1);
    }

    pub fn record_session(&self) {
        self.bump(|a| a.session_count += 1);
    }

    pub fn record_error(&self) {
        self.bump(|a| a.error_count += 1);
    }

    /// Most-clicked tools, highest first; ties in id order.
    pub fn top_links(&self, n: usize) -> Vec<LinkClicks> {
        let mut rows: Vec<LinkClicks> = self
            .get()
            .link_clicks
            .into_iter()
            .map(|(tool_id, clicks)| LinkClicks { tool_id, clicks })
            .collect();
        rows.sort_by(|a, b| b.clicks.cmp(&a.clicks));
        rows.truncate(n);
        rows
    }

    pub fn reset(&self) {
        save(self.store.as_ref(), keys::OWNER_ANALYTICS, &Analytics::default());
    }

    fn bump<F: FnOnce(&mut Analytics)>(&self, f: F) {
        let mut analytics = self.get();
        f(&mut analytics);
        analytics.last_updated = Utc::now();
        save(self.store.as_ref(), keys::OWNER_ANALYTICS, &analytics);
    }
}
