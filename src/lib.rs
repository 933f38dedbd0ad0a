//! JARVIS: maps free-text requests in English, Hindi or Hinglish to a
//! curated catalog of AI tools, and keeps chat history and tool preferences
//! in one local store.
//!
//! The pieces, leaves first:
//! - [`catalog`]: compiled-in tool registry and categories.
//! - [`intent`]: keyword classifier, optional remote override, mode detection.
//! - [`store`]: repositories over a single [`store::KvStore`].
//! - [`ranking`]: tools panel ordering.
//! - [`tone`]: tone mirroring for reply openers.
//! - [`orchestrator`]: one conversational turn end to end.

pub mod catalog;
pub mod config;
pub mod intent;
pub mod orchestrator;
pub mod ranking;
pub mod store;
pub mod tone;

pub use catalog::{Catalog, Category, CategoryFilter, ToolEntry};
pub use config::AppConfig;
pub use intent::{ClassificationResult, IntentClassifier, IntentDetector, KeywordClassifier};
pub use orchestrator::{ConversationOrchestrator, Reply, SubmitError};
pub use store::Stores;

use std::sync::Arc;

/// Intent detector for `config`: remote override when an endpoint is set,
/// offline otherwise.
pub fn build_detector(config: &AppConfig, catalog: Arc<Catalog>) -> IntentDetector {
    let local = KeywordClassifier::new(intent::KeywordLexicon::builtin(), catalog);
    match intent::HttpIntentService::from_config(&config.intent) {
        Some(service) => {
            tracing::info!(endpoint = service.endpoint(), "Remote intent service enabled");
            IntentDetector::new(local, Some(Arc::new(service)))
        }
        None => IntentDetector::offline(local),
    }
}
