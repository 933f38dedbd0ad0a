//! Intent classification.
//!
//! The local [`KeywordClassifier`] always runs. When a remote classification
//! endpoint is configured, [`IntentDetector`] asks it once per request and lets
//! a valid answer override the local one; any failure on that path silently
//! falls back to the local result.
//!
//! ## Known limitations
//! - Local confidence is a fixed [`LOCAL_CONFIDENCE`], not derived from the
//!   match count.
//! - Equal match counts resolve to the category declared first in the
//!   [`KeywordLexicon`]; reordering the lexicon changes results for
//!   ambiguous input.

pub mod classifier;
pub mod detector;
pub mod lexicon;
pub mod mode;
pub mod remote;

pub use classifier::KeywordClassifier;
pub use detector::IntentDetector;
pub use lexicon::KeywordLexicon;
pub use mode::{detect_mode, AssistantMode};
pub use remote::{HttpIntentService, IntentService, RemoteIntent};

use serde::{Deserialize, Serialize};

/// Confidence reported by the offline path.
pub const LOCAL_CONFIDENCE: f64 = 0.5;

/// Upper bound on recommended tools per request.
pub const MAX_SUGGESTIONS: usize = 3;

/// Outcome of classifying one user input. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Short description of what the user wants.
    pub intent: String,
    /// Category id. Usually a [`crate::catalog::Category`] id, but a remote
    /// service may answer with a category the catalog does not know.
    pub category: String,
    /// Distinct keywords that matched, in lexicon order.
    pub matched_keywords: Vec<String>,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// At most [`MAX_SUGGESTIONS`] distinct tool ids, strongest first.
    pub suggested_tool_ids: Vec<String>,
    /// `true` only when a remote answer was actually used.
    pub used_remote_service: bool,
    pub mode: AssistantMode,
}

/// Classification seam used by the conversation orchestrator.
#[async_trait::async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, input: &str) -> anyhow::Result<ClassificationResult>;
}
