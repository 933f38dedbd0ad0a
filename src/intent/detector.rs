//! Local classification with an optional remote override.

use super::classifier::KeywordClassifier;
use super::remote::IntentService;
use super::{ClassificationResult, IntentClassifier};
use async_trait::async_trait;
use std::sync::Arc;

/// Combines the offline [`KeywordClassifier`] with an optional remote
/// [`IntentService`].
///
/// The local result is always computed first. The remote service is then
/// asked exactly once; a valid answer overrides every field except an empty
/// shortlist, which is filled from the local result. Errors never reach the
/// caller.
pub struct IntentDetector {
    local: KeywordClassifier,
    remote: Option<Arc<dyn IntentService>>,
}

impl IntentDetector {
    pub fn new(local: KeywordClassifier, remote: Option<Arc<dyn IntentService>>) -> Self {
        Self { local, remote }
    }

    /// Detector that never leaves the machine.
    pub fn offline(local: KeywordClassifier) -> Self {
        Self::new(local, None)
    }

    pub async fn detect(&self, input: &str) -> ClassificationResult {
        let local = self.local.classify(input);

        // Nothing to ask about.
        if input.trim().is_empty() {
            return local;
        }
        let Some(remote) = &self.remote else {
            return local;
        };

        match remote.classify(input).await {
            Ok(answer) => {
                tracing::debug!(
                    category = %answer.category,
                    confidence = answer.confidence,
                    "Remote intent classification accepted"
                );
                let suggested_tool_ids = if answer.suggested_tool_ids.is_empty() {
                    local.suggested_tool_ids
                } else {
                    answer.suggested_tool_ids
                };
                ClassificationResult {
                    intent: answer.intent,
                    category: answer.category,
                    matched_keywords: answer.keywords,
                    confidence: answer.confidence,
                    suggested_tool_ids,
                    used_remote_service: true,
                    mode: answer.mode.unwrap_or(local.mode),
                }
            }
            Err(e) => {
                tracing::warn!("Intent service failed, using local keyword match: {e:#}");
                local
            }
        }
    }
}

#[async_trait]
impl IntentClassifier for IntentDetector {
    async fn classify(&self, input: &str) -> anyhow::Result<ClassificationResult> {
        Ok(self.detect(input).await)
    }
}
