//! Remote classification gateway.
//!
//! The endpoint is an untrusted collaborator: its JSON is parsed into
//! [`RawIntentPayload`] and validated into [`RemoteIntent`]. Anything that
//! does not survive validation is an error, and the caller falls back to
//! the local classifier.

use super::mode::AssistantMode;
use super::MAX_SUGGESTIONS;
use crate::config::IntentConfig;
use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Largest response body accepted from the endpoint.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Request body sent to the endpoint.
#[derive(Debug, Serialize)]
struct IntentRequest<'a> {
    input: &'a str,
}

/// Wire shape of a remote answer, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIntentPayload {
    intent: Option<String>,
    category: Option<String>,
    confidence: Option<f64>,
    keywords: Option<Vec<String>>,
    suggested_tool_ids: Option<Vec<String>>,
    mode: Option<String>,
}

/// A validated remote classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteIntent {
    pub intent: String,
    pub category: String,
    /// Clamped to `[0, 1]`.
    pub confidence: f64,
    /// Trimmed, lowercase and distinct, in the order received.
    pub keywords: Vec<String>,
    /// Distinct, non-blank, at most [`MAX_SUGGESTIONS`]. Empty means the
    /// remote had no opinion and the local shortlist should be used.
    pub suggested_tool_ids: Vec<String>,
    pub mode: Option<AssistantMode>,
}

impl TryFrom<RawIntentPayload> for RemoteIntent {
    type Error = anyhow::Error;

    fn try_from(raw: RawIntentPayload) -> anyhow::Result<Self> {
        let Some(intent) = raw.intent else {
            bail!("remote intent payload missing `intent`");
        };
        let category = match raw.category {
            Some(c) if !c.trim().is_empty() => c.trim().to_string(),
            _ => bail!("remote intent payload missing `category`"),
        };
        let confidence = match raw.confidence {
            Some(c) if c.is_finite() => c.clamp(0.0, 1.0),
            Some(c) => bail!("remote intent payload has non-finite confidence {c}"),
            None => bail!("remote intent payload missing `confidence`"),
        };
        let Some(raw_keywords) = raw.keywords else {
            bail!("remote intent payload missing `keywords`");
        };

        let mut keywords: Vec<String> = Vec::new();
        for kw in raw_keywords {
            let kw = kw.trim().to_lowercase();
            if kw.is_empty() || keywords.contains(&kw) {
                continue;
            }
            keywords.push(kw);
        }

        let mut suggested_tool_ids: Vec<String> = Vec::new();
        for id in raw.suggested_tool_ids.unwrap_or_default() {
            let id = id.trim();
            if id.is_empty() || suggested_tool_ids.iter().any(|s| s == id) {
                continue;
            }
            suggested_tool_ids.push(id.to_string());
            if suggested_tool_ids.len() == MAX_SUGGESTIONS {
                break;
            }
        }

        Ok(Self {
            intent,
            category,
            confidence,
            keywords,
            suggested_tool_ids,
            mode: raw.mode.as_deref().and_then(AssistantMode::from_id),
        })
    }
}

/// A remote service able to classify free text.
#[async_trait]
pub trait IntentService: Send + Sync {
    /// Classify `input`. Any error means "use the local result".
    async fn classify(&self, input: &str) -> anyhow::Result<RemoteIntent>;
}

/// HTTP implementation: `POST {"input": ...}` to a fixed endpoint.
pub struct HttpIntentService {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpIntentService {
    pub fn new(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .connect_timeout(connect_timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Build from config. `None` when no endpoint is configured.
    pub fn from_config(config: &IntentConfig) -> Option<Self> {
        let endpoint = config.endpoint.as_deref()?.trim();
        if endpoint.is_empty() {
            return None;
        }
        Some(Self::new(
            endpoint,
            Duration::from_secs(config.timeout_secs),
            Duration::from_secs(config.connect_timeout_secs),
        ))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl IntentService for HttpIntentService {
    async fn classify(&self, input: &str) -> anyhow::Result<RemoteIntent> {
        let mut resp = self
            .client
            .post(&self.endpoint)
            .json(&IntentRequest { input })
            .send()
            .await
            .with_context(|| format!("intent endpoint {} unreachable", self.endpoint))?;

        if !resp.status().is_success() {
            bail!("intent endpoint returned status {}", resp.status());
        }

        if let Some(len) = resp.content_length() {
            if len > MAX_BODY_BYTES as u64 {
                bail!("intent endpoint response too large ({len} bytes)");
            }
        }
        let mut body = Vec::new();
        while let Some(chunk) = resp
            .chunk()
            .await
            .context("failed to read intent endpoint response")?
        {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                bail!("intent endpoint response too large (over {MAX_BODY_BYTES} bytes)");
            }
            body.extend_from_slice(&chunk);
        }

        let raw: RawIntentPayload =
            serde_json::from_slice(&body).context("intent endpoint returned malformed JSON")?;
        RemoteIntent::try_from(raw)
    }
}
