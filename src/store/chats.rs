//! Chat sessions and the active session pointer.

use super::{keys, load_or_default, load_or_else, remove, save, KvStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Title given to a session until its first user message arrives.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Characters of the first user message kept as the session title.
const TITLE_MAX_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    /// The assistant.
    Jarvis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Classified category recorded with assistant replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Top recommended tool id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_used: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_url: Option<String>,
}

/// A message before it is assigned an id and timestamp.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub intent: Option<String>,
    pub category: Option<String>,
    pub tool_used: Option<String>,
    pub tool_url: Option<String>,
}

impl NewMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn jarvis(content: impl Into<String>) -> Self {
        Self::with_role(Role::Jarvis, content)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            intent: None,
            category: None,
            tool_used: None,
            tool_url: None,
        }
    }

    pub fn intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tool(mut self, id: impl Into<String>, url: impl Into<String>) -> Self {
        self.tool_used = Some(id.into());
        self.tool_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sessions are stored newest-first as a single list.
#[derive(Clone)]
pub struct ChatRepository {
    store: Arc<dyn KvStore>,
}

impl ChatRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn all_sessions(&self) -> Vec<ChatSession> {
        load_or_default(self.store.as_ref(), keys::CHATS)
    }

    pub fn get_session(&self, id: &str) -> Option<ChatSession> {
        self.all_sessions().into_iter().find(|s| s.id == id)
    }

    /// Create a session at the front of the list and make it active.
    pub fn create_session(&self, title: Option<&str>) -> ChatSession {
        let now = Utc::now();
        let session = ChatSession {
            id: format!("chat_{}", uuid::Uuid::new_v4().simple()),
            title: title
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let mut sessions = self.all_sessions();
        sessions.insert(0, session.clone());
        save(self.store.as_ref(), keys::CHATS, &sessions);
        self.set_active_session(&session.id);
        tracing::debug!(session = %session.id, "Created chat session");
        session
    }

    /// Append a message. An unknown session leaves storage untouched; the
    /// message is still returned so the caller can display it.
    pub fn add_message(&self, session_id: &str, message: NewMessage) -> ChatMessage {
        let msg = ChatMessage {
            id: format!("msg_{}", uuid::Uuid::new_v4().simple()),
            role: message.role,
            content: message.content,
            timestamp: Utc::now(),
            intent: message.intent,
            category: message.category,
            tool_used: message.tool_used,
            tool_url: message.tool_url,
        };

        let mut sessions = self.all_sessions();
        let Some(session) = sessions.iter_mut().find(|s| s.id == session_id) else {
            tracing::debug!(session = session_id, "Message for unknown session not stored");
            return msg;
        };
        session.messages.push(msg.clone());
        session.updated_at = msg.timestamp;
        if session.title == DEFAULT_TITLE && msg.role == Role::User {
            session.title = title_from(&msg.content);
        }
        save(self.store.as_ref(), keys::CHATS, &sessions);
        msg
    }

    /// Remove a session. Returns `false` when it did not exist.
    pub fn delete_session(&self, id: &str) -> bool {
        let mut sessions = self.all_sessions();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return false;
        }
        save(self.store.as_ref(), keys::CHATS, &sessions);
        true
    }

    pub fn active_session_id(&self) -> Option<String> {
        load_or_else(self.store.as_ref(), keys::ACTIVE_CHAT, || None)
    }

    pub fn set_active_session(&self, id: &str) {
        save(self.store.as_ref(), keys::ACTIVE_CHAT, &id);
    }

    /// Drop every session and the active pointer.
    pub fn clear_all(&self) {
        remove(self.store.as_ref(), keys::CHATS);
        remove(self.store.as_ref(), keys::ACTIVE_CHAT);
    }
}

fn title_from(content: &str) -> String {
    let mut chars = content.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}
