//! Conversation orchestrator.
//!
//! Owns one logical conversation: takes user input, classifies it, writes
//! both sides of the exchange to the active chat session and updates the
//! tools panel (category filter, search query, highlighted tools). Usage and
//! analytics counters are bumped after the primary write and never fail the
//! turn.

pub mod composer;

pub use composer::{compose_reply, APOLOGY, QUICK_MATCH_NOTICE};

use crate::catalog::{Catalog, CategoryFilter, ToolEntry};
use crate::intent::{ClassificationResult, IntentClassifier};
use crate::ranking::rank_for_display;
use crate::store::{ChatMessage, ChatSession, NewMessage, Stores};
use crate::tone::{detect_tone, tone_prefix};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// The input was empty or whitespace only.
    #[error("message is empty")]
    Empty,
    /// Another [`ConversationOrchestrator::submit`] has not finished yet.
    #[error("a previous message is still being processed")]
    Busy,
}

/// Tools panel state. Not persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelView {
    pub filter: CategoryFilter,
    pub search: String,
    /// Tool ids recommended by the last reply.
    pub highlighted: Vec<String>,
}

/// Outcome of one [`ConversationOrchestrator::submit`].
#[derive(Debug, Clone)]
pub struct Reply {
    pub session_id: String,
    pub user_message: ChatMessage,
    pub reply: ChatMessage,
    /// `None` when classification failed and the apology was sent.
    pub classification: Option<ClassificationResult>,
    /// Recommended tools that exist in the catalog, strongest first.
    pub tools: Vec<ToolEntry>,
    /// The relationship level went up with this message.
    pub leveled_up: bool,
}

/// Clears the in-flight flag when a turn ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One conversation with its tools panel.
///
/// Shared by reference; at most one turn is processed at a time and a second
/// concurrent [`submit`](Self::submit) fails with [`SubmitError::Busy`].
pub struct ConversationOrchestrator {
    classifier: Arc<dyn IntentClassifier>,
    catalog: Arc<Catalog>,
    stores: Stores,
    view: Mutex<PanelView>,
    active_session: Mutex<Option<String>>,
    in_flight: AtomicBool,
}

impl ConversationOrchestrator {
    /// The panel starts on the category stored in settings.
    pub fn new(classifier: Arc<dyn IntentClassifier>, catalog: Arc<Catalog>, stores: Stores) -> Self {
        let filter = CategoryFilter::from_id(&stores.settings.get().default_category);
        Self {
            classifier,
            catalog,
            stores,
            view: Mutex::new(PanelView {
                filter,
                ..PanelView::default()
            }),
            active_session: Mutex::new(None),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    // ── Conversation ───────────────────────────────────────────────

    /// Run one conversational turn.
    ///
    /// Blank input is rejected, as is input arriving while a previous turn
    /// is still waiting on classification. A classifier error is answered
    /// with [`APOLOGY`] rather than returned.
    pub async fn submit(&self, content: &str) -> Result<Reply, SubmitError> {
        if content.trim().is_empty() {
            return Err(SubmitError::Empty);
        }
        let _guard = InFlight::acquire(&self.in_flight).ok_or(SubmitError::Busy)?;

        let session = self.ensure_active_session();
        let chats = &self.stores.chats;
        let user_message = chats.add_message(&session.id, NewMessage::user(content));
        self.stores.analytics.record_message();
        let interaction = self.stores.relationship.record_interaction();

        let reply = match self.classifier.classify(content).await {
            Ok(result) => {
                let tools: Vec<ToolEntry> = self
                    .catalog
                    .resolve(&result.suggested_tool_ids)
                    .into_iter()
                    .cloned()
                    .collect();

                {
                    let mut view = self.view.lock();
                    view.filter = CategoryFilter::from_id(&result.category);
                    view.highlighted = result.suggested_tool_ids.clone();
                }

                let mut history = session.messages;
                history.push(user_message.clone());
                let prefix = tone_prefix(detect_tone(&history), interaction.data.level);
                let refs: Vec<&ToolEntry> = tools.iter().collect();
                let text = format!(
                    "{prefix}{}",
                    compose_reply(content, &result.category, &refs, result.used_remote_service)
                );

                let mut message = NewMessage::jarvis(text)
                    .intent(result.intent.clone())
                    .category(result.category.clone());
                if let Some(top) = tools.first() {
                    message = message.tool(top.id.clone(), top.url.clone());
                }
                let reply = chats.add_message(&session.id, message);
                self.stores.analytics.record_category_usage(&result.category);

                tracing::info!(
                    session = %session.id,
                    category = %result.category,
                    tools = tools.len(),
                    remote = result.used_remote_service,
                    "Answered message"
                );
                Reply {
                    session_id: session.id,
                    user_message,
                    reply,
                    classification: Some(result),
                    tools,
                    leveled_up: interaction.leveled_up,
                }
            }
            Err(e) => {
                tracing::warn!(session = %session.id, "Classification failed: {e:#}");
                let reply = chats.add_message(&session.id, NewMessage::jarvis(APOLOGY));
                self.stores.analytics.record_error();
                Reply {
                    session_id: session.id,
                    user_message,
                    reply,
                    classification: None,
                    tools: Vec::new(),
                    leveled_up: interaction.leveled_up,
                }
            }
        };

        if reply.leveled_up {
            let level = self.stores.relationship.get().level;
            tracing::info!(level = level.number(), name = level.name(), "Relationship level up");
        }
        Ok(reply)
    }

    /// Greeting for an empty chat, warmer as the relationship grows.
    pub fn greeting(&self) -> String {
        let level = self.stores.relationship.get().level;
        format!("{} {}", level.emoji(), level.greeting())
    }

    // ── Sessions ───────────────────────────────────────────────────

    /// The session new messages go to.
    ///
    /// Tries the current session, then the stored active pointer, then the
    /// newest stored session, and creates a fresh one as a last resort.
    pub fn ensure_active_session(&self) -> ChatSession {
        let chats = &self.stores.chats;
        let current = self.active_session.lock().clone();
        let restored = current
            .or_else(|| chats.active_session_id())
            .and_then(|id| chats.get_session(&id))
            .or_else(|| chats.all_sessions().into_iter().next());

        match restored {
            Some(session) => {
                self.activate(&session.id);
                session
            }
            None => self.new_chat(),
        }
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.stores.chats.all_sessions()
    }

    pub fn active_session_id(&self) -> Option<String> {
        self.active_session.lock().clone()
    }

    pub fn new_chat(&self) -> ChatSession {
        let session = self.stores.chats.create_session(None);
        self.stores.analytics.record_session();
        *self.active_session.lock() = Some(session.id.clone());
        session
    }

    /// Switch to a stored session. Unknown ids change nothing.
    pub fn select_session(&self, id: &str) -> Option<ChatSession> {
        let session = self.stores.chats.get_session(id)?;
        self.activate(&session.id);
        Some(session)
    }

    /// Delete a session. Deleting the active one moves to the newest
    /// remaining session, or a fresh chat when none is left.
    pub fn delete_session(&self, id: &str) -> bool {
        let deleted = self.stores.chats.delete_session(id);
        let was_active = self.active_session.lock().as_deref() == Some(id);
        if was_active || self.stores.chats.active_session_id().as_deref() == Some(id) {
            *self.active_session.lock() = None;
            match self.sessions().into_iter().next() {
                Some(next) => self.activate(&next.id),
                None => {
                    self.new_chat();
                }
            }
        }
        deleted
    }

    /// Drop every stored session. The next turn starts a fresh one.
    pub fn clear_chats(&self) {
        self.stores.chats.clear_all();
        *self.active_session.lock() = None;
        tracing::info!("Cleared chat history");
    }

    fn activate(&self, id: &str) {
        self.stores.chats.set_active_session(id);
        *self.active_session.lock() = Some(id.to_string());
    }

    // ── Tools panel ────────────────────────────────────────────────

    pub fn view(&self) -> PanelView {
        self.view.lock().clone()
    }

    /// Set the category filter by id; unknown ids select everything.
    pub fn set_category_filter(&self, id: &str) -> CategoryFilter {
        let filter = CategoryFilter::from_id(id);
        self.view.lock().filter = filter;
        filter
    }

    pub fn set_search_query(&self, query: &str) {
        self.view.lock().search = query.to_string();
    }

    /// Panel contents for the current filter and search.
    pub fn visible_tools(&self) -> Vec<&ToolEntry> {
        let view = self.view();
        let prefs = self.stores.tool_prefs.all();
        rank_for_display(&self.catalog, view.filter, &view.search, &prefs)
    }

    /// Record a click on a tool and return its URL.
    pub fn open_tool(&self, id: &str) -> Option<String> {
        let tool = self.catalog.get(id)?;
        self.stores.tool_prefs.record_usage(id);
        self.stores.analytics.record_link_click(id);
        tracing::debug!(tool = id, "Opened tool");
        Some(tool.url.clone())
    }

    /// Returns the new favorite flag, or `None` for an unknown tool.
    pub fn toggle_favorite(&self, id: &str) -> Option<bool> {
        self.catalog
            .contains(id)
            .then(|| self.stores.tool_prefs.toggle_favorite(id))
    }

    /// Returns the new hidden flag, or `None` for an unknown tool.
    pub fn toggle_hidden(&self, id: &str) -> Option<bool> {
        self.catalog
            .contains(id)
            .then(|| self.stores.tool_prefs.toggle_hidden(id))
    }

    /// Forget usage counts, favorites and hidden flags.
    pub fn reset_tool_preferences(&self) {
        self.stores.tool_prefs.reset();
        self.view.lock().highlighted.clear();
        tracing::info!("Reset tool preferences");
    }

    pub fn reset_analytics(&self) {
        self.stores.analytics.reset();
        tracing::info!("Reset analytics");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{tool, Category};
    use crate::intent::{AssistantMode, IntentDetector, KeywordClassifier, KeywordLexicon};
    use crate::store::testing::BrokenKvStore;
    use crate::store::Role;
    use async_trait::async_trait;
    use std::time::Duration;

    fn catalog() -> Arc<Catalog> {
        Arc::new(Catalog::builtin())
    }

    fn offline(stores: Stores) -> ConversationOrchestrator {
        let catalog = catalog();
        let local = KeywordClassifier::new(KeywordLexicon::builtin(), catalog.clone());
        ConversationOrchestrator::new(Arc::new(IntentDetector::offline(local)), catalog, stores)
    }

    struct FailingClassifier;

    #[async_trait]
    impl IntentClassifier for FailingClassifier {
        async fn classify(&self, _input: &str) -> anyhow::Result<ClassificationResult> {
            anyhow::bail!("classifier exploded")
        }
    }

    /// Answers after a delay with a fixed result.
    struct SlowClassifier(ClassificationResult);

    #[async_trait]
    impl IntentClassifier for SlowClassifier {
        async fn classify(&self, _input: &str) -> anyhow::Result<ClassificationResult> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(self.0.clone())
        }
    }

    fn remote_result(category: &str, ids: &[&str]) -> ClassificationResult {
        ClassificationResult {
            intent: format!("User wants {category}"),
            category: category.into(),
            matched_keywords: Vec::new(),
            confidence: 0.9,
            suggested_tool_ids: ids.iter().map(|s| s.to_string()).collect(),
            used_remote_service: true,
            mode: AssistantMode::ToolFinder,
        }
    }

    #[tokio::test]
    async fn submit_records_both_messages_and_highlights() {
        let orch = offline(Stores::in_memory());
        let reply = orch.submit("make an anime style image").await.unwrap();

        let result = reply.classification.as_ref().unwrap();
        assert_eq!(result.category, "image");
        assert!(!result.used_remote_service);
        assert!(!reply.tools.is_empty());
        assert!(reply.reply.content.contains(QUICK_MATCH_NOTICE));
        assert_eq!(reply.reply.tool_used.as_deref(), Some(reply.tools[0].id.as_str()));
        assert_eq!(reply.reply.category.as_deref(), Some("image"));

        let session = orch.stores().chats.get_session(&reply.session_id).unwrap();
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[0].role, Role::User);
        assert_eq!(session.messages[1].role, Role::Jarvis);
        assert_eq!(session.title, "make an anime style image");

        let view = orch.view();
        assert_eq!(view.filter, CategoryFilter::Only(Category::Image));
        assert_eq!(view.highlighted, result.suggested_tool_ids);

        let analytics = orch.stores().analytics.get();
        assert_eq!(analytics.total_messages, 1);
        assert_eq!(analytics.category_usage["image"], 1);
    }

    #[tokio::test]
    async fn blank_input_is_rejected() {
        let orch = offline(Stores::in_memory());
        assert_eq!(orch.submit("   ").await.unwrap_err(), SubmitError::Empty);
        assert!(orch.sessions().is_empty());
    }

    #[tokio::test]
    async fn classifier_error_sends_apology() {
        let stores = Stores::in_memory();
        let orch = ConversationOrchestrator::new(Arc::new(FailingClassifier), catalog(), stores);
        let reply = orch.submit("make a video").await.unwrap();
        assert_eq!(reply.reply.content, APOLOGY);
        assert!(reply.classification.is_none());
        assert!(reply.tools.is_empty());
        assert_eq!(orch.stores().analytics.get().error_count, 1);
        assert!(!orch.is_busy());
    }

    #[tokio::test]
    async fn concurrent_submit_is_busy() {
        let orch = ConversationOrchestrator::new(
            Arc::new(SlowClassifier(remote_result("code", &["replit"]))),
            catalog(),
            Stores::in_memory(),
        );
        let (first, second) = tokio::join!(orch.submit("write code"), orch.submit("again"));
        assert!(first.is_ok());
        assert_eq!(second.unwrap_err(), SubmitError::Busy);
        assert!(!orch.is_busy());
        assert!(orch.submit("third").await.is_ok());
    }

    #[tokio::test]
    async fn remote_answer_drops_unknown_tools() {
        let orch = ConversationOrchestrator::new(
            Arc::new(SlowClassifier(remote_result("code", &["ghost", "replit"]))),
            catalog(),
            Stores::in_memory(),
        );
        let reply = orch.submit("build me an app").await.unwrap();
        assert_eq!(reply.tools.len(), 1);
        assert_eq!(reply.tools[0].id, "replit");
        assert!(reply.reply.content.contains("**Replit**"));
        assert!(!reply.reply.content.contains(QUICK_MATCH_NOTICE));
        assert_eq!(orch.view().highlighted, vec!["ghost", "replit"]);
    }

    #[tokio::test]
    async fn no_resolvable_tools_gives_generic_reply() {
        let orch = ConversationOrchestrator::new(
            Arc::new(SlowClassifier(remote_result("astrology", &["ghost"]))),
            catalog(),
            Stores::in_memory(),
        );
        let reply = orch.submit("read my stars").await.unwrap();
        assert!(reply.reply.content.ends_with("best AI tools for **astrology**."));
        assert!(reply.reply.tool_used.is_none());
        assert_eq!(orch.view().filter, CategoryFilter::All);
    }

    #[tokio::test]
    async fn broken_storage_never_fails_a_turn() {
        let orch = offline(Stores::new(Arc::new(BrokenKvStore)));
        let reply = orch.submit("compose a song").await.unwrap();
        assert_eq!(reply.classification.unwrap().category, "audio");
        assert_eq!(orch.open_tool("suno"), Some("https://suno.com".to_string()));
    }

    #[test]
    fn ensure_active_session_restores_stored_pointer() {
        let stores = Stores::in_memory();
        let older = stores.chats.create_session(Some("older"));
        stores.chats.create_session(Some("newer"));
        stores.chats.set_active_session(&older.id);

        let orch = offline(stores);
        assert_eq!(orch.ensure_active_session().id, older.id);
        assert_eq!(orch.active_session_id(), Some(older.id));
    }

    #[test]
    fn ensure_active_session_creates_when_empty() {
        let orch = offline(Stores::in_memory());
        let session = orch.ensure_active_session();
        assert_eq!(orch.sessions().len(), 1);
        assert_eq!(orch.ensure_active_session().id, session.id);
        assert_eq!(orch.stores().analytics.get().session_count, 1);
    }

    #[test]
    fn deleting_active_session_moves_on() {
        let orch = offline(Stores::in_memory());
        let a = orch.new_chat();
        let b = orch.new_chat();
        assert_eq!(orch.active_session_id(), Some(b.id.clone()));

        assert!(orch.delete_session(&b.id));
        assert_eq!(orch.active_session_id(), Some(a.id.clone()));

        assert!(orch.delete_session(&a.id));
        let fresh = orch.active_session_id().unwrap();
        assert_ne!(fresh, a.id);
        assert_eq!(orch.sessions().len(), 1);

        assert!(!orch.delete_session("chat_missing"));
        assert!(orch.select_session("chat_missing").is_none());
        assert_eq!(orch.active_session_id(), Some(fresh));
    }

    #[test]
    fn panel_operations() {
        let stores = Stores::in_memory();
        stores.settings.update(|s| s.default_category = "audio".into());
        let orch = offline(stores);
        assert_eq!(orch.view().filter, CategoryFilter::Only(Category::Audio));
        assert!(orch
            .visible_tools()
            .iter()
            .all(|t| t.category == Category::Audio));

        assert_eq!(orch.set_category_filter("nonsense"), CategoryFilter::All);
        assert_eq!(orch.visible_tools().len(), orch.catalog().iter().count());

        assert_eq!(orch.open_tool("canva"), Some("https://www.canva.com".to_string()));
        assert_eq!(orch.visible_tools()[0].id, "canva");

        assert_eq!(orch.toggle_favorite("suno"), Some(true));
        assert_eq!(orch.visible_tools()[0].id, "suno");

        assert_eq!(orch.toggle_hidden("suno"), Some(true));
        assert!(orch.visible_tools().iter().all(|t| t.id != "suno"));

        assert_eq!(orch.toggle_favorite("ghost"), None);
        assert_eq!(orch.open_tool("ghost"), None);

        orch.set_search_query("CANVA");
        let ids: Vec<&str> = orch.visible_tools().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["canva"]);

        assert_eq!(orch.stores().analytics.top_links(1)[0].tool_id, "canva");
    }

    #[tokio::test]
    async fn clear_chats_starts_over() {
        let orch = offline(Stores::in_memory());
        let first = orch.submit("make a logo").await.unwrap();
        orch.new_chat();
        assert_eq!(orch.sessions().len(), 2);

        orch.clear_chats();
        assert!(orch.sessions().is_empty());
        assert_eq!(orch.active_session_id(), None);
        assert_eq!(orch.stores().chats.active_session_id(), None);

        let next = orch.submit("make a logo").await.unwrap();
        assert_ne!(next.session_id, first.session_id);
        assert_eq!(orch.sessions().len(), 1);
    }

    #[tokio::test]
    async fn resets_clear_preferences_and_analytics() {
        let orch = offline(Stores::in_memory());
        orch.submit("compose a song").await.unwrap();
        orch.open_tool("suno");
        orch.toggle_favorite("canva");
        orch.toggle_hidden("runway");

        orch.reset_tool_preferences();
        assert!(orch.stores().tool_prefs.all().is_empty());
        assert!(orch.view().highlighted.is_empty());
        orch.set_category_filter("all");
        assert!(orch.visible_tools().iter().any(|t| t.id == "runway"));
        assert_eq!(orch.stores().analytics.top_links(1)[0].tool_id, "suno");

        orch.reset_analytics();
        let analytics = orch.stores().analytics.get();
        assert_eq!(analytics.total_messages, 0);
        assert!(orch.stores().analytics.top_links(5).is_empty());
        // Chat history is untouched by either reset.
        assert_eq!(orch.sessions().len(), 1);
    }

    #[test]
    fn greeting_follows_relationship() {
        let orch = offline(Stores::in_memory());
        assert!(orch.greeting().ends_with("Hello! Main JARVIS hoon. Kya karna hai?"));
        for _ in 0..3 {
            orch.stores().relationship.record_interaction();
        }
        assert!(orch.greeting().ends_with("Wapas aaye! Kya karna hai aaj?"));
    }

    #[test]
    fn panel_helper_tool_is_usable() {
        // Small catalogs work as well as the builtin one.
        let catalog = Arc::new(Catalog::new(vec![tool("x", "X", Category::Code, &[])]));
        let local = KeywordClassifier::new(KeywordLexicon::builtin(), catalog.clone());
        let orch = ConversationOrchestrator::new(
            Arc::new(IntentDetector::offline(local)),
            catalog,
            Stores::in_memory(),
        );
        assert_eq!(orch.visible_tools().len(), 1);
    }
}
