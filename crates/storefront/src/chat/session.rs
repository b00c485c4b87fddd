//! The assistant session state machine.
//!
//! A session is an ordered message log plus a pending flag, with two
//! observable states: idle and awaiting a reply. Submissions are guarded
//! (empty input and mid-flight submissions are no-ops), order/returns
//! intents are answered locally without touching the gateway, and every
//! gateway outcome - reply, reported error, transport failure - lands in
//! the log as an assistant turn. Nothing here is fatal: the worst failure
//! degrades to a visible conversational turn.

use tracing::{instrument, warn};

use super::gateway::{AssistantGateway, GatewayError};
use super::intent::{self, Intent};
use super::snapshot::SessionStore;
use super::types::{ChatMessage, Role};

/// Assistant reply used when the gateway returns an empty message.
const EMPTY_REPLY_PLACEHOLDER: &str = "(No answer returned.)";

/// Result of a submission, for the caller's UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Guard condition hit (blank input or a reply already pending); the
    /// log is unchanged.
    Ignored,
    /// An intent matcher answered locally; the gateway was not invoked.
    Intercepted(Intent),
    /// The gateway was invoked and the log now ends with an assistant turn
    /// (reply or surfaced failure).
    Replied,
}

/// Conversation session: ordered message log, local persistence, and the
/// remote gateway contract.
///
/// Collaborators are injected at construction - the gateway, the snapshot
/// store, and the catalog-name snapshot for the system directive - so the
/// state machine itself stays free of ambient state.
pub struct ChatSession<G, S> {
    gateway: G,
    store: S,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl<G: AssistantGateway, S: SessionStore> ChatSession<G, S> {
    /// Open a session, rehydrating from the snapshot store when possible.
    ///
    /// A prior log is adopted verbatim when it is well-formed and starts
    /// with a system message - including any embedded product list, even if
    /// stale. Otherwise (no snapshot, corrupt snapshot, or broken leading
    /// role) a fresh system directive is synthesized from `product_names`.
    pub fn open(gateway: G, store: S, product_names: &[String]) -> Self {
        let messages = match store.load() {
            Ok(Some(log)) if log.first().is_some_and(|m| m.role == Role::System) => log,
            Ok(Some(_)) => {
                warn!("discarding persisted session: first message is not a system directive");
                vec![ChatMessage::system(system_directive(product_names))]
            }
            Ok(None) => vec![ChatMessage::system(system_directive(product_names))],
            Err(e) => {
                warn!(error = %e, "discarding unreadable persisted session");
                vec![ChatMessage::system(system_directive(product_names))]
            }
        };

        Self {
            gateway,
            store,
            messages,
            pending: false,
        }
    }

    /// The ordered session log, system directive first.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a gateway call is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Submit a user message.
    ///
    /// Blank input, or input arriving while a reply is pending, is ignored.
    /// Order-tracking and returns questions are answered locally; anything
    /// else goes to the gateway with the full log. Failures are appended as
    /// assistant turns, never retried, and never silently dropped.
    #[instrument(skip(self, input))]
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let text = input.trim();
        if text.is_empty() || self.pending {
            return SubmitOutcome::Ignored;
        }

        if let Some(hit) = intent::classify(text) {
            self.append(ChatMessage::user(text));
            self.append(ChatMessage::assistant(hit.reply));
            return SubmitOutcome::Intercepted(hit.intent);
        }

        self.append(ChatMessage::user(text));
        self.pending = true;

        let reply = match self.gateway.complete(&self.messages).await {
            Ok(text) if text.is_empty() => ChatMessage::assistant(EMPTY_REPLY_PLACEHOLDER),
            Ok(text) => ChatMessage::assistant(text),
            Err(GatewayError::Reported(msg)) => {
                ChatMessage::assistant(format!("There was an error: {msg}"))
            }
            Err(GatewayError::Transport(msg)) => ChatMessage::assistant(format!("Error: {msg}")),
        };

        self.pending = false;
        self.append(reply);
        SubmitOutcome::Replied
    }

    /// Append a message and persist the full log.
    ///
    /// Logs holding only the initial system directive are not persisted, so
    /// opening the assistant without chatting leaves no snapshot behind.
    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > 1
            && let Err(e) = self.store.save(&self.messages)
        {
            warn!(error = %e, "failed to persist session snapshot");
        }
    }
}

/// Build the assistant's system directive from the current catalog names.
fn system_directive(product_names: &[String]) -> String {
    format!(
        "You are a helpful and friendly assistant for Core X, a sports clothing brand. You are \
         an expert on our products and can also answer general knowledge questions, especially \
         about fitness and wellness. If the user asks about order tracking or returns/exchanges, \
         politely explain that you can't access user-specific order data, but you can guide \
         them. For order tracking, instruct them to sign in and visit their orders page, or \
         contact support with their order number. For returns or exchanges, guide them to the \
         returns portal or contact support for assistance. Never make up personal information. \
         Available products: {}. If asked about stock level, say you do not have inventory data.",
        product_names.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::snapshot::MemorySessionStore;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Gateway double that serves scripted outcomes and counts invocations.
    #[derive(Default)]
    struct ScriptedGateway {
        calls: AtomicUsize,
        script: Mutex<VecDeque<Result<String, GatewayError>>>,
    }

    impl ScriptedGateway {
        fn replying(reply: &str) -> Self {
            let gateway = Self::default();
            gateway.push(Ok(reply.to_string()));
            gateway
        }

        fn push(&self, outcome: Result<String, GatewayError>) {
            self.script
                .lock()
                .expect("script lock")
                .push_back(outcome);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl AssistantGateway for &ScriptedGateway {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| Ok("scripted fallback".to_string()))
        }
    }

    fn names() -> Vec<String> {
        vec!["X-Perform Training Tee".to_string(), "X-Flex Sports Bra".to_string()]
    }

    #[test]
    fn test_fresh_session_starts_with_system_directive() {
        let gateway = ScriptedGateway::default();
        let session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        assert_eq!(session.messages().len(), 1);
        let first = &session.messages()[0];
        assert_eq!(first.role, Role::System);
        assert!(first.content.contains("X-Flex Sports Bra"));
        assert!(!session.is_pending());
    }

    #[test]
    fn test_opening_does_not_persist_lone_directive() {
        let gateway = ScriptedGateway::default();
        let store = MemorySessionStore::default();
        let _session = ChatSession::open(&gateway, store.clone(), &names());

        assert!(store.saved().is_none());
    }

    #[test]
    fn test_rehydrates_valid_snapshot_verbatim() {
        let prior = vec![
            ChatMessage::system("old directive with a stale product list"),
            ChatMessage::user("hi"),
            ChatMessage::assistant("hello!"),
        ];
        let gateway = ScriptedGateway::default();
        let store = MemorySessionStore::with_log(prior.clone());

        let session = ChatSession::open(&gateway, store, &names());
        assert_eq!(session.messages(), prior.as_slice());
    }

    #[test]
    fn test_discards_snapshot_without_leading_system_message() {
        let prior = vec![ChatMessage::user("hi"), ChatMessage::assistant("hello!")];
        let gateway = ScriptedGateway::default();
        let store = MemorySessionStore::with_log(prior);

        let session = ChatSession::open(&gateway, store, &names());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::System);
    }

    #[tokio::test]
    async fn test_blank_submission_is_ignored() {
        let gateway = ScriptedGateway::default();
        let mut session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        assert_eq!(session.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(session.submit("   \t ").await, SubmitOutcome::Ignored);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_intercepted_intent_never_reaches_gateway() {
        let gateway = ScriptedGateway::default();
        let store = MemorySessionStore::default();
        let mut session = ChatSession::open(&gateway, store.clone(), &names());

        let outcome = session.submit("where is my order #123").await;
        assert_eq!(outcome, SubmitOutcome::Intercepted(Intent::OrderTracking));
        assert_eq!(gateway.calls(), 0);

        let log = session.messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[1].role, Role::User);
        assert_eq!(log[2].role, Role::Assistant);
        assert!(log[2].content.contains("can't view personal order data"));

        // Interception persists like any other turn.
        assert_eq!(store.saved().as_deref(), Some(log));
    }

    #[tokio::test]
    async fn test_reply_appends_assistant_turn_and_persists() {
        let gateway = ScriptedGateway::replying("The joggers run true to size.");
        let store = MemorySessionStore::default();
        let mut session = ChatSession::open(&gateway, store.clone(), &names());

        let outcome = session.submit("do the joggers run small?").await;
        assert_eq!(outcome, SubmitOutcome::Replied);
        assert_eq!(gateway.calls(), 1);
        assert!(!session.is_pending());

        let log = session.messages();
        assert_eq!(log.len(), 3);
        assert_eq!(log[2].content, "The joggers run true to size.");
        assert_eq!(store.saved().as_deref(), Some(log));
    }

    #[tokio::test]
    async fn test_empty_reply_gets_placeholder() {
        let gateway = ScriptedGateway::replying("");
        let mut session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        session.submit("hello?").await;
        let last = session.messages().last().expect("turn");
        assert_eq!(last.content, EMPTY_REPLY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_reported_error_surfaces_as_turn() {
        let gateway = ScriptedGateway::default();
        gateway.push(Err(GatewayError::Reported("model overloaded".to_string())));
        let mut session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        let outcome = session.submit("hi there").await;
        assert_eq!(outcome, SubmitOutcome::Replied);
        assert!(!session.is_pending());

        let last = session.messages().last().expect("turn");
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "There was an error: model overloaded");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_turn() {
        let gateway = ScriptedGateway::default();
        gateway.push(Err(GatewayError::Transport("request timed out".to_string())));
        let mut session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        session.submit("hi there").await;
        let last = session.messages().last().expect("turn");
        assert_eq!(last.content, "Error: request timed out");
    }

    #[tokio::test]
    async fn test_session_recovers_after_failure() {
        // Failures are terminal per attempt, not per session.
        let gateway = ScriptedGateway::default();
        gateway.push(Err(GatewayError::Transport("connection refused".to_string())));
        gateway.push(Ok("Back online.".to_string()));
        let mut session = ChatSession::open(&gateway, MemorySessionStore::default(), &names());

        session.submit("first try").await;
        session.submit("second try").await;

        let last = session.messages().last().expect("turn");
        assert_eq!(last.content, "Back online.");
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test]
    async fn test_rehydration_roundtrip_after_conversation() {
        let gateway = ScriptedGateway::replying("Welcome back!");
        let store = MemorySessionStore::default();
        let mut session = ChatSession::open(&gateway, store.clone(), &names());
        session.submit("hello").await;
        let log = session.messages().to_vec();
        assert!(log.len() >= 2);
        drop(session);

        let rehydrated = ChatSession::open(&gateway, store, &names());
        assert_eq!(rehydrated.messages(), log.as_slice());
    }
}
