//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use super::{DialogRuntime, Incoming, MemorySessionStore, SessionKey};
use crate::classifier::{EntityClassifier, EntityResolver, Identifier, ResolveError, ResolvedEntity};
use crate::markup::message_len;
use crate::state_machine::{DialogState, Event, Keyboard};
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Messenger
// ============================================================================

/// A message recorded by [`MockMessenger`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

/// Messenger that records everything it is asked to send
#[derive(Default)]
pub struct MockMessenger {
    pub sent: Mutex<Vec<SentMessage>>,
    pub acknowledged: Mutex<Vec<String>>,
    /// When set, every send fails with a network error
    pub fail_sends: Mutex<bool>,
    /// When set, longer texts are rejected like the Bot API does
    pub max_len: Mutex<Option<usize>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_text(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|m| m.text.clone())
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        if *self.fail_sends.lock().unwrap() {
            return Err(TelegramError::network("connection reset"));
        }
        if self
            .max_len
            .lock()
            .unwrap()
            .is_some_and(|max| message_len(text) > max)
        {
            return Err(TelegramError::api(Some(400), "Bad Request: message is too long"));
        }
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text: text.to_string(),
            keyboard: keyboard.cloned(),
        });
        Ok(())
    }

    async fn answer_selection(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.acknowledged
            .lock()
            .unwrap()
            .push(callback_id.to_string());
        Ok(())
    }
}

// ============================================================================
// Mock Resolver
// ============================================================================

/// Resolver returning queued results, optionally after a delay
pub struct MockResolver {
    responses: Mutex<VecDeque<Result<ResolvedEntity, ResolveError>>>,
    delay: Duration,
    /// Record of all lookups made
    pub lookups: Mutex<Vec<Identifier>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            delay,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub fn queue(&self, response: Result<ResolvedEntity, ResolveError>) {
        self.responses.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl EntityResolver for MockResolver {
    async fn resolve(&self, identifier: &Identifier) -> Result<ResolvedEntity, ResolveError> {
        self.lookups.lock().unwrap().push(identifier.clone());
        tokio::time::sleep(self.delay).await;
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ResolveError::Unavailable("no mock response queued".into())))
    }
}

// ============================================================================
// Test Harness
// ============================================================================

pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

pub type TestRuntime =
    DialogRuntime<Arc<MemorySessionStore>, Arc<MockMessenger>, Arc<MockResolver>>;

/// Runtime wired to mocks, with handles to inspect them
pub struct Harness {
    pub runtime: TestRuntime,
    pub sessions: Arc<MemorySessionStore>,
    pub messenger: Arc<MockMessenger>,
    pub resolver: Arc<MockResolver>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_resolver(MockResolver::new())
    }

    pub fn with_resolver(resolver: MockResolver) -> Self {
        let sessions = Arc::new(MemorySessionStore::new());
        let messenger = Arc::new(MockMessenger::new());
        let resolver = Arc::new(resolver);
        let runtime = DialogRuntime::new(
            Arc::clone(&sessions),
            Arc::clone(&messenger),
            EntityClassifier::new(Arc::clone(&resolver), LOOKUP_TIMEOUT),
        );
        Self {
            runtime,
            sessions,
            messenger,
            resolver,
        }
    }

    pub async fn send(&self, key: SessionKey, event: Event) {
        self.runtime
            .handle(Incoming { key, event })
            .await
            .expect("update handled");
    }

    pub async fn text(&self, key: SessionKey, text: &str) {
        self.send(key, Event::from_text(text)).await;
    }

    pub async fn select(&self, key: SessionKey, token: &str) {
        self.send(
            key,
            Event::Selection {
                token: token.to_string(),
                callback_id: format!("cb-{token}"),
            },
        )
        .await;
    }

    pub async fn state(&self, key: SessionKey) -> DialogState {
        self.sessions.load(key).await.unwrap().state
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::EntityKind;
    use crate::markup::MESSAGE_LIMIT;
    use crate::state_machine::transition::MAX_DETAIL_CHARS;
    use crate::state_machine::Command;
    use tokio::sync::mpsc;

    const USER: SessionKey = SessionKey {
        chat_id: 100,
        user_id: 7,
    };

    fn supergroup() -> ResolvedEntity {
        ResolvedEntity {
            id: 42,
            title: "Spam Bot".to_string(),
            kind: EntityKind::Supergroup,
            is_bot: false,
        }
    }

    #[tokio::test]
    async fn test_full_flow_with_resolved_chat() {
        let harness = Harness::new();
        harness.resolver.queue(Ok(supergroup()));

        harness.text(USER, "/report").await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingLink);

        harness.text(USER, "@iPapkornBot").await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingReason);
        let prompt = harness.messenger.sent_messages().pop().unwrap();
        assert_eq!(prompt.keyboard, Some(Keyboard::reasons()));

        harness.select(USER, "reason_spam").await;
        harness.text(USER, "Sends scam links").await;

        assert_eq!(harness.state(USER).await, DialogState::Idle);
        assert!(harness.sessions.load(USER).await.unwrap().is_cleared());

        let report = harness.messenger.last_text().unwrap();
        assert!(report.contains("*Chat Type:* Group"));
        assert!(report.contains("*Chat Title:* Spam Bot"));
        assert!(report.contains("*Chat ID:* 42"));
        assert!(report.contains("*Chat Link:* `@iPapkornBot`"));
        assert!(report.contains("*Relevant:* Spam"));
        assert!(report.contains("*Details:* Sends scam links"));

        assert_eq!(
            harness.resolver.lookups.lock().unwrap().as_slice(),
            [Identifier::Username("@iPapkornBot".to_string())]
        );
        assert_eq!(
            harness.messenger.acknowledged.lock().unwrap().as_slice(),
            ["cb-reason_spam".to_string()]
        );
    }

    #[tokio::test]
    async fn test_other_path_with_failed_lookup() {
        let harness = Harness::new();
        harness
            .resolver
            .queue(Err(ResolveError::NotFound("@ghost_channel".into())));

        harness.text(USER, "/report").await;
        harness.text(USER, "https://t.me/ghost_channel").await;
        harness.select(USER, "reason_other").await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingReason);
        harness.text(USER, "Impersonates a bank").await;

        assert_eq!(harness.state(USER).await, DialogState::Idle);
        let report = harness.messenger.last_text().unwrap();
        assert!(report.contains("*Chat Type:* Bot/Channel \\(Link\\)"));
        assert!(report.contains("*Chat Title:* ghost\\_channel"));
        assert!(report.contains("*Chat ID:* None"));
        assert!(report.contains("*Relevant:* Impersonates a bank"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_falls_back_to_heuristic() {
        let harness = Harness::with_resolver(MockResolver::with_delay(Duration::from_secs(120)));
        harness.resolver.queue(Ok(supergroup()));

        harness.text(USER, "/report").await;
        harness.text(USER, "@slow_bot").await;
        harness.select(USER, "reason_phishing").await;
        harness.text(USER, "Steals logins").await;

        let report = harness.messenger.last_text().unwrap();
        assert!(report.contains("*Chat Type:* Bot/Channel \\(Username\\)"));
        assert!(report.contains("*Chat Title:* slow\\_bot"));
        assert!(report.contains("*Relevant:* Phishing"));
    }

    #[tokio::test]
    async fn test_invite_link_is_group_without_lookup() {
        let harness = Harness::new();

        harness.text(USER, "/report").await;
        harness.text(USER, "https://t.me/joinchat/abc").await;
        harness.select(USER, "reason_adult_content").await;
        harness.text(USER, "NSFW spam").await;

        let report = harness.messenger.last_text().unwrap();
        assert!(report.contains("*Chat Type:* Group"));
        assert!(report.contains("*Relevant:* Adult Content"));
        assert!(harness.resolver.lookups.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_then_report_starts_fresh() {
        let harness = Harness::new();

        harness.text(USER, "/report").await;
        harness.text(USER, "@first").await;
        harness.select(USER, "reason_spam").await;
        harness.send(USER, Event::Command(Command::Cancel)).await;

        assert_eq!(harness.state(USER).await, DialogState::Idle);
        assert!(harness.sessions.load(USER).await.unwrap().is_cleared());

        harness.text(USER, "/report").await;
        let session = harness.sessions.load(USER).await.unwrap();
        assert_eq!(session.state, DialogState::AwaitingLink);
        assert!(session.report_link.is_none());
        assert!(session.reason_type.is_none());
    }

    #[tokio::test]
    async fn test_non_text_is_reprompted() {
        let harness = Harness::new();

        harness.text(USER, "/report").await;
        harness.send(USER, Event::NonText).await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingLink);

        harness.text(USER, "@target").await;
        harness.send(USER, Event::NonText).await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingReason);
        let last = harness.messenger.sent_messages().pop().unwrap();
        assert!(last.keyboard.is_some());
    }

    #[tokio::test]
    async fn test_users_do_not_share_sessions() {
        let harness = Harness::new();
        let other = SessionKey::new(100, 8);

        harness.text(USER, "/report").await;
        harness.text(other, "@not_a_link_step").await;

        assert_eq!(harness.state(USER).await, DialogState::AwaitingLink);
        assert_eq!(harness.state(other).await, DialogState::Idle);
    }

    #[tokio::test]
    async fn test_send_failure_is_reported_but_state_advances() {
        let harness = Harness::new();
        *harness.messenger.fail_sends.lock().unwrap() = true;

        let result = harness
            .runtime
            .handle(Incoming {
                key: USER,
                event: Event::Command(Command::Report),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(harness.state(USER).await, DialogState::AwaitingLink);
    }

    #[tokio::test]
    async fn test_long_explanation_still_yields_a_deliverable_report() {
        let harness = Harness::new();
        *harness.messenger.max_len.lock().unwrap() = Some(MESSAGE_LIMIT);

        harness.text(USER, "/report").await;
        harness.text(USER, "@flooder").await;
        harness.select(USER, "reason_other").await;

        // Over the capture limit: asked again, nothing lost
        harness.text(USER, &"spam. ".repeat(700)).await;
        assert_eq!(harness.state(USER).await, DialogState::AwaitingReason);
        assert!(harness.messenger.last_text().unwrap().contains("too long"));

        // Within the limit, but escaping doubles it past one message
        harness.text(USER, &".".repeat(MAX_DETAIL_CHARS)).await;
        assert_eq!(harness.state(USER).await, DialogState::Idle);
        let report = harness.messenger.last_text().unwrap();
        assert!(report.starts_with("*Report*"));
        assert!(message_len(&report) <= MESSAGE_LIMIT);
    }

    #[tokio::test]
    async fn test_rejected_report_sends_failure_notice() {
        let harness = Harness::new();
        *harness.messenger.max_len.lock().unwrap() = Some(200);

        harness.text(USER, "/report").await;
        harness.text(USER, "@target").await;
        harness.select(USER, "reason_spam").await;
        let result = harness
            .runtime
            .handle(Incoming {
                key: USER,
                event: Event::from_text("Sends scam links"),
            })
            .await;

        assert!(result.is_err());
        assert_eq!(harness.state(USER).await, DialogState::Idle);
        let notice = harness.messenger.last_text().unwrap();
        assert!(notice.contains("could not send your report"));
    }

    #[tokio::test]
    async fn test_run_loop_processes_in_order() {
        let harness = Harness::new();
        let Harness {
            runtime,
            sessions,
            messenger,
            ..
        } = harness;

        let (tx, rx) = mpsc::channel(8);
        let worker = tokio::spawn(runtime.run(rx));
        for event in [
            Event::from_text("/report"),
            Event::from_text("@queued"),
            Event::Selection {
                token: "reason_spam".into(),
                callback_id: "cb".into(),
            },
        ] {
            tx.send(Incoming { key: USER, event }).await.unwrap();
        }
        drop(tx);
        worker.await.unwrap();

        let session = sessions.load(USER).await.unwrap();
        assert_eq!(session.state, DialogState::AwaitingReason);
        assert_eq!(session.report_link.as_deref(), Some("@queued"));
        assert_eq!(session.reason_type.as_deref(), Some("Spam"));
        assert_eq!(messenger.sent_messages().len(), 3);
    }
}
