//! Dialogue runtime executor

use super::traits::{Messenger, SessionStore};
use super::{Incoming, SessionKey};
use crate::classifier::{EntityClassifier, EntityResolver};
use crate::markup::escape;
use crate::report::synthesize;
use crate::state_machine::{transition, Effect, ReportDraft, Session};
use tokio::sync::mpsc;

/// Sent when the finished report itself could not be delivered
const REPORT_FAILED_TEXT: &str =
    "Sorry, I could not send your report. Please send /report to try again.";

/// Generic dialogue runtime that can work with any session store, messenger
/// and resolver implementations
pub struct DialogRuntime<S, M, R>
where
    S: SessionStore,
    M: Messenger,
    R: EntityResolver,
{
    sessions: S,
    messenger: M,
    classifier: EntityClassifier<R>,
}

impl<S, M, R> DialogRuntime<S, M, R>
where
    S: SessionStore,
    M: Messenger,
    R: EntityResolver,
{
    pub fn new(sessions: S, messenger: M, classifier: EntityClassifier<R>) -> Self {
        Self {
            sessions,
            messenger,
            classifier,
        }
    }

    /// Process updates until every sender is dropped
    pub async fn run(self, mut updates: mpsc::Receiver<Incoming>) {
        tracing::info!("Starting dialogue runtime");

        // One update at a time keeps each user's dialogue strictly ordered
        while let Some(incoming) = updates.recv().await {
            let key = incoming.key;
            if let Err(e) = self.handle(incoming).await {
                tracing::error!(session = %key, error = %e, "Error handling update");
            }
        }

        tracing::info!("Dialogue runtime stopped");
    }

    /// Handle one inbound update end to end
    pub async fn handle(&self, incoming: Incoming) -> Result<(), String> {
        let Incoming { key, event } = incoming;

        let session = match self.sessions.load(key).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(session = %key, error = %e, "Failed to load session, starting empty");
                Session::default()
            }
        };

        let event_kind = event.kind();
        let result = transition(&session, event);
        tracing::debug!(
            session = %key,
            event = event_kind,
            from = %session.state,
            to = %result.new_session.state,
            effects = result.effects.len(),
            "Transition"
        );

        if result.new_session.is_cleared() {
            self.sessions.clear(key).await?;
        } else {
            self.sessions.save(key, result.new_session).await?;
        }

        let mut failures = Vec::new();
        for effect in result.effects {
            if let Err(e) = self.execute_effect(key, effect).await {
                tracing::warn!(session = %key, error = %e, "Effect failed");
                failures.push(e);
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(failures.join("; "))
        }
    }

    async fn execute_effect(&self, key: SessionKey, effect: Effect) -> Result<(), String> {
        match effect {
            Effect::Reply { text, keyboard } => self
                .messenger
                .send_message(key.chat_id, &text, keyboard.as_ref())
                .await
                .map_err(|e| format!("send failed: {e}")),

            Effect::AcknowledgeSelection { callback_id } => self
                .messenger
                .answer_selection(&callback_id)
                .await
                .map_err(|e| format!("callback answer failed: {e}")),

            Effect::GenerateReport { draft } => self.generate_report(key, &draft).await,
        }
    }

    async fn generate_report(&self, key: SessionKey, draft: &ReportDraft) -> Result<(), String> {
        let classification = self.classifier.classify(&draft.report_link).await;
        tracing::info!(
            session = %key,
            chat_type = %classification.chat_type,
            reason = draft.reason_type.as_deref().unwrap_or("none"),
            "Report generated"
        );

        let text = synthesize(draft, &classification);
        let Err(e) = self.messenger.send_message(key.chat_id, &text, None).await else {
            return Ok(());
        };

        // Session is already cleared at this point
        if let Err(notice_error) = self
            .messenger
            .send_message(key.chat_id, &escape(REPORT_FAILED_TEXT), None)
            .await
        {
            tracing::warn!(
                session = %key,
                error = %notice_error,
                "Failed to send report failure notice"
            );
        }
        Err(format!("report delivery failed: {e}"))
    }
}
