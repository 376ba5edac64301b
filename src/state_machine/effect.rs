//! Effects produced by state transitions

use super::reason::ReportReason;
use super::state::Session;
use crate::markup;

/// A single inline button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub caption: String,
    pub token: String,
}

/// Inline keyboard attached to a reply, one row per entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    /// Vertical list of the report categories
    pub fn reasons() -> Self {
        Self {
            rows: ReportReason::ALL
                .into_iter()
                .map(|reason| {
                    vec![Button {
                        caption: reason.caption().to_string(),
                        token: reason.token(),
                    }]
                })
                .collect(),
        }
    }
}

/// Snapshot of a completed dialogue, handed to the report generator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDraft {
    pub report_link: String,
    pub reason_type: Option<String>,
    pub detailed_reason: String,
}

impl ReportDraft {
    /// Snapshot a session that has both a target and an explanation
    pub fn from_session(session: &Session) -> Option<Self> {
        Some(Self {
            report_link: session.report_link.clone()?,
            reason_type: session.reason_type.clone(),
            detailed_reason: session.detailed_reason.clone()?,
        })
    }
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a `MarkdownV2` message to the user
    Reply {
        text: String,
        keyboard: Option<Keyboard>,
    },

    /// Stop the loading indicator on a pressed button
    AcknowledgeSelection { callback_id: String },

    /// Classify the reported chat, synthesize the report and send it
    GenerateReport { draft: ReportDraft },
}

impl Effect {
    /// Reply with already formatted `MarkdownV2`
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard: None,
        }
    }

    /// Reply with plain text, escaped for `MarkdownV2`
    pub fn reply_plain(text: &str) -> Self {
        Self::reply(markup::escape(text))
    }

    /// Reply carrying the category keyboard
    pub fn reply_with_reasons(text: impl Into<String>) -> Self {
        Effect::Reply {
            text: text.into(),
            keyboard: Some(Keyboard::reasons()),
        }
    }

    pub fn acknowledge(callback_id: impl Into<String>) -> Self {
        Effect::AcknowledgeSelection {
            callback_id: callback_id.into(),
        }
    }

    pub fn generate_report(draft: ReportDraft) -> Self {
        Effect::GenerateReport { draft }
    }
}
