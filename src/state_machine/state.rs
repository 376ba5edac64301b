//! Dialogue state types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Dialogue State
// ============================================================================

/// Which step of the report dialogue the user is in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DialogState {
    /// No report in progress
    #[default]
    Idle,

    /// Waiting for the username or link of the chat being reported
    AwaitingLink,

    /// Waiting for a category selection and/or the free-text explanation
    AwaitingReason,
}

impl DialogState {
    pub fn as_str(self) -> &'static str {
        match self {
            DialogState::Idle => "idle",
            DialogState::AwaitingLink => "awaiting_link",
            DialogState::AwaitingReason => "awaiting_reason",
        }
    }
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Session
// ============================================================================

/// Per-user dialogue record
///
/// Created empty on `/report`, filled field by field as the user answers,
/// and reset to the default once the report is sent or the dialogue is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Session {
    pub state: DialogState,
    pub report_link: Option<String>,
    pub reason_type: Option<String>,
    pub detailed_reason: Option<String>,
}

impl Session {
    /// Fresh session positioned at the first dialogue step
    pub fn started() -> Self {
        Self {
            state: DialogState::AwaitingLink,
            ..Self::default()
        }
    }

    /// True when the session carries no dialogue data at all
    pub fn is_cleared(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.report_link = Some(link.into());
        self.state = DialogState::AwaitingReason;
        self
    }

    #[must_use]
    pub fn with_reason_type(mut self, label: impl Into<String>) -> Self {
        self.reason_type = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.detailed_reason = Some(details.into());
        self
    }
}
