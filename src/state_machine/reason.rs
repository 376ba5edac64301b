//! Report categories offered to the user

use serde::{Deserialize, Serialize};

/// Prefix carried by every category button's callback data
pub const TOKEN_PREFIX: &str = "reason_";

/// Label stored for `Other`; the free-text explanation becomes the category
pub const OTHER_PLACEHOLDER: &str = "Other";

/// Closed set of report categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    Spam,
    IllegalContent,
    Phishing,
    AdultContent,
    Other,
}

impl ReportReason {
    /// All categories in the order they are shown to the user
    pub const ALL: [ReportReason; 5] = [
        ReportReason::Spam,
        ReportReason::IllegalContent,
        ReportReason::Phishing,
        ReportReason::AdultContent,
        ReportReason::Other,
    ];

    /// Category id without the token prefix
    pub fn id(self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::IllegalContent => "illegal_content",
            ReportReason::Phishing => "phishing",
            ReportReason::AdultContent => "adult_content",
            ReportReason::Other => "other",
        }
    }

    /// Callback data attached to the category button
    pub fn token(self) -> String {
        format!("{TOKEN_PREFIX}{}", self.id())
    }

    /// Caption shown on the category button
    pub fn caption(self) -> &'static str {
        match self {
            ReportReason::Spam => "Spam/Scam",
            ReportReason::IllegalContent => "Illegal Content/Copyright Infringement",
            ReportReason::Phishing => "Phishing/Malware",
            ReportReason::AdultContent => "Adult Content",
            ReportReason::Other => "Other",
        }
    }

    /// Parse a selection token, with or without the `reason_` prefix
    pub fn from_token(token: &str) -> Option<Self> {
        let id = token.strip_prefix(TOKEN_PREFIX).unwrap_or(token);
        Self::ALL.into_iter().find(|reason| reason.id() == id)
    }

    /// Human-readable label stored in the session
    pub fn label(self) -> String {
        match self {
            ReportReason::Other => OTHER_PLACEHOLDER.to_string(),
            _ => humanize_token(self.id()),
        }
    }
}

/// Turn a category token into a title-cased label.
///
/// `reason_illegal_content` becomes `Illegal Content`.
pub fn humanize_token(token: &str) -> String {
    token
        .strip_prefix(TOKEN_PREFIX)
        .unwrap_or(token)
        .split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
