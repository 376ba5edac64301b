//! Identifier normalization ahead of an authoritative lookup

use thiserror::Error;
use url::Url;

/// Hosts that serve public Telegram links
const TELEGRAM_HOSTS: &[&str] = &["t.me", "telegram.me", "telegram.dog"];

/// Identifier in a form the chat platform can resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    /// Canonical `@name` form
    Username(String),
    /// Direct numeric chat id
    NumericId(i64),
}

impl Identifier {
    /// Value passed to the platform lookup
    pub fn as_lookup_key(&self) -> String {
        match self {
            Identifier::Username(name) => name.clone(),
            Identifier::NumericId(id) => id.to_string(),
        }
    }
}

/// Why an identifier cannot be looked up
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("identifier is empty")]
    Empty,
    #[error("private invite links cannot be resolved")]
    PrivateInvite,
    #[error("identifier is not a link, username or numeric id: {0}")]
    Unrecognized(String),
}

/// Normalize a raw identifier.
///
/// Links are reduced to their last path segment; invite links fail fast
/// because their token does not name the chat.
pub fn normalize(raw: &str) -> Result<Identifier, NormalizeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if is_link(raw) {
        return normalize_link(raw);
    }

    if let Some(name) = raw.strip_prefix('@') {
        return if is_valid_name(name) {
            Ok(Identifier::Username(format!("@{name}")))
        } else {
            Err(NormalizeError::Unrecognized(raw.to_string()))
        };
    }

    if let Some(id) = parse_numeric(raw) {
        return Ok(Identifier::NumericId(id));
    }

    Err(NormalizeError::Unrecognized(raw.to_string()))
}

fn is_link(raw: &str) -> bool {
    raw.contains("://") || raw.contains('/')
}

/// Non-empty path segments of a Telegram link, or `None` when `raw` is not one
pub(super) fn telegram_link_segments(raw: &str) -> Option<Vec<String>> {
    if !is_link(raw) {
        return None;
    }
    let parsed = if raw.contains("://") {
        Url::parse(raw)
    } else {
        Url::parse(&format!("https://{raw}"))
    }
    .ok()?;

    let host = parsed.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);
    if !TELEGRAM_HOSTS.contains(&host) {
        return None;
    }

    Some(
        parsed
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    )
}

/// Invite links carry an invitation token instead of the chat's name
pub(super) fn is_invite(segments: &[String]) -> bool {
    segments.iter().any(|s| s == "joinchat")
        || segments
            .last()
            .is_some_and(|last| last.starts_with('+') || last.starts_with("%2B"))
}

fn normalize_link(raw: &str) -> Result<Identifier, NormalizeError> {
    let segments =
        telegram_link_segments(raw).ok_or_else(|| NormalizeError::Unrecognized(raw.to_string()))?;
    if is_invite(&segments) {
        return Err(NormalizeError::PrivateInvite);
    }
    let Some(last) = segments.last() else {
        return Err(NormalizeError::Unrecognized(raw.to_string()));
    };

    let name = last.trim_start_matches('@');
    if let Some(id) = parse_numeric(name) {
        return Ok(Identifier::NumericId(id));
    }
    if is_valid_name(name) {
        Ok(Identifier::Username(format!("@{name}")))
    } else {
        Err(NormalizeError::Unrecognized(raw.to_string()))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_numeric(raw: &str) -> Option<i64> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
