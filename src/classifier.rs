//! Reported-chat classification
//!
//! Two tiers: an authoritative lookup through the chat platform, and a
//! string-shape heuristic used whenever the lookup cannot be made or does
//! not answer in time. Classification itself never fails.

mod heuristic;
mod normalize;

pub use heuristic::classify_heuristic;
pub use normalize::{normalize, Identifier, NormalizeError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Placeholder for fields that could not be determined
pub const NONE_PLACEHOLDER: &str = "None";

// ============================================================================
// Resolver collaborator
// ============================================================================

/// Kind of chat reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Private,
    Group,
    Supergroup,
    Channel,
}

/// Authoritative metadata about a chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub id: i64,
    pub title: String,
    pub kind: EntityKind,
    pub is_bot: bool,
}

/// Resolver failure; only ever logged, never shown to the user
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("chat not found: {0}")]
    NotFound(String),
    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}

/// Maps an identifier to authoritative chat metadata
#[async_trait]
pub trait EntityResolver: Send + Sync {
    async fn resolve(&self, identifier: &Identifier) -> Result<ResolvedEntity, ResolveError>;
}

#[async_trait]
impl<T: EntityResolver + ?Sized> EntityResolver for Arc<T> {
    async fn resolve(&self, identifier: &Identifier) -> Result<ResolvedEntity, ResolveError> {
        (**self).resolve(identifier).await
    }
}

// ============================================================================
// Classification
// ============================================================================

/// Semantic chat type shown in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Channel,
    Group,
    PrivateChat,
    Bot,
    BotOrChannelUsername,
    BotOrChannelLink,
    Unknown,
}

impl ChatType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChatType::Channel => "Channel",
            ChatType::Group => "Group",
            ChatType::PrivateChat => "Private Chat (User)",
            ChatType::Bot => "Bot",
            ChatType::BotOrChannelUsername => "Bot/Channel (Username)",
            ChatType::BotOrChannelLink => "Bot/Channel (Link)",
            ChatType::Unknown => "Unknown",
        }
    }

    fn from_entity(kind: EntityKind, is_bot: bool) -> Self {
        match kind {
            EntityKind::Channel => ChatType::Channel,
            EntityKind::Group | EntityKind::Supergroup => ChatType::Group,
            EntityKind::Private if is_bot => ChatType::Bot,
            EntityKind::Private => ChatType::PrivateChat,
        }
    }
}

impl fmt::Display for ChatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a reported chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub chat_type: ChatType,
    pub chat_title: Option<String>,
    pub chat_id: Option<String>,
}

impl Classification {
    pub fn new(chat_type: ChatType) -> Self {
        Self {
            chat_type,
            chat_title: None,
            chat_id: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.chat_title = (!title.is_empty()).then_some(title);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.chat_id = Some(id.into());
        self
    }

    /// Title or the `None` placeholder
    pub fn title(&self) -> &str {
        self.chat_title.as_deref().unwrap_or(NONE_PLACEHOLDER)
    }

    /// Id or the `None` placeholder
    pub fn id(&self) -> &str {
        self.chat_id.as_deref().unwrap_or(NONE_PLACEHOLDER)
    }
}

impl From<ResolvedEntity> for Classification {
    fn from(entity: ResolvedEntity) -> Self {
        Classification::new(ChatType::from_entity(entity.kind, entity.is_bot))
            .with_title(entity.title)
            .with_id(entity.id.to_string())
    }
}

/// Two-tier classifier with a bounded lookup
pub struct EntityClassifier<R: EntityResolver> {
    resolver: R,
    lookup_timeout: Duration,
}

impl<R: EntityResolver> EntityClassifier<R> {
    pub fn new(resolver: R, lookup_timeout: Duration) -> Self {
        Self {
            resolver,
            lookup_timeout,
        }
    }

    /// Classify the identifier the user supplied.
    ///
    /// Any lookup failure, including a timeout, degrades to
    /// [`classify_heuristic`] on the raw identifier.
    pub async fn classify(&self, raw: &str) -> Classification {
        let identifier = match normalize(raw) {
            Ok(identifier) => identifier,
            Err(e) => {
                tracing::debug!(identifier = %raw, reason = %e, "Skipping lookup");
                return classify_heuristic(raw);
            }
        };

        let start = Instant::now();
        match tokio::time::timeout(self.lookup_timeout, self.resolver.resolve(&identifier)).await {
            Ok(Ok(entity)) => {
                tracing::info!(
                    identifier = %identifier.as_lookup_key(),
                    chat_id = entity.id,
                    duration_ms = %start.elapsed().as_millis(),
                    "Chat resolved"
                );
                entity.into()
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    identifier = %identifier.as_lookup_key(),
                    error = %e,
                    "Lookup failed, using heuristic classification"
                );
                classify_heuristic(raw)
            }
            Err(_) => {
                tracing::warn!(
                    identifier = %identifier.as_lookup_key(),
                    timeout_ms = %self.lookup_timeout.as_millis(),
                    "Lookup timed out, using heuristic classification"
                );
                classify_heuristic(raw)
            }
        }
    }
}
