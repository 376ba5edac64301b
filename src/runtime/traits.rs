//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use super::SessionKey;
use crate::state_machine::Keyboard;
use crate::state_machine::Session;
use crate::telegram::TelegramError;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound side of the chat platform
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a `MarkdownV2` message, optionally with an inline keyboard
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError>;

    /// Acknowledge a pressed inline button
    async fn answer_selection(&self, callback_id: &str) -> Result<(), TelegramError>;
}

/// Storage for per-user dialogue sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Get the session for a key; unknown keys yield an empty session
    async fn load(&self, key: SessionKey) -> Result<Session, String>;

    /// Replace the session for a key
    async fn save(&self, key: SessionKey, session: Session) -> Result<(), String>;

    /// Drop all dialogue data for a key
    async fn clear(&self, key: SessionKey) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        (**self).send_message(chat_id, text, keyboard).await
    }

    async fn answer_selection(&self, callback_id: &str) -> Result<(), TelegramError> {
        (**self).answer_selection(callback_id).await
    }
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn load(&self, key: SessionKey) -> Result<Session, String> {
        (**self).load(key).await
    }

    async fn save(&self, key: SessionKey, session: Session) -> Result<(), String> {
        (**self).save(key, session).await
    }

    async fn clear(&self, key: SessionKey) -> Result<(), String> {
        (**self).clear(key).await
    }
}
