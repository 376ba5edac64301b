//! Runtime that drives report dialogues
//!
//! Updates from either delivery mode arrive on one channel and are handled
//! strictly one at a time: load the sender's session, run the pure
//! transition, store the new session, then execute the effects.

mod executor;
mod session_store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::DialogRuntime;
pub use session_store::MemorySessionStore;
pub use traits::*;

use crate::state_machine::Event;
use crate::telegram::TelegramClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Type alias for production runtime with concrete implementations
pub type ProductionRuntime =
    DialogRuntime<MemorySessionStore, Arc<TelegramClient>, Arc<TelegramClient>>;

/// Identifies one user's dialogue in one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub chat_id: i64,
    pub user_id: i64,
}

impl SessionKey {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// An inbound update, already translated into a dialogue event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming {
    pub key: SessionKey,
    pub event: Event,
}
