//! In-memory session store keyed by chat and user

use super::traits::SessionStore;
use super::SessionKey;
use crate::state_machine::Session;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local session storage. Cleared sessions are removed, so the map
/// only holds dialogues that are in progress.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<SessionKey, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, key: SessionKey) -> Result<Session, String> {
        Ok(self
            .sessions
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, key: SessionKey, session: Session) -> Result<(), String> {
        let mut sessions = self.sessions.write().await;
        if session.is_cleared() {
            sessions.remove(&key);
        } else {
            sessions.insert(key, session);
        }
        Ok(())
    }

    async fn clear(&self, key: SessionKey) -> Result<(), String> {
        self.sessions.write().await.remove(&key);
        Ok(())
    }
}
