use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::model::DceSession;
use crate::error::{DceError, Result};

/// Conversation id to session directory.
///
/// Sessions are only ever added; ending a conversation deactivates its
/// session's monitor but leaves the entry in place.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<DceSession>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under its conversation id.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the id is already registered.
    pub async fn add(&self, session: Arc<DceSession>) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        let id = session.conversation_id().to_string();
        if sessions.contains_key(&id) {
            return Err(DceError::invalid_input(format!(
                "Session '{id}' is already registered"
            )));
        }
        sessions.insert(id, session);
        Ok(())
    }

    /// Looks up a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get(&self, conversation_id: &str) -> Result<Arc<DceSession>> {
        self.sessions
            .read()
            .await
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| DceError::not_found("session", conversation_id))
    }

    pub async fn contains(&self, conversation_id: &str) -> bool {
        self.sessions.read().await.contains_key(conversation_id)
    }

    /// Returns every registered session, ordered by conversation id.
    pub async fn list(&self) -> Vec<Arc<DceSession>> {
        let sessions = self.sessions.read().await;
        let mut all: Vec<_> = sessions.values().cloned().collect();
        all.sort_by(|a, b| a.conversation_id().cmp(b.conversation_id()));
        all
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
