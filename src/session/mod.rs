//! Conversation history storage
//!
//! Sessions are keyed by an opaque id and hold an append-only sequence of
//! turns. Storage grows without bound; model context is read through a
//! sliding window of the most recent turns. The store is injected into the
//! tutor service so it can be swapped for a bounded or external backend.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

pub mod types;
pub use types::{resolve_session_id, ConversationTurn, TurnRole, DEFAULT_SESSION_ID};

/// Keyed store of conversation turns
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append a turn to the tail of a session, creating the session lazily
    async fn append(&self, session_id: &str, turn: ConversationTurn);

    /// Up to `n` most recent turns of a session, oldest first
    async fn recent_window(&self, session_id: &str, n: usize) -> Vec<ConversationTurn>;

    /// Reset a session to an empty sequence
    async fn clear(&self, session_id: &str);

    /// The full sequence of a session
    async fn get(&self, session_id: &str) -> Vec<ConversationTurn>;
}

/// Process-lifetime in-memory session store
///
/// Nothing is persisted; a restart loses all history. The lock is held only
/// for the duration of a single map operation.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Vec<ConversationTurn>>>,
}

impl InMemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn session_count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn append(&self, session_id: &str, turn: ConversationTurn) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(session_id.to_string())
            .or_default()
            .push(turn);
    }

    async fn recent_window(&self, session_id: &str, n: usize) -> Vec<ConversationTurn> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(session_id)
            .map(|turns| turns[turns.len().saturating_sub(n)..].to_vec())
            .unwrap_or_default()
    }

    async fn clear(&self, session_id: &str) {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        sessions.insert(session_id.to_string(), Vec::new());
        tracing::debug!("Cleared history for session {}", session_id);
    }

    async fn get(&self, session_id: &str) -> Vec<ConversationTurn> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions.get(session_id).cloned().unwrap_or_default()
    }
}
