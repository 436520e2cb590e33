//! In-memory session tracking for agent conversations.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// One user/agent exchange recorded in a session.
#[derive(Debug, Clone)]
pub struct Interaction {
    /// The message sent by the user.
    pub user_message: String,
    /// The response from the agent.
    pub agent_response: String,
    /// When the interaction was stored.
    pub timestamp: DateTime<Utc>,
    /// Additional data attached by the caller.
    pub metadata: Map<String, Value>,
}

/// A tracked conversation session.
#[derive(Debug, Clone)]
pub struct Session {
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last written to.
    pub last_access: DateTime<Utc>,
    /// Agent associated with this session, if any.
    pub agent_id: Option<String>,
    /// Recorded interactions, oldest first.
    pub history: Vec<Interaction>,
}

/// Manages agent sessions and the API key used with them.
///
/// Owns its state: there is no process-wide default session or identity.
/// Callers wire a manager into their own code; the client does not consult
/// it.
#[derive(Debug, Default)]
pub struct SessionManager {
    api_key: Option<String>,
    sessions: HashMap<String, Session>,
}

impl SessionManager {
    /// Create a manager, optionally holding an API key for its sessions.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            sessions: HashMap::new(),
        }
    }

    /// The API key held for these sessions, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Generate and register a unique session id.
    pub fn generate_session_id(&mut self, agent_id: Option<&str>, prefix: &str) -> String {
        let session_id = format!("{prefix}{}", Uuid::new_v4().simple());
        let now = Utc::now();

        self.sessions.insert(
            session_id.clone(),
            Session {
                created_at: now,
                last_access: now,
                agent_id: agent_id.map(str::to_owned),
                history: Vec::new(),
            },
        );

        debug!(session_id = %session_id, "generated new session id");
        session_id
    }

    /// Look up a session.
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Record a user/agent exchange in a session's history.
    pub fn store_interaction(
        &mut self,
        session_id: &str,
        user_message: impl Into<String>,
        agent_response: impl Into<String>,
        metadata: Option<Map<String, Value>>,
    ) -> Result<()> {
        let session = self.session_mut(session_id)?;
        let now = Utc::now();

        session.history.push(Interaction {
            user_message: user_message.into(),
            agent_response: agent_response.into(),
            timestamp: now,
            metadata: metadata.unwrap_or_default(),
        });
        session.last_access = now;

        debug!(session_id = %session_id, "stored interaction");
        Ok(())
    }

    /// The interaction history of a session, oldest first.
    pub fn history(&self, session_id: &str) -> Result<&[Interaction]> {
        self.sessions
            .get(session_id)
            .map(|session| session.history.as_slice())
            .ok_or_else(|| not_found(session_id))
    }

    /// Drop a session's history, keeping the session itself.
    pub fn clear_session(&mut self, session_id: &str) -> Result<()> {
        self.session_mut(session_id)?.history.clear();
        Ok(())
    }

    /// Delete a session entirely.
    pub fn delete_session(&mut self, session_id: &str) -> Result<()> {
        self.sessions
            .remove(session_id)
            .map(|_| ())
            .ok_or_else(|| not_found(session_id))
    }

    fn session_mut(&mut self, session_id: &str) -> Result<&mut Session> {
        self.sessions
            .get_mut(session_id)
            .ok_or_else(|| not_found(session_id))
    }
}

fn not_found(session_id: &str) -> ApiError {
    ApiError::new(format!("session {session_id} not found"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn generated_ids_are_unique_and_prefixed() {
        let mut manager = SessionManager::default();

        let first = manager.generate_session_id(Some("agent-1"), "chat-");
        let second = manager.generate_session_id(None, "chat-");

        assert_ne!(first, second);
        assert!(first.starts_with("chat-"));
        assert_eq!(
            manager.session(&first).unwrap().agent_id.as_deref(),
            Some("agent-1")
        );
    }

    #[test]
    fn history_round_trip() {
        let mut manager = SessionManager::new(Some("key".into()));
        let id = manager.generate_session_id(None, "");

        let mut metadata = Map::new();
        metadata.insert("latency_ms".into(), json!(120));
        manager
            .store_interaction(&id, "hello", "hi there", Some(metadata))
            .unwrap();
        manager.store_interaction(&id, "more?", "sure", None).unwrap();

        let history = manager.history(&id).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].agent_response, "hi there");
        assert_eq!(history[0].metadata["latency_ms"], json!(120));

        manager.clear_session(&id).unwrap();
        assert!(manager.history(&id).unwrap().is_empty());

        manager.delete_session(&id).unwrap();
        assert!(manager.history(&id).is_err());
    }

    #[test]
    fn unknown_session_is_an_error() {
        let mut manager = SessionManager::default();
        assert!(manager.store_interaction("nope", "a", "b", None).is_err());
        assert!(manager.delete_session("nope").is_err());
    }
}
