//! Agent request payload.

use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// A single message to an agent.
///
/// The wire payload carries `user_id`, `agent_id`, `session_id` and
/// `message`, merged with any caller-supplied extra fields. Extras are
/// merged last, so an extra sharing a fixed key wins (last-write-wins).
#[derive(Debug, Clone)]
pub struct AgentRequest {
    user_id: String,
    agent_id: String,
    session_id: Option<String>,
    message: String,
    extra: Map<String, Value>,
    timeout: Option<Duration>,
}

impl AgentRequest {
    /// Create a request for an agent.
    pub fn new(
        user_id: impl Into<String>,
        agent_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            agent_id: agent_id.into(),
            session_id: None,
            message: message.into(),
            extra: Map::new(),
            timeout: None,
        }
    }

    /// Set an explicit session id for conversational continuity.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Add an extra payload field.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self> {
        let value = serde_json::to_value(value)?;
        self.extra.insert(key.into(), value);
        Ok(self)
    }

    /// Override the client's default timeout for this request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The agent this request addresses.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// The requesting user.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The effective session id: the explicit one if set, otherwise the
    /// agent id (session identity is agent-scoped by default).
    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or(&self.agent_id)
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the JSON body sent over the wire.
    pub(crate) fn to_payload(&self) -> Value {
        let mut payload = Map::new();
        payload.insert("user_id".into(), Value::String(self.user_id.clone()));
        payload.insert("agent_id".into(), Value::String(self.agent_id.clone()));
        payload.insert(
            "session_id".into(),
            Value::String(self.session_id().to_string()),
        );
        payload.insert("message".into(), Value::String(self.message.clone()));

        // Extras last: a colliding extra replaces the fixed field.
        for (key, value) in &self.extra {
            payload.insert(key.clone(), value.clone());
        }

        Value::Object(payload)
    }
}
