//! Error type for agent API interactions.

use pipeboost_core::error::FlowError;
use thiserror::Error;

/// Result type for agent API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Unified error for everything that can go wrong talking to an agent:
/// transport failures, non-2xx responses, undecodable JSON and
/// contract-violating response shapes all collapse into this one kind,
/// carrying the underlying cause's message.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct ApiError {
    message: String,
}

impl ApiError {
    /// Create an error from a human-readable cause message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The underlying cause message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("failed to communicate with agent API: {err}"))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("invalid agent API payload: {err}"))
    }
}

// A step that propagates an agent failure keeps the cause message verbatim.
impl From<ApiError> for FlowError {
    fn from(err: ApiError) -> Self {
        FlowError::execution(err.message)
    }
}
