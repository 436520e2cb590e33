//! Error types for the workflow engine.

use thiserror::Error;

/// Result type for workflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;

/// Error types that can occur while building or running a workflow.
#[derive(Error, Debug)]
pub enum FlowError {
    /// Workflow construction error, raised before any run.
    #[error("Construction error: {0}")]
    Construction(String),

    /// Error raised inside a step's function during a run.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Workflow configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/Deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error.
    #[error("Error: {0}")]
    Generic(#[from] eyre::Report),
}

impl FlowError {
    /// Create a new construction error.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Create a new execution error.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<serde_yaml::Error> for FlowError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(format!("Error parsing YAML: {err}"))
    }
}
