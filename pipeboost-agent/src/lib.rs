//! # pipeboost-agent
//!
//! Client for a remote conversational-agent inference API, plus the glue
//! that turns agent calls into [`pipeboost_core`] workflow steps.
//!
//! ## Components
//!
//! - [`AgentClient`]: request/response wrapper over the HTTP JSON API
//! - [`AgentRequest`]: the message payload, with agent-scoped session
//!   defaulting
//! - [`SessionManager`]: in-memory session ids and interaction history
//! - [`AgentStep`]: an agent call packaged as a workflow step
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pipeboost_agent::{AgentClient, AgentRequest};
//!
//! # async fn example() -> pipeboost_agent::Result<()> {
//! let client = AgentClient::builder()
//!     .api_key("sk-...")
//!     .build();
//!
//! let request = AgentRequest::new("user@example.com", "research_agent", "What is Rust?");
//! let answer = client.get_text(&request).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod prompt;
pub mod request;
pub mod session;
pub mod step;

pub use client::{AgentClient, AgentClientBuilder, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use error::{ApiError, Result};
pub use prompt::render_template;
pub use request::AgentRequest;
pub use session::{Interaction, Session, SessionManager};
pub use step::{AgentStep, StepRegistry, workflow_from_config};
