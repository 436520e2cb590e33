//! HTTP client for the agent inference API.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error};

use crate::{
    error::{ApiError, Result},
    request::AgentRequest,
};

/// Production inference endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://agent-prod.studio.lyzr.ai/v3/inference/chat/";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a remote conversational-agent inference endpoint.
///
/// Sends a JSON payload over a single POST, attaches the API key as an
/// `x-api-key` header when one is configured (absence is allowed; some
/// deployments rely on environment-level auth), and parses the JSON
/// response. One attempt per call: no retry, no caching, no rate limiting.
#[derive(Debug, Clone)]
pub struct AgentClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AgentClient {
    /// Create a client builder.
    pub fn builder() -> AgentClientBuilder {
        AgentClientBuilder::new()
    }

    /// Create a client with default endpoint and timeout and no API key.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send a request and return the raw JSON response.
    ///
    /// A transport failure, a non-2xx status or an undecodable response body
    /// all surface as [`ApiError`].
    pub async fn send(&self, request: &AgentRequest) -> Result<Value> {
        debug!(
            endpoint = %self.endpoint,
            agent_id = %request.agent_id(),
            session_id = %request.session_id(),
            "sending agent request"
        );

        let timeout = request.timeout().unwrap_or(self.timeout);
        let mut http_request = self
            .http
            .post(&self.endpoint)
            .timeout(timeout)
            .json(&request.to_payload());

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("x-api-key", api_key);
        }

        let response = http_request
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .inspect_err(|err| error!(agent_id = %request.agent_id(), "agent request failed: {err}"))?;

        let data: Value = response
            .json()
            .await
            .inspect_err(|err| error!(agent_id = %request.agent_id(), "failed to parse agent response: {err}"))?;

        debug!(agent_id = %request.agent_id(), "received agent response");
        Ok(data)
    }

    /// Send a request and return just the agent's text response.
    ///
    /// The response body is expected to contain a string at `data.response`;
    /// a well-formed JSON object missing that path is a contract violation
    /// and raises [`ApiError`] rather than yielding an empty string.
    pub async fn get_text(&self, request: &AgentRequest) -> Result<String> {
        let data = self.send(request).await?;

        data.pointer("/data/response")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                ApiError::new("unexpected response format: missing data.response field")
            })
    }
}

impl Default for AgentClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`AgentClient`].
pub struct AgentClientBuilder {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl AgentClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the API key attached as the `x-api-key` header.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the default per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> AgentClient {
        AgentClient {
            http: reqwest::Client::new(),
            endpoint: self.endpoint,
            api_key: self.api_key,
            timeout: self.timeout,
        }
    }
}

impl Default for AgentClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
