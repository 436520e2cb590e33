//! Agent calls packaged as workflow steps.

use std::{collections::HashMap, sync::Arc, time::Duration};

use pipeboost_core::{
    config::WorkflowConfig,
    error::{FlowError, Result},
    step::{Step, StepFn, StepSpec},
    workflow::Workflow,
};
use serde_json::Value;
use tracing::debug;

use crate::{client::AgentClient, prompt::render_template, request::AgentRequest};

/// Named custom step implementations, keyed by the step name used in a
/// workflow configuration.
pub type StepRegistry = HashMap<String, StepFn>;

/// A workflow step that delegates its work to an agent.
///
/// When run, the step renders its message (through the prompt template if
/// one is set, otherwise the pipeline value itself: strings pass through,
/// anything else is serialized to JSON text), sends it to the agent, and
/// yields the agent's text response as the new pipeline value.
#[derive(Debug, Clone)]
pub struct AgentStep {
    name: String,
    client: Arc<AgentClient>,
    user_id: String,
    agent_id: String,
    session_id: Option<String>,
    prompt_template: Option<String>,
    timeout: Option<Duration>,
}

impl AgentStep {
    /// Create an agent-backed step.
    pub fn new(
        name: impl Into<String>,
        client: Arc<AgentClient>,
        user_id: impl Into<String>,
        agent_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            user_id: user_id.into(),
            agent_id: agent_id.into(),
            session_id: None,
            prompt_template: None,
            timeout: None,
        }
    }

    /// Set an explicit session id (defaults to the agent id on the wire).
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Set a `{placeholder}` template for the outgoing message.
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = Some(template.into());
        self
    }

    /// Override the client timeout for this step's requests.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Convert into a core workflow [`Step`].
    pub fn into_step(self) -> Step {
        let Self {
            name,
            client,
            user_id,
            agent_id,
            session_id,
            prompt_template,
            timeout,
        } = self;

        let step_name = name.clone();
        Step::new(name, move |data: Value| {
            let client = client.clone();
            let user_id = user_id.clone();
            let agent_id = agent_id.clone();
            let session_id = session_id.clone();
            let prompt_template = prompt_template.clone();
            let step_name = step_name.clone();

            async move {
                let message = match &prompt_template {
                    Some(template) => render_template(template, &data)?,
                    None => match data {
                        Value::String(text) => text,
                        other => other.to_string(),
                    },
                };

                debug!(step = %step_name, agent_id = %agent_id, "calling agent");

                let mut request = AgentRequest::new(user_id, agent_id, message);
                if let Some(session_id) = session_id {
                    request = request.with_session(session_id);
                }
                if let Some(timeout) = timeout {
                    request = request.with_timeout(timeout);
                }

                let response = client.get_text(&request).await?;
                Ok(Value::String(response))
            }
        })
    }
}

impl From<AgentStep> for Step {
    fn from(agent_step: AgentStep) -> Self {
        agent_step.into_step()
    }
}

impl From<AgentStep> for StepSpec {
    fn from(agent_step: AgentStep) -> Self {
        agent_step.into_step().into()
    }
}

/// Assemble a runnable workflow from a declarative configuration.
///
/// Each configured step resolves to a custom implementation registered under
/// its name, or to an [`AgentStep`] when the config names an `agent_id`.
/// A step with neither is a configuration error.
pub fn workflow_from_config(
    config: &WorkflowConfig,
    client: Arc<AgentClient>,
    user_id: &str,
    registry: &StepRegistry,
) -> Result<Workflow> {
    let mut builder = Workflow::builder().name(&config.name);
    if let Some(description) = &config.description {
        builder = builder.description(description);
    }

    for step_config in &config.steps {
        let mut step = match registry.get(&step_config.name) {
            Some(func) => Step::from_fn(&step_config.name, func.clone()),
            None => match &step_config.agent_id {
                Some(agent_id) => {
                    let mut agent_step = AgentStep::new(
                        &step_config.name,
                        client.clone(),
                        user_id,
                        agent_id,
                    );
                    if let Some(template) = &step_config.prompt_template {
                        agent_step = agent_step.with_prompt_template(template);
                    }
                    if let Some(timeout) = step_config.timeout {
                        agent_step = agent_step.with_timeout(Duration::from_secs(timeout));
                    }
                    agent_step.into_step()
                }
                None => {
                    return Err(FlowError::config(format!(
                        "step {:?} has no registered implementation and no agent_id",
                        step_config.name
                    )));
                }
            },
        };

        if let Some(description) = &step_config.description {
            step = step.with_description(description);
        }
        builder = builder.step(step);
    }

    builder.build()
}
