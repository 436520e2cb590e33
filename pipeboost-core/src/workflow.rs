//! Sequential workflow execution.

use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    error::Result,
    step::{Step, StepSpec},
};

/// An ordered sequence of steps executed one after another.
///
/// The output of each step becomes the input of the next. A single JSON
/// value is threaded through the whole sequence; its shape is opaque to the
/// engine, so step-to-step contracts are established by convention per
/// workflow, not enforced here. Step names need not be unique; log lines
/// keyed by name can therefore be ambiguous.
#[derive(Debug)]
pub struct Workflow {
    name: String,
    description: Option<String>,
    steps: Vec<Step>,
}

impl Workflow {
    /// Create a new workflow builder.
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Get the workflow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the workflow description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Get the workflow steps in execution order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run the workflow on an initial input.
    ///
    /// Steps run strictly in sequence: each runs to completion (including
    /// any network call it performs) before the next is considered. A step
    /// whose condition evaluates false is skipped and leaves the data
    /// unchanged. The first step error aborts the run with that error
    /// propagated unchanged; remaining steps do not execute, and side
    /// effects already performed are not undone.
    ///
    /// An empty workflow returns the initial input unchanged. `run` does not
    /// mutate the workflow and may be invoked repeatedly.
    pub async fn run(&self, initial_input: Value) -> Result<Value> {
        info!(workflow = %self.name, steps = self.steps.len(), "starting workflow");

        let mut current = initial_input;

        for step in &self.steps {
            if !step.should_execute(&current) {
                debug!(workflow = %self.name, step = %step.name(), "skipping step (condition not met)");
                continue;
            }

            match step.execute(current).await {
                Ok(next) => {
                    debug!(workflow = %self.name, step = %step.name(), "step completed");
                    current = next;
                }
                Err(err) => {
                    error!(workflow = %self.name, step = %step.name(), error = %err, "workflow step failed");
                    return Err(err);
                }
            }
        }

        info!(workflow = %self.name, "workflow completed");
        Ok(current)
    }
}

/// Builder for [`Workflow`].
pub struct WorkflowBuilder {
    name: String,
    description: Option<String>,
    specs: Vec<StepSpec>,
}

impl WorkflowBuilder {
    /// Create a new workflow builder.
    pub fn new() -> Self {
        Self {
            name: "workflow".to_string(),
            description: None,
            specs: Vec::new(),
        }
    }

    /// Set the workflow name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the workflow description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append a step. Accepts a [`Step`] or any [`StepSpec`].
    pub fn step(mut self, spec: impl Into<StepSpec>) -> Self {
        self.specs.push(spec.into());
        self
    }

    /// Append several steps at once.
    pub fn steps<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StepSpec>,
    {
        self.specs.extend(specs.into_iter().map(Into::into));
        self
    }

    /// Build the workflow, normalizing bare functions into named steps.
    ///
    /// An empty step sequence is legal: running the resulting workflow
    /// returns its input unchanged.
    pub fn build(self) -> Result<Workflow> {
        let steps = self
            .specs
            .into_iter()
            .enumerate()
            .map(|(position, spec)| spec.into_step(position))
            .collect::<Result<Vec<_>>>()?;

        debug!(workflow = %self.name, steps = steps.len(), "initialized workflow");

        Ok(Workflow {
            name: self.name,
            description: self.description,
            steps,
        })
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use serde_json::json;

    use super::*;
    use crate::error::FlowError;

    fn double() -> Step {
        Step::new("double", |data: Value| async move {
            Ok(json!(data.as_i64().unwrap_or(0) * 2))
        })
    }

    fn add_one() -> Step {
        Step::new("add_one", |data: Value| async move {
            Ok(json!(data.as_i64().unwrap_or(0) + 1))
        })
    }

    #[tokio::test]
    async fn run_folds_steps_in_order() {
        let workflow = Workflow::builder()
            .name("arithmetic")
            .step(double())
            .step(add_one())
            .build()
            .unwrap();

        let result = workflow.run(json!(3)).await.unwrap();
        assert_eq!(result, json!(7));
    }

    #[tokio::test]
    async fn empty_workflow_is_identity() {
        let workflow = Workflow::builder().name("empty").build().unwrap();

        let input = json!({"topic": "rust", "nested": [1, 2, 3]});
        let result = workflow.run(input.clone()).await.unwrap();
        assert_eq!(result, input);
    }

    #[tokio::test]
    async fn skipped_step_leaves_data_unchanged() {
        let seen = Arc::new(std::sync::Mutex::new(None::<Value>));
        let seen_clone = seen.clone();

        let workflow = Workflow::builder()
            .step(
                Step::new("never_runs", |_| async move { Ok(json!("clobbered")) })
                    .with_condition(|_| false),
            )
            .step(Step::new("observer", move |data: Value| {
                let seen = seen_clone.clone();
                async move {
                    *seen.lock().unwrap() = Some(data.clone());
                    Ok(data)
                }
            }))
            .build()
            .unwrap();

        let input = json!({"untouched": true});
        let result = workflow.run(input.clone()).await.unwrap();

        assert_eq!(result, input);
        assert_eq!(seen.lock().unwrap().clone(), Some(input));
    }

    #[tokio::test]
    async fn failure_aborts_before_later_steps_run() {
        let executions = Arc::new(AtomicUsize::new(0));
        let after_failure = executions.clone();

        let workflow = Workflow::builder()
            .name("failing")
            .step(Step::new("boom", |_| async move {
                Err(FlowError::execution("boom"))
            }))
            .step(Step::new("after", move |data| {
                after_failure.fetch_add(1, Ordering::SeqCst);
                async move { Ok(data) }
            }))
            .build()
            .unwrap();

        let err = workflow.run(json!(1)).await.unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn step_errors_from_arbitrary_sources_pass_through() {
        let workflow = Workflow::builder()
            .step(Step::new("eyre_failure", |_| async move {
                Err(FlowError::from(eyre::eyre!("downstream service unavailable")))
            }))
            .build()
            .unwrap();

        let err = workflow.run(json!(null)).await.unwrap_err();
        assert!(matches!(err, FlowError::Generic(_)));
        assert!(err.to_string().contains("downstream service unavailable"));
    }

    #[tokio::test]
    async fn bare_functions_are_normalized_with_default_names() {
        let workflow = Workflow::builder()
            .step(StepSpec::func(|data: Value| async move {
                Ok(json!(data.as_i64().unwrap_or(0) * 2))
            }))
            .step(StepSpec::func(|data: Value| async move {
                Ok(json!(data.as_i64().unwrap_or(0) + 1))
            }))
            .build()
            .unwrap();

        assert_eq!(workflow.steps()[0].name(), "step1");
        assert_eq!(workflow.steps()[1].name(), "step2");
        assert_eq!(workflow.run(json!(3)).await.unwrap(), json!(7));
    }

    #[tokio::test]
    async fn run_is_repeatable() {
        let workflow = Workflow::builder().step(double()).build().unwrap();

        assert_eq!(workflow.run(json!(2)).await.unwrap(), json!(4));
        assert_eq!(workflow.run(json!(5)).await.unwrap(), json!(10));
    }

    #[tokio::test]
    async fn heterogeneous_payloads_flow_between_steps() {
        // First step takes a topic string, second consumes the map it built.
        let workflow = Workflow::builder()
            .name("content_pipeline")
            .step(Step::new("research", |data: Value| async move {
                Ok(json!({
                    "topic": data,
                    "research": "key points about the topic",
                }))
            }))
            .step(Step::new("summarize", |data: Value| async move {
                let topic = data["topic"].as_str().unwrap_or("").to_string();
                Ok(json!(format!("summary of {topic}")))
            }))
            .build()
            .unwrap();

        let result = workflow.run(json!("rust")).await.unwrap();
        assert_eq!(result, json!("summary of rust"));
    }
}
