//! Step abstraction for pipeboost workflows.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use crate::error::{FlowError, Result};

/// Boxed step function: one JSON value in, one JSON value out, may fail.
pub type StepFn =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// Predicate deciding whether a step should run given the current data.
pub type Condition = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Wrap an async closure into a [`StepFn`].
pub fn step_fn<F, Fut>(f: F) -> StepFn
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Arc::new(move |data| Box::pin(f(data)))
}

/// A single step in a workflow.
///
/// A step wraps a unary transformation with a name, an optional description
/// and an optional run condition. Steps are immutable once constructed and
/// owned by the workflow that holds them.
pub struct Step {
    name: String,
    description: Option<String>,
    func: StepFn,
    condition: Option<Condition>,
}

impl Step {
    /// Create a new step from a name and an async transformation.
    pub fn new<F, Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::from_fn(name, step_fn(func))
    }

    /// Create a step from an already-boxed [`StepFn`].
    pub fn from_fn(name: impl Into<String>, func: StepFn) -> Self {
        Self {
            name: name.into(),
            description: None,
            func,
            condition: None,
        }
    }

    /// Attach a description to this step.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a run condition to this step.
    ///
    /// The condition is evaluated against the current pipeline value before
    /// the step runs; a `false` verdict skips the step, leaving the data
    /// unchanged.
    pub fn with_condition<C>(mut self, condition: C) -> Self
    where
        C: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Get the step name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the step description, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Decide whether this step should run for the given data.
    ///
    /// Returns `true` unconditionally when no condition was supplied.
    pub fn should_execute(&self, data: &Value) -> bool {
        match &self.condition {
            Some(condition) => condition(data),
            None => true,
        }
    }

    /// Execute this step.
    ///
    /// Invokes the wrapped function and propagates its error unchanged, so
    /// failure context from nested operations reaches the caller verbatim.
    pub async fn execute(&self, data: Value) -> Result<Value> {
        tracing::debug!(step = %self.name, "executing workflow step");
        (self.func)(data).await
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_condition", &self.condition.is_some())
            .finish()
    }
}

/// A step specification accepted by the workflow builder.
///
/// Normalizes the two ways of supplying a step: a bare transformation
/// function, or a fully described [`Step`]. Bare functions are given a
/// positional default name (`step1`, `step2`, ...) at workflow construction
/// time.
pub enum StepSpec {
    /// A bare transformation with no name, description or condition.
    Func(StepFn),
    /// A fully described step.
    Step(Step),
}

impl StepSpec {
    /// Create a spec from a bare async transformation.
    pub fn func<F, Fut>(f: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        Self::Func(step_fn(f))
    }

    /// Normalize into a [`Step`], assigning a positional default name to
    /// bare functions. Fails when an explicit step name is empty.
    pub(crate) fn into_step(self, position: usize) -> Result<Step> {
        match self {
            Self::Step(step) => {
                if step.name.is_empty() {
                    return Err(FlowError::construction(format!(
                        "step at position {position} has an empty name"
                    )));
                }
                Ok(step)
            }
            Self::Func(func) => Ok(Step::from_fn(format!("step{}", position + 1), func)),
        }
    }
}

impl From<Step> for StepSpec {
    fn from(step: Step) -> Self {
        Self::Step(step)
    }
}

impl fmt::Debug for StepSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(_) => f.write_str("StepSpec::Func"),
            Self::Step(step) => f.debug_tuple("StepSpec::Step").field(step).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn execute_applies_the_wrapped_function() {
        let step = Step::new("double", |data: Value| async move {
            Ok(json!(data.as_i64().unwrap_or(0) * 2))
        });

        let result = step.execute(json!(21)).await.unwrap();
        assert_eq!(result, json!(42));
        assert_eq!(step.name(), "double");
    }

    #[tokio::test]
    async fn should_execute_defaults_to_true() {
        let step = Step::new("unconditional", |data| async move { Ok(data) });
        assert!(step.should_execute(&json!(null)));
        assert!(step.should_execute(&json!({"anything": true})));
    }

    #[tokio::test]
    async fn condition_sees_the_current_data() {
        let step = Step::new("guarded", |data| async move { Ok(data) })
            .with_condition(|data| data.get("ready").and_then(Value::as_bool).unwrap_or(false));

        assert!(step.should_execute(&json!({"ready": true})));
        assert!(!step.should_execute(&json!({"ready": false})));
        assert!(!step.should_execute(&json!("not even an object")));
    }

    #[tokio::test]
    async fn execute_propagates_errors_unchanged() {
        let step = Step::new("failing", |_| async move {
            Err(FlowError::execution("inner failure detail"))
        });

        let err = step.execute(json!(null)).await.unwrap_err();
        assert!(err.to_string().contains("inner failure detail"));
    }

    #[test]
    fn bare_function_gets_positional_name() {
        let spec = StepSpec::func(|data| async move { Ok(data) });
        let step = spec.into_step(2).unwrap();
        assert_eq!(step.name(), "step3");
    }

    #[test]
    fn empty_explicit_name_is_rejected() {
        let spec = StepSpec::from(Step::new("", |data| async move { Ok(data) }));
        let err = spec.into_step(0).unwrap_err();
        assert!(matches!(err, FlowError::Construction(_)));
    }
}
