//! Declarative workflow configuration.
//!
//! Workflows can be described in YAML or JSON files and assembled against a
//! registry of step implementations. This module holds the serde models and
//! file loading; turning a config into a runnable [`crate::workflow::Workflow`]
//! is the job of whichever crate supplies the step implementations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{FlowError, Result};

/// Declarative description of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Workflow name.
    #[serde(default = "default_workflow_name")]
    pub name: String,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Ordered step definitions.
    pub steps: Vec<StepConfig>,
}

/// Declarative description of a single step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Step name, also the lookup key for registered implementations.
    pub name: String,

    /// Optional human-readable description.
    #[serde(default)]
    pub description: Option<String>,

    /// Agent to delegate to when no implementation is registered under
    /// `name`.
    #[serde(default)]
    pub agent_id: Option<String>,

    /// Message template for agent-backed steps. `{key}` placeholders resolve
    /// against object payloads, `{input}` against anything else.
    #[serde(default)]
    pub prompt_template: Option<String>,

    /// Per-step request timeout in seconds for agent-backed steps.
    #[serde(default)]
    pub timeout: Option<u64>,
}

fn default_workflow_name() -> String {
    "workflow".to_string()
}

impl WorkflowConfig {
    /// Load a configuration file, inferring the format from the extension
    /// (`.yml`/`.yaml` or `.json`).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if !matches!(ext.as_str(), "yml" | "yaml" | "json") {
            return Err(FlowError::config(format!(
                "unable to infer format from file extension: {ext:?}"
            )));
        }

        let contents = std::fs::read_to_string(path).map_err(|err| {
            FlowError::config(format!("cannot read {}: {err}", path.display()))
        })?;

        match ext.as_str() {
            "json" => Self::from_json_str(&contents),
            _ => Self::from_yaml_str(&contents),
        }
    }

    /// Parse a YAML workflow definition.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON workflow definition.
    pub fn from_json_str(contents: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(contents)
            .map_err(|err| FlowError::config(format!("Error parsing JSON: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for step in &self.steps {
            if step.name.is_empty() {
                return Err(FlowError::config(format!(
                    "workflow {:?} contains a step with an empty name",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// Merge two JSON values recursively, with `override_value` taking
/// precedence. Objects merge key by key; anything else is replaced
/// wholesale.
pub fn merge_values(base: &Value, override_value: &Value) -> Value {
    match (base, override_value) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.clone();
            for (key, value) in override_map {
                let entry = match merged.get(key) {
                    Some(existing) => merge_values(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), entry);
            }
            Value::Object(merged)
        }
        _ => override_value.clone(),
    }
}

/// Look up a nested value using a dot-notation path (e.g. `"agent.timeout"`).
pub fn value_at_path<'a>(value: &'a Value, key_path: &str) -> Option<&'a Value> {
    let mut current = value;
    for key in key_path.split('.') {
        current = current.as_object()?.get(key)?;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    const YAML_CONFIG: &str = r#"
name: content_pipeline
description: Research a topic, then summarize it.
steps:
  - name: research
    agent_id: research_agent
    prompt_template: "Research the following topic and provide key points: {input}"
  - name: summarize
    agent_id: summary_agent
    prompt_template: "Summarize this research on {topic}: {research}"
    timeout: 90
"#;

    #[test]
    fn parses_yaml_config() {
        let config = WorkflowConfig::from_yaml_str(YAML_CONFIG).unwrap();

        assert_eq!(config.name, "content_pipeline");
        assert_eq!(config.steps.len(), 2);
        assert_eq!(config.steps[0].agent_id.as_deref(), Some("research_agent"));
        assert_eq!(config.steps[1].timeout, Some(90));
    }

    #[test]
    fn parses_json_config_with_defaults() {
        let config = WorkflowConfig::from_json_str(
            r#"{"steps": [{"name": "only_step"}]}"#,
        )
        .unwrap();

        assert_eq!(config.name, "workflow");
        assert_eq!(config.description, None);
        assert_eq!(config.steps[0].name, "only_step");
        assert_eq!(config.steps[0].agent_id, None);
    }

    #[test]
    fn missing_steps_key_is_an_error() {
        let err = WorkflowConfig::from_yaml_str("name: broken\n").unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn empty_step_name_is_an_error() {
        let err =
            WorkflowConfig::from_json_str(r#"{"steps": [{"name": ""}]}"#).unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let err = WorkflowConfig::from_path("workflow.toml").unwrap_err();
        assert!(matches!(err, FlowError::Config(_)));
    }

    #[test]
    fn merge_is_recursive_and_override_wins() {
        let base = json!({
            "agent": {"timeout": 60, "endpoint": "https://example.com"},
            "name": "base",
        });
        let override_value = json!({
            "agent": {"timeout": 120},
            "extra": true,
        });

        let merged = merge_values(&base, &override_value);
        assert_eq!(
            merged,
            json!({
                "agent": {"timeout": 120, "endpoint": "https://example.com"},
                "name": "base",
                "extra": true,
            })
        );
    }

    #[test]
    fn dot_path_lookup() {
        let value = json!({"agent": {"timeout": 60}});

        assert_eq!(value_at_path(&value, "agent.timeout"), Some(&json!(60)));
        assert_eq!(value_at_path(&value, "agent.missing"), None);
        assert_eq!(value_at_path(&value, "agent.timeout.deeper"), None);
    }
}
