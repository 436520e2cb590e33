//! Prompt template rendering for agent-backed steps.

use pipeboost_core::error::{FlowError, Result};
use serde_json::Value;

/// Render a `{placeholder}` template against the current pipeline value.
///
/// For object payloads, each `{key}` resolves to the value of that key
/// (strings verbatim, other values as JSON text). For any other payload,
/// `{input}` resolves to the payload itself. `{{` and `}}` escape literal
/// braces. A placeholder with no matching value is an error.
pub fn render_template(template: &str, data: &Value) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                rendered.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                rendered.push('}');
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => key.push(c),
                        None => {
                            return Err(FlowError::execution(format!(
                                "unterminated placeholder in prompt template: {{{key}"
                            )));
                        }
                    }
                }
                rendered.push_str(&resolve(&key, data)?);
            }
            '}' => {
                return Err(FlowError::execution(
                    "unmatched '}' in prompt template".to_string(),
                ));
            }
            _ => rendered.push(ch),
        }
    }

    Ok(rendered)
}

fn resolve(key: &str, data: &Value) -> Result<String> {
    let value = match data {
        Value::Object(map) => map.get(key),
        _ if key == "input" => Some(data),
        _ => None,
    };

    match value {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
        None => Err(FlowError::execution(format!(
            "missing variable in prompt template: {key:?}"
        ))),
    }
}
