use serde_json::{Map, Value};

use crate::model::ChatCompletion;

/// A tool invocation requested by the model. Transient: produced from one
/// response, consumed immediately by execution.
#[derive(Debug, Clone)]
pub struct ToolCallRequest {
    pub id: Option<String>,
    pub name: String,
    pub args: Map<String, Value>,
}

/// Extract tool-call requests from a raw model response.
///
/// Calls without a resolvable function name are dropped; argument strings
/// that fail to decode as a JSON object are kept with an empty argument
/// set. A response missing the expected shape yields an empty list.
pub fn extract_tool_calls(response: &ChatCompletion) -> Vec<ToolCallRequest> {
    let Some(message) = response.choices.first().map(|choice| &choice.message) else {
        return Vec::new();
    };
    let Some(calls) = message.tool_calls.as_ref() else {
        return Vec::new();
    };

    calls
        .iter()
        .filter_map(|call| {
            let function = call.function.as_ref()?;
            let name = function.name.as_deref().filter(|n| !n.is_empty())?;
            let args = function
                .arguments
                .as_deref()
                .and_then(|raw| serde_json::from_str::<Map<String, Value>>(raw).ok())
                .unwrap_or_default();
            Some(ToolCallRequest {
                id: call.id.clone(),
                name: name.to_string(),
                args,
            })
        })
        .collect()
}

/// Assistant text of the first choice, defaulting to an empty string.
pub(super) fn final_content(response: &ChatCompletion) -> String {
    response
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .unwrap_or_default()
}
