#![allow(dead_code)]

use async_trait::async_trait;
use mcp_llm_bridge::{
    ChatCompletion, ChatMessage, HostedTool, LocalToolHost, ModelError, ModelHost, ToolRegistry,
    ToolSpec,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Model host that replays canned raw responses in order; the last one
/// repeats if the script runs out.
pub struct ScriptedModel {
    responses: Mutex<Vec<Value>>,
    tool_names_seen: Mutex<Vec<Option<Vec<String>>>>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            tool_names_seen: Mutex::new(Vec::new()),
        })
    }

    /// Tool names advertised to the model, one entry per round.
    pub async fn tool_names_seen(&self) -> Vec<Option<Vec<String>>> {
        self.tool_names_seen.lock().await.clone()
    }
}

#[async_trait]
impl ModelHost for ScriptedModel {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<ChatCompletion, ModelError> {
        self.tool_names_seen.lock().await.push(tools.map(|specs| {
            specs
                .iter()
                .map(|spec| spec.function.name.clone())
                .collect()
        }));

        let raw = {
            let mut responses = self.responses.lock().await;
            if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            }
        };
        serde_json::from_value(raw)
            .map_err(|e| ModelError::invalid_response("scripted", e.to_string()))
    }
}

pub fn final_text(text: &str) -> Value {
    json!({ "choices": [{ "message": { "content": text } }] })
}

pub fn tool_call(name: &str, arguments: Value) -> Value {
    json!({
        "choices": [{
            "message": {
                "tool_calls": [{
                    "id": "call_1",
                    "function": { "name": name, "arguments": arguments.to_string() }
                }]
            }
        }]
    })
}

fn numbers_arg(args: &Map<String, Value>) -> Result<Vec<f64>, String> {
    let Some(list) = args.get("numbers").and_then(Value::as_array) else {
        return Err("'numbers' must be a list of numbers".to_string());
    };
    let mut numbers = Vec::with_capacity(list.len());
    for (index, value) in list.iter().enumerate() {
        let Some(number) = value.as_f64() else {
            return Err(format!(
                "Element at index {index} must be a number, got {value}"
            ));
        };
        numbers.push(number);
    }
    Ok(numbers)
}

fn numbers_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "numbers": { "type": "array", "items": { "type": "number" } }
        },
        "required": ["numbers"]
    })
}

/// Math tool host: `add` and `multiply` over lists of numbers, gated by a
/// shared registry.
pub fn math_host() -> (Arc<ToolRegistry>, Arc<LocalToolHost>) {
    let registry = Arc::new(ToolRegistry::new());
    let host = LocalToolHost::new(registry.clone());

    host.register_tool(HostedTool::new(
        "add",
        "Sums the given list of numbers.",
        numbers_schema(),
        |args| {
            let numbers = numbers_arg(args)?;
            if numbers.is_empty() {
                return Err("Cannot add an empty list of numbers".to_string());
            }
            Ok(format!("{:?}", numbers.iter().sum::<f64>()))
        },
    ))
    .expect("register add");

    host.register_tool(HostedTool::new(
        "multiply",
        "Multiplies the given list of numbers.",
        numbers_schema(),
        |args| {
            let numbers = numbers_arg(args)?;
            if numbers.is_empty() {
                return Err("Cannot multiply an empty list of numbers".to_string());
            }
            Ok(format!("{:?}", numbers.iter().product::<f64>()))
        },
    ))
    .expect("register multiply");

    (registry, Arc::new(host))
}
