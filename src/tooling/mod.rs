use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolHostError {
    #[error("tool host transport error: {message}")]
    Transport { message: String },
    #[error("tool host has no resource '{uri}'")]
    UnknownResource { uri: String },
}

impl ToolHostError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// A tool as the host describes it: a name, an optional human-readable
/// description, and an optional JSON Schema for its input.
#[derive(Debug, Clone)]
pub struct HostTool {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub text: String,
}

/// Outcome of a tool invocation on the host. Failures travel inside the
/// result (`is_error` + content text), mirroring MCP call results.
#[derive(Debug, Clone)]
pub struct ToolCallResult {
    pub is_error: bool,
    pub content: Vec<ContentBlock>,
}

impl ToolCallResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            is_error: false,
            content: vec![ContentBlock { text: text.into() }],
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            content: vec![ContentBlock { text: text.into() }],
        }
    }
}

/// The remote side that owns tool implementations: discovery, invocation,
/// and named resource reads. Transport concerns (timeouts, reconnects)
/// belong to the implementation, not to callers.
#[async_trait]
pub trait ToolHost: Send + Sync {
    async fn list_tools(&self) -> Result<Vec<HostTool>, ToolHostError>;

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<ToolCallResult, ToolHostError>;

    async fn read_resource(&self, uri: &str) -> Result<String, ToolHostError>;
}
