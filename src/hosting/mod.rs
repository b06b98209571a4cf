//! In-process tool host with registry-gated invocation.
//!
//! `LocalToolHost` is the embeddable counterpart of a remote tool server:
//! it owns tool handlers, advertises only enabled tools, and exposes the
//! registry management operations as callable tools so a model (or an
//! operator) can flip tool state at runtime without a restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::registry::{RegistryError, ToolRegistry, admin};
use crate::tooling::{HostTool, ToolCallResult, ToolHost, ToolHostError};

pub const SET_TOOL_ENABLED: &str = "set_tool_enabled";
pub const GET_TOOL_STATUS: &str = "get_tool_status";

pub type ToolHandler = dyn Fn(&Map<String, Value>) -> Result<String, String> + Send + Sync;

/// A tool owned by the local host: schema-described, with a synchronous
/// handler producing text output.
#[derive(Clone)]
pub struct HostedTool {
    name: String,
    description: String,
    schema: Value,
    handler: Arc<ToolHandler>,
}

impl HostedTool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Value,
        handler: impl Fn(&Map<String, Value>) -> Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler: Arc::new(handler),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

pub struct LocalToolHost {
    registry: Arc<ToolRegistry>,
    tools: Mutex<BTreeMap<String, HostedTool>>,
    resources: Mutex<HashMap<String, String>>,
}

impl LocalToolHost {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            tools: Mutex::new(BTreeMap::new()),
            resources: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Add a tool and register its name (enabled) in the registry. Tools
    /// can be added after the host is shared; clients pick them up through
    /// change detection on their next discovery.
    pub fn register_tool(&self, tool: HostedTool) -> Result<(), RegistryError> {
        self.registry.register(&tool.name)?;
        self.tools
            .lock()
            .expect("hosted tools lock")
            .insert(tool.name.clone(), tool);
        Ok(())
    }

    pub fn add_resource(&self, uri: impl Into<String>, text: impl Into<String>) {
        self.resources
            .lock()
            .expect("hosted resources lock")
            .insert(uri.into(), text.into());
    }

    fn set_tool_enabled(&self, arguments: &Map<String, Value>) -> ToolCallResult {
        let tool_name = arguments.get("tool_name").and_then(Value::as_str);
        let enabled = arguments.get("enabled").and_then(Value::as_bool);
        let (Some(tool_name), Some(enabled)) = (tool_name, enabled) else {
            return ToolCallResult::error(
                "set_tool_enabled requires 'tool_name' (string) and 'enabled' (boolean)",
            );
        };

        match admin::set_tool_enabled(&self.registry, tool_name, enabled) {
            Ok(status) => ToolCallResult::text(status),
            Err(source) => {
                warn!(tool = tool_name, %source, "Rejected tool state change");
                ToolCallResult::error(source.to_string())
            }
        }
    }

    fn get_tool_status(&self) -> ToolCallResult {
        let report = admin::tool_status(&self.registry);
        match serde_json::to_string_pretty(&report) {
            Ok(text) => ToolCallResult::text(text),
            Err(source) => ToolCallResult::error(format!("failed to render tool status: {source}")),
        }
    }
}

#[async_trait]
impl ToolHost for LocalToolHost {
    /// Enabled tools first (name order), then the management tools, which
    /// are always available and never registry-gated.
    async fn list_tools(&self) -> Result<Vec<HostTool>, ToolHostError> {
        let tools = self.tools.lock().expect("hosted tools lock");
        let mut listed: Vec<HostTool> = tools
            .values()
            .filter(|tool| self.registry.is_enabled(&tool.name))
            .map(|tool| HostTool {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: Some(tool.schema.clone()),
            })
            .collect();

        listed.push(HostTool {
            name: SET_TOOL_ENABLED.to_string(),
            description: Some("Enable or disable a hosted tool at runtime.".to_string()),
            input_schema: Some(json!({
                "type": "object",
                "properties": {
                    "tool_name": { "type": "string" },
                    "enabled": { "type": "boolean" }
                },
                "required": ["tool_name", "enabled"]
            })),
        });
        listed.push(HostTool {
            name: GET_TOOL_STATUS.to_string(),
            description: Some("Report registry stats and per-tool state.".to_string()),
            input_schema: Some(json!({ "type": "object", "properties": {} })),
        });

        Ok(listed)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<ToolCallResult, ToolHostError> {
        if name == SET_TOOL_ENABLED {
            return Ok(self.set_tool_enabled(arguments));
        }
        if name == GET_TOOL_STATUS {
            return Ok(self.get_tool_status());
        }

        let tool = self
            .tools
            .lock()
            .expect("hosted tools lock")
            .get(name)
            .cloned();
        let Some(tool) = tool else {
            return Ok(ToolCallResult::error(format!("Unknown tool '{name}'")));
        };

        if !self.registry.is_enabled(name) {
            debug!(tool = name, "Rejected invocation of disabled tool");
            return Ok(ToolCallResult::error(format!(
                "Tool '{name}' is currently disabled"
            )));
        }

        debug!(tool = name, "Dispatching hosted tool");
        let result = match (tool.handler)(arguments) {
            Ok(text) => ToolCallResult::text(text),
            Err(message) => ToolCallResult::error(message),
        };
        Ok(result)
    }

    async fn read_resource(&self, uri: &str) -> Result<String, ToolHostError> {
        self.resources
            .lock()
            .expect("hosted resources lock")
            .get(uri)
            .cloned()
            .ok_or_else(|| ToolHostError::UnknownResource {
                uri: uri.to_string(),
            })
    }
}
