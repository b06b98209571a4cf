use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

use crate::model::ToolSpec;
use crate::tooling::{HostTool, ToolHost, ToolHostError};

/// Outcome of one tool invocation, flattened to text. Failures are data,
/// never raised: the orchestrator feeds them back to the model.
#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub success: bool,
    pub output: String,
}

struct CachedTools {
    specs: Vec<ToolSpec>,
    count: usize,
}

impl CachedTools {
    fn names(&self) -> BTreeSet<String> {
        self.specs
            .iter()
            .map(|spec| spec.function.name.clone())
            .collect()
    }
}

/// Translates a tool host's tool list into model-ready specs and executes
/// invocations against it. Keeps the last-fetched spec list as a cache that
/// is replaced wholesale on refresh.
pub struct ToolHostAdapter {
    host: Arc<dyn ToolHost>,
    cache: Mutex<Option<CachedTools>>,
}

impl ToolHostAdapter {
    pub fn new(host: Arc<dyn ToolHost>) -> Self {
        Self {
            host,
            cache: Mutex::new(None),
        }
    }

    /// Model-ready tool specs, served from cache unless `force_refresh`.
    ///
    /// Tools without a name are skipped; a missing description becomes an
    /// empty string and a missing input schema an empty object schema.
    pub async fn discover_tools(&self, force_refresh: bool) -> Result<Vec<ToolSpec>, ToolHostError> {
        if !force_refresh {
            if let Some(cached) = self.cache.lock().expect("tool spec cache lock").as_ref() {
                return Ok(cached.specs.clone());
            }
        }

        let listed = self.host.list_tools().await?;
        debug!(count = listed.len(), "Discovered host tools");

        let specs: Vec<ToolSpec> = listed.into_iter().filter_map(to_tool_spec).collect();
        let count = specs.len();
        *self.cache.lock().expect("tool spec cache lock") = Some(CachedTools {
            specs: specs.clone(),
            count,
        });
        Ok(specs)
    }

    /// Invoke a tool on the host, surfacing success or failure as text.
    pub async fn execute_tool(&self, name: &str, args: &Map<String, Value>) -> ToolExecution {
        match self.host.call_tool(name, args).await {
            Ok(result) => {
                let text = result.content.first().map(|block| block.text.clone());
                if result.is_error {
                    ToolExecution {
                        success: false,
                        output: text.unwrap_or_else(|| "MCP error".to_string()),
                    }
                } else {
                    ToolExecution {
                        success: true,
                        output: text.unwrap_or_default(),
                    }
                }
            }
            Err(source) => {
                warn!(tool = name, %source, "Tool invocation failed at transport level");
                ToolExecution {
                    success: false,
                    output: format!("Exception while calling tool '{name}': {source}"),
                }
            }
        }
    }

    /// Poll the host's live tool list and compare count and name set
    /// against the cached snapshot. Errors are swallowed and read as "no
    /// change": staleness is preferable to refresh storms on a flaky host.
    pub async fn check_for_changes(&self) -> bool {
        let (cached_count, cached_names) = {
            let guard = self.cache.lock().expect("tool spec cache lock");
            match guard.as_ref() {
                Some(cached) => (cached.count, cached.names()),
                None => return false,
            }
        };

        match self.host.list_tools().await {
            Ok(listed) => {
                // Count before deduplicating: the cached count keeps
                // duplicate names too.
                let live_count = listed.iter().filter(|tool| !tool.name.is_empty()).count();
                let live_names: BTreeSet<String> = listed
                    .iter()
                    .filter(|tool| !tool.name.is_empty())
                    .map(|tool| tool.name.clone())
                    .collect();
                let changed = live_count != cached_count || live_names != cached_names;
                if changed {
                    info!(
                        cached = cached_count,
                        live = live_count,
                        "Tool host capabilities changed"
                    );
                }
                changed
            }
            Err(source) => {
                warn!(%source, "Tool change check failed; keeping cached specs");
                false
            }
        }
    }

    /// Pass-through to the host's named resource reads.
    pub async fn read_resource(&self, uri: &str) -> Result<String, ToolHostError> {
        self.host.read_resource(uri).await
    }
}

fn to_tool_spec(tool: HostTool) -> Option<ToolSpec> {
    if tool.name.is_empty() {
        return None;
    }

    let mut schema = tool
        .input_schema
        .unwrap_or_else(|| json!({ "type": "object", "properties": {} }));
    if let Value::Object(map) = &mut schema {
        if !map.contains_key("type") {
            map.insert("type".to_string(), json!("object"));
        }
    }

    Some(ToolSpec::function(
        tool.name,
        tool.description.unwrap_or_default(),
        schema,
    ))
}
