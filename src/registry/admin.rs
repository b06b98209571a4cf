//! Management operations a tool-hosting server exposes over its registry.

use super::{RegistryError, RegistryStats, ToolRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatusReport {
    pub stats: RegistryStats,
    pub enabled_tools: Vec<String>,
    pub tool_details: BTreeMap<String, ToolDetail>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDetail {
    pub enabled: bool,
    pub registered_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub metadata: Map<String, Value>,
}

/// Flip a tool's enabled state and describe the outcome.
///
/// Fails with [`RegistryError::UnknownTool`] when `name` was never
/// registered; re-applying the current state is reported, not an error.
pub fn set_tool_enabled(
    registry: &ToolRegistry,
    name: &str,
    enabled: bool,
) -> Result<String, RegistryError> {
    let changed = if enabled {
        registry.enable(name)?
    } else {
        registry.disable(name)?
    };

    let state = if enabled { "ENABLED" } else { "DISABLED" };
    if changed {
        info!(tool = name, enabled, version = registry.version(), "Tool state updated");
        Ok(format!(
            "Tool '{name}' is now {state} (registry version {version})",
            version = registry.version()
        ))
    } else {
        Ok(format!("Tool '{name}' was already {state}"))
    }
}

/// Snapshot of the registry for status reporting.
pub fn tool_status(registry: &ToolRegistry) -> ToolStatusReport {
    let details = registry
        .all_tools()
        .into_iter()
        .map(|(name, tool)| {
            (
                name,
                ToolDetail {
                    enabled: tool.enabled,
                    registered_at: tool.registered_at,
                    last_modified: tool.last_modified,
                    metadata: tool.metadata,
                },
            )
        })
        .collect();

    ToolStatusReport {
        stats: registry.stats(),
        enabled_tools: registry.enabled_tools().into_iter().collect(),
        tool_details: details,
    }
}
