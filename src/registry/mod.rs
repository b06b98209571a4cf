//! Dynamic tool registry.
//!
//! Tracks enabled/disabled state per tool together with a monotonically
//! increasing version counter. A tool-hosting server embeds one registry
//! instance and gates every invocation on [`ToolRegistry::is_enabled`];
//! clients watch [`ToolRegistry::version`] to know when to re-discover.

pub mod admin;


use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tool name must be a non-empty string")]
    InvalidName,
    #[error("tool '{0}' is not registered")]
    UnknownTool(String),
}

/// Registry entry for a single tool. Created on first registration and
/// mutated in place by enable/disable/re-register; only `unregister`
/// removes it.
#[derive(Debug, Clone, Serialize)]
pub struct ToolMetadata {
    pub name: String,
    pub enabled: bool,
    pub registered_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub enabled_tools: usize,
    pub disabled_tools: usize,
    pub version: u64,
}

#[derive(Default)]
struct RegistryState {
    tools: HashMap<String, ToolMetadata>,
    version: u64,
}

/// Thread-safe map from tool name to enabled state.
///
/// All operations are serialized by one lock and do no I/O while holding
/// it. The registry has no global instance: construct one and share it via
/// `Arc` with whichever host embeds it ([`clear`](Self::clear) is the reset
/// hook for test isolation).
#[derive(Default)]
pub struct ToolRegistry {
    state: Mutex<RegistryState>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool as enabled with no metadata.
    pub fn register(&self, name: &str) -> Result<(), RegistryError> {
        self.register_with(name, true, Map::new())
    }

    /// Register a new tool or update an existing registration.
    ///
    /// Re-registering merges `metadata` and refreshes the modification
    /// timestamp; the version is bumped only when the tool is new or its
    /// enabled state actually changed. Metadata-only updates do not bump.
    pub fn register_with(
        &self,
        name: &str,
        enabled: bool,
        metadata: Map<String, Value>,
    ) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::InvalidName);
        }

        let mut guard = self.lock();
        let state = &mut *guard;
        let now = Utc::now();
        match state.tools.get_mut(name) {
            Some(tool) => {
                tool.last_modified = now;
                if tool.enabled != enabled {
                    tool.enabled = enabled;
                    state.version += 1;
                }
                tool.metadata.extend(metadata);
            }
            None => {
                state.tools.insert(
                    name.to_string(),
                    ToolMetadata {
                        name: name.to_string(),
                        enabled,
                        registered_at: now,
                        last_modified: now,
                        metadata,
                    },
                );
                state.version += 1;
            }
        }
        debug!(tool = name, enabled, version = state.version, "Tool registered");
        Ok(())
    }

    /// Enable a registered tool. Returns whether the state changed.
    pub fn enable(&self, name: &str) -> Result<bool, RegistryError> {
        self.set_enabled(name, true)
    }

    /// Disable a registered tool. Returns whether the state changed.
    pub fn disable(&self, name: &str) -> Result<bool, RegistryError> {
        self.set_enabled(name, false)
    }

    fn set_enabled(&self, name: &str, enabled: bool) -> Result<bool, RegistryError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let tool = state
            .tools
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownTool(name.to_string()))?;

        if tool.enabled == enabled {
            return Ok(false);
        }

        tool.enabled = enabled;
        tool.last_modified = Utc::now();
        state.version += 1;
        debug!(tool = name, enabled, version = state.version, "Tool state changed");
        Ok(true)
    }

    /// Whether `name` is registered and enabled. Unknown names read as
    /// disabled; callers use this as a gate, not a lookup.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.lock()
            .tools
            .get(name)
            .map(|tool| tool.enabled)
            .unwrap_or(false)
    }

    pub fn enabled_tools(&self) -> BTreeSet<String> {
        self.lock()
            .tools
            .values()
            .filter(|tool| tool.enabled)
            .map(|tool| tool.name.clone())
            .collect()
    }

    pub fn all_tools(&self) -> HashMap<String, ToolMetadata> {
        self.lock().tools.clone()
    }

    pub fn metadata(&self, name: &str) -> Option<ToolMetadata> {
        self.lock().tools.get(name).cloned()
    }

    /// Current registry version. Increments once per state-changing
    /// operation; a cheap change signal, not a cross-process clock.
    pub fn version(&self) -> u64 {
        self.lock().version
    }

    /// Remove a tool completely. Returns true (and bumps the version) if it
    /// was registered.
    pub fn unregister(&self, name: &str) -> bool {
        let mut guard = self.lock();
        if guard.tools.remove(name).is_some() {
            guard.version += 1;
            true
        } else {
            false
        }
    }

    /// Drop all entries and reset the version to 0.
    pub fn clear(&self) {
        let mut guard = self.lock();
        guard.tools.clear();
        guard.version = 0;
    }

    pub fn stats(&self) -> RegistryStats {
        let guard = self.lock();
        let enabled = guard.tools.values().filter(|tool| tool.enabled).count();
        RegistryStats {
            total_tools: guard.tools.len(),
            enabled_tools: enabled,
            disabled_tools: guard.tools.len() - enabled,
            version: guard.version,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryState> {
        self.state.lock().expect("tool registry lock")
    }
}
