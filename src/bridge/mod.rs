//! Conversation orchestrator: drives the bounded multi-round loop between
//! a model host and a tool host.

pub mod adapter;
pub mod parser;


use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::types::ChatMessage;
use crate::model::{ModelError, ModelHost};
use crate::tooling::{ToolHost, ToolHostError};
use adapter::ToolHostAdapter;

const DEFAULT_SYSTEM_PROMPT: &str = "You can call tools when needed. Use them to compute results before replying.\nTools are provided by a tool host and may vary.";
const DEFAULT_MAX_ROUNDS: usize = 5;

/// Sentinel final response when the round budget runs out before the model
/// settles on an answer. Exhaustion is a defined outcome, not an error.
pub const MAX_ROUNDS_MESSAGE: &str = "Max conversation rounds reached without completion";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Host(#[from] ToolHostError),
}

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub system_prompt: String,
    /// Upper bound on model rounds per conversation, guarding against
    /// tool-call loops.
    pub max_rounds: usize,
    /// Poll the host for tool-list changes between rounds and refresh the
    /// spec cache when they differ.
    pub dynamic_tools: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_rounds: DEFAULT_MAX_ROUNDS,
            dynamic_tools: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationOptions {
    pub system_prompt: Option<String>,
    pub use_tools: bool,
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            system_prompt: None,
            use_tools: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    pub final_response: String,
    pub messages: Vec<ChatMessage>,
    pub tool_calls_made: usize,
    pub rounds: usize,
}

/// Bridge between a model host and a tool host.
pub struct Bridge<M: ModelHost> {
    model: Arc<M>,
    adapter: ToolHostAdapter,
    config: BridgeConfig,
}

impl<M: ModelHost> Bridge<M> {
    pub fn new(model: Arc<M>, host: Arc<dyn ToolHost>) -> Self {
        Self::with_config(model, host, BridgeConfig::default())
    }

    pub fn with_config(model: Arc<M>, host: Arc<dyn ToolHost>, config: BridgeConfig) -> Self {
        Self {
            model,
            adapter: ToolHostAdapter::new(host),
            config,
        }
    }

    pub fn adapter(&self) -> &ToolHostAdapter {
        &self.adapter
    }

    pub async fn run_conversation(
        &self,
        user_prompt: impl Into<String>,
    ) -> Result<ConversationOutcome, BridgeError> {
        self.run_conversation_with(user_prompt, ConversationOptions::default())
            .await
    }

    /// Run one conversation to completion or round exhaustion.
    ///
    /// Each round sends the full history (plus tool specs when tool use is
    /// on) to the model. Tool calls execute strictly in the order received,
    /// each result appended as a synthetic assistant message; a response
    /// with no tool calls ends the conversation. Tool failures become
    /// `TOOL ERROR` transcript entries and never abort the run; model-host
    /// and discovery transport failures do propagate.
    pub async fn run_conversation_with(
        &self,
        user_prompt: impl Into<String>,
        options: ConversationOptions,
    ) -> Result<ConversationOutcome, BridgeError> {
        let system_prompt = options
            .system_prompt
            .unwrap_or_else(|| self.config.system_prompt.clone());
        let mut messages = vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(user_prompt),
        ];

        let mut tool_calls_made = 0;
        let mut rounds = 0;

        for round_num in 0..self.config.max_rounds {
            rounds += 1;

            // Detection latency is bounded by one round: poll before every
            // round after the first, once a cache exists to compare against.
            if self.config.dynamic_tools && options.use_tools && round_num > 0 {
                if self.adapter.check_for_changes().await {
                    info!("Refreshing tool specs after host capability change");
                    self.adapter.discover_tools(true).await?;
                }
            }

            let response = if options.use_tools {
                let tools = self.adapter.discover_tools(false).await?;
                debug!(
                    round = round_num + 1,
                    tools = tools.len(),
                    "Requesting model completion with tools"
                );
                self.model.complete(&messages, Some(&tools)).await?
            } else {
                debug!(round = round_num + 1, "Requesting model completion");
                self.model.complete(&messages, None).await?
            };

            let tool_calls = parser::extract_tool_calls(&response);
            if tool_calls.is_empty() {
                let content = parser::final_content(&response);
                if !content.is_empty() {
                    messages.push(ChatMessage::assistant(content.clone()));
                }
                info!(rounds, tool_calls_made, "Conversation completed");
                return Ok(ConversationOutcome {
                    final_response: content,
                    messages,
                    tool_calls_made,
                    rounds,
                });
            }

            for call in tool_calls {
                tool_calls_made += 1;
                let execution = self.adapter.execute_tool(&call.name, &call.args).await;
                let prefix = if execution.success {
                    "TOOL RESULT"
                } else {
                    "TOOL ERROR"
                };
                info!(tool = %call.name, success = execution.success, "Tool executed");
                messages.push(ChatMessage::assistant(format!(
                    "{prefix} ({name}): {output}",
                    name = call.name,
                    output = execution.output
                )));
            }
        }

        warn!(
            max_rounds = self.config.max_rounds,
            tool_calls_made, "Max conversation rounds reached"
        );
        Ok(ConversationOutcome {
            final_response: MAX_ROUNDS_MESSAGE.to_string(),
            messages,
            tool_calls_made,
            rounds,
        })
    }
}
