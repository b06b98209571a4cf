pub mod bridge;
pub mod domain;
pub mod hosting;
pub mod model;
pub mod registry;
pub mod tooling;

pub use bridge::adapter::{ToolExecution, ToolHostAdapter};
pub use bridge::parser::ToolCallRequest;
pub use bridge::{
    Bridge, BridgeConfig, BridgeError, ConversationOptions, ConversationOutcome,
    MAX_ROUNDS_MESSAGE,
};
pub use domain::types::{ChatMessage, MessageRole};
pub use hosting::{HostedTool, LocalToolHost};
pub use model::{
    ChatCompletion, Choice, FunctionSpec, ModelError, ModelHost, ResponseMessage, ToolSpec,
    openai::OpenAiModelHost,
};
pub use registry::{RegistryError, RegistryStats, ToolMetadata, ToolRegistry};
pub use tooling::{ContentBlock, HostTool, ToolCallResult, ToolHost, ToolHostError};
