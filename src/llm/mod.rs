//! Model protocol types and the Anthropic provider.

mod error;
mod types;

pub mod anthropic;

pub use error::{ProviderError, Result};
pub use types::{
    ContentBlock, DEFAULT_MAX_TOKENS, LLMRequest, LLMResponse, Message, Provider, Role,
    StopReason, TokenUsage, ToolDefinition,
};
