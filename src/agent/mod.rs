//! Conversation engine: persona prompt plus the per-turn tool loop.

mod engine;
mod prompt;

#[cfg(test)]
mod tests;

pub use engine::{ConversationEngine, DEFAULT_MAX_TOOL_ROUNDS, EngineError};
pub use prompt::SYSTEM_PROMPT;
