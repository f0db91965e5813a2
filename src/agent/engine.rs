//! The conversation turn loop.

use std::sync::Arc;

use thiserror::Error;

use crate::llm::{
    ContentBlock, DEFAULT_MAX_TOKENS, LLMRequest, Message, Provider, ProviderError, StopReason,
};
use crate::stores::ConversationStore;
use crate::tools::{ToolExecutor, tool_definitions};

use super::prompt::SYSTEM_PROMPT;

/// Tool rounds allowed per user turn before the engine gives up.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("conversation store error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("model exceeded {limit} tool rounds in one turn")]
    ToolRoundsExceeded { limit: usize },
}

/// Drives one conversational turn per inbound message: model calls, tool
/// execution rounds, and a single history upsert at the end.
pub struct ConversationEngine {
    provider: Arc<dyn Provider>,
    executor: ToolExecutor,
    conversations: ConversationStore,
    model: String,
    max_tokens: u32,
    max_tool_rounds: usize,
}

impl ConversationEngine {
    pub fn new(
        provider: Arc<dyn Provider>,
        executor: ToolExecutor,
        conversations: ConversationStore,
    ) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            executor,
            conversations,
            model,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_tool_rounds(mut self, max_tool_rounds: usize) -> Self {
        self.max_tool_rounds = max_tool_rounds;
        self
    }

    /// Run one turn for `contact_id` and return the assistant's answer.
    ///
    /// The stored history is loaded once, grown in memory through however
    /// many tool rounds the model requests, and persisted in a single
    /// upsert after the final answer. Nothing is written when the provider
    /// fails or the round limit trips, so a stored history never ends on a
    /// dangling tool request.
    pub async fn handle_message(
        &self,
        contact_id: &str,
        text: &str,
    ) -> Result<String, EngineError> {
        let mut history = self.conversations.history(contact_id).await?;
        history.push(Message::user(text));

        let mut rounds = 0usize;
        let answer = loop {
            let request = LLMRequest::new(&self.model, history.clone())
                .with_system(SYSTEM_PROMPT)
                .with_tools(tool_definitions())
                .with_max_tokens(self.max_tokens);
            let response = self.provider.complete(request).await?;

            if response.stop_reason != Some(StopReason::ToolUse) {
                break response.text();
            }

            rounds += 1;
            if rounds > self.max_tool_rounds {
                tracing::error!(
                    "Engine: {contact_id} exceeded {} tool rounds, aborting turn",
                    self.max_tool_rounds
                );
                return Err(EngineError::ToolRoundsExceeded {
                    limit: self.max_tool_rounds,
                });
            }

            history.push(Message::assistant(response.content.clone()));

            // Tool calls in one response run sequentially, in request
            // order; later calls may depend on earlier writes.
            let mut results = Vec::new();
            for block in &response.content {
                if let ContentBlock::ToolUse { id, name, input } = block {
                    tracing::info!("Engine: {contact_id} requested {name}");
                    let outcome = self.executor.execute(name, input.clone()).await;
                    results.push(ContentBlock::ToolResult {
                        tool_use_id: id.clone(),
                        content: outcome.to_content(),
                    });
                }
            }
            history.push(Message::tool_results(results));
        };

        history.push(Message::assistant_text(&answer));
        self.conversations.upsert(contact_id, &history).await?;
        tracing::debug!(
            "Engine: {contact_id} turn complete after {rounds} tool rounds ({} messages)",
            history.len()
        );
        Ok(answer)
    }
}
