use std::sync::Arc;

use study_core::model::{ConversationState, Role};

use crate::error::GenerationError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts;

/// Conversational companion over a `ConversationState`.
#[derive(Clone)]
pub struct ChatService {
    llm: Arc<dyn LlmClient>,
}

impl ChatService {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Send `text` and return the assistant's reply.
    ///
    /// The model sees the full transcript and, when set, the active mode's
    /// instruction. Both turns are appended only after the reply arrives, so
    /// a failed call leaves `state` exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank text and
    /// `GenerationError::Collaborator` when the model call fails.
    pub async fn send(
        &self,
        state: &mut ConversationState,
        text: &str,
    ) -> Result<String, GenerationError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        let system = match state.mode() {
            Some(mode) => format!("{}\n\n{}", prompts::CHAT_SYSTEM, mode.instruction()),
            None => prompts::CHAT_SYSTEM.to_string(),
        };
        let request = CompletionRequest::new(text)
            .with_system(system)
            .with_history(state.history());

        let reply = self
            .llm
            .complete(&request)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "chat call failed"))?;

        state.append_turn(Role::User, text);
        state.append_turn(Role::Assistant, reply.as_str());
        tracing::debug!(turns = state.history().len(), "chat turn recorded");
        Ok(reply)
    }
}
