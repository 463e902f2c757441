use async_trait::async_trait;
use study_core::model::ConversationTurn;

use crate::error::LlmError;

/// Everything the model gets to see for one completion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    /// Earlier turns of the conversation, oldest first.
    pub history: Vec<ConversationTurn>,
    /// Reference documents the answer should draw on.
    pub context: Vec<String>,
    pub prompt: String,
}

impl CompletionRequest {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, document: impl Into<String>) -> Self {
        self.context.push(document.into());
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: &[ConversationTurn]) -> Self {
        self.history = history.to_vec();
        self
    }
}

/// The language-model collaborator.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Produce a completion for `request`.
    ///
    /// # Errors
    ///
    /// Returns `LlmError` when the provider cannot be reached, rejects the
    /// request, times out, or answers with nothing.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
