use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use study_core::model::Role;

use crate::error::LlmError;
use crate::llm::client::{CompletionRequest, LlmClient};
use crate::llm::config::LlmConfig;

/// `LlmClient` backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Http` if the HTTP client cannot be initialized.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let payload = ChatRequest {
            model: &self.config.model,
            messages: build_messages(request),
            temperature: 0.2,
        };
        tracing::debug!(
            model = %self.config.model,
            messages = payload.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        Ok(content)
    }
}

fn build_messages(request: &CompletionRequest) -> Vec<ChatMessage<'_>> {
    let mut messages = Vec::with_capacity(request.history.len() + 2);

    let mut system = request.system.clone().unwrap_or_default();
    for document in &request.context {
        if !system.is_empty() {
            system.push_str("\n\n");
        }
        system.push_str("Reference material:\n");
        system.push_str(document);
    }
    if !system.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: system.into(),
        });
    }

    messages.extend(request.history.iter().map(|turn| ChatMessage {
        role: match turn.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        },
        content: turn.text.as_str().into(),
    }));

    messages.push(ChatMessage {
        role: "user",
        content: request.prompt.as_str().into(),
    });
    messages
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: std::borrow::Cow<'a, str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
