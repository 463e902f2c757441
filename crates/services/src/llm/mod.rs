mod client;
mod config;
mod openai;

pub use client::{CompletionRequest, LlmClient};
pub use config::LlmConfig;
pub use openai::OpenAiClient;
