use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts;

/// Longest material, in characters, handed to a generation prompt verbatim.
pub const MAX_PROMPT_CHARS: usize = 12_000;

/// Shrink `text` to fit a prompt.
///
/// Text up to `max_chars` characters is returned unchanged. Longer text is
/// condensed by the model; if that call fails the first `max_chars`
/// characters are used instead. Never fails.
pub async fn condense_if_needed(llm: &dyn LlmClient, text: &str, max_chars: usize) -> String {
    let length = text.chars().count();
    if length <= max_chars {
        return text.to_string();
    }

    tracing::info!(length, max_chars, "condensing long document before prompting");
    match llm.complete(&CompletionRequest::new(prompts::condense(text))).await {
        Ok(condensed) => condensed,
        Err(err) => {
            tracing::warn!(error = %err, "condensing failed, truncating instead");
            truncate_chars(text, max_chars)
        }
    }
}

pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Fixed {
        reply: Result<&'static str, ()>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LlmClient for Fixed {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            self.reply
                .map(str::to_string)
                .map_err(|()| LlmError::Timeout)
        }
    }

    fn fixed(reply: Result<&'static str, ()>) -> Fixed {
        Fixed {
            reply,
            calls: Mutex::new(0),
        }
    }

    #[tokio::test]
    async fn short_text_skips_the_model() {
        let llm = fixed(Ok("condensed"));
        let out = condense_if_needed(&llm, "short", 10).await;
        assert_eq!(out, "short");
        assert_eq!(*llm.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn long_text_is_condensed() {
        let llm = fixed(Ok("condensed"));
        let out = condense_if_needed(&llm, "0123456789abc", 10).await;
        assert_eq!(out, "condensed");
    }

    #[tokio::test]
    async fn failure_falls_back_to_truncation_by_characters() {
        let llm = fixed(Err(()));
        let out = condense_if_needed(&llm, "가나다라마바사", 3).await;
        assert_eq!(out, "가나다");
    }
}
