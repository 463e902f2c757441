use std::sync::Arc;

use crate::condense::{MAX_PROMPT_CHARS, condense_if_needed, truncate_chars};
use crate::error::GenerationError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts::{self, ExplainOptions};

pub const MAX_SUMMARY_SENTENCES: usize = 10;
pub const QUICK_SUMMARY_CHARS: usize = 150;
pub const MAX_CHECKLIST_STEPS: usize = 5;

/// Free-text flows: summaries, topic explanations and checklists.
#[derive(Clone)]
pub struct SummaryService {
    llm: Arc<dyn LlmClient>,
}

impl SummaryService {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Summarize a transcript or document in `sentences` sentences.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank text,
    /// `GenerationError::OutOfRange` if `sentences` is outside `1..=10`, and
    /// `GenerationError::Collaborator` when the model call fails.
    pub async fn summarize(&self, text: &str, sentences: usize) -> Result<String, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        if !(1..=MAX_SUMMARY_SENTENCES).contains(&sentences) {
            return Err(GenerationError::OutOfRange {
                what: "summary sentences",
                value: sentences,
                min: 1,
                max: MAX_SUMMARY_SENTENCES,
            });
        }
        let material = condense_if_needed(self.llm.as_ref(), text, MAX_PROMPT_CHARS).await;
        self.ask(CompletionRequest::new(prompts::summarize(&material, sentences)), "summary")
            .await
    }

    /// Explain `topic` as Markdown.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for a blank topic and
    /// `GenerationError::Collaborator` when the model call fails.
    pub async fn explain(
        &self,
        topic: &str,
        options: ExplainOptions,
    ) -> Result<String, GenerationError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let request = CompletionRequest::new(prompts::explain(topic, options))
            .with_system(prompts::EXPLAIN_SYSTEM);
        self.ask(request, "explanation").await
    }

    /// Summary of at most 150 characters. Longer answers are cut.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank text and
    /// `GenerationError::Collaborator` when the model call fails.
    pub async fn quick_summary(&self, text: &str) -> Result<String, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let material = condense_if_needed(self.llm.as_ref(), text, MAX_PROMPT_CHARS).await;
        let summary = self
            .ask(
                CompletionRequest::new(prompts::quick_summary(&material, QUICK_SUMMARY_CHARS)),
                "quick summary",
            )
            .await?;
        Ok(truncate_chars(&summary, QUICK_SUMMARY_CHARS))
    }

    /// Turn an explanation into at most five actionable steps.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank text or an answer with
    /// no usable lines, and `GenerationError::Collaborator` when the model
    /// call fails.
    pub async fn checklist(&self, text: &str) -> Result<Vec<String>, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let material = condense_if_needed(self.llm.as_ref(), text, MAX_PROMPT_CHARS).await;
        let answer = self
            .ask(
                CompletionRequest::new(prompts::checklist(&material, MAX_CHECKLIST_STEPS)),
                "checklist",
            )
            .await?;
        let steps = checklist_steps(&answer);
        if steps.is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        Ok(steps)
    }

    async fn ask(&self, request: CompletionRequest, flow: &str) -> Result<String, GenerationError> {
        let answer = self
            .llm
            .complete(&request)
            .await
            .inspect_err(|err| tracing::warn!(flow, error = %err, "generation call failed"))?;
        tracing::info!(flow, chars = answer.chars().count(), "generated text");
        Ok(answer)
    }
}

/// Steps of a checklist answer with bullets, numbering and checkboxes removed.
///
/// When any line carries a marker, unmarked lines are treated as prose and
/// dropped. Lines ending in `:` are headings, never steps.
fn checklist_steps(answer: &str) -> Vec<String> {
    let lines: Vec<(bool, &str)> = answer
        .lines()
        .map(strip_marker)
        .filter(|(_, text)| !text.is_empty() && !text.ends_with(':'))
        .collect();
    let any_marked = lines.iter().any(|(marked, _)| *marked);
    lines
        .into_iter()
        .filter(|(marked, _)| *marked || !any_marked)
        .take(MAX_CHECKLIST_STEPS)
        .map(|(_, text)| text.to_owned())
        .collect()
}

/// Split a leading marker off `line`, reporting whether one was found.
fn strip_marker(line: &str) -> (bool, &str) {
    let mut line = line.trim();
    let mut marked = false;
    if let Some(rest) = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
    {
        line = rest.trim_start();
        marked = true;
    }
    if let Some(rest) = line
        .strip_prefix("[ ]")
        .or_else(|| line.strip_prefix("[x]"))
        .or_else(|| line.strip_prefix("[X]"))
    {
        line = rest.trim_start();
        marked = true;
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            line = rest.trim_start();
            marked = true;
        }
    }
    (marked, line)
}
