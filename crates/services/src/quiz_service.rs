use std::sync::Arc;

use study_core::model::{DEFAULT_CHOICE_COUNT, Difficulty, QuizItem, recover_quiz};
use study_core::recovery::ValidationNotice;

use crate::condense::{MAX_PROMPT_CHARS, condense_if_needed};
use crate::error::GenerationError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts;

/// Most questions a single generation may ask for.
pub const MAX_QUESTIONS: usize = 10;

/// Bounds on the number of answer options per question.
pub const MIN_CHOICES: usize = 2;
pub const MAX_CHOICES: usize = 8;

/// Questions recovered from one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizGeneration {
    pub items: Vec<QuizItem>,
    /// Count mismatches between what was asked and what came back.
    pub notices: Vec<ValidationNotice>,
}

/// Generates multiple-choice questions from study material.
#[derive(Clone)]
pub struct QuizService {
    llm: Arc<dyn LlmClient>,
    choice_count: usize,
}

impl QuizService {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            choice_count: DEFAULT_CHOICE_COUNT,
        }
    }

    #[must_use]
    pub fn with_choice_count(mut self, choice_count: usize) -> Self {
        self.choice_count = choice_count;
        self
    }

    #[must_use]
    pub fn choice_count(&self) -> usize {
        self.choice_count
    }

    /// Ask for `count` questions about `context`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank material,
    /// `GenerationError::OutOfRange` if `count` is outside `1..=10` or the
    /// configured choice count is outside `2..=8`,
    /// `GenerationError::Collaborator` when the model call fails, and
    /// `GenerationError::Recovery` (carrying the raw completion) when the
    /// answer cannot be turned into questions.
    pub async fn generate(
        &self,
        context: &str,
        count: usize,
        difficulty: Difficulty,
    ) -> Result<QuizGeneration, GenerationError> {
        if context.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        if !(1..=MAX_QUESTIONS).contains(&count) {
            return Err(GenerationError::OutOfRange {
                what: "question count",
                value: count,
                min: 1,
                max: MAX_QUESTIONS,
            });
        }
        if !(MIN_CHOICES..=MAX_CHOICES).contains(&self.choice_count) {
            return Err(GenerationError::OutOfRange {
                what: "choice count",
                value: self.choice_count,
                min: MIN_CHOICES,
                max: MAX_CHOICES,
            });
        }

        let material = condense_if_needed(self.llm.as_ref(), context, MAX_PROMPT_CHARS).await;
        let request = CompletionRequest::new(prompts::quiz(
            &material,
            count,
            self.choice_count,
            difficulty,
        ))
        .with_system(prompts::QUIZ_SYSTEM);

        let completion = self.llm.complete(&request).await.inspect_err(|err| {
            tracing::warn!(error = %err, "quiz generation call failed");
        })?;

        let validated = recover_quiz(&completion, count, self.choice_count)
            .into_result()
            .inspect_err(|failure| {
                tracing::warn!(reason = %failure.reason, "could not recover quiz items");
            })?;

        tracing::info!(
            requested = count,
            received = validated.items.len(),
            "generated quiz"
        );
        Ok(QuizGeneration {
            items: validated.items,
            notices: validated.notices,
        })
    }
}
