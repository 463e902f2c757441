use std::sync::Arc;

use study_core::Clock;
use study_core::model::{PlanRequest, StudyPlan, recover_sessions};
use study_core::recovery::ValidationNotice;

use crate::condense::{MAX_PROMPT_CHARS, condense_if_needed};
use crate::error::GenerationError;
use crate::llm::{CompletionRequest, LlmClient};
use crate::prompts;

/// A plan plus any count mismatch noticed while reading it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanGeneration {
    pub plan: StudyPlan,
    pub notices: Vec<ValidationNotice>,
}

/// Builds dated study plans from course material.
#[derive(Clone)]
pub struct StudyPlanService {
    clock: Clock,
    llm: Arc<dyn LlmClient>,
}

impl StudyPlanService {
    #[must_use]
    pub fn new(clock: Clock, llm: Arc<dyn LlmClient>) -> Self {
        Self { clock, llm }
    }

    /// Generate a plan covering `request` from `document_text`.
    ///
    /// Material longer than 12 000 characters is condensed first.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::EmptyInput` for blank material or when the
    /// request yields no study dates, `GenerationError::Collaborator` when the
    /// model call fails, and `GenerationError::Recovery` when the answer
    /// cannot be read as sessions.
    pub async fn generate(
        &self,
        request: PlanRequest,
        document_text: &str,
    ) -> Result<PlanGeneration, GenerationError> {
        if document_text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let dates = request.dates();
        if dates.is_empty() {
            return Err(GenerationError::EmptyInput);
        }

        let material =
            condense_if_needed(self.llm.as_ref(), document_text, MAX_PROMPT_CHARS).await;
        let completion_request =
            CompletionRequest::new(prompts::plan(&request, &dates, &material))
                .with_system(prompts::PLAN_SYSTEM);

        let completion = self
            .llm
            .complete(&completion_request)
            .await
            .inspect_err(|err| tracing::warn!(error = %err, "plan generation call failed"))?;

        let recovered = recover_sessions(&completion, &request, &dates)
            .into_result()
            .inspect_err(|failure| {
                tracing::warn!(reason = %failure.reason, "could not recover plan sessions");
            })?;

        tracing::info!(
            dates = dates.len(),
            sessions = recovered.sessions.len(),
            "generated study plan"
        );
        let plan = StudyPlan::new(
            request,
            recovered.sessions,
            recovered.notes,
            self.clock.now(),
        );
        Ok(PlanGeneration {
            plan,
            notices: recovered.notices,
        })
    }
}
