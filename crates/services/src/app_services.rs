use std::sync::Arc;

use storage::Storage;
use study_core::Clock;

use crate::chat_service::ChatService;
use crate::error::AppServicesError;
use crate::llm::{LlmClient, LlmConfig, OpenAiClient};
use crate::notes_service::NotesService;
use crate::plan_service::StudyPlanService;
use crate::quiz_service::QuizService;
use crate::summary_service::SummaryService;

/// Assembles app-facing services over one model client and one storage.
#[derive(Clone)]
pub struct StudyServices {
    storage: Storage,
    quiz: Arc<QuizService>,
    plans: Arc<StudyPlanService>,
    summaries: Arc<SummaryService>,
    chat: Arc<ChatService>,
    notes: Arc<NotesService>,
}

impl StudyServices {
    /// Build services that talk to the configured OpenAI-compatible endpoint.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Config` when no API key is configured and
    /// `AppServicesError::Llm` if the HTTP client cannot be built.
    pub fn from_env(clock: Clock, storage: Storage) -> Result<Self, AppServicesError> {
        let config = LlmConfig::from_env()?;
        tracing::info!(
            model = %config.model,
            base_url = %config.base_url,
            "language model configured"
        );
        let llm: Arc<dyn LlmClient> = Arc::new(OpenAiClient::new(config)?);
        Ok(Self::new(clock, storage, llm))
    }

    #[must_use]
    pub fn new(clock: Clock, storage: Storage, llm: Arc<dyn LlmClient>) -> Self {
        Self {
            quiz: Arc::new(QuizService::new(Arc::clone(&llm))),
            plans: Arc::new(StudyPlanService::new(clock, Arc::clone(&llm))),
            summaries: Arc::new(SummaryService::new(Arc::clone(&llm))),
            chat: Arc::new(ChatService::new(llm)),
            notes: Arc::new(NotesService::new(clock, Arc::clone(&storage.sessions))),
            storage,
        }
    }

    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[must_use]
    pub fn quiz(&self) -> Arc<QuizService> {
        Arc::clone(&self.quiz)
    }

    #[must_use]
    pub fn plans(&self) -> Arc<StudyPlanService> {
        Arc::clone(&self.plans)
    }

    #[must_use]
    pub fn summaries(&self) -> Arc<SummaryService> {
        Arc::clone(&self.summaries)
    }

    #[must_use]
    pub fn chat(&self) -> Arc<ChatService> {
        Arc::clone(&self.chat)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NotesService> {
        Arc::clone(&self.notes)
    }
}
