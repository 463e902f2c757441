#![forbid(unsafe_code)]

pub mod app_services;
pub mod chat_service;
pub mod condense;
pub mod error;
pub mod export;
pub mod llm;
pub mod notes_service;
pub mod plan_service;
pub mod prompts;
pub mod quiz_service;
pub mod summary_service;

pub use study_core::Clock;

pub use app_services::StudyServices;
pub use chat_service::ChatService;
pub use error::{
    AppServicesError, ConfigError, ExportError, GenerationError, LlmError, NotesServiceError,
};
pub use export::{default_csv_name, plan_csv, plan_to_json, write_plan_csv};
pub use llm::{CompletionRequest, LlmClient, LlmConfig, OpenAiClient};
pub use notes_service::NotesService;
pub use plan_service::{PlanGeneration, StudyPlanService};
pub use prompts::ExplainOptions;
pub use quiz_service::{QuizGeneration, QuizService};
pub use summary_service::SummaryService;
