//! Shared error types for the services crate.

use thiserror::Error;

use storage::StorageError;
use study_core::model::NoteError;
use study_core::recovery::RecoveryFailure;

/// Failures of the language-model collaborator.
///
/// All of them are recoverable; the caller may retry the same request.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error("language model returned an empty response")]
    EmptyResponse,
    #[error("language model request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error("language model request timed out")]
    Timeout,
    #[error(transparent)]
    Http(reqwest::Error),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }
}

/// Missing or malformed configuration. Fatal for the affected flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("no API key configured: set STUDY_AI_API_KEY or OPENAI_API_KEY")]
    MissingApiKey,
    #[error("STUDY_AI_TIMEOUT_SECS must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
}

/// Errors emitted by the generation services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("there is no text to work from")]
    EmptyInput,
    #[error("{what} must be between {min} and {max}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },
    #[error(transparent)]
    Collaborator(#[from] LlmError),
    #[error("could not read the model's answer: {0}")]
    Recovery(#[from] RecoveryFailure),
}

impl GenerationError {
    /// Raw model output attached to recovery failures, for manual inspection.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Recovery(failure) => Some(&failure.raw),
            _ => None,
        }
    }
}

/// Errors emitted by `NotesService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NotesServiceError {
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while exporting a plan.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while assembling the service set.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}
