use thiserror::Error;

/// Why a model completion could not be turned into structured data.
///
/// Every variant is recoverable: callers surface it together with the raw
/// text and may retry the request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RecoveryError {
    #[error("no bracketed payload found in the response")]
    ExtractionFailure,

    #[error("payload is not valid JSON, even after relaxing quotes: {detail}")]
    ParseFailure { detail: String },

    /// The payload is not a list (`index` is `None`) or one of its
    /// elements is not a record.
    #[error("{}", shape_message(*index))]
    InvalidShape { index: Option<usize> },

    #[error("item {index} is missing required field `{key}`")]
    MissingField { index: usize, key: &'static str },

    #[error("item {index} has an unusable `{key}` field")]
    InvalidField { index: usize, key: &'static str },

    #[error("item {index}: `{key}` must have exactly {expected} entries, found {found}")]
    WrongArity {
        index: usize,
        key: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("item {index} has an answer index that is not a valid choice")]
    InvalidAnswerIndex { index: usize },
}

impl RecoveryError {
    /// Index of the offending item, for per-item failures.
    #[must_use]
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Self::InvalidShape { index } => *index,
            Self::MissingField { index, .. }
            | Self::InvalidField { index, .. }
            | Self::WrongArity { index, .. }
            | Self::InvalidAnswerIndex { index } => Some(*index),
            Self::ExtractionFailure | Self::ParseFailure { .. } => None,
        }
    }
}

fn shape_message(index: Option<usize>) -> String {
    match index {
        Some(index) => format!("item {index} is not a record"),
        None => "expected a list of records".to_string(),
    }
}

/// A recovery failure together with the text that could not be recovered.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{reason}")]
pub struct RecoveryFailure {
    pub reason: RecoveryError,
    pub raw: String,
}

/// Result of one recovery stage.
///
/// Stages chain with [`ParseOutcome::and_then`], so a failure short-circuits
/// the rest of the pipeline while keeping the raw text for inspection.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum ParseOutcome<T> {
    Success(T),
    Failure(RecoveryFailure),
}

impl<T> ParseOutcome<T> {
    pub fn failure(reason: RecoveryError, raw: impl Into<String>) -> Self {
        Self::Failure(RecoveryFailure {
            reason,
            raw: raw.into(),
        })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            Self::Success(value) => ParseOutcome::Success(f(value)),
            Self::Failure(failure) => ParseOutcome::Failure(failure),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> ParseOutcome<U>) -> ParseOutcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(failure) => ParseOutcome::Failure(failure),
        }
    }

    /// Replace the raw text carried by a failure, e.g. with the full completion.
    pub fn with_raw(self, raw: &str) -> Self {
        match self {
            Self::Failure(RecoveryFailure { reason, .. }) => Self::failure(reason, raw),
            success => success,
        }
    }

    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the carried `RecoveryFailure` for the `Failure` variant.
    pub fn into_result(self) -> Result<T, RecoveryFailure> {
        self.into()
    }
}

impl<T> From<ParseOutcome<T>> for Result<T, RecoveryFailure> {
    fn from(outcome: ParseOutcome<T>) -> Self {
        match outcome {
            ParseOutcome::Success(value) => Ok(value),
            ParseOutcome::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_then_short_circuits_on_failure() {
        let outcome: ParseOutcome<u32> =
            ParseOutcome::failure(RecoveryError::InvalidShape { index: None }, "raw");
        let mut called = false;
        let chained = outcome.and_then(|v| {
            called = true;
            ParseOutcome::Success(v + 1)
        });
        assert!(!called);
        assert_eq!(
            chained.into_result().unwrap_err().reason,
            RecoveryError::InvalidShape { index: None }
        );
    }

    #[test]
    fn with_raw_only_touches_failures() {
        let failed: ParseOutcome<()> =
            ParseOutcome::failure(RecoveryError::ExtractionFailure, "candidate");
        let failure = failed.with_raw("full text").into_result().unwrap_err();
        assert_eq!(failure.raw, "full text");

        let ok = ParseOutcome::Success(3).with_raw("ignored");
        assert_eq!(ok, ParseOutcome::Success(3));
    }

    #[test]
    fn item_index_is_reported_for_item_errors() {
        let err = RecoveryError::MissingField {
            index: 2,
            key: "question",
        };
        assert_eq!(err.item_index(), Some(2));
        assert_eq!(RecoveryError::ExtractionFailure.item_index(), None);
    }
}
