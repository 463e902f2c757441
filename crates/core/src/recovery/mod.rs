//! Turning free-form model output into typed records.
//!
//! The pipeline runs extraction, lenient parsing and batch validation in that
//! order. Each stage yields a [`ParseOutcome`]; the first failure stops the
//! pipeline and carries the text that could not be recovered.

mod extract;
mod lenient;
mod outcome;
mod validate;

pub use extract::{extract_candidate, extract_object};
pub use lenient::parse_lenient;
pub use outcome::{ParseOutcome, RecoveryError, RecoveryFailure};
pub use validate::{Record, Schema, Validated, ValidationNotice, validate_batch};

pub(crate) use validate::{integer, scalar_text, text_field};

/// Run the whole pipeline over a model completion.
///
/// Failures carry the full completion so it can be shown for manual
/// inspection.
pub fn recover_batch<T, F>(
    completion: &str,
    requested: usize,
    schema: &Schema,
    coerce: F,
) -> ParseOutcome<Validated<T>>
where
    F: FnMut(usize, &Record) -> Result<T, RecoveryError>,
{
    extract_candidate(completion)
        .and_then(|candidate| parse_lenient(&candidate))
        .and_then(|value| validate_batch(value, requested, schema, coerce))
        .with_raw(completion)
}
