//! Locate the JSON payload inside free-form model output.
//!
//! This is a bracket heuristic, not a tokenizer: brackets in surrounding prose
//! can widen the span. Such spans fail to parse later and are reported as
//! recoverable failures.

use super::outcome::{ParseOutcome, RecoveryError};

/// Extract a list-shaped candidate from `text`.
///
/// Prefers the greedy span from the first `[` to the last `]`. Without one,
/// falls back to the first `{` .. last `}` span wrapped in `[` `]` so that the
/// result always has list-of-records shape.
pub fn extract_candidate(text: &str) -> ParseOutcome<String> {
    if let Some(span) = span(text, '[', ']') {
        return ParseOutcome::Success(span.to_owned());
    }
    if let Some(span) = span(text, '{', '}') {
        return ParseOutcome::Success(format!("[{span}]"));
    }
    tracing::debug!(len = text.len(), "no bracketed payload in response");
    ParseOutcome::failure(RecoveryError::ExtractionFailure, text)
}

/// Extract an object-shaped candidate from `text`.
///
/// Variant for envelope responses such as
/// `{"sessions": [...], "notes": "..."}`. Whichever bracket opens first
/// decides the shape, so a bare list of objects is returned as the list.
pub fn extract_object(text: &str) -> ParseOutcome<String> {
    let object = span(text, '{', '}');
    let array = span(text, '[', ']');
    let array_first = text.find('[') < text.find('{') || text.find('{').is_none();
    let chosen = if array_first {
        array.or(object)
    } else {
        object.or(array)
    };
    if let Some(span) = chosen {
        return ParseOutcome::Success(span.to_owned());
    }
    tracing::debug!(len = text.len(), "no bracketed payload in response");
    ParseOutcome::failure(RecoveryError::ExtractionFailure, text)
}

fn span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}
