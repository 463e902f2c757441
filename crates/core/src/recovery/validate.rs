//! Batch validation of parsed model output against a record schema.

use serde_json::{Map, Value};

use super::outcome::{ParseOutcome, RecoveryError};

/// JSON object as produced by the parser.
pub type Record = Map<String, Value>;

/// Shape every record of a batch must have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    required: &'static [&'static str],
    list_field: Option<(&'static str, usize)>,
    truncate_excess: bool,
}

impl Schema {
    #[must_use]
    pub fn new(required: &'static [&'static str]) -> Self {
        Self {
            required,
            list_field: None,
            truncate_excess: true,
        }
    }

    /// Require `key` to be a list of exactly `len` entries.
    #[must_use]
    pub fn with_list_field(mut self, key: &'static str, len: usize) -> Self {
        self.list_field = Some((key, len));
        self
    }

    /// Keep records beyond the requested count instead of truncating.
    ///
    /// The "too many" notice is still emitted.
    #[must_use]
    pub fn keep_excess(mut self) -> Self {
        self.truncate_excess = false;
        self
    }

    #[must_use]
    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }

    fn check(&self, index: usize, record: &Record) -> Result<(), RecoveryError> {
        if let Some(key) = self.required.iter().copied().find(|key| !record.contains_key(*key)) {
            return Err(RecoveryError::MissingField { index, key });
        }
        if let Some((key, expected)) = self.list_field {
            let found = match record.get(key) {
                Some(Value::Array(items)) => items.len(),
                Some(_) => 0,
                None => return Err(RecoveryError::MissingField { index, key }),
            };
            if found != expected {
                return Err(RecoveryError::WrongArity {
                    index,
                    key,
                    expected,
                    found,
                });
            }
        }
        Ok(())
    }
}

/// Non-fatal observations about a batch's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationNotice {
    TooMany { produced: usize, requested: usize },
    TooFew { produced: usize, requested: usize },
}

impl std::fmt::Display for ValidationNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooMany {
                produced,
                requested,
            } => write!(
                f,
                "the model produced {produced} items; only the first {requested} are used"
            ),
            Self::TooFew {
                produced,
                requested,
            } => write!(
                f,
                "the model produced {produced} items, fewer than the {requested} requested"
            ),
        }
    }
}

/// A batch that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub items: Vec<T>,
    pub notices: Vec<ValidationNotice>,
}

/// Validate `value` as a batch of `requested` records and coerce each one.
///
/// Acceptance is atomic: the first record that fails the schema or the
/// coercion rejects the whole batch.
pub fn validate_batch<T, F>(
    value: Value,
    requested: usize,
    schema: &Schema,
    mut coerce: F,
) -> ParseOutcome<Validated<T>>
where
    F: FnMut(usize, &Record) -> Result<T, RecoveryError>,
{
    let raw = value.to_string();
    let Value::Array(mut elements) = value else {
        return ParseOutcome::failure(RecoveryError::InvalidShape { index: None }, raw);
    };

    let mut notices = Vec::new();
    let produced = elements.len();
    if produced > requested {
        notices.push(ValidationNotice::TooMany {
            produced,
            requested,
        });
        if schema.truncate_excess {
            elements.truncate(requested);
        }
    } else if produced < requested {
        notices.push(ValidationNotice::TooFew {
            produced,
            requested,
        });
    }

    let mut items = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        let Value::Object(record) = element else {
            return ParseOutcome::failure(RecoveryError::InvalidShape { index: Some(index) }, raw);
        };
        let coerced = schema
            .check(index, record)
            .and_then(|()| coerce(index, record));
        match coerced {
            Ok(item) => items.push(item),
            Err(reason) => {
                tracing::debug!(%reason, "rejecting batch");
                return ParseOutcome::failure(reason, raw);
            }
        }
    }

    ParseOutcome::Success(Validated { items, notices })
}

// ─── Field helpers ─────────────────────────────────────────────────────────────

/// Read a field as text. Numbers and booleans are rendered as text.
pub(crate) fn text_field(
    index: usize,
    record: &Record,
    key: &'static str,
) -> Result<Option<String>, RecoveryError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => scalar_text(value)
            .map(Some)
            .ok_or(RecoveryError::InvalidField { index, key }),
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a non-negative integer from a number, integral float or numeric string.
pub(crate) fn integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u64)
            })
        }
        _ => None,
    }
}
