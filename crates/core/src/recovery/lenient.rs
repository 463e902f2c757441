//! Strict-then-relaxed JSON parsing of an extracted candidate.

use serde_json::Value;

use super::outcome::{ParseOutcome, RecoveryError};

/// Parse `candidate` as JSON, retrying once on a relaxed literal form.
///
/// The relaxed form accepts single-quoted strings, `True`/`False`/`None`
/// and trailing commas. A candidate that fails both attempts is returned
/// untouched inside the failure.
pub fn parse_lenient(candidate: &str) -> ParseOutcome<Value> {
    let strict_err = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return ParseOutcome::Success(value),
        Err(err) => err,
    };

    let relaxed = relax_literals(candidate);
    match serde_json::from_str::<Value>(&relaxed) {
        Ok(value) => {
            tracing::debug!(%strict_err, "strict parse failed, relaxed parse succeeded");
            ParseOutcome::Success(value)
        }
        Err(relaxed_err) => {
            tracing::debug!(%strict_err, %relaxed_err, "candidate is not recoverable JSON");
            ParseOutcome::failure(
                RecoveryError::ParseFailure {
                    detail: strict_err.to_string(),
                },
                candidate,
            )
        }
    }
}

#[derive(Clone, Copy)]
enum State {
    Outside,
    Double { escaped: bool },
    Single { escaped: bool },
}

/// Rewrite literal-style text into JSON.
fn relax_literals(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = State::Outside;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match state {
            State::Outside => match ch {
                '"' => {
                    state = State::Double { escaped: false };
                    out.push('"');
                }
                '\'' => {
                    state = State::Single { escaped: false };
                    out.push('"');
                }
                ',' if closes_next(&chars[i + 1..]) => {}
                c if c.is_alphabetic() || c == '_' => {
                    let start = i;
                    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                        i += 1;
                    }
                    let word: String = chars[start..i].iter().collect();
                    out.push_str(match word.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        other => other,
                    });
                    continue;
                }
                c => out.push(c),
            },
            State::Double { escaped } => {
                out.push(ch);
                state = match (escaped, ch) {
                    (true, _) => State::Double { escaped: false },
                    (false, '\\') => State::Double { escaped: true },
                    (false, '"') => State::Outside,
                    (false, _) => State::Double { escaped: false },
                };
            }
            State::Single { escaped: true } => {
                // `\'` is not a JSON escape
                if ch != '\'' {
                    out.push('\\');
                }
                out.push(ch);
                state = State::Single { escaped: false };
            }
            State::Single { escaped: false } => match ch {
                '\\' => state = State::Single { escaped: true },
                '\'' => {
                    out.push('"');
                    state = State::Outside;
                }
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\t' => out.push_str("\\t"),
                c => out.push(c),
            },
        }
        i += 1;
    }
    out
}

fn closes_next(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| matches!(c, ']' | '}'))
}
