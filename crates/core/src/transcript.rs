//! Sentence splitting for transcripts.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex should compile"));

const TERMINATORS: &[char] = &['.', '?', '!', '。', '！', '？'];

/// Split transcript text into sentences.
///
/// Whitespace runs are collapsed first; a sentence ends at `.`, `?`, `!` or
/// their full-width forms when followed by whitespace.
#[must_use]
pub fn split_into_sentences(text: &str) -> Vec<String> {
    let collapsed = WHITESPACE.replace_all(text.trim(), " ");
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = collapsed.chars().peekable();

    while let Some(ch) = chars.next() {
        current.push(ch);
        let at_boundary = TERMINATORS.contains(&ch) && chars.peek().is_some_and(|c| *c == ' ');
        if at_boundary {
            push_trimmed(&mut sentences, &current);
            current.clear();
        }
    }
    push_trimmed(&mut sentences, &current);
    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_owned());
    }
}
