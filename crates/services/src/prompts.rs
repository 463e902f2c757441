//! Prompt text for every generation flow.
//!
//! Builders are pure so the exact wording can be asserted in tests without a
//! model round-trip.

use std::fmt::Write as _;

use chrono::NaiveDate;
use study_core::model::{Depth, Difficulty, PlanRequest, ViewMode};

/// Knobs for a topic explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplainOptions {
    pub depth: Depth,
    pub outline: bool,
    pub examples: bool,
    pub references: bool,
    pub next_steps: bool,
}

impl Default for ExplainOptions {
    fn default() -> Self {
        Self {
            depth: Depth::Standard,
            outline: true,
            examples: true,
            references: false,
            next_steps: true,
        }
    }
}

pub const QUIZ_SYSTEM: &str = "You write multiple-choice questions for students. \
Answer with valid JSON only.";

#[must_use]
pub fn quiz(context: &str, count: usize, choices: usize, difficulty: Difficulty) -> String {
    format!(
        "Using the material below, write {count} multiple-choice questions of {difficulty} difficulty.\n\n\
Respond with a JSON array only. Every element must have these fields:\n\
- \"question\": the question text\n\
- \"choices\": an array of exactly {choices} answer options\n\
- \"answer\": the 0-based index of the correct option\n\
- \"explanation\": one or two sentences on why the answer is correct\n\n\
Material:\n{context}",
        difficulty = difficulty.as_str(),
    )
}

pub const PLAN_SYSTEM: &str = "You are an instructional designer who turns course material \
into realistic study schedules. Answer with a JSON object only.";

#[must_use]
pub fn plan(request: &PlanRequest, dates: &[NaiveDate], material: &str) -> String {
    let view = match request.view() {
        ViewMode::Daily => "daily: one session per day".to_string(),
        ViewMode::Weekly { sessions_per_week } => {
            format!("weekly: {sessions_per_week} sessions per week")
        }
    };
    let mut prompt = format!(
        "Build a study plan from {start} to {end} with exactly {total} sessions.\n\n\
Constraints:\n\
- Schedule: {view}.\n\
- Each session should take about {minutes} minutes.\n\
- Level of detail: {depth}.\n\
- Every session has \"session_no\", \"title\", \"objective\", \"tasks\" (at most 5 concrete steps) and \"estimated_minutes\".\n\
- Output format: {{\"sessions\": [...], \"notes\": \"optional remarks\"}}\n\n",
        start = request.start(),
        end = request.end(),
        total = dates.len(),
        minutes = request.minutes_per_session(),
        depth = request.depth().as_str(),
    );
    if let Some(first) = dates.first() {
        let _ = writeln!(
            prompt,
            "Session 1 falls on {first}; dates are assigned afterwards, so do not add them."
        );
        prompt.push('\n');
    }
    prompt.push_str(
        "Example:\n{\"sessions\": [{\"session_no\": 1, \"title\": \"...\", \"objective\": \"...\", \
\"tasks\": [\"...\"], \"estimated_minutes\": 60}], \"notes\": \"...\"}\n\n",
    );
    let _ = write!(prompt, "Material:\n{material}");
    prompt
}

#[must_use]
pub fn condense(text: &str) -> String {
    format!(
        "Condense the long document below into a one-paragraph summary followed by a list \
of its main section titles, each starting with '-'.\n\nDocument:\n{text}"
    )
}

#[must_use]
pub fn summarize(text: &str, sentences: usize) -> String {
    format!(
        "The text below is a transcript or document. Pick out the key points and summarize \
them concisely in {sentences} sentences.\n\n{text}"
    )
}

pub const EXPLAIN_SYSTEM: &str = "You are a friendly expert in the subject the learner asks about.";

#[must_use]
pub fn explain(topic: &str, options: ExplainOptions) -> String {
    let depth = match options.depth {
        Depth::Brief => "brief (a summary that can be understood at a glance)",
        Depth::Standard => "standard (core principles with examples)",
        Depth::Detailed => "detailed (in-depth technical explanation and applications)",
    };
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    format!(
        "Write an explanation of the topic below.\n\n\
Requirements:\n\
- Topic: {topic}\n\
- Level: {depth}\n\
- Include an outline: {outline}\n\
- Include practical examples: {examples}\n\
- Suggest references or search queries: {references}\n\
- Suggest next learning steps: {next_steps}\n\n\
Format:\n\
- Markdown, with each section under a `##` header.\n\
- Where possible include a short definition, key terms, practical examples and a closing summary.\n\
- Give requested outlines, references and next steps as numbered or checklist items.",
        outline = yes_no(options.outline),
        examples = yes_no(options.examples),
        references = yes_no(options.references),
        next_steps = yes_no(options.next_steps),
    )
}

#[must_use]
pub fn quick_summary(text: &str, max_chars: usize) -> String {
    format!("Summarize the following in at most {max_chars} characters:\n\n{text}")
}

#[must_use]
pub fn checklist(text: &str, max_steps: usize) -> String {
    format!(
        "Based on the explanation below, write a study checklist of at most {max_steps} steps \
the learner can actually follow. Put one step per line.\n\n{text}"
    )
}

pub const CHAT_SYSTEM: &str = "You are a patient study companion. Keep answers focused on \
the learner's question and the shared material.";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn quiz_prompt_names_count_arity_and_difficulty() {
        let prompt = quiz("Photosynthesis", 3, 4, Difficulty::Hard);
        assert!(prompt.contains("3 multiple-choice questions of hard difficulty"));
        assert!(prompt.contains("exactly 4 answer options"));
        assert!(prompt.ends_with("Photosynthesis"));
    }

    #[test]
    fn plan_prompt_carries_request_constraints() {
        let request = PlanRequest::new(
            date(2025, 1, 1),
            date(2025, 1, 14),
            ViewMode::Weekly {
                sessions_per_week: 2,
            },
            45,
        )
        .unwrap();
        let dates = request.dates();
        let prompt = plan(&request, &dates, "Chapter 1");

        assert!(prompt.contains("from 2025-01-01 to 2025-01-14 with exactly 4 sessions"));
        assert!(prompt.contains("weekly: 2 sessions per week"));
        assert!(prompt.contains("about 45 minutes"));
        assert!(prompt.ends_with("Chapter 1"));
    }

    #[test]
    fn explain_prompt_reflects_toggles() {
        let options = ExplainOptions {
            depth: Depth::Brief,
            references: true,
            examples: false,
            ..ExplainOptions::default()
        };
        let prompt = explain("Ownership", options);
        assert!(prompt.contains("Topic: Ownership"));
        assert!(prompt.contains("Level: brief"));
        assert!(prompt.contains("practical examples: no"));
        assert!(prompt.contains("search queries: yes"));
    }
}
