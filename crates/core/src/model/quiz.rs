use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::recovery::{
    ParseOutcome, Record, RecoveryError, Schema, Validated, integer, recover_batch, scalar_text,
    text_field,
};

/// Number of choices asked for when nothing else is configured.
pub const DEFAULT_CHOICE_COUNT: usize = 4;

const QUIZ_FIELDS: &[&str] = &["question", "choices", "answer", "explanation"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a question needs at least two choices")]
    TooFewChoices,

    #[error("answer index {index} is out of range for {choices} choices")]
    AnswerOutOfRange { index: usize, choices: usize },

    #[error("question {0} does not exist")]
    UnknownQuestion(usize),

    #[error("choice {choice} does not exist for question {question}")]
    UnknownChoice { question: usize, choice: usize },
}

/// Requested difficulty of generated questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizItem {
    question: String,
    choices: Vec<String>,
    answer_index: usize,
    explanation: String,
}

impl QuizItem {
    /// Build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if fewer than two choices are given or
    /// `answer_index` does not point into `choices`.
    pub fn new(
        question: impl Into<String>,
        choices: Vec<String>,
        answer_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuizError> {
        if choices.len() < 2 {
            return Err(QuizError::TooFewChoices);
        }
        if answer_index >= choices.len() {
            return Err(QuizError::AnswerOutOfRange {
                index: answer_index,
                choices: choices.len(),
            });
        }
        Ok(Self {
            question: question.into(),
            choices,
            answer_index,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.choices[self.answer_index]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Coerce a record that already passed the quiz schema.
    fn from_record(index: usize, record: &Record) -> Result<Self, RecoveryError> {
        let question = text_field(index, record, "question")?
            .filter(|q| !q.is_empty())
            .ok_or(RecoveryError::InvalidField {
                index,
                key: "question",
            })?;
        let choices = match record.get("choices") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    scalar_text(item).ok_or(RecoveryError::InvalidField {
                        index,
                        key: "choices",
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            _ => {
                return Err(RecoveryError::InvalidField {
                    index,
                    key: "choices",
                });
            }
        };
        let answer_index = record
            .get("answer")
            .and_then(integer)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n < choices.len())
            .ok_or(RecoveryError::InvalidAnswerIndex { index })?;
        let explanation = text_field(index, record, "explanation")?.unwrap_or_default();
        let found = choices.len();

        Self::new(question, choices, answer_index, explanation).map_err(|err| match err {
            QuizError::TooFewChoices => RecoveryError::WrongArity {
                index,
                key: "choices",
                expected: 2,
                found,
            },
            _ => RecoveryError::InvalidAnswerIndex { index },
        })
    }
}

/// Schema quiz records must satisfy.
#[must_use]
pub fn quiz_schema(choice_count: usize) -> Schema {
    Schema::new(QUIZ_FIELDS).with_list_field("choices", choice_count)
}

/// Recover `requested` questions with `choice_count` choices each.
pub fn recover_quiz(
    completion: &str,
    requested: usize,
    choice_count: usize,
) -> ParseOutcome<Validated<QuizItem>> {
    recover_batch(
        completion,
        requested,
        &quiz_schema(choice_count),
        QuizItem::from_record,
    )
}

/// Label shown next to a choice: `A`, `B`, ...
#[must_use]
pub fn choice_label(choice: usize) -> char {
    u8::try_from(choice)
        .ok()
        .filter(|c| *c < 26)
        .map_or('?', |c| char::from(b'A' + c))
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// A learner's pass through one generated question set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    items: Vec<QuizItem>,
    selections: Vec<Option<usize>>,
}

impl QuizAttempt {
    #[must_use]
    pub fn new(items: Vec<QuizItem>) -> Self {
        let selections = vec![None; items.len()];
        Self { items, selections }
    }

    #[must_use]
    pub fn items(&self) -> &[QuizItem] {
        &self.items
    }

    #[must_use]
    pub fn selection(&self, question: usize) -> Option<usize> {
        self.selections.get(question).copied().flatten()
    }

    /// Record the learner's choice for a question, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the question or choice does not exist.
    pub fn select(&mut self, question: usize, choice: usize) -> Result<(), QuizError> {
        let item = self
            .items
            .get(question)
            .ok_or(QuizError::UnknownQuestion(question))?;
        if choice >= item.choices.len() {
            return Err(QuizError::UnknownChoice { question, choice });
        }
        self.selections[question] = Some(choice);
        Ok(())
    }

    /// Grade every question; unanswered ones count as wrong.
    #[must_use]
    pub fn score(&self) -> QuizScore {
        let results: Vec<QuestionResult> = self
            .items
            .iter()
            .zip(&self.selections)
            .map(|(item, selected)| QuestionResult {
                selected: *selected,
                correct: item.answer_index,
                is_correct: *selected == Some(item.answer_index),
            })
            .collect();
        let correct = results.iter().filter(|r| r.is_correct).count();
        QuizScore {
            correct,
            total: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionResult {
    pub selected: Option<usize>,
    pub correct: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
    pub results: Vec<QuestionResult>,
}
