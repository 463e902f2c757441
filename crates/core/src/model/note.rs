use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::ids::NoteId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("note text cannot be empty")]
    EmptyText,

    #[error("note {0} not found")]
    NotFound(NoteId),
}

/// A note pinned to a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    id: NoteId,
    date: NaiveDate,
    text: String,
    created_at: DateTime<Utc>,
}

impl Note {
    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Calendar notes owned by one learner session.
///
/// Notes stay ordered by date, then by id. Every mutation returns the
/// resulting collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteBook {
    notes: Vec<Note>,
    next_id: u64,
}

impl NoteBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a note for `date`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyText` if `text` is blank.
    pub fn add(
        &mut self,
        date: NaiveDate,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&[Note], NoteError> {
        let text = normalize(text.into())?;
        self.next_id += 1;
        let note = Note {
            id: NoteId::new(self.next_id),
            date,
            text,
            created_at: now,
        };
        let at = self
            .notes
            .partition_point(|n| (n.date, n.id) < (note.date, note.id));
        self.notes.insert(at, note);
        Ok(&self.notes)
    }

    /// Replace the text of an existing note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyText` for blank text or `NoteError::NotFound`.
    pub fn update(&mut self, id: NoteId, text: impl Into<String>) -> Result<&[Note], NoteError> {
        let text = normalize(text.into())?;
        let note = self
            .notes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(NoteError::NotFound(id))?;
        note.text = text;
        Ok(&self.notes)
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::NotFound` if no note has `id`.
    pub fn remove(&mut self, id: NoteId) -> Result<&[Note], NoteError> {
        let at = self
            .notes
            .iter()
            .position(|n| n.id == id)
            .ok_or(NoteError::NotFound(id))?;
        self.notes.remove(at);
        Ok(&self.notes)
    }

    #[must_use]
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn on(&self, date: NaiveDate) -> impl Iterator<Item = &Note> + '_ {
        self.notes.iter().filter(move |n| n.date == date)
    }

    #[must_use]
    pub fn all(&self) -> &[Note] {
        &self.notes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

fn normalize(text: String) -> Result<String, NoteError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(NoteError::EmptyText);
    }
    Ok(trimmed.to_owned())
}
