use std::sync::Arc;

use chrono::NaiveDate;
use storage::SessionRepository;
use study_core::Clock;
use study_core::model::{Note, NoteId, SessionId};

use crate::error::NotesServiceError;

/// Calendar notes kept per learner session.
#[derive(Clone)]
pub struct NotesService {
    clock: Clock,
    sessions: Arc<dyn SessionRepository>,
}

impl NotesService {
    #[must_use]
    pub fn new(clock: Clock, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { clock, sessions }
    }

    /// Add a note on `date` and return the session's notes.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Note` for blank text and
    /// `NotesServiceError::Storage` if the session cannot be loaded or saved.
    pub async fn add(
        &self,
        session_id: SessionId,
        date: NaiveDate,
        text: &str,
    ) -> Result<Vec<Note>, NotesServiceError> {
        let mut session = self.sessions.get_or_create(session_id).await?;
        let notes = session
            .notes_mut()
            .add(date, text, self.clock.now())?
            .to_vec();
        self.sessions.upsert_session(&session).await?;
        tracing::debug!(%session_id, %date, "note added");
        Ok(notes)
    }

    /// Replace a note's text.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Note` for blank text or an unknown note and
    /// `NotesServiceError::Storage` on backend failures.
    pub async fn update(
        &self,
        session_id: SessionId,
        note_id: NoteId,
        text: &str,
    ) -> Result<Vec<Note>, NotesServiceError> {
        let mut session = self.sessions.get_or_create(session_id).await?;
        let notes = session.notes_mut().update(note_id, text)?.to_vec();
        self.sessions.upsert_session(&session).await?;
        Ok(notes)
    }

    /// Delete a note.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Note` for an unknown note and
    /// `NotesServiceError::Storage` on backend failures.
    pub async fn remove(
        &self,
        session_id: SessionId,
        note_id: NoteId,
    ) -> Result<Vec<Note>, NotesServiceError> {
        let mut session = self.sessions.get_or_create(session_id).await?;
        let notes = session.notes_mut().remove(note_id)?.to_vec();
        self.sessions.upsert_session(&session).await?;
        Ok(notes)
    }

    /// All notes of a session, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` on backend failures.
    pub async fn list(&self, session_id: SessionId) -> Result<Vec<Note>, NotesServiceError> {
        let session = self.sessions.get_or_create(session_id).await?;
        Ok(session.notes().all().to_vec())
    }

    /// Notes of a session on one day.
    ///
    /// # Errors
    ///
    /// Returns `NotesServiceError::Storage` on backend failures.
    pub async fn on(
        &self,
        session_id: SessionId,
        date: NaiveDate,
    ) -> Result<Vec<Note>, NotesServiceError> {
        let session = self.sessions.get_or_create(session_id).await?;
        Ok(session.notes().on(date).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryRepository;
    use study_core::model::NoteError;
    use study_core::time::fixed_clock;

    fn service() -> NotesService {
        NotesService::new(fixed_clock(), Arc::new(InMemoryRepository::new()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn notes_persist_across_calls() {
        let notes = service();
        let id = SessionId::random();

        notes.add(id, day(5), "quiz on ch. 2").await.unwrap();
        let listed = notes.add(id, day(1), "start reading").await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].date(), day(1));
        assert_eq!(notes.list(id).await.unwrap(), listed);
        assert_eq!(notes.on(id, day(5)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_and_remove_round_trip() {
        let notes = service();
        let id = SessionId::random();
        let added = notes.add(id, day(2), "draft").await.unwrap();
        let note_id = added[0].id();

        let updated = notes.update(id, note_id, "final").await.unwrap();
        assert_eq!(updated[0].text(), "final");

        let remaining = notes.remove(id, note_id).await.unwrap();
        assert!(remaining.is_empty());
        assert!(notes.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_text_is_rejected_and_nothing_is_saved() {
        let notes = service();
        let id = SessionId::random();

        let err = notes.add(id, day(2), "   ").await.unwrap_err();
        assert!(matches!(err, NotesServiceError::Note(NoteError::EmptyText)));
        assert!(notes.list(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sessions_do_not_share_notes() {
        let notes = service();
        let a = SessionId::random();
        let b = SessionId::random();
        notes.add(a, day(2), "only a").await.unwrap();

        assert!(notes.list(b).await.unwrap().is_empty());
    }
}
