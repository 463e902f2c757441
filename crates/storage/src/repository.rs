use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use study_core::model::{LearnerSession, SessionId};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),
}

/// Repository contract for learner sessions, addressed by session id.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist or replace a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn upsert_session(&self, session: &LearnerSession) -> Result<(), StorageError>;

    /// Fetch a session by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_session(&self, id: SessionId) -> Result<LearnerSession, StorageError>;

    /// Remove a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError>;

    /// Fetch a session, creating an empty one on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_or_create(&self, id: SessionId) -> Result<LearnerSession, StorageError> {
        match self.get_session(id).await {
            Ok(session) => Ok(session),
            Err(StorageError::NotFound) => {
                let session = LearnerSession::new(id);
                self.upsert_session(&session).await?;
                Ok(session)
            }
            Err(other) => Err(other),
        }
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sessions: Arc<Mutex<HashMap<SessionId, LearnerSession>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn upsert_session(&self, session: &LearnerSession) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(session.id(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<LearnerSession, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionRepository> = Arc::new(InMemoryRepository::new());
        Self { sessions }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::model::Role;
    use study_core::time::fixed_now;

    #[tokio::test]
    async fn round_trips_session_state() {
        let repo = InMemoryRepository::new();
        let mut session = LearnerSession::new(SessionId::random());
        session.attach_document("lecture.txt");
        session
            .conversation_mut()
            .append_turn(Role::User, "What is a monad?");
        session
            .notes_mut()
            .add(fixed_now().date_naive(), "review chapter 3", fixed_now())
            .unwrap();

        repo.upsert_session(&session).await.unwrap();
        let fetched = repo.get_session(session.id()).await.unwrap();

        assert_eq!(fetched, session);
    }

    #[tokio::test]
    async fn get_or_create_seeds_new_sessions() {
        let repo = InMemoryRepository::new();
        let id = SessionId::random();

        let created = repo.get_or_create(id).await.unwrap();
        assert_eq!(created.conversation().history().len(), 2);
        assert!(repo.get_session(id).await.is_ok());
    }

    #[tokio::test]
    async fn delete_missing_session_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo.delete_session(SessionId::random()).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn sessions_are_isolated_by_id() {
        let storage = Storage::in_memory();
        let mut a = LearnerSession::new(SessionId::random());
        let b = LearnerSession::new(SessionId::random());
        a.set_summary("only a");
        storage.sessions.upsert_session(&a).await.unwrap();
        storage.sessions.upsert_session(&b).await.unwrap();

        let fetched_b = storage.sessions.get_session(b.id()).await.unwrap();
        assert!(fetched_b.summary().is_none());
    }
}
