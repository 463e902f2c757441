use std::sync::Arc;

use chrono::NaiveDate;
use storage::{InMemoryRepository, SessionRepository, Storage, StorageError};
use study_core::model::{LearnerSession, QuizItem, Role, SessionId};
use study_core::time::fixed_now;

fn quiz_item() -> QuizItem {
    let choices = ["a", "b", "c", "d"].map(String::from).to_vec();
    QuizItem::new("Which letter comes second?", choices, 1, "Alphabet order.").unwrap()
}

#[tokio::test]
async fn learner_session_lifecycle() {
    let storage = Storage::in_memory();
    let id = SessionId::random();

    let mut session = storage.sessions.get_or_create(id).await.unwrap();
    session.attach_document("chapter1.txt");
    session.replace_quiz(vec![quiz_item()]).select(0, 1).unwrap();
    session.set_summary("Letters have an order.");
    session
        .conversation_mut()
        .append_turn(Role::User, "Why does order matter?");
    storage.sessions.upsert_session(&session).await.unwrap();

    let mut reloaded = storage.sessions.get_session(id).await.unwrap();
    assert_eq!(reloaded.quiz().unwrap().score().correct, 1);
    assert_eq!(reloaded.conversation().history().len(), 3);

    assert!(reloaded.attach_document("chapter2.txt"));
    assert!(reloaded.quiz().is_none());
    assert!(reloaded.summary().is_none());
    assert_eq!(reloaded.conversation().history().len(), 3);
    storage.sessions.upsert_session(&reloaded).await.unwrap();

    storage.sessions.delete_session(id).await.unwrap();
    let err = storage.sessions.get_session(id).await.unwrap_err();
    assert!(matches!(err, StorageError::NotFound));
}

#[tokio::test]
async fn clones_share_the_same_backing_map() {
    let repo = InMemoryRepository::new();
    let shared: Arc<dyn SessionRepository> = Arc::new(repo.clone());
    let id = SessionId::random();

    let mut session = LearnerSession::new(id);
    session
        .notes_mut()
        .add(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(), "exam", fixed_now())
        .unwrap();
    shared.upsert_session(&session).await.unwrap();

    let fetched = repo.get_session(id).await.unwrap();
    assert_eq!(fetched.notes().len(), 1);
}
