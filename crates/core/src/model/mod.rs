mod conversation;
mod document;
mod ids;
mod learner;
mod note;
mod plan;
mod quiz;

pub use conversation::{
    ConversationMode, ConversationState, ConversationTurn, Role, SEED_ASSISTANT_GREETING,
    SEED_USER_GREETING,
};
pub use document::SourceDocument;
pub use ids::{NoteId, ParseIdError, SessionId};
pub use learner::LearnerSession;
pub use note::{Note, NoteBook, NoteError};
pub use plan::{
    Depth, MAX_SESSION_MINUTES, MAX_TASKS_PER_SESSION, MIN_SESSION_MINUTES, PlanError,
    PlanRequest, RecoveredSessions, StudyPlan, StudySession, ViewMode, recover_sessions,
};
pub use quiz::{
    DEFAULT_CHOICE_COUNT, Difficulty, QuestionResult, QuizAttempt, QuizError, QuizItem,
    QuizScore, choice_label, quiz_schema, recover_quiz,
};
