use crate::model::conversation::ConversationState;
use crate::model::ids::SessionId;
use crate::model::note::NoteBook;
use crate::model::plan::StudyPlan;
use crate::model::quiz::{QuizAttempt, QuizItem};

/// Everything one learner has built up during an interactive session.
///
/// Generated artifacts belong to the attached document: attaching a
/// different document discards them. Conversation and notes survive.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnerSession {
    id: SessionId,
    conversation: ConversationState,
    document: Option<String>,
    quiz: Option<QuizAttempt>,
    summary: Option<String>,
    plan: Option<StudyPlan>,
    notes: NoteBook,
}

impl LearnerSession {
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            conversation: ConversationState::new(),
            document: None,
            quiz: None,
            summary: None,
            plan: None,
            notes: NoteBook::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Attach the document the learner is working from.
    ///
    /// Returns `true` when the name differs from the attached one, in which
    /// case quiz, summary and plan are cleared.
    pub fn attach_document(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.document.as_deref() == Some(name.as_str()) {
            return false;
        }
        self.document = Some(name);
        self.reset_artifacts();
        true
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizAttempt> {
        self.quiz.as_ref()
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizAttempt> {
        self.quiz.as_mut()
    }

    /// Replace the current question set with a fresh attempt.
    pub fn replace_quiz(&mut self, items: Vec<QuizItem>) -> &mut QuizAttempt {
        self.quiz.insert(QuizAttempt::new(items))
    }

    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    #[must_use]
    pub fn plan(&self) -> Option<&StudyPlan> {
        self.plan.as_ref()
    }

    pub fn set_plan(&mut self, plan: StudyPlan) {
        self.plan = Some(plan);
    }

    /// Clear quiz, summary and plan.
    pub fn reset_artifacts(&mut self) {
        self.quiz = None;
        self.summary = None;
        self.plan = None;
    }

    #[must_use]
    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut ConversationState {
        &mut self.conversation
    }

    #[must_use]
    pub fn notes(&self) -> &NoteBook {
        &self.notes
    }

    pub fn notes_mut(&mut self) -> &mut NoteBook {
        &mut self.notes
    }
}
