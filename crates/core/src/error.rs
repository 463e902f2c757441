use thiserror::Error;

use crate::model::{NoteError, PlanError, QuizError};
use crate::recovery::RecoveryFailure;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Recovery(#[from] RecoveryFailure),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Note(#[from] NoteError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteBook, QuizAttempt};
    use crate::time::fixed_now;

    fn note_then_answer(book: &mut NoteBook, attempt: &mut QuizAttempt) -> Result<(), Error> {
        book.add(fixed_now().date_naive(), "revise", fixed_now())?;
        attempt.select(0, 0)?;
        Ok(())
    }

    #[test]
    fn domain_errors_convert_into_the_crate_error() {
        let mut book = NoteBook::new();
        let mut attempt = QuizAttempt::new(Vec::new());

        let err = note_then_answer(&mut book, &mut attempt).unwrap_err();

        assert!(matches!(err, Error::Quiz(QuizError::UnknownQuestion(0))));
        assert_eq!(book.len(), 1);
    }
}
