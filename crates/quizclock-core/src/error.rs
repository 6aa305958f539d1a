//! Engine error types.
//!
//! Construction errors (`Configuration`) are fatal and bubble to the caller.
//! Lifecycle and navigation errors reject a single call and leave the session
//! exactly as it was. `TypeMismatch` is raised by the evaluator and absorbed
//! per question by the scorer.

use thiserror::Error;

use crate::model::SessionStatus;

/// Errors produced by the assessment engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// A question bank or grading table violates its invariants.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The submitted answer's shape does not fit the question type.
    #[error("answer for question '{question_id}' has the wrong shape: expected {expected}")]
    TypeMismatch {
        question_id: String,
        expected: &'static str,
    },

    /// `jump_to` was given an index outside the bank.
    #[error("question index {index} out of range (bank has {len} questions)")]
    IndexOutOfRange { index: usize, len: usize },

    /// The countdown or session is already running.
    #[error("already running")]
    AlreadyRunning,

    /// The session already reached a terminal state.
    #[error("session already finished ({0})")]
    AlreadyTerminal(SessionStatus),

    /// The call requires a session in progress.
    #[error("session is not in progress (status: {0})")]
    NotInProgress(SessionStatus),

    /// No question with this id exists in the bank.
    #[error("unknown question id: {0}")]
    UnknownQuestion(String),
}

impl QuizError {
    /// Returns `true` if this error came from misusing a session rather than
    /// from malformed input data.
    pub fn is_misuse(&self) -> bool {
        matches!(
            self,
            QuizError::IndexOutOfRange { .. }
                | QuizError::AlreadyRunning
                | QuizError::AlreadyTerminal(_)
                | QuizError::NotInProgress(_)
                | QuizError::UnknownQuestion(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = QuizError::IndexOutOfRange { index: 9, len: 8 };
        assert_eq!(
            err.to_string(),
            "question index 9 out of range (bank has 8 questions)"
        );
        let err = QuizError::AlreadyTerminal(SessionStatus::TimedOut);
        assert_eq!(err.to_string(), "session already finished (timed out)");
    }

    #[test]
    fn misuse_classification() {
        assert!(QuizError::AlreadyRunning.is_misuse());
        assert!(!QuizError::Configuration("x".into()).is_misuse());
        assert!(!QuizError::TypeMismatch {
            question_id: "q".into(),
            expected: "a set of options",
        }
        .is_misuse());
    }
}
