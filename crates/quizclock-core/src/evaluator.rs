//! Type-specific answer correctness.
//!
//! Comparison is exact: case-sensitive, no trimming, no partial credit.
//! Callers normalize input before recording it.

use crate::error::QuizError;
use crate::model::{Answer, Question};

/// Decide whether `submitted` is a correct answer to `question`.
///
/// A missing or empty answer is simply incorrect. An answer whose shape does
/// not fit the question (a single value for a multi-select question, or a set
/// for any other kind) fails with [`QuizError::TypeMismatch`].
pub fn is_correct(question: &Question, submitted: Option<&Answer>) -> Result<bool, QuizError> {
    let Some(submitted) = submitted.filter(|a| !a.is_empty()) else {
        return Ok(false);
    };

    if question.kind.expects_set() != submitted.is_set() {
        return Err(QuizError::TypeMismatch {
            question_id: question.id.clone(),
            expected: if question.kind.expects_set() {
                "a set of options"
            } else {
                "a single value"
            },
        });
    }

    // Shapes agree, so set equality covers multi-select and string equality
    // covers every other kind.
    Ok(submitted == &question.correct_answer)
}
