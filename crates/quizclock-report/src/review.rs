//! Joins an attempt record back to its bank for post-submission review.

use serde::Serialize;

use quizclock_core::model::{Answer, Question};
use quizclock_core::record::AttemptRecord;
use quizclock_core::scoring::QuestionOutcome;
use quizclock_core::QuestionBank;

/// One question as it is shown after the attempt finished.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewItem<'a> {
    /// Zero-based position in the bank.
    pub index: usize,
    pub question: &'a Question,
    pub given: Option<&'a Answer>,
    /// `None` when the record predates the question.
    pub outcome: Option<&'a QuestionOutcome>,
}

impl ReviewItem<'_> {
    pub fn is_correct(&self) -> bool {
        self.outcome.is_some_and(|o| o.correct)
    }

    /// Short status label: `correct`, `wrong`, `mismatch` or `unanswered`.
    pub fn status_label(&self) -> &'static str {
        match self.outcome {
            Some(o) if o.correct => "correct",
            Some(o) if o.mismatch => "mismatch",
            Some(o) if o.answered => "wrong",
            _ => "unanswered",
        }
    }
}

/// Pair every bank question with the recorded answer and outcome.
pub fn review_items<'a>(record: &'a AttemptRecord, bank: &'a QuestionBank) -> Vec<ReviewItem<'a>> {
    bank.iter()
        .enumerate()
        .map(|(index, question)| ReviewItem {
            index,
            question,
            given: record.answers.get(&question.id),
            outcome: record.result.outcome(&question.id),
        })
        .collect()
}

/// Format seconds as `mm:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, (seconds / 60) % 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}
