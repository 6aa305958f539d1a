//! Immutable, validated question banks.
//!
//! A bank is checked once at construction and never changes afterwards;
//! sessions share it through an `Arc`. Editing content means building a new
//! bank.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{Answer, Question, QuestionKind};

/// Descriptive metadata that travels with a bank loaded from a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Suggested session length in seconds.
    #[serde(default)]
    pub duration_secs: Option<u32>,
}

/// An ordered, read-only sequence of questions with O(1) lookup by id.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    info: BankInfo,
    questions: Vec<Question>,
    index: HashMap<String, usize>,
}

impl QuestionBank {
    /// Build a bank from questions, validating every invariant up front.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        Self::with_info(BankInfo::default(), questions)
    }

    /// Build a bank with metadata attached.
    pub fn with_info(info: BankInfo, questions: Vec<Question>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Configuration(
                "question bank must contain at least one question".into(),
            ));
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if index.insert(question.id.clone(), position).is_some() {
                return Err(QuizError::Configuration(format!(
                    "duplicate question id: {}",
                    question.id
                )));
            }
            validate_question(question)?;
        }

        // Every points sum elsewhere is bounded by this one.
        questions
            .iter()
            .try_fold(0u32, |total, q| total.checked_add(q.points))
            .ok_or_else(|| {
                QuizError::Configuration("total points do not fit in a u32".into())
            })?;

        tracing::debug!(
            bank = %info.id,
            questions = questions.len(),
            "question bank constructed"
        );

        Ok(Self {
            info,
            questions,
            index,
        })
    }

    pub fn info(&self) -> &BankInfo {
        &self.info
    }

    /// Number of questions.
    pub fn size(&self) -> usize {
        self.questions.len()
    }

    /// Look a question up by id.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    /// The question at `index`, if in range.
    pub fn at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate questions in bank order. Each call starts from the beginning.
    pub fn iter(&self) -> std::slice::Iter<'_, Question> {
        self.questions.iter()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Sum of `points` across all questions.
    pub fn total_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

impl<'a> IntoIterator for &'a QuestionBank {
    type Item = &'a Question;
    type IntoIter = std::slice::Iter<'a, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_question(question: &Question) -> Result<(), QuizError> {
    let fail = |reason: &str| -> Result<(), QuizError> {
        Err(QuizError::Configuration(format!(
            "question '{}' ({}): {reason}",
            question.id, question.kind
        )))
    };

    if question.points == 0 {
        return fail("points must be positive");
    }

    match (&question.kind, &question.correct_answer) {
        (QuestionKind::MultiSelect, Answer::Multiple(correct)) => {
            if correct.is_empty() {
                return fail("correct answer set is empty");
            }
            let options: HashSet<&str> = question.options.iter().map(String::as_str).collect();
            if let Some(stray) = correct.iter().find(|c| !options.contains(c.as_str())) {
                return fail(&format!("correct answer '{stray}' is not one of the options"));
            }
        }
        (QuestionKind::MultiSelect, Answer::Single(_)) => {
            return fail("correct answer must be a set of options");
        }
        (_, Answer::Multiple(_)) => {
            return fail("correct answer must be a single value");
        }
        (QuestionKind::SingleChoice | QuestionKind::TrueFalse, Answer::Single(correct)) => {
            if question.options.is_empty() {
                return fail("choice question has no options");
            }
            if !question.options.contains(correct) {
                return fail(&format!("correct answer '{correct}' is not one of the options"));
            }
        }
        (QuestionKind::ShortAnswer | QuestionKind::FreeForm, Answer::Single(_)) => {}
    }

    Ok(())
}
