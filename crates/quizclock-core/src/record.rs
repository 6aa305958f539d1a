//! Attempt records with JSON persistence and attempt-to-attempt comparison.
//!
//! The engine keeps nothing once a session is dropped; a caller that wants
//! to keep an attempt wraps the result in an [`AttemptRecord`] and saves it.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bank::QuestionBank;
use crate::model::{Answer, Grade, SessionStatus};
use crate::scoring::{Answers, QuizResult};
use crate::session::SessionController;

/// A finished attempt, ready to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    /// Unique attempt identifier.
    pub id: Uuid,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the bank the attempt was taken against.
    pub bank: BankSummary,
    /// `submitted` or `timed_out`.
    pub status: SessionStatus,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// Answers as they stood when the attempt finished.
    pub answers: BTreeMap<String, Answer>,
    pub result: QuizResult,
}

/// Summary of a bank (without the questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankSummary {
    pub id: String,
    pub name: String,
    pub question_count: usize,
}

impl BankSummary {
    pub fn of(bank: &QuestionBank) -> Self {
        Self {
            id: bank.info().id.clone(),
            name: bank.info().name.clone(),
            question_count: bank.size(),
        }
    }
}

impl AttemptRecord {
    /// Build a record from a result computed outside a session.
    pub fn new(
        bank: &QuestionBank,
        status: SessionStatus,
        started_at: Option<DateTime<Utc>>,
        answers: &Answers,
        result: QuizResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            bank: BankSummary::of(bank),
            status,
            started_at,
            answers: answers
                .iter()
                .map(|(id, answer)| (id.clone(), answer.clone()))
                .collect(),
            result,
        }
    }

    /// Capture a finished session. `None` while the session is not terminal.
    pub fn from_session(session: &SessionController) -> Option<Self> {
        let result = session.result()?;
        Some(Self::new(
            session.bank(),
            session.status(),
            session.started_at(),
            session.answers(),
            QuizResult::clone(result),
        ))
    }

    /// Save the record as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize attempt")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write attempt to {}", path.display()))?;
        Ok(())
    }

    /// Load a record from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read attempt from {}", path.display()))?;
        let record: AttemptRecord =
            serde_json::from_str(&content).context("failed to parse attempt JSON")?;
        Ok(record)
    }

    /// Compare this attempt against an earlier one on the same bank.
    pub fn compare(&self, baseline: &AttemptRecord) -> AttemptComparison {
        if self.bank.id != baseline.bank.id {
            tracing::warn!(
                "comparing attempts from different banks: {} vs {}",
                baseline.bank.id,
                self.bank.id
            );
        }

        let baseline_correct: BTreeMap<&str, bool> = baseline
            .result
            .outcomes
            .iter()
            .map(|o| (o.question_id.as_str(), o.correct))
            .collect();

        let mut newly_correct = Vec::new();
        let mut newly_incorrect = Vec::new();
        let mut unchanged = 0usize;
        let mut new_questions = 0usize;

        for outcome in &self.result.outcomes {
            match baseline_correct.get(outcome.question_id.as_str()) {
                Some(&before) if before == outcome.correct => unchanged += 1,
                Some(_) if outcome.correct => newly_correct.push(outcome.question_id.clone()),
                Some(_) => newly_incorrect.push(outcome.question_id.clone()),
                None => new_questions += 1,
            }
        }

        let removed_questions = baseline
            .result
            .outcomes
            .iter()
            .filter(|o| self.result.outcome(&o.question_id).is_none())
            .count();

        AttemptComparison {
            baseline_percent: baseline.result.score_percent,
            current_percent: self.result.score_percent,
            percent_delta: i16::from(self.result.score_percent)
                - i16::from(baseline.result.score_percent),
            points_delta: i64::from(self.result.points_earned)
                - i64::from(baseline.result.points_earned),
            baseline_grade: baseline.result.grade,
            current_grade: self.result.grade,
            newly_correct,
            newly_incorrect,
            unchanged,
            new_questions,
            removed_questions,
        }
    }
}

/// Result of comparing two attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptComparison {
    pub baseline_percent: u8,
    pub current_percent: u8,
    pub percent_delta: i16,
    pub points_delta: i64,
    pub baseline_grade: Grade,
    pub current_grade: Grade,
    /// Questions wrong before and right now.
    pub newly_correct: Vec<String>,
    /// Questions right before and wrong now.
    pub newly_incorrect: Vec<String>,
    pub unchanged: usize,
    /// Questions in current but not baseline.
    pub new_questions: usize,
    /// Questions in baseline but not current.
    pub removed_questions: usize,
}

impl AttemptComparison {
    /// Returns true if the score went down.
    pub fn is_regression(&self) -> bool {
        self.percent_delta < 0
    }

    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Score:** {}% ({}) -> {}% ({}), {:+} points\n\n",
            self.baseline_percent,
            self.baseline_grade,
            self.current_percent,
            self.current_grade,
            self.points_delta
        ));

        if !self.newly_incorrect.is_empty() {
            md.push_str("### Newly incorrect\n\n");
            for id in &self.newly_incorrect {
                md.push_str(&format!("- {id}\n"));
            }
            md.push('\n');
        }

        if !self.newly_correct.is_empty() {
            md.push_str("### Newly correct\n\n");
            for id in &self.newly_correct {
                md.push_str(&format!("- {id}\n"));
            }
        }

        md
    }
}
