//! Deterministic scoring and grade banding.
//!
//! `score_percent` counts questions, not points. `points_earned` is reported
//! next to it as a separate figure, so a bank with uneven weights can show
//! 75% alongside a small share of the available points.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::error::QuizError;
use crate::evaluator::is_correct;
use crate::model::{Answer, Grade};

/// Submitted answers keyed by question id.
pub type Answers = HashMap<String, Answer>;

/// One row of the grade table: scores at or above `min_percent` earn `grade`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min_percent: u8,
    pub grade: Grade,
    pub feedback: String,
}

impl GradeBand {
    pub fn new(min_percent: u8, grade: Grade, feedback: impl Into<String>) -> Self {
        Self {
            min_percent,
            grade,
            feedback: feedback.into(),
        }
    }
}

/// The fixed grade table, highest band first.
pub fn default_bands() -> Vec<GradeBand> {
    vec![
        GradeBand::new(
            90,
            Grade::A,
            "Excellent work! You have mastered this material.",
        ),
        GradeBand::new(
            80,
            Grade::B,
            "Great job! You have a solid grasp of the concepts.",
        ),
        GradeBand::new(
            70,
            Grade::C,
            "Good effort. Review the questions you missed to strengthen your understanding.",
        ),
        GradeBand::new(
            60,
            Grade::D,
            "You passed, but you need more practice with this material.",
        ),
        GradeBand::new(
            0,
            Grade::F,
            "Keep studying. Revisit the lessons before retaking this quiz.",
        ),
    ]
}

/// Correctness of a single question within a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub question_id: String,
    pub correct: bool,
    /// Whether a non-empty answer was recorded.
    pub answered: bool,
    /// The question's points if correct, otherwise zero.
    pub points_awarded: u32,
    /// The recorded answer had the wrong shape for the question type.
    #[serde(default)]
    pub mismatch: bool,
}

/// Final outcome of a quiz session. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub total_questions: usize,
    pub correct_answers: usize,
    /// `round(100 * correct_answers / total_questions)`.
    pub score_percent: u8,
    pub points_earned: u32,
    pub total_points: u32,
    pub time_taken_seconds: u32,
    pub grade: Grade,
    pub feedback: String,
    /// Per-question detail in bank order.
    pub outcomes: Vec<QuestionOutcome>,
}

impl QuizResult {
    pub fn outcome(&self, question_id: &str) -> Option<&QuestionOutcome> {
        self.outcomes.iter().find(|o| o.question_id == question_id)
    }

    pub fn answered_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.answered).count()
    }
}

/// Percentage of correct answers, rounded half up.
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    // Integer form of round(100 * c / t) that avoids float drift.
    ((200 * correct + total) / (2 * total)) as u8
}

/// Maps answers to a [`QuizResult`] using a grade table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorer {
    bands: Vec<GradeBand>,
}

impl Default for Scorer {
    fn default() -> Self {
        Self {
            bands: default_bands(),
        }
    }
}

impl Scorer {
    /// Build a scorer with a custom grade table.
    ///
    /// Bands are sorted highest first. The table must have distinct
    /// thresholds, none above 100, and a band starting at 0 so that every
    /// score lands somewhere.
    pub fn with_bands(mut bands: Vec<GradeBand>) -> Result<Self, QuizError> {
        if bands.is_empty() {
            return Err(QuizError::Configuration("grade table is empty".into()));
        }
        bands.sort_by(|a, b| b.min_percent.cmp(&a.min_percent));

        if let Some(band) = bands.iter().find(|b| b.min_percent > 100) {
            return Err(QuizError::Configuration(format!(
                "grade band {} starts above 100%",
                band.grade
            )));
        }
        if bands
            .windows(2)
            .any(|pair| pair[0].min_percent == pair[1].min_percent)
        {
            return Err(QuizError::Configuration(
                "grade bands must have distinct thresholds".into(),
            ));
        }
        if bands.last().map(|b| b.min_percent) != Some(0) {
            return Err(QuizError::Configuration(
                "grade table needs a band starting at 0%".into(),
            ));
        }

        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[GradeBand] {
        &self.bands
    }

    /// The band a percentage falls into. Lower bounds are inclusive.
    pub fn band_for(&self, percent: u8) -> &GradeBand {
        self.bands
            .iter()
            .find(|b| percent >= b.min_percent)
            // The constructor guarantees a 0% band, which matches everything.
            .unwrap_or_else(|| &self.bands[self.bands.len() - 1])
    }

    /// Score a completed set of answers against a bank.
    ///
    /// Pure: identical inputs always produce an identical result.
    pub fn score(
        &self,
        bank: &QuestionBank,
        answers: &Answers,
        time_taken_seconds: u32,
    ) -> QuizResult {
        let mut outcomes = Vec::with_capacity(bank.size());

        for question in bank {
            let submitted = answers.get(&question.id);
            let answered = submitted.is_some_and(|a| !a.is_empty());

            let (correct, mismatch) = match is_correct(question, submitted) {
                Ok(correct) => (correct, false),
                Err(e) => {
                    tracing::warn!("scoring {} as incorrect: {e}", question.id);
                    (false, true)
                }
            };

            outcomes.push(QuestionOutcome {
                question_id: question.id.clone(),
                correct,
                answered,
                points_awarded: if correct { question.points } else { 0 },
                mismatch,
            });
        }

        let total_questions = bank.size();
        let correct_answers = outcomes.iter().filter(|o| o.correct).count();
        let points_earned = outcomes.iter().map(|o| o.points_awarded).sum();
        let percent = score_percent(correct_answers, total_questions);
        let band = self.band_for(percent);

        QuizResult {
            total_questions,
            correct_answers,
            score_percent: percent,
            points_earned,
            total_points: bank.total_points(),
            time_taken_seconds,
            grade: band.grade,
            feedback: band.feedback.clone(),
            outcomes,
        }
    }
}

/// Score with the default grade table.
pub fn score(bank: &QuestionBank, answers: &Answers, time_taken_seconds: u32) -> QuizResult {
    Scorer::default().score(bank, answers, time_taken_seconds)
}
