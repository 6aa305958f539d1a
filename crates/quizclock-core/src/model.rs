//! Core data model types for quizclock.
//!
//! Questions, answers, and the small enums that the bank, evaluator, scorer,
//! and session all share.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single question in a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within its bank.
    pub id: String,
    /// How the question is answered and graded.
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// The text shown to the user.
    pub prompt: String,
    /// Choices for choice-like questions. Empty for free-form.
    #[serde(default)]
    pub options: Vec<String>,
    /// The expected answer. A set exactly when `kind` is multi-select.
    pub correct_answer: Answer,
    /// Shown after the session finishes.
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Free-text tag used for grouping in statistics.
    #[serde(default = "default_category")]
    pub category: String,
    /// Weight added to `points_earned` when answered correctly.
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_category() -> String {
    "general".to_string()
}

fn default_points() -> u32 {
    1
}

/// Supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    SingleChoice,
    MultiSelect,
    TrueFalse,
    ShortAnswer,
    FreeForm,
}

impl QuestionKind {
    /// Whether the answer must be picked from `options`.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            QuestionKind::SingleChoice | QuestionKind::MultiSelect | QuestionKind::TrueFalse
        )
    }

    /// Whether answers to this kind are sets rather than single strings.
    pub fn expects_set(&self) -> bool {
        matches!(self, QuestionKind::MultiSelect)
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::SingleChoice => write!(f, "single-choice"),
            QuestionKind::MultiSelect => write!(f, "multi-select"),
            QuestionKind::TrueFalse => write!(f, "true-false"),
            QuestionKind::ShortAnswer => write!(f, "short-answer"),
            QuestionKind::FreeForm => write!(f, "free-form"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "single-choice" | "single" => Ok(QuestionKind::SingleChoice),
            "multi-select" | "multiple" => Ok(QuestionKind::MultiSelect),
            "true-false" => Ok(QuestionKind::TrueFalse),
            "short-answer" => Ok(QuestionKind::ShortAnswer),
            "free-form" => Ok(QuestionKind::FreeForm),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Question difficulty.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A submitted or expected answer: one string, or a set of strings.
///
/// Serialized untagged, so a JSON/TOML string is `Single` and an array is
/// `Multiple`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(BTreeSet<String>),
}

impl Answer {
    pub fn single(value: impl Into<String>) -> Self {
        Answer::Single(value.into())
    }

    /// Build a set answer. Duplicates collapse.
    pub fn multiple<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multiple(values.into_iter().map(Into::into).collect())
    }

    /// An empty string or empty set counts as unanswered.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Single(s) => s.is_empty(),
            Answer::Multiple(set) => set.is_empty(),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Answer::Multiple(_))
    }

    /// Read typed input for a question of `kind`.
    ///
    /// Multi-select input is split on commas into a set; everything else is
    /// taken as one trimmed string.
    pub fn from_input(kind: QuestionKind, input: &str) -> Self {
        if kind.expects_set() {
            Answer::multiple(
                input
                    .split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty()),
            )
        } else {
            Answer::single(input.trim())
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Single(s) => write!(f, "{s}"),
            Answer::Multiple(set) => {
                let joined: Vec<&str> = set.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
        }
    }
}

/// Lifecycle status of a quiz session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Submitted,
    TimedOut,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Submitted | SessionStatus::TimedOut)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not started"),
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Submitted => write!(f, "submitted"),
            SessionStatus::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}
