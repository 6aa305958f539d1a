//! Question bank file parser.
//!
//! Loads banks from TOML or JSON files and directories, and reports
//! non-fatal issues with their content. Invariant violations (duplicate ids,
//! malformed correct answers) fail when the bank is constructed.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::{BankInfo, QuestionBank};
use crate::model::{Answer, Question, QuestionKind};
use crate::scoring::Answers;

/// Intermediate structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct RawBankFile {
    bank: RawBankHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
struct RawBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration_secs: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    prompt: String,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: Answer,
    #[serde(default)]
    explanation: String,
    #[serde(default = "default_difficulty")]
    difficulty: String,
    #[serde(default = "default_category")]
    category: String,
    #[serde(default = "default_points")]
    points: u32,
}

fn default_difficulty() -> String {
    "medium".to_string()
}

fn default_category() -> String {
    "general".to_string()
}

fn default_points() -> u32 {
    1
}

/// Parse a single bank file. `.json` files are read as JSON, anything else
/// as TOML.
pub fn parse_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse bank content, picking the format from `source_path`'s extension.
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: RawBankFile = if source_path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(content)
            .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?
    } else {
        toml::from_str(content)
            .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?
    };

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let kind: QuestionKind = q
                .kind
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;
            let difficulty = q
                .difficulty
                .parse()
                .map_err(|e: String| anyhow::anyhow!("question '{}': {}", q.id, e))?;

            Ok(Question {
                id: q.id,
                kind,
                prompt: q.prompt,
                options: q.options,
                correct_answer: q.correct_answer,
                explanation: q.explanation,
                difficulty,
                category: q.category,
                points: q.points,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let info = BankInfo {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        duration_secs: parsed.bank.duration_secs,
    };

    QuestionBank::with_info(info, questions)
        .with_context(|| format!("invalid question bank: {}", source_path.display()))
}

/// Recursively load all `.toml` and `.json` bank files from a directory.
/// Files that fail to parse are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            match parse_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or every bank under a directory.
pub fn load_banks(path: &Path) -> Result<Vec<QuestionBank>> {
    if path.is_dir() {
        load_bank_directory(path)
    } else {
        Ok(vec![parse_bank(path)?])
    }
}

/// Read a JSON object of question id to answer (string or array).
pub fn parse_answers(path: &Path) -> Result<Answers> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse answers JSON: {}", path.display()))
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a bank for content issues that do not break grading.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |question: &Question, message: String| {
        warnings.push(ValidationWarning {
            question_id: Some(question.id.clone()),
            message,
        });
    };

    for question in bank {
        if question.prompt.trim().is_empty() {
            warn(question, "prompt is empty".into());
        }

        if question.explanation.trim().is_empty() {
            warn(question, "no explanation to show after submission".into());
        }

        if question.kind == QuestionKind::FreeForm && !question.options.is_empty() {
            warn(question, "free-form question has options; they will be ignored".into());
        }

        let mut seen = HashSet::new();
        for option in &question.options {
            if !seen.insert(option) {
                warn(question, format!("duplicate option: {option}"));
            }
        }

        if question.kind == QuestionKind::TrueFalse && question.options.len() != 2 {
            warn(
                question,
                format!(
                    "true-false question has {} options",
                    question.options.len()
                ),
            );
        }
    }

    if bank.info().duration_secs == Some(0) {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "duration_secs is 0; the configured default will be used".into(),
        });
    }

    warnings
}
