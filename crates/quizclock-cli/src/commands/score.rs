//! The `quizclock score` command: grade an answers file without a clock.

use std::path::{Path, PathBuf};

use anyhow::Result;

use quizclock_core::model::SessionStatus;
use quizclock_core::parser::{parse_answers, parse_bank};
use quizclock_core::record::AttemptRecord;
use quizclock_report::html::{generate_html, write_html_report};
use quizclock_report::markdown::{generate_markdown, write_markdown_report};

use crate::config::load_config_from;

pub fn execute(
    bank_path: PathBuf,
    answers_path: PathBuf,
    time_taken: u32,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let scorer = config.scorer()?;

    let bank = parse_bank(&bank_path)?;
    let answers = parse_answers(&answers_path)?;

    for id in answers.keys().filter(|id| !bank.contains(id)) {
        tracing::warn!("answer for unknown question '{id}' ignored");
    }

    let result = scorer.score(&bank, &answers, time_taken);
    let record = AttemptRecord::new(&bank, SessionStatus::Submitted, None, &answers, result);

    match (format.as_str(), output) {
        ("text", Some(_)) => anyhow::bail!("--output needs --format json, markdown or html"),
        ("text", None) => super::print_text_report(&record, &bank),
        ("json", None) => println!("{}", serde_json::to_string_pretty(&record)?),
        ("markdown" | "md", None) => println!("{}", generate_markdown(&record, &bank)),
        ("html", None) => println!("{}", generate_html(&record, &bank)),
        ("json", Some(path)) => written(record.save_json(&path), &path)?,
        ("markdown" | "md", Some(path)) => {
            written(write_markdown_report(&record, &bank, &path), &path)?
        }
        ("html", Some(path)) => written(write_html_report(&record, &bank, &path), &path)?,
        (other, _) => {
            anyhow::bail!("unknown format: {other} (expected text, json, markdown or html)")
        }
    }

    Ok(())
}

fn written(outcome: Result<()>, path: &Path) -> Result<()> {
    outcome?;
    eprintln!("Report written to: {}", path.display());
    Ok(())
}
