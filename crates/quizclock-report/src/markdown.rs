//! Markdown attempt summary, suitable for pasting into a PR or notes file.

use anyhow::{Context, Result};
use std::path::Path;

use quizclock_core::record::AttemptRecord;
use quizclock_core::statistics::compute_breakdown;
use quizclock_core::QuestionBank;

use crate::review::{format_duration, review_items};

/// Escape pipes so cell text cannot break a table row.
fn cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

pub fn generate_markdown(record: &AttemptRecord, bank: &QuestionBank) -> String {
    let result = &record.result;
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", record.bank.name));
    md.push_str(&format!(
        "**Grade {}**: {}/{} correct ({}%), {}/{} points, {} ({})\n\n",
        result.grade,
        result.correct_answers,
        result.total_questions,
        result.score_percent,
        result.points_earned,
        result.total_points,
        format_duration(result.time_taken_seconds),
        record.status
    ));
    md.push_str(&format!("> {}\n\n", result.feedback));

    md.push_str("| # | Question | Result | Your answer | Correct answer | Points |\n");
    md.push_str("|---|----------|--------|-------------|----------------|--------|\n");
    for item in review_items(record, bank) {
        let given = item
            .given
            .filter(|a| !a.is_empty())
            .map_or_else(|| "-".to_string(), |a| a.to_string());
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {}/{} |\n",
            item.index + 1,
            cell(&item.question.id),
            item.status_label(),
            cell(&given),
            cell(&item.question.correct_answer.to_string()),
            item.outcome.map_or(0, |o| o.points_awarded),
            item.question.points
        ));
    }

    let breakdown = compute_breakdown(bank, result);
    if breakdown.per_category.len() > 1 {
        md.push_str("\n## By category\n\n");
        md.push_str("| Category | Correct | Percent |\n");
        md.push_str("|----------|---------|---------|\n");
        for (category, stats) in &breakdown.per_category {
            md.push_str(&format!(
                "| {} | {}/{} | {}% |\n",
                cell(category),
                stats.correct,
                stats.total,
                stats.percent()
            ));
        }
        if let Some((weakest, _)) = breakdown.weakest_category() {
            md.push_str(&format!("\nWeakest category: **{weakest}**\n"));
        }
    }

    md
}

/// Write the Markdown summary to a file.
pub fn write_markdown_report(
    record: &AttemptRecord,
    bank: &QuestionBank,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_markdown(record, bank))
        .with_context(|| format!("failed to write Markdown report to {}", path.display()))?;
    Ok(())
}
