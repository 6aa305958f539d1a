//! The `quizclock compare` command.

use std::path::PathBuf;

use anyhow::Result;

use quizclock_core::record::AttemptRecord;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = AttemptRecord::load_json(&baseline_path)?;
    let current = AttemptRecord::load_json(&current_path)?;

    let report = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let verdict = if report.is_regression() {
                "regression"
            } else if report.percent_delta > 0 {
                "improvement"
            } else {
                "no change in score"
            };
            println!(
                "Comparison: {}% ({}) -> {}% ({}), {:+}% / {:+} points: {verdict}",
                report.baseline_percent,
                report.baseline_grade,
                report.current_percent,
                report.current_grade,
                report.percent_delta,
                report.points_delta,
            );
            println!(
                "{} newly correct, {} newly incorrect, {} unchanged",
                report.newly_correct.len(),
                report.newly_incorrect.len(),
                report.unchanged
            );

            if !report.newly_incorrect.is_empty() {
                println!("\nNewly incorrect:");
                for id in &report.newly_incorrect {
                    println!("  {id}");
                }
            }

            if !report.newly_correct.is_empty() {
                println!("\nNewly correct:");
                for id in &report.newly_correct {
                    println!("  {id}");
                }
            }

            if report.new_questions > 0 {
                println!("\n{} new question(s)", report.new_questions);
            }
            if report.removed_questions > 0 {
                println!("{} removed question(s)", report.removed_questions);
            }
        }
    }

    if fail_on_regression && report.is_regression() {
        std::process::exit(1);
    }

    Ok(())
}
