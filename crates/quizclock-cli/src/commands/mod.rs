pub mod compare;
pub mod init;
pub mod score;
pub mod take;
pub mod validate;

use comfy_table::{Cell, Table};

use quizclock_core::record::AttemptRecord;
use quizclock_core::QuestionBank;
use quizclock_report::review::{format_duration, review_items};

/// Overall result as a one-row table.
pub(crate) fn summary_table(record: &AttemptRecord) -> Table {
    let result = &record.result;
    let mut table = Table::new();
    table.set_header(vec!["Bank", "Status", "Correct", "Score", "Points", "Grade", "Time"]);
    table.add_row(vec![
        Cell::new(&record.bank.name),
        Cell::new(record.status),
        Cell::new(format!("{}/{}", result.correct_answers, result.total_questions)),
        Cell::new(format!("{}%", result.score_percent)),
        Cell::new(format!("{}/{}", result.points_earned, result.total_points)),
        Cell::new(result.grade),
        Cell::new(format_duration(result.time_taken_seconds)),
    ]);
    table
}

/// Per-question review with correct answers and explanations.
pub(crate) fn review_table(record: &AttemptRecord, bank: &QuestionBank) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Result", "Your answer", "Correct", "Explanation"]);
    for item in review_items(record, bank) {
        table.add_row(vec![
            Cell::new(item.index + 1),
            Cell::new(&item.question.id),
            Cell::new(item.status_label()),
            Cell::new(
                item.given
                    .filter(|a| !a.is_empty())
                    .map_or_else(|| "-".to_string(), |a| a.to_string()),
            ),
            Cell::new(&item.question.correct_answer),
            Cell::new(&item.question.explanation),
        ]);
    }
    table
}

/// Print the summary, review and feedback for a finished attempt.
pub(crate) fn print_text_report(record: &AttemptRecord, bank: &QuestionBank) {
    println!("{}", summary_table(record));
    println!("{}", record.result.feedback);
    println!();
    println!("{}", review_table(record, bank));
}
