//! The `quizclock take` command: an interactive timed session on the terminal.
//!
//! Stdin is read line by line on a plain thread and forwarded to the async
//! clock driver as [`SessionCommand`]s. The observer prints every change.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;

use quizclock_core::driver::{run_session, SessionCommand};
use quizclock_core::parser::{parse_bank, validate_bank};
use quizclock_core::record::AttemptRecord;
use quizclock_core::session::{SessionObserver, SessionSnapshot};
use quizclock_core::{Question, QuizError, QuizResult, SessionController, SessionStatus};
use quizclock_report::review::format_duration;

use crate::config::load_config_from;

const HELP: &str = "Commands: a <answer> (a x, y for multi-select) | n next | p previous | \
j <number> jump | ? status | s submit | h help";

pub async fn execute(
    bank_path: PathBuf,
    duration: Option<u32>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let scorer = config.scorer()?;

    let bank = Arc::new(parse_bank(&bank_path)?);
    for w in validate_bank(&bank) {
        tracing::warn!(
            "{}: {}",
            w.question_id.as_deref().unwrap_or("bank"),
            w.message
        );
    }

    let duration = config.resolve_duration(duration, bank.info().duration_secs);
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let mut session = SessionController::new(Arc::clone(&bank), duration)?
        .with_scorer(scorer)
        .with_observer(Arc::new(ConsoleObserver));

    println!("{}", bank.info().name);
    if !bank.info().description.is_empty() {
        println!("{}", bank.info().description);
    }
    session.start()?;
    print_question(&session.snapshot(), session.current_question());

    let (tx, rx) = mpsc::channel(32);
    spawn_input_reader(tx);
    run_session(&mut session, rx).await?;

    let record =
        AttemptRecord::from_session(&session).context("session finished without a result")?;
    println!();
    super::print_text_report(&record, &bank);

    let path = output_dir.join(format!(
        "attempt-{}-{}.json",
        bank.info().id,
        record.created_at.format("%Y%m%d-%H%M%S")
    ));
    record.save_json(&path)?;
    println!("Attempt saved to: {}", path.display());

    Ok(())
}

/// Forward parsed stdin lines until stdin closes or the session stops
/// listening. A plain thread keeps a pending read from holding the runtime
/// open after the session ends.
fn spawn_input_reader(tx: mpsc::Sender<SessionCommand>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(Some(command)) => {
                    if tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(message) => println!("{message}"),
            }
        }
        tracing::debug!("stdin closed");
    });
}

/// Parse one line of user input. `Ok(None)` for a blank line; `Err` carries
/// a message for the user.
fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let parsed = match command {
        "a" if rest.is_empty() => return Err("usage: a <answer>".into()),
        "a" => SessionCommand::AnswerCurrentText(rest.to_string()),
        "n" => SessionCommand::Next,
        "p" => SessionCommand::Previous,
        "j" => match rest.parse::<usize>() {
            Ok(number) if number >= 1 => SessionCommand::JumpTo(number - 1),
            _ => return Err("usage: j <question number, starting at 1>".into()),
        },
        "?" => SessionCommand::Status,
        "s" => SessionCommand::Submit,
        "h" | "help" => return Err(HELP.into()),
        other => return Err(format!("unknown command '{other}'. {HELP}")),
    };
    Ok(Some(parsed))
}

fn print_question(snapshot: &SessionSnapshot, question: &Question) {
    println!();
    println!(
        "[Question {}/{} | {} left | {} answered]",
        snapshot.current_index + 1,
        snapshot.total_questions,
        format_duration(snapshot.remaining_seconds.unwrap_or(0)),
        snapshot.answered
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {option}", i + 1);
    }
    if question.kind.expects_set() {
        println!("(select all that apply, separated by commas)");
    }
    if let Some(answer) = snapshot.current_answer.as_ref().filter(|a| !a.is_empty()) {
        println!("Your answer: {answer}");
    }
}

/// Prints session progress to the terminal.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_start(&self, total_questions: usize, duration_secs: u32) {
        println!(
            "{total_questions} questions, {} on the clock.",
            format_duration(duration_secs)
        );
        println!("{HELP}");
    }

    fn on_tick(&self, remaining_secs: u32) {
        if remaining_secs % 60 == 0 || remaining_secs == 30 || remaining_secs <= 10 {
            println!("[{} left]", format_duration(remaining_secs));
        }
    }

    fn on_finished(&self, status: SessionStatus, _result: &QuizResult) {
        match status {
            SessionStatus::TimedOut => println!("\nTime is up!"),
            _ => println!("\nSubmitted."),
        }
    }

    fn on_changed(&self, snapshot: &SessionSnapshot, current: &Question) {
        print_question(snapshot, current);
    }

    fn on_rejected(&self, error: &QuizError) {
        println!("{}", rejection_line(error));
    }
}

/// Misuse (bad index, unknown id, wrong state) is routine at the prompt.
/// Anything else is a fault in the bank or the engine.
fn rejection_line(error: &QuizError) -> String {
    if error.is_misuse() {
        format!("! {error}")
    } else {
        tracing::warn!(error = %error, "unexpected rejection during session");
        format!("! {error} (the session continues)")
    }
}
