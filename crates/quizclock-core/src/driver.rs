//! Async clock driver for a session.
//!
//! Runs on a single task: user commands and one-second ticks are applied to
//! the controller one at a time, so submit and expiry never overlap. Intended
//! for a current-thread tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::error::QuizError;
use crate::model::{Answer, SessionStatus};
use crate::scoring::QuizResult;
use crate::session::{SessionController, SessionEvent};

/// Length of one countdown tick.
pub const TICK: Duration = Duration::from_secs(1);

/// A user action forwarded to a running session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    /// Answer a specific question.
    Answer { question_id: String, answer: Answer },
    /// Answer whichever question is on screen.
    AnswerCurrent(Answer),
    /// Typed input for the question on screen, read according to its type.
    AnswerCurrentText(String),
    Next,
    Previous,
    JumpTo(usize),
    /// Re-display the current state without changing it.
    Status,
    Submit,
}

/// Apply one command to the controller.
pub fn apply_command(
    controller: &mut SessionController,
    command: SessionCommand,
) -> Result<(), QuizError> {
    match command {
        SessionCommand::Answer {
            question_id,
            answer,
        } => controller.record_answer(&question_id, answer),
        SessionCommand::AnswerCurrent(answer) => controller.answer_current(answer),
        SessionCommand::AnswerCurrentText(input) => {
            let answer = Answer::from_input(controller.current_question().kind, &input);
            controller.answer_current(answer)
        }
        SessionCommand::Next => controller.go_to_next().map(|_| ()),
        SessionCommand::Previous => controller.go_to_previous().map(|_| ()),
        SessionCommand::JumpTo(index) => controller.jump_to(index),
        SessionCommand::Status => Ok(()),
        SessionCommand::Submit => controller.submit().map(|_| ()),
    }
}

/// Run a session to completion.
///
/// Starts the controller if it has not been started, then interleaves
/// commands from `commands` with one-second ticks until the session is
/// terminal. Commands win ties with a tick that is due at the same instant.
/// If the command channel closes, the clock keeps running until expiry so a
/// result is always produced.
pub async fn run_session(
    controller: &mut SessionController,
    mut commands: mpsc::Receiver<SessionCommand>,
) -> Result<Arc<QuizResult>, QuizError> {
    if controller.status() == SessionStatus::NotStarted {
        controller.start()?;
    }

    let mut clock = interval_at(Instant::now() + TICK, TICK);
    clock.set_missed_tick_behavior(MissedTickBehavior::Burst);
    let mut accepting = true;

    loop {
        if let Some(result) = controller.result() {
            return Ok(Arc::clone(result));
        }

        tokio::select! {
            biased;

            command = commands.recv(), if accepting => match command {
                Some(command) => {
                    tracing::debug!(?command, "applying command");
                    match apply_command(controller, command) {
                        Ok(()) => {
                            if !controller.status().is_terminal() {
                                let snapshot = controller.snapshot();
                                controller
                                    .observer()
                                    .on_changed(&snapshot, controller.current_question());
                            }
                        }
                        Err(e) => {
                            tracing::warn!("command rejected: {e}");
                            controller.observer().on_rejected(&e);
                        }
                    }
                }
                None => {
                    tracing::debug!("command channel closed, waiting for the clock");
                    accepting = false;
                }
            },

            _ = clock.tick() => {
                if let Some(SessionEvent::TimedOut(result)) = controller.tick() {
                    return Ok(result);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionBank;
    use crate::model::{Difficulty, Question, QuestionKind};

    fn bank() -> Arc<QuestionBank> {
        let questions = ["q1", "q2"]
            .iter()
            .map(|id| Question {
                id: id.to_string(),
                kind: QuestionKind::TrueFalse,
                prompt: String::new(),
                options: vec!["True".into(), "False".into()],
                correct_answer: Answer::single("True"),
                explanation: String::new(),
                difficulty: Difficulty::Easy,
                category: "general".into(),
                points: 1,
            })
            .collect();
        Arc::new(QuestionBank::new(questions).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn submit_command_finishes_early() {
        let mut controller = SessionController::new(bank(), 60).unwrap();
        let (tx, rx) = mpsc::channel(8);

        tx.send(SessionCommand::AnswerCurrent(Answer::single("True")))
            .await
            .unwrap();
        tx.send(SessionCommand::Submit).await.unwrap();

        let result = run_session(&mut controller, rx).await.unwrap();
        assert_eq!(controller.status(), SessionStatus::Submitted);
        assert_eq!(result.correct_answers, 1);
        assert_eq!(result.time_taken_seconds, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn text_answers_use_the_current_question_type() {
        let mut controller = SessionController::new(bank(), 60).unwrap();
        let (tx, rx) = mpsc::channel(8);

        tx.send(SessionCommand::AnswerCurrentText(" True ".into()))
            .await
            .unwrap();
        tx.send(SessionCommand::Next).await.unwrap();
        tx.send(SessionCommand::AnswerCurrentText("False".into()))
            .await
            .unwrap();
        tx.send(SessionCommand::Submit).await.unwrap();

        let result = run_session(&mut controller, rx).await.unwrap();
        assert_eq!(controller.answer_for("q1"), Some(&Answer::single("True")));
        assert_eq!(result.correct_answers, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_channel_runs_to_expiry() {
        let mut controller = SessionController::new(bank(), 5).unwrap();
        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionCommand::Answer {
            question_id: "q2".into(),
            answer: Answer::single("True"),
        })
        .await
        .unwrap();
        drop(tx);

        let result = run_session(&mut controller, rx).await.unwrap();
        assert_eq!(controller.status(), SessionStatus::TimedOut);
        assert_eq!(result.time_taken_seconds, 5);
        assert_eq!(result.correct_answers, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_commands_do_not_stop_the_session() {
        let mut controller = SessionController::new(bank(), 3).unwrap();
        let (tx, rx) = mpsc::channel(8);
        tx.send(SessionCommand::JumpTo(7)).await.unwrap();
        tx.send(SessionCommand::Submit).await.unwrap();

        let result = run_session(&mut controller, rx).await.unwrap();
        assert_eq!(controller.status(), SessionStatus::Submitted);
        assert_eq!(result.correct_answers, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn already_finished_session_returns_stored_result() {
        let mut controller = SessionController::new(bank(), 3).unwrap();
        controller.start().unwrap();
        let stored = controller.submit().unwrap();

        let (_tx, rx) = mpsc::channel(1);
        let result = run_session(&mut controller, rx).await.unwrap();
        assert!(Arc::ptr_eq(&stored, &result));
    }
}
