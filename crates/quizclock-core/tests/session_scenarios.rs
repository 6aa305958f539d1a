//! Full-session scenarios against an eight-question Java bank.
//!
//! Exercises start → answer → submit/expire → score through the public API,
//! both by ticking the controller by hand and through the async driver.

use std::sync::Arc;

use quizclock_core::countdown::{Countdown, CountdownEvent};
use quizclock_core::driver::{run_session, SessionCommand};
use quizclock_core::model::Difficulty;
use quizclock_core::scoring::{score, Answers};
use quizclock_core::session::SessionEvent;
use quizclock_core::{
    Answer, Grade, Question, QuestionBank, QuestionKind, QuizError, SessionController,
    SessionStatus,
};
use tokio::sync::mpsc;

const DURATION: u32 = 600;

fn q(
    id: &str,
    kind: QuestionKind,
    options: &[&str],
    correct: Answer,
    points: u32,
) -> Question {
    Question {
        id: id.into(),
        kind,
        prompt: format!("Prompt for {id}"),
        options: options.iter().map(|s| s.to_string()).collect(),
        correct_answer: correct,
        explanation: format!("Explanation for {id}"),
        difficulty: Difficulty::Medium,
        category: "java".into(),
        points,
    }
}

fn java_bank() -> Arc<QuestionBank> {
    use QuestionKind::*;
    Arc::new(
        QuestionBank::new(vec![
            q(
                "primitives",
                MultiSelect,
                &["int", "String", "boolean", "double"],
                Answer::multiple(["int", "boolean", "double"]),
                20,
            ),
            q(
                "entry-point",
                SingleChoice,
                &["main", "start", "run"],
                Answer::single("main"),
                10,
            ),
            q(
                "static-typing",
                TrueFalse,
                &["True", "False"],
                Answer::single("True"),
                5,
            ),
            q("constant", ShortAnswer, &[], Answer::single("final"), 10),
            q(
                "inherit",
                SingleChoice,
                &["extends", "implements", "inherits"],
                Answer::single("extends"),
                10,
            ),
            q(
                "string-equality",
                SingleChoice,
                &["==", "equals()", "compare()"],
                Answer::single("equals()"),
                10,
            ),
            q(
                "print",
                FreeForm,
                &[],
                Answer::single("System.out.println(\"Hi\");"),
                15,
            ),
            q(
                "null-primitive",
                TrueFalse,
                &["True", "False"],
                Answer::single("False"),
                5,
            ),
        ])
        .unwrap(),
    )
}

fn started() -> SessionController {
    let mut session = SessionController::new(java_bank(), DURATION).unwrap();
    session.start().unwrap();
    session
}

#[test]
fn end_to_end_submit_with_time_left() {
    let mut session = started();

    session
        .record_answer("primitives", Answer::multiple(["double", "int", "boolean"]))
        .unwrap();
    session.record_answer("entry-point", Answer::single("main")).unwrap();
    session.record_answer("static-typing", Answer::single("True")).unwrap();
    session.record_answer("constant", Answer::single("final")).unwrap();
    session.record_answer("inherit", Answer::single("extends")).unwrap();
    session.record_answer("string-equality", Answer::single("equals()")).unwrap();
    // Two wrong answers.
    session.record_answer("print", Answer::single("print(\"Hi\")")).unwrap();
    session.record_answer("null-primitive", Answer::single("True")).unwrap();

    for _ in 0..50 {
        assert!(matches!(session.tick(), Some(SessionEvent::Tick { .. })));
    }
    assert_eq!(session.remaining_seconds(), Some(550));

    let result = session.submit().unwrap();
    assert_eq!(session.status(), SessionStatus::Submitted);
    assert_eq!(result.total_questions, 8);
    assert_eq!(result.correct_answers, 6);
    assert_eq!(result.score_percent, 75);
    assert_eq!(result.grade, Grade::C);
    assert_eq!(result.time_taken_seconds, 50);
    assert_eq!(result.points_earned, 65);
    assert_eq!(result.total_points, 85);
}

#[test]
fn timeout_scores_only_what_was_answered() {
    let mut session = started();
    session.record_answer("entry-point", Answer::single("main")).unwrap();
    session.record_answer("constant", Answer::single("final")).unwrap();

    let mut expiries = 0;
    for _ in 0..DURATION {
        if let Some(SessionEvent::TimedOut(_)) = session.tick() {
            expiries += 1;
        }
    }
    assert_eq!(expiries, 1);
    assert_eq!(session.status(), SessionStatus::TimedOut);

    let result = session.result().unwrap();
    assert_eq!(result.correct_answers, 2);
    assert_eq!(result.answered_count(), 2);
    assert_eq!(result.score_percent, 25);
    assert_eq!(result.grade, Grade::F);
    assert_eq!(result.time_taken_seconds, DURATION);

    // Further ticks are inert.
    assert_eq!(session.tick(), None);
}

#[test]
fn partial_multi_select_is_wrong() {
    let mut session = started();
    session
        .record_answer("primitives", Answer::multiple(["int", "boolean"]))
        .unwrap();
    let result = session.submit().unwrap();
    assert!(!result.outcome("primitives").unwrap().correct);

    let mut session = started();
    session
        .record_answer(
            "primitives",
            Answer::multiple(["int", "boolean", "double", "String"]),
        )
        .unwrap();
    let result = session.submit().unwrap();
    assert!(!result.outcome("primitives").unwrap().correct);
}

#[test]
fn submit_on_the_expiring_second_wins() {
    let mut session = started();
    for _ in 0..DURATION - 1 {
        session.tick();
    }
    assert_eq!(session.remaining_seconds(), Some(1));

    let result = session.submit().unwrap();
    assert_eq!(result.time_taken_seconds, DURATION - 1);
    // The tick that would have expired the session is already cancelled.
    assert_eq!(session.tick(), None);
    assert_eq!(session.status(), SessionStatus::Submitted);
    assert!(Arc::ptr_eq(&result, session.result().unwrap()));
}

#[test]
fn countdown_cancelled_on_expiry_tick_never_expires() {
    let mut countdown = Countdown::new();
    countdown.start(1).unwrap();
    countdown.cancel();
    let expired = std::iter::repeat_with(|| countdown.tick())
        .take(3)
        .flatten()
        .filter(|e| *e == CountdownEvent::Expired)
        .count();
    assert_eq!(expired, 0);
}

#[test]
fn terminal_session_rejects_everything() {
    let mut session = started();
    let result = session.submit().unwrap();
    let terminal = QuizError::AlreadyTerminal(SessionStatus::Submitted);

    assert_eq!(session.submit().unwrap_err(), terminal);
    assert_eq!(
        session.record_answer("constant", Answer::single("final")),
        Err(terminal.clone())
    );
    assert_eq!(session.go_to_next(), Err(terminal.clone()));
    assert_eq!(session.jump_to(0), Err(terminal));
    assert!(Arc::ptr_eq(&result, session.result().unwrap()));
    assert_eq!(session.result().unwrap().correct_answers, 0);
}

#[test]
fn scoring_is_a_pure_function_of_its_inputs() {
    let bank = java_bank();
    let mut answers = Answers::new();
    answers.insert("constant".into(), Answer::single("final"));
    answers.insert("primitives".into(), Answer::single("int"));

    let a = score(&bank, &answers, 123);
    let b = score(&bank, &answers, 123);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
    assert!(a.outcome("primitives").unwrap().mismatch);
}

#[tokio::test(start_paused = true)]
async fn driver_times_out_after_simulated_clock() {
    let mut session = SessionController::new(java_bank(), DURATION).unwrap();
    let (tx, rx) = mpsc::channel(16);

    tx.send(SessionCommand::Answer {
        question_id: "inherit".into(),
        answer: Answer::single("extends"),
    })
    .await
    .unwrap();
    tx.send(SessionCommand::Answer {
        question_id: "null-primitive".into(),
        answer: Answer::single("False"),
    })
    .await
    .unwrap();

    // Keep the sender alive: the user is present but never submits.
    let result = run_session(&mut session, rx).await.unwrap();
    drop(tx);

    assert_eq!(session.status(), SessionStatus::TimedOut);
    assert_eq!(result.correct_answers, 2);
    assert_eq!(result.time_taken_seconds, DURATION);
}

#[tokio::test(start_paused = true)]
async fn driver_submit_after_some_time() {
    let mut session = SessionController::new(java_bank(), DURATION).unwrap();
    let (tx, rx) = mpsc::channel(16);

    let user = tokio::spawn(async move {
        tx.send(SessionCommand::AnswerCurrent(Answer::multiple([
            "int", "boolean", "double",
        ])))
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50_500)).await;
        tx.send(SessionCommand::Submit).await.unwrap();
    });

    let result = run_session(&mut session, rx).await.unwrap();
    user.await.unwrap();

    assert_eq!(session.status(), SessionStatus::Submitted);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.time_taken_seconds, 50);
}
