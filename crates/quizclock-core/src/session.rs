//! Quiz session state machine.
//!
//! ```text
//! NotStarted --start--> InProgress --submit--> Submitted
//!                           |
//!                           +------expiry----> TimedOut
//! ```
//!
//! Both terminal states are final and each produces exactly one
//! [`QuizResult`]. Every method that fails leaves the session untouched.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::bank::QuestionBank;
use crate::countdown::{Countdown, CountdownEvent};
use crate::error::QuizError;
use crate::model::{Answer, Question, SessionStatus};
use crate::scoring::{Answers, QuizResult, Scorer};

/// Receives session changes, typically to redraw a view.
pub trait SessionObserver: Send + Sync {
    fn on_start(&self, total_questions: usize, duration_secs: u32);
    fn on_tick(&self, remaining_secs: u32);
    fn on_finished(&self, status: SessionStatus, result: &QuizResult);

    /// A user command changed (or re-displayed) the session.
    fn on_changed(&self, _snapshot: &SessionSnapshot, _current: &Question) {}

    /// A user command was refused; the session is unchanged.
    fn on_rejected(&self, _error: &QuizError) {}
}

/// Observer that ignores everything.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn on_start(&self, _: usize, _: u32) {}
    fn on_tick(&self, _: u32) {}
    fn on_finished(&self, _: SessionStatus, _: &QuizResult) {}
}

/// What a clock tick did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Time moved on; the session is still running.
    Tick { remaining_secs: u32 },
    /// The clock ran out and the session was scored.
    TimedOut(Arc<QuizResult>),
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub current_index: usize,
    /// What is recorded for the question at `current_index`.
    pub current_answer: Option<Answer>,
    /// Present only while the session is in progress.
    pub remaining_seconds: Option<u32>,
    pub answered: usize,
    pub total_questions: usize,
    pub started_at: Option<DateTime<Utc>>,
    /// Present once the session is terminal.
    pub result: Option<Arc<QuizResult>>,
}

/// Drives one user's pass through a question bank.
pub struct SessionController {
    bank: Arc<QuestionBank>,
    scorer: Scorer,
    duration_secs: u32,
    observer: Arc<dyn SessionObserver>,

    status: SessionStatus,
    current_index: usize,
    answers: Answers,
    countdown: Countdown,
    started_at: Option<DateTime<Utc>>,
    result: Option<Arc<QuizResult>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("bank", &self.bank.info().id)
            .field("status", &self.status)
            .field("current_index", &self.current_index)
            .field("answered", &self.answers.len())
            .field("remaining", &self.remaining_seconds())
            .finish()
    }
}

impl SessionController {
    /// Create a session in `NotStarted` over a shared bank.
    pub fn new(bank: Arc<QuestionBank>, duration_secs: u32) -> Result<Self, QuizError> {
        if duration_secs == 0 {
            return Err(QuizError::Configuration(
                "session duration must be a positive number of seconds".into(),
            ));
        }
        Ok(Self {
            bank,
            scorer: Scorer::default(),
            duration_secs,
            observer: Arc::new(NoopObserver),
            status: SessionStatus::NotStarted,
            current_index: 0,
            answers: Answers::new(),
            countdown: Countdown::new(),
            started_at: None,
            result: None,
        })
    }

    /// Use a custom grade table.
    pub fn with_scorer(mut self, scorer: Scorer) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Begin the session and start the clock.
    pub fn start(&mut self) -> Result<(), QuizError> {
        match self.status {
            SessionStatus::NotStarted => {}
            SessionStatus::InProgress => return Err(QuizError::AlreadyRunning),
            terminal => return Err(QuizError::AlreadyTerminal(terminal)),
        }

        self.countdown.start(self.duration_secs)?;
        self.answers.clear();
        self.current_index = 0;
        self.started_at = Some(Utc::now());
        self.status = SessionStatus::InProgress;

        tracing::debug!(
            bank = %self.bank.info().id,
            questions = self.bank.size(),
            duration_secs = self.duration_secs,
            "session started"
        );
        self.observer.on_start(self.bank.size(), self.duration_secs);
        Ok(())
    }

    /// Advance the clock by one second.
    ///
    /// Returns `None` when the session is not running, including after a
    /// submit that landed on the same second as the final tick.
    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.status != SessionStatus::InProgress {
            return None;
        }

        match self.countdown.tick()? {
            CountdownEvent::Tick(remaining_secs) => {
                self.observer.on_tick(remaining_secs);
                Some(SessionEvent::Tick { remaining_secs })
            }
            CountdownEvent::Expired => self
                .finish(SessionStatus::TimedOut)
                .ok()
                .map(SessionEvent::TimedOut),
        }
    }

    /// Finish the session on the user's request and score it.
    pub fn submit(&mut self) -> Result<Arc<QuizResult>, QuizError> {
        self.finish(SessionStatus::Submitted)
    }

    /// Shared tail of submit and expiry.
    fn finish(&mut self, target: SessionStatus) -> Result<Arc<QuizResult>, QuizError> {
        self.require_in_progress()?;

        // Stop the clock before the answers are read so no tick can land
        // between the guard and scoring.
        self.countdown.cancel();
        self.status = target;

        let time_taken = self.duration_secs - self.countdown.remaining();
        let result = Arc::new(self.scorer.score(&self.bank, &self.answers, time_taken));

        tracing::info!(
            status = %target,
            correct = result.correct_answers,
            total = result.total_questions,
            percent = result.score_percent,
            grade = %result.grade,
            time_taken,
            "session finished"
        );

        self.result = Some(Arc::clone(&result));
        self.observer.on_finished(target, &result);
        Ok(result)
    }

    /// Throw the session away and return to `NotStarted` over the same bank.
    pub fn reset(&mut self) {
        self.countdown.cancel();
        self.countdown = Countdown::new();
        self.status = SessionStatus::NotStarted;
        self.current_index = 0;
        self.answers.clear();
        self.started_at = None;
        self.result = None;
        tracing::debug!("session reset");
    }

    // -----------------------------------------------------------------------
    // Answers and navigation
    // -----------------------------------------------------------------------

    /// Record or overwrite the answer for a question. Last write wins.
    ///
    /// The answer's shape is not checked here; a mismatch surfaces when the
    /// session is scored.
    pub fn record_answer(&mut self, question_id: &str, value: Answer) -> Result<(), QuizError> {
        self.require_in_progress()?;
        if !self.bank.contains(question_id) {
            return Err(QuizError::UnknownQuestion(question_id.to_string()));
        }
        self.answers.insert(question_id.to_string(), value);
        Ok(())
    }

    /// Record an answer for the question currently on screen.
    pub fn answer_current(&mut self, value: Answer) -> Result<(), QuizError> {
        self.require_in_progress()?;
        let id = self.bank.questions()[self.current_index].id.clone();
        self.record_answer(&id, value)
    }

    /// Move forward one question. Stays put on the last question.
    pub fn go_to_next(&mut self) -> Result<usize, QuizError> {
        self.require_in_progress()?;
        if self.current_index + 1 < self.bank.size() {
            self.current_index += 1;
        }
        Ok(self.current_index)
    }

    /// Move back one question. Stays put on the first question.
    pub fn go_to_previous(&mut self) -> Result<usize, QuizError> {
        self.require_in_progress()?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(self.current_index)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.require_in_progress()?;
        if index >= self.bank.size() {
            return Err(QuizError::IndexOutOfRange {
                index,
                len: self.bank.size(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    fn require_in_progress(&self) -> Result<(), QuizError> {
        match self.status {
            SessionStatus::InProgress => Ok(()),
            SessionStatus::NotStarted => Err(QuizError::NotInProgress(self.status)),
            terminal => Err(QuizError::AlreadyTerminal(terminal)),
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> &Question {
        &self.bank.questions()[self.current_index]
    }

    /// Seconds left on the clock while in progress.
    pub fn remaining_seconds(&self) -> Option<u32> {
        (self.status == SessionStatus::InProgress).then(|| self.countdown.remaining())
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn answer_for(&self, question_id: &str) -> Option<&Answer> {
        self.answers.get(question_id)
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn bank(&self) -> &Arc<QuestionBank> {
        &self.bank
    }

    /// The stored result once the session is terminal.
    pub fn result(&self) -> Option<&Arc<QuizResult>> {
        self.result.as_ref()
    }

    pub(crate) fn observer(&self) -> &Arc<dyn SessionObserver> {
        &self.observer
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            current_index: self.current_index,
            current_answer: self.answer_for(&self.current_question().id).cloned(),
            remaining_seconds: self.remaining_seconds(),
            answered: self.answers.values().filter(|a| !a.is_empty()).count(),
            total_questions: self.bank.size(),
            started_at: self.started_at,
            result: self.result.clone(),
        }
    }
}
