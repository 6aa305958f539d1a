//! quizclock-core — Timed assessment engine.
//!
//! This crate defines the question model, answer evaluation, scoring, and the
//! session state machine that the rest of quizclock builds on.

pub mod bank;
pub mod countdown;
pub mod driver;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod record;
pub mod scoring;
pub mod session;
pub mod statistics;

pub use bank::QuestionBank;
pub use error::QuizError;
pub use model::{Answer, Grade, Question, QuestionKind, SessionStatus};
pub use scoring::{QuizResult, Scorer};
pub use session::SessionController;
