//! quizclock-report — Review pages and summaries for finished attempts.

pub mod html;
pub mod markdown;
pub mod review;
