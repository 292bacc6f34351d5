//! Errors raised while assembling a process.
//!
//! Construction is all-or-nothing: any of these aborts it and no process
//! value is produced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MrpError {
    #[error("Malformed specification at state {state}: {reason}")]
    MalformedSpecification { state: String, reason: String },

    #[error("State {state} is reached from {from} but has no transitions of its own")]
    UnknownState { state: String, from: String },

    #[error("State {0} not found in state index")]
    StateNotFound(String),

    #[error("Process has no states")]
    EmptyProcess,

    #[error("State {0} is specified more than once")]
    DuplicateState(String),

    #[error("Discount factor must lie in (0, 1], got {0}")]
    InvalidDiscount(f64),

    #[error("Transition probabilities out of {state} sum to {sum}, outside tolerance {tolerance}")]
    NotNormalised { state: String, sum: f64, tolerance: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MrpError>;
