use crate::aircraft::Callsign;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TowerError>;

#[derive(Error, Debug)]
pub enum TowerError {
    #[error("malformed task list: {0}")]
    MalformedTaskList(String),

    #[error("malformed task: {0}")]
    MalformedTask(String),

    #[error("malformed scenario: {0}")]
    MalformedScenario(String),

    #[error("no suitable gate for aircraft {0}")]
    NoSuitableGate(Callsign),

    #[error("no space: {0}")]
    NoSpace(String),

    // core and gate bookkeeping disagree
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("I/O error {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error {0}")]
    Json(#[from] serde_json::Error),
}

pub fn malformed_scenario(msg: impl ToString) -> TowerError {
    TowerError::MalformedScenario(msg.to_string())
}
