use thiserror::Error;

/// Errors raised by the database-free domain layer.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid revision id {0:?}: expected 12 lowercase hex characters")]
    InvalidRevision(String),

    #[error("invalid migration target {0:?}")]
    InvalidTarget(String),
}
