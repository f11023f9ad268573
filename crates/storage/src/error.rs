//! Typed error enum for the storage layer.
//!
//! Callers can match on the failure modes a migration run actually hits
//! (object already there, object missing, broken history) instead of parsing
//! database messages.

use discovery_tags_core::{CoreError, RevisionId};
use thiserror::Error;

use crate::migration::Direction;

/// SQLSTATE for `duplicate_table` (also raised for existing views and indexes).
const DUPLICATE_TABLE: &str = "42P07";
/// SQLSTATE for `undefined_table`.
const UNDEFINED_TABLE: &str = "42P01";
/// SQLSTATE for `undefined_object`.
const UNDEFINED_OBJECT: &str = "42704";
/// SQLSTATE for `undefined_column`.
const UNDEFINED_COLUMN: &str = "42703";
/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, Error)]
pub enum StorageError {
    /// CREATE hit an existing relation.
    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// A referenced table, column, view or index is missing.
    #[error("undefined object: {0}")]
    UndefinedObject(String),

    /// Unique constraint violation (e.g. building the unique index over duplicates).
    #[error("duplicate: {0}")]
    Duplicate(String),

    /// SQL / connection / timeout failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// A single migration step failed; `source` carries the database error.
    #[error("{direction} of revision {revision} failed: {source}")]
    Step {
        revision: RevisionId,
        direction: Direction,
        #[source]
        source: Box<StorageError>,
    },

    /// Registered migrations do not form a single linear chain.
    #[error("invalid migration history: {0}")]
    InvalidHistory(String),

    /// The database records a revision this binary does not know about.
    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    /// The requested target cannot be reached in the requested direction.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StorageError {
    /// Whether the root cause is an object-already-exists error.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Self::AlreadyExists(_) => true,
            Self::Step { source, .. } => source.is_already_exists(),
            _ => false,
        }
    }

    /// Whether the root cause is a missing table, column, view or index.
    pub fn is_undefined_object(&self) -> bool {
        match self {
            Self::UndefinedObject(_) => true,
            Self::Step { source, .. } => source.is_undefined_object(),
            _ => false,
        }
    }

    /// Whether the root cause is a unique-constraint violation.
    pub fn is_duplicate(&self) -> bool {
        match self {
            Self::Duplicate(_) => true,
            Self::Step { source, .. } => source.is_duplicate(),
            _ => false,
        }
    }
}

/// Custom `From<sqlx::Error>` — NOT blanket `#[from]`.
///
/// The database message is kept verbatim so operators see what PostgreSQL said.
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        let sqlx::Error::Database(db_err) = &err else {
            return Self::Database(err);
        };
        let code = db_err.code().map(|c| c.into_owned());
        let message = db_err.message().to_owned();
        match code.as_deref() {
            Some(DUPLICATE_TABLE) => Self::AlreadyExists(message),
            Some(UNDEFINED_TABLE | UNDEFINED_OBJECT | UNDEFINED_COLUMN) => {
                Self::UndefinedObject(message)
            },
            Some(UNIQUE_VIOLATION) => Self::Duplicate(message),
            _ => Self::Database(err),
        }
    }
}
