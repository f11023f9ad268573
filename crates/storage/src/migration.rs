//! The contract every schema migration implements.

use std::fmt;

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::error::StorageError;

/// Which way a migration step moves the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Upgrade,
    Downgrade,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upgrade => f.write_str("upgrade"),
            Self::Downgrade => f.write_str("downgrade"),
        }
    }
}

/// A reversible schema change identified by its place in the revision chain.
///
/// Implementations only issue SQL; transactions and version bookkeeping belong
/// to [`crate::Migrator`]. Database errors are returned as-is.
#[async_trait]
pub trait Migration: Send + Sync {
    /// This migration's revision id.
    fn revision(&self) -> &'static str;

    /// The revision this one was written on top of, if any.
    fn down_revision(&self) -> Option<&'static str>;

    /// Short human-readable description.
    fn message(&self) -> &'static str;

    async fn upgrade(&self, conn: &mut PgConnection) -> Result<(), StorageError>;

    async fn downgrade(&self, conn: &mut PgConnection) -> Result<(), StorageError>;
}
