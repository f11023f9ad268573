//! Storage layer for discovery-tags
//!
//! PostgreSQL schema migrations (with Alembic-compatible version bookkeeping)
//! and access to the `tag_track_user` materialized view.

pub mod error;
mod history;
mod migration;
pub mod migrations;
mod migrator;
mod pool;
mod tag_index;
#[cfg(test)]
mod tests;
mod version_table;

pub use error::StorageError;
pub use history::{MigrationEntry, MigrationHistory};
pub use migration::{Direction, Migration};
pub use migrator::Migrator;
pub use pool::connect;
pub use tag_index::TagIndex;
