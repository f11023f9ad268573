//! Test utilities and module declarations for storage tests.

use async_trait::async_trait;
use sqlx::PgConnection;

use crate::error::StorageError;
use crate::migration::Migration;

/// A migration that issues no SQL; only its place in the chain matters.
pub struct FakeMigration {
    pub revision: &'static str,
    pub down_revision: Option<&'static str>,
}

#[async_trait]
impl Migration for FakeMigration {
    fn revision(&self) -> &'static str {
        self.revision
    }

    fn down_revision(&self) -> Option<&'static str> {
        self.down_revision
    }

    fn message(&self) -> &'static str {
        "fake"
    }

    async fn upgrade(&self, _conn: &mut PgConnection) -> Result<(), StorageError> {
        Ok(())
    }

    async fn downgrade(&self, _conn: &mut PgConnection) -> Result<(), StorageError> {
        Ok(())
    }
}

pub fn fake(revision: &'static str, down_revision: Option<&'static str>) -> Box<dyn Migration> {
    Box::new(FakeMigration { revision, down_revision })
}

mod history_tests;
