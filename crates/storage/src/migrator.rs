//! Applies and reverts migrations against PostgreSQL.
//!
//! Every step runs in its own transaction together with the version update,
//! so a failed step leaves the database at the last good revision.

use discovery_tags_core::{DowngradeTarget, RevisionId, UpgradeTarget};
use sqlx::PgPool;

use crate::error::StorageError;
use crate::history::{MigrationEntry, MigrationHistory};
use crate::migration::Direction;
use crate::version_table::{
    ensure_version_table, read_version, version_table_exists, write_version,
};

#[derive(Debug)]
pub struct Migrator {
    pool: PgPool,
    history: MigrationHistory,
}

impl Migrator {
    pub fn new(pool: PgPool, history: MigrationHistory) -> Self {
        Self { pool, history }
    }

    pub fn history(&self) -> &MigrationHistory {
        &self.history
    }

    /// The revision recorded in the database, if any. Never writes.
    pub async fn current(&self) -> Result<Option<RevisionId>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        if !version_table_exists(&mut *conn).await? {
            return Ok(None);
        }
        read_version(&mut *conn).await
    }

    /// Creates the bookkeeping table if needed and reads the recorded revision.
    async fn prepare(&self) -> Result<Option<RevisionId>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        ensure_version_table(&mut *conn).await?;
        read_version(&mut *conn).await
    }

    /// Migrations registered here but not yet applied, oldest first.
    pub async fn pending(&self) -> Result<Vec<&MigrationEntry>, StorageError> {
        let current = self.current().await?;
        let applied = self.history.applied_count(current.as_ref())?;
        Ok(self.history.iter().skip(applied).collect())
    }

    /// Upgrades to `target`; returns the revisions applied, in order.
    pub async fn upgrade(&self, target: &UpgradeTarget) -> Result<Vec<RevisionId>, StorageError> {
        let current = self.prepare().await?;
        let applied = self.history.applied_count(current.as_ref())?;
        let plan = self.history.upgrade_plan(applied, target)?;

        if plan.is_empty() {
            tracing::info!(current = ?current, %target, "Nothing to upgrade");
            return Ok(Vec::new());
        }

        let mut done = Vec::with_capacity(plan.len());
        for index in plan {
            let entry = self.entry(index)?;
            self.run_step(entry, Direction::Upgrade, Some(&entry.revision)).await?;
            done.push(entry.revision.clone());
        }
        tracing::info!(revisions = done.len(), %target, "Upgrade complete");
        Ok(done)
    }

    /// Downgrades to `target`; returns the revisions reverted, newest first.
    pub async fn downgrade(
        &self,
        target: &DowngradeTarget,
    ) -> Result<Vec<RevisionId>, StorageError> {
        let current = self.prepare().await?;
        let applied = self.history.applied_count(current.as_ref())?;
        let plan = self.history.downgrade_plan(applied, target)?;

        if plan.is_empty() {
            tracing::info!(current = ?current, %target, "Nothing to downgrade");
            return Ok(Vec::new());
        }

        let mut done = Vec::with_capacity(plan.len());
        for index in plan.rev() {
            let entry = self.entry(index)?;
            let record = self.history.revision_after(index);
            self.run_step(entry, Direction::Downgrade, record).await?;
            done.push(entry.revision.clone());
        }
        tracing::info!(revisions = done.len(), %target, "Downgrade complete");
        Ok(done)
    }

    fn entry(&self, index: usize) -> Result<&MigrationEntry, StorageError> {
        self.history.entry(index).ok_or_else(|| {
            StorageError::InvalidHistory(format!("no migration at position {index}"))
        })
    }

    async fn run_step(
        &self,
        entry: &MigrationEntry,
        direction: Direction,
        record: Option<&RevisionId>,
    ) -> Result<(), StorageError> {
        tracing::info!(
            revision = %entry.revision,
            %direction,
            message = entry.migration.message(),
            "Running migration"
        );

        let mut tx = self.pool.begin().await?;
        let outcome = match direction {
            Direction::Upgrade => entry.migration.upgrade(&mut *tx).await,
            Direction::Downgrade => entry.migration.downgrade(&mut *tx).await,
        };

        if let Err(source) = outcome {
            tracing::error!(revision = %entry.revision, %direction, "Migration failed: {source}");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback after failed migration also failed: {rollback_err}");
            }
            return Err(StorageError::Step {
                revision: entry.revision.clone(),
                direction,
                source: Box::new(source),
            });
        }

        write_version(&mut *tx, record).await?;
        tx.commit().await?;
        Ok(())
    }
}
