//! Linear revision history built from the registered migrations.

use std::collections::HashMap;
use std::ops::Range;

use discovery_tags_core::{DowngradeTarget, RevisionId, UpgradeTarget};

use crate::error::StorageError;
use crate::migration::Migration;

pub struct MigrationEntry {
    pub revision: RevisionId,
    pub down_revision: Option<RevisionId>,
    pub migration: Box<dyn Migration>,
}

impl std::fmt::Debug for MigrationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MigrationEntry")
            .field("revision", &self.revision)
            .field("down_revision", &self.down_revision)
            .field("message", &self.migration.message())
            .finish()
    }
}

/// Migrations ordered base → head.
///
/// The base may point at a predecessor that is not registered here (history
/// that predates this binary); every other link must resolve.
#[derive(Debug)]
pub struct MigrationHistory {
    entries: Vec<MigrationEntry>,
}

impl MigrationHistory {
    /// Links `migrations` into a single chain, rejecting duplicates, branches,
    /// multiple bases and cycles.
    pub fn new(migrations: Vec<Box<dyn Migration>>) -> Result<Self, StorageError> {
        if migrations.is_empty() {
            return Err(StorageError::InvalidHistory("no migrations registered".to_owned()));
        }

        let mut by_revision: HashMap<RevisionId, MigrationEntry> = HashMap::new();
        for migration in migrations {
            let revision = RevisionId::new(migration.revision())?;
            let down_revision = migration.down_revision().map(RevisionId::new).transpose()?;
            if by_revision.contains_key(&revision) {
                return Err(StorageError::InvalidHistory(format!("duplicate revision {revision}")));
            }
            by_revision
                .insert(revision.clone(), MigrationEntry { revision, down_revision, migration });
        }

        let mut bases = Vec::new();
        let mut children: HashMap<RevisionId, RevisionId> = HashMap::new();
        for entry in by_revision.values() {
            match &entry.down_revision {
                Some(parent) if by_revision.contains_key(parent) => {
                    if let Some(other) = children.insert(parent.clone(), entry.revision.clone()) {
                        return Err(StorageError::InvalidHistory(format!(
                            "revisions {other} and {} both revise {parent}",
                            entry.revision
                        )));
                    }
                },
                _ => bases.push(entry.revision.clone()),
            }
        }

        let base = match bases.as_slice() {
            [single] => single.clone(),
            [] => {
                return Err(StorageError::InvalidHistory(
                    "no base revision (every revision has a registered parent)".to_owned(),
                ));
            },
            many => {
                let mut names: Vec<_> = many.iter().map(RevisionId::to_string).collect();
                names.sort();
                return Err(StorageError::InvalidHistory(format!(
                    "multiple base revisions: {}",
                    names.join(", ")
                )));
            },
        };

        let mut ordered = Vec::with_capacity(by_revision.len());
        let mut cursor = Some(base);
        while let Some(rev) = cursor {
            cursor = children.get(&rev).cloned();
            if let Some(entry) = by_revision.remove(&rev) {
                ordered.push(entry);
            }
        }

        if !by_revision.is_empty() {
            let mut names: Vec<_> = by_revision.keys().map(RevisionId::to_string).collect();
            names.sort();
            return Err(StorageError::InvalidHistory(format!(
                "revisions not reachable from base (cycle): {}",
                names.join(", ")
            )));
        }

        Ok(Self { entries: ordered })
    }

    /// History of every migration compiled into this binary.
    pub fn registered() -> Result<Self, StorageError> {
        Self::new(crate::migrations::all())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MigrationEntry> {
        self.entries.iter()
    }

    pub fn base(&self) -> Option<&MigrationEntry> {
        self.entries.first()
    }

    pub fn head(&self) -> Option<&MigrationEntry> {
        self.entries.last()
    }

    pub fn get(&self, revision: &RevisionId) -> Option<&MigrationEntry> {
        self.entries.iter().find(|e| &e.revision == revision)
    }

    pub(crate) fn entry(&self, index: usize) -> Option<&MigrationEntry> {
        self.entries.get(index)
    }

    /// The unregistered revision the base was written on top of.
    pub fn base_predecessor(&self) -> Option<&RevisionId> {
        self.base().and_then(|e| e.down_revision.as_ref())
    }

    fn position(&self, revision: &RevisionId) -> Option<usize> {
        self.entries.iter().position(|e| &e.revision == revision)
    }

    /// Number of registered migrations applied when the database records `current`.
    pub fn applied_count(&self, current: Option<&RevisionId>) -> Result<usize, StorageError> {
        match current {
            None => Ok(0),
            Some(rev) if Some(rev) == self.base_predecessor() => Ok(0),
            Some(rev) => self
                .position(rev)
                .map(|pos| pos + 1)
                .ok_or_else(|| StorageError::UnknownRevision(rev.to_string())),
        }
    }

    /// Revision to record once exactly `applied` migrations are in place.
    pub fn revision_after(&self, applied: usize) -> Option<&RevisionId> {
        match applied {
            0 => self.base_predecessor(),
            n => self.entries.get(n - 1).map(|e| &e.revision),
        }
    }

    /// Indices of migrations to upgrade, in application order.
    pub fn upgrade_plan(
        &self,
        applied: usize,
        target: &UpgradeTarget,
    ) -> Result<Range<usize>, StorageError> {
        let end = match target {
            UpgradeTarget::Head => self.len(),
            UpgradeTarget::Steps(n) => {
                let end = applied.saturating_add(*n);
                if end > self.len() {
                    return Err(StorageError::InvalidTarget(format!(
                        "cannot upgrade {n} step(s): only {} pending",
                        self.len().saturating_sub(applied)
                    )));
                }
                end
            },
            UpgradeTarget::Revision(rev) => {
                let pos = self
                    .position(rev)
                    .ok_or_else(|| StorageError::UnknownRevision(rev.to_string()))?;
                if pos + 1 < applied {
                    return Err(StorageError::InvalidTarget(format!(
                        "revision {rev} is older than the current revision; downgrade instead"
                    )));
                }
                pos + 1
            },
        };
        Ok(applied.min(end)..end)
    }

    /// Indices of migrations to downgrade; revert them from the end of the range.
    pub fn downgrade_plan(
        &self,
        applied: usize,
        target: &DowngradeTarget,
    ) -> Result<Range<usize>, StorageError> {
        let start = match target {
            DowngradeTarget::Base => 0,
            DowngradeTarget::Steps(n) => applied.checked_sub(*n).ok_or_else(|| {
                StorageError::InvalidTarget(format!(
                    "cannot downgrade {n} step(s): only {applied} applied"
                ))
            })?,
            DowngradeTarget::Revision(rev) if Some(rev) == self.base_predecessor() => 0,
            DowngradeTarget::Revision(rev) => {
                let pos = self
                    .position(rev)
                    .ok_or_else(|| StorageError::UnknownRevision(rev.to_string()))?;
                if pos + 1 > applied {
                    return Err(StorageError::InvalidTarget(format!(
                        "revision {rev} is not applied yet; upgrade instead"
                    )));
                }
                pos + 1
            },
        };
        Ok(start..applied)
    }
}
