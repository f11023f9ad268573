#![expect(clippy::unwrap_used, reason = "test code")]

use discovery_tags_core::{DowngradeTarget, RevisionId, UpgradeTarget};

use super::fake;
use crate::error::StorageError;
use crate::history::MigrationHistory;

const A: &str = "aaaaaaaaaaaa";
const B: &str = "bbbbbbbbbbbb";
const C: &str = "cccccccccccc";
const EXTERNAL: &str = "000000000000";

fn rev(raw: &str) -> RevisionId {
    RevisionId::new(raw).unwrap()
}

fn chain() -> MigrationHistory {
    // Registered out of order on purpose.
    MigrationHistory::new(vec![fake(C, Some(B)), fake(A, Some(EXTERNAL)), fake(B, Some(A))])
        .unwrap()
}

fn revisions(history: &MigrationHistory) -> Vec<String> {
    history.iter().map(|e| e.revision.to_string()).collect()
}

#[test]
fn registered_history_is_the_tag_view_migration() {
    let history = MigrationHistory::registered().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.head().unwrap().revision, rev("6d1b38f242fe"));
    assert_eq!(history.base_predecessor(), Some(&rev("47b07608863f")));
}

#[test]
fn orders_base_to_head() {
    let history = chain();
    assert_eq!(revisions(&history), vec![A, B, C]);
    assert_eq!(history.base().unwrap().revision, rev(A));
    assert_eq!(history.head().unwrap().revision, rev(C));
    assert_eq!(history.base_predecessor(), Some(&rev(EXTERNAL)));
    assert!(history.get(&rev(B)).is_some());
    assert!(history.get(&rev(EXTERNAL)).is_none());
}

#[test]
fn rejects_empty_history() {
    assert!(matches!(MigrationHistory::new(vec![]), Err(StorageError::InvalidHistory(_))));
}

#[test]
fn rejects_duplicate_revisions() {
    let err = MigrationHistory::new(vec![fake(A, None), fake(A, None)]).unwrap_err();
    assert!(matches!(err, StorageError::InvalidHistory(ref m) if m.contains("duplicate")));
}

#[test]
fn rejects_branches() {
    let err =
        MigrationHistory::new(vec![fake(A, None), fake(B, Some(A)), fake(C, Some(A))]).unwrap_err();
    assert!(matches!(err, StorageError::InvalidHistory(ref m) if m.contains("both revise")));
}

#[test]
fn rejects_multiple_bases() {
    let err = MigrationHistory::new(vec![fake(A, None), fake(B, Some(EXTERNAL))]).unwrap_err();
    assert!(matches!(err, StorageError::InvalidHistory(ref m) if m.contains("multiple base")));
}

#[test]
fn rejects_cycles() {
    let err = MigrationHistory::new(vec![fake(A, Some(B)), fake(B, Some(A))]).unwrap_err();
    assert!(matches!(err, StorageError::InvalidHistory(_)));

    let err = MigrationHistory::new(vec![fake(A, None), fake(B, Some(C)), fake(C, Some(B))])
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidHistory(ref m) if m.contains("cycle")));
}

#[test]
fn rejects_malformed_revision_ids() {
    let err = MigrationHistory::new(vec![fake("not-a-rev", None)]).unwrap_err();
    assert!(matches!(err, StorageError::Core(_)));
}

#[test]
fn applied_count_treats_external_predecessor_as_empty() {
    let history = chain();
    assert_eq!(history.applied_count(None).unwrap(), 0);
    assert_eq!(history.applied_count(Some(&rev(EXTERNAL))).unwrap(), 0);
    assert_eq!(history.applied_count(Some(&rev(B))).unwrap(), 2);
    assert!(matches!(
        history.applied_count(Some(&rev("dddddddddddd"))),
        Err(StorageError::UnknownRevision(_))
    ));
}

#[test]
fn revision_after_records_predecessor_at_zero() {
    let history = chain();
    assert_eq!(history.revision_after(0), Some(&rev(EXTERNAL)));
    assert_eq!(history.revision_after(1), Some(&rev(A)));
    assert_eq!(history.revision_after(3), Some(&rev(C)));

    let rootless = MigrationHistory::new(vec![fake(A, None)]).unwrap();
    assert_eq!(rootless.revision_after(0), None);
}

#[test]
fn upgrade_plans() {
    let history = chain();
    assert_eq!(history.upgrade_plan(0, &UpgradeTarget::Head).unwrap(), 0..3);
    assert_eq!(history.upgrade_plan(1, &UpgradeTarget::Steps(1)).unwrap(), 1..2);
    assert_eq!(history.upgrade_plan(0, &UpgradeTarget::Revision(rev(B))).unwrap(), 0..2);
    assert!(history.upgrade_plan(3, &UpgradeTarget::Head).unwrap().is_empty());
    assert!(history.upgrade_plan(2, &UpgradeTarget::Revision(rev(B))).unwrap().is_empty());

    assert!(matches!(
        history.upgrade_plan(2, &UpgradeTarget::Steps(2)),
        Err(StorageError::InvalidTarget(_))
    ));
    assert!(matches!(
        history.upgrade_plan(3, &UpgradeTarget::Revision(rev(A))),
        Err(StorageError::InvalidTarget(_))
    ));
}

#[test]
fn downgrade_plans() {
    let history = chain();
    assert_eq!(history.downgrade_plan(3, &DowngradeTarget::Base).unwrap(), 0..3);
    assert_eq!(history.downgrade_plan(3, &DowngradeTarget::Steps(1)).unwrap(), 2..3);
    assert_eq!(history.downgrade_plan(3, &DowngradeTarget::Revision(rev(A))).unwrap(), 1..3);
    assert_eq!(
        history.downgrade_plan(2, &DowngradeTarget::Revision(rev(EXTERNAL))).unwrap(),
        0..2
    );
    assert!(history.downgrade_plan(0, &DowngradeTarget::Base).unwrap().is_empty());

    assert!(matches!(
        history.downgrade_plan(1, &DowngradeTarget::Steps(2)),
        Err(StorageError::InvalidTarget(_))
    ));
    assert!(matches!(
        history.downgrade_plan(1, &DowngradeTarget::Revision(rev(C))),
        Err(StorageError::InvalidTarget(_))
    ));
}
