//! Revision bookkeeping commands: `current`, `history`, `upgrade`, `downgrade`.

use anyhow::Result;
use discovery_tags_core::{DowngradeTarget, UpgradeTarget};
use discovery_tags_storage::{MigrationHistory, Migrator};

use crate::get_pool;

async fn migrator() -> Result<Migrator> {
    let pool = get_pool().await?;
    Ok(Migrator::new(pool, MigrationHistory::registered()?))
}

pub(crate) async fn run_current() -> Result<()> {
    let migrator = migrator().await?;
    match migrator.current().await? {
        Some(rev) => {
            let at_head = migrator.history().head().is_some_and(|head| head.revision == rev);
            println!("{rev}{}", if at_head { " (head)" } else { "" });
        },
        None => println!("<none>"),
    }
    Ok(())
}

pub(crate) fn run_history() -> Result<()> {
    let history = MigrationHistory::registered()?;
    let head = history.head().map(|e| e.revision.clone());
    for entry in history.iter() {
        let parent =
            entry.down_revision.as_ref().map_or_else(|| "<base>".to_owned(), ToString::to_string);
        let marker = if Some(&entry.revision) == head.as_ref() { " (head)" } else { "" };
        println!("{parent} -> {}{marker}, {}", entry.revision, entry.migration.message());
    }
    Ok(())
}

pub(crate) async fn run_upgrade(target: &UpgradeTarget) -> Result<()> {
    let applied = migrator().await?.upgrade(target).await?;
    if applied.is_empty() {
        println!("Already at {target}.");
    }
    for rev in &applied {
        println!("Applied {rev}");
    }
    Ok(())
}

pub(crate) async fn run_downgrade(target: &DowngradeTarget) -> Result<()> {
    let reverted = migrator().await?.downgrade(target).await?;
    if reverted.is_empty() {
        println!("Nothing to revert for {target}.");
    }
    for rev in &reverted {
        println!("Reverted {rev}");
    }
    Ok(())
}
