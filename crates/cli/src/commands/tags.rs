//! Commands that work with the `tag_track_user` view itself.

use anyhow::Result;
use discovery_tags_core::split_tags;
use discovery_tags_storage::TagIndex;

use crate::get_pool;

pub(crate) async fn run_refresh(concurrently: bool) -> Result<()> {
    let index = TagIndex::new(get_pool().await?);
    if !index.exists().await? {
        anyhow::bail!("tag_track_user does not exist; run `discovery-tags upgrade` first");
    }
    index.refresh(concurrently).await?;
    println!("Refreshed tag_track_user ({} rows).", index.count().await?);
    Ok(())
}

pub(crate) async fn run_search(tag: &str, limit: usize) -> Result<()> {
    let index = TagIndex::new(get_pool().await?);
    // Stored tags are lower-cased; whitespace is significant and left alone.
    // Non-ASCII folding may differ from the database's collation-aware LOWER.
    let rows = index.tracks_for_tag(&tag.to_lowercase(), limit).await?;
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}

pub(crate) fn run_split(raw: &str) -> Result<()> {
    println!("{}", serde_json::to_string(&split_tags(raw))?);
    Ok(())
}
