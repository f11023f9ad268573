//! Read and refresh access to the `tag_track_user` materialized view.

use discovery_tags_core::{MAX_QUERY_LIMIT, TAG_TRACK_USER_VIEW, TagTrackUser};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::StorageError;

/// Handle on the tag search view.
///
/// PostgreSQL never updates a materialized view on its own; whoever writes to
/// `tracks` is expected to call [`TagIndex::refresh`] afterwards.
#[derive(Clone, Debug)]
pub struct TagIndex {
    pool: PgPool,
}

impl TagIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Recomputes the view from `tracks`.
    ///
    /// `concurrently` keeps the view readable during the rebuild; it relies on
    /// the unique index on (tag, track_id, owner_id).
    pub async fn refresh(&self, concurrently: bool) -> Result<(), StorageError> {
        let sql = if concurrently {
            "REFRESH MATERIALIZED VIEW CONCURRENTLY tag_track_user"
        } else {
            "REFRESH MATERIALIZED VIEW tag_track_user"
        };
        let started = std::time::Instant::now();
        sqlx::query(sql).execute(&self.pool).await?;
        tracing::info!(
            view = TAG_TRACK_USER_VIEW,
            concurrently,
            elapsed_ms = started.elapsed().as_millis(),
            "Refreshed materialized view"
        );
        Ok(())
    }

    /// Whether the view exists in the current search path.
    pub async fn exists(&self) -> Result<bool, StorageError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM pg_matviews
                WHERE matviewname = $1
                AND schemaname = ANY (current_schemas(false))
            )
            "#,
        )
        .bind(TAG_TRACK_USER_VIEW)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    /// Rows carrying exactly `tag`, ordered by track id.
    ///
    /// Tags are stored lower-cased and untrimmed, so the lookup is exact.
    pub async fn tracks_for_tag(
        &self,
        tag: &str,
        limit: usize,
    ) -> Result<Vec<TagTrackUser>, StorageError> {
        let limit = i64::try_from(limit.min(MAX_QUERY_LIMIT)).unwrap_or(i64::MAX);
        let rows = sqlx::query(
            r#"
            SELECT tag, track_id, owner_id
            FROM tag_track_user
            WHERE tag = $1
            ORDER BY track_id, owner_id
            LIMIT $2
            "#,
        )
        .bind(tag)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_tag_track_user).collect()
    }

    /// Number of rows in the current snapshot.
    pub async fn count(&self) -> Result<i64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tag_track_user")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Every row of the snapshot, sorted; meant for small tables and tests.
    pub async fn snapshot(&self) -> Result<Vec<TagTrackUser>, StorageError> {
        let rows = sqlx::query(
            "SELECT tag, track_id, owner_id FROM tag_track_user ORDER BY tag, track_id, owner_id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_tag_track_user).collect()
    }
}

fn row_to_tag_track_user(row: &PgRow) -> Result<TagTrackUser, StorageError> {
    Ok(TagTrackUser {
        tag: row.try_get("tag")?,
        track_id: row.try_get("track_id")?,
        owner_id: row.try_get("owner_id")?,
    })
}
