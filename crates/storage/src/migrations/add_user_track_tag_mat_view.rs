//! Revision 6d1b38f242fe: `tag_track_user` materialized view for tag search.
//!
//! The view is a snapshot of `tracks`; it only changes when refreshed
//! (see [`crate::TagIndex::refresh`]).

use async_trait::async_trait;
use sqlx::{Executor, PgConnection};

use crate::error::StorageError;
use crate::migration::Migration;

pub const REVISION: &str = "6d1b38f242fe";
pub const DOWN_REVISION: &str = "47b07608863f";

pub const UPGRADE_SQL: &str = r#"
CREATE MATERIALIZED VIEW tag_track_user AS
SELECT
    UNNEST(tags) AS tag,
    track_id,
    owner_id
FROM
(
    SELECT
        string_to_array(LOWER(tracks.tags), ',') AS tags,
        track_id,
        owner_id
    FROM
        tracks
    WHERE
        tags <> ''
        AND tags IS NOT NULL
        AND is_current IS TRUE
        AND is_unlisted IS FALSE
        AND stem_of IS NULL
    ORDER BY
        updated_at DESC
) AS t
GROUP BY
    tag,
    track_id,
    owner_id;

CREATE INDEX tag_track_user_tag_idx ON tag_track_user (tag);
CREATE UNIQUE INDEX tag_track_user_idx ON tag_track_user (tag, track_id, owner_id);
"#;

// The view drop has no IF EXISTS: a missing view is reported, missing indexes are not.
pub const DOWNGRADE_SQL: &str = r#"
DROP INDEX IF EXISTS tag_track_user_tag_idx;
DROP INDEX IF EXISTS tag_track_user_idx;
DROP MATERIALIZED VIEW tag_track_user;
"#;

pub struct AddUserTrackTagMatView;

#[async_trait]
impl Migration for AddUserTrackTagMatView {
    fn revision(&self) -> &'static str {
        REVISION
    }

    fn down_revision(&self) -> Option<&'static str> {
        Some(DOWN_REVISION)
    }

    fn message(&self) -> &'static str {
        "add user track tag mat view"
    }

    async fn upgrade(&self, conn: &mut PgConnection) -> Result<(), StorageError> {
        conn.execute(sqlx::raw_sql(UPGRADE_SQL)).await?;
        Ok(())
    }

    async fn downgrade(&self, conn: &mut PgConnection) -> Result<(), StorageError> {
        conn.execute(sqlx::raw_sql(DOWNGRADE_SQL)).await?;
        Ok(())
    }
}
