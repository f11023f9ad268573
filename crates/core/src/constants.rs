//! Shared constants for discovery-tags.
//!
//! Object names here must stay in sync with the SQL in the storage migrations.

/// Materialized view holding one row per (tag, track, owner).
pub const TAG_TRACK_USER_VIEW: &str = "tag_track_user";

/// Non-unique index on `tag_track_user (tag)`.
pub const TAG_TRACK_USER_TAG_INDEX: &str = "tag_track_user_tag_idx";

/// Unique index on `tag_track_user (tag, track_id, owner_id)`.
pub const TAG_TRACK_USER_UNIQUE_INDEX: &str = "tag_track_user_idx";

/// Separator used by the `tracks.tags` column.
pub const TAG_SEPARATOR: char = ',';

/// Maximum number of results for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 20;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 5;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;
