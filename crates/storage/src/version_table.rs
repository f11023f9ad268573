//! Bookkeeping for the currently applied revision.
//!
//! Same layout Alembic uses, so databases already tracked by it keep working.

use discovery_tags_core::RevisionId;
use sqlx::PgConnection;

use crate::error::StorageError;

pub(crate) async fn ensure_version_table(conn: &mut PgConnection) -> Result<(), StorageError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alembic_version (
            version_num VARCHAR(32) NOT NULL,
            CONSTRAINT alembic_version_pkc PRIMARY KEY (version_num)
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Whether `alembic_version` is visible on the search path.
pub(crate) async fn version_table_exists(conn: &mut PgConnection) -> Result<bool, StorageError> {
    let found: bool = sqlx::query_scalar("SELECT to_regclass('alembic_version') IS NOT NULL")
        .fetch_one(&mut *conn)
        .await?;
    Ok(found)
}

/// Reads the recorded revision; `None` when nothing has been applied.
pub(crate) async fn read_version(
    conn: &mut PgConnection,
) -> Result<Option<RevisionId>, StorageError> {
    let rows: Vec<String> = sqlx::query_scalar("SELECT version_num FROM alembic_version")
        .fetch_all(&mut *conn)
        .await?;
    match rows.as_slice() {
        [] => Ok(None),
        [single] => RevisionId::new(single.clone())
            .map(Some)
            .map_err(|_| StorageError::UnknownRevision(single.clone())),
        many => Err(StorageError::InvalidHistory(format!(
            "{} revisions recorded in alembic_version, expected one",
            many.len()
        ))),
    }
}

/// Replaces the recorded revision; `None` clears it.
pub(crate) async fn write_version(
    conn: &mut PgConnection,
    revision: Option<&RevisionId>,
) -> Result<(), StorageError> {
    sqlx::query("DELETE FROM alembic_version").execute(&mut *conn).await?;
    if let Some(rev) = revision {
        sqlx::query("INSERT INTO alembic_version (version_num) VALUES ($1)")
            .bind(rev.as_str())
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}
