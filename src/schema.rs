//! Bootstrap DDL for the three gateway tables.

use crate::error::SqlGatewayError;
use crate::pool::ConfigAndPool;
use crate::types::DatabaseType;

#[cfg(feature = "sqlite")]
const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS STUDENT (
    STU_NO   INTEGER PRIMARY KEY,
    STU_NAME TEXT NOT NULL,
    STU_DEPT TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS TBL_BOARD (
    BOARDNO   INTEGER PRIMARY KEY AUTOINCREMENT,
    TITLE     TEXT NOT NULL,
    CONTENTS  TEXT NOT NULL,
    USERID    TEXT NOT NULL,
    KIND      INTEGER NOT NULL,
    CNT       INTEGER NOT NULL DEFAULT 0,
    CDATETIME TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UDATETIME TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS TBL_USER (
    USERID TEXT PRIMARY KEY,
    PWD    TEXT NOT NULL
);
";

#[cfg(feature = "postgres")]
const POSTGRES_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS STUDENT (
    STU_NO   BIGINT PRIMARY KEY,
    STU_NAME TEXT NOT NULL,
    STU_DEPT TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS TBL_BOARD (
    BOARDNO   BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
    TITLE     TEXT NOT NULL,
    CONTENTS  TEXT NOT NULL,
    USERID    TEXT NOT NULL,
    KIND      BIGINT NOT NULL,
    CNT       BIGINT NOT NULL DEFAULT 0,
    CDATETIME TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UDATETIME TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS TBL_USER (
    USERID TEXT PRIMARY KEY,
    PWD    TEXT NOT NULL
);
";

/// DDL script for a backend. Safe to run repeatedly.
#[must_use]
pub fn bootstrap_sql(db_type: DatabaseType) -> &'static str {
    match db_type {
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => SQLITE_SCHEMA,
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => POSTGRES_SCHEMA,
    }
}

/// Create any missing tables.
///
/// # Errors
/// Returns `SqlGatewayError` if the DDL fails.
pub async fn init_schema(cap: &ConfigAndPool) -> Result<(), SqlGatewayError> {
    cap.execute_batch(bootstrap_sql(cap.db_type)).await?;
    tracing::info!(db_type = ?cap.db_type, "schema ready");
    Ok(())
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::pool::PoolOptions;
    use crate::sqlite::SqliteOptions;

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let cap = ConfigAndPool::new_sqlite(
            SqliteOptions::new(dir.path().join("schema.db")),
            PoolOptions::default(),
        )
        .await
        .unwrap();
        init_schema(&cap).await.unwrap();
        init_schema(&cap).await.unwrap();
    }
}
