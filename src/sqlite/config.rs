use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bb8::{ManageConnection, Pool};
use tokio::sync::Mutex;

use crate::error::SqlGatewayError;
use crate::pool::{ConfigAndPool, MiddlewarePool, PoolOptions};
use crate::types::DatabaseType;

/// A `rusqlite` connection shared between the async side and the blocking thread that drives it.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// Options for opening a `SQLite` database file.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub path: PathBuf,
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout: Duration::from_secs(5),
        }
    }
}

/// bb8 manager that opens `SQLite` connections in WAL mode.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    opts: SqliteOptions,
}

impl SqliteManager {
    #[must_use]
    pub fn new(opts: SqliteOptions) -> Self {
        Self { opts }
    }

    fn open(opts: &SqliteOptions) -> Result<rusqlite::Connection, rusqlite::Error> {
        let conn = rusqlite::Connection::open(&opts.path)?;
        conn.busy_timeout(opts.busy_timeout)?;
        conn.execute_batch("PRAGMA journal_mode = WAL; PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = SqlGatewayError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let opts = self.opts.clone();
        async move {
            let conn = tokio::task::spawn_blocking(move || Self::open(&opts))
                .await
                .map_err(|e| {
                    SqlGatewayError::ConnectionError(format!("sqlite open join error: {e}"))
                })??;
            tracing::debug!("opened sqlite connection");
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            run_blocking(handle, |guard| {
                guard
                    .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                    .map(|_| ())
                    .map_err(SqlGatewayError::SqliteError)
            })
            .await
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

impl ConfigAndPool {
    /// Open (or create) a `SQLite` database and build a pool over it.
    ///
    /// One connection is checked out and validated before returning.
    ///
    /// # Errors
    /// Returns `SqlGatewayError::ConnectionError` if the pool cannot be built or the first
    /// connection fails.
    pub async fn new_sqlite(
        opts: SqliteOptions,
        pool_opts: PoolOptions,
    ) -> Result<Self, SqlGatewayError> {
        let path = opts.path.display().to_string();
        let pool = Pool::builder()
            .max_size(pool_opts.max_size)
            .connection_timeout(pool_opts.checkout_timeout)
            .build(SqliteManager::new(opts))
            .await
            .map_err(|e| {
                SqlGatewayError::ConnectionError(format!("failed to create sqlite pool: {e}"))
            })?;

        let cap = ConfigAndPool {
            pool: MiddlewarePool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
        };
        cap.ping().await?;

        tracing::info!(path = %path, max_size = pool_opts.max_size, "sqlite pool ready");
        Ok(cap)
    }
}

/// Run synchronous `rusqlite` work on the blocking pool.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, SqlGatewayError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlGatewayError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlGatewayError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
