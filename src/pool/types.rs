#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;

/// Connection pool for database access
///
/// This enum wraps the bb8 pool of each supported database engine.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(bb8::Pool<PgManager>),
    /// `SQLite` connection pool
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
}

/// A connection checked out of a [`MiddlewarePool`]; returned to the pool on drop.
pub enum PooledConnection {
    #[cfg(feature = "postgres")]
    Postgres(bb8::PooledConnection<'static, PgManager>),
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::PooledConnection<'static, SqliteManager>),
}

impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => f.write_str("PooledConnection::Postgres"),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => f.write_str("PooledConnection::Sqlite"),
        }
    }
}

/// Snapshot of pool occupancy, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatus {
    pub connections: u32,
    pub idle_connections: u32,
}

impl MiddlewarePool {
    #[must_use]
    pub fn status(&self) -> PoolStatus {
        let state = match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => pool.state(),
            #[cfg(feature = "sqlite")]
            Self::Sqlite(pool) => pool.state(),
        };
        PoolStatus {
            connections: state.connections,
            idle_connections: state.idle_connections,
        }
    }
}

impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "Postgres",
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => "Sqlite",
        };
        f.debug_tuple(name).field(&self.status()).finish()
    }
}
