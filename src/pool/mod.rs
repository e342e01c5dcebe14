pub mod types;

pub use types::{MiddlewarePool, PoolStatus, PooledConnection};

use std::time::Duration;

use crate::error::SqlGatewayError;
use crate::results::ResultSet;
use crate::translation::{CompiledStatement, PlaceholderStyle};
use crate::types::DatabaseType;

/// Sizing for a backend pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    pub max_size: u32,
    /// How long a request waits for a free connection.
    pub checkout_timeout: Duration,
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            max_size: 8,
            checkout_timeout: Duration::from_secs(5),
        }
    }
}

/// Configuration and connection pool for a database
///
/// Built once at startup by `new_sqlite` / `new_postgres` and shared by every request.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: MiddlewarePool,
    /// The database type
    pub db_type: DatabaseType,
}

impl ConfigAndPool {
    /// Positional placeholder style the backend's driver expects.
    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self.db_type {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => PlaceholderStyle::Postgres,
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => PlaceholderStyle::Sqlite,
        }
    }

    #[must_use]
    pub fn status(&self) -> PoolStatus {
        self.pool.status()
    }

    /// Check out a connection and run `SELECT 1` on it.
    ///
    /// # Errors
    /// Returns `SqlGatewayError` if no connection can be checked out or the probe fails.
    pub async fn ping(&self) -> Result<(), SqlGatewayError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                let conn = pool.get_owned().await?;
                crate::sqlite::config::run_blocking(std::sync::Arc::clone(&*conn), |guard| {
                    guard
                        .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                        .map(|_| ())
                        .map_err(SqlGatewayError::SqliteError)
                })
                .await
            }
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => {
                let client = pool.get_owned().await?;
                client.simple_query("SELECT 1").await?;
                Ok(())
            }
        }
    }

    /// Check out a connection and run a read.
    ///
    /// # Errors
    /// Returns `SqlGatewayError` on checkout or execution failure.
    pub async fn select(&self, compiled: &CompiledStatement) -> Result<ResultSet, SqlGatewayError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                let conn = pool.get_owned().await?;
                crate::sqlite::execute_select(std::sync::Arc::clone(&*conn), compiled.clone())
                    .await
            }
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => {
                let client = pool.get_owned().await?;
                crate::postgres::execute_select(&client, compiled).await
            }
        }
    }

    /// Wait for a free connection, bounded by the pool's checkout timeout.
    ///
    /// # Errors
    /// Returns `SqlGatewayError::ConnectionError` if no connection frees up in time or a new
    /// one cannot be opened.
    pub async fn checkout(&self) -> Result<PooledConnection, SqlGatewayError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => Ok(PooledConnection::Sqlite(pool.get_owned().await?)),
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => {
                Ok(PooledConnection::Postgres(pool.get_owned().await?))
            }
        }
    }

    /// Check out a connection and run a committed write; returns rows affected.
    ///
    /// # Errors
    /// See [`ConfigAndPool::checkout`] and [`PooledConnection::dml`].
    pub async fn dml(
        &self,
        operation: &'static str,
        compiled: &CompiledStatement,
    ) -> Result<usize, SqlGatewayError> {
        self.checkout().await?.dml(operation, compiled).await
    }

    /// Run a multi-statement script without parameters.
    ///
    /// # Errors
    /// Returns `SqlGatewayError` on checkout or execution failure.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlGatewayError> {
        match &self.pool {
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => {
                let conn = pool.get_owned().await?;
                crate::sqlite::execute_batch(std::sync::Arc::clone(&*conn), sql.to_owned()).await
            }
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => {
                let mut client = pool.get_owned().await?;
                crate::postgres::execute_batch(&mut client, sql).await
            }
        }
    }
}

impl PooledConnection {
    /// Run a committed write on this connection; returns rows affected.
    ///
    /// # Errors
    /// Returns `SqlGatewayError` on execution failure, and
    /// [`SqlGatewayError::AmbiguousWrite`] when the commit itself fails.
    pub async fn dml(
        &mut self,
        operation: &'static str,
        compiled: &CompiledStatement,
    ) -> Result<usize, SqlGatewayError> {
        match self {
            #[cfg(feature = "sqlite")]
            PooledConnection::Sqlite(conn) => {
                crate::sqlite::execute_dml(
                    std::sync::Arc::clone(&**conn),
                    operation,
                    compiled.clone(),
                )
                .await
            }
            #[cfg(feature = "postgres")]
            PooledConnection::Postgres(client) => {
                crate::postgres::execute_dml(client, operation, compiled).await
            }
        }
    }
}
