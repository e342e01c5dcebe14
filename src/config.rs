//! Command-line and environment configuration for the gateway binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::error::SqlGatewayError;
use crate::executor::ExecutorOptions;
use crate::pool::{ConfigAndPool, PoolOptions};
use crate::types::DatabaseType;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "HTTP gateway over a student roster and a bulletin board")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "SQL_GATEWAY_BIND", default_value = "127.0.0.1:3009")]
    pub bind: SocketAddr,
    /// Database backend; defaults to the first one compiled in
    #[arg(long, env = "SQL_GATEWAY_DB_TYPE", value_enum)]
    pub db_type: Option<DatabaseType>,
    /// SQLite file path, or a Postgres connection URL
    #[arg(long, env = "SQL_GATEWAY_DATABASE", default_value = "sql-gateway.db")]
    pub database: String,
    #[arg(long, env = "SQL_GATEWAY_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,
    #[arg(long, env = "SQL_GATEWAY_STATEMENT_TIMEOUT_MS", default_value_t = 10_000)]
    pub statement_timeout_ms: u64,
    #[arg(long, env = "SQL_GATEWAY_READ_RETRIES", default_value_t = 2)]
    pub read_retries: u32,
    #[arg(long, env = "SQL_GATEWAY_RETRY_BACKOFF_MS", default_value_t = 50)]
    pub retry_backoff_ms: u64,
    /// Create missing tables at startup
    #[arg(long, env = "SQL_GATEWAY_INIT_SCHEMA")]
    pub init_schema: bool,
    /// Allowed CORS origin; repeat for several. Any origin is allowed when none are given.
    #[arg(long = "cors-origin", env = "SQL_GATEWAY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
    /// Return driver error text in HTTP responses (development only)
    #[arg(long, env = "SQL_GATEWAY_VERBOSE_ERRORS")]
    pub verbose_errors: bool,
}

/// Where the data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    #[cfg(feature = "sqlite")]
    Sqlite { path: PathBuf },
    #[cfg(feature = "postgres")]
    Postgres { url: String },
}

impl BackendConfig {
    #[must_use]
    pub fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "sqlite")]
            BackendConfig::Sqlite { .. } => DatabaseType::Sqlite,
            #[cfg(feature = "postgres")]
            BackendConfig::Postgres { .. } => DatabaseType::Postgres,
        }
    }
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind: SocketAddr,
    pub backend: BackendConfig,
    pub pool: PoolOptions,
    pub executor: ExecutorOptions,
    pub init_schema: bool,
    pub cors_origins: Vec<String>,
    pub verbose_errors: bool,
}

impl GatewayConfig {
    /// Validate parsed arguments.
    ///
    /// # Errors
    /// Returns `SqlGatewayError::ConfigError` for a zero pool size or timeout, or an empty
    /// database location.
    pub fn from_args(args: Args) -> Result<Self, SqlGatewayError> {
        if args.pool_size == 0 {
            return Err(SqlGatewayError::ConfigError(
                "--pool-size must be at least 1".into(),
            ));
        }
        if args.statement_timeout_ms == 0 {
            return Err(SqlGatewayError::ConfigError(
                "--statement-timeout-ms must be positive".into(),
            ));
        }
        if args.database.trim().is_empty() {
            return Err(SqlGatewayError::ConfigError("--database is empty".into()));
        }

        let db_type = args.db_type.unwrap_or(DEFAULT_DB_TYPE);
        let backend = match db_type {
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => BackendConfig::Sqlite {
                path: PathBuf::from(args.database),
            },
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => BackendConfig::Postgres { url: args.database },
        };

        let statement_timeout = Duration::from_millis(args.statement_timeout_ms);
        Ok(GatewayConfig {
            bind: args.bind,
            backend,
            pool: PoolOptions {
                max_size: args.pool_size,
                checkout_timeout: statement_timeout,
            },
            executor: ExecutorOptions {
                statement_timeout,
                read_retries: args.read_retries,
                retry_backoff: Duration::from_millis(args.retry_backoff_ms),
            },
            init_schema: args.init_schema,
            cors_origins: args
                .cors_origins
                .into_iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            verbose_errors: args.verbose_errors,
        })
    }

    /// Build the pool for the configured backend and, if asked, bootstrap the schema.
    ///
    /// # Errors
    /// Returns `SqlGatewayError` if the pool cannot be built or the DDL fails.
    pub async fn connect(&self) -> Result<ConfigAndPool, SqlGatewayError> {
        let cap = match &self.backend {
            #[cfg(feature = "sqlite")]
            BackendConfig::Sqlite { path } => {
                ConfigAndPool::new_sqlite(crate::sqlite::SqliteOptions::new(path.clone()), self.pool)
                    .await?
            }
            #[cfg(feature = "postgres")]
            BackendConfig::Postgres { url } => ConfigAndPool::new_postgres(url, self.pool).await?,
        };
        if self.init_schema {
            crate::schema::init_schema(&cap).await?;
        }
        Ok(cap)
    }
}

#[cfg(feature = "sqlite")]
const DEFAULT_DB_TYPE: DatabaseType = DatabaseType::Sqlite;
#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
const DEFAULT_DB_TYPE: DatabaseType = DatabaseType::Postgres;
