//! HTTP gateway over a student roster and a bulletin board.
//!
//! Every endpoint runs one fixed, parameterized statement through a pooled connection and
//! returns the rows as JSON records keyed by column name.
//!
//! ```rust,no_run
//! use sql_gateway::prelude::*;
//!
//! # async fn demo() -> Result<(), SqlGatewayError> {
//! let cap = ConfigAndPool::new_sqlite(SqliteOptions::new("school.db"), PoolOptions::default()).await?;
//! sql_gateway::schema::init_schema(&cap).await?;
//! let gateway = Gateway::new(cap, ExecutorOptions::default());
//!
//! let stmt = StatementBuilder::build("student.search", &Fields::new().with("stuNo", 1))?;
//! let records = gateway.fetch(&stmt).await?.project()?;
//! println!("{}", serde_json::to_string(&records).unwrap_or_default());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod pool;
pub mod prelude;
pub mod results;
pub mod schema;
pub mod statement;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::SqlGatewayError;
