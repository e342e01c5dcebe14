//! SQLite backend: a bb8 pool of mutex-guarded `rusqlite` connections.
//!
//! - config: connection manager and pool setup
//! - params: `RowValues` to `rusqlite` values
//! - query: result extraction
//! - executor: reads, committed writes and batches

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::{SharedSqliteConnection, SqliteManager, SqliteOptions};
pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::build_result_set;
