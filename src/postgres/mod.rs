//! PostgreSQL backend over `tokio-postgres` and a bb8 pool.

pub mod config;
pub mod executor;
pub mod params;
pub mod query;

pub use config::PgManager;
pub use executor::{execute_batch, execute_dml, execute_select};
pub use params::Params;
pub use query::build_result_set;
