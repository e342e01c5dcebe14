//! Convenient imports for common functionality.

pub use crate::config::{Args, BackendConfig, GatewayConfig};
pub use crate::error::{ErrorClass, SqlGatewayError};
pub use crate::executor::{ExecutorOptions, Gateway, Outcome};
pub use crate::pool::{ConfigAndPool, MiddlewarePool, PoolOptions, PooledConnection};
pub use crate::results::{ColumnDescriptor, ProjectedRecord, ResultRow, ResultSet, project};
pub use crate::statement::{
    CommitDirective, Fields, Operation, SearchColumn, Statement, StatementBuilder, StatementKind,
};
pub use crate::translation::{CompiledStatement, PlaceholderStyle, compile_named};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;
