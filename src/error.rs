use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlGatewayError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parameter binding error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Projection error: row {row} has {actual} values but the result has {expected} columns")]
    ProjectionError {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Statement `{operation}` timed out after {millis} ms")]
    Timeout { operation: &'static str, millis: u64 },

    #[error("Commit outcome unknown for `{operation}`: {reason}")]
    AmbiguousWrite {
        operation: &'static str,
        reason: String,
    },

    #[error("Other database error: {0}")]
    Other(String),
}

/// Coarse category of a [`SqlGatewayError`], used for retry decisions and for the
/// message shown to HTTP callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed or disallowed request input. Never retried.
    InvalidInput,
    /// Failure reported by the driver or the pool.
    Database,
    /// Column/row width mismatch coming back from a driver.
    Projection,
    /// The statement did not finish within its deadline.
    Timeout,
    /// A write whose commit may or may not have happened.
    AmbiguousWrite,
    /// Configuration, binding or other internal faults.
    Internal,
}

impl SqlGatewayError {
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            #[cfg(feature = "postgres")]
            SqlGatewayError::PostgresError(_) => ErrorClass::Database,
            #[cfg(feature = "sqlite")]
            SqlGatewayError::SqliteError(_) => ErrorClass::Database,
            SqlGatewayError::ConnectionError(_) | SqlGatewayError::ExecutionError(_) => {
                ErrorClass::Database
            }
            SqlGatewayError::InvalidInput(_) => ErrorClass::InvalidInput,
            SqlGatewayError::ProjectionError { .. } => ErrorClass::Projection,
            SqlGatewayError::Timeout { .. } => ErrorClass::Timeout,
            SqlGatewayError::AmbiguousWrite { .. } => ErrorClass::AmbiguousWrite,
            SqlGatewayError::ConfigError(_)
            | SqlGatewayError::ParameterError(_)
            | SqlGatewayError::Other(_) => ErrorClass::Internal,
        }
    }

    /// Whether a read statement that failed with this error may be attempted again.
    #[must_use]
    pub fn is_retryable_read(&self) -> bool {
        matches!(self.class(), ErrorClass::Database | ErrorClass::Timeout)
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        SqlGatewayError::InvalidInput(msg.into())
    }
}

impl<E> From<bb8::RunError<E>> for SqlGatewayError
where
    E: std::fmt::Display,
{
    fn from(err: bb8::RunError<E>) -> Self {
        match err {
            bb8::RunError::User(e) => {
                SqlGatewayError::ConnectionError(format!("pool checkout error: {e}"))
            }
            bb8::RunError::TimedOut => {
                SqlGatewayError::ConnectionError("pool checkout timed out".to_string())
            }
        }
    }
}
