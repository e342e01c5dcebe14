use crate::error::SqlGatewayError;
use crate::results::ResultSet;
use crate::translation::CompiledStatement;
use crate::types::convert_params;

use super::config::{SharedSqliteConnection, run_blocking};
use super::params::Params;
use super::query::build_result_set;

/// Run a SELECT on a pooled connection.
///
/// # Errors
/// Returns `SqlGatewayError` if preparation or execution fails.
pub async fn execute_select(
    conn: SharedSqliteConnection,
    compiled: CompiledStatement,
) -> Result<ResultSet, SqlGatewayError> {
    let params = convert_params::<Params>(&compiled.params)?;
    run_blocking(conn, move |guard| {
        let mut stmt = guard.prepare_cached(&compiled.sql)?;
        build_result_set(&mut stmt, params.as_values())
    })
    .await
}

/// Run one DML statement inside its own transaction and commit it.
///
/// Errors before the commit roll the transaction back and are reported as-is. A failing
/// commit is reported as [`SqlGatewayError::AmbiguousWrite`].
///
/// # Errors
/// Returns `SqlGatewayError` if the statement or the commit fails.
pub async fn execute_dml(
    conn: SharedSqliteConnection,
    operation: &'static str,
    compiled: CompiledStatement,
) -> Result<usize, SqlGatewayError> {
    let params = convert_params::<Params>(&compiled.params)?;
    run_blocking(conn, move |guard| {
        let tx = guard.transaction()?;
        let rows = {
            let mut stmt = tx.prepare_cached(&compiled.sql)?;
            stmt.execute(rusqlite::params_from_iter(params.as_values().iter()))?
        };
        tx.commit()
            .map_err(|e| SqlGatewayError::AmbiguousWrite {
                operation,
                reason: e.to_string(),
            })?;
        Ok(rows)
    })
    .await
}

/// Run a batch of statements (schema bootstrap) in one transaction.
///
/// # Errors
/// Returns `SqlGatewayError` if any statement fails.
pub async fn execute_batch(
    conn: SharedSqliteConnection,
    sql: String,
) -> Result<(), SqlGatewayError> {
    run_blocking(conn, move |guard| {
        let tx = guard.transaction()?;
        tx.execute_batch(&sql)?;
        tx.commit()?;
        Ok(())
    })
    .await
}
