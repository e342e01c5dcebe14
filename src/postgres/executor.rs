use bb8::PooledConnection;

use crate::error::SqlGatewayError;
use crate::results::ResultSet;
use crate::translation::CompiledStatement;
use crate::types::convert_params;

use super::config::PgManager;
use super::params::Params;
use super::query::build_result_set;

/// Run a SELECT on a pooled client.
///
/// # Errors
/// Returns `SqlGatewayError` if preparation or execution fails.
pub async fn execute_select(
    client: &PooledConnection<'static, PgManager>,
    compiled: &CompiledStatement,
) -> Result<ResultSet, SqlGatewayError> {
    let params = convert_params::<Params>(&compiled.params)?;
    let stmt = client.prepare(&compiled.sql).await?;
    let rows = client.query(&stmt, params.as_refs()).await?;
    build_result_set(&stmt, &rows)
}

/// Run one DML statement inside its own transaction and commit it.
///
/// A failing commit is reported as [`SqlGatewayError::AmbiguousWrite`]; earlier errors roll
/// back when the transaction is dropped.
///
/// # Errors
/// Returns `SqlGatewayError` if the statement or the commit fails.
pub async fn execute_dml(
    client: &mut PooledConnection<'static, PgManager>,
    operation: &'static str,
    compiled: &CompiledStatement,
) -> Result<usize, SqlGatewayError> {
    let params = convert_params::<Params>(&compiled.params)?;
    let tx = client.transaction().await?;
    let stmt = tx.prepare(&compiled.sql).await?;
    let rows = tx.execute(&stmt, params.as_refs()).await?;
    tx.commit()
        .await
        .map_err(|e| SqlGatewayError::AmbiguousWrite {
            operation,
            reason: e.to_string(),
        })?;
    usize::try_from(rows)
        .map_err(|e| SqlGatewayError::ExecutionError(format!("row count out of range: {e}")))
}

/// Run a batch of statements (schema bootstrap) in one transaction.
///
/// # Errors
/// Returns `SqlGatewayError` if any statement fails.
pub async fn execute_batch(
    client: &mut PooledConnection<'static, PgManager>,
    sql: &str,
) -> Result<(), SqlGatewayError> {
    let tx = client.transaction().await?;
    tx.batch_execute(sql).await?;
    tx.commit().await?;
    Ok(())
}
