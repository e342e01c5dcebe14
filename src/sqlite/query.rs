use rusqlite::types::Value;
use rusqlite::{Statement, params_from_iter};

use crate::error::SqlGatewayError;
use crate::results::{ColumnDescriptor, ResultSet};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `SqlGatewayError::SqliteError` if the column cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlGatewayError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Run a prepared query and collect every row.
///
/// Column descriptors are taken from the prepared statement, so they are present even when
/// no rows come back.
///
/// # Errors
/// Returns `SqlGatewayError::SqliteError` if execution or extraction fails.
pub fn build_result_set(
    stmt: &mut Statement<'_>,
    params: &[Value],
) -> Result<ResultSet, SqlGatewayError> {
    let columns = ColumnDescriptor::from_names(stmt.column_names());
    let col_count = columns.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_columns(columns);

    let mut rows = stmt.query(params_from_iter(params.iter()))?;
    while let Some(row) = rows.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
