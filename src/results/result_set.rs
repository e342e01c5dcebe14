use std::sync::Arc;

use crate::error::SqlGatewayError;
use crate::types::RowValues;

use super::projection::{ProjectedRecord, project};
use super::row::{ColumnDescriptor, ResultRow};

/// A result set from a database query
///
/// Column descriptors are shared by all rows; rows stay positional until projected.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub rows: Vec<ResultRow>,
    /// The number of rows affected (for DML statements) or returned (for SELECT)
    pub rows_affected: usize,
    columns: Arc<[ColumnDescriptor]>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            columns: Arc::from(Vec::new()),
        }
    }

    /// Set the column descriptors for this result set (shared by all rows)
    pub fn set_columns(&mut self, columns: Arc<[ColumnDescriptor]>) {
        self.columns = columns;
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Column names in result order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Add a row to the result set
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.rows.push(ResultRow::new(row_values));
        self.rows_affected += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a single cell by row index and column name.
    #[must_use]
    pub fn get(&self, row: usize, column_name: &str) -> Option<&RowValues> {
        let idx = self.columns.iter().position(|c| c.name == column_name)?;
        self.rows.get(row)?.get_by_index(idx)
    }

    /// Project every row into a name-keyed record. See [`project`].
    ///
    /// # Errors
    /// Returns [`SqlGatewayError::ProjectionError`] when a row is narrower or wider than the
    /// column list.
    pub fn project(&self) -> Result<Vec<ProjectedRecord>, SqlGatewayError> {
        project(&self.columns, &self.rows)
    }

    /// Consume the result set and project it.
    ///
    /// # Errors
    /// See [`ResultSet::project`].
    pub fn into_records(self) -> Result<Vec<ProjectedRecord>, SqlGatewayError> {
        self.project()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_and_looks_up() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_columns(ColumnDescriptor::from_names(["STU_NO", "STU_NAME"]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("Kim".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("Lee".into())]);

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.rows_affected, 2);
        assert_eq!(rs.get(1, "STU_NAME").and_then(RowValues::as_text), Some("Lee"));
        assert!(rs.get(0, "MISSING").is_none());
        assert_eq!(rs.column_names().collect::<Vec<_>>(), ["STU_NO", "STU_NAME"]);

        let records = rs.project().unwrap();
        assert_eq!(records[0].get("STU_NO"), Some(&RowValues::Int(1)));
    }
}
