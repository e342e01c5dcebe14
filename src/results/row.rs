use std::sync::Arc;

use crate::types::RowValues;

/// Describes one column of a query result.
///
/// Produced by the driver for each execution; shared by every row of that result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name as reported by the driver
    pub name: String,
    /// Zero-based position within the result
    pub ordinal: usize,
}

impl ColumnDescriptor {
    #[must_use]
    pub fn new(name: impl Into<String>, ordinal: usize) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }

    /// Build descriptors from names in result order.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Arc<[ColumnDescriptor]>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .enumerate()
            .map(|(ordinal, name)| ColumnDescriptor::new(name, ordinal))
            .collect()
    }
}

/// One positional row of a query result.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRow(pub Vec<RowValues>);

impl ResultRow {
    #[must_use]
    pub fn new(values: Vec<RowValues>) -> Self {
        Self(values)
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.0.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> &[RowValues] {
        &self.0
    }
}

impl From<Vec<RowValues>> for ResultRow {
    fn from(values: Vec<RowValues>) -> Self {
        Self(values)
    }
}
