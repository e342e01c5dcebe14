use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::SqlGatewayError;
use crate::types::RowValues;

use super::row::{ColumnDescriptor, ResultRow};

/// A row re-keyed by column name.
///
/// Keys keep the order of the column descriptors they came from, and serialize as a JSON
/// object in that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedRecord {
    fields: Vec<(String, RowValues)>,
}

impl ProjectedRecord {
    /// Get a value by column name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in record order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl Serialize for ProjectedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Where each column lands in a projected record.
///
/// Computed once per result so duplicate names are resolved a single time rather than per
/// row. `slots[i]` is the record position column `i` writes to.
#[derive(Debug, Clone)]
struct ProjectionLayout {
    keys: Vec<String>,
    slots: Vec<usize>,
}

impl ProjectionLayout {
    fn new(columns: &[ColumnDescriptor]) -> Self {
        let mut keys: Vec<String> = Vec::with_capacity(columns.len());
        let mut slots = Vec::with_capacity(columns.len());
        for column in columns {
            match keys.iter().position(|key| *key == column.name) {
                Some(existing) => slots.push(existing),
                None => {
                    slots.push(keys.len());
                    keys.push(column.name.clone());
                }
            }
        }
        Self { keys, slots }
    }

    fn apply(&self, row: &ResultRow) -> ProjectedRecord {
        let mut values = vec![RowValues::Null; self.keys.len()];
        // later columns overwrite earlier ones that share a slot
        for (value, &slot) in row.values().iter().zip(&self.slots) {
            values[slot] = value.clone();
        }
        ProjectedRecord {
            fields: self.keys.iter().cloned().zip(values).collect(),
        }
    }
}

/// Re-key positional rows by column name.
///
/// For every row, `columns[i].name` is paired with `row[i]`; output order follows input row
/// order. The function is pure: inputs are only borrowed and the same input always yields
/// the same output.
///
/// Duplicate column names: the **last** value for a name wins, and the key keeps the
/// position of its first occurrence. `SELECT a, b, a` therefore projects to `{a, b}` with
/// `a` taken from the third column.
///
/// # Errors
/// Returns [`SqlGatewayError::ProjectionError`] when a row's width differs from the number
/// of columns. Nothing is projected in that case.
pub fn project(
    columns: &[ColumnDescriptor],
    rows: &[ResultRow],
) -> Result<Vec<ProjectedRecord>, SqlGatewayError> {
    if let Some((row, bad)) = rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != columns.len())
    {
        return Err(SqlGatewayError::ProjectionError {
            row,
            expected: columns.len(),
            actual: bad.len(),
        });
    }

    let layout = ProjectionLayout::new(columns);
    Ok(rows.iter().map(|row| layout.apply(row)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cols(names: &[&str]) -> Vec<ColumnDescriptor> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ColumnDescriptor::new(*n, i))
            .collect()
    }

    fn row(values: Vec<RowValues>) -> ResultRow {
        ResultRow::new(values)
    }

    #[test]
    fn student_rows_project_by_name() {
        let columns = cols(&["STU_NO", "STU_NAME"]);
        let rows = vec![
            row(vec![RowValues::Int(1), RowValues::Text("Kim".into())]),
            row(vec![RowValues::Int(2), RowValues::Text("Lee".into())]),
        ];
        let records = project(&columns, &rows).unwrap();
        assert_eq!(
            serde_json::to_value(&records).unwrap(),
            json!([
                {"STU_NO": 1, "STU_NAME": "Kim"},
                {"STU_NO": 2, "STU_NAME": "Lee"}
            ])
        );
    }

    #[test]
    fn every_cell_lands_under_its_column() {
        let columns = cols(&["A", "B", "C"]);
        let rows: Vec<ResultRow> = (0..5)
            .map(|i| {
                row(vec![
                    RowValues::Int(i),
                    RowValues::Text(format!("t{i}")),
                    RowValues::Bool(i % 2 == 0),
                ])
            })
            .collect();
        let records = project(&columns, &rows).unwrap();
        assert_eq!(records.len(), rows.len());
        for (record, source) in records.iter().zip(&rows) {
            for (i, column) in columns.iter().enumerate() {
                assert_eq!(record.get(&column.name), source.get_by_index(i));
            }
        }
    }

    #[test]
    fn projection_is_repeatable() {
        let columns = cols(&["X"]);
        let rows = vec![row(vec![RowValues::Float(2.5)])];
        assert_eq!(
            project(&columns, &rows).unwrap(),
            project(&columns, &rows).unwrap()
        );
    }

    #[test]
    fn empty_inputs() {
        assert!(project(&[], &[]).unwrap().is_empty());
        assert!(project(&cols(&["A", "B"]), &[]).unwrap().is_empty());

        let records = project(&[], &[row(vec![]), row(vec![])]).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(ProjectedRecord::is_empty));
    }

    #[test]
    fn duplicate_names_keep_last_value_first_position() {
        let columns = cols(&["ID", "NAME", "ID"]);
        let rows = vec![row(vec![
            RowValues::Int(1),
            RowValues::Text("Kim".into()),
            RowValues::Int(99),
        ])];
        let records = project(&columns, &rows).unwrap();
        let record = &records[0];
        assert_eq!(record.len(), 2);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["ID", "NAME"]);
        assert_eq!(record.get("ID"), Some(&RowValues::Int(99)));
    }

    #[test]
    fn width_mismatch_fails_without_output() {
        let columns = cols(&["A", "B"]);
        let rows = vec![
            row(vec![RowValues::Int(1), RowValues::Int(2)]),
            row(vec![RowValues::Int(3)]),
        ];
        match project(&columns, &rows) {
            Err(SqlGatewayError::ProjectionError {
                row,
                expected,
                actual,
            }) => {
                assert_eq!((row, expected, actual), (1, 2, 1));
            }
            other => panic!("expected projection error, got {other:?}"),
        }

        let too_wide = vec![row(vec![RowValues::Int(1), RowValues::Int(2), RowValues::Null])];
        assert!(project(&columns, &too_wide).is_err());
    }

    #[test]
    fn record_serializes_in_column_order() {
        let columns = cols(&["Z", "A", "M"]);
        let rows = vec![row(vec![RowValues::Int(1), RowValues::Int(2), RowValues::Int(3)])];
        let records = project(&columns, &rows).unwrap();
        let text = serde_json::to_string(&records[0]).unwrap();
        assert_eq!(text, r#"{"Z":1,"A":2,"M":3}"#);
    }
}
