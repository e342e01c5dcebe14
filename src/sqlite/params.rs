use rusqlite::types::Value;

use crate::error::SqlGatewayError;
use crate::types::{ParamConverter, RowValues};

/// Convert a single `RowValues` to a `rusqlite` value.
///
/// `SQLite` has no boolean, timestamp or JSON storage class, so those are stored as
/// integer, `YYYY-MM-DD HH:MM:SS[.f]` text and JSON text respectively.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Owned `SQLite` parameters, positional.
#[derive(Debug, Clone, PartialEq)]
pub struct Params(pub Vec<Value>);

impl Params {
    /// Borrow the underlying values.
    #[must_use]
    pub fn as_values(&self) -> &[Value] {
        &self.0
    }
}

impl ParamConverter<'_> for Params {
    type Converted = Params;

    fn convert_sql_params(params: &[RowValues]) -> Result<Self::Converted, SqlGatewayError> {
        Ok(Params(params.iter().map(row_value_to_sqlite_value).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::convert_params;

    #[test]
    fn converts_in_order() {
        let params = convert_params::<Params>(&[
            RowValues::Int(3),
            RowValues::Text("Kim".into()),
            RowValues::Bool(true),
            RowValues::Null,
        ])
        .unwrap();
        assert_eq!(
            params.as_values(),
            [
                Value::Integer(3),
                Value::Text("Kim".into()),
                Value::Integer(1),
                Value::Null
            ]
        );
    }
}
