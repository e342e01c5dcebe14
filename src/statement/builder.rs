use std::collections::BTreeMap;

use crate::error::SqlGatewayError;
use crate::types::RowValues;

use super::fields::Fields;
use super::operation::{FieldKind, FieldSpec, Operation, SearchColumn};
use super::{CommitDirective, Statement};

/// Turns an operation plus caller fields into a [`Statement`].
///
/// Templates come only from the operation catalog; caller values only ever become bound
/// parameters. Column choices (the board search `option`) are resolved through an
/// allow-list and never reach the SQL text as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatementBuilder;

impl StatementBuilder {
    /// Build a statement for an operation named like `board.insert`.
    ///
    /// # Errors
    /// Returns [`SqlGatewayError::InvalidInput`] for an unknown operation, a missing or
    /// mistyped field, or a column option outside the allow-list.
    pub fn build(operation: &str, fields: &Fields) -> Result<Statement, SqlGatewayError> {
        let operation: Operation = operation.parse()?;
        Self::build_operation(operation, fields)
    }

    /// Build a statement for a known operation.
    ///
    /// # Errors
    /// See [`StatementBuilder::build`].
    pub fn build_operation(
        operation: Operation,
        fields: &Fields,
    ) -> Result<Statement, SqlGatewayError> {
        let specs = operation.fields();
        let mut template = operation.template();
        let mut bindings = BTreeMap::new();

        for spec in specs {
            let value = required_value(operation, spec, fields)?;
            match spec.kind {
                FieldKind::Identifier => {
                    let option = value.as_text().ok_or_else(|| {
                        SqlGatewayError::invalid_input(format!(
                            "{operation}: `{}` must name a column",
                            spec.name
                        ))
                    })?;
                    template = Some(SearchColumn::from_option(option)?.template());
                }
                FieldKind::Int => {
                    bindings.insert(spec.name, coerce_int(operation, spec, value)?);
                }
                FieldKind::Text => {
                    bindings.insert(spec.name, coerce_text(operation, spec, value)?);
                }
                FieldKind::Substring => {
                    let text = coerce_text(operation, spec, value)?;
                    let keyword = text.as_text().unwrap_or_default();
                    bindings.insert(
                        spec.name,
                        RowValues::Text(format!("%{}%", escape_like(keyword))),
                    );
                }
            }
        }

        for ignored in fields
            .names()
            .filter(|name| !specs.iter().any(|spec| spec.name == *name))
        {
            tracing::debug!(operation = %operation, field = ignored, "ignoring undeclared field");
        }

        let template = template.ok_or_else(|| {
            SqlGatewayError::Other(format!("{operation} has no template for these fields"))
        })?;

        let commit = if operation.is_write() {
            CommitDirective::Commit
        } else {
            CommitDirective::None
        };

        Ok(Statement {
            operation,
            template,
            bindings,
            commit,
        })
    }
}

impl Operation {
    /// Shorthand for [`StatementBuilder::build_operation`].
    ///
    /// # Errors
    /// See [`StatementBuilder::build`].
    pub fn build(self, fields: &Fields) -> Result<Statement, SqlGatewayError> {
        StatementBuilder::build_operation(self, fields)
    }
}

fn required_value<'f>(
    operation: Operation,
    spec: &FieldSpec,
    fields: &'f Fields,
) -> Result<&'f RowValues, SqlGatewayError> {
    match fields.get(spec.name) {
        None | Some(RowValues::Null) => Err(SqlGatewayError::invalid_input(format!(
            "{operation}: missing field `{}`",
            spec.name
        ))),
        Some(RowValues::Text(s)) if s.trim().is_empty() => Err(SqlGatewayError::invalid_input(
            format!("{operation}: field `{}` is empty", spec.name),
        )),
        Some(value) => Ok(value),
    }
}

fn coerce_int(
    operation: Operation,
    spec: &FieldSpec,
    value: &RowValues,
) -> Result<RowValues, SqlGatewayError> {
    match value {
        RowValues::Int(i) => Ok(RowValues::Int(*i)),
        RowValues::Text(s) => s.trim().parse::<i64>().map(RowValues::Int).map_err(|_| {
            SqlGatewayError::invalid_input(format!(
                "{operation}: field `{}` must be an integer",
                spec.name
            ))
        }),
        _ => Err(SqlGatewayError::invalid_input(format!(
            "{operation}: field `{}` must be an integer",
            spec.name
        ))),
    }
}

fn coerce_text(
    operation: Operation,
    spec: &FieldSpec,
    value: &RowValues,
) -> Result<RowValues, SqlGatewayError> {
    match value {
        RowValues::Text(s) => Ok(RowValues::Text(s.clone())),
        RowValues::Int(i) => Ok(RowValues::Text(i.to_string())),
        RowValues::Float(f) => Ok(RowValues::Text(f.to_string())),
        _ => Err(SqlGatewayError::invalid_input(format!(
            "{operation}: field `{}` must be text",
            spec.name
        ))),
    }
}

/// Escape `LIKE` metacharacters so the keyword matches literally (`ESCAPE '\'`).
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("exam"), "exam");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn reads_carry_no_commit() {
        let stmt = StatementBuilder::build("student.list", &Fields::new()).unwrap();
        assert_eq!(stmt.commit(), CommitDirective::None);
        assert!(stmt.bindings().is_empty());
    }

    #[test]
    fn writes_carry_commit() {
        let fields = Fields::new().with("stuNo", "5");
        let stmt = StatementBuilder::build("student.delete", &fields).unwrap();
        assert_eq!(stmt.commit(), CommitDirective::Commit);
        assert_eq!(stmt.binding("stuNo"), Some(&RowValues::Int(5)));
    }

    #[test]
    fn empty_required_text_is_rejected() {
        let fields = Fields::new().with("userId", "  ").with("pwd", "x");
        assert!(matches!(
            StatementBuilder::build("user.login", &fields),
            Err(SqlGatewayError::InvalidInput(_))
        ));
    }
}
