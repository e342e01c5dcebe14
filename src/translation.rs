use std::collections::BTreeMap;

use crate::error::SqlGatewayError;
use crate::types::RowValues;

/// Target placeholder style for compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    fn marker(self) -> char {
        match self {
            PlaceholderStyle::Postgres => '$',
            PlaceholderStyle::Sqlite => '?',
        }
    }
}

/// A statement rewritten to positional placeholders, ready for a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledStatement {
    pub sql: String,
    /// Values in placeholder order (`params[0]` binds `?1`/`$1`).
    pub params: Vec<RowValues>,
}

/// Rewrite `:name` placeholders into positional ones and order the bound values to match.
///
/// Placeholders inside quoted strings, quoted identifiers, comments and dollar-quoted
/// blocks are left alone, as is the Postgres `::type` cast operator. A name used twice maps
/// to the same position.
///
/// # Errors
/// Returns [`SqlGatewayError::ParameterError`] if the template names a placeholder with no
/// binding, or if a binding is never referenced by the template.
pub fn compile_named(
    template: &str,
    bindings: &BTreeMap<&str, RowValues>,
    style: PlaceholderStyle,
) -> Result<CompiledStatement, SqlGatewayError> {
    let mut sql = String::with_capacity(template.len() + 8);
    let mut order: Vec<&str> = Vec::with_capacity(bindings.len());
    let mut params = Vec::with_capacity(bindings.len());
    let mut copied = 0;

    for_each_placeholder(template, |start, end, name| {
        let position = match order.iter().position(|seen| *seen == name) {
            Some(p) => p,
            None => {
                let value = bindings.get(name).ok_or_else(|| {
                    SqlGatewayError::ParameterError(format!(
                        "placeholder :{name} has no bound value"
                    ))
                })?;
                order.push(name);
                params.push(value.clone());
                order.len() - 1
            }
        };
        sql.push_str(&template[copied..start]);
        sql.push(style.marker());
        sql.push_str(&(position + 1).to_string());
        copied = end;
        Ok(())
    })?;
    sql.push_str(&template[copied..]);

    if let Some(unused) = bindings.keys().find(|name| !order.contains(name)) {
        return Err(SqlGatewayError::ParameterError(format!(
            "bound value :{unused} is not referenced by the statement"
        )));
    }

    Ok(CompiledStatement { sql, params })
}

/// Names of the placeholders a template references, in first-use order.
#[must_use]
pub fn placeholder_names(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    // the callback never fails
    let _ = for_each_placeholder(template, |_, _, name| {
        if !names.contains(&name) {
            names.push(name);
        }
        Ok(())
    });
    names
}

/// Walk `template` and call `on_placeholder(start, end, name)` for every `:name` outside
/// literals, comments and casts. `start` is the offset of the colon, `end` one past the
/// name.
fn for_each_placeholder<'t, F>(
    template: &'t str,
    mut on_placeholder: F,
) -> Result<(), SqlGatewayError>
where
    F: FnMut(usize, usize, &'t str) -> Result<(), SqlGatewayError>,
{
    let bytes = template.as_bytes();
    let mut state = State::Normal;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                    state = State::LineComment;
                    idx += 1;
                }
                b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'$' => {
                    if let Some((tag, advance)) = try_start_dollar_quote(bytes, idx) {
                        state = State::DollarQuoted(tag);
                        idx = advance;
                    }
                }
                b':' if bytes.get(idx + 1) == Some(&b':') => {
                    // cast operator
                    idx += 1;
                }
                b':' => {
                    if let Some(end) = scan_identifier(bytes, idx + 1) {
                        on_placeholder(idx, end, &template[idx + 1..end])?;
                        idx = end;
                        continue;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if b == b'/' && bytes.get(idx + 1) == Some(&b'*') {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if b == b'*' && bytes.get(idx + 1) == Some(&b'/') {
                    if depth == 1 {
                        state = State::Normal;
                    } else {
                        state = State::BlockComment(depth - 1);
                    }
                    idx += 1;
                }
            }
            State::DollarQuoted(ref tag) => {
                if b == b'$' && matches_tag(bytes, idx, tag) {
                    idx += tag.len() + 1;
                    state = State::Normal;
                }
            }
        }
        idx += 1;
    }
    Ok(())
}

#[derive(Clone)]
enum State {
    Normal,
    SingleQuoted,
    DoubleQuoted,
    LineComment,
    BlockComment(u32),
    DollarQuoted(String),
}

/// Returns the end offset of an identifier starting at `start`, if one starts there.
fn scan_identifier(bytes: &[u8], start: usize) -> Option<usize> {
    match bytes.get(start) {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
        _ => return None,
    }
    let mut idx = start + 1;
    while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_') {
        idx += 1;
    }
    Some(idx)
}

fn try_start_dollar_quote(bytes: &[u8], start: usize) -> Option<(String, usize)> {
    let mut idx = start + 1;
    while idx < bytes.len() && bytes[idx] != b'$' {
        let b = bytes[idx];
        if !(b.is_ascii_alphanumeric() || b == b'_') {
            return None;
        }
        idx += 1;
    }

    if idx < bytes.len() && bytes[idx] == b'$' {
        let tag = String::from_utf8(bytes[start + 1..idx].to_vec()).ok()?;
        Some((tag, idx))
    } else {
        None
    }
}

fn matches_tag(bytes: &[u8], idx: usize, tag: &str) -> bool {
    let end = idx + 1 + tag.len();
    end < bytes.len()
        && bytes[idx + 1..end].starts_with(tag.as_bytes())
        && bytes.get(end) == Some(&b'$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind(pairs: &[(&'static str, RowValues)]) -> BTreeMap<&'static str, RowValues> {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn compiles_to_sqlite_positions() {
        let b = bind(&[
            ("stuNo", RowValues::Int(3)),
            ("name", RowValues::Text("Kim".into())),
        ]);
        let c = compile_named(
            "UPDATE STUDENT SET STU_NAME = :name WHERE STU_NO = :stuNo",
            &b,
            PlaceholderStyle::Sqlite,
        )
        .unwrap();
        assert_eq!(c.sql, "UPDATE STUDENT SET STU_NAME = ?1 WHERE STU_NO = ?2");
        assert_eq!(c.params, vec![RowValues::Text("Kim".into()), RowValues::Int(3)]);
    }

    #[test]
    fn compiles_to_postgres_positions_and_reuses_names() {
        let b = bind(&[("id", RowValues::Int(1))]);
        let c = compile_named(
            "SELECT * FROM t WHERE a = :id OR b = :id",
            &b,
            PlaceholderStyle::Postgres,
        )
        .unwrap();
        assert_eq!(c.sql, "SELECT * FROM t WHERE a = $1 OR b = $1");
        assert_eq!(c.params.len(), 1);
    }

    #[test]
    fn skips_literals_comments_and_casts() {
        let b = bind(&[("k", RowValues::Text("x".into()))]);
        let sql = "SELECT ':k', \":k\", CAST(1 AS TEXT)::text -- :k\n/* :k /* :k */ */ FROM t WHERE a LIKE :k ESCAPE '\\'";
        let c = compile_named(sql, &b, PlaceholderStyle::Sqlite).unwrap();
        assert_eq!(
            c.sql,
            "SELECT ':k', \":k\", CAST(1 AS TEXT)::text -- :k\n/* :k /* :k */ */ FROM t WHERE a LIKE ?1 ESCAPE '\\'"
        );
    }

    #[test]
    fn skips_dollar_quoted_blocks() {
        let b = bind(&[("a", RowValues::Int(1))]);
        let c = compile_named("$foo$ :a $foo$ = :a", &b, PlaceholderStyle::Postgres).unwrap();
        assert_eq!(c.sql, "$foo$ :a $foo$ = $1");
    }

    #[test]
    fn missing_binding_is_rejected() {
        let err = compile_named("SELECT :a", &BTreeMap::new(), PlaceholderStyle::Sqlite)
            .unwrap_err();
        assert!(matches!(err, SqlGatewayError::ParameterError(_)));
    }

    #[test]
    fn unused_binding_is_rejected() {
        let b = bind(&[("a", RowValues::Int(1)), ("b", RowValues::Int(2))]);
        let err = compile_named("SELECT :a", &b, PlaceholderStyle::Sqlite).unwrap_err();
        assert!(matches!(err, SqlGatewayError::ParameterError(_)));
    }

    #[test]
    fn lists_placeholder_names() {
        assert_eq!(
            placeholder_names("INSERT INTO t VALUES (:a, ':x', :b, :a)::int"),
            vec!["a", "b"]
        );
    }
}
