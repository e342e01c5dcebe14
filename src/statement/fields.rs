use std::collections::{BTreeMap, HashMap};

use crate::types::RowValues;

/// Caller-supplied values keyed by logical field name.
///
/// Query strings arrive as text; typed callers can insert scalars directly.
/// ```rust
/// use sql_gateway::prelude::*;
///
/// let fields = Fields::new()
///     .with("title", "Hello")
///     .with("kind", 1);
/// assert_eq!(fields.get("kind"), Some(&RowValues::Int(1)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, RowValues>);

impl Fields {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RowValues>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RowValues> {
        self.0.get(name)
    }

    /// Text value of a field, if present and textual.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RowValues::as_text)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, String>> for Fields {
    fn from(query: HashMap<String, String>) -> Self {
        query
            .into_iter()
            .map(|(k, v)| (k, RowValues::Text(v)))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
