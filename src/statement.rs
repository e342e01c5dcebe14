//! Fixed, parameterized statements built from caller input.

use std::collections::BTreeMap;

use crate::error::SqlGatewayError;
use crate::translation::{CompiledStatement, PlaceholderStyle, compile_named, placeholder_names};
use crate::types::RowValues;

pub mod builder;
pub mod fields;
pub mod operation;

pub use builder::StatementBuilder;
pub use fields::Fields;
pub use operation::{FieldKind, FieldSpec, Operation, SearchColumn, StatementKind};

/// Whether the executor must commit right after running the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitDirective {
    /// Read-only; nothing to commit.
    None,
    /// Commit immediately after a successful execution.
    Commit,
}

/// A catalog template with named placeholders plus the values bound to them.
///
/// Only [`StatementBuilder`] creates these, so the template is always one of the fixed
/// catalog strings and every caller value sits in `bindings`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub(crate) operation: Operation,
    pub(crate) template: &'static str,
    pub(crate) bindings: BTreeMap<&'static str, RowValues>,
    pub(crate) commit: CommitDirective,
}

impl Statement {
    #[must_use]
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// The SQL text with `:name` placeholders, exactly as it will be prepared.
    #[must_use]
    pub fn template(&self) -> &'static str {
        self.template
    }

    #[must_use]
    pub fn bindings(&self) -> &BTreeMap<&'static str, RowValues> {
        &self.bindings
    }

    #[must_use]
    pub fn binding(&self, name: &str) -> Option<&RowValues> {
        self.bindings.get(name)
    }

    #[must_use]
    pub fn commit(&self) -> CommitDirective {
        self.commit
    }

    #[must_use]
    pub fn kind(&self) -> StatementKind {
        self.operation.kind()
    }

    #[must_use]
    pub fn is_write(&self) -> bool {
        self.operation.is_write()
    }

    /// Placeholder names in the template, in first-use order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'static str> {
        placeholder_names(self.template)
    }

    /// Rewrite to the backend's positional placeholder style.
    ///
    /// # Errors
    /// Returns [`SqlGatewayError::ParameterError`] if template and bindings disagree.
    pub fn compile(&self, style: PlaceholderStyle) -> Result<CompiledStatement, SqlGatewayError> {
        compile_named(self.template, &self.bindings, style)
    }
}
