//! Turns an ordered list of identities into a PIL document.
//!
//! The output is a function of the identity sequence and the row count alone: columns are
//! declared in the order they are first referenced across the whole program, followed by the
//! identities in input order.

use std::{collections::BTreeMap, sync::Arc};

use super::{
    column::{Column, ColumnKind},
    constant_list::ConstantList,
    identity::Identity,
    ops::Expression,
};
use crate::utils::errors::PilError;

pub const DEFAULT_NAMESPACE: &str = "Main";

/// Columns keyed by name, iterated in insertion order. The first column inserted under a name
/// wins; later insertions under that name are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSet {
    index: BTreeMap<String, usize>,
    columns: Vec<Arc<Column>>,
}

impl ColumnSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a column of the same name was already present.
    pub fn insert(&mut self, column: Arc<Column>) -> bool {
        if self.index.contains_key(column.name()) {
            return false;
        }
        self.index.insert(column.name().to_string(), self.columns.len());
        self.columns.push(column);
        true
    }

    /// Merge `other` into `self`, keeping names already present.
    pub fn merge(&mut self, other: ColumnSet) {
        for column in other.columns {
            self.insert(column);
        }
    }

    /// Record every column reachable from `expression`, in visit order.
    pub fn collect_from(&mut self, expression: &Expression) {
        expression.visit(&mut |node: &Expression| {
            if let Some(column_ref) = node.as_column() {
                self.insert(Arc::clone(column_ref.column()));
            }
        });
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Column>> {
        self.index.get(name).map(|&position| &self.columns[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<'a> IntoIterator for &'a ColumnSet {
    type Item = &'a Arc<Column>;
    type IntoIter = std::slice::Iter<'a, Arc<Column>>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// An ordered list of identities over a table of `rows` rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Program {
    namespace: String,
    rows: usize,
    identities: Vec<Identity>,
}

impl Program {
    pub fn new(identities: impl IntoIterator<Item = Identity>, rows: usize) -> Result<Self, PilError> {
        if rows == 0 {
            return Err(PilError::InvalidRowCount);
        }
        Ok(Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            rows,
            identities: identities.into_iter().collect(),
        })
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// All referenced columns, in first-seen order across the whole program.
    pub fn columns(&self) -> ColumnSet {
        let mut columns = ColumnSet::new();
        for identity in &self.identities {
            columns.merge(identity.collect_columns());
        }
        columns
    }

    /// Stricter than [`Program::assemble`]: rejects names shared by columns with different
    /// definitions, and fixed columns whose pattern cannot cover exactly `rows` rows.
    pub fn validate(&self) -> Result<(), PilError> {
        let mut seen: BTreeMap<String, Arc<Column>> = BTreeMap::new();
        for identity in &self.identities {
            for expression in identity.expressions() {
                let mut referenced = vec![];
                expression.visit(&mut |node: &Expression| {
                    if let Some(column_ref) = node.as_column() {
                        referenced.push(Arc::clone(column_ref.column()));
                    }
                });

                for column in referenced {
                    match seen.get(column.name()) {
                        Some(existing) if existing != &column => {
                            return Err(PilError::ColumnRedefinition(column.name().to_string()));
                        }
                        Some(_) => {}
                        None => {
                            seen.insert(column.name().to_string(), column);
                        }
                    }
                }
            }
        }

        for column in seen.values() {
            if let ColumnKind::Fixed(values) = column.kind() {
                check_fixed_len(column.name(), values, self.rows)?;
            }
        }
        Ok(())
    }

    #[tracing::instrument(skip_all, name = "Program::assemble")]
    pub fn assemble(&self) -> String {
        let columns = self.columns();
        tracing::debug!(
            namespace = %self.namespace,
            rows = self.rows,
            columns = columns.len(),
            identities = self.identities.len(),
            "assembling PIL"
        );

        let mut pil = format!("namespace {}({});\n", self.namespace, self.rows);
        for column in &columns {
            pil.push_str(&format!("    {column}\n"));
        }
        for identity in &self.identities {
            pil.push_str(&format!("    {identity}\n"));
        }
        pil
    }
}

fn check_fixed_len(name: &str, values: &ConstantList, rows: usize) -> Result<(), PilError> {
    let explicit = values.explicit_len();
    let repeating = values.repeating_parts();
    let mismatch = || PilError::LengthMismatch {
        name: name.to_string(),
        len: explicit,
        rows,
    };

    match repeating.as_slice() {
        [] if explicit == rows => Ok(()),
        [] => Err(mismatch()),
        [cycle] if !cycle.is_empty() && explicit <= rows => Ok(()),
        [_] => Err(mismatch()),
        _ => Err(PilError::InvalidConstantList(name.to_string())),
    }
}

/// Assemble `identities` into a PIL document for a table of `rows` rows in the default
/// namespace. No validation is performed; see [`Program::validate`].
pub fn assemble(identities: &[Identity], rows: usize) -> String {
    Program {
        namespace: DEFAULT_NAMESPACE.to_string(),
        rows,
        identities: identities.to_vec(),
    }
    .assemble()
}
