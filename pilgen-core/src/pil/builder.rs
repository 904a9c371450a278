use std::sync::Arc;

use super::{
    column::{Column, ColumnKind},
    constant_list::ConstantList,
    identity::{lookup, Identity, LookupSide},
    ops::{column_ref, Expression},
    program::{ColumnSet, Program, DEFAULT_NAMESPACE},
};
use crate::utils::errors::PilError;

/// Registers named columns and collects identities over them. Every column handed out by the
/// builder is registered under an explicit name, so the same name always resolves to the same
/// definition.
#[derive(Clone, Debug)]
pub struct CircuitBuilder {
    namespace: String,
    columns: ColumnSet,
    identities: Vec<Identity>,
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl CircuitBuilder {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            columns: ColumnSet::new(),
            identities: vec![],
        }
    }

    /// Register `name` as a column of the given kind and return a reference to it. Registering a
    /// name again with an identical definition returns the existing column.
    pub fn register(&mut self, name: impl Into<String>, kind: ColumnKind) -> Result<Expression, PilError> {
        let name = name.into();
        if let Some(existing) = self.columns.get(&name) {
            if existing.kind() != &kind {
                return Err(PilError::ColumnRedefinition(name));
            }
            return Ok(column_ref(existing));
        }

        let column = Column::new(name, kind);
        let expression = column_ref(&column);
        self.columns.insert(column);
        Ok(expression)
    }

    pub fn witness(&mut self, name: impl Into<String>) -> Result<Expression, PilError> {
        self.register(name, ColumnKind::Witness)
    }

    pub fn fixed(&mut self, name: impl Into<String>, values: impl Into<ConstantList>) -> Result<Expression, PilError> {
        self.register(name, ColumnKind::Fixed(values.into()))
    }

    pub fn intermediate(
        &mut self,
        name: impl Into<String>,
        definition: impl Into<Expression>,
    ) -> Result<Expression, PilError> {
        self.register(name, ColumnKind::Intermediate(definition.into()))
    }

    /// Register `count` witness columns named `{prefix}_0`, `{prefix}_1`, ...
    pub fn witnesses(&mut self, prefix: &str, count: usize) -> Result<Vec<Expression>, PilError> {
        (0..count)
            .map(|i| self.witness(format!("{prefix}_{i}")))
            .collect()
    }

    pub fn column(&self, name: &str) -> Option<Expression> {
        self.columns.get(name).map(column_ref)
    }

    /// Look up a registered column, requiring it to be of kind `label` (see
    /// [`ColumnKind::label`]).
    pub fn column_of_kind(&self, name: &str, label: &'static str) -> Result<Expression, PilError> {
        let column: &Arc<Column> = self.columns.get(name).ok_or_else(|| PilError::TypeMismatch {
            expected: label,
            found: format!("unregistered name `{name}`"),
        })?;
        if column.kind().label() != label {
            return Err(PilError::TypeMismatch {
                expected: label,
                found: format!("{} column `{name}`", column.kind().label()),
            });
        }
        Ok(column_ref(column))
    }

    pub fn constrain(&mut self, identity: Identity) {
        self.identities.push(identity);
    }

    /// Add the identity `lhs = rhs`.
    pub fn constrain_eq(&mut self, lhs: impl Into<Expression>, rhs: impl Into<Expression>) {
        self.constrain(Identity::polynomial(lhs, rhs));
    }

    pub fn lookup(&mut self, left: impl Into<LookupSide>, right: impl Into<LookupSide>) -> Result<(), PilError> {
        let identity = lookup(left, right)?;
        self.constrain(identity);
        Ok(())
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    pub fn build(self, rows: usize) -> Result<Program, PilError> {
        Ok(Program::new(self.identities, rows)?.with_namespace(self.namespace))
    }
}

/// A circuit definition: a name and the identities it asserts, produced eagerly and in order.
pub trait Circuit {
    fn name(&self) -> &str;

    fn identities(&self) -> Result<Vec<Identity>, PilError>;

    fn program(&self, rows: usize) -> Result<Program, PilError> {
        Program::new(self.identities()?, rows)
    }
}
