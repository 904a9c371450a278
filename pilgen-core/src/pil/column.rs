use std::{fmt, sync::Arc};

use super::{constant_list::ConstantList, ops::Expression};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// Values supplied later by witness generation.
    Witness,
    /// Values known statically, described by a pattern.
    Fixed(ConstantList),
    /// A named alias for a derived expression.
    Intermediate(Expression),
}

impl ColumnKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Witness => "witness",
            ColumnKind::Fixed(_) => "fixed",
            ColumnKind::Intermediate(_) => "intermediate",
        }
    }
}

/// A named column of the constraint table. Columns are handed out behind an [`Arc`] so that any
/// number of expressions can reference the same one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            kind,
        })
    }

    pub fn witness(name: impl Into<String>) -> Arc<Self> {
        Self::new(name, ColumnKind::Witness)
    }

    pub fn fixed(name: impl Into<String>, values: impl Into<ConstantList>) -> Arc<Self> {
        Self::new(name, ColumnKind::Fixed(values.into()))
    }

    pub fn intermediate(name: impl Into<String>, definition: impl Into<Expression>) -> Arc<Self> {
        Self::new(name, ColumnKind::Intermediate(definition.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    pub fn definition(&self) -> Option<&Expression> {
        match &self.kind {
            ColumnKind::Intermediate(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn values(&self) -> Option<&ConstantList> {
        match &self.kind {
            ColumnKind::Fixed(values) => Some(values),
            _ => None,
        }
    }

    pub fn declaration(&self) -> String {
        self.to_string()
    }
}

/// Renders the column's declaration line, e.g. `col fixed is_last = [0]* + [1];`.
impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ColumnKind::Witness => write!(f, "col witness {};", self.name),
            ColumnKind::Fixed(values) => write!(f, "col fixed {} = {};", self.name, values),
            ColumnKind::Intermediate(definition) => {
                write!(f, "col {} = {};", self.name, definition)
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pil::ops::column_ref;

    #[test]
    fn declarations() {
        assert_eq!(Column::witness("x").declaration(), "col witness x;");
        assert_eq!(
            Column::fixed("is_last", ConstantList::repeating([0]) + vec![1]).declaration(),
            "col fixed is_last = [0]* + [1];"
        );
        let x = column_ref(&Column::witness("x"));
        let y = column_ref(&Column::witness("y"));
        assert_eq!(
            Column::intermediate("xy", x * y).declaration(),
            "col xy = (x * y);"
        );
    }

    #[test]
    fn kind_accessors() {
        let fixed = Column::fixed("f", vec![1, 2]);
        assert_eq!(fixed.kind().label(), "fixed");
        assert_eq!(fixed.values(), Some(&ConstantList::literal([1, 2])));
        assert!(fixed.definition().is_none());
        assert!(Column::witness("w").values().is_none());
    }
}
