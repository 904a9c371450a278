use std::fmt;

use super::{ops::Expression, program::ColumnSet};
use crate::utils::errors::PilError;

/// One side of a lookup: an optional selector and the tuple it guards. Without a selector every
/// row takes part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupSide {
    pub selector: Option<Expression>,
    pub tuple: Vec<Expression>,
}

impl LookupSide {
    pub fn new(selector: Option<Expression>, tuple: Vec<Expression>) -> Self {
        Self { selector, tuple }
    }
}

impl<T: Into<Expression>> From<Vec<T>> for LookupSide {
    fn from(tuple: Vec<T>) -> Self {
        Self::new(None, tuple.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<Expression>, T: Into<Expression>> From<(S, Vec<T>)> for LookupSide {
    fn from((selector, tuple): (S, Vec<T>)) -> Self {
        Self::new(
            Some(selector.into()),
            tuple.into_iter().map(Into::into).collect(),
        )
    }
}

impl fmt::Display for LookupSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(selector) = &self.selector {
            write!(f, "{selector} ")?;
        }
        write!(f, "{{ ")?;
        for (index, expression) in self.tuple.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{expression}")?;
        }
        write!(f, " }}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// `lhs - rhs` vanishes on every row.
    Polynomial { lhs: Expression, rhs: Expression },
    /// Wherever the left selector is nonzero, the left tuple is a row of the table formed by the
    /// right tuple on the rows its selector picks.
    Lookup { left: LookupSide, right: LookupSide },
}

impl Identity {
    pub fn polynomial(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Self {
        Identity::Polynomial {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// The expressions this identity reads, in collection order: for a lookup both selectors
    /// come first, then the left tuple, then the right tuple.
    pub fn expressions(&self) -> Vec<&Expression> {
        match self {
            Identity::Polynomial { lhs, rhs } => vec![lhs, rhs],
            Identity::Lookup { left, right } => left
                .selector
                .iter()
                .chain(right.selector.iter())
                .chain(left.tuple.iter())
                .chain(right.tuple.iter())
                .collect(),
        }
    }

    /// Every column this identity references, first occurrence first.
    pub fn collect_columns(&self) -> ColumnSet {
        let mut columns = ColumnSet::new();
        for expression in self.expressions() {
            columns.collect_from(expression);
        }
        columns
    }
}

/// Build a lookup identity. Each side is either a bare tuple or a `(selector, tuple)` pair.
pub fn lookup(left: impl Into<LookupSide>, right: impl Into<LookupSide>) -> Result<Identity, PilError> {
    let left = left.into();
    let right = right.into();

    if left.tuple.is_empty() || right.tuple.is_empty() {
        return Err(PilError::InvalidCombinator(
            "lookup tuples must not be empty".to_string(),
        ));
    }
    if left.tuple.len() != right.tuple.len() {
        return Err(PilError::InvalidCombinator(format!(
            "left tuple has {} elements but right tuple has {}",
            left.tuple.len(),
            right.tuple.len()
        )));
    }

    Ok(Identity::Lookup { left, right })
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Polynomial { lhs, rhs } => write!(f, "{lhs} = {rhs};"),
            Identity::Lookup { left, right } => write!(f, "{left} in {right};"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pil::{column::Column, ops::column_ref};

    fn witness(name: &str) -> Expression {
        column_ref(&Column::witness(name))
    }

    #[test]
    fn polynomial_identity() {
        let x = witness("x");
        let y = witness("y");
        let identity = (1 - &x).equals(y.next().unwrap());
        assert_eq!(identity.to_string(), "(1 - x) = y';");
        assert_eq!(identity.collect_columns().names(), vec!["x", "y"]);
    }

    #[test]
    fn polynomial_identity_first_occurrence_wins() {
        let x = witness("x");
        let x_next = x.next().unwrap();
        let identity = Identity::polynomial(&x_next * &x, witness("y") + x);
        let columns = identity.collect_columns();
        assert_eq!(columns.names(), vec!["x", "y"]);
    }

    #[test]
    fn lookup_with_right_selector() {
        let [a, b, sel, c, d] = ["a", "b", "sel", "c", "d"].map(witness);
        let identity = lookup(vec![a, b], (sel, vec![c, d])).unwrap();
        assert_eq!(identity.to_string(), "{ a, b } in sel { c, d };");
        assert_eq!(
            identity.collect_columns().names(),
            vec!["sel", "a", "b", "c", "d"]
        );
    }

    #[test]
    fn lookup_collects_selectors_first() {
        let [a, s, t, c] = ["a", "s", "t", "c"].map(witness);
        let identity = lookup((s, vec![a]), (t, vec![c])).unwrap();
        assert_eq!(identity.to_string(), "s { a } in t { c };");
        assert_eq!(identity.collect_columns().names(), vec!["s", "t", "a", "c"]);
    }

    #[test]
    fn lookup_rejects_malformed_tuples() {
        let a = witness("a");
        let b = witness("b");
        assert!(matches!(
            lookup(vec![a.clone(), b.clone()], vec![a.clone()]),
            Err(PilError::InvalidCombinator(_))
        ));
        assert!(matches!(
            lookup(Vec::<Expression>::new(), Vec::<Expression>::new()),
            Err(PilError::InvalidCombinator(_))
        ));
        assert!(lookup(vec![a], vec![b]).is_ok());
    }
}
