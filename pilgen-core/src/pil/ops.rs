//! Defines the Expression tree and the arithmetic used to build it.
//! An Expression is an immutable tree of literals, column references and binary combinators.
//! Columns are shared between trees by reference and identified by name.

use std::{fmt, sync::Arc};

use num::BigInt;

use super::{column::Column, identity::Identity, program::ColumnSet};
use crate::utils::errors::PilError;

/// Which row a column reference reads, relative to the row a constraint is evaluated on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Shift {
    #[default]
    Current,
    Next,
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Current => Ok(()),
            Shift::Next => write!(f, "'"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    column: Arc<Column>,
    shift: Shift,
}

impl ColumnRef {
    pub fn new(column: Arc<Column>) -> Self {
        Self {
            column,
            shift: Shift::Current,
        }
    }

    pub fn column(&self) -> &Arc<Column> {
        &self.column
    }

    pub fn name(&self) -> &str {
        self.column.name()
    }

    pub fn shift(&self) -> Shift {
        self.shift
    }

    /// Reference the same column one row down. Only single-row shifts exist, so shifting an
    /// already shifted reference is an error.
    pub fn next(&self) -> Result<Self, PilError> {
        match self.shift {
            Shift::Next => Err(PilError::DoubleShift(self.name().to_string())),
            Shift::Current => Ok(Self {
                column: Arc::clone(&self.column),
                shift: Shift::Next,
            }),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.shift)
    }
}

/// `Display`, `Clone`, equality and drop recurse once per level of nesting. Trees tens of
/// thousands of nodes deep (e.g. a long left fold of `e = e + 1`) can exhaust the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expression {
    Literal(BigInt),
    Column(ColumnRef),
    Add(Box<Expression>, Box<Expression>),
    Sub(Box<Expression>, Box<Expression>),
    Mul(Box<Expression>, Box<Expression>),
}

impl Expression {
    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expression::Literal(_) => "literal",
            Expression::Column(_) => "column reference",
            Expression::Add(..) => "sum",
            Expression::Sub(..) => "difference",
            Expression::Mul(..) => "product",
        }
    }

    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Expression::Column(column_ref) => Some(column_ref),
            _ => None,
        }
    }

    /// Child operands, left to right. A reference to an intermediate column has the column's
    /// definition as its only child.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) => vec![],
            Expression::Column(column_ref) => column_ref.column().definition().into_iter().collect(),
            Expression::Add(lhs, rhs) | Expression::Sub(lhs, rhs) | Expression::Mul(lhs, rhs) => {
                vec![lhs.as_ref(), rhs.as_ref()]
            }
        }
    }

    /// Pre-order traversal: the node itself, then each child left to right. Uses an explicit
    /// stack, so the depth of the tree is bounded by memory rather than by the call stack.
    pub fn visit<'a, F: FnMut(&'a Expression)>(&'a self, visitor: &mut F) {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            visitor(node);
            pending.extend(node.children().into_iter().rev());
        }
    }

    /// Columns referenced anywhere in this tree, in first-seen order.
    pub fn columns(&self) -> ColumnSet {
        let mut columns = ColumnSet::new();
        columns.collect_from(self);
        columns
    }

    pub fn next(&self) -> Result<Expression, PilError> {
        next(self)
    }

    /// Terminal combinator: `self - rhs` must vanish on every row.
    pub fn equals(self, rhs: impl Into<Expression>) -> Identity {
        equals(self, rhs)
    }
}

pub fn literal(value: impl Into<BigInt>) -> Expression {
    Expression::Literal(value.into())
}

pub fn column_ref(column: &Arc<Column>) -> Expression {
    Expression::Column(ColumnRef::new(Arc::clone(column)))
}

pub fn add(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::Add(Box::new(lhs.into()), Box::new(rhs.into()))
}

pub fn sub(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::Sub(Box::new(lhs.into()), Box::new(rhs.into()))
}

pub fn mul(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Expression {
    Expression::Mul(Box::new(lhs.into()), Box::new(rhs.into()))
}

/// Shift a column reference to the next row.
pub fn next(expression: &Expression) -> Result<Expression, PilError> {
    match expression {
        Expression::Column(column_ref) => column_ref.next().map(Expression::Column),
        other => Err(PilError::TypeMismatch {
            expected: "column reference",
            found: other.kind().to_string(),
        }),
    }
}

pub fn equals(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Identity {
    Identity::polynomial(lhs, rhs)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(value) => write!(f, "{value}"),
            Expression::Column(column_ref) => write!(f, "{column_ref}"),
            Expression::Add(lhs, rhs) => write!(f, "({lhs} + {rhs})"),
            Expression::Sub(lhs, rhs) => write!(f, "({lhs} - {rhs})"),
            Expression::Mul(lhs, rhs) => write!(f, "({lhs} * {rhs})"),
        }
    }
}

// Into<Expression>

macro_rules! impl_literal_conversions {
    ($($int:ty),*) => {
        $(
            impl From<$int> for Expression {
                fn from(val: $int) -> Self {
                    Expression::Literal(BigInt::from(val))
                }
            }
        )*
    };
}

impl_literal_conversions!(i32, i64, u32, u64, usize);

impl From<BigInt> for Expression {
    fn from(val: BigInt) -> Self {
        Expression::Literal(val)
    }
}

impl From<ColumnRef> for Expression {
    fn from(val: ColumnRef) -> Self {
        Expression::Column(val)
    }
}

impl From<Arc<Column>> for Expression {
    fn from(val: Arc<Column>) -> Self {
        Expression::Column(ColumnRef::new(val))
    }
}

impl From<&Expression> for Expression {
    fn from(val: &Expression) -> Self {
        val.clone()
    }
}

// Arithmetic for Expression

macro_rules! impl_expression_binop {
    ($Trait:ident, $method:ident, $constructor:ident) => {
        impl<T: Into<Expression>> std::ops::$Trait<T> for Expression {
            type Output = Expression;

            fn $method(self, rhs: T) -> Self::Output {
                $constructor(self, rhs)
            }
        }

        impl<T: Into<Expression>> std::ops::$Trait<T> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: T) -> Self::Output {
                $constructor(self.clone(), rhs)
            }
        }

        impl std::ops::$Trait<Expression> for i64 {
            type Output = Expression;

            fn $method(self, rhs: Expression) -> Self::Output {
                $constructor(self, rhs)
            }
        }

        impl std::ops::$Trait<&Expression> for i64 {
            type Output = Expression;

            fn $method(self, rhs: &Expression) -> Self::Output {
                $constructor(self, rhs.clone())
            }
        }
    };
}

impl_expression_binop!(Add, add, add);
impl_expression_binop!(Sub, sub, sub);
impl_expression_binop!(Mul, mul, mul);
