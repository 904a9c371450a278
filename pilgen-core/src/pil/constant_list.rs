use std::fmt;

use num::BigInt;

/// The values backing a fixed column, kept as a pattern. Expansion against the row count is left
/// to the downstream toolchain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConstantList {
    /// Explicit values, one per row.
    Literal(Vec<BigInt>),
    /// A sequence repeated to fill whatever rows the other parts leave free.
    Repeating(Vec<BigInt>),
    /// Parts laid out one after another.
    Concat(Vec<ConstantList>),
}

impl ConstantList {
    pub fn literal<T: Into<BigInt>>(values: impl IntoIterator<Item = T>) -> Self {
        ConstantList::Literal(values.into_iter().map(Into::into).collect())
    }

    pub fn repeating<T: Into<BigInt>>(values: impl IntoIterator<Item = T>) -> Self {
        ConstantList::Repeating(values.into_iter().map(Into::into).collect())
    }

    /// Concatenate `parts` left to right. Nested concatenations are flattened; the rendered text
    /// is the same either way.
    pub fn concat(parts: impl IntoIterator<Item = ConstantList>) -> Self {
        let mut flat = vec![];
        for part in parts {
            match part {
                ConstantList::Concat(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        ConstantList::Concat(flat)
    }

    /// Leaf segments in layout order.
    pub fn segments(&self) -> Vec<&ConstantList> {
        match self {
            ConstantList::Concat(parts) => parts.iter().flat_map(|part| part.segments()).collect(),
            leaf => vec![leaf],
        }
    }

    /// Number of rows covered by the explicit (non-repeating) segments.
    pub fn explicit_len(&self) -> usize {
        self.segments()
            .into_iter()
            .map(|segment| match segment {
                ConstantList::Literal(values) => values.len(),
                _ => 0,
            })
            .sum()
    }

    /// The repeating segments, in layout order.
    pub fn repeating_parts(&self) -> Vec<&[BigInt]> {
        self.segments()
            .into_iter()
            .filter_map(|segment| match segment {
                ConstantList::Repeating(values) => Some(values.as_slice()),
                _ => None,
            })
            .collect()
    }
}

fn write_values(f: &mut fmt::Formatter<'_>, values: &[BigInt]) -> fmt::Result {
    write!(f, "[")?;
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    write!(f, "]")
}

impl fmt::Display for ConstantList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantList::Literal(values) => write_values(f, values),
            ConstantList::Repeating(values) => {
                write_values(f, values)?;
                write!(f, "*")
            }
            ConstantList::Concat(_) => {
                // Nested and empty concatenations leave no trace in the text.
                let segments = self.segments();
                if segments.is_empty() {
                    return write!(f, "[]");
                }
                for (index, segment) in segments.into_iter().enumerate() {
                    if index > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{segment}")?;
                }
                Ok(())
            }
        }
    }
}

impl<T: Into<BigInt>> From<Vec<T>> for ConstantList {
    fn from(values: Vec<T>) -> Self {
        ConstantList::literal(values)
    }
}

impl std::ops::Add for ConstantList {
    type Output = ConstantList;

    fn add(self, other: Self) -> Self::Output {
        ConstantList::concat([self, other])
    }
}

impl<T: Into<BigInt>> std::ops::Add<Vec<T>> for ConstantList {
    type Output = ConstantList;

    fn add(self, other: Vec<T>) -> Self::Output {
        self + ConstantList::from(other)
    }
}
