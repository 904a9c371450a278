use pilgen_core::{
    pil::{
        builder::{Circuit, CircuitBuilder},
        column::Column,
        constant_list::ConstantList,
        identity::Identity,
        ops::column_ref,
    },
    utils::errors::PilError,
};

/// Fibonacci over two registers: `x' = y`, `y' = x + y`. On the last row both registers are
/// pinned to 1 for the wrap-around into the first row.
pub fn fib() -> Result<Vec<Identity>, PilError> {
    let is_last = column_ref(&Column::fixed(
        "is_last",
        ConstantList::repeating([0]) + vec![1],
    ));
    let x = column_ref(&Column::witness("x"));
    let y = column_ref(&Column::witness("y"));

    Ok(vec![
        (&is_last * (x.next()? - 1)).equals(0),
        (&is_last * (y.next()? - 1)).equals(0),
        ((1 - &is_last) * (x.next()? - &y)).equals(0),
        ((1 - &is_last) * (y.next()? - (&x + &y))).equals(0),
    ])
}

pub struct Fib;

impl Circuit for Fib {
    fn name(&self) -> &str {
        "fib"
    }

    fn identities(&self) -> Result<Vec<Identity>, PilError> {
        fib()
    }
}

/// The same circuit, with columns registered through a [`CircuitBuilder`].
pub struct FibViaBuilder;

impl Circuit for FibViaBuilder {
    fn name(&self) -> &str {
        "fib_via_builder"
    }

    fn identities(&self) -> Result<Vec<Identity>, PilError> {
        let mut cs = CircuitBuilder::default();
        let is_last = cs.fixed("is_last", ConstantList::repeating([0]) + vec![1])?;
        let x = cs.witness("x")?;
        let y = cs.witness("y")?;

        cs.constrain_eq(&is_last * (x.next()? - 1), 0);
        cs.constrain_eq(&is_last * (y.next()? - 1), 0);
        cs.constrain_eq((1 - &is_last) * (x.next()? - &y), 0);
        cs.constrain_eq((1 - &is_last) * (y.next()? - (&x + &y)), 0);

        Ok(cs.identities().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_forms_agree() {
        let direct = Fib.program(1024).unwrap();
        let built = FibViaBuilder.program(1024).unwrap();
        assert_eq!(direct.assemble(), built.assemble());
        assert_eq!(direct.validate(), Ok(()));
    }

    #[test]
    fn declarations_in_first_seen_order() {
        let program = Fib.program(1024).unwrap();
        assert_eq!(program.columns().names(), vec!["is_last", "x", "y"]);
        let pil = program.assemble();
        let mut lines = pil.lines();
        assert_eq!(lines.next(), Some("namespace Main(1024);"));
        assert_eq!(lines.next(), Some("    col fixed is_last = [0]* + [1];"));
        assert_eq!(lines.next(), Some("    col witness x;"));
        assert_eq!(lines.next(), Some("    col witness y;"));
        assert_eq!(lines.next(), Some("    (is_last * (x' - 1)) = 0;"));
        assert_eq!(lines.next(), Some("    (is_last * (y' - 1)) = 0;"));
        assert_eq!(lines.next(), Some("    ((1 - is_last) * (x' - y)) = 0;"));
        assert_eq!(lines.next(), Some("    ((1 - is_last) * (y' - (x + y))) = 0;"));
        assert_eq!(lines.next(), None);
    }
}
