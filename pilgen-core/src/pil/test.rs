use proptest::prelude::*;

use super::{
    builder::{Circuit, CircuitBuilder},
    column::Column,
    constant_list::ConstantList,
    identity::{lookup, Identity},
    ops::{column_ref, Expression},
    program::{assemble, Program},
};
use crate::utils::errors::PilError;

const FIB_PIL: &str = "namespace Main(1024);
    col fixed is_last = [0]* + [1];
    col witness x;
    col witness y;
    (is_last * (x' - 1)) = 0;
    (is_last * (y' - 1)) = 0;
    ((1 - is_last) * (x' - y)) = 0;
    ((1 - is_last) * (y' - (x + y))) = 0;
";

fn fib_identities() -> Result<Vec<Identity>, PilError> {
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

struct Fib;

impl Circuit for Fib {
    fn name(&self) -> &str {
        "fib"
    }

    fn identities(&self) -> Result<Vec<Identity>, PilError> {
        fib_identities()
    }
}

#[test]
fn fib_end_to_end() {
    let identities = fib_identities().unwrap();
    assert_eq!(assemble(&identities, 1024), FIB_PIL);

    let program = Fib.program(1024).unwrap();
    assert_eq!(program.validate(), Ok(()));
    assert_eq!(program.assemble(), FIB_PIL);
}

#[test]
fn fib_through_builder_matches() {
    let mut cs = CircuitBuilder::default();
    let is_last = cs
        .fixed("is_last", ConstantList::repeating([0]) + vec![1])
        .unwrap();
    let x = cs.witness("x").unwrap();
    let y = cs.witness("y").unwrap();

    cs.constrain_eq(&is_last * (x.next().unwrap() - 1), 0);
    cs.constrain_eq(&is_last * (y.next().unwrap() - 1), 0);
    cs.constrain_eq((1 - &is_last) * (x.next().unwrap() - &y), 0);
    cs.constrain_eq((1 - &is_last) * (y.next().unwrap() - (&x + &y)), 0);

    assert_eq!(cs.build(1024).unwrap().assemble(), FIB_PIL);
}

#[test]
fn row_count_only_changes_header() {
    let identities = fib_identities().unwrap();
    let small = assemble(&identities, 8);
    let large = assemble(&identities, 1024);
    assert_eq!(small.lines().next(), Some("namespace Main(8);"));
    assert_eq!(small.lines().skip(1).collect::<Vec<_>>(), large.lines().skip(1).collect::<Vec<_>>());
}

#[test]
fn lookup_round_trip() {
    let [a, b, sel, c, d] = ["a", "b", "sel", "c", "d"].map(|name| column_ref(&Column::witness(name)));
    let identity = lookup(vec![a, b], (sel, vec![c, d])).unwrap();
    let program = Program::new(vec![identity], 16).unwrap();
    assert_eq!(program.columns().names(), vec!["sel", "a", "b", "c", "d"]);
    assert!(program.assemble().ends_with("    { a, b } in sel { c, d };\n"));
}

const POOL: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

fn pool() -> Vec<Expression> {
    POOL.iter()
        .map(|name| column_ref(&Column::witness(*name)))
        .collect()
}

fn random_identities(shape: &[(usize, usize, i64, bool)]) -> Vec<Identity> {
    let columns = pool();
    shape
        .iter()
        .map(|&(i, j, constant, as_lookup)| {
            if as_lookup {
                lookup(vec![columns[i].clone()], vec![columns[j].clone()]).unwrap()
            } else {
                Identity::polynomial(&columns[i] * &columns[j], constant)
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn assemble_is_deterministic(
        shape in proptest::collection::vec((0..POOL.len(), 0..POOL.len(), -5i64..5, any::<bool>()), 0..12),
        rows in 1usize..4096,
    ) {
        let first = assemble(&random_identities(&shape), rows);
        let second = assemble(&random_identities(&shape), rows);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn declarations_in_first_seen_order(
        shape in proptest::collection::vec((0..POOL.len(), 0..POOL.len(), -5i64..5, any::<bool>()), 1..12),
        rows in 1usize..4096,
    ) {
        let mut expected: Vec<&str> = vec![];
        for &(i, j, _, _) in &shape {
            for name in [POOL[i], POOL[j]] {
                if !expected.contains(&name) {
                    expected.push(name);
                }
            }
        }

        let pil = assemble(&random_identities(&shape), rows);
        let declared: Vec<&str> = pil
            .lines()
            .filter_map(|line| line.trim().strip_prefix("col witness "))
            .map(|rest| rest.trim_end_matches(';'))
            .collect();
        let expected_len = expected.len();
        prop_assert_eq!(declared, expected);
        prop_assert_eq!(pil.lines().count(), 1 + expected_len + shape.len());
    }
}
