//! Property-based tests for join enumeration.
//!
//! For any number of candidate lists, a join yields one record per element
//! of their Cartesian product, in row-major order with the last candidate
//! varying fastest.

#![allow(clippy::unwrap_used, reason = "tests unwrap run results")]

use proptest::prelude::*;
use tildec::{Program, Value};

// ============================================================================
// Strategies for generating test inputs
// ============================================================================

fn arb_collections() -> impl Strategy<Value = Vec<Vec<i64>>> {
    prop::collection::vec(prop::collection::vec(-50i64..50, 0..5), 1..4)
}

// ============================================================================
// Helpers
// ============================================================================

/// `r = join {s0 ~ c0; s1 ~ c1; ...}`
fn join_source(slots: usize) -> String {
    let bindings: Vec<String> = (0..slots).map(|i| format!("s{i} ~ c{i}")).collect();
    format!("r = join {{{}}}", bindings.join("; "))
}

/// Row `index` of the product, decoded as a mixed-radix number.
fn expected_row(collections: &[Vec<i64>], mut index: usize) -> Vec<i64> {
    let mut row = vec![0; collections.len()];
    for (slot, collection) in collections.iter().enumerate().rev() {
        row[slot] = collection[index % collection.len()];
        index /= collection.len();
    }
    row
}

fn run_join(collections: &[Vec<i64>]) -> (tildec::Bindings, Vec<Value>) {
    let program = Program::compile(&join_source(collections.len())).unwrap();
    let names: Vec<String> = (0..collections.len()).map(|i| format!("c{i}")).collect();
    let inputs = names.iter().zip(collections).map(|(name, values)| {
        let list = Value::list(values.iter().copied().map(Value::Int).collect());
        (name.as_str(), list)
    });
    let bindings = program.run(inputs).unwrap();
    let rows = bindings.get("r").unwrap().as_list().unwrap().to_vec();
    (bindings, rows)
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn cardinality_is_product_of_lengths(collections in arb_collections()) {
        let (_, rows) = run_join(&collections);
        let expected: usize = collections.iter().map(Vec::len).product();
        prop_assert_eq!(rows.len(), expected);
    }

    #[test]
    fn rows_follow_row_major_order(collections in arb_collections()) {
        let (bindings, rows) = run_join(&collections);
        for (index, row) in rows.iter().enumerate() {
            let actual: Vec<i64> = (0..collections.len())
                .map(|slot| {
                    bindings
                        .field(row, &format!("s{slot}"))
                        .and_then(Value::as_int)
                        .unwrap()
                })
                .collect();
            prop_assert_eq!(actual, expected_row(&collections, index));
        }
    }

    #[test]
    fn identities_are_distinct_per_row(collections in arb_collections()) {
        let (_, rows) = run_join(&collections);
        let indices: Vec<Option<usize>> = rows
            .iter()
            .map(|row| row.as_record().unwrap().identity().index)
            .collect();
        let expected: Vec<Option<usize>> = (0..rows.len()).map(Some).collect();
        prop_assert_eq!(indices, expected);
    }
}
