use std::collections::HashSet;
use tablesearch_core::{
    error::SearchError,
    obs::{metrics_report, metrics_reset_all},
    structure::{
        KeyStructure, Mergeable, RangeStructure, RangeType, ResultStructure, SearchStructure,
        TwoColumnRangeStructure,
    },
};

#[derive(Debug, Eq, Hash, PartialEq)]
struct Row {
    product: &'static str,
    min_sum: i32,
    premium: u32,
}

static ROWS: [Row; 4] = [
    Row {
        product: "home",
        min_sum: 0,
        premium: 10,
    },
    Row {
        product: "home",
        min_sum: 50_000,
        premium: 25,
    },
    Row {
        product: "car",
        min_sum: 0,
        premium: 40,
    },
    Row {
        product: "car",
        min_sum: 20_000,
        premium: 55,
    },
];

type Premiums<'a> = KeyStructure<&'static str, RangeStructure<i32, ResultStructure<&'a Row>>>;

fn premiums(rows: &[Row]) -> Premiums<'_> {
    let mut structure = KeyStructure::new();
    for row in rows {
        structure.put(
            row.product,
            RangeStructure::with_entry(
                RangeType::LowerBoundEqual,
                row.min_sum,
                ResultStructure::with_value(row),
            ),
        );
    }

    structure
}

#[test]
fn composite_lookup_borrows_rows() {
    let structure = premiums(&ROWS);

    let row = structure.get("home").get(&60_000).unique().expect("unique");
    assert!(std::ptr::eq(row.expect("row"), &ROWS[1]));

    let row = structure.get("car").get(&19_999).unique().expect("unique");
    assert_eq!(row.map(|row| row.premium), Some(40));

    assert_eq!(structure.get("car").get(&-1).unique(), Ok(None));
    assert_eq!(structure.get("boat").get(&100).unique(), Ok(None));
}

#[test]
fn intermediate_layers_flatten_to_every_row() {
    let structure = premiums(&ROWS);

    let home: HashSet<u32> = structure
        .get("home")
        .values()
        .iter()
        .map(|row| row.premium)
        .collect();
    assert_eq!(home, HashSet::from([10, 25]));
    assert_eq!(structure.values().len(), ROWS.len());

    let err = structure.get("car").unique().unwrap_err();
    assert_eq!(err, SearchError::NonUniqueResult { count: 2 });
}

#[test]
fn unique_or_substitutes_default_on_miss() {
    let fallback = Row {
        product: "none",
        min_sum: 0,
        premium: 0,
    };
    let structure = premiums(&ROWS);

    let row = structure
        .get("boat")
        .get(&0)
        .unique_or(&fallback)
        .expect("unique");
    assert_eq!(row.product, "none");
}

#[test]
fn merging_tables_preserves_both_sides() {
    let (left, right) = ROWS.split_at(2);
    let mut structure = premiums(left);
    structure.merge(premiums(right));

    assert_eq!(structure, premiums(&ROWS));
}

#[test]
fn three_layer_tree_resolves_validity_windows() {
    type Leaf = ResultStructure<u32>;
    type Tree = KeyStructure<String, TwoColumnRangeStructure<i32, RangeStructure<i32, Leaf>>>;

    let mut tree = Tree::new();
    let mut put = |region: &str, from: i32, to: i32, age: i32, id: u32| {
        tree.put(
            region.to_string(),
            TwoColumnRangeStructure::with_entry(
                from,
                to,
                RangeStructure::with_entry(RangeType::LowerBoundEqual, age, Leaf::with_value(id)),
            ),
        );
    };
    put("north", 2020, 2022, 18, 1);
    put("north", 2020, 2022, 65, 2);
    put("north", 2023, 2025, 18, 3);

    assert_eq!(tree.get("north").get(&2021).get(&70).unique(), Ok(Some(2)));
    assert_eq!(tree.get("north").get(&2024).get(&70).unique(), Ok(Some(3)));
    assert_eq!(tree.get("north").get(&2026).get(&70).unique(), Ok(None));
    assert!(tree.get("north").get(&2021).get(&17).is_empty());
}

#[test]
fn puts_are_counted_per_structure_kind() {
    metrics_reset_all();

    let mut structure = KeyStructure::new();
    structure.put(1, ResultStructure::with_value(1));
    structure.put(1, ResultStructure::with_value(2));

    let report = metrics_report();
    let key = &report.structures["key"];
    assert_eq!((key.puts, key.merges), (2, 1));
    assert_eq!(report.structures["result"].puts, 2);
}

#[test]
fn merges_count_collisions_without_puts() {
    let mut structure = KeyStructure::with_entry(1, ResultStructure::with_value(1));
    let mut other = KeyStructure::with_entry(1, ResultStructure::with_value(2));
    other.put(2, ResultStructure::with_value(3));

    metrics_reset_all();
    structure.merge(other);

    let report = metrics_report();
    assert_eq!(report.ops.puts, 0);
    assert_eq!(report.ops.merges, 1);
    assert_eq!(report.structures["key"].merges, 1);
    assert_eq!(structure.get(&1).values().len(), 2);
    assert_eq!(structure.get(&2).unique(), Ok(Some(3)));
}
