use crate::value::Value;
use std::cmp::Ordering;
use time::macros::date;

#[test]
fn ordering_within_variant_is_natural() {
    assert!(Value::Int(-5) < Value::Int(2));
    assert!(Value::from("abc") < Value::from("abd"));
    assert!(Value::Date(date!(2023 - 12 - 31)) < Value::Date(date!(2024 - 01 - 01)));
}

#[test]
fn ordering_across_variants_is_rank_only() {
    assert_eq!(Value::Null.cmp(&Value::Bool(false)), Ordering::Less);
    assert_eq!(Value::Int(i64::MAX).cmp(&Value::from("")), Ordering::Less);
    assert_eq!(
        Value::from("zzz").cmp(&Value::Date(date!(1900 - 01 - 01))),
        Ordering::Less
    );
}

#[test]
fn optional_inputs_map_to_null() {
    assert_eq!(Value::from(Option::<i64>::None), Value::Null);
    assert_eq!(Value::from(Some(7)), Value::Int(7));
    assert!(Value::Null.is_null());
    assert_eq!(Value::Null.non_null(), None);
    assert_eq!(Value::Int(1).non_null(), Some(&Value::Int(1)));
    assert_eq!(Value::from("x").into_non_null(), Some(Value::from("x")));
}

#[test]
fn display_and_kind() {
    assert_eq!(Value::from("abc").to_string(), "'abc'");
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::Date(date!(2024 - 02 - 29)).to_string(), "2024-02-29");
    assert_eq!(Value::Null.kind(), "null");
    assert_eq!(Value::Bool(true).kind(), "bool");
}

#[test]
fn reads_tagged_json() {
    let parsed: Vec<Value> = serde_json::from_str(r#"[{"int": 4}, {"text": "de"}, "null"]"#)
        .expect("value list");

    assert_eq!(
        parsed,
        vec![Value::Int(4), Value::from("de"), Value::Null]
    );
}
