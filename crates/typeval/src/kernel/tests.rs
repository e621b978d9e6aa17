use std::cmp::Ordering;

use chrono::DateTime;
use pretty_assertions::assert_eq;

use crate::structs::{struct_type, StructEntry};
use crate::tag::Tag;
use crate::types::{any_of, integer_range, named, not};
use crate::Value;

fn linked_list(name: &str) -> Value {
    let node = named(name);
    let target = struct_type(
        false,
        vec![
            StructEntry::required("value", Value::IntegerType),
            StructEntry::optional("next", node.clone()),
        ],
    );
    if let Value::Named(n) = &node {
        n.bind(target).unwrap();
    }
    node
}

// === Equality ===

#[test]
fn variants_never_cross() {
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::string("1"), Value::Int(1));
    assert_ne!(Value::Nil, Value::AnyType);
    assert_ne!(Value::IntegerType, integer_range(0, 10, true).unwrap());
    assert_eq!(Value::IntegerType, integer_range(i64::MIN, i64::MAX, true).unwrap());
}

#[test]
fn floats_are_reflexive() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_eq!(Value::Float(-0.0), Value::Float(0.0));
    assert_eq!(Value::Float(-0.0).hash_code(), Value::Float(0.0).hash_code());
    assert_eq!(Value::Float(f64::NAN).hash_code(), Value::Float(-f64::NAN).hash_code());
}

#[test]
fn heap_payloads_compare_by_content() {
    let a = Value::string("hello");
    let b = Value::string("hello");
    assert!(!a.same_ref(&b));
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());

    let x = Value::array(vec![Value::Int(1), Value::string("a")]);
    let y = Value::mutable_array(vec![Value::Int(1), Value::string("a")]);
    assert_eq!(x, y);
    assert_eq!(x.hash_code(), y.hash_code());
}

#[test]
fn times_compare_as_instants() {
    let a = Value::Time(DateTime::parse_from_rfc3339("2020-01-01T12:00:00+02:00").unwrap());
    let b = Value::Time(DateTime::parse_from_rfc3339("2020-01-01T10:00:00Z").unwrap());
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
}

#[test]
fn combinators_compare_structurally() {
    let u = any_of(vec![Value::IntegerType, Value::StringType]);
    assert_eq!(u, any_of(vec![Value::IntegerType, Value::StringType]));
    assert_ne!(u, any_of(vec![Value::StringType, Value::IntegerType]));
    assert_eq!(not(Value::IntegerType), not(Value::IntegerType));
    assert_eq!(not(not(Value::IntegerType)), Value::IntegerType);
}

// === Cycles ===

#[test]
fn cyclic_graphs_terminate() {
    let a = linked_list("node");
    let b = linked_list("node");
    assert!(!a.same_ref(&b));
    assert_eq!(a, b);
    assert_eq!(a.hash_code(), b.hash_code());
    assert_ne!(a, linked_list("other"));
}

#[test]
fn named_hash_uses_name_only() {
    assert_eq!(named("x").hash_code(), linked_list("x").hash_code());
    assert_ne!(named("x"), linked_list("x"));
}

// === Ordering ===

#[test]
fn nil_sorts_first() {
    assert_eq!(Value::Nil.compare_to(&Value::Int(-5)), Some(Ordering::Less));
    assert_eq!(Value::string("").compare_to(&Value::Nil), Some(Ordering::Greater));
    assert_eq!(Value::Nil.compare_to(&Value::IntegerType), None);
}

#[test]
fn numbers_compare_across_kinds() {
    assert_eq!(Value::Int(2).compare_to(&Value::Float(2.5)), Some(Ordering::Less));
    assert_eq!(Value::Float(3.0).compare_to(&Value::Int(3)), Some(Ordering::Equal));
    assert_eq!(Value::Float(f64::NAN).compare_to(&Value::Int(3)), None);
}

#[test]
fn scalars_and_arrays() {
    assert_eq!(
        Value::string("abc").compare_to(&Value::string("abd")),
        Some(Ordering::Less)
    );
    assert_eq!(
        Value::binary(vec![1, 2]).compare_to(&Value::binary(vec![1])),
        Some(Ordering::Greater)
    );
    assert_eq!(
        Value::Bool(false).compare_to(&Value::Bool(true)),
        Some(Ordering::Less)
    );
    let a = Value::array(vec![Value::Int(1), Value::Int(2)]);
    let b = Value::array(vec![Value::Int(1), Value::Int(3)]);
    assert_eq!(a.compare_to(&b), Some(Ordering::Less));
    assert_eq!(Value::string("a").compare_to(&Value::Int(1)), None);
}

#[test]
fn total_order_falls_back_to_tags() {
    assert_eq!(
        Value::Int(100).total_cmp(&Value::string("a")),
        Tag::IntegerExact.cmp(&Tag::StringExact)
    );
    assert_eq!(Value::IntegerType.total_cmp(&Value::StringType), Ordering::Less);
    assert_eq!(Value::Int(1).total_cmp(&Value::Int(2)), Ordering::Less);
    let t = any_of(vec![Value::IntegerType]);
    assert_eq!(t.total_cmp(&t.clone()), Ordering::Equal);
}
