use pretty_assertions::assert_eq;

use super::*;
use crate::structs::{struct_type, StructEntry};
use crate::types::{any_of, array_type, integer_range, named, named_with, tuple_type};

fn s(text: &str) -> Value {
    Value::string(text)
}

/// A self-referential list node type: `{"value":T,"next"?:name}`.
fn list_of(name: &str, value: Value) -> Value {
    let node = named(name);
    let target = struct_type(
        false,
        vec![
            StructEntry::required("value", value),
            StructEntry::optional("next", node.clone()),
        ],
    );
    if let Value::Named(n) = &node {
        n.bind(target).unwrap();
    }
    node
}

fn list_value(values: &[i64]) -> Value {
    values.iter().rev().fold(Value::Nil, |next, &v| {
        let mut pairs = vec![(s("value"), Value::Int(v))];
        if !next.is_nil() {
            pairs.push((s("next"), next));
        }
        Value::map(pairs)
    })
}

// === Shortcuts ===

#[test]
fn same_payload_is_assignable() {
    let t = any_of(vec![]);
    assert!(!t.assignable(&Value::Nil));
    assert!(t.assignable(&t.clone()));
}

#[test]
fn any_accepts_everything() {
    for v in [
        Value::Nil,
        Value::Int(1),
        Value::IntegerType,
        named("unbound"),
        any_of(vec![]),
        Value::sensitive(Value::Int(1)),
    ] {
        assert!(Value::AnyType.assignable(&v), "{v:?}");
    }
}

// === Exact values ===

#[test]
fn exact_values_accept_equal_values() {
    assert!(Value::Int(3).assignable(&Value::Int(3)));
    assert!(!Value::Int(3).assignable(&Value::IntegerType));
    assert!(!Value::Int(3).assignable(&Value::Float(3.0)));
    assert!(s("a").assignable(&s("a")));
    assert!(Value::Nil.assignable(&Value::Nil));
    assert!(!Value::Nil.assignable(&Value::AnyType));

    let a = Value::array(vec![Value::Int(1), s("x")]);
    assert!(a.assignable(&Value::mutable_array(vec![Value::Int(1), s("x")])));
    assert!(!a.assignable(&array_type(Value::AnyType, 2, 2)));
    assert!(a.assignable(&any_of(vec![a.clone()])));

    let e = Value::entry(s("k"), Value::Int(1));
    assert!(e.assignable(&Value::entry(s("k"), Value::Int(1))));
    assert!(!e.assignable(&Value::entry(s("k"), Value::Int(2))));
}

#[test]
fn exact_values_against_types() {
    assert!(Value::IntegerType.assignable(&Value::Int(3)));
    assert!(integer_range(1, 5, true).unwrap().assignable(&Value::Int(3)));
    assert!(Value::ArrayType.assignable(&Value::array(vec![])));
    assert!(Value::MapType.assignable(&Value::map(Vec::new())));
    assert!(!Value::ArrayType.assignable(&Value::map(Vec::new())));
    assert!(tuple_type(vec![Value::IntegerType, Value::StringType])
        .assignable(&Value::array(vec![Value::Int(1), s("x")])));
}

#[test]
fn sensitive_wrappers_compare_content() {
    let v = Value::sensitive(Value::Int(1));
    assert!(v.assignable(&Value::sensitive(Value::Int(1))));
    assert!(!v.assignable(&Value::sensitive(Value::Int(2))));
    assert!(!v.assignable(&Value::Int(1)));
    assert!(Value::sensitive(Value::IntegerType).assignable(&v));
}

// === Named and recursive types ===

#[test]
fn recursive_types_accept_nested_values() {
    let node = list_of("node", Value::IntegerType);
    assert!(node.is_instance(&list_value(&[1])));
    assert!(node.is_instance(&list_value(&[1, 2, 3])));

    let bad = Value::map(vec![
        (s("value"), Value::Int(1)),
        (s("next"), Value::map(vec![(s("value"), s("x"))])),
    ]);
    assert!(!node.is_instance(&bad));
}

#[test]
fn recursive_types_compare_structurally() {
    let ints = list_of("ints", Value::IntegerType);
    let small = list_of("small", integer_range(1, 5, true).unwrap());
    assert!(ints.assignable(&small));
    assert!(!small.assignable(&ints));
    assert!(ints.assignable(&list_of("ints", Value::IntegerType)));
}

#[test]
fn named_candidates_are_looked_through() {
    let port = named_with("port", integer_range(1, 65535, true).unwrap());
    assert!(Value::IntegerType.assignable(&port));
    assert!(any_of(vec![Value::StringType, Value::IntegerType]).assignable(&port));
    assert!(!Value::StringType.assignable(&port));
    assert!(!Value::IntegerType.assignable(&named("unbound")));
}

#[test]
fn guard_is_balanced() {
    let node = list_of("node", Value::IntegerType);
    let mut guard = RecursionGuard::new();
    assert!(assignable_with(&mut guard, &node, &list_value(&[1, 2])));
    assert_eq!(guard.depth(), 0);
    assert!(!assignable_with(&mut guard, &node, &Value::Int(1)));
    assert_eq!(guard.depth(), 0);
}

#[test]
fn all_assignable_checks_each() {
    let mut guard = RecursionGuard::new();
    let ints = [Value::Int(1), Value::Int(2)];
    assert!(all_assignable(&mut guard, &Value::IntegerType, &ints));
    assert!(!all_assignable(&mut guard, &Value::IntegerType, &[Value::Int(1), s("a")]));
    assert!(all_assignable(&mut guard, &Value::IntegerType, &[]));
}

#[test]
fn deep_nesting_does_not_overflow() {
    let mut t = Value::IntegerType;
    let mut v = Value::Int(1);
    for _ in 0..2_000 {
        t = array_type(t, 1, 1);
        v = Value::array(vec![v]);
    }
    assert!(t.is_instance(&v));
    assert!(!t.is_instance(&Value::array(vec![])));
}
