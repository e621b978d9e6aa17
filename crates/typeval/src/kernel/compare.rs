//! Ordering of values.
//!
//! `compare` is a partial order over the comparable scalars, binaries, times
//! and arrays of comparable elements. `total_cmp` extends it to every pair
//! of values by falling back to the tag order and then the hash code, which
//! makes it usable as a sort key over heterogeneous arrays.

use std::cmp::Ordering;

use crate::Value;

pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Nil, Value::Nil) => Some(Ordering::Equal),
        (Value::Nil, other) if is_comparable(other) => Some(Ordering::Less),
        (other, Value::Nil) if is_comparable(other) => Some(Ordering::Greater),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Int(x), Value::Int(y)) => Some(x.cmp(y)),
        (Value::Float(x), Value::Float(y)) => x.partial_cmp(y),
        (Value::Int(x), Value::Float(y)) => (*x as f64).partial_cmp(y),
        (Value::Float(x), Value::Int(y)) => x.partial_cmp(&(*y as f64)),
        (Value::Str(x), Value::Str(y)) => Some(x.as_str().cmp(y.as_str())),
        (Value::Binary(x), Value::Binary(y)) => Some(x.as_slice().cmp(y.as_slice())),
        (Value::Time(x), Value::Time(y)) => Some(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => x.compare_to(y),
        _ => None,
    }
}

fn is_comparable(v: &Value) -> bool {
    matches!(
        v,
        Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Str(_)
            | Value::Binary(_)
            | Value::Time(_)
            | Value::Array(_)
    )
}

pub fn total_cmp(a: &Value, b: &Value) -> Ordering {
    if let Some(ord) = compare(a, b) {
        return ord;
    }
    a.tag()
        .cmp(&b.tag())
        .then_with(|| a.hash_code().cmp(&b.hash_code()))
}
