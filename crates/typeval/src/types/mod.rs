//! Type constructors.
//!
//! Scalar, combinator and reference types. Container types live in
//! [`array`](crate::array), [`map`](crate::map) and
//! [`structs`](crate::structs); all constructors are re-exported here so a
//! caller building a type tree needs a single import.

pub mod float;
pub mod integer;
pub mod logical;
pub mod named;
pub mod sensitive;
pub mod string;

use std::sync::Arc;

use crate::value::{Bounds, Heap};
use crate::Value;

pub use crate::array::{array_type, array_type_from_args, tuple_type, variadic_tuple_type};
pub use crate::map::{map_type, map_type_from_args};
pub use crate::structs::{struct_type, StructEntry};
pub use float::float_range;
pub use integer::{integer_from, integer_range};
pub use logical::{all_of, any_of, not, number, one_of, union_of_distinct};
pub use named::{named, named_with};
pub use sensitive::sensitive_type_from_args;
pub use string::{
    ci_enum_type, ci_string, enum_type, pattern, pattern_from, sized_string,
    string_type_from_args,
};

/// Binaries whose length lies in `min..=max`.
pub fn sized_binary(min: usize, max: usize) -> Value {
    let bounds = Bounds::new(min, max);
    if bounds.is_unbounded() {
        Value::BinaryType
    } else {
        Value::SizedBinaryType(bounds)
    }
}

/// Host values reporting `type_name`.
pub fn native_type(type_name: &str) -> Value {
    Value::NativeType(Some(Heap::from_arc(Arc::from(type_name))))
}

/// Sensitive values whose content is accepted by `t`.
pub fn sensitive_type(t: Value) -> Value {
    Value::sensitive(t)
}

/// A boolean type, exact when `value` is given.
pub fn boolean(value: Option<bool>) -> Value {
    value.map_or(Value::BooleanType, Value::Bool)
}

#[cfg(test)]
mod tests;
