//! Structural equality.

use typeval_stack::ensure_sufficient_stack;

use crate::guard::RecursionGuard;
use crate::Value;

/// Float equality that keeps `Eq` reflexive: NaN equals NaN.
#[inline]
pub fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Structural equality of `a` and `b`. Values of different variants are
/// never equal.
pub fn deep_equal(guard: &mut RecursionGuard, a: &Value, b: &Value) -> bool {
    if a.same_ref(b) {
        return true;
    }
    ensure_sufficient_stack(|| match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Int(x), Value::Int(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => float_eq(*x, *y),
        (Value::Str(x), Value::Str(y)) | (Value::CiStringType(x), Value::CiStringType(y)) => {
            x.as_str() == y.as_str()
        }
        (Value::Binary(x), Value::Binary(y)) => **x == **y,
        (Value::Regexp(x), Value::Regexp(y)) | (Value::PatternType(x), Value::PatternType(y)) => {
            x.as_str() == y.as_str()
        }
        (Value::Time(x), Value::Time(y)) => x == y,
        (Value::Native(x), Value::Native(y)) => x.native_eq(&**y),
        (Value::Array(x), Value::Array(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Map(x), Value::Map(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Entry(x), Value::Entry(y)) => guard.visit(a, b, |g| {
            deep_equal(g, x.key(), y.key()) && deep_equal(g, x.value(), y.value())
        }),
        (Value::Sensitive(x), Value::Sensitive(y)) => {
            guard.visit(a, b, |g| deep_equal(g, x.wrapped(), y.wrapped()))
        }
        (Value::IntegerRange(x), Value::IntegerRange(y)) => x == y,
        (Value::FloatRange(x), Value::FloatRange(y)) => x == y,
        (Value::SizedBinaryType(x), Value::SizedBinaryType(y))
        | (Value::SizedStringType(x), Value::SizedStringType(y)) => x == y,
        (Value::NativeType(x), Value::NativeType(y)) => x.as_deref() == y.as_deref(),
        (Value::SizedArray(x), Value::SizedArray(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Tuple(x), Value::Tuple(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::SizedMap(x), Value::SizedMap(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Struct(x), Value::Struct(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Not(x), Value::Not(y)) => {
            guard.visit(a, b, |g| deep_equal(g, x.negated(), y.negated()))
        }
        (Value::Logical(x), Value::Logical(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::Named(x), Value::Named(y)) => guard.visit(a, b, |g| x.deep_equal(g, y)),
        (Value::AnyType, Value::AnyType)
        | (Value::BooleanType, Value::BooleanType)
        | (Value::IntegerType, Value::IntegerType)
        | (Value::FloatType, Value::FloatType)
        | (Value::BinaryType, Value::BinaryType)
        | (Value::StringType, Value::StringType)
        | (Value::RegexpType, Value::RegexpType)
        | (Value::TimeType, Value::TimeType)
        | (Value::ArrayType, Value::ArrayType)
        | (Value::MapType, Value::MapType) => true,
        _ => false,
    })
}

/// Element-wise equality of two slices.
pub fn slice_equal(guard: &mut RecursionGuard, a: &[Value], b: &[Value]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equal(guard, x, y))
}
