//! String sub-types: sized, case-insensitive, pattern, and enumerations.

use regex::Regex;

use crate::error::check_arity;
use crate::value::{Bounds, HString, Heap, RegexpValue};
use crate::{Value, ValueError};

use super::logical::{any_of, not};

/// Strings whose length in characters lies in `min..=max`.
pub fn sized_string(min: usize, max: usize) -> Value {
    let bounds = Bounds::new(min, max);
    if bounds.is_unbounded() {
        Value::StringType
    } else {
        Value::SizedStringType(bounds)
    }
}

/// The string `s`, compared without regard to case.
pub fn ci_string(s: &str) -> Value {
    Value::CiStringType(Heap::new(HString::new(s.to_lowercase())))
}

/// Strings matching `pattern`.
pub fn pattern(pattern: &str) -> Result<Value, ValueError> {
    RegexpValue::compile(pattern)
        .map(|re| Value::PatternType(Heap::new(re)))
        .map_err(|e| ValueError::pattern(pattern, &e))
}

/// Strings matching an already compiled expression.
pub fn pattern_from(re: Regex) -> Value {
    Value::PatternType(Heap::new(RegexpValue::from(re)))
}

/// One of the given strings. No strings yields a type that accepts nothing,
/// one string yields that exact string.
pub fn enum_type(strings: &[&str]) -> Value {
    match strings {
        [] => not(Value::AnyType),
        [one] => Value::string(*one),
        many => any_of(many.iter().map(|s| Value::string(*s)).collect()),
    }
}

/// Like [`enum_type`], ignoring case.
pub fn ci_enum_type(strings: &[&str]) -> Value {
    match strings {
        [] => not(Value::AnyType),
        [one] => ci_string(one),
        many => any_of(many.iter().map(|s| ci_string(s)).collect()),
    }
}

/// String type from a factory argument list:
///
/// - `()` is the default string type,
/// - `("s")` is the exact string,
/// - `(min)` and `(min, max)` are sized strings.
pub fn string_type_from_args(args: &[Value]) -> Result<Value, ValueError> {
    check_arity("string", args, 0, 2)?;
    match args {
        [] => Ok(Value::StringType),
        [Value::Str(s)] => Ok(Value::Str(s.clone())),
        [Value::Int(min)] => Ok(sized_string(non_negative(*min), usize::MAX)),
        [Value::Int(min), Value::Int(max)] => {
            Ok(sized_string(non_negative(*min), non_negative(*max)))
        }
        [Value::Int(_), other] => Err(illegal(1, other)),
        [other, ..] => Err(illegal(0, other)),
    }
}

fn non_negative(i: i64) -> usize {
    usize::try_from(i).unwrap_or(0)
}

fn illegal(index: usize, actual: &Value) -> ValueError {
    ValueError::IllegalArgument {
        name: "string",
        index,
        expected: "int or string",
        actual: actual.clone(),
    }
}

pub(crate) fn sized_accepts(bounds: Bounds, candidate: &Value) -> bool {
    match candidate {
        Value::Str(s) | Value::CiStringType(s) => bounds.contains(s.char_len()),
        Value::SizedStringType(o) => bounds.contains_bounds(*o),
        _ => false,
    }
}

pub(crate) fn ci_accepts(s: &HString, candidate: &Value) -> bool {
    match candidate {
        Value::Str(o) => o.as_str().to_lowercase() == s.as_str(),
        Value::CiStringType(o) => o.as_str() == s.as_str(),
        _ => false,
    }
}

pub(crate) fn pattern_accepts(p: &RegexpValue, candidate: &Value) -> bool {
    match candidate {
        Value::Str(s) => p.is_match(s.as_str()),
        Value::PatternType(o) => o.as_str() == p.as_str(),
        _ => false,
    }
}
