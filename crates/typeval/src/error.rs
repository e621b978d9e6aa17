//! Errors raised by construction, mutation and conversion.
//!
//! Every error is a deterministic function of the (type, value) pair that
//! produced it. Struct validation does not use this type for its findings;
//! it accumulates [`Violation`](crate::Violation)s instead.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

/// Expected argument count of a factory call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    /// Arity of a call accepting `min..=max` arguments.
    pub const fn of(min: usize, max: usize) -> Self {
        if min == max {
            Arity::Exactly(min)
        } else if max == usize::MAX {
            Arity::AtLeast(min)
        } else {
            Arity::Between(min, max)
        }
    }

    pub const fn accepts(self, n: usize) -> bool {
        match self {
            Arity::Exactly(e) => n == e,
            Arity::Between(lo, hi) => lo <= n && n <= hi,
            Arity::AtLeast(lo) => n >= lo,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::Between(lo, hi) => write!(f, "{lo} to {hi}"),
            Arity::AtLeast(lo) => write!(f, "at least {lo}"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ValueError {
    #[error("{} cannot be assigned to a variable of type {expected}", describe(actual))]
    TypeMismatch { expected: Value, actual: Value },

    #[error("size constraint violation on type {typ} when attempting resize to {attempted}")]
    SizeViolation { typ: Value, attempted: usize },

    #[error("key {key} cannot be added to type {typ}")]
    IllegalKey { typ: Value, key: Value },

    #[error("key {key} cannot be removed from type {typ}")]
    RequiredKey { typ: Value, key: Value },

    #[error("{op} called on a frozen {container}")]
    Frozen {
        op: &'static str,
        container: &'static str,
    },

    #[error("illegal number of arguments for {name}. Expected {expected}, got {got}")]
    ArityMismatch {
        name: &'static str,
        expected: Arity,
        got: usize,
    },

    #[error("illegal argument {index} for {name}. Expected {expected}, got {actual}")]
    IllegalArgument {
        name: &'static str,
        index: usize,
        expected: &'static str,
        actual: Value,
    },

    #[error("the value '{value}' cannot be converted to {target}")]
    Conversion { value: Value, target: &'static str },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("the range {min}...{max} is empty")]
    EmptyRange { min: String, max: String },

    #[error("invalid regular expression {pattern:?}: {message}")]
    Pattern { pattern: String, message: String },
}

impl ValueError {
    pub(crate) fn mismatch(expected: &Value, actual: &Value) -> Self {
        ValueError::TypeMismatch {
            expected: expected.clone(),
            actual: actual.clone(),
        }
    }

    pub(crate) fn size(typ: &Value, attempted: usize) -> Self {
        ValueError::SizeViolation {
            typ: typ.clone(),
            attempted,
        }
    }

    pub(crate) fn conversion(value: &Value, target: &'static str) -> Self {
        ValueError::Conversion {
            value: value.clone(),
            target,
        }
    }

    pub(crate) fn pattern(pattern: &str, err: &regex::Error) -> Self {
        ValueError::Pattern {
            pattern: pattern.to_owned(),
            message: err.to_string(),
        }
    }
}

/// Check a factory's argument count.
pub fn check_arity(name: &'static str, args: &[Value], min: usize, max: usize) -> Result<(), ValueError> {
    let expected = Arity::of(min, max);
    if expected.accepts(args.len()) {
        Ok(())
    } else {
        Err(ValueError::ArityMismatch {
            name,
            expected,
            got: args.len(),
        })
    }
}

/// Phrase naming a value in a mismatch message.
pub(crate) fn describe(v: &Value) -> String {
    match v {
        Value::Str(s) => format!("the string {:?}", s.as_str()),
        Value::Nil | Value::Bool(_) | Value::Int(_) | Value::Float(_) => format!("the value {v}"),
        _ => format!("a value of type {}", v.type_label()),
    }
}
