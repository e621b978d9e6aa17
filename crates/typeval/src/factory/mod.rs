//! Instance construction through a type.
//!
//! [`new_value`] converts a single argument to the family of the target
//! type, then verifies the target accepts the result. Conversion is lenient
//! (an integer target takes floats, booleans, times and numeric strings);
//! assignability stays strict.

use chrono::{DateTime, FixedOffset};

use crate::error::check_arity;
use crate::tag::Family;
use crate::{Value, ValueError};

/// Create an instance of `typ` from `args`.
///
/// ```text
/// new_value(&Value::IntegerType, &[Value::string("0x1f")])  // Ok(31)
/// new_value(&integer_range(0, 9, true)?, &[Value::Int(12)]) // Err(TypeMismatch)
/// ```
pub fn new_value(typ: &Value, args: &[Value]) -> Result<Value, ValueError> {
    if let Value::Named(n) = typ {
        if let Some(target) = n.target() {
            return new_value(target, args);
        }
    }
    let name = family_name(typ);
    check_arity(name, args, 1, 1)?;
    let arg = &args[0];
    let v = match typ.tag().family() {
        Family::Integer => Value::Int(int_from(arg)?),
        Family::Float => Value::Float(float_from(arg)?),
        Family::Boolean => Value::Bool(bool_from(arg)?),
        Family::String => match arg {
            Value::Str(_) => arg.clone(),
            other => Value::string(other.to_string()),
        },
        Family::Time => Value::Time(time_from(arg)?),
        Family::Binary => Value::binary(binary_from(arg)?),
        Family::Regexp => match arg {
            Value::Regexp(_) => arg.clone(),
            Value::Str(s) => Value::regexp(s.as_str())?,
            other => return Err(ValueError::conversion(other, "a regexp")),
        },
        Family::Array => match arg {
            Value::Array(_) => arg.frozen_copy(),
            other => return Err(ValueError::conversion(other, "an array")),
        },
        Family::Map => match arg {
            Value::Map(_) => arg.frozen_copy(),
            Value::Array(a) if a.len() % 2 == 0 => {
                let mut m = a.to_map();
                m.freeze();
                Value::from(m)
            }
            other => return Err(ValueError::conversion(other, "a map")),
        },
        Family::Sensitive => match arg {
            Value::Sensitive(_) => arg.frozen_copy(),
            other => Value::sensitive(other.frozen_copy()),
        },
        _ => arg.frozen_copy(),
    };
    if typ.is_instance(&v) {
        Ok(v)
    } else {
        Err(ValueError::mismatch(typ, &v))
    }
}

fn family_name(typ: &Value) -> &'static str {
    match typ.tag().family() {
        Family::Integer => "int",
        Family::Float => "float",
        Family::Boolean => "bool",
        Family::String => "string",
        Family::Time => "time",
        Family::Binary => "binary",
        Family::Regexp => "regexp",
        Family::Array => "array",
        Family::Map => "map",
        Family::Sensitive => "sensitive",
        _ => "new",
    }
}

fn int_from(v: &Value) -> Result<i64, ValueError> {
    match v {
        Value::Int(i) => Ok(*i),
        Value::Float(f) => {
            let t = f.trunc();
            // `i64::MAX as f64` rounds up to 2^63, itself out of range. NaN
            // and infinities fail both comparisons.
            if t >= i64::MIN as f64 && t < i64::MAX as f64 {
                Ok(t as i64)
            } else {
                Err(ValueError::conversion(v, "an int"))
            }
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::Time(t) => Ok(t.timestamp()),
        Value::Str(s) => parse_int(s.as_str()).ok_or_else(|| ValueError::conversion(v, "an int")),
        _ => Err(ValueError::conversion(v, "an int")),
    }
}

/// Decimal, or hexadecimal, octal and binary with `0x`, `0o` and `0b` prefixes.
fn parse_int(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let (radix, digits) = match digits.get(..2) {
        Some("0x" | "0X") => (16, &digits[2..]),
        Some("0o" | "0O") => (8, &digits[2..]),
        Some("0b" | "0B") => (2, &digits[2..]),
        _ => (10, digits),
    };
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

fn float_from(v: &Value) -> Result<f64, ValueError> {
    match v {
        Value::Float(f) => Ok(*f),
        Value::Int(i) => Ok(*i as f64),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Time(t) => Ok(t.timestamp() as f64 + f64::from(t.timestamp_subsec_nanos()) / 1e9),
        Value::Str(s) => s
            .as_str()
            .trim()
            .parse::<f64>()
            .map_err(|_| ValueError::conversion(v, "a float")),
        _ => Err(ValueError::conversion(v, "a float")),
    }
}

fn bool_from(v: &Value) -> Result<bool, ValueError> {
    match v {
        Value::Bool(b) => Ok(*b),
        Value::Int(i) => Ok(*i != 0),
        Value::Float(f) => Ok(*f != 0.0),
        Value::Str(s) => match s.as_str().to_lowercase().as_str() {
            "true" | "yes" | "y" => Ok(true),
            "false" | "no" | "n" => Ok(false),
            _ => Err(ValueError::conversion(v, "a bool")),
        },
        _ => Err(ValueError::conversion(v, "a bool")),
    }
}

fn time_from(v: &Value) -> Result<DateTime<FixedOffset>, ValueError> {
    let unix = |secs: i64, nanos: u32| {
        DateTime::from_timestamp(secs, nanos)
            .map(DateTime::<FixedOffset>::from)
            .ok_or_else(|| ValueError::conversion(v, "a time"))
    };
    match v {
        Value::Time(t) => Ok(*t),
        Value::Int(secs) => unix(*secs, 0),
        Value::Float(f) if f.is_finite() => {
            let secs = f.floor();
            unix(secs as i64, ((f - secs) * 1e9) as u32)
        }
        Value::Str(s) => DateTime::parse_from_rfc3339(s.as_str())
            .map_err(|_| ValueError::conversion(v, "a time")),
        _ => Err(ValueError::conversion(v, "a time")),
    }
}

fn binary_from(v: &Value) -> Result<Vec<u8>, ValueError> {
    match v {
        Value::Binary(b) => Ok(b.to_vec()),
        Value::Str(s) => Ok(s.as_str().as_bytes().to_vec()),
        Value::Array(a) => a
            .iter()
            .map(|e| {
                e.as_int()
                    .and_then(|i| u8::try_from(i).ok())
                    .ok_or_else(|| ValueError::conversion(v, "a binary"))
            })
            .collect(),
        _ => Err(ValueError::conversion(v, "a binary")),
    }
}

#[cfg(test)]
mod tests;
