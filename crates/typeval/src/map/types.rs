//! Sized map types.

use crate::assign::{assignable_with, reverse, DeepAssignable};
use crate::error::check_arity;
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::deep_equal;
use crate::kernel::hash::{deep_hash, mix};
use crate::tag::Tag;
use crate::value::{Bounds, Heap};
use crate::{Value, ValueError};

use super::Map;

/// Maps from `key` to `value` whose size lies within `bounds`.
#[derive(Clone, Debug)]
pub struct SizedMapType {
    key: Value,
    value: Value,
    bounds: Bounds,
}

impl SizedMapType {
    #[inline]
    pub fn key(&self) -> &Value {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Value, &mut Value) {
        (&mut self.key, &mut self.value)
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &SizedMapType) -> bool {
        self.bounds == other.bounds
            && deep_equal(guard, &self.key, &other.key)
            && deep_equal(guard, &self.value, &other.value)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        let mut h = mix(Tag::MapSized as u64, self.bounds.hash_code());
        if !matches!(self.key, Value::AnyType) {
            h = mix(h, deep_hash(seen, &self.key));
        }
        if !matches!(self.value, Value::AnyType) {
            h = mix(h, deep_hash(seen, &self.value));
        }
        h
    }

    fn accepts(&self, guard: &mut RecursionGuard, m: &Map) -> bool {
        self.bounds.contains(m.len())
            && m.iter().all(|(k, v)| {
                assignable_with(guard, &self.key, k) && assignable_with(guard, &self.value, v)
            })
    }
}

impl DeepAssignable for SizedMapType {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Map(m) => self.accepts(guard, m),
            Value::SizedMap(o) => {
                self.bounds.contains_bounds(o.bounds)
                    && assignable_with(guard, &self.key, &o.key)
                    && assignable_with(guard, &self.value, &o.value)
            }
            Value::Struct(s) => {
                self.bounds.contains_bounds(s.bounds())
                    && assignable_with(guard, &self.key, &s.key_type())
                    && assignable_with(guard, &self.value, &s.value_type())
            }
            _ => reverse(guard, candidate, declared),
        }
    }
}

/// Whether `typ` (the default, sized, or struct map type) accepts `m`.
pub(crate) fn map_instance(guard: &mut RecursionGuard, typ: &Value, m: &Map) -> bool {
    match typ {
        Value::MapType => true,
        Value::SizedMap(t) => t.accepts(guard, m),
        Value::Struct(s) => s.accepts_map(guard, m),
        _ => false,
    }
}

/// Maps from `key` to `value` with `min..=max` entries. `Any` keys and
/// values without bounds give the default map type.
pub fn map_type(key: Value, value: Value, min: usize, max: usize) -> Value {
    let bounds = Bounds::new(min, max);
    if bounds.is_unbounded() && matches!(key, Value::AnyType) && matches!(value, Value::AnyType) {
        Value::MapType
    } else {
        Value::SizedMap(Heap::new(SizedMapType { key, value, bounds }))
    }
}

/// Map type from a factory argument list:
///
/// - `()` is the default map type,
/// - `(min)`,
/// - `(K, V)` or `(min, max)`,
/// - `(K, V, min)`,
/// - `(K, V, min, max)`.
pub fn map_type_from_args(args: &[Value]) -> Result<Value, ValueError> {
    check_arity("map", args, 0, 4)?;
    let from = |min: i64| usize::try_from(min).unwrap_or(0);
    match args {
        [] => Ok(Value::MapType),
        [Value::Int(min)] => Ok(map_type(Value::AnyType, Value::AnyType, from(*min), usize::MAX)),
        [other] => Err(illegal(0, other)),
        [Value::Int(min), Value::Int(max)] => {
            let b = Bounds::from_signed(*min, *max);
            Ok(map_type(Value::AnyType, Value::AnyType, b.min, b.max))
        }
        [Value::Int(_), other] => Err(illegal(1, other)),
        [k, v] => Ok(map_type(k.clone(), v.clone(), 0, usize::MAX)),
        [k, v, Value::Int(min)] => Ok(map_type(k.clone(), v.clone(), from(*min), usize::MAX)),
        [k, v, Value::Int(min), Value::Int(max)] => {
            let b = Bounds::from_signed(*min, *max);
            Ok(map_type(k.clone(), v.clone(), b.min, b.max))
        }
        [_, _, Value::Int(_), other] => Err(illegal(3, other)),
        [_, _, other, ..] => Err(illegal(2, other)),
        // Arity is checked above.
        _ => Ok(Value::MapType),
    }
}

fn illegal(index: usize, actual: &Value) -> ValueError {
    ValueError::IllegalArgument {
        name: "map",
        index,
        expected: "int",
        actual: actual.clone(),
    }
}
