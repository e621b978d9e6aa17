//! Float ranges.

use crate::kernel::hash::{float_hash, mix};
use crate::tag::Tag;
use crate::{Value, ValueError};

/// Floats between `min` and `max`. `max` is excluded unless `inclusive`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatRange {
    min: f64,
    max: f64,
    inclusive: bool,
}

impl FloatRange {
    #[inline]
    pub fn min(self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(self) -> f64 {
        self.max
    }

    #[inline]
    pub fn inclusive(self) -> bool {
        self.inclusive
    }

    pub fn contains(self, f: f64) -> bool {
        self.min <= f && (f < self.max || (self.inclusive && f == self.max))
    }

    pub(crate) fn accepts(self, candidate: &Value) -> bool {
        match candidate {
            Value::Float(f) => self.contains(*f),
            Value::FloatRange(o) => {
                self.min <= o.min
                    && if self.inclusive || self.inclusive == o.inclusive {
                        self.max >= o.max
                    } else {
                        self.max > o.max
                    }
            }
            _ => false,
        }
    }

    pub(crate) fn hash_code(self) -> u64 {
        let mut h = Tag::FloatRange as u64;
        h = mix(h, float_hash(self.min));
        h = mix(h, float_hash(self.max));
        mix(h, u64::from(self.inclusive))
    }
}

/// Float range type.
///
/// Follows the same normalization as
/// [`integer_range`](super::integer::integer_range); bounds spanning
/// `f64::MIN..=f64::MAX` (or wider) yield [`Value::FloatType`]. NaN bounds
/// are rejected.
pub fn float_range(min: f64, max: f64, inclusive: bool) -> Result<Value, ValueError> {
    if min.is_nan() || max.is_nan() {
        return Err(ValueError::IllegalArgument {
            name: "float range",
            index: usize::from(!min.is_nan()),
            expected: "a number",
            actual: Value::Float(f64::NAN),
        });
    }
    if min == max {
        return if inclusive {
            Ok(Value::Float(min))
        } else {
            Err(ValueError::EmptyRange {
                min: min.to_string(),
                max: max.to_string(),
            })
        };
    }
    let (min, max) = if max < min { (max, min) } else { (min, max) };
    if min <= f64::MIN && max >= f64::MAX {
        return Ok(Value::FloatType);
    }
    Ok(Value::FloatRange(FloatRange {
        min,
        max,
        inclusive,
    }))
}
