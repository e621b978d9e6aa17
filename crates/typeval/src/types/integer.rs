//! Integer ranges.

use crate::kernel::hash::mix;
use crate::tag::Tag;
use crate::{Value, ValueError};

/// Integers between `min` and `max`. `max` is excluded unless `inclusive`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IntegerRange {
    min: i64,
    max: i64,
    inclusive: bool,
}

impl IntegerRange {
    #[inline]
    pub fn min(self) -> i64 {
        self.min
    }

    #[inline]
    pub fn max(self) -> i64 {
        self.max
    }

    #[inline]
    pub fn inclusive(self) -> bool {
        self.inclusive
    }

    /// Largest member. Construction guarantees `max > min` for exclusive
    /// ranges, so this cannot underflow.
    #[inline]
    fn upper(self) -> i64 {
        if self.inclusive {
            self.max
        } else {
            self.max - 1
        }
    }

    #[inline]
    pub fn contains(self, i: i64) -> bool {
        self.min <= i && i <= self.upper()
    }

    pub(crate) fn accepts(self, candidate: &Value) -> bool {
        match candidate {
            Value::Int(i) => self.contains(*i),
            Value::IntegerRange(o) => self.min <= o.min && o.upper() <= self.upper(),
            _ => false,
        }
    }

    pub(crate) fn hash_code(self) -> u64 {
        let mut h = Tag::IntegerRange as u64;
        h = mix(h, self.min as u64);
        h = mix(h, self.max as u64);
        mix(h, u64::from(self.inclusive))
    }
}

/// Integer range type.
///
/// Bounds given in the wrong order are swapped. `min == max` yields the exact
/// integer when inclusive and an [`EmptyRange`](ValueError::EmptyRange)
/// error when not. The full inclusive `i64` domain yields
/// [`Value::IntegerType`].
pub fn integer_range(min: i64, max: i64, inclusive: bool) -> Result<Value, ValueError> {
    if min == max {
        return if inclusive {
            Ok(Value::Int(min))
        } else {
            Err(ValueError::EmptyRange {
                min: min.to_string(),
                max: max.to_string(),
            })
        };
    }
    let (min, max) = if max < min { (max, min) } else { (min, max) };
    if inclusive && min == i64::MIN && max == i64::MAX {
        return Ok(Value::IntegerType);
    }
    Ok(Value::IntegerRange(IntegerRange {
        min,
        max,
        inclusive,
    }))
}

/// Integers from `min` upwards.
pub fn integer_from(min: i64) -> Value {
    if min == i64::MIN {
        Value::IntegerType
    } else {
        Value::IntegerRange(IntegerRange {
            min,
            max: i64::MAX,
            inclusive: true,
        })
    }
}
