//! Payloads of the scalar exact values.

use std::any::Any;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::kernel::hash::str_hash;

/// An immutable string with a lazily cached hash.
#[derive(Clone)]
pub struct HString {
    text: String,
    hash: OnceLock<u64>,
}

impl HString {
    pub fn new(text: impl Into<String>) -> Self {
        HString {
            text: text.into(),
            hash: OnceLock::new(),
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters, which is what string size bounds count.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn hash_code(&self) -> u64 {
        *self.hash.get_or_init(|| str_hash(&self.text))
    }
}

impl fmt::Debug for HString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.text, f)
    }
}

/// A compiled regular expression. Two regexps are equal when their source
/// patterns are.
#[derive(Clone)]
pub struct RegexpValue(Regex);

impl RegexpValue {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(RegexpValue)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.0
    }
}

impl From<Regex> for RegexpValue {
    fn from(re: Regex) -> Self {
        RegexpValue(re)
    }
}

impl fmt::Debug for RegexpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.0.as_str())
    }
}

/// A host value carried opaquely inside the model.
///
/// Host values cannot be inspected structurally, so they state their own
/// identity: a type name that [`NativeType`](crate::Value::NativeType)
/// matches on, plus equality and hashing that must agree with each other.
/// They are immutable once wrapped and are therefore always frozen.
pub trait NativeValue: fmt::Debug + Send + Sync + 'static {
    /// Name of the host type. Natives of the same host type report the same name.
    fn type_name(&self) -> &str;

    fn native_hash(&self) -> u64;

    fn native_eq(&self, other: &dyn NativeValue) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Inclusive length bound used by sized strings, binaries and containers.
/// `max == usize::MAX` means unbounded.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: usize,
    pub max: usize,
}

impl Bounds {
    pub const UNBOUNDED: usize = usize::MAX;

    pub const ANY: Bounds = Bounds {
        min: 0,
        max: usize::MAX,
    };

    /// Bounds with `min` and `max` swapped if given in the wrong order.
    pub const fn new(min: usize, max: usize) -> Self {
        if max < min {
            Bounds { min: max, max: min }
        } else {
            Bounds { min, max }
        }
    }

    /// Bounds from signed arguments: negative values clamp to zero.
    pub fn from_signed(min: i64, max: i64) -> Self {
        let clamp = |v: i64| usize::try_from(v).unwrap_or(if v < 0 { 0 } else { usize::MAX });
        Self::new(clamp(min), clamp(max))
    }

    #[inline]
    pub const fn contains(self, n: usize) -> bool {
        self.min <= n && n <= self.max
    }

    #[inline]
    pub const fn contains_bounds(self, other: Bounds) -> bool {
        self.min <= other.min && other.max <= self.max
    }

    #[inline]
    pub const fn is_unbounded(self) -> bool {
        self.min == 0 && self.max == usize::MAX
    }

    pub(crate) fn hash_code(self) -> u64 {
        let mut h = 1u64;
        if self.min > 0 {
            h = h.wrapping_mul(31).wrapping_add(self.min as u64);
        }
        if self.max < usize::MAX {
            h = h.wrapping_mul(31).wrapping_add(self.max as u64);
        }
        h
    }
}
