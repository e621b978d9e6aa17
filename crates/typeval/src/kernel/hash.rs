//! Hash codes.
//!
//! Hash codes are plain `u64`s combined with the classic `h * 31 + x`
//! scheme. Ordered composites fold their children in order; maps sort the
//! per-entry hashes first so insertion order does not matter.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use typeval_stack::ensure_sufficient_stack;

use crate::guard::Seen;
use crate::tag::Tag;
use crate::Value;

/// Contribution of a node met again while it is being hashed.
pub const CYCLE_HASH: u64 = 0;

#[inline]
pub fn mix(h: u64, x: u64) -> u64 {
    h.wrapping_mul(31).wrapping_add(x)
}

pub fn str_hash(s: &str) -> u64 {
    bytes_hash(s.as_bytes())
}

pub fn bytes_hash(bytes: &[u8]) -> u64 {
    let mut h = FxHasher::default();
    h.write(bytes);
    h.finish()
}

/// Hash of a float, coherent with float equality (`-0.0 == 0.0`, and all
/// NaNs are equal to each other).
pub fn float_hash(f: f64) -> u64 {
    if f == 0.0 {
        0
    } else if f.is_nan() {
        0x7ff8_0000_0000_0000
    } else {
        f.to_bits()
    }
}

#[inline]
fn tagged(tag: Tag, x: u64) -> u64 {
    mix(tag as u64, x)
}

/// Structural hash of `v`.
pub fn deep_hash(seen: &mut Seen, v: &Value) -> u64 {
    ensure_sufficient_stack(|| match v {
        Value::Nil => 131,
        Value::Bool(true) => 1231,
        Value::Bool(false) => 1237,
        Value::Int(i) => *i as u64,
        Value::Float(f) => float_hash(*f),
        Value::Str(s) => s.hash_code(),
        Value::Binary(b) => bytes_hash(b),
        Value::Regexp(r) => tagged(Tag::RegexpExact, str_hash(r.as_str())),
        Value::Time(t) => t
            .timestamp_nanos_opt()
            .unwrap_or_else(|| t.timestamp()) as u64,
        Value::Native(n) => n.native_hash(),
        Value::Array(a) => seen.visit(v, CYCLE_HASH, |s| a.deep_hash(s)),
        Value::Map(m) => seen.visit(v, CYCLE_HASH, |s| m.deep_hash(s)),
        Value::Entry(e) => seen.visit(v, CYCLE_HASH, |s| e.deep_hash(s)),
        Value::Sensitive(w) => seen.visit(v, CYCLE_HASH, |s| {
            tagged(Tag::Sensitive, deep_hash(s, w.wrapped()))
        }),
        Value::IntegerRange(r) => r.hash_code(),
        Value::FloatRange(r) => r.hash_code(),
        Value::SizedBinaryType(b) => tagged(Tag::BinarySized, b.hash_code()),
        Value::SizedStringType(b) => tagged(Tag::StringSized, b.hash_code()),
        Value::PatternType(p) => tagged(Tag::StringPattern, str_hash(p.as_str())),
        Value::CiStringType(s) => tagged(Tag::CiString, s.hash_code()),
        Value::NativeType(Some(name)) => tagged(Tag::Native, str_hash(name)),
        Value::SizedArray(t) => seen.visit(v, CYCLE_HASH, |s| t.deep_hash(s)),
        Value::Tuple(t) => seen.visit(v, CYCLE_HASH, |s| t.deep_hash(s)),
        Value::SizedMap(t) => seen.visit(v, CYCLE_HASH, |s| t.deep_hash(s)),
        Value::Struct(t) => seen.visit(v, CYCLE_HASH, |s| t.deep_hash(s)),
        Value::Not(n) => seen.visit(v, CYCLE_HASH, |s| {
            1579u64.wrapping_add(deep_hash(s, n.negated()))
        }),
        Value::Logical(l) => seen.visit(v, CYCLE_HASH, |s| l.deep_hash(s, v.tag())),
        Value::Named(n) => seen.visit(v, CYCLE_HASH, |s| n.deep_hash(s)),
        Value::AnyType
        | Value::BooleanType
        | Value::IntegerType
        | Value::FloatType
        | Value::BinaryType
        | Value::StringType
        | Value::RegexpType
        | Value::TimeType
        | Value::NativeType(None)
        | Value::ArrayType
        | Value::MapType => v.tag() as u64,
    })
}
