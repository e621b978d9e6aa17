//! Struct types: maps with named, individually typed entries.
//!
//! A struct type lists `(key, value type, required)` triples and an
//! `additional` flag that admits keys it does not declare. It accepts maps
//! and other struct types, constrains struct-typed maps entry by entry, and
//! validates a live map reporting every problem found at once.

use std::fmt::{self, Write as _};

use crate::assign::{assignable_with, reverse, DeepAssignable};
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::deep_equal;
use crate::kernel::hash::{deep_hash, mix};
use crate::map::Map;
use crate::tag::Tag;
use crate::types::logical::union_of_distinct;
use crate::value::{Bounds, Heap};
use crate::{Value, ValueError};

/// One declared entry of a struct type.
#[derive(Clone, Debug)]
pub struct StructEntry {
    key: Value,
    value: Value,
    required: bool,
}

impl StructEntry {
    pub fn new(key: Value, value: Value, required: bool) -> Self {
        StructEntry {
            key,
            value,
            required,
        }
    }

    /// A required entry keyed by the string `key`.
    pub fn required(key: &str, value: Value) -> Self {
        StructEntry::new(Value::string(key), value, true)
    }

    /// An optional entry keyed by the string `key`.
    pub fn optional(key: &str, value: Value) -> Self {
        StructEntry::new(Value::string(key), value, false)
    }

    #[inline]
    pub fn key(&self) -> &Value {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Value, &mut Value) {
        (&mut self.key, &mut self.value)
    }
}

#[derive(Clone, Debug)]
pub struct StructType {
    additional: bool,
    entries: Vec<StructEntry>,
}

/// A problem found by [`StructType::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// The validated value is not a map.
    NotAMap,
    /// A declared key holds a value its type does not accept.
    WrongType { key: Value, expected: Value },
    /// A required key is absent.
    MissingRequired { key: Value },
    /// A key the struct does not declare.
    Unknown { key: Value },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NotAMap => f.write_str("value is not a Map"),
            Violation::WrongType { key, expected } => write!(
                f,
                "parameter '{}' is not an instance of type {expected}",
                key_label(key)
            ),
            Violation::MissingRequired { key } => {
                write!(f, "missing required parameter '{}'", key_label(key))
            }
            Violation::Unknown { key } => write!(f, "unknown parameter '{}'", key_label(key)),
        }
    }
}

/// String keys print bare; other keys print as their type string.
fn key_label(key: &Value) -> String {
    match key.as_str() {
        Some(s) => s.to_owned(),
        None => key.type_string(),
    }
}

impl StructType {
    #[inline]
    pub fn is_additional(&self) -> bool {
        self.additional
    }

    #[inline]
    pub fn entries(&self) -> &[StructEntry] {
        &self.entries
    }

    /// The entry declared under a key equal to `key`.
    pub fn get(&self, key: &Value) -> Option<&StructEntry> {
        self.entries.iter().find(|e| e.key.equals(key))
    }

    /// Size bounds of accepted maps: at least every required entry, and at
    /// most every declared entry unless additional keys are admitted.
    pub fn bounds(&self) -> Bounds {
        let min = self.entries.iter().filter(|e| e.required).count();
        let max = if self.additional || self.entries.is_empty() {
            usize::MAX
        } else {
            self.entries.len()
        };
        Bounds::new(min, max)
    }

    /// Union of the declared keys.
    pub fn key_type(&self) -> Value {
        union_of_distinct(self.entries.iter().map(|e| &e.key))
    }

    /// Union of the declared value types.
    pub fn value_type(&self) -> Value {
        union_of_distinct(self.entries.iter().map(|e| &e.value))
    }

    /// Check one association of a map constrained by `owner` (the struct
    /// value holding `self`). The first declared key accepting `k` decides.
    pub fn check_entry(&self, owner: &Value, k: &Value, v: &Value) -> Result<(), ValueError> {
        match self.entries.iter().find(|e| e.key.is_instance(k)) {
            Some(e) if e.value.is_instance(v) => Ok(()),
            Some(e) => Err(ValueError::mismatch(&e.value, v)),
            None if self.additional => Ok(()),
            None => Err(ValueError::IllegalKey {
                typ: owner.clone(),
                key: k.clone(),
            }),
        }
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<StructEntry> {
        &mut self.entries
    }

    /// Whether `m` holds every required key, only accepted values, and no
    /// undeclared keys unless they are admitted.
    pub(crate) fn accepts_map(&self, guard: &mut RecursionGuard, m: &Map) -> bool {
        let mut matched = 0;
        for e in &self.entries {
            match m.get(&e.key) {
                Some(v) => {
                    if !assignable_with(guard, &e.value, v) {
                        return false;
                    }
                    matched += 1;
                }
                None if e.required => return false,
                None => {}
            }
        }
        self.additional || matched == m.len()
    }

    fn accepts_struct(&self, guard: &mut RecursionGuard, other: &StructType) -> bool {
        let mut matched = 0;
        for e in &self.entries {
            match other.get(&e.key) {
                Some(o) => {
                    if e.required && !o.required {
                        return false;
                    }
                    if !assignable_with(guard, &e.value, &o.value) {
                        return false;
                    }
                    matched += 1;
                }
                // An admitted additional key could hold any value.
                None if e.required || other.additional => return false,
                None => {}
            }
        }
        self.additional || matched == other.entries.len()
    }

    /// Every violation of this struct type by `value`.
    #[tracing::instrument(level = "debug", skip_all, fields(entries = self.entries.len()))]
    pub fn validate(&self, value: &Value) -> Vec<Violation> {
        let Some(m) = value.as_map() else {
            return vec![Violation::NotAMap];
        };
        let mut found = Vec::new();
        for e in &self.entries {
            match m.get(&e.key) {
                Some(v) if !e.value.is_instance(v) => found.push(Violation::WrongType {
                    key: e.key.clone(),
                    expected: e.value.clone(),
                }),
                Some(_) => {}
                None if e.required => found.push(Violation::MissingRequired { key: e.key.clone() }),
                None => {}
            }
        }
        if !self.additional {
            for k in m.iter().map(|(k, _)| k) {
                if self.get(k).is_none() {
                    found.push(Violation::Unknown { key: k.clone() });
                }
            }
        }
        tracing::debug!(violations = found.len(), "struct validated");
        found
    }

    /// Validate `value`, writing a line-by-line account to `out`. Returns
    /// whether the value is valid.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn validate_verbose(&self, value: &Value, out: &mut String) -> bool {
        let Some(m) = value.as_map() else {
            out.push_str("value is not a Map\n");
            return false;
        };
        let mut ok = true;
        for e in &self.entries {
            let key = key_label(&e.key);
            let _ = writeln!(out, "Validating '{key}' against definition {}", e.value);
            match m.get(&e.key) {
                Some(v) if e.value.is_instance(v) => {
                    let _ = writeln!(out, "  '{key}' OK!");
                }
                Some(v) => {
                    ok = false;
                    let _ = writeln!(out, "  '{key}' FAILED!");
                    let _ = writeln!(out, "  Reason: expected a value of type {}, got {v}", e.value);
                }
                None if e.required => {
                    ok = false;
                    let _ = writeln!(out, "  '{key}' FAILED!");
                    out.push_str("  Reason: required key not found in input\n");
                }
                None => {
                    let _ = writeln!(out, "  '{key}' OK!");
                }
            }
        }
        if !self.additional {
            for k in m.iter().map(|(k, _)| k) {
                if self.get(k).is_none() {
                    ok = false;
                    let key = key_label(k);
                    let _ = writeln!(out, "Validating '{key}'");
                    let _ = writeln!(out, "  '{key}' FAILED!");
                    out.push_str("  Reason: key is not found in definition\n");
                }
            }
        }
        ok
    }

    // === Kernel ===

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &StructType) -> bool {
        self.additional == other.additional
            && self.entries.len() == other.entries.len()
            && self.entries.iter().zip(&other.entries).all(|(a, b)| {
                a.required == b.required
                    && deep_equal(guard, &a.key, &b.key)
                    && deep_equal(guard, &a.value, &b.value)
            })
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        let h = self.entries.iter().fold(Tag::Struct as u64, |h, e| {
            let h = mix(h, deep_hash(seen, &e.key));
            let h = mix(h, deep_hash(seen, &e.value));
            mix(h, u64::from(e.required))
        });
        if self.additional {
            h.wrapping_mul(3)
        } else {
            h
        }
    }
}

impl DeepAssignable for StructType {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Struct(other) => self.accepts_struct(guard, other),
            Value::Map(m) => self.accepts_map(guard, m),
            _ => reverse(guard, candidate, declared),
        }
    }
}

/// A struct type over `entries`, admitting undeclared keys when
/// `additional` is set.
pub fn struct_type(additional: bool, entries: Vec<StructEntry>) -> Value {
    Value::Struct(Heap::new(StructType {
        additional,
        entries,
    }))
}
