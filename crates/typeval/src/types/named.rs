//! Named references.
//!
//! A `NamedType` is a nominal placeholder created before its definition is
//! known. Alias resolution binds it to its target exactly once; from then on
//! it is transparent to assignability. Because the target may contain the
//! reference itself, this is the one way a value graph becomes cyclic.

use std::sync::OnceLock;

use crate::assign::{assignable_with, DeepAssignable, ReverseAssignable};
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::deep_equal;
use crate::kernel::hash::{mix, str_hash};
use crate::tag::Tag;
use crate::value::Heap;
use crate::{Value, ValueError};

#[derive(Clone, Debug)]
pub struct NamedType {
    name: String,
    target: OnceLock<Value>,
}

impl NamedType {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound target, if resolution has happened.
    #[inline]
    pub fn target(&self) -> Option<&Value> {
        self.target.get()
    }

    /// Bind the target. Binding again with an equal target is a no-op;
    /// binding a different one fails.
    pub fn bind(&self, target: Value) -> Result<(), ValueError> {
        let target = target.frozen_copy();
        // A concurrent bind may win between any check and the set, so the
        // loser is judged against whatever was stored.
        match self.target.set(target) {
            Ok(()) => Ok(()),
            Err(loser) => match self.target.get() {
                Some(existing) if existing.equals(&loser) => Ok(()),
                Some(existing) => Err(ValueError::mismatch(existing, &loser)),
                None => Ok(()),
            },
        }
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &NamedType) -> bool {
        self.name == other.name
            && match (self.target(), other.target()) {
                (Some(a), Some(b)) => deep_equal(guard, a, b),
                (None, None) => true,
                _ => false,
            }
    }

    /// References hash by name only, which cuts every cycle through them.
    pub(crate) fn deep_hash(&self, _seen: &mut Seen) -> u64 {
        mix(Tag::Named as u64, str_hash(&self.name))
    }
}

impl DeepAssignable for NamedType {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match self.target() {
            Some(target) => assignable_with(guard, target, candidate),
            None => declared.equals(candidate),
        }
    }
}

impl ReverseAssignable for NamedType {
    fn assignable_to(&self, guard: &mut RecursionGuard, candidate: &Value, declared: &Value) -> bool {
        match self.target() {
            Some(target) => guard.visit(declared, candidate, |g| assignable_with(g, declared, target)),
            None => declared.equals(candidate),
        }
    }
}

/// An unbound reference to the type called `name`.
pub fn named(name: impl Into<String>) -> Value {
    Value::Named(Heap::new(NamedType {
        name: name.into(),
        target: OnceLock::new(),
    }))
}

/// A reference to `name` already bound to `target`.
pub fn named_with(name: impl Into<String>, target: Value) -> Value {
    let lock = OnceLock::new();
    let _ = lock.set(target.frozen_copy());
    Value::Named(Heap::new(NamedType {
        name: name.into(),
        target: lock,
    }))
}
