//! The assignability engine.
//!
//! `assignable(declared, candidate)` answers whether a value of type
//! `candidate` may be stored where `declared` is expected. The check runs in
//! four stages:
//!
//! 1. **Named references** are looked through on either side once bound.
//! 2. **Deep types** (containers, combinators, sensitive wrappers) run their
//!    [`DeepAssignable`] hook under the recursion guard.
//! 3. **Shallow types** (scalars and the default container types) accept
//!    their family directly.
//! 4. When neither resolves the question, a candidate implementing
//!    [`ReverseAssignable`] is asked to answer from its own side (a union is
//!    assignable to `T` when all of its members are). Failing that, the
//!    answer is `false`; exact values have already been compared for
//!    equality by their shallow or deep hook.

use typeval_stack::ensure_sufficient_stack;

use crate::guard::RecursionGuard;
use crate::kernel::equal::float_eq;
use crate::Value;

/// Structural assignability hook of a declared type.
pub trait DeepAssignable {
    /// Whether `candidate` may be stored where `declared` (the value owning
    /// `self`) is expected. Implementations fall back to [`reverse`] for
    /// candidates they do not understand.
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value)
        -> bool;
}

/// Capability of a candidate to decide assignability on behalf of the
/// declared side.
pub trait ReverseAssignable {
    /// Whether a value of `candidate` (the value owning `self`) may be
    /// stored where `declared` is expected.
    fn assignable_to(&self, guard: &mut RecursionGuard, candidate: &Value, declared: &Value)
        -> bool;
}

/// Whether `candidate` may be stored where `declared` is expected.
pub fn assignable(declared: &Value, candidate: &Value) -> bool {
    assignable_with(&mut RecursionGuard::new(), declared, candidate)
}

/// [`assignable`] threading an existing guard.
pub fn assignable_with(guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
    if declared.same_ref(candidate) || matches!(declared, Value::AnyType) {
        return true;
    }
    ensure_sufficient_stack(|| {
        if let (Value::Named(named), false) = (candidate, matches!(declared, Value::Named(_))) {
            return named.assignable_to(guard, candidate, declared);
        }
        if let Some(deep) = deep_hook(declared) {
            return guard.visit(declared, candidate, |g| {
                deep.deep_assignable(g, declared, candidate)
            });
        }
        shallow(declared, candidate) || reverse(guard, candidate, declared)
    })
}

/// Ask `candidate` to decide on behalf of `declared`.
pub fn reverse(guard: &mut RecursionGuard, candidate: &Value, declared: &Value) -> bool {
    match reverse_hook(candidate) {
        Some(hook) => hook.assignable_to(guard, candidate, declared),
        None => false,
    }
}

/// Whether every element of `candidates` is assignable to `declared`.
pub fn all_assignable(guard: &mut RecursionGuard, declared: &Value, candidates: &[Value]) -> bool {
    candidates.iter().all(|c| assignable_with(guard, declared, c))
}

fn deep_hook(v: &Value) -> Option<&dyn DeepAssignable> {
    if !v.flags().is_deep() {
        return None;
    }
    match v {
        Value::Array(a) => Some(&**a),
        Value::Map(m) => Some(&**m),
        Value::SizedArray(t) => Some(&**t),
        Value::Tuple(t) => Some(&**t),
        Value::SizedMap(t) => Some(&**t),
        Value::Struct(t) => Some(&**t),
        Value::Not(n) => Some(&**n),
        Value::Logical(l) => Some(&**l),
        Value::Sensitive(s) => Some(&**s),
        Value::Named(n) => Some(&**n),
        _ => None,
    }
}

fn reverse_hook(v: &Value) -> Option<&dyn ReverseAssignable> {
    if !v.flags().delegates() {
        return None;
    }
    match v {
        Value::Logical(l) => Some(&**l),
        Value::Named(n) => Some(&**n),
        _ => None,
    }
}

/// Assignability for declared types without a deep hook.
fn shallow(declared: &Value, candidate: &Value) -> bool {
    match declared {
        Value::AnyType => true,
        Value::Nil => candidate.is_nil(),
        Value::Bool(b) => candidate.as_bool() == Some(*b),
        Value::BooleanType => matches!(candidate, Value::Bool(_) | Value::BooleanType),
        Value::Int(i) => candidate.as_int() == Some(*i),
        Value::IntegerType => matches!(
            candidate,
            Value::Int(_) | Value::IntegerRange(_) | Value::IntegerType
        ),
        Value::IntegerRange(r) => r.accepts(candidate),
        Value::Float(f) => matches!(candidate, Value::Float(o) if float_eq(*f, *o)),
        Value::FloatType => matches!(
            candidate,
            Value::Float(_) | Value::FloatRange(_) | Value::FloatType
        ),
        Value::FloatRange(r) => r.accepts(candidate),
        Value::Str(s) => candidate.as_str() == Some(s.as_str()),
        Value::StringType => matches!(
            candidate,
            Value::Str(_)
                | Value::StringType
                | Value::SizedStringType(_)
                | Value::PatternType(_)
                | Value::CiStringType(_)
        ),
        Value::SizedStringType(b) => crate::types::string::sized_accepts(*b, candidate),
        Value::PatternType(p) => crate::types::string::pattern_accepts(p, candidate),
        Value::CiStringType(s) => crate::types::string::ci_accepts(s, candidate),
        Value::Binary(b) => matches!(candidate, Value::Binary(o) if **o == **b),
        Value::BinaryType => matches!(
            candidate,
            Value::Binary(_) | Value::BinaryType | Value::SizedBinaryType(_)
        ),
        Value::SizedBinaryType(b) => match candidate {
            Value::Binary(o) => b.contains(o.len()),
            Value::SizedBinaryType(o) => b.contains_bounds(*o),
            _ => false,
        },
        Value::Regexp(r) => matches!(candidate, Value::Regexp(o) if o.as_str() == r.as_str()),
        Value::RegexpType => matches!(candidate, Value::Regexp(_) | Value::RegexpType),
        Value::Time(t) => matches!(candidate, Value::Time(o) if o == t),
        Value::TimeType => matches!(candidate, Value::Time(_) | Value::TimeType),
        Value::Native(n) => matches!(candidate, Value::Native(o) if n.native_eq(&**o)),
        Value::NativeType(None) => matches!(candidate, Value::Native(_) | Value::NativeType(_)),
        Value::NativeType(Some(name)) => match candidate {
            Value::Native(o) => o.type_name() == &**name,
            Value::NativeType(Some(o)) => **o == **name,
            _ => false,
        },
        Value::ArrayType => matches!(
            candidate,
            Value::Array(_) | Value::SizedArray(_) | Value::Tuple(_) | Value::ArrayType
        ),
        Value::MapType => matches!(
            candidate,
            Value::Map(_) | Value::SizedMap(_) | Value::Struct(_) | Value::MapType
        ),
        Value::Entry(_) => declared.equals(candidate),
        // Deep types are dispatched before reaching here.
        Value::Array(_)
        | Value::Map(_)
        | Value::Sensitive(_)
        | Value::SizedArray(_)
        | Value::Tuple(_)
        | Value::SizedMap(_)
        | Value::Struct(_)
        | Value::Not(_)
        | Value::Logical(_)
        | Value::Named(_) => false,
    }
}

#[cfg(test)]
mod tests;
