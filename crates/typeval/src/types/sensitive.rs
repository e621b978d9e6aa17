//! Values hidden from display.

use crate::assign::{assignable_with, reverse, DeepAssignable};
use crate::error::check_arity;
use crate::guard::RecursionGuard;
use crate::value::Heap;
use crate::{Value, ValueError};

/// A wrapper whose content is never rendered. As a type, `Sensitive(T)`
/// accepts `Sensitive(v)` whenever `T` accepts `v`.
#[derive(Clone, Debug)]
pub struct Sensitive {
    wrapped: Value,
}

impl Sensitive {
    pub(crate) fn new(wrapped: Value) -> Self {
        Sensitive { wrapped }
    }

    #[inline]
    pub fn wrapped(&self) -> &Value {
        &self.wrapped
    }

    pub(crate) fn wrapped_mut(&mut self) -> &mut Value {
        &mut self.wrapped
    }
}

impl DeepAssignable for Sensitive {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Sensitive(o) => assignable_with(guard, &self.wrapped, &o.wrapped),
            _ => reverse(guard, candidate, declared),
        }
    }
}

/// Sensitive type from a factory argument list: no argument wraps `Any`.
pub fn sensitive_type_from_args(args: &[Value]) -> Result<Value, ValueError> {
    check_arity("sensitive", args, 0, 1)?;
    let wrapped = args.first().cloned().unwrap_or(Value::AnyType);
    Ok(Value::Sensitive(Heap::new(Sensitive::new(wrapped))))
}
