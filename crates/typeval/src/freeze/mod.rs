//! Freezing.
//!
//! Only arrays and maps are ever mutable, along with the entries and
//! sensitive wrappers that hold them. Freezing is recursive and goes through
//! [`Heap::make_mut`](crate::value::Heap), so a payload shared with another
//! holder is detached before it is frozen: a holder that saw a mutable
//! container keeps seeing a mutable container.

use crate::map::MapEntry;
use crate::Value;

impl Value {
    /// Whether this value and everything it holds is immutable.
    pub fn is_frozen(&self) -> bool {
        match self {
            Value::Array(a) => a.is_frozen(),
            Value::Map(m) => m.is_frozen(),
            Value::Entry(e) => e.is_frozen(),
            Value::Sensitive(s) => s.wrapped().is_frozen(),
            _ => true,
        }
    }

    /// Freeze in place, recursively.
    pub fn freeze(&mut self) {
        if self.is_frozen() {
            return;
        }
        match self {
            Value::Array(a) => a.make_mut().freeze(),
            Value::Map(m) => m.make_mut().freeze(),
            Value::Entry(e) => e.make_mut().freeze(),
            Value::Sensitive(s) => s.make_mut().wrapped_mut().freeze(),
            _ => {}
        }
    }

    /// A frozen version of this value. A value that is already frozen is
    /// returned as another handle to the same payload.
    pub fn frozen_copy(&self) -> Value {
        if self.is_frozen() {
            return self.clone();
        }
        match self {
            Value::Array(a) => Value::from(a.copy(true)),
            Value::Map(m) => Value::from(m.copy(true)),
            Value::Entry(e) => Value::from(MapEntry::new(e.key().clone(), e.value().frozen_copy())),
            Value::Sensitive(s) => Value::sensitive(s.wrapped().frozen_copy()),
            _ => self.clone(),
        }
    }

    /// A mutable shallow copy of an array or map. Other values are returned
    /// as is.
    pub fn thawed_copy(&self) -> Value {
        match self {
            Value::Array(a) => Value::from(a.copy(false)),
            Value::Map(m) => Value::from(m.copy(false)),
            _ => self.clone(),
        }
    }

    /// [`frozen_copy`](Self::frozen_copy) or [`thawed_copy`](Self::thawed_copy).
    pub fn copy(&self, frozen: bool) -> Value {
        if frozen {
            self.frozen_copy()
        } else {
            self.thawed_copy()
        }
    }
}

#[cfg(test)]
mod tests;
