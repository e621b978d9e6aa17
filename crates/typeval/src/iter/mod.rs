//! Uniform iteration over the children of a value.
//!
//! Arrays yield their elements, maps their entries, tuples their slot types
//! and combinators their members. Everything else yields nothing. Iteration
//! borrows; no intermediate collection is built, so `any`, `all` and `find`
//! from [`Iterator`] stop as early as they can.

use std::slice;

use crate::table;
use crate::Value;

/// One child of an iterated value.
#[derive(Copy, Clone, Debug)]
pub enum Element<'a> {
    Value(&'a Value),
    Entry(&'a Value, &'a Value),
}

impl<'a> Element<'a> {
    /// The element itself, or the value of an entry.
    pub fn value(self) -> &'a Value {
        match self {
            Element::Value(v) | Element::Entry(_, v) => v,
        }
    }

    /// The key of an entry.
    pub fn key(self) -> Option<&'a Value> {
        match self {
            Element::Entry(k, _) => Some(k),
            Element::Value(_) => None,
        }
    }
}

pub enum Elements<'a> {
    Slice(slice::Iter<'a, Value>),
    Map(table::Iter<'a, Value, Value>),
    Empty,
}

impl<'a> Iterator for Elements<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Element<'a>> {
        match self {
            Elements::Slice(it) => it.next().map(Element::Value),
            Elements::Map(it) => it.next().map(|(k, v)| Element::Entry(k, v)),
            Elements::Empty => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Elements::Slice(it) => it.size_hint(),
            Elements::Map(it) => it.size_hint(),
            Elements::Empty => (0, Some(0)),
        }
    }
}

impl ExactSizeIterator for Elements<'_> {}

impl Value {
    /// The children of this value, in order.
    pub fn elements(&self) -> Elements<'_> {
        match self {
            Value::Array(a) => Elements::Slice(a.iter()),
            Value::Map(m) => Elements::Map(m.iter()),
            Value::Tuple(t) => Elements::Slice(t.types().iter()),
            Value::Logical(l) => Elements::Slice(l.members().iter()),
            _ => Elements::Empty,
        }
    }

    /// Number of children, as [`elements`](Self::elements) would yield.
    pub fn element_count(&self) -> usize {
        self.elements().len()
    }
}
