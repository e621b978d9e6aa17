//! Arrays and the array type family.
//!
//! An [`Array`] is both a container and its own exact type: as a declared
//! type it accepts only equal arrays, and as a tuple-shaped type it accepts
//! tuple types whose slots match its elements positionally.
//!
//! Arrays may carry a type constraint ([`set_type`](Array::set_type)). Every
//! mutation of a constrained array checks the element type (or tuple slot),
//! the size bounds and the frozen state, in that order of discovery.

mod types;

use std::cmp::Ordering;

use crate::assign::{assignable_with, reverse, DeepAssignable};
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::slice_equal;
use crate::kernel::hash::{deep_hash, mix};
use crate::map::Map;
use crate::types::logical::union_of_distinct;
use crate::{Value, ValueError};

pub use types::{
    array_type, array_type_from_args, default_tuple_type, tuple_type, variadic_tuple_type,
    SizedArrayType, TupleType,
};
pub(crate) use types::{array_instance, tuple_assignable_tuple, TupleShape};

/// An ordered sequence of values.
#[derive(Clone, Debug, Default)]
pub struct Array {
    elements: Vec<Value>,
    typ: Option<Value>,
    frozen: bool,
}

impl Array {
    // === Construction ===

    /// A mutable, untyped array owning `elements`.
    pub fn from_vec(elements: Vec<Value>) -> Self {
        Array {
            elements,
            typ: None,
            frozen: false,
        }
    }

    /// A frozen array holding frozen copies of `elements`.
    pub fn frozen_from(elements: Vec<Value>) -> Self {
        Array {
            elements: elements.iter().map(Value::frozen_copy).collect(),
            typ: None,
            frozen: true,
        }
    }

    /// An empty mutable array, optionally constrained by `typ`.
    pub fn with_capacity(capacity: usize, typ: Option<Value>) -> Result<Self, ValueError> {
        let mut a = Array {
            elements: Vec::with_capacity(capacity),
            typ: None,
            frozen: false,
        };
        if let Some(t) = typ {
            a.set_type(t)?;
        }
        Ok(a)
    }

    // === Queries ===

    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.elements
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    /// The type constraint, if one has been set.
    #[inline]
    pub fn declared_type(&self) -> Option<&Value> {
        self.typ.as_ref()
    }

    /// Position of the first element equal to `v`.
    pub fn index_of(&self, v: &Value) -> Option<usize> {
        self.elements.iter().position(|e| e.equals(v))
    }

    /// Whether every element of `other` can be matched to a distinct equal
    /// element of this array.
    pub fn contains_all(&self, other: &[Value]) -> bool {
        if self.elements.len() < other.len() {
            return false;
        }
        let mut pending: Vec<Option<&Value>> = other.iter().map(Some).collect();
        for e in &self.elements {
            if let Some(slot) = pending.iter_mut().find(|p| p.is_some_and(|o| o.equals(e))) {
                *slot = None;
            }
        }
        pending.iter().all(Option::is_none)
    }

    /// Whether both hold the same elements regardless of order.
    pub fn same_values(&self, other: &[Value]) -> bool {
        self.elements.len() == other.len() && self.contains_all(other)
    }

    /// Union of the distinct element values: `Any` for an empty array.
    pub fn element_type(&self) -> Value {
        union_of_distinct(&self.elements)
    }

    // === Iteration ===

    pub fn all(&self, mut predicate: impl FnMut(&Value) -> bool) -> bool {
        self.elements.iter().all(|e| predicate(e))
    }

    pub fn any(&self, mut predicate: impl FnMut(&Value) -> bool) -> bool {
        self.elements.iter().any(|e| predicate(e))
    }

    /// Whether exactly one element matches.
    pub fn one(&self, mut predicate: impl FnMut(&Value) -> bool) -> bool {
        let mut found = false;
        for e in &self.elements {
            if predicate(e) {
                if found {
                    return false;
                }
                found = true;
            }
        }
        found
    }

    /// The first non-`None` result of `finder`.
    pub fn find<R>(&self, finder: impl FnMut(&Value) -> Option<R>) -> Option<R> {
        self.elements.iter().find_map(finder)
    }

    pub fn reduce(&self, memo: Value, mut reductor: impl FnMut(Value, &Value) -> Value) -> Value {
        self.elements.iter().fold(memo, |m, e| reductor(m, e))
    }

    // === Mutation ===

    fn assert_mutable(&self, op: &'static str) -> Result<(), ValueError> {
        if self.frozen {
            Err(ValueError::Frozen {
                op,
                container: "Array",
            })
        } else {
            Ok(())
        }
    }

    /// Check `v` against the constraint for position `pos`. `added` is the
    /// number of elements the operation appends.
    fn assert_type(&self, pos: usize, v: &Value, added: usize) -> Result<(), ValueError> {
        let Some(typ) = &self.typ else {
            return Ok(());
        };
        let size = self.elements.len() + added;
        let (bounds, slot) = match typ {
            Value::SizedArray(t) => (t.bounds(), t.element()),
            Value::Tuple(t) => (t.bounds(), t.slot(pos).unwrap_or(&Value::AnyType)),
            _ => return Ok(()),
        };
        if size > bounds.max {
            return Err(ValueError::size(typ, size));
        }
        if slot.is_instance(v) {
            Ok(())
        } else {
            Err(ValueError::mismatch(slot, v))
        }
    }

    fn assert_shrink(&self) -> Result<(), ValueError> {
        let Some(typ) = &self.typ else {
            return Ok(());
        };
        let size = self.elements.len().saturating_sub(1);
        let min = match typ {
            Value::SizedArray(t) => t.bounds().min,
            Value::Tuple(t) => t.bounds().min,
            _ => 0,
        };
        if size < min {
            Err(ValueError::size(typ, size))
        } else {
            Ok(())
        }
    }

    /// Tuple slots are positional, so an insertion or removal that shifts
    /// elements must leave every shifted element in a slot that accepts it.
    fn assert_reshaped(&self) -> Result<(), ValueError> {
        match &self.typ {
            Some(typ @ Value::Tuple(_))
                if !array_instance(&mut RecursionGuard::new(), typ, &self.elements) =>
            {
                Err(ValueError::mismatch(typ, &Value::from(Array::from_vec(self.elements.clone()))))
            }
            _ => Ok(()),
        }
    }

    /// Append `v`.
    pub fn add(&mut self, v: Value) -> Result<(), ValueError> {
        self.assert_mutable("Add")?;
        self.assert_type(self.elements.len(), &v, 1)?;
        self.elements.push(v);
        Ok(())
    }

    /// Append every value of `values`. Nothing is appended if any fails.
    pub fn add_all(&mut self, values: &[Value]) -> Result<(), ValueError> {
        self.assert_mutable("AddAll")?;
        let start = self.elements.len();
        for (i, v) in values.iter().enumerate() {
            self.assert_type(start + i, v, i + 1)?;
        }
        self.elements.extend_from_slice(values);
        Ok(())
    }

    /// Insert `v` at `pos`, shifting later elements right.
    pub fn insert(&mut self, pos: usize, v: Value) -> Result<(), ValueError> {
        self.assert_mutable("Insert")?;
        if pos > self.elements.len() {
            return Err(self.out_of_bounds(pos));
        }
        self.assert_type(pos, &v, 1)?;
        self.elements.insert(pos, v);
        if let Err(err) = self.assert_reshaped() {
            self.elements.remove(pos);
            return Err(err);
        }
        Ok(())
    }

    /// Replace the element at `pos`, returning the previous one.
    pub fn set(&mut self, pos: usize, v: Value) -> Result<Value, ValueError> {
        self.assert_mutable("Set")?;
        if pos >= self.elements.len() {
            return Err(self.out_of_bounds(pos));
        }
        self.assert_type(pos, &v, 0)?;
        Ok(std::mem::replace(&mut self.elements[pos], v))
    }

    /// Remove and return the element at `pos`. Returns `None` when `pos` is
    /// out of range.
    pub fn remove(&mut self, pos: usize) -> Result<Option<Value>, ValueError> {
        self.assert_mutable("Remove")?;
        self.remove_pos(pos)
    }

    /// Remove the first element equal to `v`.
    pub fn remove_value(&mut self, v: &Value) -> Result<bool, ValueError> {
        self.assert_mutable("RemoveValue")?;
        match self.index_of(v) {
            Some(pos) => self.remove_pos(pos).map(|r| r.is_some()),
            None => Ok(false),
        }
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Result<Option<Value>, ValueError> {
        self.assert_mutable("Pop")?;
        match self.elements.len() {
            0 => Ok(None),
            n => self.remove_pos(n - 1),
        }
    }

    fn remove_pos(&mut self, pos: usize) -> Result<Option<Value>, ValueError> {
        if pos >= self.elements.len() {
            return Ok(None);
        }
        self.assert_shrink()?;
        let removed = self.elements.remove(pos);
        if let Err(err) = self.assert_reshaped() {
            self.elements.insert(pos, removed);
            return Err(err);
        }
        Ok(Some(removed))
    }

    /// Constrain the array by `typ`, which must accept the current content.
    /// The default array type removes the constraint.
    pub fn set_type(&mut self, typ: Value) -> Result<(), ValueError> {
        self.assert_mutable("SetType")?;
        match typ {
            Value::ArrayType => {
                self.typ = None;
                Ok(())
            }
            Value::SizedArray(_) | Value::Tuple(_) => {
                if array_instance(&mut RecursionGuard::new(), &typ, &self.elements) {
                    self.typ = Some(typ);
                    Ok(())
                } else {
                    Err(ValueError::mismatch(&typ, &Value::from(self.clone())))
                }
            }
            other => Err(ValueError::IllegalArgument {
                name: "set_type",
                index: 0,
                expected: "array type",
                actual: other,
            }),
        }
    }

    fn out_of_bounds(&self, index: usize) -> ValueError {
        ValueError::IndexOutOfBounds {
            index,
            len: self.elements.len(),
        }
    }

    // === Derived arrays ===
    //
    // Each of these returns a new array with the frozen state of the receiver.
    // A frozen result holds only frozen elements.

    fn derive(&self, elements: Vec<Value>, keep_type: bool) -> Array {
        let elements = if self.frozen {
            elements.iter().map(Value::frozen_copy).collect()
        } else {
            elements
        };
        Array {
            elements,
            typ: if keep_type { self.typ.clone() } else { None },
            frozen: self.frozen,
        }
    }

    /// A copy with `v` appended.
    pub fn with(&self, v: Value) -> Result<Array, ValueError> {
        self.assert_type(self.elements.len(), &v, 1)?;
        let mut elements = self.elements.clone();
        elements.push(v);
        Ok(self.derive(elements, true))
    }

    /// A copy with `values` appended.
    pub fn with_all(&self, values: &[Value]) -> Result<Array, ValueError> {
        let start = self.elements.len();
        for (i, v) in values.iter().enumerate() {
            self.assert_type(start + i, v, i + 1)?;
        }
        let mut elements = self.elements.clone();
        elements.extend_from_slice(values);
        Ok(self.derive(elements, true))
    }

    /// Untyped array of `mapper` results.
    pub fn map(&self, mapper: impl FnMut(&Value) -> Value) -> Array {
        self.derive(self.elements.iter().map(mapper).collect(), false)
    }

    pub fn select(&self, mut predicate: impl FnMut(&Value) -> bool) -> Array {
        let kept = self.elements.iter().filter(|&e| predicate(e)).cloned().collect();
        self.derive(kept, true)
    }

    pub fn reject(&self, mut predicate: impl FnMut(&Value) -> bool) -> Array {
        self.select(|e| !predicate(e))
    }

    /// Stable sort by [`Value::total_cmp`].
    pub fn sort(&self) -> Array {
        let mut sorted = self.elements.clone();
        sorted.sort_by(Value::total_cmp);
        self.derive(sorted, true)
    }

    /// First occurrences of each distinct element, in order.
    pub fn unique(&self) -> Array {
        let mut seen = crate::table::OrderedTable::with_capacity(self.elements.len());
        for e in &self.elements {
            if !seen.contains_key(e) {
                seen.insert(e.clone(), ());
            }
        }
        self.derive(seen.keys().cloned().collect(), true)
    }

    /// Nested arrays spliced into their parent, recursively.
    pub fn flatten(&self) -> Array {
        fn splice(elements: &[Value], out: &mut Vec<Value>) {
            for e in elements {
                match e {
                    Value::Array(a) => splice(&a.elements, out),
                    other => out.push(other.clone()),
                }
            }
        }
        let mut out = Vec::with_capacity(self.elements.len());
        splice(&self.elements, &mut out);
        self.derive(out, false)
    }

    /// Elements `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> Result<Array, ValueError> {
        if start > end {
            return Err(self.out_of_bounds(start));
        }
        match self.elements.get(start..end) {
            Some(part) => Ok(self.derive(part.to_vec(), false)),
            None => Err(self.out_of_bounds(end)),
        }
    }

    /// Map from alternating keys and values. A trailing key maps to nil.
    pub fn to_map(&self) -> Map {
        let pairs = self
            .elements
            .chunks(2)
            .map(|c| (c[0].clone(), c.get(1).cloned().unwrap_or(Value::Nil)));
        self.finish_map(Map::from_pairs(pairs))
    }

    /// Map from map entries or two-element arrays. `None` if any element is
    /// neither.
    pub fn to_map_from_entries(&self) -> Option<Map> {
        let mut pairs = Vec::with_capacity(self.elements.len());
        for e in &self.elements {
            match e {
                Value::Entry(entry) => pairs.push((entry.key().clone(), entry.value().clone())),
                Value::Array(a) if a.len() == 2 => {
                    pairs.push((a.elements[0].clone(), a.elements[1].clone()));
                }
                _ => return None,
            }
        }
        Some(self.finish_map(Map::from_pairs(pairs)))
    }

    fn finish_map(&self, mut m: Map) -> Map {
        if self.frozen {
            m.freeze();
        }
        m
    }

    // === Freezing ===

    /// Freeze the array and every nested mutable element.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        for e in &mut self.elements {
            e.freeze();
        }
    }

    /// A copy in the requested state. A frozen copy freezes copies of nested
    /// mutable elements; a mutable copy is shallow.
    pub fn copy(&self, frozen: bool) -> Array {
        let elements = if frozen {
            self.elements.iter().map(Value::frozen_copy).collect()
        } else {
            self.elements.clone()
        };
        Array {
            elements,
            typ: self.typ.clone(),
            frozen,
        }
    }

    pub fn frozen_copy(&self) -> Array {
        if self.frozen {
            self.clone()
        } else {
            self.copy(true)
        }
    }

    pub(crate) fn elements_mut(&mut self) -> &mut Vec<Value> {
        &mut self.elements
    }

    // === Kernel ===

    pub(crate) fn shape(&self) -> TupleShape<'_> {
        TupleShape::new(&self.elements, false)
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &Array) -> bool {
        slice_equal(guard, &self.elements, &other.elements)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        self.elements
            .iter()
            .fold(1, |h, e| mix(h, deep_hash(seen, e)))
    }

    /// Lexicographic order. `None` when a pair of elements at the same
    /// position is not comparable.
    pub fn compare_to(&self, other: &Array) -> Option<Ordering> {
        for (a, b) in self.elements.iter().zip(&other.elements) {
            match a.compare_to(b)? {
                Ordering::Equal => {}
                ord => return Some(ord),
            }
        }
        Some(self.elements.len().cmp(&other.elements.len()))
    }
}

impl DeepAssignable for Array {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Array(other) => slice_equal(guard, &self.elements, &other.elements),
            Value::SizedArray(t) => {
                let n = self.elements.len();
                t.bounds().min == n
                    && t.bounds().max == n
                    && self
                        .elements
                        .iter()
                        .all(|e| assignable_with(guard, e, t.element()))
            }
            Value::Tuple(t) => tuple_assignable_tuple(guard, self.shape(), t.shape()),
            _ => reverse(guard, candidate, declared),
        }
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Array::from_vec(iter.into_iter().collect())
    }
}
