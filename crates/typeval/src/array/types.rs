//! Sized array types and tuple types.

use crate::assign::{assignable_with, reverse, DeepAssignable};
use crate::error::check_arity;
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::{deep_equal, slice_equal};
use crate::kernel::hash::{deep_hash, mix};
use crate::tag::Tag;
use crate::types::logical::union_of_distinct;
use crate::value::{Bounds, Heap};
use crate::{Value, ValueError};

/// Arrays of `element` whose length lies within `bounds`.
#[derive(Clone, Debug)]
pub struct SizedArrayType {
    element: Value,
    bounds: Bounds,
}

impl SizedArrayType {
    #[inline]
    pub fn element(&self) -> &Value {
        &self.element
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub(crate) fn element_mut(&mut self) -> &mut Value {
        &mut self.element
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &SizedArrayType) -> bool {
        self.bounds == other.bounds && deep_equal(guard, &self.element, &other.element)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        let mut h = mix(Tag::ArraySized as u64, self.bounds.hash_code());
        if !matches!(self.element, Value::AnyType) {
            h = mix(h, deep_hash(seen, &self.element));
        }
        h
    }
}

impl DeepAssignable for SizedArrayType {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Array(a) => {
                self.bounds.contains(a.len())
                    && a.iter().all(|e| assignable_with(guard, &self.element, e))
            }
            Value::SizedArray(o) => {
                self.bounds.contains_bounds(o.bounds)
                    && assignable_with(guard, &self.element, &o.element)
            }
            Value::Tuple(t) => {
                self.bounds.contains_bounds(t.bounds())
                    && t.types.iter().all(|s| assignable_with(guard, &self.element, s))
            }
            _ => reverse(guard, candidate, declared),
        }
    }
}

/// Positional element types. When `variadic`, the last type applies to
/// every position from its own onwards, including none.
#[derive(Clone, Debug)]
pub struct TupleType {
    types: Vec<Value>,
    variadic: bool,
}

impl TupleType {
    #[inline]
    pub fn types(&self) -> &[Value] {
        &self.types
    }

    #[inline]
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    pub fn bounds(&self) -> Bounds {
        self.shape().bounds()
    }

    /// Type of position `pos`, if the tuple has one.
    pub fn slot(&self, pos: usize) -> Option<&Value> {
        self.shape().slot(pos)
    }

    /// Union of the distinct slot types.
    pub fn element_type(&self) -> Value {
        union_of_distinct(&self.types)
    }

    pub(crate) fn types_mut(&mut self) -> &mut Vec<Value> {
        &mut self.types
    }

    pub(crate) fn shape(&self) -> TupleShape<'_> {
        TupleShape::new(&self.types, self.variadic)
    }

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &TupleType) -> bool {
        self.variadic == other.variadic && slice_equal(guard, &self.types, &other.types)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        let seed = if self.variadic { 7 } else { 1 };
        self.types
            .iter()
            .fold(seed, |h, t| mix(h, deep_hash(seen, t)))
    }
}

impl DeepAssignable for TupleType {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Array(a) => tuple_instance(guard, self.shape(), a.as_slice()),
            Value::Tuple(o) => tuple_assignable_tuple(guard, self.shape(), o.shape()),
            Value::SizedArray(o) => tuple_assignable_array(guard, self.shape(), o),
            _ => reverse(guard, candidate, declared),
        }
    }
}

/// Borrowed view of anything with positional slot types: a tuple type, or
/// an exact array whose elements are its slots.
#[derive(Copy, Clone)]
pub(crate) struct TupleShape<'a> {
    types: &'a [Value],
    variadic: bool,
}

impl<'a> TupleShape<'a> {
    pub(crate) fn new(types: &'a [Value], variadic: bool) -> Self {
        TupleShape { types, variadic }
    }

    /// Number of slots before the variadic tail.
    fn fixed(self) -> usize {
        if self.variadic {
            self.types.len().saturating_sub(1)
        } else {
            self.types.len()
        }
    }

    fn tail(self) -> Option<&'a Value> {
        if self.variadic {
            self.types.last()
        } else {
            None
        }
    }

    pub(crate) fn bounds(self) -> Bounds {
        if self.variadic {
            Bounds::new(self.fixed(), usize::MAX)
        } else {
            Bounds::new(self.types.len(), self.types.len())
        }
    }

    pub(crate) fn slot(self, pos: usize) -> Option<&'a Value> {
        if pos < self.fixed() {
            self.types.get(pos)
        } else {
            self.tail()
        }
    }
}

/// Whether `elements` fit the slots of `t`.
pub(crate) fn tuple_instance(guard: &mut RecursionGuard, t: TupleShape<'_>, elements: &[Value]) -> bool {
    if !t.bounds().contains(elements.len()) {
        return false;
    }
    elements.iter().enumerate().all(|(i, e)| match t.slot(i) {
        Some(slot) => assignable_with(guard, slot, e),
        None => false,
    })
}

/// Slot-wise assignability of tuple shapes. Positions past a fixed prefix
/// compare against the other side's variadic tail.
pub(crate) fn tuple_assignable_tuple(guard: &mut RecursionGuard, t: TupleShape<'_>, o: TupleShape<'_>) -> bool {
    if !t.bounds().contains_bounds(o.bounds()) {
        return false;
    }
    let n = t.fixed().max(o.fixed());
    (0..n).all(|i| match (t.slot(i), o.slot(i)) {
        (Some(te), Some(oe)) => assignable_with(guard, te, oe),
        _ => false,
    }) && match (t.tail(), o.tail()) {
        (Some(tv), Some(ov)) => assignable_with(guard, tv, ov),
        _ => true,
    }
}

fn tuple_assignable_array(guard: &mut RecursionGuard, t: TupleShape<'_>, o: &SizedArrayType) -> bool {
    t.bounds().contains_bounds(o.bounds)
        && t.types.iter().all(|slot| assignable_with(guard, slot, &o.element))
}

/// Whether `typ` (the default, sized, or tuple array type) accepts `elements`.
pub(crate) fn array_instance(guard: &mut RecursionGuard, typ: &Value, elements: &[Value]) -> bool {
    match typ {
        Value::ArrayType => true,
        Value::SizedArray(t) => {
            t.bounds.contains(elements.len())
                && elements.iter().all(|e| assignable_with(guard, &t.element, e))
        }
        Value::Tuple(t) => tuple_instance(guard, t.shape(), elements),
        _ => false,
    }
}

/// Arrays of `element` with `min..=max` elements. An `Any` element type
/// without bounds is the default array type.
pub fn array_type(element: Value, min: usize, max: usize) -> Value {
    let bounds = Bounds::new(min, max);
    if bounds.is_unbounded() && matches!(element, Value::AnyType) {
        Value::ArrayType
    } else {
        Value::SizedArray(Heap::new(SizedArrayType { element, bounds }))
    }
}

/// Array type from a factory argument list:
///
/// - `()` is the default array type,
/// - `(T)` or `(min)`,
/// - `(T, min)` or `(min, max)`,
/// - `(T, min, max)`.
pub fn array_type_from_args(args: &[Value]) -> Result<Value, ValueError> {
    check_arity("array", args, 0, 3)?;
    let sized = |element: Value, min: i64, max: Option<i64>| match max {
        Some(max) => {
            let b = Bounds::from_signed(min, max);
            array_type(element, b.min, b.max)
        }
        None => array_type(element, usize::try_from(min).unwrap_or(0), usize::MAX),
    };
    match args {
        [] => Ok(Value::ArrayType),
        [Value::Int(min)] => Ok(sized(Value::AnyType, *min, None)),
        [t] => Ok(array_type(t.clone(), 0, usize::MAX)),
        [Value::Int(min), Value::Int(max)] => Ok(sized(Value::AnyType, *min, Some(*max))),
        [t, Value::Int(min)] => Ok(sized(t.clone(), *min, None)),
        [t, Value::Int(min), Value::Int(max)] => Ok(sized(t.clone(), *min, Some(*max))),
        [_, Value::Int(_), other] => Err(illegal(2, other)),
        [_, other, ..] => Err(illegal(1, other)),
        // Arity is checked above.
        _ => Ok(Value::ArrayType),
    }
}

fn illegal(index: usize, actual: &Value) -> ValueError {
    ValueError::IllegalArgument {
        name: "array",
        index,
        expected: "int",
        actual: actual.clone(),
    }
}

/// A fixed-length tuple of `types`.
pub fn tuple_type(types: Vec<Value>) -> Value {
    Value::Tuple(Heap::new(TupleType {
        types,
        variadic: false,
    }))
}

/// A tuple whose last type repeats zero or more times.
pub fn variadic_tuple_type(types: Vec<Value>) -> Result<Value, ValueError> {
    if types.is_empty() {
        return Err(ValueError::ArityMismatch {
            name: "variadic tuple",
            expected: crate::error::Arity::AtLeast(1),
            got: 0,
        });
    }
    Ok(Value::Tuple(Heap::new(TupleType {
        types,
        variadic: true,
    })))
}

/// The tuple accepting any array: `{...any}`.
pub fn default_tuple_type() -> Value {
    Value::Tuple(Heap::new(TupleType {
        types: vec![Value::AnyType],
        variadic: true,
    }))
}
