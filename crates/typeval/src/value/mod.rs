//! The universal value.
//!
//! # Values Are Types
//!
//! Every `Value` is both an instance and a type. Exact variants (`Int`,
//! `Str`, `Array`, ...) denote a single literal and accept only values equal
//! to themselves. Type variants (`IntegerType`, `SizedArray`, `Logical`, ...)
//! accept a set of instances. Both sides answer the same questions: tag,
//! hash code, equality, assignability, generic form, stringification.
//!
//! # Allocation
//!
//! Payloads that are not `Copy` live behind [`Heap`]. Heap payloads are
//! allocated only through the factories on `Value` and in the type factory
//! functions, never with `Heap::new` outside this crate:
//!
//! ```text
//! let s = Value::string("hello");               // OK
//! let a = Value::array(vec![Value::Int(1)]);    // OK, frozen
//! let t = types::array_type(Value::StringType, 1, 2);
//! ```
//!
//! # Frozen and Mutable
//!
//! Arrays and maps carry a `frozen` flag. A frozen container is immutable and
//! its `Heap` may be shared by any number of holders. A mutable container is
//! reached through `Heap::make_mut`, so mutating a handle whose payload is
//! shared first detaches a private copy. Everything other than arrays, maps,
//! and entries or sensitive wrappers holding them is always frozen.

mod heap;
mod scalar;

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::array::{Array, SizedArrayType, TupleType};
use crate::flags::TypeFlags;
use crate::guard::{RecursionGuard, Seen};
use crate::kernel;
use crate::map::{Map, MapEntry, SizedMapType};
use crate::structs::StructType;
use crate::tag::Tag;
use crate::types::float::FloatRange;
use crate::types::integer::IntegerRange;
use crate::types::logical::{Logical, LogicalOp, Negation};
use crate::types::named::NamedType;
use crate::types::sensitive::Sensitive;
use crate::ValueError;

pub use heap::Heap;
pub use scalar::{Bounds, HString, NativeValue, RegexpValue};

/// A value or a type.
#[derive(Clone)]
pub enum Value {
    // === Exact values ===
    /// The nil value.
    Nil,
    /// `true` or `false`.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// An immutable string.
    Str(Heap<HString>),
    /// An immutable byte sequence.
    Binary(Heap<Vec<u8>>),
    /// A compiled regular expression.
    Regexp(Heap<RegexpValue>),
    /// An instant with its original offset.
    Time(DateTime<FixedOffset>),
    /// A host value.
    Native(Heap<dyn NativeValue>),
    /// An ordered sequence, frozen or mutable.
    Array(Heap<Array>),
    /// An insertion ordered map, frozen or mutable.
    Map(Heap<Map>),
    /// A key/value pair.
    Entry(Heap<MapEntry>),
    /// A wrapped value or type that is never displayed.
    Sensitive(Heap<Sensitive>),

    // === Scalar types ===
    /// Accepts everything.
    AnyType,
    BooleanType,
    IntegerType,
    IntegerRange(IntegerRange),
    FloatType,
    FloatRange(FloatRange),
    BinaryType,
    SizedBinaryType(Bounds),
    StringType,
    /// Strings whose character count lies within the bounds.
    SizedStringType(Bounds),
    /// Strings matching the expression.
    PatternType(Heap<RegexpValue>),
    /// Strings equal to the (lowercased) payload when case is ignored.
    CiStringType(Heap<HString>),
    RegexpType,
    TimeType,
    /// Host values, optionally only those of the named host type.
    NativeType(Option<Heap<str>>),

    // === Container types ===
    ArrayType,
    SizedArray(Heap<SizedArrayType>),
    Tuple(Heap<TupleType>),
    MapType,
    SizedMap(Heap<SizedMapType>),
    Struct(Heap<StructType>),

    // === Combinators ===
    Not(Heap<Negation>),
    Logical(Heap<Logical>),

    /// A named reference, bound to its target during alias resolution.
    Named(Heap<NamedType>),
}

impl Value {
    // === Factories ===

    /// Create a string value.
    ///
    /// ```text
    /// let s = Value::string("hello");
    /// ```
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(HString::new(s)))
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Value::Binary(Heap::new(bytes.into()))
    }

    /// Compile a regular expression value.
    pub fn regexp(pattern: &str) -> Result<Self, ValueError> {
        RegexpValue::compile(pattern)
            .map(|re| Value::Regexp(Heap::new(re)))
            .map_err(|e| ValueError::pattern(pattern, &e))
    }

    /// Wrap a host value.
    pub fn native<N: NativeValue>(native: N) -> Self {
        let arc: Arc<dyn NativeValue> = Arc::new(native);
        Value::Native(Heap::from_arc(arc))
    }

    /// A frozen array holding frozen copies of `elements`.
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Heap::new(Array::frozen_from(elements)))
    }

    /// A mutable, untyped array owning `elements`.
    pub fn mutable_array(elements: Vec<Value>) -> Self {
        Value::Array(Heap::new(Array::from_vec(elements)))
    }

    /// A frozen map built from key/value pairs, later pairs replacing earlier ones.
    pub fn map<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let mut m = Map::from_pairs(pairs);
        m.freeze();
        Value::Map(Heap::new(m))
    }

    pub fn entry(key: Value, value: Value) -> Self {
        Value::Entry(Heap::new(MapEntry::new(key, value)))
    }

    /// Wrap a value so its content is redacted from display.
    pub fn sensitive(wrapped: Value) -> Self {
        Value::Sensitive(Heap::new(Sensitive::new(wrapped)))
    }

    // === Identity ===

    /// The variant identifier.
    pub fn tag(&self) -> Tag {
        match self {
            Value::Nil => Tag::Nil,
            Value::Bool(false) => Tag::False,
            Value::Bool(true) => Tag::True,
            Value::Int(_) => Tag::IntegerExact,
            Value::Float(_) => Tag::FloatExact,
            Value::Str(_) => Tag::StringExact,
            Value::Binary(_) => Tag::BinaryExact,
            Value::Regexp(_) => Tag::RegexpExact,
            Value::Time(_) => Tag::TimeExact,
            Value::Native(_) => Tag::NativeExact,
            Value::Array(_) => Tag::ArrayExact,
            Value::Map(_) => Tag::MapExact,
            Value::Entry(_) => Tag::MapEntryExact,
            Value::Sensitive(_) => Tag::Sensitive,
            Value::AnyType => Tag::Any,
            Value::BooleanType => Tag::Boolean,
            Value::IntegerType => Tag::Integer,
            Value::IntegerRange(_) => Tag::IntegerRange,
            Value::FloatType => Tag::Float,
            Value::FloatRange(_) => Tag::FloatRange,
            Value::BinaryType => Tag::Binary,
            Value::SizedBinaryType(_) => Tag::BinarySized,
            Value::StringType => Tag::String,
            Value::SizedStringType(_) => Tag::StringSized,
            Value::PatternType(_) => Tag::StringPattern,
            Value::CiStringType(_) => Tag::CiString,
            Value::RegexpType => Tag::Regexp,
            Value::TimeType => Tag::Time,
            Value::NativeType(_) => Tag::Native,
            Value::ArrayType => Tag::Array,
            Value::SizedArray(_) => Tag::ArraySized,
            Value::Tuple(_) => Tag::Tuple,
            Value::MapType => Tag::Map,
            Value::SizedMap(_) => Tag::MapSized,
            Value::Struct(_) => Tag::Struct,
            Value::Not(_) => Tag::Not,
            Value::Logical(l) => match l.op() {
                LogicalOp::AllOf => Tag::AllOf,
                LogicalOp::AnyOf => Tag::AnyOf,
                LogicalOp::OneOf => Tag::OneOf,
            },
            Value::Named(_) => Tag::Named,
        }
    }

    #[inline]
    pub fn flags(&self) -> TypeFlags {
        self.tag().flags()
    }

    /// Whether this value denotes exactly one instance.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.tag().is_exact()
    }

    /// The exact type of this value, which is the value itself.
    #[inline]
    pub fn exact_type(&self) -> &Value {
        self
    }

    /// Heap address of the payload, or 0 for inline variants.
    pub fn addr(&self) -> usize {
        match self {
            Value::Str(h) | Value::CiStringType(h) => h.addr(),
            Value::Binary(h) => h.addr(),
            Value::Regexp(h) | Value::PatternType(h) => h.addr(),
            Value::Native(h) => h.addr(),
            Value::NativeType(Some(h)) => h.addr(),
            Value::Array(h) => h.addr(),
            Value::Map(h) => h.addr(),
            Value::Entry(h) => h.addr(),
            Value::Sensitive(h) => h.addr(),
            Value::SizedArray(h) => h.addr(),
            Value::Tuple(h) => h.addr(),
            Value::SizedMap(h) => h.addr(),
            Value::Struct(h) => h.addr(),
            Value::Not(h) => h.addr(),
            Value::Logical(h) => h.addr(),
            Value::Named(h) => h.addr(),
            _ => 0,
        }
    }

    /// Whether both values share the same heap payload.
    #[inline]
    pub fn same_ref(&self, other: &Value) -> bool {
        let a = self.addr();
        a != 0 && a == other.addr()
    }

    // === Kernel entry points ===

    /// Structural hash code. Equal values have equal hash codes.
    pub fn hash_code(&self) -> u64 {
        kernel::hash::deep_hash(&mut Seen::new(), self)
    }

    /// Structural equality, safe on cyclic graphs.
    pub fn equals(&self, other: &Value) -> bool {
        kernel::equal::deep_equal(&mut RecursionGuard::new(), self, other)
    }

    /// Partial order between comparable values.
    pub fn compare_to(&self, other: &Value) -> Option<Ordering> {
        kernel::compare::compare(self, other)
    }

    /// Total order: [`compare_to`](Self::compare_to) where defined, otherwise
    /// by tag, then by hash code.
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        kernel::compare::total_cmp(self, other)
    }

    /// Whether a value of type `candidate` may be stored where `self` is declared.
    pub fn assignable(&self, candidate: &Value) -> bool {
        crate::assign::assignable(self, candidate)
    }

    /// Whether `value` is an instance of this type.
    #[inline]
    pub fn is_instance(&self, value: &Value) -> bool {
        self.assignable(value)
    }

    /// Canonical type string, as produced by the stringification table.
    pub fn type_string(&self) -> String {
        crate::stringer::type_string(self)
    }

    /// Type string of this value's generic form, used in diagnostics.
    pub fn type_label(&self) -> String {
        crate::stringer::type_string(&crate::generic::generic(self))
    }

    // === Accessors ===

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Mutable access to an array's payload, detaching it from other holders.
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(a) => Some(a.make_mut()),
            _ => None,
        }
    }

    /// Mutable access to a map's payload, detaching it from other holders.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m.make_mut()),
            _ => None,
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(Heap::new(a))
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(Heap::new(m))
    }
}

impl From<MapEntry> for Value {
    fn from(e: MapEntry) -> Self {
        Value::Entry(Heap::new(e))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_code());
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::stringer::type_string(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.tag(), crate::stringer::type_string(self))
    }
}
