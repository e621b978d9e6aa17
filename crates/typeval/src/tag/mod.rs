//! Variant identifiers for tag-driven dispatch and total ordering.
//!
//! Every [`Value`](crate::Value) reports a `Tag`. Tags serve three roles:
//! - breaking ties when two values of different variants must be ordered
//!   (the declaration order below *is* the order),
//! - keying the stringification dispatch table,
//! - selecting the family a default type accepts in the assignability fast path.
//!
//! # Tag Ranges
//!
//! - 0-1: Nil and Any
//! - 2-4: Boolean
//! - 5-10: Integer and Float
//! - 11-20: Binary, String, Regexp
//! - 21-22: Native
//! - 23-31: Containers
//! - 32-35: Combinators
//! - 36-39: Sensitive, Time, Named

use std::fmt;

use crate::flags::TypeFlags;

/// Variant discriminant, ordered.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Tag {
    /// The nil value (its own type).
    Nil = 0,
    /// The type accepting everything.
    Any = 1,

    /// Default boolean type.
    Boolean = 2,
    /// The `false` value.
    False = 3,
    /// The `true` value.
    True = 4,

    /// Default integer type.
    Integer = 5,
    /// A single integer.
    IntegerExact = 6,
    /// `min..max` integer range.
    IntegerRange = 7,
    /// Default float type.
    Float = 8,
    /// A single float.
    FloatExact = 9,
    /// `min..max` float range.
    FloatRange = 10,

    /// Default binary type.
    Binary = 11,
    /// A byte sequence.
    BinaryExact = 12,
    /// Binary with a length bound.
    BinarySized = 13,
    /// Default string type.
    String = 14,
    /// A single string.
    StringExact = 15,
    /// String with a length bound.
    StringSized = 16,
    /// Strings matching a regular expression.
    StringPattern = 17,
    /// A single string compared without case.
    CiString = 18,
    /// Default regexp type.
    Regexp = 19,
    /// A compiled regular expression.
    RegexpExact = 20,

    /// Host value type, optionally restricted by name.
    Native = 21,
    /// A host value.
    NativeExact = 22,

    /// Default array type.
    Array = 23,
    /// A concrete array.
    ArrayExact = 24,
    /// Array with element type and length bound.
    ArraySized = 25,
    /// Positional array type.
    Tuple = 26,
    /// Default map type.
    Map = 27,
    /// A concrete map.
    MapExact = 28,
    /// Map with key/value types and size bound.
    MapSized = 29,
    /// A single key/value pair.
    MapEntryExact = 30,
    /// Map with a declared field shape.
    Struct = 31,

    /// Complement of a type.
    Not = 32,
    /// Intersection.
    AllOf = 33,
    /// Union.
    AnyOf = 34,
    /// Exclusive union.
    OneOf = 35,

    /// A wrapped value whose content is hidden from display.
    Sensitive = 36,
    /// Default time type.
    Time = 37,
    /// A single instant.
    TimeExact = 38,
    /// Nominal reference to a late-bound type.
    Named = 39,
}

/// Broad grouping of tags. A default type accepts every member of its family
/// (see [`Tag::family`]).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Family {
    Nil,
    Any,
    Boolean,
    Integer,
    Float,
    Binary,
    String,
    Regexp,
    Native,
    Array,
    Map,
    MapEntry,
    Combinator,
    Sensitive,
    Time,
    Named,
}

impl Tag {
    /// Number of tags.
    pub const COUNT: usize = Tag::Named as usize + 1;

    /// All tags in order.
    pub const ALL: [Tag; Tag::COUNT] = [
        Tag::Nil,
        Tag::Any,
        Tag::Boolean,
        Tag::False,
        Tag::True,
        Tag::Integer,
        Tag::IntegerExact,
        Tag::IntegerRange,
        Tag::Float,
        Tag::FloatExact,
        Tag::FloatRange,
        Tag::Binary,
        Tag::BinaryExact,
        Tag::BinarySized,
        Tag::String,
        Tag::StringExact,
        Tag::StringSized,
        Tag::StringPattern,
        Tag::CiString,
        Tag::Regexp,
        Tag::RegexpExact,
        Tag::Native,
        Tag::NativeExact,
        Tag::Array,
        Tag::ArrayExact,
        Tag::ArraySized,
        Tag::Tuple,
        Tag::Map,
        Tag::MapExact,
        Tag::MapSized,
        Tag::MapEntryExact,
        Tag::Struct,
        Tag::Not,
        Tag::AllOf,
        Tag::AnyOf,
        Tag::OneOf,
        Tag::Sensitive,
        Tag::Time,
        Tag::TimeExact,
        Tag::Named,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human readable label used in diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Any => "any",
            Self::Boolean | Self::False | Self::True => "bool",
            Self::Integer | Self::IntegerExact => "int",
            Self::IntegerRange => "int range",
            Self::Float | Self::FloatExact | Self::FloatRange => "float",
            Self::Binary | Self::BinaryExact | Self::BinarySized => "binary",
            Self::String | Self::StringExact | Self::StringSized | Self::CiString => "string",
            Self::StringPattern => "pattern",
            Self::Regexp | Self::RegexpExact => "regexp",
            Self::Native | Self::NativeExact => "native",
            Self::Array | Self::ArrayExact | Self::ArraySized => "slice",
            Self::Tuple => "tuple",
            Self::Map | Self::MapExact | Self::MapSized => "map",
            Self::MapEntryExact => "map entry",
            Self::Struct => "struct",
            Self::Not => "not",
            Self::AllOf => "all of",
            Self::AnyOf => "any of",
            Self::OneOf => "one of",
            Self::Sensitive => "sensitive",
            Self::Time | Self::TimeExact => "time",
            Self::Named => "named",
        }
    }

    pub const fn family(self) -> Family {
        match self {
            Self::Nil => Family::Nil,
            Self::Any => Family::Any,
            Self::Boolean | Self::False | Self::True => Family::Boolean,
            Self::Integer | Self::IntegerExact | Self::IntegerRange => Family::Integer,
            Self::Float | Self::FloatExact | Self::FloatRange => Family::Float,
            Self::Binary | Self::BinaryExact | Self::BinarySized => Family::Binary,
            Self::String
            | Self::StringExact
            | Self::StringSized
            | Self::StringPattern
            | Self::CiString => Family::String,
            Self::Regexp | Self::RegexpExact => Family::Regexp,
            Self::Native | Self::NativeExact => Family::Native,
            Self::Array | Self::ArrayExact | Self::ArraySized | Self::Tuple => Family::Array,
            Self::Map | Self::MapExact | Self::MapSized | Self::Struct => Family::Map,
            Self::MapEntryExact => Family::MapEntry,
            Self::Not | Self::AllOf | Self::AnyOf | Self::OneOf => Family::Combinator,
            Self::Sensitive => Family::Sensitive,
            Self::Time | Self::TimeExact => Family::Time,
            Self::Named => Family::Named,
        }
    }

    /// Whether values with this tag denote exactly one instance.
    pub const fn is_exact(self) -> bool {
        self.flags().contains(TypeFlags::EXACT)
    }

    /// Whether this tag is the unconstrained type of its family.
    pub const fn is_default(self) -> bool {
        self.flags().contains(TypeFlags::DEFAULT)
    }

    /// Capability flags for this tag.
    pub const fn flags(self) -> TypeFlags {
        match self {
            Self::Nil | Self::False | Self::True => TypeFlags::EXACT,
            Self::IntegerExact
            | Self::FloatExact
            | Self::BinaryExact
            | Self::StringExact
            | Self::RegexpExact
            | Self::NativeExact
            | Self::TimeExact => TypeFlags::EXACT,
            Self::Any
            | Self::Boolean
            | Self::Integer
            | Self::Float
            | Self::Binary
            | Self::String
            | Self::Regexp
            | Self::Time => TypeFlags::DEFAULT,
            // An unrestricted native type is the default; a named one is not,
            // which is decided per value.
            Self::Native => TypeFlags::empty(),
            Self::Array | Self::Map => TypeFlags::DEFAULT.union(TypeFlags::CONTAINER),
            Self::IntegerRange | Self::FloatRange | Self::BinarySized | Self::StringSized => {
                TypeFlags::SIZED
            }
            Self::StringPattern | Self::CiString => TypeFlags::empty(),
            Self::ArrayExact | Self::MapExact => TypeFlags::EXACT
                .union(TypeFlags::CONTAINER)
                .union(TypeFlags::DEEP_ASSIGNABLE),
            Self::MapEntryExact => TypeFlags::EXACT,
            Self::ArraySized | Self::MapSized => TypeFlags::SIZED
                .union(TypeFlags::CONTAINER)
                .union(TypeFlags::DEEP_ASSIGNABLE),
            Self::Tuple | Self::Struct => {
                TypeFlags::CONTAINER.union(TypeFlags::DEEP_ASSIGNABLE)
            }
            Self::Not => TypeFlags::COMBINATOR.union(TypeFlags::DEEP_ASSIGNABLE),
            Self::AllOf | Self::AnyOf | Self::OneOf => TypeFlags::COMBINATOR
                .union(TypeFlags::DEEP_ASSIGNABLE)
                .union(TypeFlags::REVERSE_ASSIGNABLE),
            Self::Sensitive => TypeFlags::DEEP_ASSIGNABLE,
            Self::Named => TypeFlags::DEEP_ASSIGNABLE.union(TypeFlags::REVERSE_ASSIGNABLE),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Labels are shared between tags, so Debug uses the variant index.
        write!(f, "Tag({}:{})", *self as u8, self.label())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const _: () = assert!(std::mem::size_of::<Tag>() == 1);

#[cfg(test)]
mod tests;
