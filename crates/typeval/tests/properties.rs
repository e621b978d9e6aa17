//! Property-based tests for the type/value algebra.
//!
//! Random values and random type trees are generated and checked against
//! the laws every implementation of the algebra must keep:
//! 1. Assignability is reflexive
//! 2. Default types accept their specific subtypes but not the reverse
//! 3. Double negation is the identity
//! 4. Equal values hash alike
//! 5. Map equality ignores insertion order
//! 6. Freezing a frozen value returns the same payload
//! 7. The generic form of a value accepts the value

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use typeval::generic;
use typeval::types::{
    all_of, any_of, array_type, integer_range, map_type, not, one_of, pattern, sized_string,
    struct_type, StructEntry,
};
use typeval::Value;

// -- Value Strategies --

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}").expect("valid regex")
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Nil),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        prop::string::string_regex("[a-zA-Z0-9 ]{0,12}")
            .expect("valid regex")
            .prop_map(Value::string),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::array),
            prop::collection::vec((key_strategy(), inner), 0..4).prop_map(|pairs| {
                Value::map(pairs.into_iter().map(|(k, v)| (Value::string(k), v)))
            }),
        ]
    })
}

// -- Type Strategies --

/// A buildable description of a type tree. Building twice yields two
/// structurally equal types that share no payload.
#[derive(Clone, Debug)]
enum TypeSpec {
    Any,
    Int,
    Str,
    Bool,
    Exact(i64),
    IntRange(i64, i64),
    SizedString(usize, usize),
    Pattern,
    AnyOf(Vec<TypeSpec>),
    AllOf(Vec<TypeSpec>),
    OneOf(Vec<TypeSpec>),
    Not(Box<TypeSpec>),
    Array(Box<TypeSpec>, usize, usize),
    Map(Box<TypeSpec>, Box<TypeSpec>),
    Struct(Vec<(String, TypeSpec, bool)>),
}

impl TypeSpec {
    fn build(&self) -> Value {
        match self {
            TypeSpec::Any => Value::AnyType,
            TypeSpec::Int => Value::IntegerType,
            TypeSpec::Str => Value::StringType,
            TypeSpec::Bool => Value::BooleanType,
            TypeSpec::Exact(i) => Value::Int(*i),
            TypeSpec::IntRange(a, b) => integer_range(*a, *b, true).unwrap(),
            TypeSpec::SizedString(a, b) => sized_string(*a, *b),
            TypeSpec::Pattern => pattern("^[a-z]+$").unwrap(),
            TypeSpec::AnyOf(m) => any_of(m.iter().map(TypeSpec::build).collect()),
            TypeSpec::AllOf(m) => all_of(m.iter().map(TypeSpec::build).collect()),
            TypeSpec::OneOf(m) => one_of(m.iter().map(TypeSpec::build).collect()),
            TypeSpec::Not(t) => not(t.build()),
            TypeSpec::Array(t, a, b) => array_type(t.build(), *a, *b),
            TypeSpec::Map(k, v) => map_type(k.build(), v.build(), 0, usize::MAX),
            TypeSpec::Struct(entries) => {
                let mut built: Vec<StructEntry> = Vec::new();
                for (k, t, required) in entries {
                    if built.iter().any(|e| e.key().as_str() == Some(k.as_str())) {
                        continue;
                    }
                    built.push(if *required {
                        StructEntry::required(k, t.build())
                    } else {
                        StructEntry::optional(k, t.build())
                    });
                }
                struct_type(false, built)
            }
        }
    }
}

fn leaf_type_strategy() -> impl Strategy<Value = TypeSpec> {
    prop_oneof![
        Just(TypeSpec::Any),
        Just(TypeSpec::Int),
        Just(TypeSpec::Str),
        Just(TypeSpec::Bool),
        Just(TypeSpec::Pattern),
        (-100i64..100).prop_map(TypeSpec::Exact),
        (-100i64..100, -100i64..100).prop_map(|(a, b)| TypeSpec::IntRange(a, b)),
        (0usize..5, 0usize..10).prop_map(|(a, b)| TypeSpec::SizedString(a, b)),
    ]
}

fn type_strategy() -> impl Strategy<Value = TypeSpec> {
    leaf_type_strategy().prop_recursive(3, 24, 3, |inner| {
        let members = prop::collection::vec(inner.clone(), 0..3);
        prop_oneof![
            members.clone().prop_map(TypeSpec::AnyOf),
            members.clone().prop_map(TypeSpec::AllOf),
            members.prop_map(TypeSpec::OneOf),
            inner.clone().prop_map(|t| TypeSpec::Not(Box::new(t))),
            (inner.clone(), 0usize..3, 0usize..5)
                .prop_map(|(t, a, b)| TypeSpec::Array(Box::new(t), a, b)),
            (inner.clone(), inner.clone())
                .prop_map(|(k, v)| TypeSpec::Map(Box::new(k), Box::new(v))),
            prop::collection::vec((key_strategy(), inner, any::<bool>()), 0..3)
                .prop_map(TypeSpec::Struct),
        ]
    })
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 1000,
        ..ProptestConfig::default()
    })]

    /// Every value is assignable to itself, and to a thawed copy of itself.
    #[test]
    fn prop_values_are_reflexive(v in value_strategy()) {
        prop_assert!(v.assignable(&v));
        prop_assert!(v.assignable(&v.thawed_copy()));
    }

    /// Two independent builds of a type tree accept each other.
    #[test]
    fn prop_types_are_reflexive(spec in type_strategy()) {
        let a = spec.build();
        let b = spec.build();
        prop_assert!(a.assignable(&b), "{} not assignable to itself", a);
    }

    /// The unconstrained type of a family accepts a constrained one, never
    /// the other way around.
    #[test]
    fn prop_defaults_accept_specific_types(
        min in -1000i64..1000,
        width in 1i64..100,
        len in 0usize..5,
        extra in 0usize..5,
    ) {
        let range = integer_range(min, min + width, true).unwrap();
        prop_assert!(Value::IntegerType.assignable(&range));
        prop_assert!(!range.assignable(&Value::IntegerType));

        let sized = sized_string(len, len + extra);
        prop_assert!(Value::StringType.assignable(&sized));
        prop_assert!(!sized.assignable(&Value::StringType));

        let array = array_type(Value::IntegerType, len, len + extra);
        prop_assert!(Value::ArrayType.assignable(&array));
        prop_assert!(!array.assignable(&Value::ArrayType));
    }

    /// Negating twice gives back an equal type.
    #[test]
    fn prop_double_negation(spec in type_strategy()) {
        let t = spec.build();
        prop_assert_eq!(not(not(t.clone())), t);
    }

    /// Equal values have equal hash codes.
    #[test]
    fn prop_hash_coherent(v in value_strategy()) {
        let thawed = v.thawed_copy();
        prop_assert_eq!(&v, &thawed);
        prop_assert_eq!(v.hash_code(), thawed.hash_code());
        prop_assert_eq!(v.hash_code(), v.frozen_copy().hash_code());
    }

    /// Types built twice are equal and hash alike.
    #[test]
    fn prop_type_hash_coherent(spec in type_strategy()) {
        let a = spec.build();
        let b = spec.build();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.hash_code(), b.hash_code());
    }

    /// Maps with the same associations are equal regardless of order.
    #[test]
    fn prop_map_order_independent(
        entries in prop::collection::btree_map(key_strategy(), any::<i64>(), 2..8),
    ) {
        let pairs: Vec<(Value, Value)> = entries
            .into_iter()
            .map(|(k, v)| (Value::string(k), Value::Int(v)))
            .collect();
        let forward = Value::map(pairs.clone());
        let backward = Value::map(pairs.into_iter().rev());
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.hash_code(), backward.hash_code());

        let first = |v: &Value| v.as_map().unwrap().iter().next().map(|(k, _)| k.clone());
        prop_assert_ne!(first(&forward), first(&backward));
    }

    /// Freezing a frozen value hands back the same payload.
    #[test]
    fn prop_freeze_idempotent(v in value_strategy()) {
        let frozen = v.frozen_copy();
        prop_assert!(frozen.is_frozen());
        let again = frozen.frozen_copy();
        prop_assert!(again.addr() == 0 || again.same_ref(&frozen));
        prop_assert_eq!(again, frozen);
    }

    /// The generic form of a value accepts the value.
    #[test]
    fn prop_generic_accepts_value(v in value_strategy()) {
        let g = generic(&v);
        prop_assert!(g.assignable(&v), "{} does not accept {}", g, v);
    }
}
