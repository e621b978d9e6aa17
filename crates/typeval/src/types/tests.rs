use pretty_assertions::assert_eq;

use super::*;
use crate::ValueError;

fn s(text: &str) -> Value {
    Value::string(text)
}

// === Integers ===

#[test]
fn integer_ranges() {
    let r = integer_range(1, 10, true).unwrap();
    assert!(r.is_instance(&Value::Int(1)));
    assert!(r.is_instance(&Value::Int(10)));
    assert!(!r.is_instance(&Value::Int(11)));
    assert!(!r.is_instance(&Value::Float(5.0)));

    let open = integer_range(1, 10, false).unwrap();
    assert!(!open.is_instance(&Value::Int(10)));
    assert!(open.is_instance(&Value::Int(9)));
}

#[test]
fn integer_range_normalization() {
    assert_eq!(integer_range(10, 1, true).unwrap(), integer_range(1, 10, true).unwrap());
    assert_eq!(integer_range(3, 3, true).unwrap(), Value::Int(3));
    let err = integer_range(3, 3, false).unwrap_err();
    assert_eq!(err.to_string(), "the range 3...3 is empty");
    assert_eq!(integer_from(i64::MIN), Value::IntegerType);
    assert!(integer_from(5).is_instance(&Value::Int(i64::MAX)));
    assert!(!integer_from(5).is_instance(&Value::Int(4)));
}

#[test]
fn integer_range_assignability() {
    let wide = integer_range(0, 10, true).unwrap();
    let narrow = integer_range(2, 5, true).unwrap();
    assert!(wide.assignable(&narrow));
    assert!(!narrow.assignable(&wide));
    // 0..10 exclusive holds the same members as 0...9.
    assert!(integer_range(0, 9, true)
        .unwrap()
        .assignable(&integer_range(0, 10, false).unwrap()));
    assert!(Value::IntegerType.assignable(&narrow));
    assert!(!narrow.assignable(&Value::IntegerType));
}

// === Floats ===

#[test]
fn float_ranges() {
    let r = float_range(0.0, 1.0, false).unwrap();
    assert!(r.is_instance(&Value::Float(0.5)));
    assert!(r.is_instance(&Value::Float(0.0)));
    assert!(!r.is_instance(&Value::Float(1.0)));
    assert!(!r.is_instance(&Value::Int(0)));

    let closed = float_range(0.0, 1.0, true).unwrap();
    assert!(closed.is_instance(&Value::Float(1.0)));
    assert!(closed.assignable(&r));
    assert!(!r.assignable(&closed));
    assert!(Value::FloatType.assignable(&r));
}

#[test]
fn float_range_normalization() {
    assert_eq!(float_range(2.5, 2.5, true).unwrap(), Value::Float(2.5));
    assert!(matches!(
        float_range(2.5, 2.5, false),
        Err(ValueError::EmptyRange { .. })
    ));
    assert!(matches!(
        float_range(f64::NAN, 1.0, true),
        Err(ValueError::IllegalArgument { index: 0, .. })
    ));
    assert_eq!(float_range(f64::MIN, f64::MAX, true).unwrap(), Value::FloatType);
}

// === Strings ===

#[test]
fn sized_strings_count_characters() {
    let t = sized_string(1, 3);
    assert!(t.is_instance(&s("abc")));
    assert!(t.is_instance(&s("héé")));
    assert!(!t.is_instance(&s("abcd")));
    assert!(!t.is_instance(&s("")));
    assert!(sized_string(0, 5).assignable(&t));
    assert!(!t.assignable(&sized_string(0, 5)));
    assert_eq!(sized_string(0, usize::MAX), Value::StringType);
    assert!(Value::StringType.assignable(&t));
}

#[test]
fn case_insensitive_strings() {
    let t = ci_string("Hello");
    assert!(t.is_instance(&s("hELLo")));
    assert!(!t.is_instance(&s("help")));
    assert!(t.assignable(&ci_string("HELLO")));
    assert!(sized_string(5, 5).assignable(&t));
    assert_eq!(t.type_string(), r#"~"hello""#);
}

#[test]
fn patterns() {
    let t = pattern("^a+$").unwrap();
    assert!(t.is_instance(&s("aaa")));
    assert!(!t.is_instance(&s("ab")));
    assert!(!t.is_instance(&Value::Int(1)));
    assert!(t.assignable(&pattern("^a+$").unwrap()));
    assert!(Value::StringType.assignable(&t));

    let err = pattern("(").unwrap_err();
    assert!(matches!(err, ValueError::Pattern { .. }));
}

#[test]
fn enumerations() {
    let t = enum_type(&["red", "green"]);
    assert!(t.is_instance(&s("red")));
    assert!(!t.is_instance(&s("RED")));
    assert!(ci_enum_type(&["red", "green"]).is_instance(&s("RED")));
    assert_eq!(enum_type(&["only"]), s("only"));
    let none = enum_type(&[]);
    assert!(!none.is_instance(&s("red")));
    assert!(!none.is_instance(&Value::Nil));
}

#[test]
fn string_type_from_args_forms() {
    assert_eq!(string_type_from_args(&[]).unwrap(), Value::StringType);
    assert_eq!(string_type_from_args(&[s("x")]).unwrap(), s("x"));
    assert_eq!(
        string_type_from_args(&[Value::Int(2)]).unwrap(),
        sized_string(2, usize::MAX)
    );
    assert_eq!(
        string_type_from_args(&[Value::Int(-1), Value::Int(4)]).unwrap(),
        sized_string(0, 4)
    );
    assert!(matches!(
        string_type_from_args(&[Value::Int(1), s("x")]),
        Err(ValueError::IllegalArgument { index: 1, .. })
    ));
    assert!(matches!(
        string_type_from_args(&[Value::Nil, Value::Nil, Value::Nil]),
        Err(ValueError::ArityMismatch { .. })
    ));
}

// === Other scalars ===

#[test]
fn binaries_and_booleans() {
    let t = sized_binary(1, 2);
    assert!(t.is_instance(&Value::binary(vec![1, 2])));
    assert!(!t.is_instance(&Value::binary(vec![1, 2, 3])));
    assert!(Value::BinaryType.assignable(&t));
    assert_eq!(sized_binary(0, usize::MAX), Value::BinaryType);

    assert_eq!(boolean(Some(true)), Value::Bool(true));
    assert_eq!(boolean(None), Value::BooleanType);
    assert!(Value::BooleanType.is_instance(&Value::Bool(false)));
    assert!(!Value::Bool(true).is_instance(&Value::Bool(false)));
}

// === Combinators ===

#[test]
fn unions() {
    let t = any_of(vec![Value::IntegerType, Value::StringType]);
    assert!(t.is_instance(&Value::Int(1)));
    assert!(t.is_instance(&s("a")));
    assert!(!t.is_instance(&Value::Nil));
    assert!(!any_of(vec![]).is_instance(&Value::Nil));
    assert!(number().is_instance(&Value::Float(1.5)));
    assert!(!number().is_instance(&s("1")));
}

#[test]
fn intersections() {
    let t = all_of(vec![sized_string(1, 5), pattern("^a").unwrap()]);
    assert!(t.is_instance(&s("abc")));
    assert!(!t.is_instance(&s("bc")));
    assert!(!t.is_instance(&s("abcdef")));
    assert!(all_of(vec![]).is_instance(&Value::Nil));
}

#[test]
fn exclusive_unions() {
    let t = one_of(vec![
        integer_range(0, 5, true).unwrap(),
        integer_range(3, 10, true).unwrap(),
    ]);
    assert!(t.is_instance(&Value::Int(1)));
    assert!(!t.is_instance(&Value::Int(4)));
    assert!(t.is_instance(&Value::Int(8)));
    assert!(!t.is_instance(&Value::Int(11)));
}

#[test]
fn combinators_as_candidates() {
    let ints = any_of(vec![Value::Int(1), integer_range(2, 5, true).unwrap()]);
    assert!(Value::IntegerType.assignable(&ints));
    assert!(!Value::StringType.assignable(&ints));
    assert!(!Value::IntegerType.assignable(&any_of(vec![Value::IntegerType, Value::StringType])));
    assert!(Value::IntegerType.assignable(&all_of(vec![Value::IntegerType, Value::StringType])));
    assert!(!Value::IntegerType.assignable(&any_of(vec![])));
}

#[test]
fn negation() {
    let t = not(Value::IntegerType);
    assert!(t.is_instance(&s("a")));
    assert!(!t.is_instance(&Value::Int(1)));
    assert_eq!(not(t.clone()), Value::IntegerType);

    // !A accepts !B when B accepts A.
    assert!(not(sized_string(1, 2)).assignable(&not(Value::StringType)));
    assert!(!not(Value::StringType).assignable(&not(sized_string(1, 2))));

    assert!(not(Value::StringType).assignable(&any_of(vec![Value::IntegerType, Value::FloatType])));
    assert!(!not(Value::StringType).assignable(&any_of(vec![Value::IntegerType, Value::StringType])));
}

#[test]
fn union_of_distinct_collapses() {
    assert_eq!(union_of_distinct(&Vec::new()), Value::AnyType);
    let one = [Value::Int(1), Value::Int(1)];
    assert_eq!(union_of_distinct(&one), Value::Int(1));
    let two = [Value::Int(1), s("a"), Value::Int(1)];
    assert_eq!(union_of_distinct(&two), any_of(vec![Value::Int(1), s("a")]));
}

// === Named and sensitive ===

#[test]
fn named_references() {
    let port = named_with("port", integer_range(1, 65535, true).unwrap());
    assert!(port.is_instance(&Value::Int(80)));
    assert!(!port.is_instance(&Value::Int(0)));
    assert!(Value::IntegerType.assignable(&port));
    assert!(!Value::StringType.assignable(&port));
    assert_eq!(port.type_string(), "port");

    let unbound = named("x");
    assert!(unbound.assignable(&named("x")));
    assert!(!unbound.is_instance(&Value::Int(1)));
    assert!(Value::AnyType.assignable(&unbound));
}

#[test]
fn named_binds_once() {
    let v = named("x");
    let Value::Named(n) = &v else { unreachable!() };
    assert!(n.target().is_none());
    n.bind(Value::IntegerType).unwrap();
    n.bind(Value::IntegerType).unwrap();
    assert!(matches!(n.bind(Value::StringType), Err(ValueError::TypeMismatch { .. })));
    assert_eq!(n.target(), Some(&Value::IntegerType));
}

#[test]
fn racing_binds_agree_on_one_target() {
    for _ in 0..16 {
        let v = named("x");
        let Value::Named(n) = &v else { unreachable!() };
        let results: Vec<_> = std::thread::scope(|s| {
            let a = s.spawn(|| n.bind(Value::IntegerType));
            let b = s.spawn(|| n.bind(Value::StringType));
            let c = s.spawn(|| n.bind(Value::IntegerType));
            [a, b, c].map(|h| h.join().unwrap()).to_vec()
        });
        let stored = n.target().unwrap().clone();
        assert!(stored == Value::IntegerType || stored == Value::StringType);
        let expected = [Value::IntegerType, Value::StringType, Value::IntegerType];
        for (result, target) in results.iter().zip(&expected) {
            assert_eq!(result.is_ok(), *target == stored);
        }
    }
}

#[test]
fn sensitive_values() {
    let t = sensitive_type(Value::IntegerType);
    assert!(t.is_instance(&Value::sensitive(Value::Int(3))));
    assert!(!t.is_instance(&Value::Int(3)));
    assert!(!t.is_instance(&Value::sensitive(s("a"))));
    assert_eq!(
        sensitive_type_from_args(&[]).unwrap(),
        Value::sensitive(Value::AnyType)
    );
    assert!(matches!(
        sensitive_type_from_args(&[Value::Nil, Value::Nil]),
        Err(ValueError::ArityMismatch { .. })
    ));
}

#[test]
fn native_types() {
    let t = native_type("app::Point");
    assert!(t.assignable(&native_type("app::Point")));
    assert!(!t.assignable(&native_type("app::Line")));
    assert!(Value::NativeType(None).assignable(&t));
    assert!(!t.assignable(&Value::NativeType(None)));
}
