use pretty_assertions::assert_eq;

use super::*;
use crate::types::{any_of, array_type, integer_range, map_type, named_with, sized_string};

fn new1(typ: &Value, arg: Value) -> Result<Value, ValueError> {
    new_value(typ, &[arg])
}

#[test]
fn integers() {
    let t = Value::IntegerType;
    assert_eq!(new1(&t, Value::Int(3)).unwrap(), Value::Int(3));
    assert_eq!(new1(&t, Value::Float(3.9)).unwrap(), Value::Int(3));
    assert_eq!(new1(&t, Value::Float(-3.9)).unwrap(), Value::Int(-3));
    assert_eq!(new1(&t, Value::Bool(true)).unwrap(), Value::Int(1));
    assert_eq!(new1(&t, Value::string(" 42 ")).unwrap(), Value::Int(42));
    assert_eq!(new1(&t, Value::string("0x1f")).unwrap(), Value::Int(31));
    assert_eq!(new1(&t, Value::string("-0b101")).unwrap(), Value::Int(-5));
    assert!(matches!(
        new1(&t, Value::string("abc")),
        Err(ValueError::Conversion { target: "an int", .. })
    ));
    let time = new1(&Value::TimeType, Value::Int(1_000)).unwrap();
    assert_eq!(new1(&t, time).unwrap(), Value::Int(1_000));
}

#[test]
fn out_of_range_floats_are_not_ints() {
    let t = Value::IntegerType;
    for f in [1e30, -1e30, 9.223_372_036_854_775_808e18, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            new1(&t, Value::Float(f)),
            Err(ValueError::Conversion { target: "an int", .. })
        ));
    }
    assert_eq!(new1(&t, Value::Float(-3.7)).unwrap(), Value::Int(-3));
    assert_eq!(
        new1(&t, Value::Float(-9.223_372_036_854_775_808e18)).unwrap(),
        Value::Int(i64::MIN)
    );
}

#[test]
fn result_must_satisfy_range() {
    let t = integer_range(0, 9, true).unwrap();
    assert_eq!(new1(&t, Value::string("7")).unwrap(), Value::Int(7));
    assert!(matches!(new1(&t, Value::Int(12)), Err(ValueError::TypeMismatch { .. })));
}

#[test]
fn floats() {
    let t = Value::FloatType;
    assert_eq!(new1(&t, Value::Int(2)).unwrap(), Value::Float(2.0));
    assert_eq!(new1(&t, Value::string("2.5")).unwrap(), Value::Float(2.5));
    assert_eq!(new1(&t, Value::Bool(false)).unwrap(), Value::Float(0.0));
    let time = new1(&Value::TimeType, Value::Float(1.5)).unwrap();
    assert_eq!(new1(&t, time).unwrap(), Value::Float(1.5));
    assert!(new1(&t, Value::Nil).is_err());
}

#[test]
fn booleans() {
    let t = Value::BooleanType;
    assert_eq!(new1(&t, Value::string("Yes")).unwrap(), Value::Bool(true));
    assert_eq!(new1(&t, Value::string("n")).unwrap(), Value::Bool(false));
    assert_eq!(new1(&t, Value::Int(0)).unwrap(), Value::Bool(false));
    assert_eq!(new1(&t, Value::Float(0.1)).unwrap(), Value::Bool(true));
    assert!(new1(&t, Value::string("maybe")).is_err());
    assert!(new1(&Value::Bool(true), Value::string("no")).is_err());
}

#[test]
fn strings_take_canonical_form() {
    let t = Value::StringType;
    assert_eq!(new1(&t, Value::Int(12)).unwrap(), Value::string("12"));
    assert_eq!(new1(&t, Value::string("x")).unwrap(), Value::string("x"));
    assert!(new1(&sized_string(0, 1), Value::Int(12)).is_err());
}

#[test]
fn times() {
    let t = Value::TimeType;
    let parsed = new1(&t, Value::string("2020-01-02T03:04:05Z")).unwrap();
    let from_int = new1(&t, Value::Int(1_577_934_245)).unwrap();
    assert_eq!(parsed, from_int);
    assert!(new1(&t, Value::string("yesterday")).is_err());
}

#[test]
fn binaries() {
    let t = Value::BinaryType;
    assert_eq!(new1(&t, Value::string("ab")).unwrap(), Value::binary(*b"ab"));
    let bytes = Value::array(vec![Value::Int(1), Value::Int(255)]);
    assert_eq!(new1(&t, bytes).unwrap(), Value::binary(vec![1, 255]));
    let bad = Value::array(vec![Value::Int(256)]);
    assert!(new1(&t, bad).is_err());
}

#[test]
fn regexps() {
    let re = new1(&Value::RegexpType, Value::string("a+")).unwrap();
    assert_eq!(re, Value::regexp("a+").unwrap());
    assert!(matches!(
        new1(&Value::RegexpType, Value::string("(")),
        Err(ValueError::Pattern { .. })
    ));
}

#[test]
fn containers_are_frozen_and_checked() {
    let t = array_type(Value::IntegerType, 0, 2);
    let input = Value::mutable_array(vec![Value::Int(1)]);
    let v = new1(&t, input.clone()).unwrap();
    assert!(v.is_frozen());
    assert!(!input.is_frozen());
    assert!(new1(&t, Value::array(vec![Value::string("x")])).is_err());
    assert!(new1(&t, Value::Int(1)).is_err());

    let mt = map_type(Value::StringType, Value::IntegerType, 0, usize::MAX);
    let pairs = Value::array(vec![Value::string("a"), Value::Int(1)]);
    let m = new1(&mt, pairs).unwrap();
    assert_eq!(m, Value::map([(Value::string("a"), Value::Int(1))]));
    let odd = Value::array(vec![Value::string("a")]);
    assert!(new1(&mt, odd).is_err());
}

#[test]
fn sensitive_wraps() {
    let t = Value::sensitive(Value::StringType);
    let v = new1(&t, Value::string("pw")).unwrap();
    assert_eq!(v, Value::sensitive(Value::string("pw")));
    assert!(new1(&t, Value::Int(1)).is_err());
}

#[test]
fn other_types_accept_instances_only() {
    let t = any_of(vec![Value::IntegerType, Value::StringType]);
    assert_eq!(new1(&t, Value::Int(1)).unwrap(), Value::Int(1));
    assert!(new1(&t, Value::Float(1.0)).is_err());
    let n = named_with("small", integer_range(0, 3, true).unwrap());
    assert_eq!(new1(&n, Value::string("2")).unwrap(), Value::Int(2));
}

#[test]
fn arity_is_checked() {
    let err = new_value(&Value::IntegerType, &[]).unwrap_err();
    assert_eq!(err.to_string(), "illegal number of arguments for int. Expected 1, got 0");
    assert!(new_value(&Value::StringType, &[Value::Int(1), Value::Int(2)]).is_err());
}
