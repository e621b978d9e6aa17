//! End-to-end scenarios exercising the public API the way a schema
//! validator would.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use typeval::types::{
    any_of, array_type, integer_range, named, one_of, struct_type, StructEntry,
};
use typeval::{new_value, resolve, AliasMap, Array, Map, OrderedTable, Value, ValueError, Violation};

fn s(text: &str) -> Value {
    Value::string(text)
}

fn strings(items: &[&str]) -> Value {
    Value::array(items.iter().map(|t| s(t)).collect())
}

fn person() -> Value {
    struct_type(
        false,
        vec![
            StructEntry::required("name", Value::StringType),
            StructEntry::optional("age", Value::IntegerType),
        ],
    )
}

#[test]
fn sized_string_arrays() {
    let t = array_type(Value::StringType, 1, 2);
    assert_eq!(t.type_string(), "[1,2]string");
    assert!(t.is_instance(&strings(&["a"])));
    assert!(t.is_instance(&strings(&["a", "b"])));
    assert!(!t.is_instance(&strings(&[])));
    assert!(!t.is_instance(&strings(&["a", "b", "c"])));
    assert!(!t.is_instance(&Value::array(vec![Value::Int(1)])));
}

#[test]
fn unions_of_int_and_string() {
    let t = any_of(vec![Value::IntegerType, Value::StringType]);
    assert_eq!(t.type_string(), "int|string");
    assert!(t.is_instance(&Value::Int(42)));
    assert!(t.is_instance(&s("x")));
    assert!(!t.is_instance(&Value::Float(2.5)));
    assert!(!t.is_instance(&Value::Bool(true)));
}

#[test]
fn exclusive_union_of_overlapping_ranges() {
    let t = one_of(vec![
        integer_range(0, 10, true).unwrap(),
        integer_range(5, 20, true).unwrap(),
    ]);
    assert!(!t.is_instance(&Value::Int(7)));
    assert!(t.is_instance(&Value::Int(2)));
    assert!(t.is_instance(&Value::Int(15)));
}

#[test]
fn struct_validation() {
    let Value::Struct(st) = person() else {
        unreachable!()
    };
    let ok = Value::map(vec![(s("name"), s("a")), (s("age"), Value::Int(3))]);
    assert!(st.validate(&ok).is_empty());

    let extra = Value::map(vec![(s("name"), s("a")), (s("extra"), Value::Int(1))]);
    assert_eq!(st.validate(&extra), [Violation::Unknown { key: s("extra") }]);
}

#[test]
fn table_grows_once_past_load_factor() {
    let mut t: OrderedTable<Value, Value> = OrderedTable::with_capacity(12);
    assert_eq!(t.capacity(), 16);
    for i in 0..12 {
        t.insert(Value::Int(i), Value::Nil);
    }
    assert_eq!(t.capacity(), 16);

    // 16 * 0.75 + 1
    t.insert(Value::Int(12), Value::Nil);
    assert_eq!(t.capacity(), 32);

    let order: Vec<i64> = t.iter().filter_map(|(k, _)| k.as_int()).collect();
    assert_eq!(order, (0..13).collect::<Vec<_>>());
}

#[test]
fn typed_containers_reject_bad_mutations() {
    let mut a = Array::with_capacity(2, Some(array_type(Value::StringType, 0, 2))).unwrap();
    a.add(s("a")).unwrap();
    let err = a.add(Value::Int(1)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "the value 1 cannot be assigned to a variable of type string"
    );
    a.add(s("b")).unwrap();
    assert!(matches!(a.add(s("c")), Err(ValueError::SizeViolation { .. })));

    let mut m = Map::from_pairs(vec![(s("name"), s("Bob"))]);
    m.set_type(person()).unwrap();
    assert!(matches!(
        m.put(s("zip"), s("1234")),
        Err(ValueError::IllegalKey { .. })
    ));
    m.freeze();
    assert_eq!(
        m.put(s("age"), Value::Int(1)).unwrap_err().to_string(),
        "Put called on a frozen Map"
    );
}

#[test]
fn resolved_schema_validates_nested_data() {
    let mut schema = struct_type(
        false,
        vec![
            StructEntry::required("value", Value::IntegerType),
            StructEntry::optional("next", named("node")),
        ],
    );
    let mut aliases = AliasMap::new();
    aliases.add(schema.clone(), "node");
    resolve(&mut schema, &mut aliases);
    assert_eq!(aliases.get_name(&schema), Some("node"));

    let data = Value::map(vec![
        (s("value"), Value::Int(1)),
        (
            s("next"),
            Value::map(vec![
                (s("value"), Value::Int(2)),
                (s("next"), Value::map(vec![(s("value"), Value::Int(3))])),
            ]),
        ),
    ]);
    assert!(schema.is_instance(&data));
    assert_eq!(schema.type_string(), r#"{"value":int,"next"?:node}"#);

    let bad = Value::map(vec![
        (s("value"), Value::Int(1)),
        (s("next"), Value::map(vec![(s("value"), s("two"))])),
    ]);
    assert!(!schema.is_instance(&bad));
}

#[test]
fn factory_converts_then_checks() {
    let port = integer_range(1, 65535, true).unwrap();
    assert_eq!(new_value(&port, &[s("8080")]).unwrap(), Value::Int(8080));
    assert!(matches!(
        new_value(&port, &[s("0")]),
        Err(ValueError::TypeMismatch { .. })
    ));
    assert!(new_value(&Value::IntegerType, &[s("eight")]).is_err());
}
