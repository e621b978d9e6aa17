use pretty_assertions::assert_eq;

use super::*;

fn mutable_pair() -> Value {
    Value::mutable_array(vec![Value::Int(1), Value::mutable_array(vec![Value::Int(2)])])
}

#[test]
fn scalars_are_always_frozen() {
    assert!(Value::Int(1).is_frozen());
    assert!(Value::string("a").is_frozen());
    assert!(Value::IntegerType.is_frozen());
}

#[test]
fn frozen_copy_of_frozen_value_shares_payload() {
    let a = Value::array(vec![Value::Int(1)]);
    let b = a.frozen_copy();
    assert!(a.same_ref(&b));
    assert!(b.frozen_copy().same_ref(&a));
}

#[test]
fn frozen_copy_of_mutable_value_is_new_and_deep() {
    let a = mutable_pair();
    let f = a.frozen_copy();
    assert!(!a.same_ref(&f));
    assert!(!a.is_frozen());
    assert!(f.is_frozen());
    let inner = f.as_array().unwrap().get(1).unwrap();
    assert!(inner.is_frozen());
    assert_eq!(a, f);
}

#[test]
fn freeze_is_recursive() {
    let mut a = mutable_pair();
    a.freeze();
    assert!(a.is_frozen());
    assert!(a.as_array().unwrap().get(1).unwrap().is_frozen());
}

#[test]
fn freeze_detaches_shared_mutable_payload() {
    let mut a = mutable_pair();
    let other = a.clone();
    assert!(a.same_ref(&other));
    a.freeze();
    assert!(a.is_frozen());
    assert!(!other.is_frozen());
    assert!(!a.same_ref(&other));
}

#[test]
fn thawed_copy_is_mutable() {
    let a = Value::array(vec![Value::Int(1)]);
    let mut t = a.thawed_copy();
    assert!(!t.is_frozen());
    t.as_array_mut().unwrap().add(Value::Int(2)).unwrap();
    assert_eq!(t.as_array().unwrap().len(), 2);
    assert_eq!(a.as_array().unwrap().len(), 1);
}

#[test]
fn entries_and_sensitive_wrappers_follow_their_content() {
    let e = Value::entry(Value::string("k"), mutable_pair());
    assert!(!e.is_frozen());
    assert!(e.frozen_copy().is_frozen());

    let mut s = Value::sensitive(mutable_pair());
    assert!(!s.is_frozen());
    s.freeze();
    assert!(s.is_frozen());
}

#[test]
fn map_keys_are_frozen_on_insert() {
    let mut m = Value::from(crate::map::Map::new());
    let key = Value::mutable_array(vec![Value::Int(1)]);
    m.as_map_mut().unwrap().put(key.clone(), Value::Int(1)).unwrap();
    let stored = m.as_map().unwrap().keys();
    assert!(stored.get(0).unwrap().is_frozen());
    assert!(!key.is_frozen());
}
