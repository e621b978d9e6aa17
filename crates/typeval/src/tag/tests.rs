use pretty_assertions::assert_eq;

use super::*;

#[test]
fn all_is_in_declaration_order() {
    for (i, tag) in Tag::ALL.iter().enumerate() {
        assert_eq!(tag.index(), i);
    }
    assert_eq!(Tag::ALL.len(), Tag::COUNT);
}

#[test]
fn ordering_follows_declaration() {
    assert!(Tag::Nil < Tag::Any);
    assert!(Tag::Any < Tag::Boolean);
    assert!(Tag::IntegerExact < Tag::FloatExact);
    assert!(Tag::StringExact < Tag::ArrayExact);
    assert!(Tag::OneOf < Tag::Named);
}

#[test]
fn labels() {
    assert_eq!(Tag::IntegerRange.label(), "int range");
    assert_eq!(Tag::MapEntryExact.label(), "map entry");
    assert_eq!(Tag::AllOf.to_string(), "all of");
    assert_eq!(Tag::ArrayExact.label(), "slice");
    assert_eq!(Tag::True.label(), Tag::False.label());
}

#[test]
fn families() {
    assert_eq!(Tag::Tuple.family(), Family::Array);
    assert_eq!(Tag::Struct.family(), Family::Map);
    assert_eq!(Tag::CiString.family(), Family::String);
    assert_eq!(Tag::OneOf.family(), Family::Combinator);
}

#[test]
fn exact_and_default() {
    assert!(Tag::IntegerExact.is_exact());
    assert!(Tag::ArrayExact.is_exact());
    assert!(!Tag::ArraySized.is_exact());
    assert!(Tag::Array.is_default());
    assert!(!Tag::ArraySized.is_default());
    assert!(!Tag::Native.is_default());
}

#[test]
fn debug_includes_index() {
    assert_eq!(format!("{:?}", Tag::Tuple), "Tag(26:tuple)");
}
