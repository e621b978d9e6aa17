//! Generic forms.
//!
//! The generic form of a value strips literal, range and size information:
//! `3` becomes `int`, `"a"` becomes `string`, `[1, "a"]` becomes
//! `[]int|string`. A generic form always accepts the value it came from.

use typeval_stack::ensure_sufficient_stack;

use crate::array::array_type;
use crate::map::map_type;
use crate::types::logical::union_of_distinct;
use crate::types::native_type;
use crate::Value;

pub fn generic(v: &Value) -> Value {
    ensure_sufficient_stack(|| match v {
        Value::Bool(_) => Value::BooleanType,
        Value::Int(_) | Value::IntegerRange(_) => Value::IntegerType,
        Value::Float(_) | Value::FloatRange(_) => Value::FloatType,
        Value::Str(_) | Value::SizedStringType(_) | Value::PatternType(_) | Value::CiStringType(_) => {
            Value::StringType
        }
        Value::Binary(_) | Value::SizedBinaryType(_) => Value::BinaryType,
        Value::Regexp(_) => Value::RegexpType,
        Value::Time(_) => Value::TimeType,
        Value::Native(n) => native_type(n.type_name()),
        Value::Array(a) => unbounded_array(&a.element_type()),
        Value::SizedArray(t) => unbounded_array(t.element()),
        Value::Tuple(t) => unbounded_array(&t.element_type()),
        Value::Map(m) => unbounded_map(&m.key_type(), &m.value_type()),
        Value::SizedMap(t) => unbounded_map(t.key(), t.value()),
        Value::Struct(t) => unbounded_map(&t.key_type(), &t.value_type()),
        Value::Logical(l) => {
            let members: Vec<Value> = l.members().iter().map(generic).collect();
            union_of_distinct(&members)
        }
        Value::Sensitive(w) => Value::sensitive(generic(w.wrapped())),
        Value::Nil
        | Value::Entry(_)
        | Value::AnyType
        | Value::BooleanType
        | Value::IntegerType
        | Value::FloatType
        | Value::BinaryType
        | Value::StringType
        | Value::RegexpType
        | Value::TimeType
        | Value::NativeType(_)
        | Value::ArrayType
        | Value::MapType
        | Value::Not(_)
        | Value::Named(_) => v.clone(),
    })
}

fn unbounded_array(element: &Value) -> Value {
    array_type(generic(element), 0, usize::MAX)
}

fn unbounded_map(key: &Value, value: &Value) -> Value {
    map_type(generic(key), generic(value), 0, usize::MAX)
}
