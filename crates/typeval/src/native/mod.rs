//! Conversion between host data and values.
//!
//! Three narrow traits replace runtime reflection:
//!
//! - [`IntoValue`] wraps a host value,
//! - [`FromValue`] extracts one, failing with a conversion error,
//! - [`Described`] yields the type that every wrapped instance satisfies.
//!
//! Arbitrary host types travel as opaque natives through [`Host`].

use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hash, Hasher};

use chrono::{DateTime, FixedOffset, Utc};
use regex::Regex;
use rustc_hash::FxHasher;

use crate::types::{any_of, array_type, float_range, integer_range, map_type, native_type};
use crate::value::{NativeValue, RegexpValue};
use crate::{Value, ValueError};

pub trait IntoValue {
    fn into_value(self) -> Value;
}

pub trait FromValue: Sized {
    fn from_value(v: &Value) -> Result<Self, ValueError>;
}

/// Host types with a known value type.
pub trait Described {
    fn described() -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        Ok(v.clone())
    }
}

impl Described for Value {
    fn described() -> Value {
        Value::AnyType
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        v.as_bool().ok_or_else(|| ValueError::conversion(v, "a bool"))
    }
}

impl Described for bool {
    fn described() -> Value {
        Value::BooleanType
    }
}

macro_rules! integer_conversions {
    ($($t:ty),*) => {$(
        impl IntoValue for $t {
            fn into_value(self) -> Value {
                Value::Int(i64::from(self))
            }
        }

        impl FromValue for $t {
            fn from_value(v: &Value) -> Result<Self, ValueError> {
                v.as_int()
                    .and_then(|i| <$t>::try_from(i).ok())
                    .ok_or_else(|| ValueError::conversion(v, stringify!($t)))
            }
        }

        impl Described for $t {
            fn described() -> Value {
                integer_range(i64::from(<$t>::MIN), i64::from(<$t>::MAX), true)
                    .unwrap_or(Value::IntegerType)
            }
        }
    )*};
}

integer_conversions!(i8, i16, i32, i64, u8, u16, u32);

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        match v {
            Value::Float(f) => Ok(*f),
            Value::Int(i) => Ok(*i as f64),
            _ => Err(ValueError::conversion(v, "f64")),
        }
    }
}

impl Described for f64 {
    fn described() -> Value {
        Value::FloatType
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl FromValue for f32 {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        let f = f64::from_value(v)?;
        if f.is_finite() && (f < f64::from(f32::MIN) || f > f64::from(f32::MAX)) {
            return Err(ValueError::conversion(v, "f32"));
        }
        Ok(f as f32)
    }
}

impl Described for f32 {
    fn described() -> Value {
        float_range(f64::from(f32::MIN), f64::from(f32::MAX), true).unwrap_or(Value::FloatType)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::string(self)
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        v.as_str()
            .map(str::to_owned)
            .ok_or_else(|| ValueError::conversion(v, "a string"))
    }
}

impl Described for String {
    fn described() -> Value {
        Value::StringType
    }
}

impl Described for &str {
    fn described() -> Value {
        Value::StringType
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        v.as_array()
            .ok_or_else(|| ValueError::conversion(v, "an array"))?
            .iter()
            .map(T::from_value)
            .collect()
    }
}

impl<T: Described> Described for Vec<T> {
    fn described() -> Value {
        array_type(T::described(), 0, usize::MAX)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Nil, IntoValue::into_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        if v.is_nil() {
            Ok(None)
        } else {
            T::from_value(v).map(Some)
        }
    }
}

impl<T: Described> Described for Option<T> {
    fn described() -> Value {
        any_of(vec![T::described(), Value::Nil])
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::map(self.into_iter().map(|(k, v)| (k.into_value(), v.into_value())))
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        v.as_map()
            .ok_or_else(|| ValueError::conversion(v, "a map"))?
            .iter()
            .map(|(k, val)| Ok((K::from_value(k)?, V::from_value(val)?)))
            .collect()
    }
}

impl<K: Described, V: Described> Described for BTreeMap<K, V> {
    fn described() -> Value {
        map_type(K::described(), V::described(), 0, usize::MAX)
    }
}

/// Entries are ordered by key so equal host maps give identical values.
impl<K: IntoValue, V: IntoValue, S> IntoValue for HashMap<K, V, S> {
    fn into_value(self) -> Value {
        let mut pairs: Vec<(Value, Value)> = self
            .into_iter()
            .map(|(k, v)| (k.into_value(), v.into_value()))
            .collect();
        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
        Value::map(pairs)
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        v.as_map()
            .ok_or_else(|| ValueError::conversion(v, "a map"))?
            .iter()
            .map(|(k, val)| Ok((K::from_value(k)?, V::from_value(val)?)))
            .collect()
    }
}

impl<K: Described, V: Described, S> Described for HashMap<K, V, S> {
    fn described() -> Value {
        map_type(K::described(), V::described(), 0, usize::MAX)
    }
}

impl IntoValue for DateTime<FixedOffset> {
    fn into_value(self) -> Value {
        Value::Time(self)
    }
}

impl IntoValue for DateTime<Utc> {
    fn into_value(self) -> Value {
        Value::Time(self.into())
    }
}

impl FromValue for DateTime<FixedOffset> {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        match v {
            Value::Time(t) => Ok(*t),
            _ => Err(ValueError::conversion(v, "a time")),
        }
    }
}

impl FromValue for DateTime<Utc> {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        DateTime::<FixedOffset>::from_value(v).map(|t| t.with_timezone(&Utc))
    }
}

impl<Tz: chrono::TimeZone> Described for DateTime<Tz> {
    fn described() -> Value {
        Value::TimeType
    }
}

impl IntoValue for Regex {
    fn into_value(self) -> Value {
        Value::Regexp(crate::value::Heap::new(RegexpValue::from(self)))
    }
}

impl FromValue for Regex {
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        match v {
            Value::Regexp(re) => Ok(re.regex().clone()),
            _ => Err(ValueError::conversion(v, "a regexp")),
        }
    }
}

impl Described for Regex {
    fn described() -> Value {
        Value::RegexpType
    }
}

/// An arbitrary host value carried as a native. Identity is the host
/// type's own `Eq` and `Hash`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Host<T>(pub T);

impl<T: fmt::Debug> fmt::Debug for Host<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T> NativeValue for Host<T>
where
    T: fmt::Debug + Eq + Hash + Send + Sync + 'static,
{
    fn type_name(&self) -> &str {
        std::any::type_name::<T>()
    }

    fn native_hash(&self) -> u64 {
        let mut h = FxHasher::default();
        self.0.hash(&mut h);
        h.finish()
    }

    fn native_eq(&self, other: &dyn NativeValue) -> bool {
        other
            .as_any()
            .downcast_ref::<Host<T>>()
            .is_some_and(|o| o.0 == self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<T> IntoValue for Host<T>
where
    T: fmt::Debug + Eq + Hash + Send + Sync + 'static,
{
    fn into_value(self) -> Value {
        Value::native(self)
    }
}

impl<T> FromValue for Host<T>
where
    T: Clone + fmt::Debug + Eq + Hash + Send + Sync + 'static,
{
    fn from_value(v: &Value) -> Result<Self, ValueError> {
        match v {
            Value::Native(n) => n
                .as_any()
                .downcast_ref::<Host<T>>()
                .cloned()
                .ok_or_else(|| ValueError::conversion(v, "a native")),
            _ => Err(ValueError::conversion(v, "a native")),
        }
    }
}

impl<T: 'static> Described for Host<T> {
    fn described() -> Value {
        native_type(std::any::type_name::<T>())
    }
}
