//! Maps, map entries and the map type family.
//!
//! A [`Map`] keeps its associations in an [`OrderedTable`], so iteration
//! follows insertion order while equality and hashing ignore it. Keys are
//! frozen when inserted: a key's hash must never change while it is stored.
//!
//! Like arrays, a map may carry a type constraint: a sized map type or a
//! struct type. Struct-typed maps check each entry with
//! [`StructType::check_entry`](crate::structs::StructType::check_entry).

mod types;

use crate::array::Array;
use crate::assign::{reverse, DeepAssignable};
use crate::config::TableConfig;
use crate::guard::{RecursionGuard, Seen};
use crate::kernel::equal::deep_equal;
use crate::kernel::hash::{deep_hash, mix};
use crate::structs::StructEntry;
use crate::table::{Iter, OrderedTable};
use crate::types::logical::union_of_distinct;
use crate::value::Bounds;
use crate::{Value, ValueError};

pub use types::{map_type, map_type_from_args, SizedMapType};
pub(crate) use types::map_instance;

/// A key/value pair.
#[derive(Clone, Debug)]
pub struct MapEntry {
    key: Value,
    value: Value,
}

impl MapEntry {
    /// An entry with a frozen copy of `key`.
    pub fn new(key: Value, value: Value) -> Self {
        MapEntry {
            key: key.frozen_copy(),
            value,
        }
    }

    #[inline]
    pub fn key(&self) -> &Value {
        &self.key
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// An entry is frozen when its value is.
    pub fn is_frozen(&self) -> bool {
        self.value.is_frozen()
    }

    pub fn freeze(&mut self) {
        self.value.freeze();
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut Value, &mut Value) {
        (&mut self.key, &mut self.value)
    }

    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        deep_hash(seen, &self.key) ^ deep_hash(seen, &self.value)
    }
}

/// An insertion ordered map from values to values.
#[derive(Clone, Debug, Default)]
pub struct Map {
    table: OrderedTable<Value, Value>,
    typ: Option<Value>,
    frozen: bool,
}

impl Map {
    // === Construction ===

    /// An empty mutable map.
    pub fn new() -> Self {
        Map::default()
    }

    /// An empty mutable map sized for `capacity` entries, optionally
    /// constrained by `typ`.
    pub fn with_capacity(capacity: usize, typ: Option<Value>) -> Result<Self, ValueError> {
        let mut m = Map {
            table: OrderedTable::with_capacity(capacity),
            typ: None,
            frozen: false,
        };
        if let Some(t) = typ {
            m.set_type(t)?;
        }
        Ok(m)
    }

    /// An empty mutable map with explicit table tuning.
    pub fn with_config(capacity: usize, config: TableConfig) -> Self {
        Map {
            table: OrderedTable::with_config(capacity, config),
            typ: None,
            frozen: false,
        }
    }

    /// A mutable map from key/value pairs; later pairs replace earlier ones.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let pairs = pairs.into_iter();
        let mut table = OrderedTable::with_capacity(pairs.size_hint().0);
        for (k, v) in pairs {
            table.insert(k.frozen_copy(), v);
        }
        Map {
            table,
            typ: None,
            frozen: false,
        }
    }

    // === Queries ===

    #[inline]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[inline]
    pub fn declared_type(&self) -> Option<&Value> {
        self.typ.as_ref()
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.table.get(key)
    }

    /// Lookup by string key.
    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.table.get(&Value::string(key))
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.table.contains_key(key)
    }

    pub fn iter(&self) -> Iter<'_, Value, Value> {
        self.table.iter()
    }

    /// The keys in insertion order.
    pub fn keys(&self) -> Array {
        self.collect(self.table.keys().cloned())
    }

    /// The values in insertion order.
    pub fn values(&self) -> Array {
        self.collect(self.table.values().cloned())
    }

    /// The associations as map entry values, in insertion order.
    pub fn entries(&self) -> Array {
        self.collect(
            self.table
                .iter()
                .map(|(k, v)| Value::from(MapEntry::new(k.clone(), v.clone()))),
        )
    }

    fn collect(&self, values: impl Iterator<Item = Value>) -> Array {
        let mut a = Array::from_vec(values.collect());
        if self.frozen {
            a.freeze();
        }
        a
    }

    /// Union of the distinct keys.
    pub fn key_type(&self) -> Value {
        union_of_distinct(self.table.keys())
    }

    /// Union of the distinct values.
    pub fn value_type(&self) -> Value {
        union_of_distinct(self.table.values())
    }

    pub fn all(&self, mut predicate: impl FnMut(&Value, &Value) -> bool) -> bool {
        self.table.iter().all(|(k, v)| predicate(k, v))
    }

    pub fn any(&self, mut predicate: impl FnMut(&Value, &Value) -> bool) -> bool {
        self.table.iter().any(|(k, v)| predicate(k, v))
    }

    /// The first association matching `predicate`.
    pub fn find(&self, mut predicate: impl FnMut(&Value, &Value) -> bool) -> Option<(&Value, &Value)> {
        self.table.iter().find(|&(k, v)| predicate(k, v))
    }

    // === Mutation ===

    fn assert_mutable(&self, op: &'static str) -> Result<(), ValueError> {
        if self.frozen {
            Err(ValueError::Frozen {
                op,
                container: "Map",
            })
        } else {
            Ok(())
        }
    }

    fn assert_type(&self, k: &Value, v: &Value, added: usize) -> Result<(), ValueError> {
        let Some(typ) = &self.typ else {
            return Ok(());
        };
        match typ {
            Value::Struct(st) => st.check_entry(typ, k, v)?,
            Value::SizedMap(t) => {
                if !t.key().is_instance(k) {
                    return Err(ValueError::mismatch(t.key(), k));
                }
                if !t.value().is_instance(v) {
                    return Err(ValueError::mismatch(t.value(), v));
                }
            }
            _ => {}
        }
        let size = self.table.len() + added;
        if added > 0 && size > bounds_of(typ).max {
            return Err(ValueError::size(typ, size));
        }
        Ok(())
    }

    /// Associate `v` with `k`, returning the value it replaces.
    pub fn put(&mut self, k: Value, v: Value) -> Result<Option<Value>, ValueError> {
        self.assert_mutable("Put")?;
        let added = usize::from(!self.table.contains_key(&k));
        self.assert_type(&k, &v, added)?;
        Ok(self.table.insert(k.frozen_copy(), v))
    }

    /// Put every association of `other`. Nothing is put if any fails.
    pub fn put_all(&mut self, other: &Map) -> Result<(), ValueError> {
        if other.is_empty() {
            return Ok(());
        }
        self.assert_mutable("PutAll")?;
        let mut added = 0;
        for (k, v) in other.iter() {
            if !self.table.contains_key(k) {
                added += 1;
            }
            self.assert_type(k, v, added)?;
        }
        self.table.reserve(added);
        for (k, v) in other.iter() {
            self.table.insert(k.clone(), v.clone());
        }
        Ok(())
    }

    /// Remove the association for `k`, returning its value.
    pub fn remove(&mut self, k: &Value) -> Result<Option<Value>, ValueError> {
        self.assert_mutable("Remove")?;
        if !self.table.contains_key(k) {
            return Ok(None);
        }
        self.assert_shrink(std::slice::from_ref(k))?;
        Ok(self.table.remove(k))
    }

    /// Remove the associations for all of `keys`. Nothing is removed if
    /// the result would violate the map's type.
    pub fn remove_all(&mut self, keys: &[Value]) -> Result<(), ValueError> {
        self.assert_mutable("RemoveAll")?;
        let mut present: OrderedTable<Value, ()> = OrderedTable::with_capacity(keys.len());
        for k in keys.iter().filter(|k| self.table.contains_key(k)) {
            present.insert(k.clone(), ());
        }
        let present: Vec<Value> = present.keys().cloned().collect();
        self.assert_shrink(&present)?;
        for k in &present {
            self.table.remove(k);
        }
        Ok(())
    }

    /// Check that removing the distinct, present `keys` leaves content the
    /// declared type still accepts.
    fn assert_shrink(&self, keys: &[Value]) -> Result<(), ValueError> {
        let Some(typ) = &self.typ else {
            return Ok(());
        };
        if let Value::Struct(st) = typ {
            let required = keys
                .iter()
                .find(|&k| st.get(k).is_some_and(StructEntry::is_required));
            if let Some(key) = required {
                return Err(ValueError::RequiredKey {
                    typ: typ.clone(),
                    key: key.clone(),
                });
            }
        }
        let size = self.table.len().saturating_sub(keys.len());
        if size < bounds_of(typ).min {
            Err(ValueError::size(typ, size))
        } else {
            Ok(())
        }
    }

    /// Constrain the map by `typ`, which must accept the current content.
    /// The default map type removes the constraint.
    pub fn set_type(&mut self, typ: Value) -> Result<(), ValueError> {
        self.assert_mutable("SetType")?;
        match typ {
            Value::MapType => {
                self.typ = None;
                Ok(())
            }
            Value::SizedMap(_) | Value::Struct(_) => {
                if map_instance(&mut RecursionGuard::new(), &typ, self) {
                    self.typ = Some(typ);
                    Ok(())
                } else {
                    Err(ValueError::mismatch(&typ, &Value::from(self.clone())))
                }
            }
            other => Err(ValueError::IllegalArgument {
                name: "set_type",
                index: 0,
                expected: "map type",
                actual: other,
            }),
        }
    }

    // === Derived maps ===
    //
    // These never mutate the receiver. The result has the receiver's type
    // constraint and frozen state.

    fn mutable_copy(&self) -> Map {
        Map {
            table: self.table.clone(),
            typ: self.typ.clone(),
            frozen: false,
        }
    }

    fn refreeze(&self, mut m: Map) -> Map {
        if self.frozen {
            m.freeze();
        }
        m
    }

    /// A copy holding the associations of both maps, `other` winning on
    /// shared keys.
    pub fn merge(&self, other: &Map) -> Result<Map, ValueError> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        let mut c = self.mutable_copy();
        c.put_all(other)?;
        Ok(self.refreeze(c))
    }

    /// A copy associating `v` with `k`.
    pub fn with(&self, k: Value, v: Value) -> Result<Map, ValueError> {
        if self.get(&k).is_some_and(|old| old.equals(&v)) {
            return Ok(self.clone());
        }
        let mut c = self.mutable_copy();
        c.put(k, v)?;
        Ok(self.refreeze(c))
    }

    /// A copy without the association for `k`.
    pub fn without(&self, k: &Value) -> Result<Map, ValueError> {
        if !self.contains_key(k) {
            return Ok(self.clone());
        }
        let mut c = self.mutable_copy();
        c.remove(k)?;
        Ok(self.refreeze(c))
    }

    /// A copy without the associations for `keys`.
    pub fn without_all(&self, keys: &[Value]) -> Result<Map, ValueError> {
        let mut c = self.mutable_copy();
        c.remove_all(keys)?;
        Ok(self.refreeze(c))
    }

    // === Freezing ===

    /// Freeze the map and every nested mutable value. Keys are frozen on
    /// insertion already.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }
        self.frozen = true;
        for v in self.table.values_mut() {
            v.freeze();
        }
    }

    /// A copy in the requested state. A frozen copy freezes copies of nested
    /// mutable values; a mutable copy is shallow.
    pub fn copy(&self, frozen: bool) -> Map {
        let mut c = self.mutable_copy();
        if frozen {
            c.freeze();
        }
        c
    }

    pub fn frozen_copy(&self) -> Map {
        if self.frozen {
            self.clone()
        } else {
            self.copy(true)
        }
    }

    pub(crate) fn table_mut(&mut self) -> &mut OrderedTable<Value, Value> {
        &mut self.table
    }

    // === Kernel ===

    pub(crate) fn deep_equal(&self, guard: &mut RecursionGuard, other: &Map) -> bool {
        self.len() == other.len()
            && self.table.iter().all(|(k, v)| match other.get(k) {
                Some(ov) => deep_equal(guard, v, ov),
                None => false,
            })
    }

    /// Order independent: entry hashes are sorted before they are combined.
    pub(crate) fn deep_hash(&self, seen: &mut Seen) -> u64 {
        let mut hashes: Vec<u64> = self
            .table
            .iter()
            .map(|(k, v)| deep_hash(seen, k) ^ deep_hash(seen, v))
            .collect();
        hashes.sort_unstable();
        hashes.into_iter().fold(1, mix)
    }
}

impl DeepAssignable for Map {
    fn deep_assignable(&self, guard: &mut RecursionGuard, declared: &Value, candidate: &Value) -> bool {
        match candidate {
            Value::Map(other) => self.deep_equal(guard, other),
            _ => reverse(guard, candidate, declared),
        }
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Value, &'a Value);
    type IntoIter = Iter<'a, Value, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.iter()
    }
}

impl FromIterator<(Value, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        Map::from_pairs(iter)
    }
}

/// Size bounds of a map type constraint.
fn bounds_of(typ: &Value) -> Bounds {
    match typ {
        Value::SizedMap(t) => t.bounds(),
        Value::Struct(t) => t.bounds(),
        _ => Bounds::ANY,
    }
}
