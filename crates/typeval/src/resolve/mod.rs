//! Alias resolution.
//!
//! A type tree built before all of its names are known holds unbound
//! [`Named`](crate::Value::Named) placeholders. [`resolve`] walks the tree
//! once, in place, offering every nested slot to an [`AliasProvider`] which
//! may substitute it. The walk does not descend into named references, so
//! it terminates even when binding makes the graph cyclic.

use std::mem;

use typeval_stack::ensure_sufficient_stack;

use crate::table::OrderedTable;
use crate::Value;

/// Substitutes nodes during [`resolve`].
pub trait AliasProvider {
    /// The value to store in place of `v`. Returning a clone of `v` keeps it.
    fn replace(&mut self, v: &Value) -> Value;
}

/// Two-way mapping between names and the types they denote.
#[derive(Debug, Default)]
pub struct AliasMap {
    names: OrderedTable<Value, String>,
    types: OrderedTable<String, Value>,
}

impl AliasMap {
    pub fn new() -> Self {
        AliasMap::default()
    }

    /// Register `typ` under `name`.
    pub fn add(&mut self, typ: Value, name: impl Into<String>) {
        let name = name.into();
        let typ = typ.frozen_copy();
        self.names.insert(typ.clone(), name.clone());
        self.types.insert(name, typ);
    }

    /// The name registered for a type equal to `typ`.
    pub fn get_name(&self, typ: &Value) -> Option<&str> {
        self.names.get(typ).map(String::as_str)
    }

    pub fn get_type(&self, name: &str) -> Option<&Value> {
        self.types.get(&name.to_owned())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl AliasProvider for AliasMap {
    /// Binds unbound references whose name is registered. Everything else
    /// is kept.
    fn replace(&mut self, v: &Value) -> Value {
        if let Value::Named(n) = v {
            if n.target().is_none() {
                if let Some(target) = self.get_type(n.name()) {
                    if let Err(err) = n.bind(target.clone()) {
                        tracing::warn!(name = n.name(), %err, "alias already bound");
                    }
                }
            }
        }
        v.clone()
    }
}

/// Offer every slot nested in `root` to `provider`, storing its answers.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.tag()))]
pub fn resolve(root: &mut Value, provider: &mut dyn AliasProvider) {
    resolve_children(root, provider);
}

fn resolve_slot(slot: &mut Value, provider: &mut dyn AliasProvider) {
    let mut replaced = provider.replace(slot);
    if !matches!(replaced, Value::Named(_)) {
        resolve_children(&mut replaced, provider);
    }
    *slot = replaced;
}

fn resolve_all(slots: &mut Vec<Value>, provider: &mut dyn AliasProvider) {
    let mut detached = mem::take(slots);
    for slot in &mut detached {
        resolve_slot(slot, provider);
    }
    *slots = detached;
}

fn resolve_children(v: &mut Value, provider: &mut dyn AliasProvider) {
    ensure_sufficient_stack(|| match v {
        Value::Array(a) => resolve_all(a.make_mut().elements_mut(), provider),
        Value::Map(m) => {
            let table = m.make_mut().table_mut();
            let mut rehash = false;
            for (k, val) in table.entries_mut() {
                let mut key = provider.replace(k).frozen_copy();
                if !identical(k, &key) {
                    rehash = true;
                }
                if !matches!(key, Value::Named(_)) {
                    resolve_children(&mut key, provider);
                }
                *k = key;
                resolve_slot(val, provider);
            }
            if rehash {
                table.rehash();
            }
        }
        Value::Entry(e) => {
            let (k, val) = e.make_mut().parts_mut();
            resolve_slot(k, provider);
            resolve_slot(val, provider);
        }
        Value::Sensitive(s) => resolve_slot(s.make_mut().wrapped_mut(), provider),
        Value::SizedArray(t) => resolve_slot(t.make_mut().element_mut(), provider),
        Value::Tuple(t) => resolve_all(t.make_mut().types_mut(), provider),
        Value::SizedMap(t) => {
            let (k, val) = t.make_mut().parts_mut();
            resolve_slot(k, provider);
            resolve_slot(val, provider);
        }
        Value::Struct(t) => {
            let mut entries = mem::take(t.make_mut().entries_mut());
            for e in &mut entries {
                let (k, val) = e.parts_mut();
                resolve_slot(k, provider);
                resolve_slot(val, provider);
            }
            *t.make_mut().entries_mut() = entries;
        }
        Value::Not(n) => resolve_slot(n.make_mut().negated_mut(), provider),
        Value::Logical(l) => resolve_all(l.make_mut().members_mut(), provider),
        _ => {}
    });
}

/// Whether `b` is the very value `a`, by reference for heap values.
fn identical(a: &Value, b: &Value) -> bool {
    if a.addr() == 0 && b.addr() == 0 {
        a.equals(b)
    } else {
        a.same_ref(b)
    }
}
