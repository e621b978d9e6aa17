//! Insertion ordered hash table.
//!
//! # Layout
//!
//! Nodes live in a slab (`slots`) and are linked twice:
//!
//! - **Bucket chains** (`hash_next`): each bucket in the power-of-two
//!   `buckets` array holds the head of a singly linked chain of the nodes
//!   whose spread hash maps to it. New nodes are pushed at the head.
//! - **Order list** (`prev`/`next`): a doubly linked list through every live
//!   node in insertion order, from `first` to `last`. Iteration, equality and
//!   hashing of maps follow this list.
//!
//! Removal unlinks a node from both lists in O(1) and puts its slot on a
//! free list. Replacing the value of an existing key keeps its position.
//!
//! # Growth
//!
//! Adding `delta` entries when `len + delta > capacity * load_factor`
//! rebuilds the table with the next power-of-two capacity. The rebuild walks
//! the order list, so insertion order survives and the slab is compacted.

use std::fmt;
use std::mem;

use crate::config::{table_size_for, TableConfig};
use crate::Value;

/// Keys usable in an [`OrderedTable`].
pub trait TableKey {
    fn table_hash(&self) -> u64;
    fn table_eq(&self, other: &Self) -> bool;
}

impl TableKey for Value {
    #[inline]
    fn table_hash(&self) -> u64 {
        self.hash_code()
    }

    #[inline]
    fn table_eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl TableKey for String {
    fn table_hash(&self) -> u64 {
        crate::kernel::hash::str_hash(self)
    }

    fn table_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Spread high bits into the low bits used for bucket selection.
#[inline]
fn spread(h: u64) -> u64 {
    h ^ (h >> 16)
}

#[derive(Clone)]
struct Node<K, V> {
    key: K,
    value: V,
    hash: u64,
    hash_next: Option<usize>,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone)]
enum Slot<K, V> {
    Occupied(Node<K, V>),
    /// Free slot, linked to the next free slot.
    Vacant(Option<usize>),
}

/// Hash table iterating in insertion order.
#[derive(Clone)]
pub struct OrderedTable<K, V> {
    buckets: Vec<Option<usize>>,
    slots: Vec<Slot<K, V>>,
    free: Option<usize>,
    first: Option<usize>,
    last: Option<usize>,
    len: usize,
    config: TableConfig,
}

impl<K: TableKey, V> OrderedTable<K, V> {
    /// An empty table. Buckets are allocated on first insertion.
    pub fn new() -> Self {
        OrderedTable {
            buckets: Vec::new(),
            slots: Vec::new(),
            free: None,
            first: None,
            last: None,
            len: 0,
            config: TableConfig::new(),
        }
    }

    /// A table sized for `entries` entries without growing. Zero means the
    /// configured initial capacity.
    pub fn with_capacity(entries: usize) -> Self {
        Self::with_config(entries, TableConfig::new())
    }

    pub fn with_config(entries: usize, config: TableConfig) -> Self {
        let buckets = config.buckets_for(entries);
        OrderedTable {
            buckets: vec![None; buckets],
            slots: Vec::with_capacity(entries),
            free: None,
            first: None,
            last: None,
            len: 0,
            config,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets (always a power of two, or zero before first use).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (spread(hash) as usize) & (self.buckets.len() - 1)
    }

    fn node(&self, index: usize) -> Option<&Node<K, V>> {
        match self.slots.get(index) {
            Some(Slot::Occupied(n)) => Some(n),
            _ => None,
        }
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(index) {
            Some(Slot::Occupied(n)) => Some(n),
            _ => None,
        }
    }

    fn find(&self, key: &K, hash: u64) -> Option<usize> {
        if self.buckets.is_empty() {
            return None;
        }
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(i) = cur {
            let node = self.node(i)?;
            if node.hash == hash && node.key.table_eq(key) {
                return Some(i);
            }
            cur = node.hash_next;
        }
        None
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let i = self.find(key, key.table_hash())?;
        self.node(i).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key, key.table_hash())?;
        self.node_mut(i).map(|n| &mut n.value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let i = self.find(key, key.table_hash())?;
        self.node(i).map(|n| (&n.key, &n.value))
    }

    #[inline]
    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key, key.table_hash()).is_some()
    }

    /// Insert or replace. A replaced value keeps its position and is returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = key.table_hash();
        if let Some(i) = self.find(&key, hash) {
            return self.node_mut(i).map(|n| mem::replace(&mut n.value, value));
        }
        self.reserve(1);
        self.link(key, value, hash);
        None
    }

    /// Make room for `additional` new entries, growing at most once.
    pub fn reserve(&mut self, additional: usize) {
        if self.buckets.is_empty() {
            self.buckets = vec![None; 1];
        }
        let wanted = self.len + additional;
        let cap = self.buckets.len();
        if wanted as f64 > cap as f64 * self.config.load_factor {
            let needed = (wanted as f64 / self.config.load_factor).ceil() as usize;
            self.rebuild(table_size_for(needed.max(cap + 1)), false);
        }
    }

    fn link(&mut self, key: K, value: V, hash: u64) {
        let bucket = self.bucket_of(hash);
        let node = Node {
            key,
            value,
            hash,
            hash_next: self.buckets[bucket],
            prev: self.last,
            next: None,
        };
        let index = match self.free {
            Some(i) => {
                self.free = match self.slots[i] {
                    Slot::Vacant(next) => next,
                    Slot::Occupied(_) => None,
                };
                self.slots[i] = Slot::Occupied(node);
                i
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        };
        self.buckets[bucket] = Some(index);
        match self.last {
            Some(l) => {
                if let Some(n) = self.node_mut(l) {
                    n.next = Some(index);
                }
            }
            None => self.first = Some(index),
        }
        self.last = Some(index);
        self.len += 1;
    }

    /// Remove `key`, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if self.buckets.is_empty() {
            return None;
        }
        let hash = key.table_hash();
        let bucket = self.bucket_of(hash);
        let mut chain_prev: Option<usize> = None;
        let mut cur = self.buckets[bucket];
        while let Some(i) = cur {
            let node = self.node(i)?;
            if node.hash == hash && node.key.table_eq(key) {
                let (hash_next, prev, next) = (node.hash_next, node.prev, node.next);
                match chain_prev {
                    Some(p) => {
                        if let Some(pn) = self.node_mut(p) {
                            pn.hash_next = hash_next;
                        }
                    }
                    None => self.buckets[bucket] = hash_next,
                }
                match prev {
                    Some(p) => {
                        if let Some(pn) = self.node_mut(p) {
                            pn.next = next;
                        }
                    }
                    None => self.first = next,
                }
                match next {
                    Some(n) => {
                        if let Some(nn) = self.node_mut(n) {
                            nn.prev = prev;
                        }
                    }
                    None => self.last = prev,
                }
                let slot = mem::replace(&mut self.slots[i], Slot::Vacant(self.free));
                self.free = Some(i);
                self.len -= 1;
                return match slot {
                    Slot::Occupied(n) => Some((n.key, n.value)),
                    Slot::Vacant(_) => None,
                };
            }
            chain_prev = Some(i);
            cur = node.hash_next;
        }
        None
    }

    /// Recompute every key's hash and rebuild the chains at the current
    /// capacity. Needed after keys were replaced in place.
    pub fn rehash(&mut self) {
        let cap = self.buckets.len().max(1);
        self.rebuild(cap, true);
    }

    /// Rebuild with `capacity` buckets, compacting the slab in insertion order.
    fn rebuild(&mut self, capacity: usize, rehash: bool) {
        tracing::trace!(len = self.len, from = self.buckets.len(), to = capacity, rehash, "rebuilding table");
        let mut old: Vec<Option<Node<K, V>>> = mem::take(&mut self.slots)
            .into_iter()
            .map(|s| match s {
                Slot::Occupied(n) => Some(n),
                Slot::Vacant(_) => None,
            })
            .collect();
        let mut cur = self.first;
        self.buckets = vec![None; capacity];
        self.slots = Vec::with_capacity(self.len);
        self.free = None;
        self.first = None;
        self.last = None;
        self.len = 0;
        while let Some(i) = cur {
            let Some(node) = old.get_mut(i).and_then(Option::take) else {
                break;
            };
            cur = node.next;
            let hash = if rehash {
                node.key.table_hash()
            } else {
                node.hash
            };
            self.link(node.key, node.value, hash);
        }
    }

    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(|b| *b = None);
        self.slots.clear();
        self.free = None;
        self.first = None;
        self.last = None;
        self.len = 0;
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            table: self,
            cur: self.first,
            remaining: self.len,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        self.first.and_then(|i| self.node(i)).map(|n| (&n.key, &n.value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        self.last.and_then(|i| self.node(i)).map(|n| (&n.key, &n.value))
    }

    /// Mutable access to every entry, in unspecified order.
    ///
    /// Changing a key's identity through this leaves the chains stale until
    /// [`rehash`](Self::rehash) is called.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = (&mut K, &mut V)> + '_ {
        self.slots.iter_mut().filter_map(|s| match s {
            Slot::Occupied(n) => Some((&mut n.key, &mut n.value)),
            Slot::Vacant(_) => None,
        })
    }

    /// Mutable access to every value, in unspecified order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.entries_mut().map(|(_, v)| v)
    }
}

impl<K: TableKey, V> Default for OrderedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TableKey, V> FromIterator<(K, V)> for OrderedTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut table = OrderedTable::with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            table.insert(k, v);
        }
        table
    }
}

impl<K: TableKey + fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedTable<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Insertion-order iterator over an [`OrderedTable`].
pub struct Iter<'a, K, V> {
    table: &'a OrderedTable<K, V>,
    cur: Option<usize>,
    remaining: usize,
}

impl<'a, K: TableKey, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.table.node(self.cur?)?;
        self.cur = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: TableKey, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K: TableKey, V> IntoIterator for &'a OrderedTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
