//! Cycle detection for deep walks.
//!
//! A cyclic type graph (possible through [`Named`](crate::Value::Named)
//! references) would make a naive equality, hash, assignability or
//! stringification walk loop forever. Each walk threads one of these
//! accumulators through its recursion:
//!
//! - [`RecursionGuard`] records the *pairs* currently being compared
//!   (equality, assignability). Meeting a pair already on the chain yields
//!   `true`: the comparison is assumed to hold for the cyclic part, and any
//!   mismatch is found on the acyclic part.
//! - [`Seen`] records the *nodes* currently being visited (hashing,
//!   stringification). Meeting a node already on the chain yields a neutral
//!   contribution or a placeholder.
//!
//! Identity is the heap address of the payload. Inline variants (integers,
//! unit types) have no address and are never tracked; they cannot close a
//! cycle on their own.

use smallvec::SmallVec;

use crate::Value;

/// Chain of in-progress pairwise comparisons.
#[derive(Debug, Default)]
pub struct RecursionGuard {
    pairs: SmallVec<[(usize, usize); 8]>,
}

impl RecursionGuard {
    pub fn new() -> Self {
        RecursionGuard {
            pairs: SmallVec::new(),
        }
    }

    /// Number of comparisons in progress.
    #[inline]
    pub fn depth(&self) -> usize {
        self.pairs.len()
    }

    /// Run `f` with the pair `(a, b)` pushed on the chain.
    ///
    /// Returns `true` without calling `f` if the pair is already in
    /// progress. Pairs where neither side has heap identity are not tracked.
    pub fn visit(&mut self, a: &Value, b: &Value, f: impl FnOnce(&mut Self) -> bool) -> bool {
        let key = (a.addr(), b.addr());
        if key == (0, 0) {
            return f(self);
        }
        if self.pairs.contains(&key) {
            return true;
        }
        self.pairs.push(key);
        let result = f(self);
        self.pairs.pop();
        result
    }
}

/// Chain of nodes currently being visited.
#[derive(Debug, Default)]
pub struct Seen {
    nodes: SmallVec<[usize; 8]>,
}

impl Seen {
    pub fn new() -> Self {
        Seen {
            nodes: SmallVec::new(),
        }
    }

    /// Whether `v` is on the chain.
    pub fn contains(&self, v: &Value) -> bool {
        let addr = v.addr();
        addr != 0 && self.nodes.contains(&addr)
    }

    /// Run `f` with `v` pushed on the chain, or return `on_cycle` if `v` is
    /// already being visited.
    pub fn visit<R>(&mut self, v: &Value, on_cycle: R, f: impl FnOnce(&mut Self) -> R) -> R {
        let addr = v.addr();
        if addr == 0 {
            return f(self);
        }
        if self.nodes.contains(&addr) {
            return on_cycle;
        }
        self.nodes.push(addr);
        let result = f(self);
        self.nodes.pop();
        result
    }
}
