//! Tunables for the ordered hash table.

/// Sizing parameters for [`OrderedTable`](crate::table::OrderedTable).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableConfig {
    /// Expected entry count used when no capacity is given.
    pub initial_capacity: usize,
    /// Fill ratio above which the bucket array grows.
    pub load_factor: f64,
}

impl TableConfig {
    /// Default expected entry count.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Default fill ratio.
    pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

    /// Upper bound on the bucket count.
    pub const MAXIMUM_CAPACITY: usize = 1 << 30;

    pub const fn new() -> Self {
        TableConfig {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
            load_factor: Self::DEFAULT_LOAD_FACTOR,
        }
    }

    #[must_use]
    pub const fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Set the load factor. Values outside `(0, 1]` fall back to the default.
    #[must_use]
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = if load_factor > 0.0 && load_factor <= 1.0 {
            load_factor
        } else {
            Self::DEFAULT_LOAD_FACTOR
        };
        self
    }

    /// Bucket count for a table expected to hold `entries` entries.
    pub fn buckets_for(&self, entries: usize) -> usize {
        let entries = if entries == 0 {
            self.initial_capacity
        } else {
            entries
        };
        table_size_for((entries as f64 / self.load_factor) as usize)
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Smallest power of two `>= n`, clamped to `[1, MAXIMUM_CAPACITY]`.
pub const fn table_size_for(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    let p = n.next_power_of_two();
    if p > TableConfig::MAXIMUM_CAPACITY || p == 0 {
        TableConfig::MAXIMUM_CAPACITY
    } else {
        p
    }
}

#[cfg(test)]
mod tests;
