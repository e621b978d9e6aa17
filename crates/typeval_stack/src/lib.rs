//! Stack growth for deep walks over value and type graphs.
//!
//! Equality, hashing, assignability and stringification all recurse into
//! nested containers. A sufficiently nested literal (an array of arrays of
//! arrays...) would exhaust a thread's default stack long before any cycle
//! guard comes into play, so every recursive entry point in `typeval` runs
//! its body through [`ensure_sufficient_stack`].
//!
//! On native targets the stack is extended on demand by `stacker`. On wasm
//! the closure is called directly.

/// Remaining stack below which a new segment is allocated (128KB).
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
pub const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Stack growth parameters.
///
/// The defaults mirror [`RED_ZONE`] and [`STACK_PER_RECURSION`]; hosts that
/// walk unusually wide frames can raise them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackConfig {
    /// Grow when less than this many bytes remain.
    pub red_zone: usize,
    /// Bytes allocated per growth step.
    pub segment: usize,
}

impl StackConfig {
    pub const fn new() -> Self {
        StackConfig {
            red_zone: RED_ZONE,
            segment: STACK_PER_RECURSION,
        }
    }

    #[must_use]
    pub const fn with_red_zone(mut self, red_zone: usize) -> Self {
        self.red_zone = red_zone;
        self
    }

    #[must_use]
    pub const fn with_segment(mut self, segment: usize) -> Self {
        self.segment = segment;
        self
    }
}

impl Default for StackConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Run `f`, growing the stack first if the red zone has been reached.
///
/// ```text
/// fn deep_hash(v: &Value, seen: &mut Seen) -> u64 {
///     ensure_sufficient_stack(|| match v {
///         Value::Array(a) => a.iter().fold(1, |h, e| h * 31 + deep_hash(e, seen)),
///         _ => v.shallow_hash(),
///     })
/// }
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    grow_with(StackConfig::new(), f)
}

/// [`ensure_sufficient_stack`] with explicit growth parameters.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn grow_with<R>(config: StackConfig, f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(config.red_zone, config.segment, f)
}

/// wasm manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn grow_with<R>(_config: StackConfig, f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
