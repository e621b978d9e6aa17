//! Per-tag capability flags.
//!
//! The assignability engine consults these before matching on payloads, so
//! "does this side delegate?" is a bit test rather than a type switch.

use bitflags::bitflags;

bitflags! {
    /// Capabilities of a value's variant, derived from its [`Tag`](crate::Tag).
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        /// Unconstrained type of its family.
        const DEFAULT = 1 << 0;
        /// Denotes exactly one value.
        const EXACT = 1 << 1;
        /// Carries a size or range bound.
        const SIZED = 1 << 2;
        /// Array or map shaped.
        const CONTAINER = 1 << 3;

        /// Structural comparison hook, run under the recursion guard.
        const DEEP_ASSIGNABLE = 1 << 8;
        /// May answer an assignability question on behalf of the declared side.
        const REVERSE_ASSIGNABLE = 1 << 9;
        /// Not, AllOf, AnyOf, OneOf.
        const COMBINATOR = 1 << 10;
    }
}

impl TypeFlags {
    /// Whether a check against this candidate can be delegated to it.
    #[inline]
    pub const fn delegates(self) -> bool {
        self.contains(Self::REVERSE_ASSIGNABLE)
    }

    #[inline]
    pub const fn is_deep(self) -> bool {
        self.contains(Self::DEEP_ASSIGNABLE)
    }
}
