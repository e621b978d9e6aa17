//! Deep equality, hashing and ordering.
//!
//! These walks dispatch on variant pairs and hand composite payloads their
//! accumulator ([`RecursionGuard`](crate::guard::RecursionGuard) or
//! [`Seen`](crate::guard::Seen)) so that cyclic graphs terminate.

pub mod compare;
pub mod equal;
pub mod hash;

#[cfg(test)]
mod tests;
