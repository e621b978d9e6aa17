//! Shared, reference counted payload storage.
//!
//! `Heap<T>` wraps `Arc<T>`. Frozen payloads are shared freely between
//! holders; mutable payloads are reached through [`Heap::make_mut`], which
//! copies the payload first if anyone else still holds it. That gives
//! mutable values their exclusive-owner semantics without a separate type.
//!
//! Node identity (used by the recursion guard) is the allocation address,
//! available through [`Heap::addr`].

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// A heap-allocated, shareable payload.
#[repr(transparent)]
pub struct Heap<T: ?Sized>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(crate) fn new(value: T) -> Self {
        Heap(Arc::new(value))
    }
}

impl<T: ?Sized> Heap<T> {
    #[inline]
    pub(crate) fn from_arc(arc: Arc<T>) -> Self {
        Heap(arc)
    }

    /// Whether both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Allocation address, used as node identity.
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Whether this handle is the only one.
    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.0) == 1
    }
}

impl<T: Clone> Heap<T> {
    /// Mutable access, copying the payload if it is shared.
    #[inline]
    pub(crate) fn make_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.0)
    }
}

impl<T: ?Sized> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> Clone for Heap<T> {
    #[inline]
    fn clone(&self) -> Self {
        Heap(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> AsRef<T> for Heap<T> {
    #[inline]
    fn as_ref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests;
