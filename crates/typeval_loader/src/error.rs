//! Loader errors.

use thiserror::Error;

/// Failure to publish an entry or a namespace.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoaderError {
    /// A name is already bound to a different value.
    #[error("attempt to override entry {name:?}")]
    AttemptToOverride { name: String },

    /// A finder returned a bundle that lacks the name it was asked for.
    #[error("map returned from finder doesn't contain original key {name:?}")]
    MissingRequestedKey { name: String },

    /// A namespace creator produced a loader that clashes with one already
    /// registered under the same name.
    #[error("namespace {name:?} is already defined")]
    NamespaceDefined { name: String },
}
