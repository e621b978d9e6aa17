//! Typeval - a runtime type/value algebra.
//!
//! Every [`Value`] is at once an instance and its own exact type. Types are
//! built from combinators (`any_of`, `all_of`, `one_of`, `not`), range and
//! size constraints, and structural shapes (arrays, tuples, maps, structs).
//! The central question, answered even for recursive type graphs, is:
//!
//! ```text
//! declared.assignable(&candidate)
//! ```
//!
//! # Crate Layout
//!
//! - [`tag`], [`flags`]: variant identifiers and their capabilities
//! - [`value`]: the `Value` enum and its payloads
//! - [`kernel`], [`guard`]: cycle-safe equality, hashing and ordering
//! - [`assign`]: the assignability engine and its hook traits
//! - [`types`], [`array`], [`map`], [`structs`]: type constructors
//! - [`table`]: the insertion ordered hash table behind maps
//! - [`generic`], [`stringer`], [`factory`], [`native`], [`iter`],
//!   [`resolve`]: the surfaces other components build on
//!
//! # Frozen Values
//!
//! Values are immutable unless explicitly created mutable. Frozen values are
//! `Send + Sync` and shared by reference counting; mutable arrays and maps
//! are exclusively owned and checked against their declared type on every
//! mutation.

pub mod array;
pub mod assign;
pub mod config;
pub mod error;
pub mod factory;
pub mod flags;
mod freeze;
pub mod generic;
pub mod guard;
pub mod iter;
pub mod kernel;
pub mod map;
pub mod native;
pub mod resolve;
pub mod stringer;
pub mod structs;
pub mod table;
pub mod tag;
pub mod types;
pub mod value;

use std::sync::Once;

pub use array::Array;
pub use assign::{assignable, DeepAssignable, ReverseAssignable};
pub use config::TableConfig;
pub use error::{Arity, ValueError};
pub use factory::new_value;
pub use flags::TypeFlags;
pub use generic::generic;
pub use iter::{Element, Elements};
pub use map::{Map, MapEntry};
pub use native::{Described, FromValue, Host, IntoValue};
pub use resolve::{resolve, AliasMap, AliasProvider};
pub use stringer::{type_string, TypeStringer};
pub use structs::{StructEntry, Violation};
pub use table::OrderedTable;
pub use tag::{Family, Tag};
pub use value::{Bounds, Heap, NativeValue, Value};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber writing to stderr.
///
/// Does nothing unless `RUST_LOG` is set, for example
/// `RUST_LOG=typeval=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
};
