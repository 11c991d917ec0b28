//! Capability sets: the trait surfaces a container must expose to be eligible
//! for a harness family.
//!
//! Each abstraction has a typed trait and an erased trait over [`Opaque`]
//! values. Implementations for the standard library containers live next to
//! the traits.
//!
//! [`Opaque`]: crate::value::Opaque

mod collection;
mod dictionary;
mod enumerable;
mod list;
mod stream;

pub use collection::{copy_into, Collection, ErasedCollection};
pub use dictionary::{Dictionary, ErasedDictionary};
pub use enumerable::{from_fn, AsyncEnumerable, Enumerable, ErasedEnumerable, FnEnumerable};
pub use list::{ErasedList, List};
pub use stream::{AsyncByteStream, AsyncSetLen, ByteStream, SetLen};

use serde::{Deserialize, Serialize};

/// The abstraction a harness run validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Collection,
    List,
    Dictionary,
    Enumerable,
    AsyncEnumerable,
    Stream,
    AsyncStream,
}

impl Capability {
    pub fn all() -> Vec<Capability> {
        vec![
            Capability::Collection,
            Capability::List,
            Capability::Dictionary,
            Capability::Enumerable,
            Capability::AsyncEnumerable,
            Capability::Stream,
            Capability::AsyncStream,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Capability::Collection => "collection",
            Capability::List => "list",
            Capability::Dictionary => "dictionary",
            Capability::Enumerable => "enumerable",
            Capability::AsyncEnumerable => "async-enumerable",
            Capability::Stream => "stream",
            Capability::AsyncStream => "async-stream",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which surface of a capability was exercised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Generic, strongly-typed surface.
    Typed,
    /// Opaque-value surface.
    Erased,
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Typed => write!(f, "typed"),
            Variant::Erased => write!(f, "erased"),
        }
    }
}
