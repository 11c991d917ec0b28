//! Container Contract Harness
//!
//! Verifies that an implementation of a well-known container abstraction
//! obeys the structural and behavioral contract of that abstraction, using
//! only its capability trait surface.
//!
//! # Abstractions
//!
//! - **Collection**: add, remove, contains, copy-to, clear
//! - **List**: collection plus positional index-of, insert, remove-at
//! - **Dictionary**: keyed set/get/add, duplicate rejection, pair traversal
//! - **Enumerable**: cursor traversal, exhaustion and reset (sync and async)
//! - **Stream**: write, seek, bounded copy, truncate, read (sync and async)
//!
//! Each abstraction has a typed surface and an erased surface working on
//! [`Opaque`] values.
//!
//! # Example
//!
//! ```rust
//! use contract_harness::{Harness, TypeRegistry};
//! use std::collections::BTreeSet;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_seeded::<BTreeSet<u32>, u32>();
//!
//! let harness = Harness::default().with_registry(registry);
//! let set: BTreeSet<u32> = harness.collection(&[1, 2, 3]).unwrap();
//! assert!(set.is_empty());
//! ```

pub mod assert;
pub mod capability;
pub mod config;
pub mod cursor;
pub mod error;
pub mod family;
pub mod harness;
pub mod introspect;
pub mod report;
pub mod suite;
pub mod value;

pub use capability::{
    AsyncByteStream, AsyncEnumerable, ByteStream, Capability, Collection, Dictionary,
    Enumerable, ErasedCollection, ErasedDictionary, ErasedEnumerable, ErasedList, List, Variant,
};
pub use config::{EnumerableConfig, HarnessConfig, StreamConfig};
pub use cursor::{Cursor, CursorGuard};
pub use error::{ContainerError, HarnessError, HarnessResult, ResolutionFailure};
pub use harness::{CollectingReporter, Harness, PanicReporter, Reporter, TracingReporter};
pub use introspect::{ConstructorBinding, ConstructorInfo, FromSeed, ParamInfo, TypeRegistry};
pub use report::{ReportSummary, RunRecord, RunStatus, SuiteReport};
pub use suite::Suite;
pub use value::Opaque;
