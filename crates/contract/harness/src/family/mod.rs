//! Container harness family: one scripted routine per abstraction.
//!
//! Every routine comes in two shapes. The type-based form constructs the
//! container itself (through the [`TypeRegistry`] or `Default`) and returns
//! it once the script passed; the instance form runs the script against a
//! container the caller already owns. Scripts stop at the first broken
//! invariant.
//!
//! [`TypeRegistry`]: crate::introspect::TypeRegistry

pub mod collection;
pub mod dictionary;
pub mod enumerable;
pub mod list;
pub mod stream;

pub use enumerable::EnumerableHarness;
pub use stream::StreamHarness;

use crate::error::{ContainerError, HarnessError, HarnessResult};

/// Turn a container error on a call that must succeed into a violation.
pub(crate) fn checked<R>(step: &str, result: Result<R, ContainerError>) -> HarnessResult<R> {
    result.map_err(|err| HarnessError::violation(step, format!("unexpected error: {}", err)))
}
