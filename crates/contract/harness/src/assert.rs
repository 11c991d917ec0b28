//! Invariant assertion primitives.
//!
//! Every check returns `HarnessResult<()>` (or the checked value) so the
//! scripts can fail fast with `?`. None of these hold state.

use crate::error::{HarnessError, HarnessResult};
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

/// Minimum number of seed items every script needs.
pub const MIN_SEED_ITEMS: usize = 2;

/// Fail with `message` unless `condition` holds.
pub fn ensure(condition: bool, step: &str, message: impl Into<String>) -> HarnessResult<()> {
    if condition {
        Ok(())
    } else {
        Err(HarnessError::violation(step, message))
    }
}

/// Fail unless `actual == expected`.
pub fn ensure_eq<T>(step: &str, expected: T, actual: T, message: &str) -> HarnessResult<()>
where
    T: PartialEq + Debug,
{
    if expected == actual {
        Ok(())
    } else {
        Err(HarnessError::violation(
            step,
            format!("{}: expected {:?}, got {:?}", message, expected, actual),
        ))
    }
}

/// Fail if `actual == unexpected`.
pub fn ensure_ne<T>(step: &str, unexpected: T, actual: T, message: &str) -> HarnessResult<()>
where
    T: PartialEq + Debug,
{
    if unexpected != actual {
        Ok(())
    } else {
        Err(HarnessError::violation(
            step,
            format!("{}: did not expect {:?}", message, actual),
        ))
    }
}

/// Unwrap `value`, failing with `message` when it is absent.
pub fn ensure_some<T>(step: &str, value: Option<T>, message: &str) -> HarnessResult<T> {
    value.ok_or_else(|| HarnessError::violation(step, message))
}

/// Order-independent comparison of two element sets.
///
/// Only `PartialEq` is required, so keys and values that are neither
/// hashable nor ordered can still be compared.
pub fn ensure_same_elements<T>(
    step: &str,
    expected: &[T],
    actual: &[T],
    message: &str,
) -> HarnessResult<()>
where
    T: PartialEq + Debug,
{
    let mismatch = || {
        HarnessError::violation(
            step,
            format!("{}: expected {:?}, got {:?}", message, expected, actual),
        )
    };

    if expected.len() != actual.len() {
        return Err(mismatch());
    }

    let mut matched = vec![false; actual.len()];
    for item in expected {
        let slot = actual
            .iter()
            .enumerate()
            .position(|(i, candidate)| !matched[i] && candidate == item)
            .ok_or_else(mismatch)?;
        matched[slot] = true;
    }
    Ok(())
}

/// Run an operation that the contract says must be rejected.
///
/// Any `Err` or panic counts as a rejection; the error kind is never
/// inspected. Only a successful return is a violation.
pub fn expect_rejection<R, E, F>(step: &str, message: &str, op: F) -> HarnessResult<()>
where
    F: FnOnce() -> Result<R, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Ok(_)) => Err(HarnessError::violation(step, message)),
        Ok(Err(_)) | Err(_) => Ok(()),
    }
}

/// Run a probe that must not panic and return what it produced.
pub fn ensure_no_panic<R, F>(step: &str, message: &str, op: F) -> HarnessResult<R>
where
    F: FnOnce() -> R,
{
    panic::catch_unwind(AssertUnwindSafe(op)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        HarnessError::violation(step, format!("{}: {}", message, detail))
    })
}

/// Validate a seed set: at least `min` items, pairwise distinct.
pub fn ensure_seed<T: PartialEq>(items: &[T], min: usize) -> HarnessResult<()> {
    if items.len() < min {
        return Err(HarnessError::InvalidSeed(format!(
            "at least {} items required, got {}",
            min,
            items.len()
        )));
    }
    ensure_distinct(items.iter())
}

/// Fail with `InvalidSeed` if any two items compare equal.
pub fn ensure_distinct<'a, T, I>(items: I) -> HarnessResult<()>
where
    T: PartialEq + 'a,
    I: Iterator<Item = &'a T> + Clone,
{
    for (i, a) in items.clone().enumerate() {
        if items.clone().skip(i + 1).any(|b| a == b) {
            return Err(HarnessError::InvalidSeed(format!(
                "item #{} is not distinguishable from a later item",
                i
            )));
        }
    }
    Ok(())
}
