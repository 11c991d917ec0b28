//! Enumerable scripts, synchronous and asynchronous.

use crate::assert::{ensure, ensure_eq, ensure_some};
use crate::capability::{AsyncEnumerable, Enumerable, ErasedEnumerable};
use crate::config::EnumerableConfig;
use crate::cursor::{Cursor, CursorGuard};
use crate::error::{HarnessError, HarnessResult};
use crate::value::Opaque;
use futures::StreamExt;
use std::fmt::Debug;

/// Runs the traversal contract against enumerables.
///
/// A cursor must advance exactly `count` times, then keep refusing to
/// advance. Restartable enumerables must also materialize to `count` items
/// and replay the same traversal after `reset`.
#[derive(Debug, Clone)]
pub struct EnumerableHarness {
    exhaustion_probes: usize,
}

impl Default for EnumerableHarness {
    fn default() -> Self {
        Self::new(&EnumerableConfig::default())
    }
}

impl EnumerableHarness {
    pub fn new(config: &EnumerableConfig) -> Self {
        Self {
            exhaustion_probes: config.exhaustion_probes,
        }
    }

    pub fn run<E>(&self, enumerable: &E, restartable: bool, count: usize) -> HarnessResult<()>
    where
        E: Enumerable + ?Sized,
        E::Item: Clone,
    {
        if restartable {
            let items = enumerable.materialize();
            ensure_eq("enumerable.materialize", count, items.len(), "Count mismatch")?;
        }
        let mut cursor = CursorGuard::new(enumerable.cursor());
        self.traverse_twice(&mut *cursor, restartable, count, |_, _| Ok(()))
    }

    /// Like [`run`](Self::run), and every yielded item must match `expected`
    /// in order.
    pub fn run_sequence<E>(
        &self,
        enumerable: &E,
        restartable: bool,
        expected: &[E::Item],
    ) -> HarnessResult<()>
    where
        E: Enumerable + ?Sized,
        E::Item: Clone + PartialEq + Debug,
    {
        if restartable {
            let items = enumerable.materialize();
            ensure_eq(
                "enumerable.materialize",
                expected,
                items.as_slice(),
                "Materialized items mismatch",
            )?;
        }
        let mut cursor = CursorGuard::new(enumerable.cursor());
        self.traverse_twice(&mut *cursor, restartable, expected.len(), |i, item| {
            ensure_eq(
                "enumerable.traverse",
                &expected[i],
                item,
                &format!("Item #{} mismatch", i),
            )
        })
    }

    /// Erased traversal: every yielded value must be non-null.
    pub fn run_erased<E>(
        &self,
        enumerable: &E,
        restartable: bool,
        count: usize,
    ) -> HarnessResult<()>
    where
        E: ErasedEnumerable + ?Sized,
    {
        if restartable {
            let items = enumerable.materialize_erased();
            ensure_eq("enumerable.materialize", count, items.len(), "Count mismatch")?;
        }
        let mut cursor = CursorGuard::new(enumerable.erased_cursor());
        self.traverse_twice(&mut *cursor, restartable, count, |i, item: &Opaque| {
            ensure(
                !item.is_null(),
                "enumerable.traverse",
                format!("Item #{} is null", i),
            )
        })
    }

    /// Asynchronous traversal. There is no reset: a reusable enumerable is
    /// checked by materializing it once before the traversal.
    pub async fn run_async<E>(
        &self,
        enumerable: &E,
        reusable: bool,
        count: usize,
    ) -> HarnessResult<()>
    where
        E: AsyncEnumerable + ?Sized,
    {
        if reusable {
            let items: Vec<E::Item> = enumerable.stream().collect().await;
            ensure_eq("enumerable.materialize", count, items.len(), "Count mismatch")?;
        }

        let mut stream = enumerable.stream();
        for i in 0..count {
            let item = stream.next().await;
            ensure(
                item.is_some(),
                "enumerable.traverse",
                format!("Move to #{} failed", i),
            )?;
        }
        ensure(
            stream.next().await.is_none(),
            "enumerable.exhausted",
            "Move next at the end",
        )
    }

    fn traverse_twice<C, F>(
        &self,
        cursor: &mut C,
        restartable: bool,
        count: usize,
        mut check: F,
    ) -> HarnessResult<()>
    where
        C: Cursor + ?Sized,
        F: FnMut(usize, &C::Item) -> HarnessResult<()>,
    {
        self.traverse(cursor, count, &mut check)?;
        if restartable {
            cursor.reset().map_err(|err| {
                HarnessError::violation("enumerable.reset", format!("Reset failed: {}", err))
            })?;
            self.traverse(cursor, count, &mut check)?;
        }
        Ok(())
    }

    fn traverse<C, F>(&self, cursor: &mut C, count: usize, check: &mut F) -> HarnessResult<()>
    where
        C: Cursor + ?Sized,
        F: FnMut(usize, &C::Item) -> HarnessResult<()>,
    {
        for i in 0..count {
            ensure(
                cursor.move_next(),
                "enumerable.traverse",
                format!("Move to #{} failed", i),
            )?;
            let item = ensure_some(
                "enumerable.traverse",
                cursor.current(),
                &format!("Item #{} is missing", i),
            )?;
            check(i, item)?;
        }
        for _ in 0..=self.exhaustion_probes {
            ensure(
                !cursor.move_next(),
                "enumerable.exhausted",
                "Move next at the end",
            )?;
        }
        Ok(())
    }
}
