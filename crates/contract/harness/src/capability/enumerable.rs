//! Enumerable capability: anything that can hand out cursors, plus the async
//! stream-backed counterpart.

use crate::cursor::{Cursor, CursorGuard, IterCursor, MapCursor};
use crate::error::ContainerError;
use crate::value::Opaque;
use futures::stream::{BoxStream, Stream, StreamExt};
use std::collections::{BTreeSet, VecDeque};

/// Typed enumerable: a source of fresh cursors.
pub trait Enumerable {
    type Item;

    fn cursor(&self) -> Box<dyn Cursor<Item = Self::Item> + '_>;

    /// Drain a fresh cursor into a vector.
    fn materialize(&self) -> Vec<Self::Item>
    where
        Self::Item: Clone,
    {
        let mut cursor = CursorGuard::new(self.cursor());
        let mut out = Vec::new();
        while cursor.move_next() {
            if let Some(item) = cursor.current() {
                out.push(item.clone());
            }
        }
        out
    }
}

/// Erased enumerable yielding [`Opaque`] values.
pub trait ErasedEnumerable {
    fn erased_cursor(&self) -> Box<dyn Cursor<Item = Opaque> + '_>;

    fn materialize_erased(&self) -> Vec<Opaque> {
        let mut cursor = CursorGuard::new(self.erased_cursor());
        let mut out = Vec::new();
        while cursor.move_next() {
            if let Some(item) = cursor.current() {
                out.push(item.clone());
            }
        }
        out
    }
}

impl<E> ErasedEnumerable for E
where
    E: Enumerable,
    E::Item: Clone + Into<Opaque>,
{
    fn erased_cursor(&self) -> Box<dyn Cursor<Item = Opaque> + '_> {
        Box::new(MapCursor::new(self.cursor(), |item: &E::Item| {
            Into::<Opaque>::into(item.clone())
        }))
    }
}

impl<T: Clone> Enumerable for Vec<T> {
    type Item = T;

    fn cursor(&self) -> Box<dyn Cursor<Item = T> + '_> {
        Box::new(IterCursor::resettable(self.iter().cloned()))
    }
}

impl<T: Clone> Enumerable for VecDeque<T> {
    type Item = T;

    fn cursor(&self) -> Box<dyn Cursor<Item = T> + '_> {
        Box::new(IterCursor::resettable(self.iter().cloned()))
    }
}

impl<T: Clone + Ord> Enumerable for BTreeSet<T> {
    type Item = T;

    fn cursor(&self) -> Box<dyn Cursor<Item = T> + '_> {
        Box::new(IterCursor::resettable(self.iter().cloned()))
    }
}

/// Enumerable backed by an iterator factory. Its cursors reset by calling
/// the factory again.
pub struct FnEnumerable<F> {
    factory: F,
}

pub fn from_fn<F, I>(factory: F) -> FnEnumerable<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    FnEnumerable { factory }
}

struct FnCursor<'a, F, I: IntoIterator> {
    factory: &'a F,
    iter: I::IntoIter,
    current: Option<I::Item>,
}

impl<F, I> Cursor for FnCursor<'_, F, I>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;

    fn move_next(&mut self) -> bool {
        self.current = self.iter.next();
        self.current.is_some()
    }

    fn current(&self) -> Option<&I::Item> {
        self.current.as_ref()
    }

    fn reset(&mut self) -> Result<(), ContainerError> {
        self.iter = (self.factory)().into_iter();
        self.current = None;
        Ok(())
    }
}

impl<F, I> Enumerable for FnEnumerable<F>
where
    F: Fn() -> I,
    I: IntoIterator + 'static,
{
    type Item = I::Item;

    fn cursor(&self) -> Box<dyn Cursor<Item = I::Item> + '_> {
        Box::new(FnCursor::<F, I> {
            factory: &self.factory,
            iter: (self.factory)().into_iter(),
            current: None,
        })
    }
}

/// Asynchronous enumerable: every call to `stream` starts a new traversal.
pub trait AsyncEnumerable {
    type Item;

    fn stream(&self) -> BoxStream<'_, Self::Item>;
}

impl<F, S> AsyncEnumerable for F
where
    F: Fn() -> S,
    S: Stream + Send + 'static,
{
    type Item = S::Item;

    fn stream(&self) -> BoxStream<'_, S::Item> {
        self().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_materialize() {
        let items = vec!["a", "b"];
        assert_eq!(items.materialize(), vec!["a", "b"]);
    }

    #[test]
    fn test_vec_cursor_resets() {
        let items = vec![1, 2];
        let mut cursor = items.cursor();
        while cursor.move_next() {}
        cursor.reset().unwrap();
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&1));
    }

    #[test]
    fn test_fn_enumerable_reset_calls_factory() {
        let source = from_fn(|| vec![3, 4]);
        let mut cursor = source.cursor();
        assert!(cursor.move_next());
        assert!(cursor.move_next());
        assert!(!cursor.move_next());
        cursor.reset().unwrap();
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&3));
    }

    #[test]
    fn test_erased_cursor_maps_values() {
        let items = vec![Some("a"), None];
        assert_eq!(
            items.materialize_erased(),
            vec![Opaque::from("a"), Opaque::Null]
        );
    }

    #[tokio::test]
    async fn test_closure_is_async_enumerable() {
        let source = || futures::stream::iter(vec![1u8, 2, 3]);
        let collected: Vec<u8> = source.stream().collect().await;
        assert_eq!(collected, vec![1, 2, 3]);
    }
}
