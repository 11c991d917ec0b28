//! Cursors: the stateful traversal surface shared by every capability that
//! can be enumerated, plus the guard that releases them.

use crate::error::ContainerError;
use std::ops::{Deref, DerefMut};
use std::panic::{self, AssertUnwindSafe};

/// A move-next / current cursor over a container.
///
/// A fresh cursor is positioned before the first element; `current` is only
/// meaningful after a successful `move_next`.
pub trait Cursor {
    type Item;

    /// Advance to the next element. Returns `false` once exhausted.
    fn move_next(&mut self) -> bool;

    /// The element the cursor is positioned on.
    fn current(&self) -> Option<&Self::Item>;

    /// Rewind to before the first element.
    fn reset(&mut self) -> Result<(), ContainerError> {
        Err(ContainerError::Unsupported("reset"))
    }

    /// Release any resources held by the cursor. No-op unless overridden.
    fn release(&mut self) {}
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    type Item = C::Item;

    fn move_next(&mut self) -> bool {
        (**self).move_next()
    }

    fn current(&self) -> Option<&Self::Item> {
        (**self).current()
    }

    fn reset(&mut self) -> Result<(), ContainerError> {
        (**self).reset()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Cursor over any iterator. Resettable when built with
/// [`IterCursor::resettable`].
///
/// The iterator is not fused: an iterator that yields again after returning
/// `None` will be observed doing so.
pub struct IterCursor<I: Iterator> {
    iter: I,
    origin: Option<(I, fn(&I) -> I)>,
    current: Option<I::Item>,
}

impl<I: Iterator> IterCursor<I> {
    /// A forward-only cursor.
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            origin: None,
            current: None,
        }
    }
}

impl<I: Iterator + Clone> IterCursor<I> {
    /// A cursor that can rewind by restarting from a clone of `iter`.
    pub fn resettable(iter: I) -> Self {
        Self {
            origin: Some((iter.clone(), <I as Clone>::clone)),
            iter,
            current: None,
        }
    }
}

impl<I: Iterator> Cursor for IterCursor<I> {
    type Item = I::Item;

    fn move_next(&mut self) -> bool {
        self.current = self.iter.next();
        self.current.is_some()
    }

    fn current(&self) -> Option<&Self::Item> {
        self.current.as_ref()
    }

    fn reset(&mut self) -> Result<(), ContainerError> {
        match &self.origin {
            Some((origin, restart)) => {
                self.iter = restart(origin);
                self.current = None;
                Ok(())
            }
            None => Err(ContainerError::Unsupported("reset")),
        }
    }
}

/// Cursor adapter that maps every element of an inner cursor.
pub struct MapCursor<C: Cursor, F, U> {
    inner: C,
    map: F,
    current: Option<U>,
}

impl<C, F, U> MapCursor<C, F, U>
where
    C: Cursor,
    F: Fn(&C::Item) -> U,
{
    pub fn new(inner: C, map: F) -> Self {
        Self {
            inner,
            map,
            current: None,
        }
    }
}

impl<C, F, U> Cursor for MapCursor<C, F, U>
where
    C: Cursor,
    F: Fn(&C::Item) -> U,
{
    type Item = U;

    fn move_next(&mut self) -> bool {
        let moved = self.inner.move_next();
        self.current = if moved {
            self.inner.current().map(&self.map)
        } else {
            None
        };
        moved
    }

    fn current(&self) -> Option<&U> {
        self.current.as_ref()
    }

    fn reset(&mut self) -> Result<(), ContainerError> {
        self.current = None;
        self.inner.reset()
    }

    fn release(&mut self) {
        self.inner.release()
    }
}

/// Scoped ownership of a cursor: `release` runs when the guard is dropped,
/// on every exit path. A panicking release is logged and swallowed.
pub struct CursorGuard<C: Cursor> {
    cursor: C,
}

impl<C: Cursor> CursorGuard<C> {
    pub fn new(cursor: C) -> Self {
        Self { cursor }
    }
}

impl<C: Cursor> Deref for CursorGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.cursor
    }
}

impl<C: Cursor> DerefMut for CursorGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.cursor
    }
}

impl<C: Cursor> Drop for CursorGuard<C> {
    fn drop(&mut self) {
        let cursor = &mut self.cursor;
        if panic::catch_unwind(AssertUnwindSafe(|| cursor.release())).is_err() {
            tracing::warn!("cursor release panicked, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Counting {
        released: Rc<Cell<u32>>,
        panic_on_release: bool,
    }

    impl Cursor for Counting {
        type Item = u8;

        fn move_next(&mut self) -> bool {
            false
        }

        fn current(&self) -> Option<&u8> {
            None
        }

        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
            if self.panic_on_release {
                panic!("release exploded");
            }
        }
    }

    #[test]
    fn test_iter_cursor_walk() {
        let data = ["a", "b"];
        let mut cursor = IterCursor::new(data.iter());
        assert!(cursor.current().is_none());
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&&"a"));
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&&"b"));
        assert!(!cursor.move_next());
        assert!(cursor.current().is_none());
    }

    #[test]
    fn test_forward_only_reset_unsupported() {
        let mut cursor = IterCursor::new(0..2);
        assert_eq!(cursor.reset(), Err(ContainerError::Unsupported("reset")));
    }

    #[test]
    fn test_resettable_cursor_restarts() {
        let mut cursor = IterCursor::resettable(0..2);
        while cursor.move_next() {}
        cursor.reset().unwrap();
        assert!(cursor.current().is_none());
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&0));
    }

    #[test]
    fn test_map_cursor() {
        let mut cursor = MapCursor::new(IterCursor::resettable(1..3), |x: &i32| x * 10);
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&10));
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&20));
        assert!(!cursor.move_next());
        cursor.reset().unwrap();
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&10));
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let released = Rc::new(Cell::new(0));
        {
            let mut guard = CursorGuard::new(Counting {
                released: released.clone(),
                panic_on_release: false,
            });
            assert!(!guard.move_next());
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_guard_swallows_release_panic() {
        let released = Rc::new(Cell::new(0));
        drop(CursorGuard::new(Counting {
            released: released.clone(),
            panic_on_release: true,
        }));
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_boxed_cursor_forwards() {
        let mut boxed: Box<dyn Cursor<Item = i32>> = Box::new(IterCursor::resettable(5..6));
        assert!(boxed.move_next());
        assert_eq!(boxed.current(), Some(&5));
        assert!(!boxed.move_next());
        assert!(boxed.reset().is_ok());
    }
}
