//! Collection capability: membership, count and copy-out.

use crate::error::ContainerError;
use crate::value::Opaque;
use std::any::Any;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::Hash;

/// Typed unordered container with membership and count.
pub trait Collection<T> {
    fn count(&self) -> usize;

    fn is_read_only(&self) -> bool {
        false
    }

    fn add(&mut self, item: T) -> Result<(), ContainerError>;

    /// Remove one occurrence of `item`. Returns whether anything was removed.
    fn remove(&mut self, item: &T) -> bool;

    fn contains(&self, item: &T) -> bool;

    /// Copy every item into `dest`, starting at slot `index`. Slots before
    /// `index` must be left untouched.
    fn copy_to(&self, dest: &mut [Option<T>], index: usize) -> Result<(), ContainerError>;

    fn clear(&mut self);
}

/// Erased collection: count, synchronization introspection and copy-out.
pub trait ErasedCollection {
    fn count(&self) -> usize;

    fn is_synchronized(&self) -> bool {
        false
    }

    /// The object callers would lock to synchronize access, if any.
    fn sync_root(&self) -> Option<&dyn Any> {
        None
    }

    /// Copy every item into `dest`, starting at slot `index`.
    fn copy_to(&self, dest: &mut [Opaque], index: usize) -> Result<(), ContainerError>;
}

/// Shared `copy_to` body: bounds-check, then write `items` from `index` on.
pub fn copy_into<'a, T, S, I>(
    items: I,
    dest: &mut [S],
    index: usize,
    wrap: impl Fn(T) -> S,
) -> Result<(), ContainerError>
where
    T: Clone + 'a,
    I: ExactSizeIterator<Item = &'a T>,
{
    let needed = index + items.len();
    if needed > dest.len() {
        return Err(ContainerError::DestinationTooSmall {
            needed,
            available: dest.len(),
        });
    }
    for (slot, item) in dest[index..needed].iter_mut().zip(items) {
        *slot = wrap(item.clone());
    }
    Ok(())
}

impl<T: Clone + PartialEq> Collection<T> for Vec<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        self.push(item);
        Ok(())
    }

    fn remove(&mut self, item: &T) -> bool {
        match self.iter().position(|x| x == item) {
            Some(i) => {
                Vec::remove(self, i);
                true
            }
            None => false,
        }
    }

    fn contains(&self, item: &T) -> bool {
        self.iter().any(|x| x == item)
    }

    fn copy_to(&self, dest: &mut [Option<T>], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, Some)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }
}

impl<T: Clone + PartialEq> Collection<T> for VecDeque<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        self.push_back(item);
        Ok(())
    }

    fn remove(&mut self, item: &T) -> bool {
        match self.iter().position(|x| x == item) {
            Some(i) => VecDeque::remove(self, i).is_some(),
            None => false,
        }
    }

    fn contains(&self, item: &T) -> bool {
        self.iter().any(|x| x == item)
    }

    fn copy_to(&self, dest: &mut [Option<T>], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, Some)
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }
}

impl<T: Clone + Eq + Hash> Collection<T> for HashSet<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        self.insert(item);
        Ok(())
    }

    fn remove(&mut self, item: &T) -> bool {
        HashSet::remove(self, item)
    }

    fn contains(&self, item: &T) -> bool {
        HashSet::contains(self, item)
    }

    fn copy_to(&self, dest: &mut [Option<T>], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, Some)
    }

    fn clear(&mut self) {
        HashSet::clear(self)
    }
}

impl<T: Clone + Ord> Collection<T> for BTreeSet<T> {
    fn count(&self) -> usize {
        self.len()
    }

    fn add(&mut self, item: T) -> Result<(), ContainerError> {
        self.insert(item);
        Ok(())
    }

    fn remove(&mut self, item: &T) -> bool {
        BTreeSet::remove(self, item)
    }

    fn contains(&self, item: &T) -> bool {
        BTreeSet::contains(self, item)
    }

    fn copy_to(&self, dest: &mut [Option<T>], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, Some)
    }

    fn clear(&mut self) {
        BTreeSet::clear(self)
    }
}

impl ErasedCollection for Vec<Opaque> {
    fn count(&self) -> usize {
        self.len()
    }

    fn copy_to(&self, dest: &mut [Opaque], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, |v| v)
    }
}

impl ErasedCollection for VecDeque<Opaque> {
    fn count(&self) -> usize {
        self.len()
    }

    fn copy_to(&self, dest: &mut [Opaque], index: usize) -> Result<(), ContainerError> {
        copy_into(self.iter(), dest, index, |v| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_into_honours_index() {
        let items = vec!["a", "b"];
        let mut dest = vec![None; 3];
        Collection::copy_to(&items, &mut dest, 1).unwrap();
        assert_eq!(dest, vec![None, Some("a"), Some("b")]);
    }

    #[test]
    fn test_copy_into_rejects_overflow() {
        let items = vec![1, 2];
        let mut dest = vec![None; 2];
        let err = Collection::copy_to(&items, &mut dest, 1).unwrap_err();
        assert_eq!(
            err,
            ContainerError::DestinationTooSmall {
                needed: 3,
                available: 2
            }
        );
        assert_eq!(dest, vec![None, None]);
    }

    #[test]
    fn test_vec_remove_first_occurrence() {
        let mut items = vec![1, 2, 1];
        assert!(Collection::remove(&mut items, &1));
        assert_eq!(items, vec![2, 1]);
        assert!(!Collection::remove(&mut items, &5));
    }

    #[test]
    fn test_hash_set_collection() {
        let mut set: HashSet<&str> = HashSet::new();
        set.add("a").unwrap();
        set.add("b").unwrap();
        assert_eq!(Collection::count(&set), 2);
        assert!(Collection::remove(&mut set, &"a"));
        assert!(!Collection::contains(&set, &"a"));
    }

    #[test]
    fn test_erased_copy() {
        let items = vec![Opaque::from("a"), Opaque::from("b")];
        let mut dest = vec![Opaque::Null; 3];
        ErasedCollection::copy_to(&items, &mut dest, 1).unwrap();
        assert!(dest[0].is_null());
        assert_eq!(dest[1], Opaque::from("a"));
        assert!(!items.is_synchronized());
        assert!(items.sync_root().is_none());
    }
}
