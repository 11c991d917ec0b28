//! List capability: ordered, index-addressable mutation.

use super::collection::{Collection, ErasedCollection};
use crate::error::ContainerError;
use crate::value::Opaque;
use std::collections::VecDeque;

/// Typed ordered list. `index_of` returns `None` as the not-found sentinel.
pub trait List<T>: Collection<T> {
    fn index_of(&self, item: &T) -> Option<usize>;

    fn get(&self, index: usize) -> Option<&T>;

    /// Insert at `index`, shifting later items up. `index == count` appends.
    fn insert(&mut self, index: usize, item: T) -> Result<(), ContainerError>;

    /// Remove and return the item at `index`, shifting later items down.
    fn remove_at(&mut self, index: usize) -> Result<T, ContainerError>;
}

/// Erased list over opaque values.
pub trait ErasedList: ErasedCollection {
    fn is_fixed_size(&self) -> bool {
        false
    }

    fn is_read_only(&self) -> bool {
        false
    }

    /// Append a value and return its index.
    fn add(&mut self, value: Opaque) -> Result<usize, ContainerError>;

    fn contains(&self, value: &Opaque) -> bool;

    /// Remove the first occurrence of `value`; absent values are ignored.
    fn remove(&mut self, value: &Opaque);

    fn index_of(&self, value: &Opaque) -> Option<usize>;

    fn get(&self, index: usize) -> Option<&Opaque>;

    fn insert(&mut self, index: usize, value: Opaque) -> Result<(), ContainerError>;

    fn remove_at(&mut self, index: usize) -> Result<Opaque, ContainerError>;

    fn clear(&mut self);
}

impl<T: Clone + PartialEq> List<T> for Vec<T> {
    fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    fn insert(&mut self, index: usize, item: T) -> Result<(), ContainerError> {
        if index > self.len() {
            return Err(ContainerError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Vec::insert(self, index, item);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<T, ContainerError> {
        if index >= self.len() {
            return Err(ContainerError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(Vec::remove(self, index))
    }
}

impl<T: Clone + PartialEq> List<T> for VecDeque<T> {
    fn index_of(&self, item: &T) -> Option<usize> {
        self.iter().position(|x| x == item)
    }

    fn get(&self, index: usize) -> Option<&T> {
        VecDeque::get(self, index)
    }

    fn insert(&mut self, index: usize, item: T) -> Result<(), ContainerError> {
        if index > self.len() {
            return Err(ContainerError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        VecDeque::insert(self, index, item);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<T, ContainerError> {
        let len = self.len();
        VecDeque::remove(self, index).ok_or(ContainerError::OutOfRange { index, len })
    }
}

impl ErasedList for Vec<Opaque> {
    fn add(&mut self, value: Opaque) -> Result<usize, ContainerError> {
        self.push(value);
        Ok(self.len() - 1)
    }

    fn contains(&self, value: &Opaque) -> bool {
        self.iter().any(|v| v == value)
    }

    fn remove(&mut self, value: &Opaque) {
        <Self as Collection<Opaque>>::remove(self, value);
    }

    fn index_of(&self, value: &Opaque) -> Option<usize> {
        <Self as List<Opaque>>::index_of(self, value)
    }

    fn get(&self, index: usize) -> Option<&Opaque> {
        self.as_slice().get(index)
    }

    fn insert(&mut self, index: usize, value: Opaque) -> Result<(), ContainerError> {
        <Self as List<Opaque>>::insert(self, index, value)
    }

    fn remove_at(&mut self, index: usize) -> Result<Opaque, ContainerError> {
        <Self as List<Opaque>>::remove_at(self, index)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }
}
