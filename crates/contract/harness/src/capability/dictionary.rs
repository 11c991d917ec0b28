//! Dictionary capability: unique-key associative containers.

use crate::cursor::{Cursor, IterCursor};
use crate::error::ContainerError;
use crate::value::Opaque;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// Typed unique-key associative container.
pub trait Dictionary<K, V> {
    fn count(&self) -> usize;

    fn keys(&self) -> Vec<K>;

    fn values(&self) -> Vec<V>;

    /// Indexed read. A missing key is an error.
    fn get(&self, key: &K) -> Result<&V, ContainerError>;

    /// Indexed assignment: insert or overwrite.
    fn set(&mut self, key: K, value: V);

    /// Insert a new key. An existing key must be rejected.
    fn add(&mut self, key: K, value: V) -> Result<(), ContainerError>;

    fn add_pair(&mut self, pair: (K, V)) -> Result<(), ContainerError> {
        let (key, value) = pair;
        self.add(key, value)
    }

    fn add_range(&mut self, pairs: Vec<(K, V)>) -> Result<(), ContainerError> {
        for pair in pairs {
            self.add_pair(pair)?;
        }
        Ok(())
    }

    fn contains_key(&self, key: &K) -> bool;

    fn contains_value(&self, value: &V) -> bool;

    fn contains_pair(&self, key: &K, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.try_get(key).is_some_and(|v| v == value)
    }

    fn remove(&mut self, key: &K) -> bool;

    /// Lookup that never fails: `None` when the key is absent.
    fn try_get(&self, key: &K) -> Option<&V>;

    fn clear(&mut self);

    /// Cursor over the key/value pairs.
    fn entries(&self) -> Box<dyn Cursor<Item = (K, V)> + '_>;
}

/// Erased dictionary over opaque keys and values.
pub trait ErasedDictionary {
    fn count(&self) -> usize;

    fn is_read_only(&self) -> bool {
        false
    }

    fn is_fixed_size(&self) -> bool {
        false
    }

    fn keys(&self) -> Vec<Opaque>;

    fn values(&self) -> Vec<Opaque>;

    /// Indexed read; `None` for a missing key.
    fn get(&self, key: &Opaque) -> Option<&Opaque>;

    fn set(&mut self, key: Opaque, value: Opaque);

    fn add(&mut self, key: Opaque, value: Opaque) -> Result<(), ContainerError>;

    fn contains(&self, key: &Opaque) -> bool;

    fn remove(&mut self, key: &Opaque);

    fn clear(&mut self);

    fn entries(&self) -> Box<dyn Cursor<Item = (Opaque, Opaque)> + '_>;
}

impl<K, V> Dictionary<K, V> for HashMap<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + PartialEq,
{
    fn count(&self) -> usize {
        self.len()
    }

    fn keys(&self) -> Vec<K> {
        HashMap::keys(self).cloned().collect()
    }

    fn values(&self) -> Vec<V> {
        HashMap::values(self).cloned().collect()
    }

    fn get(&self, key: &K) -> Result<&V, ContainerError> {
        HashMap::get(self, key).ok_or_else(|| ContainerError::KeyNotFound(format!("{:?}", key)))
    }

    fn set(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn add(&mut self, key: K, value: V) -> Result<(), ContainerError> {
        if HashMap::contains_key(self, &key) {
            return Err(ContainerError::DuplicateKey(format!("{:?}", key)));
        }
        self.insert(key, value);
        Ok(())
    }

    fn contains_key(&self, key: &K) -> bool {
        HashMap::contains_key(self, key)
    }

    fn contains_value(&self, value: &V) -> bool {
        HashMap::values(self).any(|v| v == value)
    }

    fn remove(&mut self, key: &K) -> bool {
        HashMap::remove(self, key).is_some()
    }

    fn try_get(&self, key: &K) -> Option<&V> {
        HashMap::get(self, key)
    }

    fn clear(&mut self) {
        HashMap::clear(self)
    }

    fn entries(&self) -> Box<dyn Cursor<Item = (K, V)> + '_> {
        Box::new(IterCursor::resettable(
            self.iter().map(|(k, v)| (k.clone(), v.clone())),
        ))
    }
}

impl<K, V> Dictionary<K, V> for BTreeMap<K, V>
where
    K: Ord + Clone + Debug,
    V: Clone + PartialEq,
{
    fn count(&self) -> usize {
        self.len()
    }

    fn keys(&self) -> Vec<K> {
        BTreeMap::keys(self).cloned().collect()
    }

    fn values(&self) -> Vec<V> {
        BTreeMap::values(self).cloned().collect()
    }

    fn get(&self, key: &K) -> Result<&V, ContainerError> {
        BTreeMap::get(self, key).ok_or_else(|| ContainerError::KeyNotFound(format!("{:?}", key)))
    }

    fn set(&mut self, key: K, value: V) {
        self.insert(key, value);
    }

    fn add(&mut self, key: K, value: V) -> Result<(), ContainerError> {
        if BTreeMap::contains_key(self, &key) {
            return Err(ContainerError::DuplicateKey(format!("{:?}", key)));
        }
        self.insert(key, value);
        Ok(())
    }

    fn contains_key(&self, key: &K) -> bool {
        BTreeMap::contains_key(self, key)
    }

    fn contains_value(&self, value: &V) -> bool {
        BTreeMap::values(self).any(|v| v == value)
    }

    fn remove(&mut self, key: &K) -> bool {
        BTreeMap::remove(self, key).is_some()
    }

    fn try_get(&self, key: &K) -> Option<&V> {
        BTreeMap::get(self, key)
    }

    fn clear(&mut self) {
        BTreeMap::clear(self)
    }

    fn entries(&self) -> Box<dyn Cursor<Item = (K, V)> + '_> {
        Box::new(IterCursor::resettable(
            self.iter().map(|(k, v)| (k.clone(), v.clone())),
        ))
    }
}

macro_rules! erased_dictionary_via_typed {
    ($map:ty) => {
        impl ErasedDictionary for $map {
            fn count(&self) -> usize {
                self.len()
            }

            fn keys(&self) -> Vec<Opaque> {
                <Self as Dictionary<Opaque, Opaque>>::keys(self)
            }

            fn values(&self) -> Vec<Opaque> {
                <Self as Dictionary<Opaque, Opaque>>::values(self)
            }

            fn get(&self, key: &Opaque) -> Option<&Opaque> {
                <Self as Dictionary<Opaque, Opaque>>::try_get(self, key)
            }

            fn set(&mut self, key: Opaque, value: Opaque) {
                <Self as Dictionary<Opaque, Opaque>>::set(self, key, value)
            }

            fn add(&mut self, key: Opaque, value: Opaque) -> Result<(), ContainerError> {
                <Self as Dictionary<Opaque, Opaque>>::add(self, key, value)
            }

            fn contains(&self, key: &Opaque) -> bool {
                <Self as Dictionary<Opaque, Opaque>>::contains_key(self, key)
            }

            fn remove(&mut self, key: &Opaque) {
                <Self as Dictionary<Opaque, Opaque>>::remove(self, key);
            }

            fn clear(&mut self) {
                <Self as Dictionary<Opaque, Opaque>>::clear(self)
            }

            fn entries(&self) -> Box<dyn Cursor<Item = (Opaque, Opaque)> + '_> {
                <Self as Dictionary<Opaque, Opaque>>::entries(self)
            }
        }
    };
}

erased_dictionary_via_typed!(HashMap<Opaque, Opaque>);
erased_dictionary_via_typed!(BTreeMap<Opaque, Opaque>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_rejects_duplicate() {
        let mut map: HashMap<&str, u32> = HashMap::new();
        Dictionary::add(&mut map, "a", 1).unwrap();
        let err = Dictionary::add(&mut map, "a", 2).unwrap_err();
        assert_eq!(err, ContainerError::DuplicateKey("\"a\"".into()));
        assert_eq!(Dictionary::get(&map, &"a"), Ok(&1));
    }

    #[test]
    fn test_get_missing_key_errors() {
        let map: BTreeMap<u8, u8> = BTreeMap::new();
        assert!(matches!(
            Dictionary::get(&map, &1),
            Err(ContainerError::KeyNotFound(_))
        ));
        assert!(Dictionary::try_get(&map, &1).is_none());
    }

    #[test]
    fn test_contains_pair() {
        let mut map: BTreeMap<&str, &str> = BTreeMap::new();
        Dictionary::set(&mut map, "a", "x");
        assert!(map.contains_pair(&"a", &"x"));
        assert!(!map.contains_pair(&"a", &"y"));
        assert!(!map.contains_pair(&"b", &"x"));
    }

    #[test]
    fn test_add_range_stops_at_duplicate() {
        let mut map: BTreeMap<u8, u8> = BTreeMap::new();
        let result = map.add_range(vec![(1, 1), (2, 2), (1, 3)]);
        assert!(result.is_err());
        assert_eq!(Dictionary::count(&map), 2);
    }

    #[test]
    fn test_entries_cursor() {
        let mut map: BTreeMap<u8, u8> = BTreeMap::new();
        Dictionary::set(&mut map, 1, 10);
        Dictionary::set(&mut map, 2, 20);
        let mut cursor = Dictionary::entries(&map);
        assert!(cursor.move_next());
        assert_eq!(cursor.current(), Some(&(1, 10)));
        assert!(cursor.move_next());
        assert!(!cursor.move_next());
    }

    #[test]
    fn test_erased_btree_map() {
        let mut map: BTreeMap<Opaque, Opaque> = BTreeMap::new();
        ErasedDictionary::set(&mut map, Opaque::from("a"), Opaque::Null);
        assert!(ErasedDictionary::contains(&map, &Opaque::from("a")));
        assert_eq!(
            ErasedDictionary::get(&map, &Opaque::from("a")),
            Some(&Opaque::Null)
        );
        assert!(ErasedDictionary::add(&mut map, Opaque::from("a"), Opaque::from(1)).is_err());
        ErasedDictionary::remove(&mut map, &Opaque::from("a"));
        assert_eq!(ErasedDictionary::count(&map), 0);
    }
}
