//! Dictionary script.
//!
//! Seed items are key/value pairs. Keys must be unique; values should be
//! distinct too, since the script checks that a second key doesn't read back
//! the first key's value.

use super::checked;
use crate::assert::{
    ensure, ensure_distinct, ensure_eq, ensure_ne, ensure_no_panic, ensure_same_elements,
    ensure_some, expect_rejection, MIN_SEED_ITEMS,
};
use crate::capability::{Dictionary, ErasedDictionary};
use crate::cursor::CursorGuard;
use crate::error::{HarnessError, HarnessResult};
use crate::introspect::TypeRegistry;
use crate::value::Opaque;
use std::fmt::Debug;

fn ensure_pairs<K: PartialEq, V>(items: &[(K, V)]) -> HarnessResult<()> {
    if items.len() < MIN_SEED_ITEMS {
        return Err(HarnessError::InvalidSeed(format!(
            "at least {} pairs required, got {}",
            MIN_SEED_ITEMS,
            items.len()
        )));
    }
    ensure_distinct(items.iter().map(|(key, _)| key))
}

pub fn run<D, K, V>(registry: &TypeRegistry, items: &[(K, V)]) -> HarnessResult<D>
where
    D: Dictionary<K, V> + 'static,
    K: Clone + PartialEq + Debug + 'static,
    V: Clone + PartialEq + Debug + 'static,
{
    ensure_pairs(items)?;
    let mut dict = registry.resolve::<D, Vec<(K, V)>>()?.invoke(items.to_vec())?;

    ensure_eq(
        "dictionary.construct",
        items.len(),
        dict.count(),
        "Count mismatch after construction",
    )?;
    dict.clear();
    ensure_eq("dictionary.construct", 0, dict.count(), "Not empty after clear")?;

    run_instance(&mut dict, items)?;
    Ok(dict)
}

/// Run the typed script against an empty dictionary. The dictionary is
/// empty again once the script passed.
pub fn run_instance<D, K, V>(dict: &mut D, items: &[(K, V)]) -> HarnessResult<()>
where
    D: Dictionary<K, V> + ?Sized,
    K: Clone + PartialEq + Debug,
    V: Clone + PartialEq + Debug,
{
    ensure_pairs(items)?;
    let (first_key, first_value) = &items[0];

    // Fill
    ensure_eq("dictionary.empty", 0, dict.count(), "Dictionary must start empty")?;
    for (key, value) in items {
        dict.set(key.clone(), value.clone());
    }

    // Keys and values
    let keys: Vec<K> = items.iter().map(|(k, _)| k.clone()).collect();
    let values: Vec<V> = items.iter().map(|(_, v)| v.clone()).collect();
    ensure_same_elements("dictionary.keys", &keys, &dict.keys(), "Keys mismatch")?;
    ensure_same_elements("dictionary.values", &values, &dict.values(), "Values mismatch")?;

    // Indexed access
    let read = checked("dictionary.get", dict.get(first_key))?;
    ensure_eq("dictionary.get", first_value, read, "Key/value mismatch")?;
    let other = checked("dictionary.get", dict.get(&items[1].0))?;
    ensure_ne("dictionary.get", first_value, other, "Key/value mismatch 2")?;

    // Duplicate key
    expect_rejection("dictionary.duplicate_key", "Double keys possible", || {
        dict.add(first_key.clone(), items[1].1.clone())
    })?;
    let kept = checked("dictionary.duplicate_key", dict.get(first_key))?;
    ensure_eq(
        "dictionary.duplicate_key",
        first_value,
        kept,
        "Rejected add replaced the value",
    )?;
    for (i, (key, value)) in items.iter().enumerate() {
        ensure(
            dict.contains_key(key),
            "dictionary.contains_key",
            format!("Key #{} not found", i),
        )?;
        let read = checked("dictionary.get", dict.get(key))?;
        ensure_eq("dictionary.get", value, read, &format!("Value #{} mismatch", i))?;
    }
    for (i, (_, value)) in items.iter().enumerate() {
        ensure(
            dict.contains_value(value),
            "dictionary.contains_value",
            format!("Value #{} not found", i),
        )?;
    }
    for (i, (key, value)) in items.iter().enumerate() {
        ensure(
            dict.contains_pair(key, value),
            "dictionary.contains_pair",
            format!("Key/value #{} not found", i),
        )?;
    }

    // Remove
    ensure(dict.remove(first_key), "dictionary.remove", "Remove failed")?;
    ensure_absent(dict, first_key, first_value, "dictionary.remove", "not removed")?;

    // Add by key and value, then by pair
    checked("dictionary.add", dict.add(first_key.clone(), first_value.clone()))?;
    ensure_present(dict, first_key, first_value, "dictionary.add", "not added")?;
    ensure(dict.remove(first_key), "dictionary.remove", "Remove failed 2")?;
    checked("dictionary.add_pair", dict.add_pair((first_key.clone(), first_value.clone())))?;
    ensure_present(dict, first_key, first_value, "dictionary.add_pair", "not added 2")?;

    // Clear
    dict.clear();
    ensure_eq("dictionary.clear", 0, dict.count(), "Not empty after clear")?;
    ensure_absent(dict, first_key, first_value, "dictionary.clear", "not cleared")?;

    // Bulk add and try_get
    checked("dictionary.add_range", dict.add_range(items.to_vec()))?;
    ensure_eq("dictionary.add_range", items.len(), dict.count(), "Count mismatch")?;
    let found = ensure_some(
        "dictionary.try_get",
        dict.try_get(first_key),
        "TryGetValue failed",
    )?;
    ensure_eq("dictionary.try_get", first_value, found, "TryGetValue value mismatch")?;
    ensure(dict.remove(first_key), "dictionary.remove", "Remove failed 3")?;
    let missing = ensure_no_panic("dictionary.try_get", "TryGetValue panicked", || {
        dict.try_get(first_key).is_some()
    })?;
    ensure(!missing, "dictionary.try_get", "TryGetValue failed 2")?;

    // Enumerate the remaining entries
    {
        let mut cursor = CursorGuard::new(dict.entries());
        for i in 0..items.len() - 1 {
            ensure(
                cursor.move_next(),
                "dictionary.entries",
                format!("No item #{}", i + 1),
            )?;
            ensure_some(
                "dictionary.entries",
                cursor.current(),
                &format!("Item #{} is missing", i + 1),
            )?;
        }
        ensure(
            !cursor.move_next(),
            "dictionary.entries",
            "Cursor yields a removed entry",
        )?;
    }

    dict.clear();
    ensure_eq("dictionary.clear", 0, dict.count(), "Not empty after clear")?;
    ensure(
        !dict.contains_key(first_key),
        "dictionary.clear",
        "Key not cleared",
    )?;
    Ok(())
}

fn ensure_absent<D, K, V>(
    dict: &D,
    key: &K,
    value: &V,
    step: &str,
    what: &str,
) -> HarnessResult<()>
where
    D: Dictionary<K, V> + ?Sized,
    V: PartialEq,
{
    ensure(!dict.contains_key(key), step, format!("Key {}", what))?;
    ensure(!dict.contains_value(value), step, format!("Value {}", what))?;
    ensure(!dict.contains_pair(key, value), step, format!("Key/value {}", what))
}

fn ensure_present<D, K, V>(
    dict: &D,
    key: &K,
    value: &V,
    step: &str,
    what: &str,
) -> HarnessResult<()>
where
    D: Dictionary<K, V> + ?Sized,
    V: PartialEq,
{
    ensure(dict.contains_key(key), step, format!("Key {}", what))?;
    ensure(dict.contains_value(value), step, format!("Value {}", what))?;
    ensure(dict.contains_pair(key, value), step, format!("Key/value {}", what))
}

/// Build a `D` through `Default`, fill it by indexed assignment, check and
/// clear it, then run the erased script.
pub fn run_erased<D>(items: &[(Opaque, Opaque)]) -> HarnessResult<D>
where
    D: ErasedDictionary + Default,
{
    ensure_pairs(items)?;
    let mut dict = D::default();
    for (key, value) in items {
        dict.set(key.clone(), value.clone());
    }
    ensure_eq(
        "dictionary.construct",
        items.len(),
        dict.count(),
        "Count mismatch after construction",
    )?;
    dict.clear();
    ensure_eq("dictionary.construct", 0, dict.count(), "Not empty after clear")?;

    run_erased_instance(&mut dict, items)?;
    Ok(dict)
}

/// Run the erased script against an empty dictionary.
pub fn run_erased_instance<D>(dict: &mut D, items: &[(Opaque, Opaque)]) -> HarnessResult<()>
where
    D: ErasedDictionary + ?Sized,
{
    ensure_pairs(items)?;
    let (first_key, first_value) = &items[0];

    ensure_eq("dictionary.empty", 0, dict.count(), "Dictionary must start empty")?;
    for (key, value) in items {
        dict.set(key.clone(), value.clone());
    }

    ensure(!dict.is_read_only(), "dictionary.read_only", "Writable dictionary expected")?;
    ensure(!dict.is_fixed_size(), "dictionary.fixed_size", "Is fixed size")?;

    let keys: Vec<Opaque> = items.iter().map(|(k, _)| k.clone()).collect();
    let values: Vec<Opaque> = items.iter().map(|(_, v)| v.clone()).collect();
    ensure_same_elements("dictionary.keys", &keys, &dict.keys(), "Keys mismatch")?;
    ensure_same_elements("dictionary.values", &values, &dict.values(), "Values mismatch")?;

    ensure_eq("dictionary.get", Some(first_value), dict.get(first_key), "Key/value mismatch")?;
    ensure_ne(
        "dictionary.get",
        Some(first_value),
        dict.get(&items[1].0),
        "Key/value mismatch 2",
    )?;

    expect_rejection("dictionary.duplicate_key", "Double keys possible", || {
        dict.add(first_key.clone(), items[1].1.clone())
    })?;
    ensure_eq(
        "dictionary.duplicate_key",
        Some(first_value),
        dict.get(first_key),
        "Rejected add replaced the value",
    )?;

    for (i, (key, value)) in items.iter().enumerate() {
        ensure(dict.contains(key), "dictionary.contains", format!("Key #{} not found", i))?;
        ensure_eq(
            "dictionary.get",
            Some(value),
            dict.get(key),
            &format!("Value #{} mismatch", i),
        )?;
    }

    dict.remove(first_key);
    ensure(!dict.contains(first_key), "dictionary.remove", "Key not removed")?;

    checked("dictionary.add", dict.add(first_key.clone(), first_value.clone()))?;
    ensure(dict.contains(first_key), "dictionary.add", "Key not added")?;
    dict.remove(first_key);

    {
        let mut cursor = CursorGuard::new(dict.entries());
        for i in 0..items.len() - 1 {
            ensure(
                cursor.move_next(),
                "dictionary.entries",
                format!("No item #{}", i + 1),
            )?;
            ensure_some(
                "dictionary.entries",
                cursor.current(),
                &format!("Item #{} is missing", i + 1),
            )?;
        }
        ensure(
            !cursor.move_next(),
            "dictionary.entries",
            "Cursor yields a removed entry",
        )?;
    }

    dict.clear();
    ensure_eq("dictionary.clear", 0, dict.count(), "Not empty after clear")?;
    ensure(!dict.contains(first_key), "dictionary.clear", "Key not cleared")?;
    Ok(())
}
