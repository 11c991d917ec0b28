//! List script.

use super::checked;
use crate::assert::{ensure, ensure_eq, ensure_seed, MIN_SEED_ITEMS};
use crate::capability::{ErasedList, List};
use crate::error::HarnessResult;
use crate::introspect::TypeRegistry;
use crate::value::Opaque;
use std::fmt::Debug;

pub fn run<L, T>(registry: &TypeRegistry, items: &[T]) -> HarnessResult<L>
where
    L: List<T> + 'static,
    T: Clone + PartialEq + Debug + 'static,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;
    let mut list = registry.resolve::<L, Vec<T>>()?.invoke(items.to_vec())?;

    ensure_eq(
        "list.construct",
        items.len(),
        list.count(),
        "Count mismatch after construction",
    )?;
    list.clear();
    ensure_eq("list.construct", 0, list.count(), "Not empty after clear")?;

    run_instance(&mut list, items)?;
    Ok(list)
}

/// Run the typed script against an empty list.
pub fn run_instance<L, T>(list: &mut L, items: &[T]) -> HarnessResult<()>
where
    L: List<T> + ?Sized,
    T: Clone + PartialEq + Debug,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;

    ensure_eq("list.empty", 0, list.count(), "List must start empty")?;
    for item in items {
        checked("list.add", list.add(item.clone()))?;
    }
    ensure_eq("list.add", items.len(), list.count(), "Count mismatch")?;

    ensure_eq("list.index_of", Some(0), list.index_of(&items[0]), "Index of first item")?;
    ensure_eq("list.index_of", Some(1), list.index_of(&items[1]), "Index of second item")?;

    let removed = checked("list.remove_at", list.remove_at(0))?;
    ensure_eq("list.remove_at", &items[0], &removed, "Removed the wrong item")?;
    ensure_eq("list.remove_at", None, list.index_of(&items[0]), "Removed item still indexed")?;
    ensure_eq("list.remove_at", Some(0), list.index_of(&items[1]), "Items didn't shift down")?;

    checked("list.insert", list.insert(0, items[0].clone()))?;
    ensure_eq("list.insert", Some(0), list.index_of(&items[0]), "Inserted item not at index 0")?;

    for (i, item) in items.iter().enumerate() {
        ensure_eq("list.get", Some(item), list.get(i), &format!("Value #{} mismatch", i))?;
    }

    list.clear();
    ensure_eq("list.clear", 0, list.count(), "Not empty after clear")?;
    Ok(())
}

/// Build an `L` through `Default`, check it can hold the seed items, clear
/// it and run the erased script.
pub fn run_erased<L>(items: &[Opaque]) -> HarnessResult<L>
where
    L: ErasedList + Default,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;
    let mut list = L::default();
    for item in items {
        checked("list.construct", list.add(item.clone()))?;
    }
    ensure_eq(
        "list.construct",
        items.len(),
        list.count(),
        "Count mismatch after construction",
    )?;
    list.clear();
    ensure_eq("list.construct", 0, list.count(), "Not empty after clear")?;

    run_erased_instance(&mut list, items)?;
    Ok(list)
}

/// Run the erased script against an empty list.
pub fn run_erased_instance<L>(list: &mut L, items: &[Opaque]) -> HarnessResult<()>
where
    L: ErasedList + ?Sized,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;

    ensure(!list.is_fixed_size(), "list.fixed_size", "List size is fixed")?;
    ensure(!list.is_read_only(), "list.read_only", "Read-only")?;

    ensure_eq("list.empty", 0, list.count(), "List must start empty")?;
    fill(list, items)?;
    list.clear();
    ensure_eq("list.clear", 0, list.count(), "Not empty after clear")?;

    fill(list, items)?;
    for (i, item) in items.iter().enumerate() {
        ensure_eq("list.get", Some(item), list.get(i), &format!("Value #{} mismatch", i))?;
    }

    ensure(list.contains(&items[0]), "list.contains", "Contains failed")?;
    ensure(list.contains(&items[1]), "list.contains", "Contains failed 2")?;

    list.remove(&items[1]);
    ensure(!list.contains(&items[1]), "list.remove", "Remove failed")?;
    checked("list.insert", list.insert(1, items[1].clone()))?;

    ensure_eq("list.index_of", Some(0), list.index_of(&items[0]), "Index of first item")?;
    ensure_eq("list.index_of", Some(1), list.index_of(&items[1]), "Index of second item")?;

    let removed = checked("list.remove_at", list.remove_at(0))?;
    ensure_eq("list.remove_at", &items[0], &removed, "Removed the wrong item")?;
    ensure_eq("list.remove_at", None, list.index_of(&items[0]), "Removed item still indexed")?;
    ensure_eq("list.remove_at", Some(0), list.index_of(&items[1]), "Items didn't shift down")?;

    checked("list.insert", list.insert(0, items[0].clone()))?;
    ensure_eq("list.insert", Some(0), list.index_of(&items[0]), "Inserted item not at index 0")?;

    list.clear();
    ensure_eq("list.clear", 0, list.count(), "Not empty after clear")?;
    Ok(())
}

fn fill<L: ErasedList + ?Sized>(list: &mut L, items: &[Opaque]) -> HarnessResult<()> {
    for (i, item) in items.iter().enumerate() {
        let index = checked("list.add", list.add(item.clone()))?;
        ensure_eq("list.add", i, index, "Add returned the wrong index")?;
    }
    ensure_eq("list.add", items.len(), list.count(), "Count mismatch")
}
