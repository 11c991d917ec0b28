//! Collection script.

use super::checked;
use crate::assert::{
    ensure, ensure_eq, ensure_no_panic, ensure_same_elements, ensure_seed, ensure_some,
    MIN_SEED_ITEMS,
};
use crate::capability::{Collection, ErasedCollection};
use crate::error::HarnessResult;
use crate::introspect::TypeRegistry;
use crate::value::Opaque;
use std::fmt::Debug;

/// Construct a `C` from the seed items, check and clear it, then run the
/// instance script.
pub fn run<C, T>(registry: &TypeRegistry, items: &[T]) -> HarnessResult<C>
where
    C: Collection<T> + 'static,
    T: Clone + PartialEq + Debug + 'static,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;
    let mut collection = registry.resolve::<C, Vec<T>>()?.invoke(items.to_vec())?;

    ensure_eq(
        "collection.construct",
        items.len(),
        collection.count(),
        "Count mismatch after construction",
    )?;
    collection.clear();
    ensure_eq("collection.construct", 0, collection.count(), "Not empty after clear")?;

    run_instance(&mut collection, items)?;
    Ok(collection)
}

/// Run the typed script against an empty collection.
pub fn run_instance<C, T>(collection: &mut C, items: &[T]) -> HarnessResult<()>
where
    C: Collection<T> + ?Sized,
    T: Clone + PartialEq + Debug,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;

    ensure(!collection.is_read_only(), "collection.read_only", "Read-only")?;
    ensure_eq("collection.empty", 0, collection.count(), "Collection must start empty")?;

    tracing::debug!(items = items.len(), "filling collection");
    for item in items {
        checked("collection.add", collection.add(item.clone()))?;
    }
    ensure_eq("collection.add", items.len(), collection.count(), "Count mismatch")?;

    ensure(collection.remove(&items[0]), "collection.remove", "Remove failed")?;
    ensure_eq(
        "collection.remove",
        items.len() - 1,
        collection.count(),
        "Count mismatch after remove",
    )?;

    ensure(collection.contains(&items[1]), "collection.contains", "Contains failed")?;
    ensure(!collection.contains(&items[0]), "collection.contains", "Contains failed 2")?;

    let mut buffer: Vec<Option<T>> = vec![None; items.len()];
    checked("collection.copy_to", collection.copy_to(&mut buffer, 1))?;
    ensure(
        buffer[0].is_none(),
        "collection.copy_to",
        "Slot before the copy index was written",
    )?;
    let copied = buffer[1..]
        .iter()
        .map(|slot| ensure_some("collection.copy_to", slot.clone(), "Copy left a slot unset"))
        .collect::<HarnessResult<Vec<T>>>()?;
    ensure_same_elements(
        "collection.copy_to",
        &items[1..],
        &copied,
        "Copied items mismatch",
    )?;

    collection.clear();
    ensure_eq("collection.clear", 0, collection.count(), "Not empty after clear")?;
    Ok(())
}

/// Construct a `C` from opaque seed items and run the erased script. The
/// instance is returned still holding the seed items.
pub fn run_erased<C>(registry: &TypeRegistry, items: &[Opaque]) -> HarnessResult<C>
where
    C: ErasedCollection + 'static,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;
    let collection = registry.resolve::<C, Vec<Opaque>>()?.invoke(items.to_vec())?;
    run_erased_instance(&collection, items)?;
    Ok(collection)
}

/// Run the erased script against a collection that holds exactly `items`.
pub fn run_erased_instance<C>(collection: &C, items: &[Opaque]) -> HarnessResult<()>
where
    C: ErasedCollection + ?Sized,
{
    ensure_seed(items, MIN_SEED_ITEMS)?;

    ensure_no_panic("collection.sync", "Synchronization properties unreadable", || {
        (collection.is_synchronized(), collection.sync_root().is_some())
    })?;

    ensure_eq("collection.count", items.len(), collection.count(), "Count mismatch")?;

    let mut buffer = vec![Opaque::Null; collection.count() + 1];
    checked("collection.copy_to", collection.copy_to(&mut buffer, 1))?;
    ensure(
        buffer[0].is_null(),
        "collection.copy_to",
        "Slot before the copy index was written",
    )?;
    ensure_eq(
        "collection.copy_to",
        &items[0],
        &buffer[1],
        "First item not copied to the copy index",
    )?;
    ensure_same_elements(
        "collection.copy_to",
        items,
        &buffer[1..],
        "Copied items mismatch",
    )?;
    Ok(())
}
