//! End-to-end runs against std containers and deliberately broken ones.

use contract_harness::capability::{from_fn, SetLen};
use contract_harness::{
    Collection, CollectingReporter, ConstructorInfo, ContainerError, Cursor, Dictionary,
    Enumerable, Harness, HarnessConfig, HarnessError, List, Opaque, ParamInfo,
    ResolutionFailure, TypeRegistry,
};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::sync::Arc;

fn harness() -> (Harness, Arc<CollectingReporter>) {
    let reporter = Arc::new(CollectingReporter::new());
    let harness = Harness::new(HarnessConfig::quick())
        .unwrap()
        .with_reporter(reporter.clone());
    (harness, reporter)
}

fn std_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register_seeded::<Vec<String>, String>()
        .register_seeded::<VecDeque<String>, String>()
        .register_seeded::<HashSet<String>, String>()
        .register_seeded::<BTreeSet<String>, String>()
        .register_seeded::<Vec<Opaque>, Opaque>()
        .register_seeded::<HashMap<String, String>, (String, String)>()
        .register_seeded::<BTreeMap<String, String>, (String, String)>();
    registry
}

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn step_of(err: &HarnessError) -> &str {
    err.step().unwrap_or("<none>")
}

// ============================================================================
// Conforming std containers
// ============================================================================

#[test]
fn test_std_collections_conform() {
    let (harness, reporter) = harness();
    let harness = harness.with_registry(std_registry());
    let items = texts(&["a", "b", "c"]);

    let vec: Vec<String> = harness.collection(&items).unwrap();
    assert!(vec.is_empty());
    harness.collection::<VecDeque<String>, _>(&items).unwrap();
    harness.collection::<HashSet<String>, _>(&items).unwrap();
    harness.collection::<BTreeSet<String>, _>(&items).unwrap();
    assert!(reporter.is_empty(), "{:?}", reporter.messages());
}

#[test]
fn test_std_lists_conform() {
    let (harness, reporter) = harness();
    let harness = harness.with_registry(std_registry());
    let items = texts(&["a", "b"]);

    harness.list::<Vec<String>, _>(&items).unwrap();
    harness.list::<VecDeque<String>, _>(&items).unwrap();
    assert!(reporter.is_empty(), "{:?}", reporter.messages());
}

#[test]
fn test_list_scenario_restores_order() {
    let (harness, _) = harness();
    let mut list: Vec<&str> = Vec::new();
    harness.check_list(&mut list, &["a", "b"]).unwrap();
    assert!(list.is_empty());
}

#[test]
fn test_std_dictionaries_conform() {
    let (harness, reporter) = harness();
    let harness = harness.with_registry(std_registry());
    let items = pairs(&[("a", "a"), ("b", "b")]);

    let map: HashMap<String, String> = harness.dictionary(&items).unwrap();
    assert!(!map.contains_key("a"));
    harness.dictionary::<BTreeMap<String, String>, _, _>(&items).unwrap();
    assert!(reporter.is_empty(), "{:?}", reporter.messages());
}

#[test]
fn test_erased_surfaces_conform() {
    let (harness, reporter) = harness();
    let harness = harness.with_registry(std_registry());
    let items: Vec<Opaque> = vec!["a".into(), 2i64.into(), true.into()];

    let collection: Vec<Opaque> = harness.erased_collection(&items).unwrap();
    assert_eq!(collection, items);
    harness.erased_list::<Vec<Opaque>>(&items).unwrap();

    let entries: Vec<(Opaque, Opaque)> = vec![
        ("k1".into(), 1i64.into()),
        ("k2".into(), 2i64.into()),
        ("k3".into(), 3i64.into()),
    ];
    harness
        .erased_dictionary::<BTreeMap<Opaque, Opaque>>(&entries)
        .unwrap();
    harness
        .erased_dictionary::<HashMap<Opaque, Opaque>>(&entries)
        .unwrap();
    harness.erased_enumerable(&items, true, 3).unwrap();
    assert!(reporter.is_empty(), "{:?}", reporter.messages());
}

#[test]
fn test_enumerable_scenario() {
    let (harness, _) = harness();
    harness
        .enumerable_sequence(&vec!["a", "b"], true, &["a", "b"])
        .unwrap();
    harness.enumerable(&from_fn(|| "ab".chars()), true, 2).unwrap();
}

#[test]
fn test_streams_conform() {
    let (harness, _) = harness();
    harness.stream(&mut io::Cursor::new(Vec::new())).unwrap();
    harness.stream(&mut tempfile::tempfile().unwrap()).unwrap();
}

#[tokio::test]
async fn test_async_surfaces_conform() {
    let (harness, reporter) = harness();
    let source = || futures::stream::iter(0..5);
    harness.async_enumerable(&source, true, 5).await.unwrap();

    let mut file = tokio::fs::File::from_std(tempfile::tempfile().unwrap());
    harness.async_stream(&mut file).await.unwrap();
    assert!(reporter.is_empty(), "{:?}", reporter.messages());
}

// ============================================================================
// Broken implementations
// ============================================================================

/// Refuses every mutation.
struct Frozen(Vec<u8>);

impl Collection<u8> for Frozen {
    fn count(&self) -> usize {
        self.0.len()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn add(&mut self, _item: u8) -> Result<(), ContainerError> {
        Err(ContainerError::ReadOnly)
    }

    fn remove(&mut self, _item: &u8) -> bool {
        false
    }

    fn contains(&self, item: &u8) -> bool {
        self.0.contains(item)
    }

    fn copy_to(&self, dest: &mut [Option<u8>], index: usize) -> Result<(), ContainerError> {
        contract_harness::capability::copy_into(self.0.iter(), dest, index, Some)
    }

    fn clear(&mut self) {}
}

#[test]
fn test_read_only_collection_rejected() {
    let (harness, reporter) = harness();
    let err = harness
        .check_collection(&mut Frozen(Vec::new()), &[1, 2])
        .unwrap_err();
    assert_eq!(step_of(&err), "collection.read_only");
    assert_eq!(reporter.messages().len(), 1);
}

/// `remove_at` leaves a hole instead of shifting later items down.
#[derive(Default)]
struct Holey(Vec<Option<char>>);

impl Collection<char> for Holey {
    fn count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    fn add(&mut self, item: char) -> Result<(), ContainerError> {
        self.0.push(Some(item));
        Ok(())
    }

    fn remove(&mut self, item: &char) -> bool {
        match self.0.iter().position(|slot| slot.as_ref() == Some(item)) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    fn contains(&self, item: &char) -> bool {
        self.0.iter().any(|slot| slot.as_ref() == Some(item))
    }

    fn copy_to(&self, dest: &mut [Option<char>], index: usize) -> Result<(), ContainerError> {
        let items: Vec<char> = self.0.iter().flatten().copied().collect();
        contract_harness::capability::copy_into(items.iter(), dest, index, Some)
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

impl List<char> for Holey {
    fn index_of(&self, item: &char) -> Option<usize> {
        self.0.iter().position(|slot| slot.as_ref() == Some(item))
    }

    fn get(&self, index: usize) -> Option<&char> {
        self.0.get(index).and_then(Option::as_ref)
    }

    fn insert(&mut self, index: usize, item: char) -> Result<(), ContainerError> {
        if index > self.0.len() {
            return Err(ContainerError::OutOfRange {
                index,
                len: self.0.len(),
            });
        }
        self.0.insert(index, Some(item));
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<char, ContainerError> {
        let len = self.0.len();
        self.0
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(ContainerError::OutOfRange { index, len })
    }
}

#[test]
fn test_non_shifting_list_rejected() {
    let (harness, _) = harness();
    let err = harness
        .check_list(&mut Holey::default(), &['a', 'b'])
        .unwrap_err();
    assert_eq!(step_of(&err), "list.remove_at");
    assert!(err.to_string().contains("Items didn't shift down"));
}

/// `add` overwrites existing keys. With `then_reject` it still reports the
/// duplicate, after the value was already replaced.
#[derive(Default)]
struct Overwriting {
    map: BTreeMap<String, String>,
    then_reject: bool,
}

impl Dictionary<String, String> for Overwriting {
    fn count(&self) -> usize {
        self.map.len()
    }

    fn keys(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    fn values(&self) -> Vec<String> {
        self.map.values().cloned().collect()
    }

    fn get(&self, key: &String) -> Result<&String, ContainerError> {
        self.map
            .get(key)
            .ok_or_else(|| ContainerError::KeyNotFound(key.clone()))
    }

    fn set(&mut self, key: String, value: String) {
        self.map.insert(key, value);
    }

    fn add(&mut self, key: String, value: String) -> Result<(), ContainerError> {
        match self.map.insert(key.clone(), value) {
            Some(_) if self.then_reject => Err(ContainerError::DuplicateKey(key)),
            _ => Ok(()),
        }
    }

    fn contains_key(&self, key: &String) -> bool {
        self.map.contains_key(key)
    }

    fn contains_value(&self, value: &String) -> bool {
        self.map.values().any(|v| v == value)
    }

    fn remove(&mut self, key: &String) -> bool {
        self.map.remove(key).is_some()
    }

    fn try_get(&self, key: &String) -> Option<&String> {
        self.map.get(key)
    }

    fn clear(&mut self) {
        self.map.clear();
    }

    fn entries(&self) -> Box<dyn Cursor<Item = (String, String)> + '_> {
        self.map.entries()
    }
}

#[test]
fn test_overwriting_dictionary_rejected() {
    let (harness, _) = harness();
    let err = harness
        .check_dictionary(&mut Overwriting::default(), &pairs(&[("k1", "v1"), ("k2", "v2")]))
        .unwrap_err();
    assert_eq!(step_of(&err), "dictionary.duplicate_key");
    assert!(err.to_string().contains("Double keys possible"));
}

#[test]
fn test_overwrite_then_reject_dictionary_rejected() {
    let (harness, _) = harness();
    let mut dict = Overwriting {
        then_reject: true,
        ..Default::default()
    };
    let err = harness
        .check_dictionary(&mut dict, &pairs(&[("k1", "v1"), ("k2", "v2"), ("k3", "v3")]))
        .unwrap_err();
    assert_eq!(step_of(&err), "dictionary.duplicate_key");
    assert!(err.to_string().contains("Rejected add replaced the value"));
}

/// Starts over after reporting exhaustion once.
struct Resurrecting {
    items: Vec<u8>,
    next: usize,
    current: Option<u8>,
}

impl Cursor for Resurrecting {
    type Item = u8;

    fn move_next(&mut self) -> bool {
        self.current = self.items.get(self.next).copied();
        self.next = if self.current.is_some() { self.next + 1 } else { 0 };
        self.current.is_some()
    }

    fn current(&self) -> Option<&u8> {
        self.current.as_ref()
    }
}

struct Phoenix(Vec<u8>);

impl Enumerable for Phoenix {
    type Item = u8;

    fn cursor(&self) -> Box<dyn Cursor<Item = u8> + '_> {
        Box::new(Resurrecting {
            items: self.0.clone(),
            next: 0,
            current: None,
        })
    }
}

#[test]
fn test_resurrecting_cursor_rejected() {
    let (harness, _) = harness();
    let err = harness.enumerable(&Phoenix(vec![1, 2]), false, 2).unwrap_err();
    assert_eq!(step_of(&err), "enumerable.exhausted");
}

#[tokio::test]
async fn test_async_overlong_stream_rejected() {
    let (harness, _) = harness();
    let source = || futures::stream::iter(vec![1, 2, 3]);
    let err = harness.async_enumerable(&source, false, 2).await.unwrap_err();
    assert_eq!(step_of(&err), "enumerable.exhausted");
}

/// Consumes one byte more than each read returns.
struct OverReading(io::Cursor<Vec<u8>>);

impl Read for OverReading {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = Read::read(&mut self.0, buf)?;
        if read > 0 {
            let position = self.0.position();
            self.0.set_position(position + 1);
        }
        Ok(read)
    }
}

impl Write for OverReading {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut self.0, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for OverReading {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.0, pos)
    }
}

impl SetLen for OverReading {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        SetLen::set_len(&mut self.0, len)
    }
}

#[test]
fn test_over_reading_stream_rejected() {
    let (harness, _) = harness();
    let err = harness
        .stream(&mut OverReading(io::Cursor::new(Vec::new())))
        .unwrap_err();
    assert!(
        matches!(step_of(&err), "stream.copy" | "stream.copy_exact"),
        "{}",
        err
    );
}

/// Accepts `set_len` without changing anything.
struct Unshrinkable(io::Cursor<Vec<u8>>);

impl Read for Unshrinkable {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Read::read(&mut self.0, buf)
    }
}

impl Write for Unshrinkable {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Write::write(&mut self.0, buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for Unshrinkable {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Seek::seek(&mut self.0, pos)
    }
}

impl SetLen for Unshrinkable {
    fn set_len(&mut self, _len: u64) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_no_op_set_len_rejected() {
    let (harness, _) = harness();
    let err = harness
        .stream(&mut Unshrinkable(io::Cursor::new(Vec::new())))
        .unwrap_err();
    assert_eq!(step_of(&err), "stream.set_len");
}

// ============================================================================
// Construction discovery
// ============================================================================

#[test]
fn test_unregistered_type_rejected() {
    let (harness, reporter) = harness();
    let err = harness.collection::<BTreeSet<u8>, u8>(&[1, 2]).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Resolution {
            failure: ResolutionFailure::NotFound { .. },
            ..
        }
    ));
    assert_eq!(reporter.messages(), vec![err.to_string()]);
}

#[test]
fn test_constructor_without_body_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register::<Vec<u8>>(ConstructorInfo::new(
        "Vec::from_items",
        vec![ParamInfo::of::<Vec<u8>>("items")],
    ));
    let (harness, _) = harness();
    let err = harness
        .with_registry(registry)
        .list::<Vec<u8>, u8>(&[1, 2])
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Resolution {
            failure: ResolutionFailure::NotInvokable { .. },
            ..
        }
    ));
}

#[test]
fn test_constructor_of_wrong_type_rejected() {
    let mut registry = TypeRegistry::new();
    registry.register::<Vec<u8>>(
        ConstructorInfo::new("Vec::confused", vec![ParamInfo::of::<Vec<u8>>("items")])
            .with_invoker(|_| Ok(Box::new(String::new()) as Box<dyn Any>)),
    );
    let (harness, _) = harness();
    let err = harness
        .with_registry(registry)
        .collection::<Vec<u8>, u8>(&[1, 2])
        .unwrap_err();
    assert!(matches!(
        err,
        HarnessError::Resolution {
            failure: ResolutionFailure::WrongType { .. },
            ..
        }
    ));
}

#[test]
fn test_invalid_seed_rejected_before_construction() {
    let (harness, _) = harness();
    let err = harness
        .with_registry(std_registry())
        .list::<Vec<String>, _>(&texts(&["a", "a"]))
        .unwrap_err();
    assert!(matches!(err, HarnessError::InvalidSeed(_)));
}
