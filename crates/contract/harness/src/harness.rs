//! Harness orchestration: routes a caller's check to the right script, wraps
//! it in a tracing span and hands failures to the [`Reporter`].

use crate::capability::{
    AsyncByteStream, AsyncEnumerable, ByteStream, Capability, Collection, Dictionary,
    Enumerable, ErasedCollection, ErasedDictionary, ErasedEnumerable, ErasedList, List, Variant,
};
use crate::config::HarnessConfig;
use crate::error::HarnessResult;
use crate::family::{self, EnumerableHarness, StreamHarness};
use crate::introspect::TypeRegistry;
use crate::value::Opaque;
use parking_lot::Mutex;
use std::any::type_name;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tracing::Instrument;

// ============================================================================
// Reporters
// ============================================================================

/// Sink for contract violations.
pub trait Reporter: Send + Sync {
    /// Report `message` as a failure unless `condition` holds.
    fn report(&self, condition: bool, message: &str) {
        if !condition {
            self.fail(message);
        }
    }

    fn fail(&self, message: &str);
}

/// Logs violations at error level. The default.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn fail(&self, message: &str) {
        tracing::error!(violation = message, "contract violation");
    }
}

/// Panics on the first violation, failing the hosting test.
#[derive(Debug, Default, Clone, Copy)]
pub struct PanicReporter;

impl Reporter for PanicReporter {
    fn fail(&self, message: &str) {
        panic!("contract violation: {}", message);
    }
}

/// Buffers violations for later inspection.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    pub fn clear(&self) {
        self.messages.lock().clear();
    }
}

impl Reporter for CollectingReporter {
    fn fail(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

// ============================================================================
// Harness
// ============================================================================

/// Entry point for every contract check.
///
/// Cheap to clone: the registry, the reporter and the stream payload are
/// shared.
#[derive(Clone)]
pub struct Harness {
    config: HarnessConfig,
    registry: Arc<TypeRegistry>,
    reporter: Arc<dyn Reporter>,
    enumerable: EnumerableHarness,
    stream: Arc<StreamHarness>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::build(HarnessConfig::default())
    }
}

impl Harness {
    /// Create a harness from a validated configuration.
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: HarnessConfig) -> Self {
        Self {
            enumerable: EnumerableHarness::new(&config.enumerable),
            stream: Arc::new(StreamHarness::new(&config.stream)),
            registry: Arc::new(TypeRegistry::new()),
            reporter: Arc::new(TracingReporter),
            config,
        }
    }

    pub fn with_registry(mut self, registry: TypeRegistry) -> Self {
        self.registry = Arc::new(registry);
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    fn observe<R>(
        &self,
        capability: Capability,
        variant: Variant,
        target: &str,
        run: impl FnOnce() -> HarnessResult<R>,
    ) -> HarnessResult<R> {
        let span = tracing::info_span!(
            "harness",
            capability = %capability,
            variant = %variant,
            container = target
        );
        let _enter = span.enter();
        tracing::info!("harness run started");
        let result = run();
        self.conclude(&result);
        result
    }

    async fn observe_async<R, F>(
        &self,
        capability: Capability,
        variant: Variant,
        target: &str,
        run: F,
    ) -> HarnessResult<R>
    where
        F: Future<Output = HarnessResult<R>>,
    {
        let span = tracing::info_span!(
            "harness",
            capability = %capability,
            variant = %variant,
            container = target
        );
        async {
            tracing::info!("harness run started");
            let result = run.await;
            self.conclude(&result);
            result
        }
        .instrument(span)
        .await
    }

    fn conclude<R>(&self, result: &HarnessResult<R>) {
        match result {
            Ok(_) => tracing::info!("harness run passed"),
            Err(err) => {
                tracing::info!(error = %err, "harness run failed");
                self.reporter.fail(&err.to_string());
            }
        }
    }

    // ------------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------------

    /// Construct a `C` from `items` through the registry and run the script.
    pub fn collection<C, T>(&self, items: &[T]) -> HarnessResult<C>
    where
        C: Collection<T> + 'static,
        T: Clone + PartialEq + Debug + 'static,
    {
        self.observe(Capability::Collection, Variant::Typed, type_name::<C>(), || {
            family::collection::run(&self.registry, items)
        })
    }

    /// Run the script against an empty collection the caller owns.
    pub fn check_collection<C, T>(&self, collection: &mut C, items: &[T]) -> HarnessResult<()>
    where
        C: Collection<T> + ?Sized,
        T: Clone + PartialEq + Debug,
    {
        self.observe(Capability::Collection, Variant::Typed, type_name::<C>(), || {
            family::collection::run_instance(collection, items)
        })
    }

    pub fn erased_collection<C>(&self, items: &[Opaque]) -> HarnessResult<C>
    where
        C: ErasedCollection + 'static,
    {
        self.observe(Capability::Collection, Variant::Erased, type_name::<C>(), || {
            family::collection::run_erased(&self.registry, items)
        })
    }

    /// Run the erased script against a collection holding exactly `items`.
    pub fn check_erased_collection<C>(&self, collection: &C, items: &[Opaque]) -> HarnessResult<()>
    where
        C: ErasedCollection + ?Sized,
    {
        self.observe(Capability::Collection, Variant::Erased, type_name::<C>(), || {
            family::collection::run_erased_instance(collection, items)
        })
    }

    // ------------------------------------------------------------------------
    // List
    // ------------------------------------------------------------------------

    pub fn list<L, T>(&self, items: &[T]) -> HarnessResult<L>
    where
        L: List<T> + 'static,
        T: Clone + PartialEq + Debug + 'static,
    {
        self.observe(Capability::List, Variant::Typed, type_name::<L>(), || {
            family::list::run(&self.registry, items)
        })
    }

    pub fn check_list<L, T>(&self, list: &mut L, items: &[T]) -> HarnessResult<()>
    where
        L: List<T> + ?Sized,
        T: Clone + PartialEq + Debug,
    {
        self.observe(Capability::List, Variant::Typed, type_name::<L>(), || {
            family::list::run_instance(list, items)
        })
    }

    pub fn erased_list<L>(&self, items: &[Opaque]) -> HarnessResult<L>
    where
        L: ErasedList + Default,
    {
        self.observe(Capability::List, Variant::Erased, type_name::<L>(), || {
            family::list::run_erased(items)
        })
    }

    pub fn check_erased_list<L>(&self, list: &mut L, items: &[Opaque]) -> HarnessResult<()>
    where
        L: ErasedList + ?Sized,
    {
        self.observe(Capability::List, Variant::Erased, type_name::<L>(), || {
            family::list::run_erased_instance(list, items)
        })
    }

    // ------------------------------------------------------------------------
    // Dictionary
    // ------------------------------------------------------------------------

    pub fn dictionary<D, K, V>(&self, items: &[(K, V)]) -> HarnessResult<D>
    where
        D: Dictionary<K, V> + 'static,
        K: Clone + PartialEq + Debug + 'static,
        V: Clone + PartialEq + Debug + 'static,
    {
        self.observe(Capability::Dictionary, Variant::Typed, type_name::<D>(), || {
            family::dictionary::run(&self.registry, items)
        })
    }

    pub fn check_dictionary<D, K, V>(&self, dict: &mut D, items: &[(K, V)]) -> HarnessResult<()>
    where
        D: Dictionary<K, V> + ?Sized,
        K: Clone + PartialEq + Debug,
        V: Clone + PartialEq + Debug,
    {
        self.observe(Capability::Dictionary, Variant::Typed, type_name::<D>(), || {
            family::dictionary::run_instance(dict, items)
        })
    }

    pub fn erased_dictionary<D>(&self, items: &[(Opaque, Opaque)]) -> HarnessResult<D>
    where
        D: ErasedDictionary + Default,
    {
        self.observe(Capability::Dictionary, Variant::Erased, type_name::<D>(), || {
            family::dictionary::run_erased(items)
        })
    }

    pub fn check_erased_dictionary<D>(
        &self,
        dict: &mut D,
        items: &[(Opaque, Opaque)],
    ) -> HarnessResult<()>
    where
        D: ErasedDictionary + ?Sized,
    {
        self.observe(Capability::Dictionary, Variant::Erased, type_name::<D>(), || {
            family::dictionary::run_erased_instance(dict, items)
        })
    }

    // ------------------------------------------------------------------------
    // Enumerable
    // ------------------------------------------------------------------------

    pub fn enumerable<E>(
        &self,
        enumerable: &E,
        restartable: bool,
        count: usize,
    ) -> HarnessResult<()>
    where
        E: Enumerable + ?Sized,
        E::Item: Clone,
    {
        self.observe(Capability::Enumerable, Variant::Typed, type_name::<E>(), || {
            self.enumerable.run(enumerable, restartable, count)
        })
    }

    pub fn enumerable_sequence<E>(
        &self,
        enumerable: &E,
        restartable: bool,
        expected: &[E::Item],
    ) -> HarnessResult<()>
    where
        E: Enumerable + ?Sized,
        E::Item: Clone + PartialEq + Debug,
    {
        self.observe(Capability::Enumerable, Variant::Typed, type_name::<E>(), || {
            self.enumerable.run_sequence(enumerable, restartable, expected)
        })
    }

    pub fn erased_enumerable<E>(
        &self,
        enumerable: &E,
        restartable: bool,
        count: usize,
    ) -> HarnessResult<()>
    where
        E: ErasedEnumerable + ?Sized,
    {
        self.observe(Capability::Enumerable, Variant::Erased, type_name::<E>(), || {
            self.enumerable.run_erased(enumerable, restartable, count)
        })
    }

    pub async fn async_enumerable<E>(
        &self,
        enumerable: &E,
        reusable: bool,
        count: usize,
    ) -> HarnessResult<()>
    where
        E: AsyncEnumerable + ?Sized,
    {
        self.observe_async(
            Capability::AsyncEnumerable,
            Variant::Typed,
            type_name::<E>(),
            self.enumerable.run_async(enumerable, reusable, count),
        )
        .await
    }

    // ------------------------------------------------------------------------
    // Stream
    // ------------------------------------------------------------------------

    pub fn stream<S: ByteStream>(&self, stream: &mut S) -> HarnessResult<()> {
        self.observe(Capability::Stream, Variant::Typed, type_name::<S>(), || {
            self.stream.run(stream)
        })
    }

    pub async fn async_stream<S: AsyncByteStream>(&self, stream: &mut S) -> HarnessResult<()> {
        self.observe_async(
            Capability::AsyncStream,
            Variant::Typed,
            type_name::<S>(),
            self.stream.run_async(stream),
        )
        .await
    }
}
