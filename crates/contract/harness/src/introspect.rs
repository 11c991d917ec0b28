//! Runtime constructor discovery.
//!
//! A [`TypeRegistry`] maps target types to the constructors they declare.
//! Harness entry points that take a type instead of an instance ask the
//! registry for a constructor whose single parameter accepts the seed vector,
//! then invoke it.
//!
//! ```
//! use contract_harness::introspect::TypeRegistry;
//!
//! let mut registry = TypeRegistry::new();
//! registry.register_seeded::<Vec<u32>, u32>();
//!
//! let binding = registry.resolve::<Vec<u32>, Vec<u32>>().unwrap();
//! assert_eq!(binding.invoke(vec![1, 2]).unwrap(), vec![1, 2]);
//! ```

use crate::error::{HarnessError, HarnessResult, ResolutionFailure};
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Type-erased constructor body: positional arguments in, instance out.
pub type Invoker =
    Arc<dyn Fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, String> + Send + Sync>;

/// Compile-time "buildable from a sequence of `T`" capability.
pub trait FromSeed<T>: Sized {
    fn from_seed(items: Vec<T>) -> Self;
}

impl<C: FromIterator<T>, T> FromSeed<T> for C {
    fn from_seed(items: Vec<T>) -> Self {
        items.into_iter().collect()
    }
}

/// A declared constructor parameter and the argument types it accepts.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    accepts: Vec<(TypeId, &'static str)>,
}

impl ParamInfo {
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accepts: vec![(TypeId::of::<T>(), type_name::<T>())],
        }
    }

    /// Widen the parameter to also accept `T`.
    pub fn also_accepts<T: 'static>(mut self) -> Self {
        self.accepts.push((TypeId::of::<T>(), type_name::<T>()));
        self
    }

    pub fn accepts(&self, ty: TypeId) -> bool {
        self.accepts.iter().any(|(id, _)| *id == ty)
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.accepts.iter().map(|(_, name)| *name).collect()
    }
}

/// A constructor declared by a registered type.
#[derive(Clone)]
pub struct ConstructorInfo {
    pub name: String,
    pub is_static: bool,
    pub params: Vec<ParamInfo>,
    invoker: Option<Invoker>,
}

impl ConstructorInfo {
    /// A public instance constructor without a body.
    pub fn new(name: impl Into<String>, params: Vec<ParamInfo>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            params,
            invoker: None,
        }
    }

    pub fn with_invoker<F>(mut self, invoker: F) -> Self
    where
        F: Fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, String> + Send + Sync + 'static,
    {
        self.invoker = Some(Arc::new(invoker));
        self
    }

    /// Mark as a static factory. Resolution skips these.
    pub fn static_factory(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Single-parameter constructor from a typed closure.
    pub fn from_fn<S, C, F>(name: impl Into<String>, build: F) -> Self
    where
        S: 'static,
        C: 'static,
        F: Fn(S) -> Result<C, String> + Send + Sync + 'static,
    {
        Self::new(name, vec![ParamInfo::of::<S>("items")]).with_invoker(move |mut args| {
            if args.len() != 1 {
                return Err(format!("expected 1 argument, got {}", args.len()));
            }
            let arg = args.remove(0).downcast::<S>().map_err(|_| {
                format!("argument is not a {}", type_name::<S>())
            })?;
            build(*arg).map(|built| Box::new(built) as Box<dyn Any>)
        })
    }

    /// Constructor derived from the [`FromSeed`] capability of `C`.
    pub fn from_seed<C, T>() -> Self
    where
        C: FromSeed<T> + 'static,
        T: 'static,
    {
        Self::from_fn(
            format!("{}::from_seed", type_name::<C>()),
            |items: Vec<T>| Ok(C::from_seed(items)),
        )
    }

    pub fn is_invokable(&self) -> bool {
        self.invoker.is_some()
    }

    fn accepts_single<S: 'static>(&self) -> bool {
        !self.is_static && self.params.len() == 1 && self.params[0].accepts(TypeId::of::<S>())
    }
}

impl fmt::Debug for ConstructorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorInfo")
            .field("name", &self.name)
            .field("is_static", &self.is_static)
            .field("params", &self.params)
            .field("invokable", &self.is_invokable())
            .finish()
    }
}

/// Registry of constructible target types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeId, Vec<ConstructorInfo>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a constructor of `C`. Declaration order is resolution order.
    pub fn register<C: 'static>(&mut self, constructor: ConstructorInfo) -> &mut Self {
        self.types
            .entry(TypeId::of::<C>())
            .or_default()
            .push(constructor);
        self
    }

    /// Declare the `Vec<T>` constructor `C` gets from [`FromSeed`].
    pub fn register_seeded<C, T>(&mut self) -> &mut Self
    where
        C: FromSeed<T> + 'static,
        T: 'static,
    {
        self.register::<C>(ConstructorInfo::from_seed::<C, T>())
    }

    pub fn constructors_of<C: 'static>(&self) -> &[ConstructorInfo] {
        self.types
            .get(&TypeId::of::<C>())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_registered<C: 'static>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<C>())
    }

    /// Find the first non-static constructor of `C` taking exactly one
    /// parameter that accepts an `S`.
    pub fn resolve<C: 'static, S: 'static>(&self) -> HarnessResult<ConstructorBinding<C, S>> {
        let target = type_name::<C>();
        let constructor = self
            .constructors_of::<C>()
            .iter()
            .find(|c| c.accepts_single::<S>())
            .ok_or_else(|| {
                HarnessError::resolution(
                    target,
                    ResolutionFailure::NotFound {
                        seed: type_name::<S>().to_string(),
                    },
                )
            })?;

        let invoker = constructor.invoker.clone().ok_or_else(|| {
            HarnessError::resolution(
                target,
                ResolutionFailure::NotInvokable {
                    constructor: constructor.name.clone(),
                },
            )
        })?;

        tracing::debug!(
            target_type = target,
            constructor = %constructor.name,
            "resolved constructor"
        );

        Ok(ConstructorBinding {
            name: constructor.name.clone(),
            invoker,
            _marker: PhantomData,
        })
    }
}

/// A resolved constructor of `C` taking an `S`.
pub struct ConstructorBinding<C, S> {
    name: String,
    invoker: Invoker,
    _marker: PhantomData<fn(S) -> C>,
}

impl<C: 'static, S: 'static> ConstructorBinding<C, S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Construct a new `C` from `seed`.
    pub fn invoke(&self, seed: S) -> HarnessResult<C> {
        let target = type_name::<C>();
        let built = (self.invoker)(vec![Box::new(seed) as Box<dyn Any>]).map_err(|reason| {
            HarnessError::resolution(
                target,
                ResolutionFailure::InvocationFailed {
                    constructor: self.name.clone(),
                    reason,
                },
            )
        })?;

        built.downcast::<C>().map(|c| *c).map_err(|_| {
            HarnessError::resolution(
                target,
                ResolutionFailure::WrongType {
                    constructor: self.name.clone(),
                    expected: target.to_string(),
                },
            )
        })
    }
}

impl<C, S> fmt::Debug for ConstructorBinding<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstructorBinding")
            .field("name", &self.name)
            .finish()
    }
}
