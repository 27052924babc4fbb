//! Service registration types.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::component::{Arguments, BoxError, Component, Constructor};
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type Params = SmallVec<[Key; 4]>;

type Invoke = dyn Fn(Vec<Instance>) -> Result<Instance, BoxError> + Send + Sync;

/// A constructed service, type-erased.
///
/// Always holds an `Arc<S>` for the service type `S` it was resolved as, so a
/// concrete type and a `dyn Trait` go through the same storage path. Clones
/// share the same underlying object.
#[derive(Clone)]
pub struct Instance {
    value: AnyArc,
    type_name: &'static str,
}

impl Instance {
    /// Wraps a service handle.
    pub fn new<S: ?Sized + Send + Sync + 'static>(service: Arc<S>) -> Self {
        Instance {
            value: Arc::new(service),
            type_name: std::any::type_name::<S>(),
        }
    }

    /// Recovers the typed handle, or `None` if this instance is not an `S`.
    pub fn downcast<S: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<S>> {
        self.value.downcast_ref::<Arc<S>>().cloned()
    }

    /// Whether both instances are the same constructed object.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }

    /// Name of the service type this instance was resolved as.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// One constructor of an implementation, erased to produce instances of the
/// service type it was registered under.
pub(crate) struct Activator {
    pub(crate) parameters: Params,
    invoke: Arc<Invoke>,
}

impl Activator {
    fn erase<S, I, U>(ctor: Constructor<I>, upcast: Arc<U>) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
        U: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    {
        let Constructor { parameters, body } = ctor;
        let invoke = move |values: Vec<Instance>| -> Result<Instance, BoxError> {
            let mut args = Arguments::new(values);
            let component = body(&mut args)?;
            Ok(Instance::new::<S>(upcast(Arc::new(component))))
        };
        Activator {
            parameters,
            invoke: Arc::new(invoke),
        }
    }

    pub(crate) fn has_dependencies(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub(crate) fn invoke(&self, values: Vec<Instance>) -> Result<Instance, BoxError> {
        (self.invoke)(values)
    }
}

/// Records which implementation satisfies a key and under what lifetime.
///
/// The constructors of the implementation are captured when the binding is
/// created, so resolution never needs runtime reflection. Cloning is cheap.
#[derive(Clone)]
pub struct Binding {
    implementation: Key,
    lifetime: Lifetime,
    constructors: Arc<[Activator]>,
}

impl Binding {
    /// Creates a binding that builds `I` and exposes it as `S` via `upcast`.
    pub fn new<S, I, U>(lifetime: Lifetime, upcast: U) -> Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
        U: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    {
        let upcast = Arc::new(upcast);
        let constructors = I::constructors()
            .into_iter()
            .map(|ctor| Activator::erase::<S, I, U>(ctor, upcast.clone()))
            .collect::<Vec<_>>();
        Binding {
            implementation: Key::of::<I>(),
            lifetime,
            constructors: constructors.into(),
        }
    }

    /// Key of the concrete implementation type.
    pub fn implementation(&self) -> Key {
        self.implementation
    }

    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }

    /// Number of constructors the implementation declares.
    pub fn constructor_count(&self) -> usize {
        self.constructors.len()
    }

    /// Whether this binding maps `key` to itself.
    pub fn is_self_binding(&self, key: &Key) -> bool {
        self.implementation == *key
    }

    /// Ordered dependency keys of the constructor resolution would use.
    pub fn dependencies(&self) -> DiResult<&[Key]> {
        self.select_constructor().map(|ctor| &ctor.parameters[..])
    }

    /// Picks the single eligible constructor.
    ///
    /// At most one constructor may declare dependencies. When none does,
    /// exactly one parameterless constructor must exist.
    pub(crate) fn select_constructor(&self) -> DiResult<&Activator> {
        let mut with_deps = self.constructors.iter().filter(|c| c.has_dependencies());
        match (with_deps.next(), with_deps.next()) {
            (Some(ctor), None) => Ok(ctor),
            (Some(_), Some(_)) => Err(DiError::AmbiguousConstructor {
                implementation: self.implementation,
                candidates: self.constructors.iter().filter(|c| c.has_dependencies()).count(),
            }),
            (None, _) => match &self.constructors[..] {
                [only] => Ok(only),
                others => Err(DiError::AmbiguousConstructor {
                    implementation: self.implementation,
                    candidates: others.len(),
                }),
            },
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("implementation", &self.implementation)
            .field("lifetime", &self.lifetime)
            .field("constructors", &self.constructors.len())
            .finish()
    }
}
