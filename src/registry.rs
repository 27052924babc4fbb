//! The registry: service key to binding.
//!
//! Registration and lookup take `&self`, so a registry shared behind an `Arc`
//! can still accept registrations while early resolutions run. The first
//! registration of a key wins; later ones are ignored and logged.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::component::Component;
use crate::config::ContainerOptions;
use crate::descriptors::ServiceDescriptor;
use crate::error::DiResult;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::provider::Scope;
use crate::registration::Binding;
use crate::validation::{self, ValidationReport};
use crate::{Map, Set};

/// Mapping from service key to [`Binding`].
///
/// # Examples
///
/// ```rust
/// use tiny_di::{Component, Constructor, Key, Lifetime, Registry};
/// use std::sync::Arc;
///
/// trait Mailer: Send + Sync {}
/// struct SmtpMailer;
/// impl Mailer for SmtpMailer {}
/// impl Component for SmtpMailer {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with0(|| SmtpMailer)]
///     }
/// }
///
/// let registry = Registry::new();
/// let upcast = |m: Arc<SmtpMailer>| m as Arc<dyn Mailer>;
/// assert!(registry.register::<dyn Mailer, SmtpMailer, _>(Lifetime::Singleton, upcast));
/// // first registration wins
/// assert!(!registry.register::<dyn Mailer, SmtpMailer, _>(Lifetime::Transient, upcast));
///
/// let binding = registry.lookup(&Key::of::<dyn Mailer>()).unwrap();
/// assert_eq!(binding.lifetime(), Lifetime::Singleton);
/// assert_eq!(binding.implementation(), Key::of::<SmtpMailer>());
/// ```
pub struct Registry {
    bindings: RwLock<Map<Key, Binding>>,
    // keys whose whole graph passed the static walk
    verified: Mutex<Set<Key>>,
    options: ContainerOptions,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates an empty registry with default options.
    pub fn new() -> Self {
        Self::with_options(ContainerOptions::default())
    }

    pub fn with_options(options: ContainerOptions) -> Self {
        Registry {
            bindings: RwLock::new(Map::default()),
            verified: Mutex::new(Set::default()),
            options,
        }
    }

    pub fn options(&self) -> &ContainerOptions {
        &self.options
    }

    /// Binds service `S` to implementation `I`.
    ///
    /// `upcast` turns the constructed `Arc<I>` into the service form,
    /// typically `|i| i as Arc<dyn Trait>`. Returns `false` and leaves the
    /// existing binding untouched if `S` is already registered.
    pub fn register<S, I, U>(&self, lifetime: Lifetime, upcast: U) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
        U: Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    {
        self.insert(Key::of::<S>(), Binding::new::<S, I, U>(lifetime, upcast))
    }

    /// Registers `T` as its own implementation.
    pub fn register_self<T: Component>(&self, lifetime: Lifetime) -> bool {
        self.register::<T, T, _>(lifetime, |component| component)
    }

    pub(crate) fn insert(&self, key: Key, binding: Binding) -> bool {
        let mut bindings = self.bindings.write();
        if let Some(existing) = bindings.get(&key) {
            debug!(
                key = %key,
                existing = %existing.implementation(),
                ignored = %binding.implementation(),
                "Registration ignored, key already bound"
            );
            return false;
        }
        debug!(
            key = %key,
            implementation = %binding.implementation(),
            lifetime = %binding.lifetime(),
            "Registered service"
        );
        bindings.insert(key, binding);
        true
    }

    // ----- Chaining helpers -----

    pub fn add_transient<T: Component>(&self) -> &Self {
        self.register_self::<T>(Lifetime::Transient);
        self
    }

    pub fn add_singleton<T: Component>(&self) -> &Self {
        self.register_self::<T>(Lifetime::Singleton);
        self
    }

    pub fn add_scoped<T: Component>(&self) -> &Self {
        self.register_self::<T>(Lifetime::Scoped);
        self
    }

    pub fn add_transient_as<S, I>(
        &self,
        upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    ) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
    {
        self.register::<S, I, _>(Lifetime::Transient, upcast);
        self
    }

    pub fn add_singleton_as<S, I>(
        &self,
        upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    ) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
    {
        self.register::<S, I, _>(Lifetime::Singleton, upcast);
        self
    }

    pub fn add_scoped_as<S, I>(
        &self,
        upcast: impl Fn(Arc<I>) -> Arc<S> + Send + Sync + 'static,
    ) -> &Self
    where
        S: ?Sized + Send + Sync + 'static,
        I: Component,
    {
        self.register::<S, I, _>(Lifetime::Scoped, upcast);
        self
    }

    // ----- Lookup -----

    /// The binding for `key`, or `None` if it was never registered.
    pub fn lookup(&self, key: &Key) -> Option<Binding> {
        self.bindings.read().get(key).cloned()
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.bindings.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// Snapshot of all registered keys.
    pub fn keys(&self) -> Vec<Key> {
        self.bindings.read().keys().copied().collect()
    }

    // ----- Introspection -----

    /// Describes every binding, sorted by service name.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let mut descriptors: Vec<_> = self
            .bindings
            .read()
            .iter()
            .map(|(key, binding)| ServiceDescriptor::from_binding(*key, binding))
            .collect();
        descriptors.sort_by(|a, b| a.key.display_name().cmp(b.key.display_name()));
        descriptors
    }

    /// Checks every registered key's dependency graph without constructing
    /// anything.
    pub fn validate(&self) -> ValidationReport {
        validation::validate_registry(self)
    }

    /// Static walk from `key`, remembered once clean. Bindings are never
    /// replaced, so a clean graph stays clean.
    pub(crate) fn verify(&self, key: Key) -> DiResult<()> {
        if self.verified.lock().contains(&key) {
            return Ok(());
        }
        validation::verify(self, key)?;
        self.verified.lock().insert(key);
        Ok(())
    }

    /// Wraps the registry in an `Arc` and creates its root scope.
    pub fn build(self) -> Scope {
        Scope::root(Arc::new(self))
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Registry Debug ===\n");
        for d in self.descriptors() {
            s.push_str(&format!(
                "  {} -> {} ({}), {} constructor(s)\n",
                d.key, d.implementation, d.lifetime, d.constructor_count
            ));
        }
        s
    }
}
