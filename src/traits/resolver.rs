//! Resolver traits for service resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::Instance;

/// Core resolver trait for object-safe service resolution.
///
/// Handles lookup, lifetime caching and recursive construction. Most callers
/// want the generic [`Resolver`] methods built on top of it.
pub trait ResolverCore: Send + Sync {
    /// Resolves `key` to an instance of its bound implementation.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The service, holding an `Arc<S>` for the key's type `S`
    /// * `Err(DiError)` - Unregistered, ambiguous, circular or failed construction
    fn resolve_any(&self, key: &Key) -> DiResult<Instance>;
}

/// High-level resolver interface with generic methods for type-safe service resolution.
///
/// Implemented for every [`ResolverCore`], so any [`Scope`](crate::Scope),
/// root or child, resolves the same way.
///
/// # Examples
///
/// ```
/// use tiny_di::{Component, Constructor, Registry, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".to_string() }
/// }
/// impl Component for English {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with0(|| English)]
///     }
/// }
///
/// let registry = Registry::new();
/// registry.add_transient_as::<dyn Greeter, English>(|e| e as Arc<dyn Greeter>);
/// let root = registry.build();
///
/// let greeter = root.get::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a service by its key type, concrete or `dyn Trait`.
    fn get<T: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<T>> {
        let instance = self.resolve_any(&Key::of::<T>())?;
        instance
            .downcast::<T>()
            .ok_or(DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a service, panicking on failure.
    ///
    /// For wiring code that cannot continue without the service.
    fn get_required<T: ?Sized + Send + Sync + 'static>(&self) -> Arc<T> {
        self.get::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
