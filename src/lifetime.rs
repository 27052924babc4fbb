//! Service lifetime definitions.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Service lifetimes controlling instance caching behavior
///
/// The lifetime is a plain tag: the resolver branches on it to decide which
/// cache (if any) an instance is read from and written to.
///
/// # Examples
///
/// ```rust
/// use tiny_di::{Component, Constructor, Lifetime, Registry, Resolver};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Component for Database {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with0(|| Database)]
///     }
/// }
///
/// let registry = Registry::new();
/// registry.register_self::<Database>(Lifetime::Singleton);
///
/// let root = registry.build();
/// let scope = root.create_scope();
///
/// // Singleton: same instance across scopes
/// let a = root.get_required::<Database>();
/// let b = scope.get_required::<Database>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum Lifetime {
    /// New instance per resolution, never cached
    Transient,
    /// Single instance per root scope, cached in the root's cache and shared
    /// by every scope created from that root.
    Singleton,
    /// Single instance per scope, cached for the scope's lifetime.
    ///
    /// Resolving a scoped service from the root scope caches it in the root
    /// cache, which makes it behave like a singleton for the root.
    Scoped,
}

impl Lifetime {
    /// Whether instances with this lifetime are cached at all.
    pub fn is_cached(self) -> bool {
        !matches!(self, Lifetime::Transient)
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifetime::Transient => "transient",
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
        };
        f.write_str(name)
    }
}
