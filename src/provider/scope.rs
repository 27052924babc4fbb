//! Resolution contexts: the root scope and its children.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::cache::LifetimeCache;
use crate::config::ContainerOptions;
use crate::error::DiResult;
use crate::key::Key;
use crate::registration::Instance;
use crate::registry::Registry;
use crate::traits::ResolverCore;

/// Resolution context for one unit of work.
///
/// A `Scope` provides isolated storage for scoped services while sharing the
/// registry and the root's singleton storage with every other scope created
/// from the same root.
///
/// # Lifetime Behavior
///
/// - **Singleton**: Resolved and cached in the root's storage (shared across all scopes)
/// - **Scoped**: Resolved and cached within this specific scope
/// - **Transient**: Created fresh on every resolution (no caching)
///
/// In the root scope the two stores are one and the same, so a scoped
/// service resolved from the root lives as long as the root's singletons.
///
/// Cloning a `Scope` yields another handle to the same caches; the scoped
/// cache is released when its last handle is dropped.
///
/// # Examples
///
/// ```
/// use tiny_di::{Component, Constructor, Registry, Resolver};
/// use std::sync::Arc;
///
/// struct DatabaseConnection;
/// impl Component for DatabaseConnection {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with0(|| DatabaseConnection)]
///     }
/// }
///
/// struct UserService {
///     db: Arc<DatabaseConnection>,
/// }
/// impl Component for UserService {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with1(|db: Arc<DatabaseConnection>| UserService { db })]
///     }
/// }
///
/// let registry = Registry::new();
/// registry
///     .add_scoped::<DatabaseConnection>()
///     .add_transient::<UserService>();
/// let root = registry.build();
///
/// let request = root.create_scope();
/// let user1 = request.get_required::<UserService>();
/// let user2 = request.get_required::<UserService>();
/// assert!(Arc::ptr_eq(&user1.db, &user2.db));
///
/// let other = root.create_scope();
/// let user3 = other.get_required::<UserService>();
/// assert!(!Arc::ptr_eq(&user1.db, &user3.db));
/// ```
#[derive(Clone)]
pub struct Scope {
    pub(crate) registry: Arc<Registry>,
    // the root's cache; strong so singletons outlive a dropped root handle
    pub(crate) singletons: Arc<LifetimeCache>,
    pub(crate) scoped: Arc<LifetimeCache>,
}

impl Scope {
    /// Creates the root scope of `registry`.
    pub fn root(registry: Arc<Registry>) -> Self {
        let cache = Arc::new(LifetimeCache::new());
        debug!(services = registry.len(), "Created root scope");
        Scope {
            registry,
            singletons: cache.clone(),
            scoped: cache,
        }
    }

    /// Creates a child scope with an empty scoped cache.
    ///
    /// Children are always attached to the ultimate root: calling this on a
    /// child creates a sibling, never a grandchild.
    pub fn create_scope(&self) -> Self {
        debug!(from_root = self.is_root(), "Created child scope");
        Scope {
            registry: self.registry.clone(),
            singletons: self.singletons.clone(),
            scoped: Arc::new(LifetimeCache::new()),
        }
    }

    pub fn is_root(&self) -> bool {
        Arc::ptr_eq(&self.singletons, &self.scoped)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn options(&self) -> &ContainerOptions {
        self.registry.options()
    }

    /// Whether both handles resolve scoped services from the same cache.
    pub fn same_scope(&self, other: &Scope) -> bool {
        Arc::ptr_eq(&self.scoped, &other.scoped)
    }

    /// Number of instances cached by this scope itself (for the root this
    /// includes singletons).
    pub fn cached_count(&self) -> usize {
        self.scoped.len()
    }
}

impl ResolverCore for Scope {
    fn resolve_any(&self, key: &Key) -> DiResult<Instance> {
        self.resolve_root(*key)
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("is_root", &self.is_root())
            .field("services", &self.registry.len())
            .field("cached", &self.scoped.len())
            .finish()
    }
}
