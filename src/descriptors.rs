//! Service descriptors for introspection and diagnostics.

use std::fmt;

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Binding;

/// Service descriptor for introspection and diagnostics
///
/// A snapshot of one binding: what it resolves to, for how long, and which
/// keys the selected constructor asks for.
///
/// # Examples
///
/// ```rust
/// use tiny_di::{Component, Constructor, Key, Lifetime, Registry};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Component for Database {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with0(|| Database)]
///     }
/// }
///
/// struct Repository;
/// impl Component for Repository {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with1(|_: Arc<Database>| Repository)]
///     }
/// }
///
/// let registry = Registry::new();
/// registry.add_singleton::<Database>().add_scoped::<Repository>();
///
/// let descriptors = registry.descriptors();
/// let repo = descriptors
///     .iter()
///     .find(|d| d.type_name().contains("Repository"))
///     .unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Scoped);
/// assert_eq!(repo.dependencies, Some(vec![Key::of::<Database>()]));
///
/// let singletons = descriptors.iter().filter(|d| d.lifetime == Lifetime::Singleton).count();
/// assert_eq!(singletons, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// The service key
    pub key: Key,
    /// Concrete implementation type
    pub implementation: Key,
    /// Service lifetime
    pub lifetime: Lifetime,
    /// Dependencies of the constructor resolution would use, or `None` when
    /// no single constructor is eligible
    pub dependencies: Option<Vec<Key>>,
    /// Constructors the implementation declares
    pub constructor_count: usize,
}

impl ServiceDescriptor {
    pub(crate) fn from_binding(key: Key, binding: &Binding) -> Self {
        ServiceDescriptor {
            key,
            implementation: binding.implementation(),
            lifetime: binding.lifetime(),
            dependencies: binding.dependencies().ok().map(<[Key]>::to_vec),
            constructor_count: binding.constructor_count(),
        }
    }

    /// Get the type/trait name
    ///
    /// Returns the human-readable type or trait name for this service.
    pub fn type_name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Whether the key is bound to its own type.
    pub fn is_self_binding(&self) -> bool {
        self.key == self.implementation
    }
}

impl fmt::Display for ServiceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.key, self.implementation, self.lifetime)
    }
}
