//! Service key types for the dependency injection container.

use std::any::TypeId;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Key for service storage and lookup.
///
/// A key names either a concrete type (`Database`) or an abstract service
/// (`dyn Logger`). Both are identified by their `TypeId`; the type name is
/// carried along only for diagnostics and never participates in equality.
///
/// # Examples
///
/// ```rust
/// use tiny_di::Key;
///
/// trait Logger: Send + Sync {}
/// struct ConsoleLogger;
///
/// let concrete = Key::of::<ConsoleLogger>();
/// let abstract_key = Key::of::<dyn Logger>();
///
/// assert_ne!(concrete, abstract_key);
/// assert_eq!(concrete, Key::of::<ConsoleLogger>());
/// assert!(abstract_key.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Creates the key for `T`, which may be unsized (`dyn Trait`).
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Get the type or trait name for display
    ///
    /// Returns the `std::any::type_name` of the keyed type.
    pub fn display_name(&self) -> &'static str {
        self.name
    }

    /// The `TypeId` backing this key.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

// TypeId-only comparison: the name is diagnostic
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
