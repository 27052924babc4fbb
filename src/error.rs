//! Error types for the dependency injection container.

use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

use crate::key::Key;

/// Dependency injection errors
///
/// Every variant is local to the `resolve` call that produced it: the
/// registry and all caches stay usable after a failure.
///
/// # Examples
///
/// ```rust
/// use tiny_di::{DiError, Key, Registry, Resolver};
///
/// let root = Registry::new().build();
/// match root.get::<String>() {
///     Err(DiError::Unregistered(key)) => {
///         assert_eq!(key, Key::of::<String>());
///         assert_eq!(key.display_name(), "alloc::string::String");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Service not registered
    #[error("Service not registered: {0}")]
    Unregistered(Key),
    /// Implementation does not expose exactly one eligible constructor
    #[error("Ambiguous constructor for {implementation}: expected exactly one eligible constructor, found {candidates}")]
    AmbiguousConstructor {
        implementation: Key,
        candidates: usize,
    },
    /// Circular dependency detected (path ends with the repeated key)
    #[error("Circular dependency: {}", format_path(.0))]
    Circular(Vec<Key>),
    /// The constructor body itself failed
    #[error("Failed to instantiate {implementation}: {source}")]
    Instantiation {
        implementation: Key,
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
    /// A singleton's dependency graph reaches a scoped service
    #[error("Lifetime error: singleton {singleton} depends on scoped {scoped}")]
    WrongLifetime { singleton: Key, scoped: Key },
    /// Container options could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl DiError {
    /// True for errors caused by how services were registered rather than by
    /// a constructor failing at runtime.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, DiError::Instantiation { .. })
    }
}

fn format_path(path: &[Key]) -> String {
    path.iter()
        .map(Key::display_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Result type for DI operations
pub type DiResult<T> = Result<T, DiError>;

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn circular_message_lists_path() {
        let err = DiError::Circular(vec![Key::of::<A>(), Key::of::<B>(), Key::of::<A>()]);
        let msg = err.to_string();
        assert!(msg.starts_with("Circular dependency: "));
        assert_eq!(msg.matches(" -> ").count(), 2);
    }

    #[test]
    fn instantiation_exposes_source() {
        let cause: Box<dyn StdError + Send + Sync> = "disk on fire".into();
        let err = DiError::Instantiation {
            implementation: Key::of::<A>(),
            source: Arc::from(cause),
        };
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("disk on fire"));
        assert!(!err.is_configuration_error());
        assert!(DiError::Unregistered(Key::of::<B>()).is_configuration_error());
    }
}
