//! Static checks over the registered dependency graph.
//!
//! The same depth-first walk serves two callers:
//!
//! - [`Registry::validate`] walks every registered key and collects all
//!   problems into a [`ValidationReport`] without constructing anything.
//! - The resolver walks a key's graph once before its first construction.
//!   Singleton and scoped instances are built under a per-key initialisation
//!   guard, so a cycle whose halves were entered on two different threads
//!   would block both threads forever instead of reaching the per-call
//!   cycle check. Walking first turns such a configuration into a
//!   `Circular` error up front.
//!
//! Validation rules:
//!
//! - **Missing dependencies**: error, `Unregistered`
//! - **Constructor selection**: error, `AmbiguousConstructor`
//! - **Cycles**: error, `Circular`
//! - **Singleton reaching Scoped**: warning, or `WrongLifetime` error when
//!   [`ContainerOptions::reject_captive_dependencies`] is set
//!
//! [`ContainerOptions::reject_captive_dependencies`]: crate::ContainerOptions

use std::fmt;

use crate::error::{DiError, DiResult};
use crate::internal::ResolutionPath;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registry::Registry;
use crate::Set;

/// Non-fatal configuration findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A singleton's graph reaches a scoped binding, so the singleton keeps
    /// whichever scoped instance it saw first alive for the whole container.
    CaptiveDependency { singleton: Key, scoped: Key },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::CaptiveDependency { singleton, scoped } => {
                write!(f, "singleton {} captures scoped {}", singleton, scoped)
            }
        }
    }
}

/// Result of [`Registry::validate`].
///
/// # Examples
///
/// ```rust
/// use tiny_di::{Component, Constructor, DiError, Registry};
/// use std::sync::Arc;
///
/// struct Missing;
/// struct Needy;
/// impl Component for Needy {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::with1(|_: Arc<Missing>| Needy)]
///     }
/// }
///
/// let registry = Registry::new();
/// registry.add_transient::<Needy>();
///
/// let report = registry.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(report.errors[0], DiError::Unregistered(_)));
/// ```
#[derive(Debug, Default)]
pub struct ValidationReport {
    /// One entry per failing registered key.
    pub errors: Vec<DiError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )?;
        for error in &self.errors {
            writeln!(f, "  error: {}", error)?;
        }
        for warning in &self.warnings {
            writeln!(f, "  warning: {}", warning)?;
        }
        Ok(())
    }
}

struct Walker<'a> {
    registry: &'a Registry,
    path: ResolutionPath,
    reject_captive: bool,
    // (key, reached from a singleton); captives are named after the first owner
    done: Set<(Key, bool)>,
    captives: Vec<ValidationWarning>,
}

impl<'a> Walker<'a> {
    fn new(registry: &'a Registry) -> Self {
        let options = registry.options();
        Walker {
            registry,
            path: ResolutionPath::new(options.max_depth),
            reject_captive: options.reject_captive_dependencies,
            done: Set::default(),
            captives: Vec::new(),
        }
    }

    fn visit(&mut self, key: Key, owner: Option<Key>) -> DiResult<()> {
        self.path.enter(key)?;
        let binding = self
            .registry
            .lookup(&key)
            .ok_or(DiError::Unregistered(key))?;

        if let (Some(singleton), Lifetime::Scoped) = (owner, binding.lifetime()) {
            if self.reject_captive {
                return Err(DiError::WrongLifetime {
                    singleton,
                    scoped: key,
                });
            }
            let warning = ValidationWarning::CaptiveDependency {
                singleton,
                scoped: key,
            };
            if !self.captives.contains(&warning) {
                self.captives.push(warning);
            }
        }

        let owner = match (owner, binding.lifetime()) {
            (None, Lifetime::Singleton) => Some(key),
            (owner, _) => owner,
        };
        let memo = (key, owner.is_some());
        if !self.done.contains(&memo) {
            for dependency in binding.dependencies()? {
                self.visit(*dependency, owner)?;
            }
            self.done.insert(memo);
        }

        self.path.leave();
        Ok(())
    }
}

/// Walks the graph reachable from `key` and reports its first problem.
pub(crate) fn verify(registry: &Registry, key: Key) -> DiResult<()> {
    Walker::new(registry).visit(key, None)
}

pub(crate) fn validate_registry(registry: &Registry) -> ValidationReport {
    let mut keys = registry.keys();
    keys.sort_by(|a, b| a.display_name().cmp(b.display_name()));

    let mut report = ValidationReport::default();
    let mut cycles: Vec<Vec<Key>> = Vec::new();
    for key in keys {
        let mut walker = Walker::new(registry);
        match walker.visit(key, None) {
            Err(DiError::Circular(path)) => {
                let members = cycle_members(&path);
                if !cycles.contains(&members) {
                    cycles.push(members);
                    report.errors.push(DiError::Circular(path));
                }
            }
            Err(error) => report.errors.push(error),
            Ok(()) => {}
        }
        for warning in walker.captives {
            if !report.warnings.contains(&warning) {
                report.warnings.push(warning);
            }
        }
    }
    report
}

// Sorted keys of the loop itself, ignoring the path leading into it.
fn cycle_members(path: &[Key]) -> Vec<Key> {
    let start = match path.last() {
        Some(repeated) => path.iter().position(|k| k == repeated).unwrap_or(0),
        None => 0,
    };
    let mut members = path[start..].to_vec();
    members.sort();
    members.dedup();
    members
}
