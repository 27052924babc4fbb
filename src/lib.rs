//! # tiny-di
//!
//! A small inversion-of-control container: a registry mapping service keys to
//! construction bindings, and a resolver that builds fully wired object graphs
//! on demand.
//!
//! ## Features
//!
//! - **Three lifetimes**: Transient, Singleton and Scoped
//! - **Interface bindings**: resolve `dyn Trait` keys to concrete implementations
//! - **Thread-safe**: concurrent first-time resolution builds each singleton exactly once
//! - **Circular dependency detection**: cycles fail fast with the offending path
//! - **Flat scopes**: every child scope shares the root's singletons and owns its scoped cache
//!
//! ## Quick Start
//!
//! ```rust
//! use tiny_di::{Component, Constructor, Registry, Resolver};
//! use std::sync::Arc;
//!
//! trait Repository: Send + Sync {
//!     fn find(&self, id: u32) -> String;
//! }
//!
//! struct Database;
//! impl Component for Database {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::with0(|| Database)]
//!     }
//! }
//!
//! struct UserRepository {
//!     _db: Arc<Database>,
//! }
//! impl Repository for UserRepository {
//!     fn find(&self, id: u32) -> String {
//!         format!("user-{}", id)
//!     }
//! }
//! impl Component for UserRepository {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::with1(|db: Arc<Database>| UserRepository { _db: db })]
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry
//!     .add_singleton::<Database>()
//!     .add_scoped_as::<dyn Repository, UserRepository>(|r| r as Arc<dyn Repository>);
//!
//! let root = registry.build();
//! let request = root.create_scope();
//! let repo = request.get_required::<dyn Repository>();
//! assert_eq!(repo.find(7), "user-7");
//! ```
//!
//! ## Service Lifetimes
//!
//! - **Singleton**: Created once per root and shared by every scope
//! - **Scoped**: Created once per scope
//! - **Transient**: Created fresh on every resolution
//!
//! ## Errors
//!
//! Resolution never panics (except through [`Resolver::get_required`]) and
//! never poisons the container: a failed `get` leaves the registry and every
//! cache usable. See [`DiError`] for the failure kinds.

pub mod component;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod provider;
pub mod registry;
pub mod traits;
pub mod validation;

mod cache;
mod internal;
mod registration;

pub use component::{Arguments, BoxError, Component, Constructor};
pub use config::ContainerOptions;
pub use descriptors::ServiceDescriptor;
pub use error::{DiError, DiResult};
pub use key::{key_of_type, Key};
pub use lifetime::Lifetime;
pub use provider::Scope;
pub use registration::{Binding, Instance};
pub use registry::Registry;
pub use traits::{Resolver, ResolverCore};
pub use validation::{ValidationReport, ValidationWarning};

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V, ahash::RandomState>;
#[cfg(feature = "ahash")]
pub(crate) type Set<K> = std::collections::HashSet<K, ahash::RandomState>;

#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Set<K> = std::collections::HashSet<K>;
