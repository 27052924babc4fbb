//! Service resolution.
//!
//! Resolution is recursive: a binding's constructor parameters are resolved
//! in the same scope, left to right, before the constructor runs. The keys
//! under construction are carried in an explicit [`ResolutionPath`]; a key
//! that shows up twice on it is a cycle and fails the whole call.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::cache::LifetimeCache;
use crate::error::{DiError, DiResult};
use crate::internal::ResolutionPath;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{Binding, Instance};

mod scope;

pub use scope::Scope;

impl Scope {
    pub(crate) fn resolve_root(&self, key: Key) -> DiResult<Instance> {
        trace!(key = %key, "Resolving service");
        let result = self.resolve_top(key);
        if let Err(error) = &result {
            debug!(key = %key, error = %error, "Resolution failed");
        }
        result
    }

    fn resolve_top(&self, key: Key) -> DiResult<Instance> {
        let binding = self.lookup(key)?;
        if let Some(hit) = self.cached(key, &binding) {
            return Ok(hit);
        }

        // graph problems surface here, before any cache cell blocks
        self.registry.verify(key)?;

        let mut path = ResolutionPath::new(self.options().max_depth);
        path.enter(key)?;
        self.resolve_binding(key, &binding, &mut path)
    }

    fn lookup(&self, key: Key) -> DiResult<Binding> {
        self.registry.lookup(&key).ok_or(DiError::Unregistered(key))
    }

    fn cache_for(&self, lifetime: Lifetime) -> Option<&Arc<LifetimeCache>> {
        match lifetime {
            Lifetime::Transient => None,
            Lifetime::Singleton => Some(&self.singletons),
            Lifetime::Scoped => Some(&self.scoped),
        }
    }

    fn cached(&self, key: Key, binding: &Binding) -> Option<Instance> {
        let hit = self.cache_for(binding.lifetime())?.get(&key)?;
        trace!(key = %key, lifetime = %binding.lifetime(), "Cache hit");
        Some(hit)
    }

    fn resolve_key(&self, key: Key, path: &mut ResolutionPath) -> DiResult<Instance> {
        let binding = self.lookup(key)?;
        if let Some(hit) = self.cached(key, &binding) {
            return Ok(hit);
        }
        self.resolve_binding(key, &binding, path)
    }

    /// Cache keys are the requested key, never the implementation key.
    fn resolve_binding(
        &self,
        key: Key,
        binding: &Binding,
        path: &mut ResolutionPath,
    ) -> DiResult<Instance> {
        match self.cache_for(binding.lifetime()) {
            None => self.construct(key, binding, path),
            Some(cache) => cache.get_or_try_init(&key, || self.construct(key, binding, path)),
        }
    }

    fn construct(
        &self,
        key: Key,
        binding: &Binding,
        path: &mut ResolutionPath,
    ) -> DiResult<Instance> {
        let constructor = binding.select_constructor()?;

        let mut values = Vec::with_capacity(constructor.parameters.len());
        for dependency in constructor.parameters.iter().copied() {
            path.enter(dependency)?;
            values.push(self.resolve_key(dependency, path)?);
            path.leave();
        }

        trace!(
            key = %key,
            implementation = %binding.implementation(),
            lifetime = %binding.lifetime(),
            "Constructing service"
        );
        constructor
            .invoke(values)
            .map_err(|source| DiError::Instantiation {
                implementation: binding.implementation(),
                source: Arc::from(source),
            })
    }
}
