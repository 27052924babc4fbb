//! Per-scope instance storage for singleton and scoped bindings.
//!
//! Each key owns a `OnceCell`. The map lock is held only long enough to find
//! or create the cell; construction then runs under the cell's own
//! initialisation guard, so concurrent first-time resolutions of one key
//! build exactly one instance and every caller receives it, while
//! resolutions of other keys proceed in parallel.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::DiResult;
use crate::key::Key;
use crate::registration::Instance;
use crate::Map;

type Cell = Arc<OnceCell<Instance>>;

#[derive(Default)]
pub(crate) struct LifetimeCache {
    cells: Mutex<Map<Key, Cell>>,
}

impl LifetimeCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Cached instance for `key`, if construction already completed.
    pub(crate) fn get(&self, key: &Key) -> Option<Instance> {
        let cell = self.cells.lock().get(key).cloned()?;
        cell.get().cloned()
    }

    /// Compute-if-absent. A failed `init` leaves the slot empty so a later
    /// call can retry.
    pub(crate) fn get_or_try_init<F>(&self, key: &Key, init: F) -> DiResult<Instance>
    where
        F: FnOnce() -> DiResult<Instance>,
    {
        let cell = {
            let mut cells = self.cells.lock();
            cells.entry(*key).or_default().clone()
        };
        cell.get_or_try_init(init).cloned()
    }

    /// Number of keys with a constructed instance.
    pub(crate) fn len(&self) -> usize {
        self.cells.lock().values().filter(|cell| cell.get().is_some()).count()
    }
}
