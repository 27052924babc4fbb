//! Circular dependency detection infrastructure.
//!
//! The path is threaded explicitly through the recursive resolver instead of
//! living in thread-local state, so a resolution that hops threads (or two
//! resolutions interleaved on one thread) can never see each other's frames.

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::key::Key;

/// Keys currently under construction within one top-level `resolve`.
pub(crate) struct ResolutionPath {
    stack: SmallVec<[Key; 16]>,
    max_depth: usize,
}

impl ResolutionPath {
    pub(crate) fn new(max_depth: usize) -> Self {
        ResolutionPath {
            stack: SmallVec::new(),
            max_depth,
        }
    }

    /// Pushes `key`, failing if it is already being constructed.
    pub(crate) fn enter(&mut self, key: Key) -> DiResult<()> {
        // Circular detection BEFORE pushing the new key
        if self.contains(&key) {
            let mut cycle = self.stack.to_vec();
            cycle.push(key);
            return Err(DiError::Circular(cycle));
        }
        if self.stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }
        self.stack.push(key);
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        let popped = self.stack.pop();
        debug_assert!(popped.is_some(), "unbalanced resolution path");
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.stack.contains(key)
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> &[Key] {
        &self.stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;

    #[test]
    fn reentering_a_key_reports_the_cycle() {
        let mut path = ResolutionPath::new(8);
        path.enter(Key::of::<A>()).unwrap();
        path.enter(Key::of::<B>()).unwrap();

        match path.enter(Key::of::<A>()) {
            Err(DiError::Circular(cycle)) => {
                assert_eq!(cycle, vec![Key::of::<A>(), Key::of::<B>(), Key::of::<A>()]);
            }
            other => panic!("expected cycle, got {:?}", other),
        }
        // the failed enter leaves the path untouched
        assert_eq!(path.keys().len(), 2);
    }

    #[test]
    fn leave_allows_revisiting_siblings() {
        let mut path = ResolutionPath::new(8);
        path.enter(Key::of::<A>()).unwrap();
        path.enter(Key::of::<B>()).unwrap();
        path.leave();
        path.enter(Key::of::<B>()).unwrap();
        assert!(path.contains(&Key::of::<B>()));
    }

    #[test]
    fn depth_guard() {
        let mut path = ResolutionPath::new(1);
        path.enter(Key::of::<A>()).unwrap();
        assert!(matches!(path.enter(Key::of::<B>()), Err(DiError::DepthExceeded(1))));
    }
}
