//! Construction contract for implementation types.
//!
//! Rust has no runtime constructor reflection, so every implementation type
//! states its constructors up front: the ordered dependency keys and a body
//! that builds the value from the resolved dependencies. The typed helpers
//! (`with0`..`with4`, `try_with0`..`try_with4`) derive the keys from the
//! constructor's own signature.
//!
//! # Examples
//!
//! ```rust
//! use tiny_di::{Component, Constructor, Lifetime, Registry, Resolver};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 { 42 }
//! }
//! impl Component for FixedClock {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::with0(|| FixedClock)]
//!     }
//! }
//!
//! struct Scheduler {
//!     clock: Arc<dyn Clock>,
//! }
//! impl Scheduler {
//!     fn new(clock: Arc<dyn Clock>) -> Self {
//!         Scheduler { clock }
//!     }
//! }
//! impl Component for Scheduler {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::with1(Scheduler::new)]
//!     }
//! }
//!
//! let registry = Registry::new();
//! registry
//!     .add_singleton_as::<dyn Clock, FixedClock>(|c| c as Arc<dyn Clock>)
//!     .add_transient::<Scheduler>();
//!
//! let root = registry.build();
//! assert_eq!(root.get_required::<Scheduler>().clock.now(), 42);
//! ```

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::{Instance, Params};

/// Boxed error a constructor body may fail with.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Body<T> = dyn Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync;

/// A type the container knows how to build.
pub trait Component: Send + Sync + Sized + 'static {
    /// Every constructor the type exposes.
    ///
    /// Resolution refuses to guess: more than one constructor with
    /// dependencies is an error, see [`crate::DiError::AmbiguousConstructor`].
    fn constructors() -> Vec<Constructor<Self>>;
}

/// One way of building a `T` from resolved dependencies.
pub struct Constructor<T> {
    pub(crate) parameters: Params,
    pub(crate) body: Arc<Body<T>>,
}

impl<T> Constructor<T>
where
    T: Send + Sync + 'static,
{
    /// Explicit form: ordered dependency keys plus a body reading them, in
    /// the same order, from [`Arguments`].
    pub fn from_parts<F>(parameters: Vec<Key>, body: F) -> Self
    where
        F: Fn(&mut Arguments) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Constructor {
            parameters: SmallVec::from_vec(parameters),
            body: Arc::new(body),
        }
    }

    /// Dependency keys in parameter order.
    pub fn parameters(&self) -> &[Key] {
        &self.parameters
    }
}

macro_rules! constructor_arity {
    ($with:ident, $try_with:ident; $($p:ident),*) => {
        impl<T> Constructor<T>
        where
            T: Send + Sync + 'static,
        {
            /// Wraps an infallible constructor; parameter keys come from its signature.
            pub fn $with<$($p,)* F>(f: F) -> Self
            where
                $($p: ?Sized + Send + Sync + 'static,)*
                F: Fn($(Arc<$p>),*) -> T + Send + Sync + 'static,
            {
                Self::from_parts(vec![$(Key::of::<$p>()),*], move |_args| {
                    Ok(f($(_args.next::<$p>()?),*))
                })
            }

            /// Wraps a fallible constructor; its error becomes an instantiation failure.
            pub fn $try_with<$($p,)* F, E>(f: F) -> Self
            where
                $($p: ?Sized + Send + Sync + 'static,)*
                F: Fn($(Arc<$p>),*) -> Result<T, E> + Send + Sync + 'static,
                E: Into<BoxError>,
            {
                Self::from_parts(vec![$(Key::of::<$p>()),*], move |_args| {
                    f($(_args.next::<$p>()?),*).map_err(Into::into)
                })
            }
        }
    };
}

constructor_arity!(with0, try_with0;);
constructor_arity!(with1, try_with1; P1);
constructor_arity!(with2, try_with2; P1, P2);
constructor_arity!(with3, try_with3; P1, P2, P3);
constructor_arity!(with4, try_with4; P1, P2, P3, P4);

/// Resolved constructor parameters, consumed in declaration order.
pub struct Arguments {
    values: std::vec::IntoIter<Instance>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Instance>) -> Self {
        Arguments {
            values: values.into_iter(),
        }
    }

    /// Takes the next parameter as an `Arc<S>`.
    pub fn next<S: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<S>> {
        self.values
            .next()
            .and_then(|instance| instance.downcast::<S>())
            .ok_or(DiError::TypeMismatch(std::any::type_name::<S>()))
    }

    /// Parameters not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}
