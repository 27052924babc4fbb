/// Error behaviour of DiError and of resolutions that fail at different depths.
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tiny_di::{Component, Constructor, ContainerOptions, DiError, DiResult, Key, Registry, Resolver};

#[derive(Debug)]
struct ConnectionRefused;

impl fmt::Display for ConnectionRefused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("connection refused")
    }
}

impl Error for ConnectionRefused {}

#[test]
fn test_error_display_unregistered() {
    let error = DiError::Unregistered(Key::of::<String>());
    assert_eq!(error.to_string(), "Service not registered: alloc::string::String");
}

#[test]
fn test_error_display_type_mismatch() {
    let error = DiError::TypeMismatch("std::string::String");
    assert_eq!(error.to_string(), "Type mismatch for: std::string::String");
}

#[test]
fn test_error_display_circular() {
    let error = DiError::Circular(vec![Key::of::<u8>(), Key::of::<u16>(), Key::of::<u8>()]);
    assert_eq!(error.to_string(), "Circular dependency: u8 -> u16 -> u8");
}

#[test]
fn test_error_display_depth_exceeded() {
    let error = DiError::DepthExceeded(100);
    assert_eq!(error.to_string(), "Max depth 100 exceeded");
}

#[test]
fn test_error_display_ambiguous() {
    let error = DiError::AmbiguousConstructor {
        implementation: Key::of::<u32>(),
        candidates: 2,
    };
    let message = error.to_string();
    assert!(message.contains("u32"));
    assert!(message.contains("found 2"));
}

#[test]
fn test_di_result_alias() {
    fn ok() -> DiResult<u8> {
        Ok(1)
    }
    fn fail() -> DiResult<u8> {
        Err(DiError::DepthExceeded(1))
    }
    assert_eq!(ok().unwrap(), 1);
    assert!(fail().is_err());
}

#[test]
fn test_ambiguous_constructor_is_rejected() {
    struct Dep1;
    struct Dep2;
    impl Component for Dep1 {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with0(|| Dep1)]
        }
    }
    impl Component for Dep2 {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with0(|| Dep2)]
        }
    }

    struct Torn;
    impl Component for Torn {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![
                Constructor::with1(|_: Arc<Dep1>| Torn),
                Constructor::with1(|_: Arc<Dep2>| Torn),
            ]
        }
    }

    let registry = Registry::new();
    registry
        .add_transient::<Dep1>()
        .add_transient::<Dep2>()
        .add_transient::<Torn>();
    let root = registry.build();

    match root.get::<Torn>() {
        Err(DiError::AmbiguousConstructor {
            implementation,
            candidates,
        }) => {
            assert_eq!(implementation, Key::of::<Torn>());
            assert_eq!(candidates, 2);
        }
        other => panic!("expected ambiguous constructor, got {:?}", other.err()),
    }
}

#[test]
fn test_two_parameterless_constructors_are_ambiguous() {
    struct Twice;
    impl Component for Twice {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with0(|| Twice), Constructor::with0(|| Twice)]
        }
    }

    let registry = Registry::new();
    registry.add_singleton::<Twice>();
    let root = registry.build();
    assert!(matches!(
        root.get::<Twice>(),
        Err(DiError::AmbiguousConstructor { candidates: 2, .. })
    ));
}

#[test]
fn test_instantiation_failure_wraps_cause() {
    struct Pool;
    impl Component for Pool {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::try_with0(|| Err::<Pool, _>(ConnectionRefused))]
        }
    }

    let registry = Registry::new();
    registry.add_singleton::<Pool>();
    let root = registry.build();

    let err = root.get::<Pool>().err().unwrap();
    assert!(!err.is_configuration_error());
    match &err {
        DiError::Instantiation { implementation, .. } => {
            assert_eq!(*implementation, Key::of::<Pool>())
        }
        other => panic!("expected instantiation error, got {}", other),
    }
    assert_eq!(err.source().unwrap().to_string(), "connection refused");
    assert!(err.to_string().ends_with("connection refused"));
}

#[test]
fn test_failed_singleton_can_be_retried() {
    static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);

    struct Flaky;
    impl Component for Flaky {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::try_with0(|| {
                if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(ConnectionRefused)
                } else {
                    Ok(Flaky)
                }
            })]
        }
    }

    let registry = Registry::new();
    registry.add_singleton::<Flaky>();
    let root = registry.build();

    assert!(root.get::<Flaky>().is_err());
    let first = root.get::<Flaky>().unwrap();
    let second = root.get::<Flaky>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
}

#[test]
fn test_built_dependency_stays_cached_after_dependent_fails() {
    static X_BUILT: AtomicUsize = AtomicUsize::new(0);

    struct Healthy;
    impl Component for Healthy {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with0(|| {
                X_BUILT.fetch_add(1, Ordering::SeqCst);
                Healthy
            })]
        }
    }

    struct Broken;
    impl Component for Broken {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::try_with1(|_: Arc<Healthy>| Err::<Broken, _>("disk full"))]
        }
    }

    let registry = Registry::new();
    registry.add_singleton::<Healthy>().add_singleton::<Broken>();
    let root = registry.build();
    let scope = root.create_scope();

    assert!(matches!(scope.get::<Broken>(), Err(DiError::Instantiation { .. })));
    assert_eq!(X_BUILT.load(Ordering::SeqCst), 1);
    assert_eq!(root.cached_count(), 1);

    let _ = scope.get_required::<Healthy>();
    assert_eq!(X_BUILT.load(Ordering::SeqCst), 1);
}

#[test]
fn test_captive_dependency_rejected_when_configured() {
    struct PerRequest;
    impl Component for PerRequest {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with0(|| PerRequest)]
        }
    }
    struct Cache;
    impl Component for Cache {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::with1(|_: Arc<PerRequest>| Cache)]
        }
    }

    let lenient = Registry::new();
    lenient.add_scoped::<PerRequest>().add_singleton::<Cache>();
    assert!(lenient.build().create_scope().get::<Cache>().is_ok());

    let options = ContainerOptions::default().with_reject_captive_dependencies(true);
    let strict = Registry::with_options(options);
    strict.add_scoped::<PerRequest>().add_singleton::<Cache>();
    let scope = strict.build().create_scope();
    match scope.get::<Cache>() {
        Err(DiError::WrongLifetime { singleton, scoped }) => {
            assert_eq!(singleton, Key::of::<Cache>());
            assert_eq!(scoped, Key::of::<PerRequest>());
        }
        other => panic!("expected lifetime error, got {:?}", other.err()),
    }
    assert!(scope.get::<PerRequest>().is_ok());
}

#[test]
fn test_errors_are_cloneable() {
    let original = DiError::Unregistered(Key::of::<u64>());
    let cloned = original.clone();
    assert_eq!(original.to_string(), cloned.to_string());
    assert!(cloned.is_configuration_error());
}
