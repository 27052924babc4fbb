/// Property-based tests for registration and lifetime invariants
///
/// These tests use proptest to generate random registration sequences and
/// scope layouts and verify invariants that should hold for all of them.
use proptest::prelude::*;
use std::sync::Arc;

use tiny_di::{Component, Constructor, Key, Lifetime, Registry, Resolver};

trait Slot: Send + Sync {
    fn tag(&self) -> u8;
}

macro_rules! slot_impl {
    ($name:ident, $tag:expr) => {
        struct $name;
        impl Slot for $name {
            fn tag(&self) -> u8 {
                $tag
            }
        }
        impl Component for $name {
            fn constructors() -> Vec<Constructor<Self>> {
                vec![Constructor::with0(|| $name)]
            }
        }
    };
}

slot_impl!(Slot0, 0);
slot_impl!(Slot1, 1);
slot_impl!(Slot2, 2);

fn lifetime_strategy() -> impl Strategy<Value = Lifetime> {
    prop_oneof![
        Just(Lifetime::Transient),
        Just(Lifetime::Singleton),
        Just(Lifetime::Scoped),
    ]
}

fn register(registry: &Registry, which: u8, lifetime: Lifetime) -> bool {
    match which {
        0 => registry.register::<dyn Slot, Slot0, _>(lifetime, |s| s as Arc<dyn Slot>),
        1 => registry.register::<dyn Slot, Slot1, _>(lifetime, |s| s as Arc<dyn Slot>),
        _ => registry.register::<dyn Slot, Slot2, _>(lifetime, |s| s as Arc<dyn Slot>),
    }
}

fn implementation_key(which: u8) -> Key {
    match which {
        0 => Key::of::<Slot0>(),
        1 => Key::of::<Slot1>(),
        _ => Key::of::<Slot2>(),
    }
}

// Property: whatever follows, the first registration of a key is the one kept
proptest! {
    #[test]
    fn first_registration_wins(
        registrations in prop::collection::vec((0u8..3, lifetime_strategy()), 1..12)
    ) {
        let registry = Registry::new();
        let accepted: Vec<bool> = registrations
            .iter()
            .map(|(which, lifetime)| register(&registry, *which, *lifetime))
            .collect();

        prop_assert!(accepted[0]);
        prop_assert!(accepted[1..].iter().all(|a| !a));
        prop_assert_eq!(registry.len(), 1);

        let (first_impl, first_lifetime) = registrations[0];
        let binding = registry.lookup(&Key::of::<dyn Slot>()).unwrap();
        prop_assert_eq!(binding.implementation(), implementation_key(first_impl));
        prop_assert_eq!(binding.lifetime(), first_lifetime);

        let root = registry.build();
        prop_assert_eq!(root.get_required::<dyn Slot>().tag(), first_impl);
    }
}

// Property: instance identity follows the lifetime for any number of scopes
proptest! {
    #[test]
    fn identity_follows_lifetime(lifetime in lifetime_strategy(), scopes in 1usize..6) {
        let registry = Registry::new();
        register(&registry, 0, lifetime);
        let root = registry.build();

        let children: Vec<_> = (0..scopes).map(|_| root.create_scope()).collect();
        let pairs: Vec<_> = children
            .iter()
            .map(|scope| (scope.get_required::<dyn Slot>(), scope.get_required::<dyn Slot>()))
            .collect();

        for (i, (a, b)) in pairs.iter().enumerate() {
            // same scope, twice
            prop_assert_eq!(Arc::ptr_eq(a, b), lifetime.is_cached());
            for (c, _) in &pairs[i + 1..] {
                // across scopes only singletons are shared
                prop_assert_eq!(Arc::ptr_eq(a, c), lifetime == Lifetime::Singleton);
            }
        }
    }
}

// Property: registering distinct keys keeps every one of them resolvable
proptest! {
    #[test]
    fn independent_keys_do_not_interfere(
        lifetimes in prop::collection::vec(lifetime_strategy(), 3)
    ) {
        let registry = Registry::new();
        registry.register_self::<Slot0>(lifetimes[0]);
        registry.register_self::<Slot1>(lifetimes[1]);
        registry.register_self::<Slot2>(lifetimes[2]);
        prop_assert_eq!(registry.len(), 3);
        prop_assert!(registry.validate().is_valid());

        let scope = registry.build().create_scope();
        prop_assert_eq!(scope.get_required::<Slot0>().tag(), 0);
        prop_assert_eq!(scope.get_required::<Slot1>().tag(), 1);
        prop_assert_eq!(scope.get_required::<Slot2>().tag(), 2);
    }
}
