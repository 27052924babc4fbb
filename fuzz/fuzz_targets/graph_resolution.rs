#![no_main]

//! Registers a random dependency graph (cycles, missing nodes and ambiguous
//! constructors included) and checks that every resolution terminates with
//! either an instance or a typed error.

use std::cell::RefCell;

use libfuzzer_sys::fuzz_target;
use tiny_di::{Component, Constructor, DiError, Key, Lifetime, Registry, Resolver};

const NODES: usize = 6;

thread_local! {
    // edges[i] = dependencies of Node<i>; ctors[i] = constructor count
    static GRAPH: RefCell<([Vec<usize>; NODES], [u8; NODES])> = RefCell::new(Default::default());
}

struct Node<const I: usize>;

fn node_key(index: usize) -> Key {
    match index {
        0 => Key::of::<Node<0>>(),
        1 => Key::of::<Node<1>>(),
        2 => Key::of::<Node<2>>(),
        3 => Key::of::<Node<3>>(),
        4 => Key::of::<Node<4>>(),
        _ => Key::of::<Node<5>>(),
    }
}

impl<const I: usize> Component for Node<I> {
    fn constructors() -> Vec<Constructor<Self>> {
        GRAPH.with(|graph| {
            let graph = graph.borrow();
            let parameters: Vec<Key> = graph.0[I].iter().map(|&j| node_key(j)).collect();
            (0..graph.1[I].max(1))
                .map(|_| Constructor::from_parts(parameters.clone(), |_| Ok(Node::<I>)))
                .collect()
        })
    }
}

fn register(registry: &Registry, index: usize, lifetime: Lifetime) {
    match index {
        0 => registry.register_self::<Node<0>>(lifetime),
        1 => registry.register_self::<Node<1>>(lifetime),
        2 => registry.register_self::<Node<2>>(lifetime),
        3 => registry.register_self::<Node<3>>(lifetime),
        4 => registry.register_self::<Node<4>>(lifetime),
        _ => registry.register_self::<Node<5>>(lifetime),
    };
}

fn resolve(scope: &tiny_di::Scope, index: usize) -> Result<(), DiError> {
    match index {
        0 => scope.get::<Node<0>>().map(drop),
        1 => scope.get::<Node<1>>().map(drop),
        2 => scope.get::<Node<2>>().map(drop),
        3 => scope.get::<Node<3>>().map(drop),
        4 => scope.get::<Node<4>>().map(drop),
        _ => scope.get::<Node<5>>().map(drop),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < NODES * 3 {
        return;
    }

    let mut edges: [Vec<usize>; NODES] = Default::default();
    let mut ctors = [1u8; NODES];
    for i in 0..NODES {
        let mask = data[i];
        edges[i] = (0..NODES).filter(|j| mask & (1 << j) != 0).collect();
        // rare ambiguity
        ctors[i] = if data[NODES + i] % 16 == 0 { 2 } else { 1 };
    }
    GRAPH.with(|graph| *graph.borrow_mut() = (edges, ctors));

    let registry = Registry::new();
    for i in 0..NODES {
        let flags = data[2 * NODES + i];
        if flags % 7 == 0 {
            // left unregistered
            continue;
        }
        let lifetime = match flags % 3 {
            0 => Lifetime::Transient,
            1 => Lifetime::Singleton,
            _ => Lifetime::Scoped,
        };
        register(&registry, i, lifetime);
    }

    let report = registry.validate();
    let root = registry.build();
    let scope = root.create_scope();

    for i in 0..NODES {
        match resolve(&scope, i) {
            Ok(()) => {}
            Err(DiError::Unregistered(key)) if key == node_key(i) => {}
            Err(DiError::Unregistered(_))
            | Err(DiError::Circular(_))
            | Err(DiError::AmbiguousConstructor { .. }) => {
                assert!(!report.is_valid());
            }
            Err(other) => panic!("unexpected error kind: {}", other),
        }
    }
});
