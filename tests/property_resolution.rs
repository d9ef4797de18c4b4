/// Property-based tests for instance resolution
///
/// These tests verify that lifetimes and capability selection hold for
/// arbitrary discovery layouts.

mod common;

use common::source_tree;
use ferrous_ioc::{Container, Inject, Resolver, TypeDescriptor, TypeSystem};
use proptest::prelude::*;
use std::sync::Arc;

trait Tagged: Send + Sync {
    fn tag(&self) -> usize;
}

macro_rules! tagged {
    ($($name:ident = $tag:expr),*) => {
        $(
            #[derive(Default)]
            struct $name;
            impl Tagged for $name {
                fn tag(&self) -> usize {
                    $tag
                }
            }
        )*
    };
}

tagged!(T0 = 0, T1 = 1, T2 = 2, T3 = 3);

#[derive(Default)]
struct Consumer {
    tagged: Inject<dyn Tagged>,
}

fn descriptor_for(tag: usize, module: &str) -> TypeDescriptor {
    match tag {
        0 => TypeDescriptor::managed::<T0>(module)
            .default_constructor()
            .implements::<dyn Tagged>(|t| t as Arc<dyn Tagged>)
            .build(),
        1 => TypeDescriptor::managed::<T1>(module)
            .default_constructor()
            .implements::<dyn Tagged>(|t| t as Arc<dyn Tagged>)
            .build(),
        2 => TypeDescriptor::managed::<T2>(module)
            .default_constructor()
            .implements::<dyn Tagged>(|t| t as Arc<dyn Tagged>)
            .build(),
        _ => TypeDescriptor::managed::<T3>(module)
            .default_constructor()
            .implements::<dyn Tagged>(|t| t as Arc<dyn Tagged>)
            .build(),
    }
}

// Property: the implementer discovered first (file-name order) is always chosen
proptest! {
    #[test]
    fn first_discovered_implementer_is_chosen(order in Just(vec![0usize, 1, 2, 3]).prop_shuffle()) {
        let mut types = TypeSystem::new().with(
            TypeDescriptor::managed::<Consumer>("consumer")
                .default_constructor()
                .inject_capability::<dyn Tagged>("tagged", |c| &c.tagged)
                .build(),
        );
        // Module `impl_<position>_<tag>` sorts by position.
        let mut modules = vec!["consumer".to_string()];
        for (position, tag) in order.iter().enumerate() {
            let module = format!("impl_{}_{}", position, tag);
            types.register(descriptor_for(*tag, &module));
            modules.push(module);
        }

        let module_refs: Vec<&str> = modules.iter().map(String::as_str).collect();
        let (_dir, root) = source_tree(&module_refs);
        let handle = Container::new(types).start(&root).unwrap();

        let consumer = handle.resolve::<Consumer>().unwrap();
        prop_assert_eq!(consumer.tagged.get().tag(), order[0]);
    }
}

#[derive(Default)]
struct Shared;

#[derive(Default)]
struct Fresh {
    shared: Inject<Shared>,
}

// Property: singletons are identical and prototypes distinct, however often resolved
proptest! {
    #[test]
    fn lifetimes_hold_across_lookups(lookups in 1usize..20) {
        let types = TypeSystem::new()
            .with(TypeDescriptor::managed::<Shared>("shared").default_constructor().build())
            .with(
                TypeDescriptor::managed::<Fresh>("fresh")
                    .multiple()
                    .default_constructor()
                    .inject::<Shared>("shared", |f| &f.shared)
                    .build(),
            );
        let (_dir, root) = source_tree(&["fresh", "shared"]);
        let handle = Container::new(types).start(&root).unwrap();

        let shared = handle.resolve::<Shared>().unwrap();
        let fresh: Vec<_> = (0..lookups).map(|_| handle.resolve::<Fresh>().unwrap()).collect();

        for (i, a) in fresh.iter().enumerate() {
            prop_assert!(Arc::ptr_eq(a.shared.get(), &shared));
            for b in &fresh[i + 1..] {
                prop_assert!(!Arc::ptr_eq(a, b));
            }
        }
    }
}
