/// Types registered at link time through the distributed slice

mod common;

use common::source_tree;
use ferrous_ioc::{Container, Inject, Resolver, TypeDescriptor, TypeSystem, MANAGED_TYPES};
use linkme::distributed_slice;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Clock;

#[derive(Default)]
struct Scheduler {
    clock: Inject<Clock>,
    started: AtomicBool,
}

#[distributed_slice(MANAGED_TYPES)]
fn clock() -> TypeDescriptor {
    TypeDescriptor::managed::<Clock>("linked::clock").default_constructor().build()
}

#[distributed_slice(MANAGED_TYPES)]
fn scheduler() -> TypeDescriptor {
    TypeDescriptor::managed::<Scheduler>("linked::scheduler")
        .default_constructor()
        .inject::<Clock>("clock", |s| &s.clock)
        .method("init", |s| s.started.store(true, Ordering::SeqCst))
        .build()
}

#[test]
fn test_linked_type_system_contains_registrations() {
    let types = TypeSystem::linked();
    assert!(types.load("linked::clock").is_some());
    assert!(types.load("linked::scheduler").is_some());
}

#[test]
fn test_linked_container_wires_registered_types() {
    let (_dir, root) = source_tree(&["linked::clock", "linked::scheduler"]);
    let handle = Container::linked().start(&root).unwrap();

    let scheduler = handle.resolve::<Scheduler>().unwrap();
    assert!(scheduler.started.load(Ordering::SeqCst));
    assert!(Arc::ptr_eq(scheduler.clock.get(), &handle.resolve::<Clock>().unwrap()));
}
