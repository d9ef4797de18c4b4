//! # ferrous-ioc
//!
//! A field-injection inversion-of-control container. Managed types are found
//! by scanning a source tree, instantiated bare, wired through their marked
//! fields and finally initialized through a named hook.
//!
//! ## Features
//!
//! - **Discovery**: every module file under a source root names the types to manage
//! - **Two lifetimes**: shared singletons and per-injection prototypes
//! - **Field injection**: concrete fields, capability (trait) fields and explicit targets
//! - **Supertype fields**: embedded base values are wired too
//! - **Init hooks**: run once per instance, after the whole graph is wired
//! - **Thread-safe**: a started container is shared through a cheap handle
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{Container, Inject, Resolver, TypeDescriptor, TypeSystem};
//! use std::fs;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//!
//! trait FuelGauge: Send + Sync {
//!     fn level(&self) -> u32;
//! }
//!
//! #[derive(Default)]
//! struct AnalogGauge;
//!
//! impl FuelGauge for AnalogGauge {
//!     fn level(&self) -> u32 {
//!         75
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Engine {
//!     gauge: Inject<dyn FuelGauge>,
//!     reading: AtomicU32,
//! }
//!
//! let types = TypeSystem::new()
//!     .with(
//!         TypeDescriptor::managed::<Engine>("car::engine")
//!             .default_constructor()
//!             .inject_capability::<dyn FuelGauge>("gauge", |e| &e.gauge)
//!             .method("init", |e| e.reading.store(e.gauge.get().level(), Ordering::SeqCst))
//!             .build(),
//!     )
//!     .with(
//!         TypeDescriptor::managed::<AnalogGauge>("car::analog_gauge")
//!             .default_constructor()
//!             .implements::<dyn FuelGauge>(|g| g as Arc<dyn FuelGauge>)
//!             .build(),
//!     );
//!
//! // One source file per module
//! let dir = tempfile::tempdir().unwrap();
//! fs::create_dir_all(dir.path().join("src/car")).unwrap();
//! fs::write(dir.path().join("src/car/engine.rs"), "").unwrap();
//! fs::write(dir.path().join("src/car/analog_gauge.rs"), "").unwrap();
//!
//! let container = Container::new(types);
//! let handle = container.start(dir.path().join("src")).unwrap();
//!
//! let engine = handle.resolve::<Engine>().unwrap();
//! assert_eq!(engine.reading.load(Ordering::SeqCst), 75);
//! assert!(Arc::ptr_eq(&engine, &handle.resolve::<Engine>().unwrap()));
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: created once during [`Container::start`] and shared
//! - **Prototype** (`multiple`): a fresh instance for every field and every lookup
//!
//! ## Registering types
//!
//! Descriptors can be registered explicitly on a [`TypeSystem`], or at link
//! time through the [`MANAGED_TYPES`] distributed slice:
//!
//! ```rust
//! use ferrous_ioc::{TypeDescriptor, MANAGED_TYPES};
//! use linkme::distributed_slice;
//!
//! #[derive(Default)]
//! struct Clock;
//!
//! #[distributed_slice(MANAGED_TYPES)]
//! fn clock() -> TypeDescriptor {
//!     TypeDescriptor::managed::<Clock>("util::clock").default_constructor().build()
//! }
//! ```

// Module declarations
pub mod catalog;
pub mod config;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod inject;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod traits;
pub mod type_system;

#[cfg(feature = "graph-export")]
pub mod graph_export;

// Internal modules
mod registration;

// Re-exports
pub use catalog::Catalog;
pub use config::{ContainerConfig, SourceLayout};
pub use container::{Container, ContainerHandle};
pub use descriptors::{
    FieldDescriptor, Inherits, Injection, Instance, MethodDescriptor, TypeDescriptor, TypeDescriptorBuilder,
};
pub use error::{DiError, DiResult};
pub use inject::Inject;
pub use key::{key_of_capability, key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{BuildObserver, LoggingObserver};
pub use traits::{Resolver, ResolverCore};
pub use type_system::{TypeSystem, MANAGED_TYPES};

#[cfg(feature = "graph-export")]
pub use graph_export::{DependencyGraph, DependencyType, ExportFormat, GraphEdge, GraphMetadata, GraphNode};
