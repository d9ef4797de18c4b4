//! The runtime type system the catalog loads names from.
//!
//! Rust has no class loader, so "loading a type by name" means looking the
//! name up in a [`TypeSystem`]: a table of descriptors keyed by the module they
//! were declared in and by type identity. It is filled either explicitly with
//! [`TypeSystem::register`] or at link time through the [`MANAGED_TYPES`]
//! distributed slice.

use std::collections::HashMap;
use std::sync::Arc;

use linkme::distributed_slice;
use tracing::{trace, warn};

use crate::descriptors::TypeDescriptor;
use crate::key::{Key, KeyMap};

/// Link-time registry of descriptor factories.
///
/// Every crate in the final binary can contribute entries; [`TypeSystem::linked`]
/// collects them.
///
/// ```rust,ignore
/// use ferrous_ioc::{TypeDescriptor, MANAGED_TYPES};
/// use linkme::distributed_slice;
///
/// #[derive(Default)]
/// struct Clock;
///
/// fn clock() -> TypeDescriptor {
///     TypeDescriptor::managed::<Clock>("app::clock").default_constructor().build()
/// }
///
/// #[distributed_slice(MANAGED_TYPES)]
/// static CLOCK: fn() -> TypeDescriptor = clock;
/// ```
#[distributed_slice]
pub static MANAGED_TYPES: [fn() -> TypeDescriptor];

/// Table of known type descriptors.
///
/// Registration order is kept per module so that discovery, and with it
/// capability resolution, is deterministic.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_type, TypeDescriptor, TypeSystem};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let mut types = TypeSystem::new();
/// types.register(TypeDescriptor::managed::<Clock>("app::clock").default_constructor().build());
///
/// assert_eq!(types.load("app::clock").map(|d| d.len()), Some(1));
/// assert!(types.load("app::missing").is_none());
/// assert!(types.get(&key_of_type::<Clock>()).is_some());
/// ```
#[derive(Default)]
pub struct TypeSystem {
    modules: HashMap<String, Vec<Arc<TypeDescriptor>>>,
    by_key: KeyMap<Arc<TypeDescriptor>>,
}

impl TypeSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a type system from every entry of [`MANAGED_TYPES`].
    pub fn linked() -> Self {
        let mut types = Self::new();
        for factory in MANAGED_TYPES.iter() {
            types.register(factory());
        }
        trace!(count = types.len(), "loaded link-time type registrations");
        types
    }

    /// Adds a descriptor; a later registration of the same type replaces the
    /// earlier one.
    pub fn register(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        let descriptor = Arc::new(descriptor);
        let key = descriptor.key();
        if let Some(previous) = self.by_key.insert(key, descriptor.clone()) {
            warn!(type_name = key.display_name(), "type registered twice, keeping the last registration");
            if let Some(entries) = self.modules.get_mut(previous.module()) {
                entries.retain(|d| d.key() != key);
                if entries.is_empty() {
                    self.modules.remove(previous.module());
                }
            }
        }
        self.modules
            .entry(descriptor.module().to_string())
            .or_default()
            .push(descriptor);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    /// Loads a module name: every descriptor declared there, manageable or not.
    ///
    /// `None` means the name is unknown to the type system.
    pub fn load(&self, module: &str) -> Option<&[Arc<TypeDescriptor>]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    /// Looks a descriptor up by type identity.
    pub fn get(&self, key: &Key) -> Option<&Arc<TypeDescriptor>> {
        self.by_key.get(key)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl std::fmt::Debug for TypeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modules: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        modules.sort_unstable();
        f.debug_struct("TypeSystem")
            .field("modules", &modules)
            .field("types", &self.by_key.len())
            .finish()
    }
}
