//! The manageable type set.
//!
//! A [`Catalog`] is produced once per container: discovery turns a source tree
//! into module names, each name is loaded from the [`TypeSystem`], and the
//! descriptors bearing the management marker are kept in discovery order.

pub mod discovery;
mod resolver;

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::SourceLayout;
use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::key::{Key, KeyMap};
use crate::lifetime::Lifetime;
use crate::type_system::TypeSystem;

/// Discovery-ordered set of manageable type descriptors.
///
/// Also records the descriptor of every supertype reachable from a member, so
/// wiring and capability resolution never go back to the type system.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Catalog, Lifetime, TypeDescriptor, TypeSystem};
///
/// #[derive(Default)]
/// struct Clock;
/// #[derive(Default)]
/// struct Scratch;
///
/// let types = TypeSystem::new()
///     .with(TypeDescriptor::managed::<Clock>("app::clock").default_constructor().build())
///     .with(TypeDescriptor::unmanaged::<Scratch>("app::clock").build());
///
/// let catalog = Catalog::from_names(&types, ["app::clock"]).unwrap();
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.iter().next().unwrap().lifetime(), Some(Lifetime::Singleton));
///
/// assert!(Catalog::from_names(&types, ["app::gone"]).is_err());
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    manageable: Vec<Arc<TypeDescriptor>>,
    index: KeyMap<usize>,
    ancestors: KeyMap<Arc<TypeDescriptor>>,
}

impl Catalog {
    /// Walks `root` and builds the catalog from the modules found there.
    pub fn discover(types: &TypeSystem, root: &Path, layout: &SourceLayout) -> DiResult<Self> {
        let names = discovery::source_names(root, layout)?;
        debug!(root = %root.display(), modules = names.len(), "source tree scanned");
        Self::from_names(types, names.iter().map(String::as_str))
    }

    /// Builds the catalog from already-derived module names.
    ///
    /// Fails if any name, or any supertype of a kept descriptor, is unknown to
    /// the type system.
    pub fn from_names<'a, I>(types: &TypeSystem, names: I) -> DiResult<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::default();
        for name in names {
            let loaded = types
                .load(name)
                .ok_or_else(|| DiError::Discovery(format!("cannot load `{}`", name)))?;
            for descriptor in loaded.iter().filter(|d| d.is_manageable()) {
                catalog.insert(descriptor.clone());
            }
        }
        catalog.link_ancestors(types)?;
        debug!(
            manageable = catalog.len(),
            ancestors = catalog.ancestors.len(),
            "catalog built"
        );
        Ok(catalog)
    }

    fn insert(&mut self, descriptor: Arc<TypeDescriptor>) {
        let key = descriptor.key();
        if !self.index.contains_key(&key) {
            self.index.insert(key, self.manageable.len());
            self.manageable.push(descriptor);
        }
    }

    fn link_ancestors(&mut self, types: &TypeSystem) -> DiResult<()> {
        for descriptor in &self.manageable {
            let mut next = descriptor.supertype();
            while let Some(key) = next {
                if self.ancestors.contains_key(&key) {
                    break;
                }
                let supertype = types.get(&key).ok_or_else(|| {
                    DiError::Discovery(format!(
                        "supertype {} of {} cannot be loaded",
                        key.display_name(),
                        descriptor.name()
                    ))
                })?;
                self.ancestors.insert(key, supertype.clone());
                next = supertype.supertype();
            }
        }
        Ok(())
    }

    /// Descriptor for a manageable type.
    pub fn get(&self, key: &Key) -> Option<&Arc<TypeDescriptor>> {
        self.index.get(key).map(|&i| &self.manageable[i])
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    /// Descriptor of the immediate supertype, managed or not.
    pub fn supertype_of(&self, descriptor: &TypeDescriptor) -> Option<&Arc<TypeDescriptor>> {
        descriptor.supertype().and_then(|key| self.ancestors.get(&key))
    }

    /// Manageable descriptors in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.manageable.iter()
    }

    /// Manageable descriptors with singleton lifetime, in discovery order.
    pub fn singletons(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.manageable
            .iter()
            .filter(|d| d.lifetime() == Some(Lifetime::Singleton))
    }

    pub fn len(&self) -> usize {
        self.manageable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manageable.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptors::Inherits;
    use crate::key::key_of_type;

    #[derive(Default)]
    struct Base;
    #[derive(Default)]
    struct Derived {
        base: Base,
    }
    impl Inherits<Base> for Derived {
        fn base(&self) -> &Base {
            &self.base
        }
    }
    #[derive(Default)]
    struct Worker;

    fn types() -> TypeSystem {
        TypeSystem::new()
            .with(TypeDescriptor::unmanaged::<Base>("app::base").build())
            .with(
                TypeDescriptor::managed::<Derived>("app::derived")
                    .default_constructor()
                    .extends::<Base>()
                    .build(),
            )
            .with(
                TypeDescriptor::managed::<Worker>("app::worker")
                    .default_constructor()
                    .multiple()
                    .build(),
            )
    }

    #[test]
    fn keeps_discovery_order_and_dedupes() {
        let catalog =
            Catalog::from_names(&types(), ["app::worker", "app::derived", "app::worker"]).unwrap();
        let keys: Vec<_> = catalog.iter().map(|d| d.key()).collect();
        assert_eq!(keys, vec![key_of_type::<Worker>(), key_of_type::<Derived>()]);
        assert_eq!(catalog.singletons().count(), 1);
    }

    #[test]
    fn unmanaged_types_are_filtered_but_linked_as_supertypes() {
        let catalog = Catalog::from_names(&types(), ["app::base", "app::derived"]).unwrap();
        assert!(!catalog.contains(&key_of_type::<Base>()));
        let derived = catalog.get(&key_of_type::<Derived>()).unwrap();
        assert_eq!(
            catalog.supertype_of(derived).map(|d| d.key()),
            Some(key_of_type::<Base>())
        );
    }

    #[test]
    fn unknown_supertype_fails_discovery() {
        let types = TypeSystem::new().with(
            TypeDescriptor::managed::<Derived>("app::derived")
                .default_constructor()
                .extends::<Base>()
                .build(),
        );
        let err = Catalog::from_names(&types, ["app::derived"]).unwrap_err();
        assert!(matches!(err, DiError::Discovery(ref m) if m.contains("supertype")));
    }
}
