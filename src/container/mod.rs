//! The container facade.
//!
//! [`Container::start`] runs the whole build once: discovery, phase 1 (bare
//! singletons into the registry), phase 2 (wiring every singleton, creating
//! prototype dependencies on the way) and phase 3 (init hooks on everything
//! phase 2 produced). The resulting [`ContainerHandle`] serves lookups.

mod lifecycle;
mod wiring;

use std::any::Any;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::ContainerConfig;
use crate::descriptors::Instance;
use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{BuildObserver, Observers};
use crate::registration::Registry;
use crate::traits::ResolverCore;
use crate::type_system::TypeSystem;

/// Entry point: owns the type system and builds the object graph once.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Inject, Resolver, TypeDescriptor, TypeSystem};
/// use std::fs;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Logger;
///
/// #[derive(Default)]
/// struct Request {
///     logger: Inject<Logger>,
/// }
///
/// let types = TypeSystem::new()
///     .with(TypeDescriptor::managed::<Logger>("web::logger").default_constructor().build())
///     .with(
///         TypeDescriptor::managed::<Request>("web::request")
///             .multiple()
///             .default_constructor()
///             .inject::<Logger>("logger", |r| &r.logger)
///             .build(),
///     );
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("src/web")).unwrap();
/// fs::write(dir.path().join("src/web/logger.rs"), "").unwrap();
/// fs::write(dir.path().join("src/web/request.rs"), "").unwrap();
///
/// let container = Container::new(types);
/// let handle = container.start(dir.path().join("src")).unwrap();
///
/// let first = handle.resolve::<Request>().unwrap();
/// let second = handle.resolve::<Request>().unwrap();
/// assert!(!Arc::ptr_eq(&first, &second));
/// assert!(Arc::ptr_eq(first.logger.get(), second.logger.get()));
/// ```
pub struct Container {
    types: TypeSystem,
    config: ContainerConfig,
    observers: Observers,
    handle: OnceCell<ContainerHandle>,
}

impl Container {
    /// Creates an unstarted container over `types`.
    pub fn new(types: TypeSystem) -> Self {
        Self {
            types,
            config: ContainerConfig::default(),
            observers: Observers::default(),
            handle: OnceCell::new(),
        }
    }

    /// Creates an unstarted container over the link-time type registrations.
    pub fn linked() -> Self {
        Self::new(TypeSystem::linked())
    }

    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn BuildObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn type_system(&self) -> &TypeSystem {
        &self.types
    }

    /// Builds the object graph from the modules under `root`, once.
    ///
    /// Later calls return the same handle without rescanning, whatever `root`
    /// they pass. If the build fails nothing is kept, so the next call starts
    /// over.
    pub fn start(&self, root: impl AsRef<Path>) -> DiResult<ContainerHandle> {
        self.handle
            .get_or_try_init(|| {
                let built = self.build(root.as_ref());
                if let Err(err) = &built {
                    self.observers.failed(err);
                }
                built
            })
            .cloned()
    }

    /// The handle of a successful [`start`](Self::start), if any.
    pub fn handle(&self) -> Option<ContainerHandle> {
        self.handle.get().cloned()
    }

    pub fn is_started(&self) -> bool {
        self.handle.get().is_some()
    }

    fn build(&self, root: &Path) -> DiResult<ContainerHandle> {
        self.config.validate()?;
        let catalog = Catalog::discover(&self.types, root, &self.config.layout)?;

        // Phase 1: bare singletons, nothing injected yet.
        let mut registry = Registry::new();
        for descriptor in catalog.singletons() {
            let instance = descriptor.instantiate()?;
            self.observers.instantiated(&descriptor.key(), Lifetime::Singleton);
            registry.insert(descriptor.key(), instance)?;
        }
        debug!(singletons = registry.len(), "registry populated");

        let state = ContainerState {
            catalog,
            registry,
            init_hook: self.config.init_hook.clone(),
            observers: self.observers.clone(),
        };

        // Phase 2: wire every singleton; prototypes are created on the way.
        let mut touched = Vec::new();
        for (key, instance) in state.registry.iter() {
            let descriptor = state.catalog.get(key).ok_or_else(|| {
                DiError::Consistency(format!("{} registered but not catalogued", key.display_name()))
            })?;
            touched.extend(state.wire(descriptor, instance)?);
        }
        debug!(instances = touched.len(), "object graph wired");

        // Phase 3: init hooks in wiring order.
        state.initialize_all(&touched)?;

        info!(
            root = %root.display(),
            manageable = state.catalog.len(),
            singletons = state.registry.len(),
            initialized = touched.len(),
            "container started"
        );
        Ok(ContainerHandle {
            state: Arc::new(state),
        })
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("types", &self.types)
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .field("started", &self.is_started())
            .finish()
    }
}

pub(crate) struct ContainerState {
    pub(crate) catalog: Catalog,
    pub(crate) registry: Registry,
    pub(crate) init_hook: String,
    pub(crate) observers: Observers,
}

/// A started container: cheap to clone, safe to share across threads.
///
/// Singletons are returned as-is; prototypes are built, wired and initialized
/// per call, each with its own dependency subgraph.
#[derive(Clone)]
pub struct ContainerHandle {
    state: Arc<ContainerState>,
}

impl ContainerHandle {
    /// Whether both handles come from the same build.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// The manageable type set this container was built from.
    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    pub fn singleton_count(&self) -> usize {
        self.state.registry.len()
    }

    fn build_prototype(&self, key: &Key) -> DiResult<Instance> {
        let state = &self.state;
        let descriptor = state
            .catalog
            .get(key)
            .ok_or_else(|| DiError::Lookup(key.display_name().to_string()))?;
        if descriptor.lifetime() != Some(Lifetime::Prototype) {
            return Err(DiError::Consistency(format!(
                "singleton {} missing from registry",
                descriptor.name()
            )));
        }

        let instance = descriptor.instantiate()?;
        state.observers.instantiated(key, Lifetime::Prototype);
        let touched = state.wire(descriptor, &instance)?;
        state.initialize_all(&touched)?;
        debug!(type_name = descriptor.name(), instances = touched.len(), "prototype built");
        Ok(instance)
    }
}

impl ResolverCore for ContainerHandle {
    fn resolve_any(&self, key: &Key) -> DiResult<Instance> {
        if let Some(instance) = self.state.registry.get(key) {
            return Ok(instance.clone());
        }
        let built = self.build_prototype(key);
        if let Err(err) = &built {
            self.state.observers.failed(err);
        }
        built
    }

    fn resolve_capability_any(&self, capability: &Key) -> DiResult<Box<dyn Any + Send + Sync>> {
        let provider = match self.state.catalog.resolve_by_capability(capability) {
            Ok(provider) => provider,
            Err(err) => {
                self.state.observers.failed(&err);
                return Err(err);
            }
        };
        let instance = self.resolve_any(&provider.key())?;
        provider.cast_to(capability, instance)
    }
}

impl fmt::Debug for ContainerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerHandle")
            .field("manageable", &self.state.catalog.len())
            .field("singletons", &self.state.registry.len())
            .field("init_hook", &self.state.init_hook)
            .finish()
    }
}
