//! Resolver traits for instance lookup.

use std::any::Any;
use std::sync::Arc;

use crate::descriptors::Instance;
use crate::error::{DiError, DiResult};
use crate::key::{key_of_capability, key_of_type, Key};

/// Core resolver trait for object-safe lookup.
///
/// Implementors hand out singletons as stored and build prototypes on demand.
/// Most users should use the [`Resolver`] trait instead, which adds typed
/// generic methods on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Looks up the instance for a concrete type key.
    ///
    /// # Returns
    ///
    /// * `Ok(Instance)` - The shared singleton, or a freshly built prototype
    /// * `Err(DiError)` - `Lookup` when the type is not managed, or any error
    ///   raised while building a prototype
    fn resolve_any(&self, key: &Key) -> DiResult<Instance>;

    /// Looks up the provider of a capability and returns it cast to that
    /// capability, boxed as `Box<Arc<C>>`.
    fn resolve_capability_any(&self, capability: &Key) -> DiResult<Box<dyn Any + Send + Sync>>;
}

/// Typed lookup on top of [`ResolverCore`].
///
/// Implemented for every [`ResolverCore`], in particular
/// [`ContainerHandle`](crate::ContainerHandle).
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{Container, Resolver, TypeDescriptor, TypeSystem};
/// use std::fs;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
///
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         "hello".into()
///     }
/// }
///
/// let types = TypeSystem::new().with(
///     TypeDescriptor::managed::<English>("english")
///         .default_constructor()
///         .implements::<dyn Greeter>(|e| e as Arc<dyn Greeter>)
///         .build(),
/// );
///
/// let dir = tempfile::tempdir().unwrap();
/// fs::create_dir_all(dir.path().join("src")).unwrap();
/// fs::write(dir.path().join("src/english.rs"), "").unwrap();
///
/// let handle = Container::new(types).start(dir.path().join("src")).unwrap();
/// let english = handle.resolve::<English>().unwrap();
/// let greeter = handle.resolve_capability::<dyn Greeter>().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// assert_eq!(english.greet(), "hello");
/// ```
pub trait Resolver: ResolverCore {
    /// Looks up the instance of the concrete type `T`.
    ///
    /// Singletons come back as the one shared instance; each call for a
    /// prototype returns a newly built, wired and initialized instance.
    fn resolve<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.resolve_any(&key_of_type::<T>())?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>().to_string()))
    }

    /// Looks up the provider of the capability `C`, using the same selection
    /// rule as capability fields.
    fn resolve_capability<C: ?Sized + Send + Sync + 'static>(&self) -> DiResult<Arc<C>> {
        self.resolve_capability_any(&key_of_capability::<C>())?
            .downcast::<Arc<C>>()
            .map(|boxed| *boxed)
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<C>().to_string()))
    }

    /// Looks up `T`, panicking on failure.
    ///
    /// Prefer [`resolve`](Self::resolve) unless a missing type is a programming
    /// error.
    ///
    /// # Panics
    ///
    /// Panics if the lookup fails for any reason.
    fn resolve_required<T: Any + Send + Sync>(&self) -> Arc<T> {
        self.resolve::<T>()
            .unwrap_or_else(|e| panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e))
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
