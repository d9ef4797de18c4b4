//! Type descriptors: the container's view of a managed type.
//!
//! A [`TypeDescriptor`] records everything the container needs to build and
//! wire a type without reflection: how to construct a bare instance, which
//! fields carry the injection marker and how to write them, which methods
//! exist (for init hooks), which embedded base type plays the supertype role,
//! and which capabilities the type can be viewed as.

use std::any::{type_name, Any};
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::{panic_message, DiError, DiResult};
use crate::inject::Inject;
use crate::key::{key_of_capability, key_of_type, Key};
use crate::lifetime::Lifetime;

/// A live object of some managed type.
pub type Instance = Arc<dyn Any + Send + Sync>;

pub(crate) type AnyRef = dyn Any + Send + Sync;

type Constructor = Arc<dyn Fn() -> Result<Instance, String> + Send + Sync>;
type Setter = Arc<dyn Fn(&AnyRef, Provided) -> DiResult<()> + Send + Sync>;
type Invoker = Arc<dyn Fn(&AnyRef) -> Result<(), String> + Send + Sync>;
type Cast = Arc<dyn Fn(Instance) -> Option<Box<dyn Any + Send + Sync>> + Send + Sync>;
type Projection = fn(&AnyRef) -> Option<&AnyRef>;

/// Value handed to a field setter.
pub(crate) enum Provided {
    /// Instance of the field's concrete type
    Instance(Instance),
    /// Boxed `Arc<dyn Capability>` produced by the provider's cast
    Capability(Box<dyn Any + Send + Sync>),
}

/// Declares that a managed type embeds `B` as its supertype.
///
/// The container injects `B`'s marked fields into the embedded value after the
/// subtype's own fields, and capability resolution consults `B`'s declared
/// capabilities.
///
/// ```rust
/// use ferrous_ioc::Inherits;
///
/// #[derive(Default)]
/// struct Vehicle;
///
/// #[derive(Default)]
/// struct Truck {
///     vehicle: Vehicle,
/// }
///
/// impl Inherits<Vehicle> for Truck {
///     fn base(&self) -> &Vehicle {
///         &self.vehicle
///     }
/// }
/// ```
pub trait Inherits<B> {
    /// The embedded supertype value.
    fn base(&self) -> &B;
}

/// How a marked field is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// The declared type is concrete and is its own provider
    Concrete,
    /// The declared type is a capability; `target` overrides resolution
    Capability { target: Option<Key> },
}

/// A declared field.
pub struct FieldDescriptor {
    name: &'static str,
    declared: Key,
    injection: Option<Injection>,
    setter: Option<Setter>,
}

impl FieldDescriptor {
    /// Field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type of the field.
    pub fn declared_type(&self) -> Key {
        self.declared
    }

    /// The injection marker, if the field carries one.
    pub fn injection(&self) -> Option<Injection> {
        self.injection
    }

    /// Whether the field carries the injection marker.
    pub fn is_marked(&self) -> bool {
        self.injection.is_some()
    }

    pub(crate) fn assign(&self, owner: &AnyRef, value: Provided) -> DiResult<()> {
        match &self.setter {
            Some(setter) => setter(owner, value),
            None => Err(DiError::Consistency(format!(
                "field `{}` has no injection marker",
                self.name
            ))),
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("declared", &self.declared.display_name())
            .field("injection", &self.injection)
            .finish()
    }
}

/// A declared no-argument method.
pub struct MethodDescriptor {
    name: &'static str,
    invoker: Invoker,
}

impl MethodDescriptor {
    /// Method name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn invoke(&self, target: &AnyRef) -> Result<(), String> {
        match catch_unwind(AssertUnwindSafe(|| (self.invoker)(target))) {
            Ok(result) => result,
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .finish()
    }
}

struct Supertype {
    key: Key,
    project: Projection,
}

/// Immutable description of a type, produced once and shared by `Arc`.
///
/// Descriptors are compared by identity, i.e. by [`key`](Self::key).
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Inject, Lifetime, TypeDescriptor};
/// use std::sync::Arc;
///
/// trait FuelGauge: Send + Sync {
///     fn level(&self) -> u8;
/// }
///
/// #[derive(Default)]
/// struct AnalogGauge;
/// impl FuelGauge for AnalogGauge {
///     fn level(&self) -> u8 { 70 }
/// }
///
/// #[derive(Default)]
/// struct Engine {
///     gauge: Inject<dyn FuelGauge>,
/// }
///
/// let gauge = TypeDescriptor::managed::<AnalogGauge>("cars::gauge")
///     .default_constructor()
///     .implements::<dyn FuelGauge>(|g| g as Arc<dyn FuelGauge>)
///     .build();
///
/// let engine = TypeDescriptor::managed::<Engine>("cars::engine")
///     .default_constructor()
///     .inject_capability::<dyn FuelGauge>("gauge", |e| &e.gauge)
///     .build();
///
/// assert_eq!(engine.lifetime(), Some(Lifetime::Singleton));
/// assert_eq!(engine.fields().len(), 1);
/// assert!(gauge.declares(&ferrous_ioc::key_of_capability::<dyn FuelGauge>()));
/// ```
pub struct TypeDescriptor {
    key: Key,
    module: String,
    marker: Option<Lifetime>,
    constructor: Option<Constructor>,
    fields: Vec<FieldDescriptor>,
    methods: Vec<MethodDescriptor>,
    supertype: Option<Supertype>,
    capabilities: Vec<Key>,
    casts: Vec<(Key, Cast)>,
}

impl TypeDescriptor {
    /// Starts a descriptor for a type bearing the management marker
    /// (singleton unless [`multiple`](TypeDescriptorBuilder::multiple) is set).
    pub fn managed<T>(module: impl Into<String>) -> TypeDescriptorBuilder<T>
    where
        T: Any + Send + Sync,
    {
        TypeDescriptorBuilder::new(module.into(), Some(Lifetime::Singleton))
    }

    /// Starts a descriptor for a type without the management marker.
    ///
    /// Unmarked types are loaded by discovery and then filtered out; they are
    /// mostly useful as supertypes of managed types.
    pub fn unmanaged<T>(module: impl Into<String>) -> TypeDescriptorBuilder<T>
    where
        T: Any + Send + Sync,
    {
        TypeDescriptorBuilder::new(module.into(), None)
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn name(&self) -> &'static str {
        self.key.display_name()
    }

    /// Namespace the type was declared in, e.g. `app::engine`.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Lifetime from the management marker, `None` if unmarked.
    pub fn lifetime(&self) -> Option<Lifetime> {
        self.marker
    }

    pub fn is_manageable(&self) -> bool {
        self.marker.is_some()
    }

    /// Whether the marker says "multiple".
    pub fn is_multiple(&self) -> bool {
        self.marker.map_or(false, Lifetime::is_multiple)
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Declared methods, in declaration order.
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Declared methods named `name`.
    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDescriptor> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Key of the embedded supertype, if any.
    pub fn supertype(&self) -> Option<Key> {
        self.supertype.as_ref().map(|s| s.key)
    }

    /// Capabilities this type declares directly.
    pub fn capabilities(&self) -> &[Key] {
        &self.capabilities
    }

    /// Whether `capability` is among the directly declared capabilities.
    pub fn declares(&self, capability: &Key) -> bool {
        self.capabilities.contains(capability)
    }

    /// Whether an instance of this type can be viewed as `capability`.
    pub fn can_cast_to(&self, capability: &Key) -> bool {
        self.casts.iter().any(|(k, _)| k == capability)
    }

    /// Allocates a bare instance, dependencies not populated.
    pub(crate) fn instantiate(&self) -> DiResult<Instance> {
        let ctor = self
            .constructor
            .as_ref()
            .ok_or_else(|| DiError::instantiation(self.name(), "no no-argument constructor"))?;
        match catch_unwind(AssertUnwindSafe(|| ctor())) {
            Ok(Ok(instance)) => Ok(instance),
            Ok(Err(reason)) => Err(DiError::instantiation(self.name(), reason)),
            Err(payload) => Err(DiError::instantiation(
                self.name(),
                format!("constructor panicked: {}", panic_message(payload.as_ref())),
            )),
        }
    }

    /// Views `instance` as `capability`, yielding a boxed `Arc<dyn Capability>`.
    pub(crate) fn cast_to(&self, capability: &Key, instance: Instance) -> DiResult<Box<dyn Any + Send + Sync>> {
        let (_, cast) = self.casts.iter().find(|(k, _)| k == capability).ok_or_else(|| {
            DiError::resolution(
                capability.display_name(),
                format!("{} cannot be viewed as it", self.name()),
            )
        })?;
        cast(instance).ok_or_else(|| DiError::TypeMismatch(self.name().to_string()))
    }

    /// Projects an instance of this type onto its embedded supertype value.
    pub(crate) fn project_to_supertype<'a>(&self, target: &'a AnyRef) -> Option<&'a AnyRef> {
        self.supertype.as_ref().and_then(|s| (s.project)(target))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name())
            .field("module", &self.module)
            .field("marker", &self.marker)
            .field("fields", &self.fields)
            .field("methods", &self.methods)
            .field("supertype", &self.supertype().map(|k| k.display_name()))
            .field(
                "capabilities",
                &self.capabilities.iter().map(Key::display_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn project_base<T, B>(owner: &AnyRef) -> Option<&AnyRef>
where
    T: Inherits<B> + Any + Send + Sync,
    B: Any + Send + Sync,
{
    owner.downcast_ref::<T>().map(|t| t.base() as &AnyRef)
}

fn owner_of<T: Any + Send + Sync>(owner: &AnyRef) -> DiResult<&T> {
    owner
        .downcast_ref::<T>()
        .ok_or_else(|| DiError::TypeMismatch(type_name::<T>().to_string()))
}

fn injected_twice<T>(field: &str) -> DiError {
    DiError::Consistency(format!(
        "field `{}` of {} injected twice",
        field,
        type_name::<T>()
    ))
}

/// Fluent builder for [`TypeDescriptor`].
///
/// The builder is typed on the described type, so accessors, constructors and
/// hooks are checked at compile time; the finished descriptor is type-erased.
pub struct TypeDescriptorBuilder<T> {
    inner: TypeDescriptor,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T> TypeDescriptorBuilder<T>
where
    T: Any + Send + Sync,
{
    fn new(module: String, marker: Option<Lifetime>) -> Self {
        Self {
            inner: TypeDescriptor {
                key: key_of_type::<T>(),
                module,
                marker,
                constructor: None,
                fields: Vec::new(),
                methods: Vec::new(),
                supertype: None,
                capabilities: Vec::new(),
                casts: Vec::new(),
            },
            _marker: std::marker::PhantomData,
        }
    }

    /// Sets the marker's "multiple" attribute: a fresh instance per resolution.
    ///
    /// Has no effect on unmanaged descriptors.
    pub fn multiple(mut self) -> Self {
        if self.inner.marker.is_some() {
            self.inner.marker = Some(Lifetime::Prototype);
        }
        self
    }

    /// No-argument construction path.
    pub fn constructor<F>(mut self, ctor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.inner.constructor = Some(Arc::new(move || Ok(Arc::new(ctor()) as Instance)));
        self
    }

    /// Fallible no-argument construction path.
    pub fn try_constructor<F, E>(mut self, ctor: F) -> Self
    where
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.inner.constructor = Some(Arc::new(move || {
            ctor()
                .map(|value| Arc::new(value) as Instance)
                .map_err(|e| e.to_string())
        }));
        self
    }

    /// Uses `T::default()` as the construction path.
    pub fn default_constructor(self) -> Self
    where
        T: Default,
    {
        self.constructor(T::default)
    }

    /// Declares a field without the injection marker.
    pub fn field<D: 'static>(mut self, name: &'static str) -> Self {
        self.inner.fields.push(FieldDescriptor {
            name,
            declared: key_of_type::<D>(),
            injection: None,
            setter: None,
        });
        self
    }

    /// Declares a marked field of concrete type `D`.
    pub fn inject<D>(mut self, name: &'static str, accessor: fn(&T) -> &Inject<D>) -> Self
    where
        D: Any + Send + Sync,
    {
        let setter: Setter = Arc::new(move |owner: &AnyRef, value: Provided| {
            let target = owner_of::<T>(owner)?;
            let instance = match value {
                Provided::Instance(instance) => instance,
                Provided::Capability(_) => {
                    return Err(DiError::TypeMismatch(type_name::<D>().to_string()))
                }
            };
            let typed = instance
                .downcast::<D>()
                .map_err(|_| DiError::TypeMismatch(type_name::<D>().to_string()))?;
            accessor(target)
                .set(typed)
                .map_err(|_| injected_twice::<T>(name))
        });
        self.inner.fields.push(FieldDescriptor {
            name,
            declared: key_of_type::<D>(),
            injection: Some(Injection::Concrete),
            setter: Some(setter),
        });
        self
    }

    /// Declares a marked field typed by capability `C`, resolved to an
    /// implementing managed type.
    pub fn inject_capability<C>(self, name: &'static str, accessor: fn(&T) -> &Inject<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capability_field(name, accessor, None)
    }

    /// Declares a marked capability field whose provider is fixed to `P`.
    pub fn inject_capability_as<C, P>(self, name: &'static str, accessor: fn(&T) -> &Inject<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        P: Any + Send + Sync,
    {
        self.capability_field(name, accessor, Some(key_of_type::<P>()))
    }

    fn capability_field<C>(
        mut self,
        name: &'static str,
        accessor: fn(&T) -> &Inject<C>,
        target: Option<Key>,
    ) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let setter: Setter = Arc::new(move |owner: &AnyRef, value: Provided| {
            let target = owner_of::<T>(owner)?;
            let boxed = match value {
                Provided::Capability(boxed) => boxed,
                Provided::Instance(_) => {
                    return Err(DiError::TypeMismatch(type_name::<C>().to_string()))
                }
            };
            let typed = boxed
                .downcast::<Arc<C>>()
                .map_err(|_| DiError::TypeMismatch(type_name::<C>().to_string()))?;
            accessor(target)
                .set(*typed)
                .map_err(|_| injected_twice::<T>(name))
        });
        self.inner.fields.push(FieldDescriptor {
            name,
            declared: key_of_capability::<C>(),
            injection: Some(Injection::Capability { target }),
            setter: Some(setter),
        });
        self
    }

    /// Declares a no-argument method.
    pub fn method<F>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let invoker: Invoker = Arc::new(move |owner: &AnyRef| {
            let target = owner_of::<T>(owner).map_err(|e| e.to_string())?;
            f(target);
            Ok(())
        });
        self.inner.methods.push(MethodDescriptor { name, invoker });
        self
    }

    /// Declares a fallible no-argument method.
    pub fn try_method<F, E>(mut self, name: &'static str, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let invoker: Invoker = Arc::new(move |owner: &AnyRef| {
            let target = owner_of::<T>(owner).map_err(|e| e.to_string())?;
            f(target).map_err(|e| e.to_string())
        });
        self.inner.methods.push(MethodDescriptor { name, invoker });
        self
    }

    /// Declares the embedded supertype `B`.
    pub fn extends<B>(mut self) -> Self
    where
        T: Inherits<B>,
        B: Any + Send + Sync,
    {
        self.inner.supertype = Some(Supertype {
            key: key_of_type::<B>(),
            project: project_base::<T, B>,
        });
        self
    }

    /// Declares capability `C` and how to view an instance as it.
    pub fn implements<C>(mut self, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let key = key_of_capability::<C>();
        if !self.inner.capabilities.contains(&key) {
            self.inner.capabilities.push(key);
        }
        self.push_cast(key, cast)
    }

    /// Records how to view an instance as `C` without declaring `C`.
    ///
    /// Use this for capabilities the supertype declares: resolution finds the
    /// type through its supertype, and this cast performs the injection.
    pub fn coerces_to<C>(self, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.push_cast(key_of_capability::<C>(), cast)
    }

    fn push_cast<C>(mut self, key: Key, cast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let erased: Cast = Arc::new(move |instance: Instance| {
            instance
                .downcast::<T>()
                .ok()
                .map(|typed| Box::new(cast(typed)) as Box<dyn Any + Send + Sync>)
        });
        self.inner.casts.retain(|(k, _)| *k != key);
        self.inner.casts.push((key, erased));
        self
    }

    pub fn build(self) -> TypeDescriptor {
        self.inner
    }
}
