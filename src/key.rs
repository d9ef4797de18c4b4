//! Type keys for descriptor and instance lookup.

use std::any::TypeId;

/// Identity of a type known to the container.
///
/// Descriptors are compared by identity; a key is that identity. Two kinds of
/// types can appear in the object graph:
///
/// - **Type**: a concrete type (struct or enum) that can be instantiated
/// - **Capability**: a trait-object type such as `dyn FuelGauge`, which a field
///   may declare instead of a concrete type and which is resolved to an
///   implementing managed type
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{key_of_capability, key_of_type, Key};
///
/// trait FuelGauge: Send + Sync {}
/// struct AnalogGauge;
///
/// let concrete = key_of_type::<AnalogGauge>();
/// let capability = key_of_capability::<dyn FuelGauge>();
///
/// assert!(concrete.is_concrete());
/// assert!(!capability.is_concrete());
/// assert!(concrete.display_name().ends_with("AnalogGauge"));
/// assert_ne!(concrete, capability);
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Capability (trait object) key with TypeId and name for diagnostics
    Capability(TypeId, &'static str),
}

impl Key {
    /// Get the type or capability name for display
    ///
    /// This is the `std::any::type_name` result captured when the key was made.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Capability(_, name) => name,
        }
    }

    /// The `TypeId` behind this key.
    pub fn type_id(&self) -> TypeId {
        match self {
            Key::Type(id, _) | Key::Capability(id, _) => *id,
        }
    }

    /// Whether the key names a concrete (instantiable) type.
    pub fn is_concrete(&self) -> bool {
        matches!(self, Key::Type(_, _))
    }
}

// TypeId-only comparison; the name is diagnostics
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Capability(a, _), Key::Capability(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Capability(id, _) => {
                1u8.hash(state);
                id.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Key for a concrete type.
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key for a capability type, usually `dyn Trait`.
#[inline(always)]
pub fn key_of_capability<C: ?Sized + 'static>() -> Key {
    Key::Capability(TypeId::of::<C>(), std::any::type_name::<C>())
}

#[cfg(feature = "ahash")]
pub(crate) type KeyMap<V> = ahash::AHashMap<Key, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type KeyMap<V> = std::collections::HashMap<Key, V>;
