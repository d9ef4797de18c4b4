//! Instance lifetime definitions.

/// How many instances of a managed type the container hands out
///
/// The type-level marker carries a single boolean, "multiple". `false` (the
/// default) makes the type a singleton: one bare instance is allocated during
/// [`Container::start`](crate::Container::start), wired once and shared by every
/// field and lookup that refers to it. `true` makes the type a prototype: each
/// field that depends on it and each lookup gets a freshly allocated, freshly
/// wired instance that the container never stores.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Lifetime;
///
/// assert_eq!(Lifetime::from_multiple(false), Lifetime::Singleton);
/// assert_eq!(Lifetime::from_multiple(true), Lifetime::Prototype);
/// assert!(Lifetime::Prototype.is_multiple());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifetime {
    /// Single instance per container, allocated before any wiring happens
    #[default]
    Singleton,
    /// New instance per resolution, never cached
    Prototype,
}

impl Lifetime {
    /// Maps the marker's "multiple" attribute onto a lifetime.
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Lifetime::Prototype
        } else {
            Lifetime::Singleton
        }
    }

    /// Whether this is the "multiple" (prototype) lifetime.
    pub fn is_multiple(self) -> bool {
        self == Lifetime::Prototype
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lifetime::Singleton => f.write_str("singleton"),
            Lifetime::Prototype => f.write_str("prototype"),
        }
    }
}
