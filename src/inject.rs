//! Container-writable dependency slots.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

/// A field the container fills during wiring.
///
/// Managed types declare their dependencies as `Inject<T>` fields, where `T` is
/// either a concrete managed type or a capability such as `dyn FuelGauge`. The
/// field can stay private: the container writes it through the setter recorded
/// in the type's [`TypeDescriptor`](crate::TypeDescriptor), which is the only
/// write path. Each slot is written at most once; reads after wiring are
/// lock-free.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::Inject;
///
/// struct Logger;
///
/// #[derive(Default)]
/// struct Request {
///     logger: Inject<Logger>,
/// }
///
/// let request = Request::default();
/// assert!(!request.logger.is_injected());
/// assert!(request.logger.try_get().is_none());
/// ```
pub struct Inject<T: ?Sized> {
    slot: OnceCell<Arc<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            slot: OnceCell::new(),
        }
    }

    /// Returns the injected dependency.
    ///
    /// # Panics
    ///
    /// Panics if the slot has not been wired yet. Inside an init hook every
    /// marked field is already populated.
    pub fn get(&self) -> &Arc<T> {
        match self.slot.get() {
            Some(value) => value,
            None => panic!(
                "dependency {} accessed before injection",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Returns the injected dependency, or `None` before wiring.
    pub fn try_get(&self) -> Option<&Arc<T>> {
        self.slot.get()
    }

    /// Whether the container has written this slot.
    pub fn is_injected(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Writes the slot; hands the value back if it was already written.
    pub(crate) fn set(&self, value: Arc<T>) -> Result<(), Arc<T>> {
        self.slot.set(value)
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inject")
            .field("type", &std::any::type_name::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}
