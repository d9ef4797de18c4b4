//! Diagnostic observers for container builds.
//!
//! Observers are notified as the container allocates, wires and initializes
//! instances. They see the same sequence a debugger would: every bare
//! instance, every field write with the chosen provider, every init hook run,
//! and the error that aborted a build.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, trace};

use crate::error::DiError;
use crate::key::Key;
use crate::lifetime::Lifetime;

/// Observer trait for container build events.
///
/// All methods have empty default implementations so observers only override
/// what they care about. Calls are synchronous and happen on the building
/// thread; keep implementations light.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{BuildObserver, Key};
/// use std::sync::Mutex;
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct InitOrder(Mutex<Vec<&'static str>>);
///
/// impl BuildObserver for InitOrder {
///     fn initialized(&self, key: &Key, _duration: Duration) {
///         self.0.lock().unwrap().push(key.display_name());
///     }
/// }
/// ```
pub trait BuildObserver: Send + Sync {
    /// A bare instance was allocated.
    fn instantiated(&self, _key: &Key, _lifetime: Lifetime) {}

    /// A marked field of `owner` was written with an instance of `provider`.
    fn injected(&self, _owner: &Key, _field: &str, _provider: &Key) {}

    /// Init hooks of an instance ran; `duration` covers all of them.
    fn initialized(&self, _key: &Key, _duration: Duration) {}

    /// A build or lookup was aborted.
    fn failed(&self, _error: &DiError) {}
}

/// Registered observers, with minimal overhead when there are none.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn BuildObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn BuildObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn instantiated(&self, key: &Key, lifetime: Lifetime) {
        for observer in &self.observers {
            observer.instantiated(key, lifetime);
        }
    }

    #[inline]
    pub(crate) fn injected(&self, owner: &Key, field: &str, provider: &Key) {
        for observer in &self.observers {
            observer.injected(owner, field, provider);
        }
    }

    #[inline]
    pub(crate) fn initialized(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.initialized(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, error: &DiError) {
        for observer in &self.observers {
            observer.failed(error);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.len()
    }
}

/// Built-in observer that forwards build events to `tracing`.
///
/// Allocation and injection are emitted at `TRACE`, initialization at
/// `DEBUG` and failures at `ERROR`, all under the `ferrous_ioc::build` target.
///
/// ```
/// use ferrous_ioc::{Container, LoggingObserver, TypeSystem};
/// use std::sync::Arc;
///
/// let container = Container::new(TypeSystem::new())
///     .with_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "ferrous-ioc".to_string(),
        }
    }

    /// Creates a logging observer whose events carry a custom `prefix` field.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildObserver for LoggingObserver {
    fn instantiated(&self, key: &Key, lifetime: Lifetime) {
        trace!(target: "ferrous_ioc::build", prefix = %self.prefix, type_name = key.display_name(), %lifetime, "instantiated");
    }

    fn injected(&self, owner: &Key, field: &str, provider: &Key) {
        trace!(
            target: "ferrous_ioc::build",
            prefix = %self.prefix,
            owner = owner.display_name(),
            field,
            provider = provider.display_name(),
            "injected"
        );
    }

    fn initialized(&self, key: &Key, duration: Duration) {
        debug!(target: "ferrous_ioc::build", prefix = %self.prefix, type_name = key.display_name(), ?duration, "initialized");
    }

    fn failed(&self, err: &DiError) {
        error!(target: "ferrous_ioc::build", prefix = %self.prefix, error = %err, "build failed");
    }
}
