//! Error types for the IoC container.

use thiserror::Error;

/// Container errors
///
/// Every variant is fatal to the operation that produced it: a failed
/// [`Container::start`](crate::Container::start) leaves the container unbuilt and
/// a failed lookup returns no instance. Nothing is retried internally.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::DiError;
///
/// let lookup = DiError::Lookup("app::Missing".to_string());
/// assert_eq!(lookup.to_string(), "No such type: app::Missing");
///
/// let resolution = DiError::Resolution {
///     capability: "dyn app::FuelGauge".to_string(),
///     reason: "no manageable type implements it".to_string(),
/// };
/// println!("Error: {}", resolution);
/// ```
#[derive(Debug, Clone, Error)]
pub enum DiError {
    /// Source tree could not be walked, or a discovered name could not be loaded
    #[error("Discovery failed: {0}")]
    Discovery(String),
    /// No construction path, or the constructor failed
    #[error("Cannot instantiate {type_name}: {reason}")]
    Instantiation {
        type_name: String,
        reason: String,
    },
    /// A capability-typed dependency has no usable implementer
    #[error("No instance for {capability}: {reason}")]
    Resolution {
        capability: String,
        reason: String,
    },
    /// An init hook failed
    #[error("Init hook `{hook}` failed on {type_name}: {reason}")]
    Initialization {
        type_name: String,
        hook: String,
        reason: String,
    },
    /// Requested type was never registered as manageable
    #[error("No such type: {0}")]
    Lookup(String),
    /// Internal wiring invariant broken (registry gap, unmanaged dependency)
    #[error("Container inconsistency: {0}")]
    Consistency(String),
    /// Type downcast failed
    #[error("Type mismatch for: {0}")]
    TypeMismatch(String),
}

impl DiError {
    pub(crate) fn instantiation(type_name: &str, reason: impl Into<String>) -> Self {
        DiError::Instantiation {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn resolution(capability: &str, reason: impl Into<String>) -> Self {
        DiError::Resolution {
            capability: capability.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for container operations
pub type DiResult<T> = Result<T, DiError>;

/// Renders a caught panic payload for error messages.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panicked".to_string()
    }
}
