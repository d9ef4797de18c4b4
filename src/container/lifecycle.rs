//! Phase 3: running init hooks.

use std::time::Instant;

use tracing::trace;

use super::wiring::Touched;
use super::ContainerState;
use crate::error::{DiError, DiResult};

impl ContainerState {
    /// Invokes the init hooks of every touched instance, in order.
    pub(crate) fn initialize_all(&self, touched: &[Touched]) -> DiResult<()> {
        for entry in touched {
            self.initialize(entry)?;
        }
        Ok(())
    }

    /// Invokes every method of the concrete type named after the init hook.
    /// Supertype methods are not part of the concrete type's declared methods.
    fn initialize(&self, entry: &Touched) -> DiResult<()> {
        let descriptor = &entry.descriptor;
        let started = Instant::now();
        for method in descriptor.methods_named(&self.init_hook) {
            trace!(type_name = descriptor.name(), hook = method.name(), "invoking init hook");
            method
                .invoke(entry.instance.as_ref())
                .map_err(|reason| DiError::Initialization {
                    type_name: descriptor.name().to_string(),
                    hook: method.name().to_string(),
                    reason,
                })?;
        }
        self.observers.initialized(&descriptor.key(), started.elapsed());
        Ok(())
    }
}
