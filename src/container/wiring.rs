//! Phase 2: injecting marked fields.

use std::sync::Arc;

use tracing::trace;

use super::ContainerState;
use crate::descriptors::{AnyRef, FieldDescriptor, Injection, Instance, Provided, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::lifetime::Lifetime;

/// An instance produced or visited while wiring, with its concrete descriptor.
pub(crate) struct Touched {
    pub(crate) descriptor: Arc<TypeDescriptor>,
    pub(crate) instance: Instance,
}

impl ContainerState {
    /// Injects every marked field of `instance` and returns the instances
    /// touched, owner first, then each freshly built prototype followed by its
    /// own dependencies (depth-first, pre-order).
    pub(crate) fn wire(&self, descriptor: &Arc<TypeDescriptor>, instance: &Instance) -> DiResult<Vec<Touched>> {
        let mut touched = vec![Touched {
            descriptor: descriptor.clone(),
            instance: instance.clone(),
        }];
        self.wire_into(descriptor, descriptor, instance.as_ref(), &mut touched)?;
        Ok(touched)
    }

    /// Writes the fields `layer` declares into `target`, then recurses into the
    /// supertype chain with the projected base value.
    fn wire_into(
        &self,
        owner: &TypeDescriptor,
        layer: &TypeDescriptor,
        target: &AnyRef,
        touched: &mut Vec<Touched>,
    ) -> DiResult<()> {
        for field in layer.fields().iter().filter(|f| f.is_marked()) {
            self.inject_field(owner, field, target, touched)?;
        }

        if let Some(supertype) = self.catalog.supertype_of(layer) {
            let base = layer.project_to_supertype(target).ok_or_else(|| {
                DiError::TypeMismatch(format!(
                    "{} as {}",
                    layer.name(),
                    supertype.name()
                ))
            })?;
            trace!(
                type_name = owner.name(),
                supertype = supertype.name(),
                "wiring supertype fields"
            );
            self.wire_into(owner, supertype, base, touched)?;
        }
        Ok(())
    }

    fn inject_field(
        &self,
        owner: &TypeDescriptor,
        field: &FieldDescriptor,
        target: &AnyRef,
        touched: &mut Vec<Touched>,
    ) -> DiResult<()> {
        let provider = self.catalog.provider_for(field)?;

        match provider.lifetime() {
            Some(Lifetime::Prototype) => {
                let fresh = provider.instantiate()?;
                self.observers.instantiated(&provider.key(), Lifetime::Prototype);
                field.assign(target, self.provide(field, provider, fresh.clone())?)?;
                self.observers.injected(&owner.key(), field.name(), &provider.key());
                touched.extend(self.wire(provider, &fresh)?);
            }
            Some(Lifetime::Singleton) => {
                let shared = self.registry.get(&provider.key()).cloned().ok_or_else(|| {
                    DiError::Consistency(format!(
                        "singleton {} missing from registry",
                        provider.name()
                    ))
                })?;
                field.assign(target, self.provide(field, provider, shared)?)?;
                self.observers.injected(&owner.key(), field.name(), &provider.key());
            }
            None => {
                return Err(DiError::Consistency(format!(
                    "{} is not manageable",
                    provider.name()
                )))
            }
        }

        trace!(
            type_name = owner.name(),
            field = field.name(),
            provider = provider.name(),
            "field injected"
        );
        Ok(())
    }

    fn provide(&self, field: &FieldDescriptor, provider: &TypeDescriptor, instance: Instance) -> DiResult<Provided> {
        match field.injection() {
            Some(Injection::Capability { .. }) => Ok(Provided::Capability(
                provider.cast_to(&field.declared_type(), instance)?,
            )),
            _ => Ok(Provided::Instance(instance)),
        }
    }
}
