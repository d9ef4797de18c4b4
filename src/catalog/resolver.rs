//! Provider selection for marked fields.

use std::sync::Arc;

use tracing::trace;

use super::Catalog;
use crate::descriptors::{FieldDescriptor, Injection, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::key::Key;

impl Catalog {
    /// Picks the manageable type implementing `capability`.
    ///
    /// A type matches when it declares the capability itself or when its
    /// immediate supertype does. Capabilities declared further up the chain
    /// are not considered. The first match in discovery order wins.
    pub fn resolve_by_capability(&self, capability: &Key) -> DiResult<&Arc<TypeDescriptor>> {
        let found = self.iter().find(|descriptor| {
            descriptor.declares(capability)
                || self
                    .supertype_of(descriptor)
                    .map_or(false, |supertype| supertype.declares(capability))
        });
        match found {
            Some(descriptor) => {
                trace!(
                    capability = capability.display_name(),
                    provider = descriptor.name(),
                    "capability resolved"
                );
                Ok(descriptor)
            }
            None => Err(DiError::resolution(
                capability.display_name(),
                "no manageable type implements it",
            )),
        }
    }

    /// The descriptor that provides a value for a marked field.
    pub fn provider_for(&self, field: &FieldDescriptor) -> DiResult<&Arc<TypeDescriptor>> {
        match field.injection() {
            None => Err(DiError::Consistency(format!(
                "field `{}` has no injection marker",
                field.name()
            ))),
            Some(Injection::Concrete) => self.get(&field.declared_type()).ok_or_else(|| {
                DiError::Consistency(format!(
                    "field `{}` depends on {}, which is not a managed type",
                    field.name(),
                    field.declared_type().display_name()
                ))
            }),
            Some(Injection::Capability { target: Some(target) }) => {
                self.get(&target).ok_or_else(|| {
                    DiError::resolution(
                        field.declared_type().display_name(),
                        format!("target {} is not a managed type", target.display_name()),
                    )
                })
            }
            Some(Injection::Capability { target: None }) => {
                self.resolve_by_capability(&field.declared_type())
            }
        }
    }
}
