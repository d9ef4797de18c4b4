//! Singleton registry.

use crate::descriptors::Instance;
use crate::error::{DiError, DiResult};
use crate::key::{Key, KeyMap};

/// Mapping from singleton type to its single live instance.
///
/// Filled during phase 1 with bare instances, before any field is injected,
/// and read-only afterwards. Insertion order is kept so phase 2 visits
/// singletons in discovery order.
#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<(Key, Instance)>,
    index: KeyMap<usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds the instance for `key`; each key is populated exactly once.
    pub(crate) fn insert(&mut self, key: Key, instance: Instance) -> DiResult<()> {
        if self.index.contains_key(&key) {
            return Err(DiError::Consistency(format!(
                "singleton {} registered twice",
                key.display_name()
            )));
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((key, instance));
        Ok(())
    }

    #[inline]
    pub(crate) fn get(&self, key: &Key) -> Option<&Instance> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Instance)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
