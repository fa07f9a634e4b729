use core::marker::PhantomData;

use bytemuck::Pod;

use crate::{Ebony, EbonyError, PodOrd, Result};

/// An associative array, storing plain-old-data key-value pairs.
///
/// Uses an Ebony red-black tree whose keys and payloads are the raw bytes of `K` and `V`.
pub struct EbonyMap<K, V> {
    tree: Ebony<PodOrd<K>>,
    phantom: PhantomData<fn() -> V>,
}

impl<K: Pod + Ord, V: Pod> EbonyMap<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: Ebony::for_pod_keys(size_of::<V>()),
            phantom: PhantomData,
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains(bytemuck::bytes_of(key))
    }

    /// Inserts or overwrites the value under `key`, returning the previous value.
    ///
    /// # Errors
    ///
    /// [`EbonyError::AllocationFailure`] if a new entry cannot be allocated.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        let previous = self.get(&key);

        self.tree
            .upsert(bytemuck::bytes_of(&key), bytemuck::bytes_of(&value))?;

        Ok(previous)
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.tree
            .get(bytemuck::bytes_of(key))
            .ok()
            .map(bytemuck::pod_read_unaligned)
    }

    /// Removes `key`, returning its value if it was present.
    ///
    /// # Errors
    ///
    /// [`EbonyError::InvalidState`] if rebalancing found the tree corrupted.
    pub fn remove(&mut self, key: &K) -> Result<Option<V>> {
        match self.tree.unlink(bytemuck::bytes_of(key)) {
            Ok(node) => Ok(Some(bytemuck::pod_read_unaligned(node.payload()))),
            Err(EbonyError::KeyNotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }
}

impl<K: Pod + Ord, V: Pod> Default for EbonyMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
