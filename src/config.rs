/// Construction parameters of an [`Ebony`](crate::Ebony) tree.
///
/// Both widths are fixed for the lifetime of the tree and every key or payload handed to it
/// must match them exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    pub key_width: usize,
    pub payload_width: usize,
    /// Number of nodes to reserve up front.
    pub capacity: usize,
}

impl TreeConfig {
    #[must_use]
    pub const fn new(key_width: usize, payload_width: usize) -> Self {
        Self {
            key_width,
            payload_width,
            capacity: 0,
        }
    }

    /// Sizes the configuration for plain-old-data keys and payloads.
    #[must_use]
    pub const fn for_pod<K, V>() -> Self {
        Self::new(size_of::<K>(), size_of::<V>())
    }

    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
