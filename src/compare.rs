use core::{cmp::Ordering, fmt, marker::PhantomData};

use bytemuck::Pod;

/// Three-way comparison over two keys of the tree's key width.
///
/// `compare(key, node_key)` answers whether `key` is less than, equal to or greater than
/// `node_key`. It must be a strict total order, otherwise the tree silently loses entries.
pub trait KeyComparator {
    fn compare(&self, key: &[u8], node_key: &[u8]) -> Ordering;

    /// The only key width this comparator can read, if it is picky about it.
    fn key_width(&self) -> Option<usize> {
        None
    }
}

impl<F> KeyComparator for F
where
    F: Fn(&[u8], &[u8]) -> Ordering,
{
    fn compare(&self, key: &[u8], node_key: &[u8]) -> Ordering {
        self(key, node_key)
    }
}

/// Byte-wise ordering, the same as `memcmp`. Big-endian integers sort numerically.
#[derive(Debug, Default, Clone, Copy)]
pub struct Lexicographic;

impl KeyComparator for Lexicographic {
    fn compare(&self, key: &[u8], node_key: &[u8]) -> Ordering {
        key.cmp(node_key)
    }
}

/// Reads both keys as a plain-old-data `K` and compares them with `K`'s own ordering.
///
/// Keys are read unaligned, so any byte buffer of `size_of::<K>()` bytes works.
pub struct PodOrd<K> {
    phantom: PhantomData<fn() -> K>,
}

impl<K> PodOrd<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phantom: PhantomData,
        }
    }
}

impl<K> Default for PodOrd<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for PodOrd<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for PodOrd<K> {}

impl<K> fmt::Debug for PodOrd<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PodOrd<{}>", core::any::type_name::<K>())
    }
}

impl<K: Pod + Ord> KeyComparator for PodOrd<K> {
    fn compare(&self, key: &[u8], node_key: &[u8]) -> Ordering {
        let key: K = bytemuck::pod_read_unaligned(key);
        let node_key: K = bytemuck::pod_read_unaligned(node_key);

        key.cmp(&node_key)
    }

    fn key_width(&self) -> Option<usize> {
        Some(size_of::<K>())
    }
}
