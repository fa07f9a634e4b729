//! Red-black tree over fixed-width byte keys and payloads.
//!
//! An [`Ebony`] tree stores opaque keys of a fixed byte width, each mapped to an opaque payload of
//! a fixed byte width. Ordering is supplied per tree through a [`KeyComparator`]. Nodes live in an
//! index-addressed arena, the tree owns a private copy of every key and payload, and the height
//! stays below `2 * log2(n + 1)`.
//!
//! ```
//! use ebony::{Ebony, PodOrd};
//!
//! let mut tree = Ebony::new(4, 2, PodOrd::<u32>::new()).unwrap();
//! tree.upsert(&7u32.to_ne_bytes(), b"hi").unwrap();
//!
//! assert_eq!(tree.get(&7u32.to_ne_bytes()).unwrap(), b"hi");
//! assert!(tree.remove(&8u32.to_ne_bytes()).is_err());
//! ```

extern crate alloc;

use alloc::{boxed::Box, vec::Vec};
use core::cmp::Ordering;

use log::debug;

mod compare;
mod config;
mod error;
mod insert;
mod map;
mod node;
mod remove;
mod rotate;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod validate;

pub use compare::{KeyComparator, Lexicographic, PodOrd};
pub use config::TreeConfig;
pub use error::{EbonyError, ErrorClass, Fixup, Operand, Result};
pub use map::EbonyMap;
pub use node::{EbonyNode, NodeColor, ParentSide};

use node::NodeIndex;

/// Outcome of walking the tree for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    Empty,
    Found(NodeIndex),
    /// `key` would be linked as the `side` child of `parent`.
    Vacant {
        parent: NodeIndex,
        side: ParentSide,
    },
}

/// A red-black tree mapping fixed-width keys to fixed-width payloads.
#[derive(Debug)]
pub struct Ebony<C> {
    storage: Vec<EbonyNode>,
    root: NodeIndex,
    free_head: NodeIndex,
    len: usize,
    key_width: usize,
    payload_width: usize,
    comparator: C,
}

impl<C: KeyComparator> Ebony<C> {
    const BLACK_NIL: NodeIndex = NodeIndex::BLACK_NIL;

    /// Creates an empty tree.
    ///
    /// # Errors
    ///
    /// [`EbonyError::WidthMismatch`] if `comparator` can only read keys of another width.
    pub fn new(key_width: usize, payload_width: usize, comparator: C) -> Result<Self> {
        match comparator.key_width() {
            Some(expected) if expected != key_width => Err(EbonyError::WidthMismatch {
                what: Operand::Key,
                expected,
                actual: key_width,
            }),
            _ => Ok(Self::empty(key_width, payload_width, comparator)),
        }
    }

    fn empty(key_width: usize, payload_width: usize, comparator: C) -> Self {
        Self {
            storage: alloc::vec![EbonyNode::vacant(Self::BLACK_NIL)],
            root: Self::BLACK_NIL,
            free_head: Self::BLACK_NIL,
            len: 0,
            key_width,
            payload_width,
            comparator,
        }
    }

    /// Creates a tree and reserves room for `config.capacity` nodes.
    ///
    /// # Errors
    ///
    /// [`EbonyError::WidthMismatch`] as for [`Ebony::new`], [`EbonyError::AllocationFailure`] if
    /// the reservation is refused.
    pub fn with_config(config: TreeConfig, comparator: C) -> Result<Self> {
        let mut tree = Self::new(config.key_width, config.payload_width, comparator)?;
        tree.reserve(config.capacity)?;

        Ok(tree)
    }

    /// Reserves room for at least `additional` more nodes.
    ///
    /// # Errors
    ///
    /// [`EbonyError::AllocationFailure`] if the arena cannot grow.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.storage.try_reserve(additional)?;
        debug!(
            "reserved {additional} nodes, arena capacity is now {}",
            self.storage.capacity()
        );

        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn key_width(&self) -> usize {
        self.key_width
    }

    #[must_use]
    pub fn payload_width(&self) -> usize {
        self.payload_width
    }

    pub fn contains(&self, key: &[u8]) -> bool {
        self.find(key).is_ok()
    }

    /// Returns a copy of the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// [`EbonyError::KeyNotFound`] if the key is absent, [`EbonyError::WidthMismatch`] if `key`
    /// has the wrong width, [`EbonyError::AllocationFailure`] if the copy cannot be allocated.
    pub fn get_value(&self, key: &[u8]) -> Result<Vec<u8>> {
        let payload = self.get(key)?;

        let mut copy = Vec::new();
        copy.try_reserve_exact(payload.len())?;
        copy.extend_from_slice(payload);

        Ok(copy)
    }

    /// Copies the payload stored under `key` into `buf`, which must be exactly one payload wide.
    ///
    /// # Errors
    ///
    /// [`EbonyError::KeyNotFound`] if the key is absent, [`EbonyError::WidthMismatch`] if `key`
    /// or `buf` has the wrong width.
    pub fn copy_value_into(&self, key: &[u8], buf: &mut [u8]) -> Result<()> {
        self.check_width(Operand::Payload, buf.len())?;
        buf.copy_from_slice(self.get(key)?);

        Ok(())
    }

    /// Returns a reference to the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// [`EbonyError::KeyNotFound`] if the key is absent, [`EbonyError::WidthMismatch`] if `key`
    /// has the wrong width.
    pub fn get(&self, key: &[u8]) -> Result<&[u8]> {
        self.get_node(key).map(EbonyNode::payload)
    }

    /// Returns a mutable reference to the payload stored under `key`.
    ///
    /// # Errors
    ///
    /// Same as [`Ebony::get`].
    pub fn get_mut(&mut self, key: &[u8]) -> Result<&mut [u8]> {
        let idx = self.find(key)?;

        Ok(self.get_node_by_idx_mut(idx).payload_mut())
    }

    /// Returns the node holding `key`.
    ///
    /// # Errors
    ///
    /// Same as [`Ebony::get`].
    pub fn get_node(&self, key: &[u8]) -> Result<&EbonyNode> {
        let idx = self.find(key)?;

        Ok(self.get_node_by_idx(idx))
    }

    /// Inserts `payload` under `key`, or overwrites the payload if `key` is already present.
    ///
    /// Returns the node now holding the entry.
    ///
    /// # Errors
    ///
    /// [`EbonyError::WidthMismatch`] for badly sized arguments, [`EbonyError::AllocationFailure`]
    /// when a new node cannot be allocated; in both cases the tree is unchanged.
    /// [`EbonyError::InvalidState`] if rebalancing found the tree corrupted.
    pub fn upsert(&mut self, key: &[u8], payload: &[u8]) -> Result<&EbonyNode> {
        self.check_width(Operand::Key, key.len())?;
        self.check_width(Operand::Payload, payload.len())?;

        let (parent, side) = match self.traverse(key) {
            Probe::Found(idx) => {
                let node = self.get_node_by_idx_mut(idx);
                node.payload_mut().copy_from_slice(payload);

                return Ok(self.get_node_by_idx(idx));
            }
            Probe::Vacant { parent, side } => (parent, side),
            Probe::Empty => (Self::BLACK_NIL, ParentSide::Root),
        };

        let new_node_pos = self.allocate_node(key, payload)?;
        self.link_node(new_node_pos, parent, side);
        self.len += 1;

        self.fix_red_violation(new_node_pos)?;

        Ok(self.get_node_by_idx(new_node_pos))
    }

    /// Removes the entry stored under `key` and releases its storage.
    ///
    /// # Errors
    ///
    /// Same as [`Ebony::unlink`].
    pub fn remove(&mut self, key: &[u8]) -> Result<()> {
        self.unlink(key).map(drop)
    }

    /// Detaches the entry stored under `key` and hands the node to the caller.
    ///
    /// # Errors
    ///
    /// [`EbonyError::KeyNotFound`] if the key is absent, [`EbonyError::WidthMismatch`] if `key`
    /// has the wrong width. [`EbonyError::InvalidState`] if rebalancing found the tree corrupted.
    pub fn unlink(&mut self, key: &[u8]) -> Result<EbonyNode> {
        let idx = self.find(key)?;

        self.unlink_node(idx)
    }

    /// Removes every entry. The tree stays usable and keeps its arena capacity.
    pub fn clear(&mut self) {
        debug!("clearing tree of {} entries", self.len);

        self.release_subtree(self.root);
        self.storage.truncate(1);
        self.root = Self::BLACK_NIL;
        self.free_head = Self::BLACK_NIL;
        self.len = 0;
    }

    /// Removes every entry and consumes the tree.
    pub fn destroy(mut self) {
        self.clear();
    }

    /// Post-order release of every node below and including `node_idx`.
    fn release_subtree(&mut self, node_idx: NodeIndex) {
        if node_idx.is_nil() {
            return;
        }

        let node = self.get_node_by_idx(node_idx);
        let (left, right) = (node.left_child(), node.right_child());

        self.release_subtree(left);
        self.release_subtree(right);

        drop(core::mem::replace(
            &mut self.storage[node_idx.0],
            EbonyNode::vacant(Self::BLACK_NIL),
        ));
    }

    pub(crate) fn traverse(&self, key: &[u8]) -> Probe {
        let mut current_node = self.root;

        if current_node.is_nil() {
            return Probe::Empty;
        }

        loop {
            let curr_node_storage = self.get_node_by_idx(current_node);

            let side = match self.comparator.compare(key, curr_node_storage.key()) {
                Ordering::Less => ParentSide::Left,
                Ordering::Equal => return Probe::Found(current_node),
                Ordering::Greater => ParentSide::Right,
            };

            let next = curr_node_storage.child(side);
            if next.is_nil() {
                return Probe::Vacant {
                    parent: current_node,
                    side,
                };
            }

            current_node = next;
        }
    }

    fn find(&self, key: &[u8]) -> Result<NodeIndex> {
        self.check_width(Operand::Key, key.len())?;

        match self.traverse(key) {
            Probe::Found(idx) => Ok(idx),
            Probe::Empty | Probe::Vacant { .. } => Err(EbonyError::KeyNotFound),
        }
    }

    fn check_width(&self, what: Operand, actual: usize) -> Result<()> {
        let expected = match what {
            Operand::Key => self.key_width,
            Operand::Payload => self.payload_width,
        };

        if actual == expected {
            Ok(())
        } else {
            Err(EbonyError::WidthMismatch {
                what,
                expected,
                actual,
            })
        }
    }

    /// Copies `key` and `payload` into a fresh red node and places it in the arena.
    ///
    /// Nothing in the tree topology is touched, so a failure here leaves the tree as it was.
    fn allocate_node(&mut self, key: &[u8], payload: &[u8]) -> Result<NodeIndex> {
        let node = EbonyNode::new_isolated(copy_bytes(key)?, copy_bytes(payload)?);

        if !self.free_head.is_nil() {
            let slot = self.free_head;
            self.free_head = self.get_node_by_idx(slot).parent;
            self.storage[slot.0] = node;

            return Ok(slot);
        }

        self.storage.try_reserve(1)?;
        self.storage.push(node);

        Ok(NodeIndex(self.storage.len() - 1))
    }

    fn link_node(&mut self, node_idx: NodeIndex, parent: NodeIndex, side: ParentSide) {
        let node = self.get_node_by_idx_mut(node_idx);
        node.parent = parent;
        node.side = side;

        if matches!(side, ParentSide::Root) {
            node.color = NodeColor::Black;
        }

        self.replace_child(parent, side, node_idx);
    }

    /// Moves a detached node out of the arena and pushes its slot onto the free list.
    pub(crate) fn release_slot(&mut self, node_idx: NodeIndex) -> EbonyNode {
        let vacant = EbonyNode::vacant(self.free_head);
        self.free_head = node_idx;

        core::mem::replace(&mut self.storage[node_idx.0], vacant).into_detached()
    }

    pub(crate) fn get_node_by_idx(&self, node_idx: NodeIndex) -> &EbonyNode {
        &self.storage[node_idx.0]
    }

    pub(crate) fn get_node_by_idx_mut(&mut self, node_idx: NodeIndex) -> &mut EbonyNode {
        &mut self.storage[node_idx.0]
    }

    /// Color of `node_idx`, with absent children reading as black.
    pub(crate) fn color_of(&self, node_idx: NodeIndex) -> NodeColor {
        if node_idx.is_nil() {
            NodeColor::Black
        } else {
            self.get_node_by_idx(node_idx).color
        }
    }

    pub(crate) fn set_color(&mut self, node_idx: NodeIndex, color: NodeColor) {
        debug_assert!(!node_idx.is_nil(), "the sentinel is always black");
        self.get_node_by_idx_mut(node_idx).color = color;
    }

    pub(crate) fn is_red(&self, node_idx: NodeIndex) -> bool {
        matches!(self.color_of(node_idx), NodeColor::Red)
    }
}

impl<K> Ebony<PodOrd<K>>
where
    K: bytemuck::Pod + Ord,
{
    /// A tree keyed by `K` in its natural order, carrying payloads of `payload_width` bytes.
    #[must_use]
    pub fn for_pod_keys(payload_width: usize) -> Self {
        Self::empty(size_of::<K>(), payload_width, PodOrd::new())
    }
}

fn copy_bytes(src: &[u8]) -> Result<Box<[u8]>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(src.len())?;
    buf.extend_from_slice(src);

    Ok(buf.into_boxed_slice())
}
