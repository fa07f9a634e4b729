use alloc::boxed::Box;

/// Position of a node inside the tree arena.
///
/// Index 0 is reserved for the black sentinel standing in for every absent child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    pub(crate) const BLACK_NIL: NodeIndex = NodeIndex(0);

    pub(crate) fn is_nil(self) -> bool {
        self == Self::BLACK_NIL
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Which slot of its parent a node occupies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ParentSide {
    #[default]
    Root,
    Left,
    Right,
}

impl ParentSide {
    /// The other child slot. The root has no sibling side and maps to itself.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            ParentSide::Root => ParentSide::Root,
            ParentSide::Left => ParentSide::Right,
            ParentSide::Right => ParentSide::Left,
        }
    }
}

/// A single entry of an [`Ebony`](crate::Ebony) tree.
///
/// The node owns its own copy of the key and of the payload. Links are arena indices and are
/// only meaningful while the node sits in a tree; a node handed out by
/// [`Ebony::unlink`](crate::Ebony::unlink) has them cleared.
#[derive(Debug)]
pub struct EbonyNode {
    key: Box<[u8]>,
    payload: Box<[u8]>,
    pub(crate) color: NodeColor,
    pub(crate) side: ParentSide,
    pub(crate) parent: NodeIndex,
    pub(crate) left: NodeIndex,
    pub(crate) right: NodeIndex,
}

impl EbonyNode {
    pub(crate) fn new_isolated(key: Box<[u8]>, payload: Box<[u8]>) -> Self {
        Self {
            key,
            payload,
            color: NodeColor::default(),
            side: ParentSide::default(),
            parent: NodeIndex::BLACK_NIL,
            left: NodeIndex::BLACK_NIL,
            right: NodeIndex::BLACK_NIL,
        }
    }

    /// The sentinel, and every vacated arena slot, is an empty black node.
    ///
    /// Vacated slots chain the free list through `parent`.
    pub(crate) fn vacant(next_free: NodeIndex) -> Self {
        Self {
            key: Box::default(),
            payload: Box::default(),
            color: NodeColor::Black,
            side: ParentSide::Root,
            parent: next_free,
            left: NodeIndex::BLACK_NIL,
            right: NodeIndex::BLACK_NIL,
        }
    }

    pub(crate) fn into_detached(mut self) -> Self {
        self.side = ParentSide::Root;
        self.parent = NodeIndex::BLACK_NIL;
        self.left = NodeIndex::BLACK_NIL;
        self.right = NodeIndex::BLACK_NIL;
        self
    }

    pub(crate) fn child(&self, side: ParentSide) -> NodeIndex {
        match side {
            ParentSide::Left => self.left,
            ParentSide::Right => self.right,
            ParentSide::Root => NodeIndex::BLACK_NIL,
        }
    }

    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }

    pub(crate) fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.payload
    }

    #[must_use]
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    #[must_use]
    pub fn color(&self) -> NodeColor {
        self.color
    }

    #[must_use]
    pub fn is_red(&self) -> bool {
        matches!(self.color, NodeColor::Red)
    }

    /// The slot this node occupied under its parent, or [`ParentSide::Root`].
    #[must_use]
    pub fn parent_side(&self) -> ParentSide {
        self.side
    }

    /// Consumes the node, returning its key and payload storage.
    #[must_use]
    pub fn into_parts(self) -> (Box<[u8]>, Box<[u8]>) {
        (self.key, self.payload)
    }
}
