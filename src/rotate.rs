use crate::{Ebony, KeyComparator, ParentSide, node::NodeIndex};

impl<C: KeyComparator> Ebony<C> {
    /// Points `parent`'s `side` slot at `child`, or makes `child` the root.
    ///
    /// Only the downward link is written; `child`'s own parent and side are the caller's job.
    pub(crate) fn replace_child(&mut self, parent: NodeIndex, side: ParentSide, child: NodeIndex) {
        match side {
            ParentSide::Root => self.root = child,
            ParentSide::Left => self.get_node_by_idx_mut(parent).left = child,
            ParentSide::Right => self.get_node_by_idx_mut(parent).right = child,
        }
    }

    fn attach(&mut self, parent: NodeIndex, side: ParentSide, child: NodeIndex) {
        self.replace_child(parent, side, child);

        if !child.is_nil() {
            let child_node = self.get_node_by_idx_mut(child);
            child_node.parent = parent;
            child_node.side = side;
        }
    }

    pub(crate) fn rotate_left(&mut self, center: NodeIndex) {
        let center_node = self.get_node_by_idx(center);
        let (grandparent_idx, side) = (center_node.parent, center_node.side);
        let sibling_idx = center_node.right_child();
        debug_assert!(!sibling_idx.is_nil(), "left rotation needs a right child");

        let c_idx = self.get_node_by_idx(sibling_idx).left_child();

        self.attach(center, ParentSide::Right, c_idx);
        self.attach(grandparent_idx, side, sibling_idx);
        self.attach(sibling_idx, ParentSide::Left, center);
    }

    pub(crate) fn rotate_right(&mut self, center: NodeIndex) {
        let center_node = self.get_node_by_idx(center);
        let (grandparent_idx, side) = (center_node.parent, center_node.side);
        let sibling_idx = center_node.left_child();
        debug_assert!(!sibling_idx.is_nil(), "right rotation needs a left child");

        let c_idx = self.get_node_by_idx(sibling_idx).right_child();

        self.attach(center, ParentSide::Left, c_idx);
        self.attach(grandparent_idx, side, sibling_idx);
        self.attach(sibling_idx, ParentSide::Right, center);
    }

    /// Rotates `center` so that its child on `side` is lifted into its place.
    pub(crate) fn rotate_up(&mut self, center: NodeIndex, side: ParentSide) {
        match side {
            ParentSide::Left => self.rotate_right(center),
            ParentSide::Right => self.rotate_left(center),
            ParentSide::Root => unreachable!("rotations always lift a child"),
        }
    }

    /// Puts `replacement` (possibly the sentinel) into the slot `target` occupies.
    ///
    /// `target` keeps its own links; it is the caller's job to either splice it elsewhere or
    /// release it.
    pub(crate) fn transplant(&mut self, target: NodeIndex, replacement: NodeIndex) {
        let target_node = self.get_node_by_idx(target);
        let (parent, side) = (target_node.parent, target_node.side);

        self.attach(parent, side, replacement);
    }

    /// Right-most node of the subtree rooted at `node_idx`.
    pub(crate) fn subtree_max(&self, mut node_idx: NodeIndex) -> NodeIndex {
        loop {
            let right = self.get_node_by_idx(node_idx).right_child();
            if right.is_nil() {
                return node_idx;
            }
            node_idx = right;
        }
    }
}
