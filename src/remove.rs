use log::{error, trace};

use crate::{
    Ebony, EbonyError, EbonyNode, Fixup, KeyComparator, NodeColor, ParentSide, Result,
    node::NodeIndex,
};

/// Repair step for a slot that is one black node short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoveCase {
    /// The deficient slot is the root, or holds a red node that can simply turn black.
    Absorbed,
    /// Red sibling.
    RedSibling,
    /// Black sibling with two black children.
    BlackNephews,
    /// Black sibling, red child on the side facing the deficiency, black far child.
    RedCloseNephew,
    /// Black sibling with a red child on the side away from the deficiency.
    RedFarNephew,
}

/// Where the missing black sits: `position` is the `side` child of `parent`.
///
/// `position` may be the sentinel when the removed node left an empty slot behind.
#[derive(Debug, Clone, Copy)]
struct Deficiency {
    position: NodeIndex,
    parent: NodeIndex,
    side: ParentSide,
}

impl<C: KeyComparator> Ebony<C> {
    /// Detaches `node_idx` from the tree, rebalances, and returns the node.
    pub(crate) fn unlink_node(&mut self, node_idx: NodeIndex) -> Result<EbonyNode> {
        let node = self.get_node_by_idx(node_idx);
        let (left, right) = (node.left_child(), node.right_child());

        let deficiency = if !left.is_nil() && !right.is_nil() {
            self.splice_predecessor(node_idx)
        } else if !left.is_nil() || !right.is_nil() {
            let child = if left.is_nil() { right } else { left };

            self.transplant(node_idx, child);
            self.set_color(child, NodeColor::Black);
            None
        } else {
            let (parent, side, color) = (node.parent, node.side, node.color);

            self.transplant(node_idx, Self::BLACK_NIL);

            (matches!(color, NodeColor::Black) && !matches!(side, ParentSide::Root)).then_some(
                Deficiency {
                    position: Self::BLACK_NIL,
                    parent,
                    side,
                },
            )
        };

        let node = self.release_slot(node_idx);
        self.len -= 1;

        if let Some(deficiency) = deficiency {
            self.fix_black_deficiency(deficiency)?;
        }

        Ok(node)
    }

    /// Replaces `node_idx`, which has two children, with the maximum of its left subtree.
    ///
    /// Returns the deficiency left behind when the predecessor was black.
    fn splice_predecessor(&mut self, node_idx: NodeIndex) -> Option<Deficiency> {
        let predecessor = self.subtree_max(self.get_node_by_idx(node_idx).left_child());
        let pred_node = self.get_node_by_idx(predecessor);
        let (child, pred_color) = (pred_node.left_child(), pred_node.color);
        let (mut parent, side) = (pred_node.parent, pred_node.side);

        self.transplant(predecessor, child);
        if parent == node_idx {
            parent = predecessor;
        }

        let node = self.get_node_by_idx(node_idx);
        let (left, right, color) = (node.left_child(), node.right_child(), node.color);

        let pred_node = self.get_node_by_idx_mut(predecessor);
        pred_node.left = left;
        pred_node.right = right;
        pred_node.color = color;

        for (child_idx, child_side) in [(left, ParentSide::Left), (right, ParentSide::Right)] {
            if !child_idx.is_nil() {
                let child_node = self.get_node_by_idx_mut(child_idx);
                child_node.parent = predecessor;
                child_node.side = child_side;
            }
        }

        self.transplant(node_idx, predecessor);

        matches!(pred_color, NodeColor::Black).then_some(Deficiency {
            position: child,
            parent,
            side,
        })
    }

    fn remove_case(&self, deficiency: &Deficiency) -> Result<RemoveCase> {
        if matches!(deficiency.side, ParentSide::Root) || self.is_red(deficiency.position) {
            return Ok(RemoveCase::Absorbed);
        }

        let sibling = self
            .get_node_by_idx(deficiency.parent)
            .child(deficiency.side.opposite());

        // the sibling subtree carries at least one black node the deficient side lost
        if sibling.is_nil() {
            error!("black deficiency under {:?} without a sibling", deficiency.parent);
            return Err(EbonyError::InvalidState(Fixup::Remove));
        }

        if self.is_red(sibling) {
            return Ok(RemoveCase::RedSibling);
        }

        let sibling_node = self.get_node_by_idx(sibling);
        let close = sibling_node.child(deficiency.side);
        let far = sibling_node.child(deficiency.side.opposite());

        match (self.is_red(close), self.is_red(far)) {
            (false, false) => Ok(RemoveCase::BlackNephews),
            (true, false) => Ok(RemoveCase::RedCloseNephew),
            (_, true) => Ok(RemoveCase::RedFarNephew),
        }
    }

    /// Pushes a missing black node up the tree until a red node or a rotation absorbs it.
    fn fix_black_deficiency(&mut self, mut deficiency: Deficiency) -> Result<()> {
        loop {
            let case = self.remove_case(&deficiency)?;
            trace!("remove fixup at {deficiency:?}: {case:?}");

            let Deficiency {
                position,
                parent,
                side,
            } = deficiency;
            let sibling_side = side.opposite();

            match case {
                RemoveCase::Absorbed => {
                    if !position.is_nil() {
                        self.set_color(position, NodeColor::Black);
                    }
                    return Ok(());
                }
                RemoveCase::RedSibling => {
                    let sibling = self.get_node_by_idx(parent).child(sibling_side);

                    self.set_color(sibling, NodeColor::Black);
                    self.set_color(parent, NodeColor::Red);
                    self.rotate_up(parent, sibling_side);
                }
                RemoveCase::BlackNephews => {
                    let sibling = self.get_node_by_idx(parent).child(sibling_side);
                    self.set_color(sibling, NodeColor::Red);

                    if self.is_red(parent) {
                        self.set_color(parent, NodeColor::Black);
                        return Ok(());
                    }

                    let parent_node = self.get_node_by_idx(parent);
                    deficiency = Deficiency {
                        position: parent,
                        parent: parent_node.parent,
                        side: parent_node.side,
                    };
                }
                RemoveCase::RedCloseNephew => {
                    let sibling = self.get_node_by_idx(parent).child(sibling_side);
                    let close = self.get_node_by_idx(sibling).child(side);

                    self.set_color(close, NodeColor::Black);
                    self.set_color(sibling, NodeColor::Red);
                    self.rotate_up(sibling, side);
                }
                RemoveCase::RedFarNephew => {
                    let sibling = self.get_node_by_idx(parent).child(sibling_side);
                    let far = self.get_node_by_idx(sibling).child(sibling_side);

                    self.set_color(sibling, self.color_of(parent));
                    self.set_color(parent, NodeColor::Black);
                    self.set_color(far, NodeColor::Black);
                    self.rotate_up(parent, sibling_side);
                    return Ok(());
                }
            }
        }
    }
}
