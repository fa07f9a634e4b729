use log::{error, trace};

use crate::{
    Ebony, EbonyError, Fixup, KeyComparator, NodeColor, ParentSide, Result, node::NodeIndex,
};

/// Repair step for a red node that may sit below a red parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InsertCase {
    /// The node is the root, or its parent is black.
    Balanced,
    /// Parent and uncle are both red.
    RedUncle,
    /// The red parent is the root itself. Linking colors the root black, so only a tree
    /// repainted by hand gets here.
    RedRootParent,
    /// Black uncle, node and parent hang on opposite sides.
    Triangle,
    /// Black uncle, node and parent hang on the same side.
    Line,
}

/// Relatives of the node being repaired, looked up fresh on every step.
#[derive(Debug, Clone, Copy)]
struct Family {
    parent: NodeIndex,
    grandparent: NodeIndex,
    uncle: NodeIndex,
}

impl<C: KeyComparator> Ebony<C> {
    fn family(&self, node_idx: NodeIndex) -> Family {
        let parent = self.get_node_by_idx(node_idx).parent;
        let parent_node = self.get_node_by_idx(parent);
        let grandparent = parent_node.parent;
        let uncle = self
            .get_node_by_idx(grandparent)
            .child(parent_node.side.opposite());

        Family {
            parent,
            grandparent,
            uncle,
        }
    }

    fn insert_case(&self, node_idx: NodeIndex, family: &Family) -> Result<InsertCase> {
        let node = self.get_node_by_idx(node_idx);

        if matches!(node.side, ParentSide::Root) || !self.is_red(family.parent) {
            return Ok(InsertCase::Balanced);
        }

        let parent_side = self.get_node_by_idx(family.parent).side;
        if matches!(parent_side, ParentSide::Root) {
            return Ok(InsertCase::RedRootParent);
        }

        // a red parent below the root always has a black grandparent
        if family.grandparent.is_nil() || self.is_red(family.grandparent) {
            error!("red parent under a red or missing grandparent");
            return Err(EbonyError::InvalidState(Fixup::Insert));
        }

        if self.is_red(family.uncle) {
            Ok(InsertCase::RedUncle)
        } else if node.side == parent_side {
            Ok(InsertCase::Line)
        } else {
            Ok(InsertCase::Triangle)
        }
    }

    /// Restores the red-black invariants after `start_node_idx` was linked in as a red leaf.
    pub(crate) fn fix_red_violation(&mut self, start_node_idx: NodeIndex) -> Result<()> {
        let mut curr_node = start_node_idx;

        loop {
            let family = self.family(curr_node);
            let case = self.insert_case(curr_node, &family)?;
            trace!("insert fixup at {curr_node:?}: {case:?}");

            match case {
                InsertCase::Balanced => return Ok(()),
                InsertCase::RedUncle => {
                    self.set_color(family.parent, NodeColor::Black);
                    self.set_color(family.uncle, NodeColor::Black);
                    if family.grandparent != self.root {
                        self.set_color(family.grandparent, NodeColor::Red);
                    }

                    curr_node = family.grandparent;
                }
                InsertCase::RedRootParent => {
                    self.set_color(family.parent, NodeColor::Black);
                    return Ok(());
                }
                InsertCase::Triangle => {
                    let node_side = self.get_node_by_idx(curr_node).side;
                    self.rotate_up(family.parent, node_side);

                    // the old parent is now the lower red of a line
                    curr_node = family.parent;
                }
                InsertCase::Line => {
                    let node_side = self.get_node_by_idx(curr_node).side;
                    self.rotate_up(family.grandparent, node_side);

                    self.set_color(family.grandparent, NodeColor::Red);
                    self.set_color(family.parent, NodeColor::Black);
                    return Ok(());
                }
            }
        }
    }
}
