use core::cmp::Ordering;

use simplelog::{Config, LevelFilter, TestLogger};

use crate::{Ebony, KeyComparator, NodeColor, ParentSide, node::NodeIndex};

pub(crate) fn init_logging() {
    let _ = TestLogger::init(LevelFilter::Trace, Config::default());
}

#[derive(Debug)]
pub(crate) struct Stats {
    pub(crate) height: usize,
    pub(crate) black_height: usize,
    pub(crate) keys: Vec<Vec<u8>>,
}

/// Keys in order, gathered with an explicit stack.
pub(crate) fn in_order<C: KeyComparator>(tree: &Ebony<C>) -> Vec<Vec<u8>> {
    let mut keys = Vec::new();
    let mut stack = Vec::new();
    let mut curr = tree.root;

    loop {
        while !curr.is_nil() {
            stack.push(curr);
            curr = tree.get_node_by_idx(curr).left_child();
        }

        let Some(node) = stack.pop() else {
            return keys;
        };
        keys.push(tree.get_node_by_idx(node).key().to_vec());
        curr = tree.get_node_by_idx(node).right_child();
    }
}

/// Asserts every structural and red-black invariant of `tree`.
pub(crate) fn validate<C: KeyComparator>(tree: &Ebony<C>) -> Stats {
    assert_eq!(
        tree.color_of(tree.root),
        NodeColor::Black,
        "root must be black"
    );

    if !tree.root.is_nil() {
        let root = tree.get_node_by_idx(tree.root);
        assert_eq!(root.parent_side(), ParentSide::Root);
        assert!(root.parent.is_nil(), "root has no parent");
    }

    let (height, black_height) = check_subtree(tree, tree.root);

    let keys = in_order(tree);
    for pair in keys.windows(2) {
        assert_eq!(
            tree.comparator.compare(&pair[0], &pair[1]),
            Ordering::Less,
            "keys must be strictly increasing"
        );
    }
    assert_eq!(keys.len(), tree.len(), "count must match reachable keys");

    Stats {
        height,
        black_height,
        keys,
    }
}

/// Returns `(height, black_height)` of the subtree at `node_idx`.
fn check_subtree<C: KeyComparator>(tree: &Ebony<C>, node_idx: NodeIndex) -> (usize, usize) {
    if node_idx.is_nil() {
        return (0, 1);
    }

    let node = tree.get_node_by_idx(node_idx);
    assert_eq!(node.key().len(), tree.key_width());
    assert_eq!(node.payload().len(), tree.payload_width());

    for (child, side) in [
        (node.left_child(), ParentSide::Left),
        (node.right_child(), ParentSide::Right),
    ] {
        if child.is_nil() {
            continue;
        }

        let child_node = tree.get_node_by_idx(child);
        assert_eq!(child_node.parent, node_idx, "child must point back at parent");
        assert_eq!(child_node.parent_side(), side, "side tag must match slot");
        if node.is_red() {
            assert!(!child_node.is_red(), "red node with red child");
        }
    }

    let (left_height, left_black) = check_subtree(tree, node.left_child());
    let (right_height, right_black) = check_subtree(tree, node.right_child());
    assert_eq!(left_black, right_black, "black-height must be uniform");

    let own_black = usize::from(!node.is_red());
    (left_height.max(right_height) + 1, left_black + own_black)
}
