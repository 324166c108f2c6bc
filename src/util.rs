//! Debug-only invariant checking and other small helpers shared across
//! builders.
//!
//! [`debug_assert_invariants`] is only ever called when the `invariant-checks`
//! feature is enabled (see [`crate::tree::SuffixTree::add`]); it never runs,
//! and therefore never costs anything, in a default release build.

use std::hash::Hash;

use crate::node::{NodeKind, ROOT};
use crate::symbol::Symbol;
use crate::tree::SuffixTree;

/// Walk the whole arena and panic, naming the specific broken invariant,
/// the moment one of the tree's structural invariants fails.
pub(crate) fn debug_assert_invariants<Id, T>(tree: &SuffixTree<Id, T>)
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    let total_len: usize = tree.sequences.iter().map(|s| s.len()).sum();
    let node_count = tree.nodes.len();
    assert!(
        node_count <= 2 * total_len.max(1) + 2,
        "invariant 6 (node count bound) violated: {node_count} nodes for total length {total_len}"
    );

    for (id, node) in tree.nodes.iter().enumerate() {
        if id == ROOT || id == crate::node::AUX {
            continue;
        }

        match &node.kind {
            NodeKind::Internal { children, .. } => {
                assert!(
                    children.len() >= 2,
                    "invariant 1 (no redundant internals) violated at node {id}: only {} children",
                    children.len()
                );

                for (key, child) in children.entries() {
                    let child_node = &tree.nodes[child];
                    let first = tree.symbol_at(child_node.seq_id, child_node.start);
                    assert!(
                        *key == first,
                        "invariant 2 (edge-key consistency) violated: node {child} keyed \
                         inconsistently with its own incoming edge under parent {id}"
                    );
                }
            }
            NodeKind::Leaf { .. } => {}
        }

        if let Some(parent) = node.parent {
            let edge_len = node.edge_len();
            assert!(
                edge_len >= 1,
                "invariant 3 (depth monotonicity) violated at node {id}: incoming edge has length 0"
            );
            assert_eq!(
                tree.depth_of(id),
                tree.nodes[parent].string_depth + edge_len,
                "invariant 3 (depth monotonicity) violated at node {id}"
            );
        }
    }
}
