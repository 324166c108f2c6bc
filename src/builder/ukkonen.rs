//! Ukkonen's on-line linear-time construction: one phase
//! per symbol of the new sequence, maintaining an active point and a
//! remainder counter, and exploiting the open-ended leaf edges of
//! [`crate::node::EdgeEnd::Growing`] ("Trick 3") so that every already-
//! existing leaf is extended in `O(1)` per phase rather than revisited.

use std::cell::Cell;
use std::hash::Hash;
use std::rc::Rc;

use crate::node::{EdgeEnd, Node, NodeId, ROOT};
use crate::symbol::{Elem, SequenceId, Symbol};
use crate::tree::SuffixTree;

pub(crate) fn build<Id, T>(tree: &mut SuffixTree<Id, T>, seq_id: SequenceId)
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    let len = tree.sequences[seq_id].len();
    let growing_end = Rc::new(Cell::new(0));

    let mut state = State {
        active_node: ROOT,
        active_edge: None,
        remainder: 0,
        previously_created: None,
        leaves_created: Vec::new(),
    };

    for i in 0..len {
        growing_end.set(i + 1);
        state.insert_phase(tree, seq_id, i, &growing_end);
    }

    // The sentinel just fed closes every implicit suffix, so every leaf
    // edge opened this call can be frozen to its final, concrete end.
    for leaf in state.leaves_created {
        tree.nodes[leaf].end.freeze();
    }
}

/// Active point plus the per-phase bookkeeping Ukkonen's algorithm needs:
/// `(active_node, active_edge, active_length)` collapsed into `active_edge`
/// below (`None` means `active_length == 0`, in which case the edge is
/// undefined), and the suffix link pending from the most recently split
/// internal node this phase.
struct State<T> {
    active_node: NodeId,
    active_edge: Option<(Elem<T>, usize)>,
    remainder: usize,
    previously_created: Option<NodeId>,
    leaves_created: Vec<NodeId>,
}

impl<T: Symbol> State<T> {
    fn insert_phase<Id: Clone + Eq + Hash>(
        &mut self,
        tree: &mut SuffixTree<Id, T>,
        seq_id: SequenceId,
        i: usize,
        growing_end: &Rc<Cell<usize>>,
    ) {
        self.remainder += 1;
        self.previously_created = None;

        let next_symbol = tree.symbol_at(seq_id, i);

        while self.remainder > 0 {
            if self.extend(tree, seq_id, i, growing_end, next_symbol.clone()) {
                // Trick 2: `update_active_point` reads `self.remainder` as
                // the count *including* the suffix just inserted.
                self.update_active_point(tree, seq_id, i);
                self.remainder -= 1;
            } else {
                self.active_edge = match self.active_edge.take() {
                    Some((sym, len)) => Some((sym, len + 1)),
                    None => Some((next_symbol.clone(), 1)),
                };
                self.normalize_active_point(tree);
                break;
            }
        }
    }

    /// One extension: try to find `next_symbol` from the active point.
    /// Returns `true` iff a new leaf (and possibly a splitting internal
    /// node) was created — i.e. `next_symbol` was *not* already present,
    /// meaning this suffix still needs explicit insertion.
    fn extend<Id: Clone + Eq + Hash>(
        &mut self,
        tree: &mut SuffixTree<Id, T>,
        seq_id: SequenceId,
        i: usize,
        growing_end: &Rc<Cell<usize>>,
        next_symbol: Elem<T>,
    ) -> bool {
        match self.active_edge.clone() {
            None => self.extend_at_node(tree, seq_id, i, growing_end, next_symbol),
            Some((edge_symbol, edge_length)) => {
                self.extend_mid_edge(tree, seq_id, i, growing_end, next_symbol, edge_symbol, edge_length)
            }
        }
    }

    /// Active point is exactly at `active_node` (`active_length == 0`):
    /// Rule 3 applies iff `active_node` already has a child keyed by
    /// `next_symbol`.
    fn extend_at_node<Id: Clone + Eq + Hash>(
        &mut self,
        tree: &mut SuffixTree<Id, T>,
        seq_id: SequenceId,
        i: usize,
        growing_end: &Rc<Cell<usize>>,
        next_symbol: Elem<T>,
    ) -> bool {
        if tree.get_child(self.active_node, &next_symbol).is_some() {
            return false;
        }

        let parent_depth = tree.nodes[self.active_node].string_depth;
        let suffix_start = i - parent_depth;
        let leaf = tree.new_node(Node::leaf(
            self.active_node,
            seq_id,
            i,
            EdgeEnd::Growing(growing_end.clone()),
            suffix_start,
            parent_depth + 1,
        ));
        tree.link(self.active_node, leaf);
        self.leaves_created.push(leaf);

        // Whatever node the active point names here is, by construction,
        // the correct suffix-link target for whichever internal node this
        // phase split earlier (if any) — true even when that node is root,
        // so unlike a leaf attach at a non-root active point there is no
        // special case to gate this on.
        let active_node = self.active_node;
        self.resolve_pending_link(tree, active_node);

        true
    }

    /// Active point is `edge_length` symbols into the edge keyed by
    /// `edge_symbol` under `active_node`. Rule 3 applies iff the symbol
    /// right after that point on the edge already equals `next_symbol`;
    /// otherwise the edge is split and a fresh leaf attached for
    /// `next_symbol`.
    fn extend_mid_edge<Id: Clone + Eq + Hash>(
        &mut self,
        tree: &mut SuffixTree<Id, T>,
        seq_id: SequenceId,
        i: usize,
        growing_end: &Rc<Cell<usize>>,
        next_symbol: Elem<T>,
        edge_symbol: Elem<T>,
        edge_length: usize,
    ) -> bool {
        let edge_node = tree
            .get_child(self.active_node, &edge_symbol)
            .expect("active edge always names an existing child");
        let edge_seq_id = tree.nodes[edge_node].seq_id;
        let edge_start = tree.nodes[edge_node].start;
        let split_pos = edge_start + edge_length;

        if tree.symbol_at(edge_seq_id, split_pos) == next_symbol {
            return false;
        }

        let split_depth = tree.nodes[self.active_node].string_depth + edge_length;
        let new_internal = tree.new_node(Node::internal(
            self.active_node,
            edge_seq_id,
            edge_start,
            split_pos,
            split_depth,
        ));
        tree.nodes[edge_node].start = split_pos;
        tree.link(self.active_node, new_internal);
        tree.link(new_internal, edge_node);

        let suffix_start = i - split_depth;
        let leaf = tree.new_node(Node::leaf(
            new_internal,
            seq_id,
            i,
            EdgeEnd::Growing(growing_end.clone()),
            suffix_start,
            split_depth + 1,
        ));
        tree.link(new_internal, leaf);
        self.leaves_created.push(leaf);

        self.resolve_pending_link(tree, new_internal);
        self.previously_created = Some(new_internal);

        true
    }

    /// Link the internal node created earlier *this phase* (if any) to
    /// `target`, then clear the pending link: every internal node created
    /// mid-phase gets its suffix link resolved by the very next node
    /// reached, whether that next node is another split or an existing one.
    fn resolve_pending_link<Id: Clone + Eq + Hash>(&mut self, tree: &mut SuffixTree<Id, T>, target: NodeId) {
        if let Some(node) = self.previously_created.take() {
            tree.nodes[node].set_suffix_link(target);
        }
    }

    /// Advance the active point to the locus of the next-shorter pending
    /// suffix, following a suffix link when possible. `self.remainder` at
    /// entry still counts the suffix just
    /// inserted (the caller decrements afterwards).
    fn update_active_point<Id: Clone + Eq + Hash>(&mut self, tree: &mut SuffixTree<Id, T>, seq_id: SequenceId, i: usize) {
        if self.active_node == ROOT {
            if let Some((_, length)) = self.active_edge {
                let next_start = i + 2 - self.remainder;
                self.active_edge = Some((tree.symbol_at(seq_id, next_start), length - 1));
            }
        } else {
            match tree.nodes[self.active_node].suffix_link() {
                Some(node) => self.active_node = node,
                None => {
                    // `active_node` is itself an internal node created
                    // earlier this same phase and not yet linked — per
                    // McCreight/Ukkonen's shared invariant, the next
                    // shorter suffix is reached from root directly.
                    self.active_node = ROOT;
                    let next_start = i + 2 - self.remainder;
                    self.active_edge = Some((tree.symbol_at(seq_id, next_start), self.remainder - 2));
                }
            }
        }

        self.normalize_active_point(tree);
    }

    /// Re-canonicalize `(active_node, active_edge)` so that its length is
    /// strictly less than the length of the edge it names.
    fn normalize_active_point<Id: Clone + Eq + Hash>(&mut self, tree: &mut SuffixTree<Id, T>) {
        loop {
            let (edge_symbol, length) = match self.active_edge.clone() {
                None => return,
                Some(pair) => pair,
            };
            if length == 0 {
                self.active_edge = None;
                return;
            }

            let edge_node = tree
                .get_child(self.active_node, &edge_symbol)
                .expect("active edge always names an existing child");
            let edge_len = tree.nodes[edge_node].edge_len();

            if length < edge_len {
                return;
            } else if length == edge_len {
                self.active_node = edge_node;
                self.active_edge = None;
                return;
            } else {
                let edge_seq_id = tree.nodes[edge_node].seq_id;
                let edge_start = tree.nodes[edge_node].start;
                self.active_node = edge_node;
                let new_symbol = tree.symbol_at(edge_seq_id, edge_start + edge_len);
                self.active_edge = Some((new_symbol, length - edge_len));
            }
        }
    }
}
