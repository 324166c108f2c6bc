//! McCreight's linear-time construction: suffixes are
//! inserted in decreasing length order, each one short-circuiting the part
//! of the descent already known to be present via the previous suffix's
//! suffix link.

use std::hash::Hash;

use crate::node::{NodeId, NodeKind, ROOT};
use crate::symbol::{SequenceId, Symbol};
use crate::tree::SuffixTree;

pub(crate) fn build<Id, T>(tree: &mut SuffixTree<Id, T>, seq_id: SequenceId)
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    let len = tree.sequences[seq_id].len();

    // suf_0: nothing to rescan from, so scan the whole thing symbol by
    // symbol from the root, exactly like the Naive builder would.
    let mut head = tree.scan_and_attach(ROOT, seq_id, 0, 0);

    for i in 1..len {
        let prev_head = head;
        head = if prev_head == ROOT {
            // head_{i-1} had zero length: suf_{i-1} wasn't found past the
            // empty string, so suf_i can't be shortcut either.
            tree.scan_and_attach(ROOT, seq_id, i, i)
        } else {
            let d = resolve_suffix_link(tree, prev_head);
            tree.nodes[prev_head].set_suffix_link(d);
            let depth_d = tree.nodes[d].string_depth;
            tree.scan_and_attach(d, seq_id, i + depth_d, i)
        };
    }

    // The last suffix (the sentinel alone) always attaches without creating
    // a fresh node of its own (the sentinel never matches an existing
    // child), so `head` here is whatever substep B last produced — which,
    // if it was a fresh split, has never had a chance to get its suffix
    // link set.
    if head != ROOT {
        if let NodeKind::Internal {
            suffix_link: None, ..
        } = &tree.nodes[head].kind
        {
            let d = resolve_suffix_link(tree, head);
            tree.nodes[head].set_suffix_link(d);
        }
    }
}

/// Substeps A and B for the node `head` (some `head_{i-1}`): find the locus
/// `d` of `head`'s string with its first symbol dropped, by hopping to the
/// contracted locus's suffix link and rescanning the remainder (`beta`) by
/// length only, never by symbol content — the trick that keeps total work
/// linear.
fn resolve_suffix_link<Id, T>(tree: &mut SuffixTree<Id, T>, head: NodeId) -> NodeId
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    let parent = tree.nodes[head]
        .parent
        .expect("head is never root when resolve_suffix_link is called");

    let (contracted_locus, beta_seq, beta_start, beta_len) = if parent == ROOT {
        let n = &tree.nodes[head];
        (ROOT, n.seq_id, n.start + 1, n.edge_len() - 1)
    } else {
        let link = tree.nodes[parent]
            .suffix_link()
            .expect("every ancestor but the current head already has a suffix link");
        let n = &tree.nodes[head];
        (link, n.seq_id, n.start, n.edge_len())
    };

    tree.fast_scan(beta_seq, contracted_locus, beta_start, beta_len)
}
