//! The quadratic oracle builder: insert every suffix of the
//! new sequence independently, always starting the descent back at the
//! root. No suffix links are read or written. Used only to cross-check the
//! two linear-time builders in the equivalence tests; never the default.

use std::hash::Hash;

use crate::node::ROOT;
use crate::symbol::{SequenceId, Symbol};
use crate::tree::SuffixTree;

pub(crate) fn build<Id, T>(tree: &mut SuffixTree<Id, T>, seq_id: SequenceId)
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    let len = tree.sequences[seq_id].len();
    for start in 0..len {
        tree.scan_and_attach(ROOT, seq_id, start, start);
    }
}
