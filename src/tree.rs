//! [`SuffixTree`]: the public façade over the node arena, the stored
//! sequences, builder dispatch, and the analytical queries built on top of
//! construction.

use std::collections::HashMap;
use std::hash::Hash;

use bit_vec::BitVec;

use crate::builder::{self, Builder};
use crate::error::Error;
use crate::lca::Lca;
use crate::node::{Node, NodeId, NodeKind, ROOT};
use crate::path::{Path, Sequence};
use crate::symbol::{Elem, SequenceId, Symbol};

/// A generalized suffix tree over zero or more sequences of `T`, each
/// identified by a client-chosen `Id`.
///
/// Construction strategy is chosen once, at [`SuffixTree::new`] /
/// [`SuffixTree::from_mapping`], and applies to every subsequent [`add`](
/// SuffixTree::add). Sequence data is borrowed, never copied.
pub struct SuffixTree<'a, Id, T> {
    builder: Builder,
    pub(crate) nodes: Vec<Node<T>>,
    pub(crate) sequences: Vec<Sequence<'a, T>>,
    id_to_seq: HashMap<Id, SequenceId>,
    seq_to_id: Vec<Id>,
    /// Every leaf, keyed by the `(sequence_id, suffix_start)` it represents —
    /// lets [`SuffixTree::longest_common_extension`] locate the two leaves an
    /// LCA query needs without a tree-wide scan.
    leaf_index: HashMap<(SequenceId, usize), NodeId>,
    analysis: Option<Analysis>,
    /// Euler-tour/RMQ preprocessing for LCA queries, built lazily and
    /// invalidated by every `add`.
    lca: Option<Lca>,
}

/// Cached per-node results of the single bottom-up analysis pass
/// (`compute_C`, plus left-diversity for `maximal_repeats`).
/// Invalidated on every `add`.
struct Analysis {
    /// `C(v)`: the set of distinct sequence ids reachable below `v`, one
    /// bitset per arena slot (empty/unused for leaves).
    reachable: Vec<BitVec>,
    /// Whether `v`'s leaves disagree on the symbol immediately preceding
    /// their suffix (or some have none) — the Ukkonen–Wang left-diversity
    /// test `maximal_repeats` relies on.
    left_diverse: Vec<bool>,
}

impl<'a, Id, T> SuffixTree<'a, Id, T>
where
    Id: Clone + Eq + Hash,
    T: Symbol,
{
    /// An empty tree that will use `builder` to insert every sequence passed
    /// to [`add`](Self::add).
    pub fn new(builder: Builder) -> Self {
        tracing::debug!(?builder, "creating empty suffix tree");
        SuffixTree {
            builder,
            nodes: vec![Node::root(), Node::aux()],
            sequences: Vec::new(),
            id_to_seq: HashMap::new(),
            seq_to_id: Vec::new(),
            leaf_index: HashMap::new(),
            analysis: None,
            lca: None,
        }
    }

    /// Build a tree from a batch of `(id, sequence)` pairs in one call,
    /// equivalent to `new` followed by `add` for each pair in order.
    pub fn from_mapping<I>(mapping: I, builder: Builder) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Id, &'a [T])>,
    {
        let mut tree = Self::new(builder);
        for (id, seq) in mapping {
            tree.add(id, seq)?;
        }
        Ok(tree)
    }

    /// Insert every suffix of `seq` (including the suffix consisting only of
    /// the generated sentinel) into the tree, labeled with `id`.
    ///
    /// Errors without mutating the tree if `id` was already added or `seq` is
    /// empty (`spec.md` §4.3's "Non-goals": no empty-sequence support).
    pub fn add(&mut self, id: Id, seq: &'a [T]) -> Result<(), Error> {
        if seq.is_empty() {
            return Err(Error::EmptySequence);
        }
        if self.id_to_seq.contains_key(&id) {
            return Err(Error::DuplicateId);
        }

        let seq_id = self.sequences.len();
        self.sequences.push(Sequence::new(seq_id, seq));
        self.id_to_seq.insert(id.clone(), seq_id);
        self.seq_to_id.push(id);

        tracing::debug!(seq_id, len = seq.len(), builder = ?self.builder, "adding sequence");
        match self.builder {
            Builder::Naive => builder::naive::build(self, seq_id),
            Builder::McCreight => builder::mccreight::build(self, seq_id),
            Builder::Ukkonen => builder::ukkonen::build(self, seq_id),
        }

        self.analysis = None;
        self.lca = None;

        #[cfg(feature = "invariant-checks")]
        crate::util::debug_assert_invariants(self);

        Ok(())
    }

    /// Whether `needle` occurs as a substring of any stored sequence.
    pub fn find(&self, needle: &[T]) -> bool {
        self.find_node(needle).is_some()
    }

    /// Whether `needle` occurs as a substring of the sequence labeled `id`.
    pub fn find_id(&self, id: &Id, needle: &[T]) -> Result<bool, Error> {
        let target = *self.id_to_seq.get(id).ok_or(Error::UnknownId)?;
        let found = match self.find_node(needle) {
            None => false,
            Some((node, _)) => self
                .leaves_below(node)
                .into_iter()
                .any(|leaf| self.nodes[leaf].seq_id == target),
        };
        Ok(found)
    }

    /// Every occurrence of `needle`, as the `(id, full suffix path)` of the
    /// sequence it occurs in.
    pub fn find_all(&self, needle: &[T]) -> Vec<(Id, Path<'a, T>)> {
        let Some((node, _)) = self.find_node(needle) else {
            return Vec::new();
        };
        self.leaves_below(node)
            .into_iter()
            .map(|leaf| {
                let id = self.seq_to_id[self.nodes[leaf].seq_id].clone();
                (id, self.full_suffix_path(leaf))
            })
            .collect()
    }

    /// Length of the longest common prefix shared by the suffix of `id_a`
    /// starting at `start_a` and the suffix of `id_b` starting at `start_b`.
    ///
    /// The classic generalized-suffix-tree application of LCA (`spec.md`
    /// §4.7): the lowest common ancestor of the two leaves representing
    /// these suffixes is the locus of exactly their shared prefix, and its
    /// string-depth is this length.
    pub fn longest_common_extension(
        &mut self,
        id_a: &Id,
        start_a: usize,
        id_b: &Id,
        start_b: usize,
    ) -> Result<usize, Error> {
        let seq_a = *self.id_to_seq.get(id_a).ok_or(Error::UnknownId)?;
        let seq_b = *self.id_to_seq.get(id_b).ok_or(Error::UnknownId)?;
        let leaf_a = *self
            .leaf_index
            .get(&(seq_a, start_a))
            .expect("start_a is a valid suffix start of id_a");
        let leaf_b = *self
            .leaf_index
            .get(&(seq_b, start_b))
            .expect("start_b is a valid suffix start of id_b");

        self.ensure_lca();
        let lca_node = self.lca.as_ref().expect("just ensured").query(leaf_a, leaf_b);
        Ok(self.depth_of(lca_node))
    }

    fn ensure_lca(&mut self) {
        if self.lca.is_some() {
            return;
        }
        tracing::debug!(nodes = self.nodes.len(), "(re)preparing LCA structure");
        self.lca = Some(Lca::prepare(&self.nodes, self.nodes.len()));
    }

    /// Every maximal repeat: a substring that occurs at least twice, cannot
    /// be extended to the right (it is a node, not a mid-edge position), and
    /// cannot be uniformly extended to the left either, because its
    /// occurrences are preceded by at least two distinct symbols
    /// (`spec.md` §4.3/§9, "left-diverse"). Yielded as `(C, representative
    /// occurrence)` where `C` is the number of distinct sequences the
    /// substring occurs in, one entry per left-diverse internal node.
    pub fn maximal_repeats(&mut self) -> Vec<(usize, Path<'a, T>)> {
        self.ensure_analysis();
        let analysis = self.analysis.as_ref().expect("just ensured");

        let mut out = Vec::new();
        for node in ROOT..self.nodes.len() {
            if self.nodes[node].is_leaf() || node == ROOT {
                continue;
            }
            if !analysis.left_diverse[node] {
                continue;
            }
            if self.depth_of(node) == 0 {
                continue;
            }
            let count = analysis.reachable[node].iter().filter(|b| *b).count();
            out.push((count, self.representative_path(node)));
        }
        out
    }

    fn find_node(&self, needle: &[T]) -> Option<(NodeId, usize)> {
        let mut node = ROOT;
        let mut consumed = 0;
        while consumed < needle.len() {
            let key = Elem::Char(needle[consumed].clone());
            let child = self.get_child(node, &key)?;
            let label_len = self.nodes[child].edge_len();
            let remaining = needle.len() - consumed;
            let take = remaining.min(label_len);

            let edge_seq = self.nodes[child].seq_id;
            let edge_start = self.nodes[child].start;
            for i in 0..take {
                if self.symbol_at(edge_seq, edge_start + i) != Elem::Char(needle[consumed + i].clone()) {
                    return None;
                }
            }

            consumed += take;
            node = child;
            if take < label_len {
                return Some((node, consumed));
            }
            if consumed < needle.len() && self.nodes[node].is_leaf() {
                return None;
            }
        }
        Some((node, consumed))
    }

    fn leaves_below(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            match self.nodes[n].children() {
                Some(children) => stack.extend(children.iter()),
                None => out.push(n),
            }
        }
        out
    }

    fn first_leaf_below(&self, node: NodeId) -> NodeId {
        let mut n = node;
        loop {
            match self.nodes[n].children() {
                Some(children) => {
                    n = children.iter().next().expect("internal node has a child")
                }
                None => return n,
            }
        }
    }

    /// The substring spelled from the root to `node`, quoted as a single
    /// contiguous range of whichever sequence holds one of its occurrences.
    fn representative_path(&self, node: NodeId) -> Path<'a, T> {
        let leaf = self.first_leaf_below(node);
        let suffix_start = self.nodes[leaf]
            .suffix_start()
            .expect("first_leaf_below always returns a leaf");
        let seq_id = self.nodes[leaf].seq_id;
        let depth = self.depth_of(node);
        self.path_in(seq_id, suffix_start, suffix_start + depth)
    }

    /// The full suffix a leaf represents: from its original start to the end
    /// of its owning sequence (including the sentinel).
    fn full_suffix_path(&self, leaf: NodeId) -> Path<'a, T> {
        let suffix_start = self.nodes[leaf]
            .suffix_start()
            .expect("leaf always has a suffix_start");
        let seq_id = self.nodes[leaf].seq_id;
        let end = self.sequences[seq_id].len();
        self.path_in(seq_id, suffix_start, end)
    }

    fn path_in(&self, seq_id: SequenceId, start: usize, end: usize) -> Path<'a, T> {
        Path::new(self.sequences[seq_id], start, end)
    }

    /// `node`'s string-depth, computed live rather than trusted from the
    /// cached field when `node` might be a leaf whose incoming edge is still
    /// growing mid-construction (`spec.md` §4.1, "Trick 3").
    pub(crate) fn depth_of(&self, node: NodeId) -> usize {
        let n = &self.nodes[node];
        match n.parent {
            None => 0,
            Some(p) => self.nodes[p].string_depth + n.edge_len(),
        }
    }

    pub(crate) fn symbol_at(&self, seq_id: SequenceId, pos: usize) -> Elem<T> {
        self.sequences[seq_id].at(pos)
    }

    pub(crate) fn get_child(&self, parent: NodeId, key: &Elem<T>) -> Option<NodeId> {
        self.nodes[parent].children().and_then(|c| c.get(key))
    }

    pub(crate) fn new_node(&mut self, node: Node<T>) -> NodeId {
        let id = self.nodes.len();
        if let NodeKind::Leaf { suffix_start } = &node.kind {
            self.leaf_index.insert((node.seq_id, *suffix_start), id);
        }
        self.nodes.push(node);
        id
    }

    /// Key `child` into `parent`'s [`ChildMap`] by the first symbol of
    /// `child`'s own incoming edge, and record `parent` as `child`'s parent.
    pub(crate) fn link(&mut self, parent: NodeId, child: NodeId) {
        let seq_id = self.nodes[child].seq_id;
        let start = self.nodes[child].start;
        let key = self.symbol_at(seq_id, start);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent]
            .children_mut()
            .expect("only internal nodes are ever linked to as a parent")
            .insert(key, child);
    }

    /// Descend from `from`, matching symbols of sequence `seq_id` starting at
    /// `pos` one at a time, splitting an edge or attaching a fresh leaf the
    /// moment a mismatch (or a missing child) is found. Returns the locus
    /// under which the new leaf was attached — Naive's per-suffix insertion
    /// and McCreight's substep C both reduce to this (`spec.md` §4.4, §4.5).
    pub(crate) fn scan_and_attach(
        &mut self,
        from: NodeId,
        seq_id: SequenceId,
        mut pos: usize,
        suffix_start: usize,
    ) -> NodeId {
        let end = self.sequences[seq_id].len();
        let mut node = from;
        loop {
            if pos == end {
                return node;
            }
            let key = self.symbol_at(seq_id, pos);
            match self.get_child(node, &key) {
                None => {
                    let parent_depth = self.nodes[node].string_depth;
                    let leaf = self.new_node(Node::leaf(
                        node,
                        seq_id,
                        pos,
                        crate::node::EdgeEnd::Fixed(end),
                        suffix_start,
                        parent_depth + (end - pos),
                    ));
                    self.link(node, leaf);
                    return node;
                }
                Some(child) => {
                    let label_len = self.nodes[child].edge_len();
                    let child_start = self.nodes[child].start;
                    let child_seq = self.nodes[child].seq_id;
                    let avail = end - pos;
                    let take = avail.min(label_len);

                    let mut matched = 0;
                    while matched < take
                        && self.symbol_at(seq_id, pos + matched)
                            == self.symbol_at(child_seq, child_start + matched)
                    {
                        matched += 1;
                    }

                    if matched == label_len {
                        pos += matched;
                        node = child;
                        continue;
                    }

                    let split_depth = self.nodes[node].string_depth + matched;
                    let new_internal = self.new_node(Node::internal(
                        node,
                        child_seq,
                        child_start,
                        child_start + matched,
                        split_depth,
                    ));
                    self.nodes[child].start = child_start + matched;
                    self.link(node, new_internal);
                    self.link(new_internal, child);

                    let leaf = self.new_node(Node::leaf(
                        new_internal,
                        seq_id,
                        pos + matched,
                        crate::node::EdgeEnd::Fixed(end),
                        suffix_start,
                        split_depth + (end - (pos + matched)),
                    ));
                    self.link(new_internal, leaf);
                    return new_internal;
                }
            }
        }
    }

    /// Descend from `from` by `remaining` symbols of `(seq_id, pos..)`,
    /// trusting that content is already present and comparing only edge
    /// *lengths* — McCreight's substep B, the rescan that "is what makes
    /// total work linear" (`spec.md` §4.5). Splits the final edge if
    /// `remaining` lands strictly inside it; never attaches a leaf.
    pub(crate) fn fast_scan(
        &mut self,
        seq_id: SequenceId,
        mut from: NodeId,
        mut pos: usize,
        mut remaining: usize,
    ) -> NodeId {
        if remaining == 0 {
            return from;
        }
        loop {
            let key = self.symbol_at(seq_id, pos);
            let child = self
                .get_child(from, &key)
                .expect("beta is guaranteed present by the McCreight invariant");
            let label_len = self.nodes[child].edge_len();

            if remaining < label_len {
                let child_start = self.nodes[child].start;
                let child_seq = self.nodes[child].seq_id;
                let split_depth = self.nodes[from].string_depth + remaining;
                let new_internal = self.new_node(Node::internal(
                    from,
                    child_seq,
                    child_start,
                    child_start + remaining,
                    split_depth,
                ));
                self.nodes[child].start = child_start + remaining;
                self.link(from, new_internal);
                self.link(new_internal, child);
                return new_internal;
            } else if remaining == label_len {
                return child;
            } else {
                remaining -= label_len;
                pos += label_len;
                from = child;
            }
        }
    }

    fn ensure_analysis(&mut self) {
        if self.analysis.is_some() {
            return;
        }
        tracing::debug!(nodes = self.nodes.len(), "(re)computing suffix tree analysis pass");

        let n = self.nodes.len();
        let seq_count = self.sequences.len();
        let mut reachable = vec![BitVec::from_elem(seq_count.max(1), false); n];
        let mut left_diverse = vec![false; n];
        // Meaningful only where `left_diverse[node]` is false: the single
        // symbol every leaf below `node` agrees on as its left context.
        let mut left_symbol: Vec<Option<Elem<T>>> = vec![None; n];

        self.analyze(ROOT, &mut reachable, &mut left_diverse, &mut left_symbol);

        self.analysis = Some(Analysis {
            reachable,
            left_diverse,
        });
    }

    /// Bottom-up DFS filling `reachable[v]` (the `C(v)` bitset) and
    /// `left_diverse[v]` for every node in one pass. Left-diversity follows
    /// the usual convention (Ukkonen/Gusfield): a leaf whose suffix starts at
    /// position 0 has no left context and makes every ancestor left-diverse
    /// outright; otherwise a node is left-diverse iff its leaves disagree on
    /// the symbol immediately preceding their suffix.
    fn analyze(
        &self,
        node: NodeId,
        reachable: &mut [BitVec],
        left_diverse: &mut [bool],
        left_symbol: &mut [Option<Elem<T>>],
    ) {
        match self.nodes[node].children() {
            None => {
                let seq_id = self.nodes[node].seq_id;
                reachable[node].set(seq_id, true);
                let suffix_start = self.nodes[node]
                    .suffix_start()
                    .expect("leaf always has a suffix_start");
                if suffix_start == 0 {
                    left_diverse[node] = true;
                } else {
                    left_symbol[node] = Some(self.symbol_at(seq_id, suffix_start - 1));
                }
            }
            Some(children) => {
                let kids: Vec<NodeId> = children.iter().collect();
                for &child in &kids {
                    self.analyze(child, reachable, left_diverse, left_symbol);
                }

                let mut combined = BitVec::from_elem(reachable[node].len(), false);
                let mut diverse = false;
                let mut common: Option<Elem<T>> = None;
                let mut have_common = false;
                for &child in &kids {
                    combined.or(&reachable[child]);
                    if left_diverse[child] {
                        diverse = true;
                        continue;
                    }
                    if have_common {
                        if common != left_symbol[child] {
                            diverse = true;
                        }
                    } else {
                        common = left_symbol[child].clone();
                        have_common = true;
                    }
                }
                reachable[node] = combined;
                left_diverse[node] = diverse;
                if !diverse {
                    left_symbol[node] = common;
                }
            }
        }
    }
}

impl<'a, Id, T> SuffixTree<'a, Id, T>
where
    Id: Clone + Eq + Hash,
    T: Symbol + Ord,
{
    /// Every substring of length at least `min_k` that occurs in two or more
    /// distinct sequences, as `(length, sequence_count, representative
    /// occurrence)`, deduplicated and ordered lexicographically by the
    /// representative occurrence.
    pub fn common_substrings(&mut self, min_k: usize) -> Vec<(usize, usize, Path<'a, T>)> {
        self.ensure_analysis();
        let analysis = self.analysis.as_ref().expect("just ensured");
        let max_k = self.sequences.len();

        let mut out = Vec::new();
        for k in min_k.max(2)..=max_k {
            let mut best: Option<(usize, NodeId)> = None;
            for node in ROOT..self.nodes.len() {
                if self.nodes[node].is_leaf() || node == ROOT {
                    continue;
                }
                let count = analysis.reachable[node].iter().filter(|b| *b).count();
                if count < k {
                    continue;
                }
                let depth = self.depth_of(node);
                best = Some(match best {
                    None => (depth, node),
                    Some((best_depth, best_node)) => {
                        if self.is_better_common_substring(depth, node, best_depth, best_node) {
                            (depth, node)
                        } else {
                            (best_depth, best_node)
                        }
                    }
                });
            }
            if let Some((depth, node)) = best {
                out.push((k, depth, self.representative_path(node)));
            }
        }
        out
    }

    /// Tie-break for [`SuffixTree::common_substrings`]: deeper wins outright;
    /// among equal-depth candidates, the one reached first by a traversal
    /// that visits each internal node's children in ascending first-symbol
    /// order (`spec.md` §9's resolution of the "ties on depth and lex order"
    /// open question) — equivalent to ordinary lexicographic order on the
    /// represented string, which is what we compare directly here.
    fn is_better_common_substring(
        &self,
        depth: usize,
        node: NodeId,
        best_depth: usize,
        best_node: NodeId,
    ) -> bool {
        use std::cmp::Ordering;
        match depth.cmp(&best_depth) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => {
                let path = self.representative_path(node);
                let best_path = self.representative_path(best_node);
                path.iter().cmp(best_path.iter()) == Ordering::Less
            }
        }
    }
}

