//! End-to-end scenarios matching `spec.md` §8's table, exercised against all
//! three builders, plus the builder-equivalence oracle check.

use std::collections::HashSet;

use generalized_suffix_tree::{Builder, Elem, SuffixTree};

const ALL_BUILDERS: [Builder; 3] = [Builder::Naive, Builder::McCreight, Builder::Ukkonen];

fn path_chars(path: &generalized_suffix_tree::Path<'_, u8>) -> Vec<Elem<u8>> {
    path.iter().collect()
}

fn elems(s: &[u8]) -> Vec<Elem<u8>> {
    s.iter().map(|&b| Elem::Char(b)).collect()
}

/// Scenario 1: `{1: "xabxac"}`, `find("abx")` / `find("abc")`.
#[test]
fn scenario_1_find() {
    for builder in ALL_BUILDERS {
        let mut tree: SuffixTree<u32, u8> = SuffixTree::new(builder);
        tree.add(1, b"xabxac").unwrap();

        assert!(tree.find(b"abx"), "{builder:?}");
        assert!(!tree.find(b"abc"), "{builder:?}");
    }
}

/// Scenario 2: `find_all("xa")` over two sequences.
#[test]
fn scenario_2_find_all() {
    for builder in ALL_BUILDERS {
        let mut tree: SuffixTree<&str, u8> = SuffixTree::new(builder);
        tree.add("A", b"xabxac").unwrap();
        tree.add("B", b"awyawxawxz").unwrap();

        let got: HashSet<(&str, Vec<Elem<u8>>)> = tree
            .find_all(b"xa")
            .iter()
            .map(|(id, path)| (*id, path_chars(path)))
            .collect();

        let mut expected = HashSet::new();
        expected.insert((
            "A",
            elems(b"xabxac").into_iter().chain([Elem::Sentinel(0)]).collect::<Vec<_>>(),
        ));
        expected.insert((
            "A",
            elems(b"xac").into_iter().chain([Elem::Sentinel(0)]).collect::<Vec<_>>(),
        ));
        expected.insert((
            "B",
            elems(b"xawxz").into_iter().chain([Elem::Sentinel(1)]).collect::<Vec<_>>(),
        ));

        assert_eq!(got, expected, "{builder:?}");
    }
}

/// Scenario 3: `maximal_repeats()` over `{A:"xabxac", B:"awyawxawxz"}`.
#[test]
fn scenario_3_maximal_repeats() {
    for builder in ALL_BUILDERS {
        let mut tree: SuffixTree<&str, u8> = SuffixTree::new(builder);
        tree.add("A", b"xabxac").unwrap();
        tree.add("B", b"awyawxawxz").unwrap();

        let mut got: Vec<(usize, Vec<Elem<u8>>)> = tree
            .maximal_repeats()
            .into_iter()
            .map(|(c, path)| (c, path_chars(&path)))
            .collect();
        got.sort();

        let mut expected = vec![
            (1, elems(b"aw")),
            (1, elems(b"awx")),
            (2, elems(b"a")),
            (2, elems(b"x")),
            (2, elems(b"xa")),
        ];
        expected.sort();

        assert_eq!(got, expected, "{builder:?}");
    }
}

/// Scenario 4: `common_substrings()` over five related sequences.
#[test]
fn scenario_4_common_substrings() {
    for builder in ALL_BUILDERS {
        let mut tree: SuffixTree<&str, u8> = SuffixTree::new(builder);
        tree.add("A", b"sandollar").unwrap();
        tree.add("B", b"sandlot").unwrap();
        tree.add("C", b"handler").unwrap();
        tree.add("D", b"grand").unwrap();
        tree.add("E", b"pantry").unwrap();

        let got: Vec<(usize, usize, Vec<Elem<u8>>)> = tree
            .common_substrings(2)
            .into_iter()
            .map(|(k, len, path)| (k, len, path_chars(&path)))
            .collect();

        let expected = vec![
            (2, 4, elems(b"sand")),
            (3, 3, elems(b"and")),
            (4, 3, elems(b"and")),
            (5, 2, elems(b"an")),
        ];

        assert_eq!(got, expected, "{builder:?}");
    }
}

/// Scenario 5: heterogeneous, non-byte symbols sharing one tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Token {
    Bool(bool),
    Int(i32),
    Set(Vec<i32>),
    Word(&'static str),
    Tuple(i32, i32, i32),
}

#[test]
fn scenario_5_heterogeneous_symbols() {
    use Token::*;

    for builder in ALL_BUILDERS {
        let set = Set(vec![1, 2, 3]);
        let seq1 = [Bool(true), Int(10), set.clone(), Word("hello"), Tuple(1, 2, 3)];
        let seq2 = [Tuple(1, 2, 3), Word("hello"), set.clone(), Int(10), Bool(true)];

        let mut tree: SuffixTree<u32, Token> = SuffixTree::new(builder);
        tree.add(1, &seq1).unwrap();
        tree.add(2, &seq2).unwrap();

        assert!(tree.find(&[Bool(true), Int(10), set]), "{builder:?}");
        assert!(!tree.find(&[Int(10), Bool(true)]), "{builder:?}");
    }
}

/// Scenario 6: Naive, McCreight and Ukkonen agree on every query.
#[test]
fn scenario_6_builder_equivalence() {
    let inputs: [(&str, &[u8]); 3] = [("A", b"xabxac"), ("B", b"awyawxawxz"), ("C", b"banana")];
    let needles: [&[u8]; 6] = [b"a", b"an", b"na", b"x", b"xa", b"nope"];

    let mut trees: Vec<SuffixTree<&str, u8>> = ALL_BUILDERS
        .iter()
        .map(|&builder| {
            let mut tree = SuffixTree::new(builder);
            for (id, seq) in inputs {
                tree.add(id, seq).unwrap();
            }
            tree
        })
        .collect();

    for needle in needles {
        let results: Vec<HashSet<(&str, Vec<Elem<u8>>)>> = trees
            .iter()
            .map(|tree| {
                tree.find_all(needle)
                    .iter()
                    .map(|(id, path)| (*id, path_chars(path)))
                    .collect()
            })
            .collect();
        assert_eq!(results[0], results[1], "McCreight vs Naive for {needle:?}");
        assert_eq!(results[0], results[2], "Ukkonen vs Naive for {needle:?}");
    }

    let mut repeats: Vec<Vec<(usize, Vec<Elem<u8>>)>> = Vec::new();
    for tree in &mut trees {
        let mut r: Vec<(usize, Vec<Elem<u8>>)> = tree
            .maximal_repeats()
            .into_iter()
            .map(|(c, path)| (c, path_chars(&path)))
            .collect();
        r.sort();
        repeats.push(r);
    }
    assert_eq!(repeats[0], repeats[1]);
    assert_eq!(repeats[0], repeats[2]);

    let mut commons: Vec<Vec<(usize, usize, Vec<Elem<u8>>)>> = Vec::new();
    for tree in &mut trees {
        commons.push(
            tree.common_substrings(2)
                .into_iter()
                .map(|(k, len, path)| (k, len, path_chars(&path)))
                .collect(),
        );
    }
    assert_eq!(commons[0], commons[1]);
    assert_eq!(commons[0], commons[2]);
}

#[test]
fn duplicate_id_is_rejected() {
    let mut tree: SuffixTree<&str, u8> = SuffixTree::new(Builder::McCreight);
    tree.add("a", b"abc").unwrap();
    assert!(matches!(
        tree.add("a", b"xyz"),
        Err(generalized_suffix_tree::Error::DuplicateId)
    ));
}

#[test]
fn empty_sequence_is_rejected() {
    let mut tree: SuffixTree<&str, u8> = SuffixTree::new(Builder::McCreight);
    assert!(matches!(
        tree.add("a", b""),
        Err(generalized_suffix_tree::Error::EmptySequence)
    ));
}

#[test]
fn find_id_scopes_to_one_sequence() {
    for builder in ALL_BUILDERS {
        let mut tree: SuffixTree<&str, u8> = SuffixTree::new(builder);
        tree.add("A", b"xabxac").unwrap();
        tree.add("B", b"awyawxawxz").unwrap();

        assert!(tree.find_id(&"A", b"abx").unwrap(), "{builder:?}");
        assert!(!tree.find_id(&"B", b"abx").unwrap(), "{builder:?}");
        assert!(matches!(
            tree.find_id(&"nope", b"a"),
            Err(generalized_suffix_tree::Error::UnknownId)
        ));
    }
}

#[test]
fn from_mapping_builds_in_one_call() {
    for builder in ALL_BUILDERS {
        let tree: SuffixTree<&str, u8> =
            SuffixTree::from_mapping([("A", &b"xabxac"[..]), ("B", &b"awyawxawxz"[..])], builder).unwrap();

        assert!(tree.find(b"abx"), "{builder:?}");
        assert!(tree.find_id(&"B", b"awx").unwrap(), "{builder:?}");
    }
}

#[test]
fn default_builder_is_mccreight() {
    assert_eq!(Builder::default(), Builder::McCreight);
}

#[test]
fn longest_common_extension_via_lca() {
    let mut tree: SuffixTree<&str, u8> = SuffixTree::new(Builder::McCreight);
    tree.add("A", b"xabxac").unwrap();
    tree.add("B", b"xabyac").unwrap();

    // Both sequences share the prefix "xab" before diverging.
    let len = tree.longest_common_extension(&"A", 0, &"B", 0).unwrap();
    assert_eq!(len, 3);
}
