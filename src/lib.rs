//! A generalized suffix tree over arbitrary hashable symbols.
//!
//! Given a set of labeled sequences, [`SuffixTree`] builds a single tree
//! whose paths from the root spell every suffix of every input sequence,
//! then answers substring (`find`, `find_id`, `find_all`),
//! common-substring (`common_substrings`), maximal-repeat
//! (`maximal_repeats`) and lowest-common-ancestor (`longest_common_extension`)
//! queries over it. Three construction strategies are available — `Naive`
//! (quadratic, an oracle for tests), `McCreight` and `Ukkonen` (both linear) —
//! selected once, at construction time.
//!
//! ```
//! use generalized_suffix_tree::{Builder, SuffixTree};
//!
//! let mut tree: SuffixTree<&str, u8> = SuffixTree::new(Builder::McCreight);
//! tree.add("a", b"xabxac").unwrap();
//! assert!(tree.find(b"abx"));
//! assert!(!tree.find(b"abc"));
//! ```

mod builder;
pub mod error;
mod lca;
mod node;
mod path;
mod symbol;
mod tree;
mod util;

pub use builder::Builder;
pub use error::Error;
pub use path::Path;
pub use symbol::{Elem, Symbol};
pub use tree::SuffixTree;
