//! Error types surfaced by the public API.

/// Errors returned by the fallible operations on [`crate::SuffixTree`].
///
/// All errors surface synchronously; there is no partial-failure state. A
/// failed `add` never mutates the tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// `add` was called with a sequence id that is already present.
    #[error("sequence id is already present in the tree")]
    DuplicateId,
    /// `find_id` (or another id-scoped query) named an id that was never added.
    #[error("sequence id was never added to the tree")]
    UnknownId,
    /// `add` was called with a zero-length sequence.
    #[error("cannot add an empty sequence")]
    EmptySequence,
}
