//! Error types for table building and emission.

use thiserror::Error;

/// Error during metadata table building or byte-code emission.
///
/// Every variant is fatal to the image build: a wrong length or a wrapped
/// index would invalidate the offsets stored in every other table, so there
/// is no partial-success state. Unresolved references are deliberately not
/// represented here; they resolve to sentinel tokens instead (see
/// `OffsetLookup` and the token types).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EmitError {
    #[error("too many methods: {0} (max 65536)")]
    TooManyMethods(usize),

    #[error("instruction table exceeds the 16-bit offset range ({0} bytes)")]
    CodeTooLarge(usize),

    #[error("duplicate method registration: {0}")]
    DuplicateMethod(String),

    #[error("{table} table full: {len} entries (max {max})")]
    TableFull {
        table: &'static str,
        len: usize,
        max: usize,
    },

    #[error("string missing from merged table: {0:?}")]
    StringNotStaged(String),

    #[error("staging pool not merged before final emission")]
    StagingNotMerged,

    #[error("staging pool already merged")]
    StagingAlreadyMerged,

    #[error("method registered after staging merge: {0}")]
    RegisterAfterMerge(String),

    #[error("slot index out of range: {0} (max 255)")]
    SlotOutOfRange(u16),

    #[error("method {key}: final length {final_len} != draft length {draft_len}")]
    OffsetDrift {
        key: String,
        draft_len: usize,
        final_len: usize,
    },
}
