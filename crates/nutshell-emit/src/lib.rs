//! Metadata table builders and byte-code emission for Nutshell images.
//!
//! The centerpiece is the two-pass byte-code table: [`CodeTableBuilder`]
//! collects collaborators and binds the late type-definition table,
//! [`CodeTable::register`] assigns stable ids and byte offsets from a
//! draft translation of each method, and [`CodeTable::write`] emits the
//! final contiguous instruction table whose offsets every other metadata
//! table in the image references.
//!
//! Offsets computed at registration time stay valid through the final pass
//! because all operand encodings are fixed-width: substituting staging
//! string ids for merged global ids never changes an instruction's size.

mod checksum;
mod code_table;
mod codegen;
mod dump;
mod error;
pub mod tables;


pub use checksum::NativeChecksum;
pub use code_table::{
    CodeTable, CodeTableBuilder, CodeTableSummary, MethodRecord, MethodRow, OffsetCursor,
    OffsetLookup,
};
pub use codegen::Pass;
pub use dump::dump;
pub use error::EmitError;
