//! Image format definitions for Nutshell.
//!
//! This crate contains the pieces of the image format shared between the
//! build-side emitter and any reader:
//! - Index newtypes and token encodings ([`ids`])
//! - The fixed-width instruction set ([`instr`])
//! - Method descriptors as produced by the front end ([`descriptor`])
//! - The little-endian byte sink ([`writer`])

pub mod descriptor;
pub mod ids;
pub mod instr;
pub mod writer;

pub use descriptor::MethodDescriptor;
pub use ids::{
    CodeOffset, MemberToken, MethodDefId, MethodRefId, StringId, TypeDefId, TypeRefId, TypeToken,
};
pub use instr::Op;
pub use writer::ImageWriter;
