//! Metadata tables consumed during emission.
//!
//! All tables assign dense indices in insertion order. The capability split
//! between lookup and allocation is expressed through receivers: holding
//! `&Table` grants lookup only, `&mut Table` grants allocation. The
//! byte-code generator only ever sees `&` to the keyed tables plus `&mut`
//! to whichever string pool is active for the pass.

mod keyed;
mod strings;

#[cfg(test)]
mod keyed_tests;

pub use keyed::{
    KeyedTable, MethodDefTable, MethodRefTable, TableIndex, TypeDefTable, TypeRefTable,
};
pub use strings::StringTable;
