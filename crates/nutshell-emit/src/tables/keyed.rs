//! Insertion-ordered key-to-index tables.
//!
//! One shape backs the method and type reference/definition tables: a
//! string key (full signature or full type name) mapped to a dense u16
//! index. Indices stay at or below 0x7FFE so every id fits an operand token
//! with bit 15 free for the reference flag and 0xFFFF reserved as the
//! unresolved sentinel.

use indexmap::IndexMap;
use nutshell_image::{MethodDefId, MethodRefId, TypeDefId, TypeRefId};

use crate::EmitError;

/// Maximum entries per keyed table: ids 0..=0x7FFE.
const MAX_ENTRIES: usize = 0x7FFF;

/// Dense u16 index newtype usable as a keyed-table id.
pub trait TableIndex: Copy {
    /// Table name for error reporting.
    const NAME: &'static str;

    fn from_u16(raw: u16) -> Self;
    fn as_u16(self) -> u16;
}

macro_rules! table_index {
    ($ty:ty, $name:literal) => {
        impl TableIndex for $ty {
            const NAME: &'static str = $name;

            #[inline]
            fn from_u16(raw: u16) -> Self {
                Self(raw)
            }

            #[inline]
            fn as_u16(self) -> u16 {
                self.0
            }
        }
    };
}

table_index!(MethodDefId, "method definition");
table_index!(MethodRefId, "method reference");
table_index!(TypeDefId, "type definition");
table_index!(TypeRefId, "type reference");

/// Deduplicating key -> id table with insertion-ordered iteration.
#[derive(Clone, Debug)]
pub struct KeyedTable<I> {
    entries: IndexMap<String, I>,
}

pub type MethodDefTable = KeyedTable<MethodDefId>;
pub type MethodRefTable = KeyedTable<MethodRefId>;
pub type TypeDefTable = KeyedTable<TypeDefId>;
pub type TypeRefTable = KeyedTable<TypeRefId>;

impl<I> Default for KeyedTable<I> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<I: TableIndex> KeyedTable<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an existing entry. Misses are not errors; the caller decides
    /// whether an absent key means "external" or "bug".
    pub fn lookup(&self, key: &str) -> Option<I> {
        self.entries.get(key).copied()
    }

    /// Get the id for `key`, allocating the next index if absent.
    pub fn get_or_add(&mut self, key: &str) -> Result<I, EmitError> {
        if let Some(&id) = self.entries.get(key) {
            return Ok(id);
        }
        if self.entries.len() >= MAX_ENTRIES {
            return Err(EmitError::TableFull {
                table: I::NAME,
                len: self.entries.len(),
                max: MAX_ENTRIES,
            });
        }

        let id = I::from_u16(self.entries.len() as u16);
        self.entries.insert(key.to_owned(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, I)> {
        self.entries.iter().map(|(k, &id)| (k.as_str(), id))
    }
}
