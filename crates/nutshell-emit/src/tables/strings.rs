//! String table with staging support.
//!
//! String literals are discovered during the draft pass, when the global
//! ordering of strings across the whole module is not yet final. Adding
//! them straight to the global table would make its ids unstable, so the
//! draft pass writes into a disposable staging table that is merged into
//! the global one exactly once, after the last method registers and before
//! any final-pass generation.

use std::collections::HashMap;

use nutshell_image::StringId;

use crate::EmitError;

/// Ids 0..=0xFFFE; 0xFFFF is never a valid string id.
const MAX_STRINGS: usize = 0xFFFF;

/// Deduplicating string table assigning dense u16 ids.
#[derive(Clone, Debug, Default)]
pub struct StringTable {
    lookup: HashMap<String, StringId>,
    strings: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the id for `s`, appending it if absent.
    pub fn get_or_add(&mut self, s: &str) -> Result<StringId, EmitError> {
        if let Some(&id) = self.lookup.get(s) {
            return Ok(id);
        }
        if self.strings.len() >= MAX_STRINGS {
            return Err(EmitError::TableFull {
                table: "string",
                len: self.strings.len(),
                max: MAX_STRINGS,
            });
        }

        let id = StringId(self.strings.len() as u16);
        self.strings.push(s.to_owned());
        self.lookup.insert(s.to_owned(), id);
        Ok(id)
    }

    /// Look up without allocating.
    pub fn lookup(&self, s: &str) -> Option<StringId> {
        self.lookup.get(s).copied()
    }

    /// Resolve an id back to its string.
    ///
    /// # Panics
    /// Panics if the id was not allocated by this table.
    pub fn get_str(&self, id: StringId) -> &str {
        &self.strings[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Union `staging` into self: existing entries keep their ids, new
    /// strings are appended in staging order. Staging ids do not survive.
    pub fn merge(&mut self, staging: &StringTable) -> Result<(), EmitError> {
        for s in &staging.strings {
            self.get_or_add(s)?;
        }
        Ok(())
    }

    /// Emit the string blob and its offset table.
    ///
    /// The offsets array has `len() + 1` entries; the last is the total
    /// blob size, so entry lengths are derived by subtraction.
    pub fn to_blob(&self) -> (Vec<u8>, Vec<u32>) {
        let mut blob = Vec::new();
        let mut offsets = Vec::with_capacity(self.strings.len() + 1);

        for s in &self.strings {
            offsets.push(blob.len() as u32);
            blob.extend_from_slice(s.as_bytes());
        }
        offsets.push(blob.len() as u32);

        (blob, offsets)
    }
}
