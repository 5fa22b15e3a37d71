//! Method registry, offset allocation, and instruction-table writing.
//!
//! The instruction table is built in two phases. During registration every
//! method gets a draft-pass translation whose length fixes its byte offset;
//! other tables store those offsets long before the string/type/method
//! index spaces are final. After the staging strings merge into the global
//! pool, `write` runs the final pass per method and concatenates the
//! persisted bytes, verifying that every blob still lands exactly on its
//! draft-computed offset.

use indexmap::IndexMap;
use nutshell_image::{CodeOffset, ImageWriter, MethodDefId, MethodDescriptor};

use crate::EmitError;
use crate::checksum::NativeChecksum;
use crate::codegen::{self, Pass, RefTables};
use crate::tables::{MethodDefTable, MethodRefTable, StringTable, TypeDefTable, TypeRefTable};

/// Registry id space: ids are u16, so at most 65536 registrations.
const MAX_METHODS: usize = 0x1_0000;

/// One registered method. Immutable once appended.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodRecord {
    method: MethodDescriptor,
    id: MethodDefId,
    offset: CodeOffset,
    /// Draft-pass blob length; the final pass must reproduce it exactly.
    len: usize,
}

impl MethodRecord {
    /// Identity key: the method's full signature string.
    pub fn key(&self) -> &str {
        &self.method.name
    }

    pub fn id(&self) -> MethodDefId {
        self.id
    }

    pub fn offset(&self) -> CodeOffset {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn has_body(&self) -> bool {
        self.method.has_body()
    }
}

/// Running byte offset for the next body-bearing method.
///
/// Threaded through registration as a value rather than hidden in a
/// mutable counter, so the accumulation law (each body method's offset is
/// the sum of all earlier draft lengths) is testable on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetCursor(u16);

impl OffsetCursor {
    pub fn start() -> Self {
        Self(0)
    }

    /// Offset the next body-bearing method would receive.
    pub fn offset(self) -> CodeOffset {
        CodeOffset(self.0)
    }

    /// Advance past a blob of `len` bytes.
    ///
    /// Assigned offsets must stay within `0..=0xFFFE` (0xFFFF is the
    /// no-body sentinel), so overflow is detected rather than wrapped.
    pub fn advance(self, len: usize) -> Result<Self, EmitError> {
        let next = self.0 as usize + len;
        if next > 0xFFFE {
            return Err(EmitError::CodeTooLarge(next));
        }
        Ok(Self(next as u16))
    }
}

/// Non-failing offset lookup result.
///
/// A miss is expected for methods outside this module and is handled by
/// downstream link mechanisms; callers that want to treat a miss as an
/// error can match on [`OffsetLookup::Unresolved`] instead of collapsing
/// to the sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OffsetLookup {
    Resolved(CodeOffset),
    Unresolved,
}

impl OffsetLookup {
    /// Collapse to the wire value: unresolved becomes the 0xFFFF sentinel.
    pub fn or_none(self) -> CodeOffset {
        match self {
            Self::Resolved(offset) => offset,
            Self::Unresolved => CodeOffset::NONE,
        }
    }
}

/// Builder state before the type-definition table is bound.
///
/// The type-definition table is populated by the same driver that feeds
/// registrations, so it arrives after construction. Registration is not
/// available in this state; encoding a type-definition operand without the
/// table would silently produce wrong bytes. [`Self::bind_type_defs`]
/// transitions to the usable [`CodeTable`].
#[derive(Debug)]
pub struct CodeTableBuilder {
    checksum: NativeChecksum,
    strings: StringTable,
    method_defs: MethodDefTable,
    method_refs: MethodRefTable,
    type_refs: TypeRefTable,
}

impl CodeTableBuilder {
    pub fn new(
        checksum: NativeChecksum,
        strings: StringTable,
        method_defs: MethodDefTable,
        method_refs: MethodRefTable,
        type_refs: TypeRefTable,
    ) -> Self {
        Self {
            checksum,
            strings,
            method_defs,
            method_refs,
            type_refs,
        }
    }

    /// Bind the late collaborator and transition to the ready state.
    pub fn bind_type_defs(self, type_defs: TypeDefTable) -> CodeTable {
        CodeTable {
            checksum: self.checksum,
            strings: self.strings,
            staging: Some(StringTable::new()),
            method_defs: self.method_defs,
            method_refs: self.method_refs,
            type_defs,
            type_refs: self.type_refs,
            records: Vec::new(),
            offsets: IndexMap::new(),
            cursor: OffsetCursor::start(),
        }
    }
}

/// The byte-code table under construction.
///
/// Usage is two-phase: all `register` calls first, then `merge_staging`
/// exactly once, then `write` once (it consumes the table). `resolve_offset`
/// is meaningful once the methods it is asked about have registered.
#[derive(Debug)]
pub struct CodeTable {
    checksum: NativeChecksum,
    strings: StringTable,
    /// Staging pool for draft-discovered strings; `None` once merged.
    staging: Option<StringTable>,
    method_defs: MethodDefTable,
    method_refs: MethodRefTable,
    type_defs: TypeDefTable,
    type_refs: TypeRefTable,
    records: Vec<MethodRecord>,
    offsets: IndexMap<String, CodeOffset>,
    cursor: OffsetCursor,
}

/// Per-method layout plus totals, returned by [`CodeTable::write`] for the
/// outer image composer.
#[derive(Clone, Debug)]
pub struct CodeTableSummary {
    pub methods: Vec<MethodRow>,
    /// Total instruction-table size in bytes.
    pub total_size: usize,
    /// Finished native-method checksum.
    pub checksum: u32,
    /// The merged global string table, for the string sections.
    pub strings: StringTable,
}

/// Layout row for one method.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodRow {
    pub key: String,
    pub id: MethodDefId,
    pub offset: CodeOffset,
    pub len: usize,
}

impl CodeTable {
    /// Identifier the next `register` call will assign.
    ///
    /// The method-definition table that drives registration needs to refer
    /// to ids before the corresponding registration happens.
    pub fn next_id(&self) -> u16 {
        self.records.len() as u16
    }

    /// Registered records in id order.
    pub fn records(&self) -> &[MethodRecord] {
        &self.records
    }

    /// Register one method: checksum update (body methods only), draft
    /// translation into the staging pool, id and offset assignment, and
    /// offset-index append.
    pub fn register(&mut self, method: &MethodDescriptor) -> Result<MethodDefId, EmitError> {
        if self.offsets.contains_key(&method.name) {
            return Err(EmitError::DuplicateMethod(method.name.clone()));
        }
        if self.records.len() >= MAX_METHODS {
            return Err(EmitError::TooManyMethods(self.records.len() + 1));
        }
        let staging = self
            .staging
            .as_mut()
            .ok_or_else(|| EmitError::RegisterAfterMerge(method.name.clone()))?;

        if method.has_body() {
            self.checksum.update(method);
        }

        let tables = RefTables {
            method_defs: &self.method_defs,
            method_refs: &self.method_refs,
            type_defs: &self.type_defs,
            type_refs: &self.type_refs,
        };
        let blob = codegen::generate(method, Pass::Draft, staging, &tables)?;

        let id = MethodDefId(self.records.len() as u16);
        let (offset, len) = if method.has_body() {
            let offset = self.cursor.offset();
            self.cursor = self.cursor.advance(blob.len())?;
            (offset, blob.len())
        } else {
            (CodeOffset::NONE, 0)
        };

        self.offsets.insert(method.name.clone(), offset);
        self.records.push(MethodRecord {
            method: method.clone(),
            id,
            offset,
            len,
        });
        Ok(id)
    }

    /// Look up the registered offset for an identity key.
    pub fn resolve_offset(&self, key: &str) -> OffsetLookup {
        match self.offsets.get(key) {
            Some(&offset) => OffsetLookup::Resolved(offset),
            None => OffsetLookup::Unresolved,
        }
    }

    /// Merge draft-discovered strings into the global pool.
    ///
    /// Must run after the last registration and before `write`, exactly
    /// once: the global string ordering becomes final here.
    pub fn merge_staging(&mut self) -> Result<(), EmitError> {
        let staging = self.staging.take().ok_or(EmitError::StagingAlreadyMerged)?;
        self.strings.merge(&staging)
    }

    /// Emit the final instruction table into `out`.
    ///
    /// Consumes the table: the emission phase runs once. Methods are
    /// concatenated in id order with no padding or alignment; body-less
    /// methods contribute nothing. Byte 0 of the emitted region is the
    /// first byte of the lowest-id body-bearing method, and every body
    /// starts exactly at its registered offset.
    pub fn write(self, out: &mut ImageWriter) -> Result<CodeTableSummary, EmitError> {
        if self.staging.is_some() {
            return Err(EmitError::StagingNotMerged);
        }

        let CodeTable {
            checksum,
            mut strings,
            method_defs,
            method_refs,
            type_defs,
            type_refs,
            records,
            ..
        } = self;

        let tables = RefTables {
            method_defs: &method_defs,
            method_refs: &method_refs,
            type_defs: &type_defs,
            type_refs: &type_refs,
        };

        let base = out.position();
        let mut methods = Vec::with_capacity(records.len());

        for record in &records {
            if record.has_body() {
                debug_assert_eq!(out.position() - base, record.offset.0 as usize);

                let blob = codegen::generate(&record.method, Pass::Final, &mut strings, &tables)?;
                if blob.len() != record.len {
                    return Err(EmitError::OffsetDrift {
                        key: record.key().to_owned(),
                        draft_len: record.len,
                        final_len: blob.len(),
                    });
                }
                out.write_bytes(&blob);
            }

            methods.push(MethodRow {
                key: record.key().to_owned(),
                id: record.id,
                offset: record.offset,
                len: record.len,
            });
        }

        Ok(CodeTableSummary {
            methods,
            total_size: out.position() - base,
            checksum: checksum.finish(),
            strings,
        })
    }
}
