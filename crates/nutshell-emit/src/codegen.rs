//! Two-pass byte-code generation.
//!
//! The draft pass measures each method's encoded length and discovers its
//! string literals into the staging pool; its output bytes are discarded.
//! The final pass resolves against the merged global pool and the fully
//! populated tables, and its output is persisted. Fixed-width operand
//! encodings keep both passes the same length, which is what makes offsets
//! computed at registration time valid in the written table.

use nutshell_image::{ImageWriter, MemberToken, MethodDescriptor, Op, TypeToken};

use crate::EmitError;
use crate::tables::{MethodDefTable, MethodRefTable, StringTable, TypeDefTable, TypeRefTable};

/// Which pass is running, and therefore which string pool resolves
/// literals and whether the pool may grow.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pass {
    /// Measure lengths and discover strings into the staging pool.
    Draft,
    /// Resolve against the merged global pool; output is persisted.
    Final,
}

/// Read-only table surfaces the generator resolves operands against.
pub(crate) struct RefTables<'a> {
    pub method_defs: &'a MethodDefTable,
    pub method_refs: &'a MethodRefTable,
    pub type_defs: &'a TypeDefTable,
    pub type_refs: &'a TypeRefTable,
}

/// Translate one method body into target bytes.
///
/// Methods without a body short-circuit to an empty blob without touching
/// the encoder.
pub(crate) fn generate(
    method: &MethodDescriptor,
    pass: Pass,
    pool: &mut StringTable,
    tables: &RefTables<'_>,
) -> Result<Vec<u8>, EmitError> {
    let Some(body) = &method.body else {
        return Ok(Vec::new());
    };

    let mut out = ImageWriter::new();
    for op in body {
        encode(op, pass, pool, tables, &mut out)?;
    }
    Ok(out.into_bytes())
}

fn encode(
    op: &Op,
    pass: Pass,
    pool: &mut StringTable,
    tables: &RefTables<'_>,
    out: &mut ImageWriter,
) -> Result<(), EmitError> {
    out.write_u8(op.opcode());

    match op {
        Op::Nop
        | Op::LdNull
        | Op::Dup
        | Op::Pop
        | Op::Add
        | Op::Sub
        | Op::Mul
        | Op::Div
        | Op::Ret => {}

        Op::LdcI4(v) => out.write_i32(*v),

        Op::LdStr(s) => {
            let id = match pass {
                Pass::Draft => pool.get_or_add(s)?,
                // The merge ran before any final pass, so every literal the
                // draft discovered must already be in the global pool.
                Pass::Final => pool
                    .lookup(s)
                    .ok_or_else(|| EmitError::StringNotStaged(s.clone()))?,
            };
            out.write_u16(id.0);
        }

        Op::LdLoc(slot) | Op::StLoc(slot) | Op::LdArg(slot) | Op::StArg(slot) => {
            let slot = u8::try_from(*slot).map_err(|_| EmitError::SlotOutOfRange(*slot))?;
            out.write_u8(slot);
        }

        Op::Call(key) | Op::CallVirt(key) => out.write_u16(member_token(tables, key).0),

        Op::NewObj(name) | Op::NewArr(name) | Op::Box(name) => {
            out.write_u16(type_token(tables, name).0)
        }

        Op::Br(d) | Op::BrTrue(d) | Op::BrFalse(d) => out.write_i16(*d),
    }

    Ok(())
}

/// The definition table wins over the reference table; a miss in both is
/// the unresolved sentinel, left for the downstream linker.
fn member_token(tables: &RefTables<'_>, key: &str) -> MemberToken {
    if let Some(id) = tables.method_defs.lookup(key) {
        return MemberToken::def(id);
    }
    if let Some(id) = tables.method_refs.lookup(key) {
        return MemberToken::reference(id);
    }
    MemberToken::UNRESOLVED
}

fn type_token(tables: &RefTables<'_>, name: &str) -> TypeToken {
    if let Some(id) = tables.type_defs.lookup(name) {
        return TypeToken::def(id);
    }
    if let Some(id) = tables.type_refs.lookup(name) {
        return TypeToken::reference(id);
    }
    TypeToken::UNRESOLVED
}
