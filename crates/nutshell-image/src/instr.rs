//! Fixed-width instruction set for the Nutshell VM.
//!
//! Every operand encoding has a size that does not depend on the value of
//! the resolved index: string, member, and type operands are always `u16`
//! tokens, branch displacements are `i16`, integer constants are `i32`,
//! slot indices are `u8`. This is what lets the emitter fix byte offsets
//! from a draft pass and keep them valid after the index spaces change.

use serde::{Deserialize, Serialize};

/// One instruction, pre-resolution.
///
/// String, member, and type operands are symbolic here; the emitter turns
/// them into table indices. Member and type operands name their target by
/// identity key (full signature string, full type name).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Op {
    Nop,
    /// Push a 32-bit integer constant.
    LdcI4(i32),
    /// Push a string literal.
    LdStr(String),
    LdNull,
    Dup,
    Pop,
    /// Load/store a local slot.
    LdLoc(u16),
    StLoc(u16),
    /// Load/store an argument slot.
    LdArg(u16),
    StArg(u16),
    Add,
    Sub,
    Mul,
    Div,
    /// Call a method by identity key.
    Call(String),
    CallVirt(String),
    /// Allocate an instance of the named type and invoke its constructor.
    NewObj(String),
    /// Allocate an array with the named element type.
    NewArr(String),
    /// Box a value of the named type.
    Box(String),
    /// Branch, displacement in bytes relative to the next instruction.
    Br(i16),
    BrTrue(i16),
    BrFalse(i16),
    Ret,
}

impl Op {
    /// Opcode byte.
    pub fn opcode(&self) -> u8 {
        match self {
            Op::Nop => 0x00,
            Op::LdcI4(_) => 0x01,
            Op::LdStr(_) => 0x02,
            Op::LdNull => 0x03,
            Op::Dup => 0x04,
            Op::Pop => 0x05,
            Op::LdLoc(_) => 0x06,
            Op::StLoc(_) => 0x07,
            Op::LdArg(_) => 0x08,
            Op::StArg(_) => 0x09,
            Op::Add => 0x0A,
            Op::Sub => 0x0B,
            Op::Mul => 0x0C,
            Op::Div => 0x0D,
            Op::Call(_) => 0x10,
            Op::CallVirt(_) => 0x11,
            Op::NewObj(_) => 0x12,
            Op::NewArr(_) => 0x13,
            Op::Box(_) => 0x14,
            Op::Br(_) => 0x18,
            Op::BrTrue(_) => 0x19,
            Op::BrFalse(_) => 0x1A,
            Op::Ret => 0x1F,
        }
    }

    /// Encoded size in bytes: opcode byte plus fixed-width operand.
    pub fn size(&self) -> usize {
        let operand = match self {
            Op::LdcI4(_) => 4,
            Op::LdStr(_)
            | Op::Call(_)
            | Op::CallVirt(_)
            | Op::NewObj(_)
            | Op::NewArr(_)
            | Op::Box(_)
            | Op::Br(_)
            | Op::BrTrue(_)
            | Op::BrFalse(_) => 2,
            Op::LdLoc(_) | Op::StLoc(_) | Op::LdArg(_) | Op::StArg(_) => 1,
            Op::Nop
            | Op::LdNull
            | Op::Dup
            | Op::Pop
            | Op::Add
            | Op::Sub
            | Op::Mul
            | Op::Div
            | Op::Ret => 0,
        };
        1 + operand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_are_fixed_width() {
        assert_eq!(Op::Nop.size(), 1);
        assert_eq!(Op::Ret.size(), 1);
        assert_eq!(Op::LdLoc(3).size(), 2);
        assert_eq!(Op::LdStr("a".into()).size(), 3);
        assert_eq!(Op::LdStr("a much longer literal".into()).size(), 3);
        assert_eq!(Op::Call("A::f()".into()).size(), 3);
        assert_eq!(Op::Br(-4).size(), 3);
        assert_eq!(Op::LdcI4(i32::MIN).size(), 5);
    }

    #[test]
    fn opcodes_are_distinct() {
        let ops = [
            Op::Nop,
            Op::LdcI4(0),
            Op::LdStr(String::new()),
            Op::LdNull,
            Op::Dup,
            Op::Pop,
            Op::LdLoc(0),
            Op::StLoc(0),
            Op::LdArg(0),
            Op::StArg(0),
            Op::Add,
            Op::Sub,
            Op::Mul,
            Op::Div,
            Op::Call(String::new()),
            Op::CallVirt(String::new()),
            Op::NewObj(String::new()),
            Op::NewArr(String::new()),
            Op::Box(String::new()),
            Op::Br(0),
            Op::BrTrue(0),
            Op::BrFalse(0),
            Op::Ret,
        ];
        let mut seen = std::collections::HashSet::new();
        for op in &ops {
            assert!(seen.insert(op.opcode()), "duplicate opcode {:#04x}", op.opcode());
        }
    }
}
