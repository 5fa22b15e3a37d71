//! Image index newtypes and operand token encodings.

/// Index into the string table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct StringId(pub u16);

/// Index into the method definition table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct MethodDefId(pub u16);

/// Index into the method reference table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct MethodRefId(pub u16);

/// Index into the type definition table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct TypeDefId(pub u16);

/// Index into the type reference table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(transparent)]
pub struct TypeRefId(pub u16);

/// Byte offset into the instruction table where a method's code begins.
///
/// `NONE` (0xFFFF) marks methods without a code body. Valid assigned
/// offsets are `0..=0xFFFE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct CodeOffset(pub u16);

impl CodeOffset {
    pub const NONE: Self = Self(0xFFFF);

    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0xFFFF
    }
}

/// Method operand token.
///
/// Bit 15 clear: index into the method definition table. Bit 15 set: index
/// into the method reference table. `0xFFFF` is the unresolved sentinel,
/// which is why reference ids stop at `0x7FFE`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct MemberToken(pub u16);

impl MemberToken {
    pub const UNRESOLVED: Self = Self(0xFFFF);

    #[inline]
    pub fn def(id: MethodDefId) -> Self {
        Self(id.0)
    }

    #[inline]
    pub fn reference(id: MethodRefId) -> Self {
        Self(0x8000 | id.0)
    }

    #[inline]
    pub fn is_unresolved(self) -> bool {
        self.0 == 0xFFFF
    }

    #[inline]
    pub fn is_reference(self) -> bool {
        !self.is_unresolved() && self.0 & 0x8000 != 0
    }

    /// Table-relative index, with the reference bit stripped.
    #[inline]
    pub fn index(self) -> u16 {
        self.0 & 0x7FFF
    }
}

/// Type operand token. Same layout as [`MemberToken`]: bit 15 selects the
/// reference table over the definition table, `0xFFFF` is unresolved.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct TypeToken(pub u16);

impl TypeToken {
    pub const UNRESOLVED: Self = Self(0xFFFF);

    #[inline]
    pub fn def(id: TypeDefId) -> Self {
        Self(id.0)
    }

    #[inline]
    pub fn reference(id: TypeRefId) -> Self {
        Self(0x8000 | id.0)
    }

    #[inline]
    pub fn is_unresolved(self) -> bool {
        self.0 == 0xFFFF
    }

    #[inline]
    pub fn is_reference(self) -> bool {
        !self.is_unresolved() && self.0 & 0x8000 != 0
    }

    #[inline]
    pub fn index(self) -> u16 {
        self.0 & 0x7FFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_offset_sentinel() {
        assert!(CodeOffset::NONE.is_none());
        assert!(!CodeOffset(0).is_none());
        assert!(!CodeOffset(0xFFFE).is_none());
    }

    #[test]
    fn member_token_def_keeps_index() {
        let tok = MemberToken::def(MethodDefId(42));
        assert!(!tok.is_reference());
        assert!(!tok.is_unresolved());
        assert_eq!(tok.index(), 42);
    }

    #[test]
    fn member_token_reference_sets_high_bit() {
        let tok = MemberToken::reference(MethodRefId(42));
        assert!(tok.is_reference());
        assert_eq!(tok.0, 0x802A);
        assert_eq!(tok.index(), 42);
    }

    #[test]
    fn unresolved_token_is_not_a_reference() {
        assert!(MemberToken::UNRESOLVED.is_unresolved());
        assert!(!MemberToken::UNRESOLVED.is_reference());
        assert!(TypeToken::UNRESOLVED.is_unresolved());
        assert!(!TypeToken::UNRESOLVED.is_reference());
    }

    #[test]
    fn type_token_roundtrip() {
        assert_eq!(TypeToken::def(TypeDefId(7)).index(), 7);
        assert_eq!(TypeToken::reference(TypeRefId(0x7FFE)).index(), 0x7FFE);
        assert!(TypeToken::reference(TypeRefId(0x7FFE)).is_reference());
    }
}
