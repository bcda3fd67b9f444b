use core::{fmt, ops};

use ldasm_core::{
    flags::{BitNames, Field, Flags},
    Literal,
};

use crate::{
    fields::{ModRM, Rex, Sib},
    prefix::{
        PrefixId, PrefixSet, Segment, PREFIX_ADDRESS_SIZE, PREFIX_LOCK, PREFIX_OPERAND_SIZE,
        PREFIX_REP, PREFIX_REPNZ,
    },
};

const PREFIX_FIELD: Field = Field::new(10, 13);

const fn prefix_flag(id: PrefixId) -> Flag {
    Flag(Flags::from_raw((id.bit() as u32) << PREFIX_FIELD.start()))
}

/// Decoded structure bits plus a copy of the prefix set.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Flag(Flags);

impl Flag {
    pub const MODRM: Self = Self(Flags::from_raw(0x001));
    pub const SIB: Self = Self(Flags::from_raw(0x002));
    pub const IMM8: Self = Self(Flags::from_raw(0x004));
    pub const IMM16: Self = Self(Flags::from_raw(0x008));
    pub const IMM32: Self = Self(Flags::from_raw(0x010));
    pub const IMM64: Self = Self(Flags::from_raw(0x020));
    /// Two 16-bit immediates, shares the bit with [`Flag::IMM64`].
    pub const TWO_IMM16: Self = Self::IMM64;
    pub const DISP8: Self = Self(Flags::from_raw(0x040));
    pub const DISP16: Self = Self(Flags::from_raw(0x080));
    pub const DISP32: Self = Self(Flags::from_raw(0x100));
    pub const RELATIVE: Self = Self(Flags::from_raw(0x200));

    pub const NOT_PREFIXED: Self = prefix_flag(PrefixId::Unprefixed);
    pub const REPNZ: Self = prefix_flag(PrefixId::RepNZ);
    pub const REP: Self = prefix_flag(PrefixId::Rep);
    pub const OPSIZE: Self = prefix_flag(PrefixId::OpSize);
    pub const ADDRSIZE: Self = prefix_flag(PrefixId::AddrSize);
    pub const LOCK: Self = prefix_flag(PrefixId::Lock);
    pub const REX: Self = prefix_flag(PrefixId::Rex);
    pub const SEG_DS: Self = prefix_flag(PrefixId::SegDs);
    pub const SEG_CS: Self = prefix_flag(PrefixId::SegCs);
    pub const SEG_SS: Self = prefix_flag(PrefixId::SegSs);
    pub const SEG_ES: Self = prefix_flag(PrefixId::SegEs);
    pub const SEG_FS: Self = prefix_flag(PrefixId::SegFs);
    pub const SEG_GS: Self = prefix_flag(PrefixId::SegGs);

    pub const fn empty() -> Self {
        Self(Flags::empty())
    }

    pub const fn bits(&self) -> u32 {
        self.0.raw()
    }

    pub const fn contains(&self, other: Flag) -> bool {
        self.0.all(other.bits())
    }

    pub const fn intersects(&self, other: Flag) -> bool {
        self.0.any(other.bits())
    }

    pub(crate) fn insert(&mut self, other: Flag) {
        self.0.set(other.bits());
    }

    pub fn prefixes(&self) -> PrefixSet {
        PrefixSet::from_raw(self.0.field(PREFIX_FIELD) as u16)
    }

    /// Replaces the prefix sub-field.
    pub fn with_prefixes(mut self, prefixes: PrefixSet) -> Self {
        self.0.field_set(PREFIX_FIELD, prefixes.raw() as u32);
        self
    }

    /// Merges `prefixes` into the prefix sub-field.
    pub fn add_prefixes(self, prefixes: PrefixSet) -> Self {
        let raw = self.prefixes().raw() | prefixes.raw();
        self.with_prefixes(PrefixSet::from_raw(raw))
    }

    pub fn segment(&self) -> Option<Segment> {
        self.prefixes().segment()
    }

    pub const fn has_modrm(&self) -> bool {
        self.contains(Self::MODRM)
    }

    pub const fn has_sib(&self) -> bool {
        self.contains(Self::SIB)
    }

    pub const fn has_imm8(&self) -> bool {
        self.contains(Self::IMM8)
    }

    pub const fn has_imm16(&self) -> bool {
        self.contains(Self::IMM16)
    }

    pub const fn has_imm32(&self) -> bool {
        self.contains(Self::IMM32)
    }

    pub const fn has_imm64(&self) -> bool {
        self.contains(Self::IMM64)
    }

    /// Same bit as [`Flag::has_imm64`], meaningful in 32-bit mode.
    pub const fn has_two_imm16(&self) -> bool {
        self.contains(Self::TWO_IMM16)
    }

    pub const fn has_disp8(&self) -> bool {
        self.contains(Self::DISP8)
    }

    pub const fn has_disp16(&self) -> bool {
        self.contains(Self::DISP16)
    }

    pub const fn has_disp32(&self) -> bool {
        self.contains(Self::DISP32)
    }

    pub const fn is_relative(&self) -> bool {
        self.contains(Self::RELATIVE)
    }
}

impl ops::BitOr for Flag {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(Flags::from_raw(self.bits() | rhs.bits()))
    }
}

static FLAG_NAMES: BitNames = BitNames::new(
    "Flag",
    &[
        (Flag::MODRM.bits(), "ModRM"),
        (Flag::SIB.bits(), "SIB"),
        (Flag::IMM8.bits(), "Imm8"),
        (Flag::IMM16.bits(), "Imm16"),
        (Flag::IMM32.bits(), "Imm32"),
        (Flag::IMM64.bits(), "Imm64"),
        (Flag::DISP8.bits(), "Disp8"),
        (Flag::DISP16.bits(), "Disp16"),
        (Flag::DISP32.bits(), "Disp32"),
        (Flag::RELATIVE.bits(), "Relative"),
        (Flag::NOT_PREFIXED.bits(), ""),
        (Flag::REPNZ.bits(), "RepNZ"),
        (Flag::REP.bits(), "Rep"),
        (Flag::OPSIZE.bits(), "OpSize"),
        (Flag::ADDRSIZE.bits(), "AddrSize"),
        (Flag::LOCK.bits(), "Lock"),
        (Flag::REX.bits(), "REX"),
        (Flag::SEG_DS.bits(), "DS"),
        (Flag::SEG_CS.bits(), "CS"),
        (Flag::SEG_SS.bits(), "SS"),
        (Flag::SEG_ES.bits(), "ES"),
        (Flag::SEG_FS.bits(), "FS"),
        (Flag::SEG_GS.bits(), "GS"),
    ],
);

impl fmt::Display for Flag {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        FLAG_NAMES.format(fmt, self.bits())
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

/// Result of decoding one instruction.
///
/// `rex`, `modrm` and `sib` hold zero unless the matching flag is set.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Instruction {
    pub(crate) flags: Flag,
    pub(crate) len: u8,
    pub(crate) opcode: u8,
    pub(crate) opcode2: u8,
    pub(crate) rex: Rex,
    pub(crate) modrm: ModRM,
    pub(crate) sib: Sib,
    pub(crate) imm: Literal,
    pub(crate) disp: Literal,
}

impl Instruction {
    pub fn flags(&self) -> Flag {
        self.flags
    }

    /// Number of bytes consumed.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// First opcode byte, `0x0f` for two-byte opcodes.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// Second opcode byte of a two-byte opcode, zero otherwise.
    pub fn opcode2(&self) -> u8 {
        self.opcode2
    }

    pub fn is_two_byte(&self) -> bool {
        self.opcode == 0x0f
    }

    pub fn rex(&self) -> Option<Rex> {
        self.flags.contains(Flag::REX).then_some(self.rex)
    }

    pub fn modrm(&self) -> Option<ModRM> {
        self.flags.has_modrm().then_some(self.modrm)
    }

    pub fn sib(&self) -> Option<Sib> {
        self.flags.has_sib().then_some(self.sib)
    }

    pub fn imm(&self) -> Literal {
        self.imm
    }

    /// Displacement, or the second immediate of far pointers and
    /// [`Flag::TWO_IMM16`] forms.
    pub fn disp(&self) -> Literal {
        self.disp
    }

    pub fn prefixes(&self) -> PrefixSet {
        self.flags.prefixes()
    }

    pub fn segment_prefix(&self) -> Option<u8> {
        self.flags.segment().map(Segment::prefix)
    }

    pub fn rep_prefix(&self) -> Option<u8> {
        if self.flags.contains(Flag::REP) {
            Some(PREFIX_REP)
        } else if self.flags.contains(Flag::REPNZ) {
            Some(PREFIX_REPNZ)
        } else {
            None
        }
    }

    pub fn lock_prefix(&self) -> Option<u8> {
        self.flags.contains(Flag::LOCK).then_some(PREFIX_LOCK)
    }

    pub fn opsize_prefix(&self) -> Option<u8> {
        self.flags
            .contains(Flag::OPSIZE)
            .then_some(PREFIX_OPERAND_SIZE)
    }

    pub fn addrsize_prefix(&self) -> Option<u8> {
        self.flags
            .contains(Flag::ADDRSIZE)
            .then_some(PREFIX_ADDRESS_SIZE)
    }

    /// Conditional jump, short or near.
    pub fn is_jcc(&self) -> bool {
        self.opcode & 0xf0 == 0x70 || (self.is_two_byte() && self.opcode2 & 0xf0 == 0x80)
    }

    pub fn is_jmp(&self) -> bool {
        matches!(self.opcode, 0xe9 | 0xeb)
    }

    pub fn is_ret(&self) -> bool {
        matches!(self.opcode, 0xc2 | 0xc3)
    }

    /// Direct call, any 0xff group form, or a 0x15 opcode byte.
    pub fn is_call(&self) -> bool {
        matches!(self.opcode, 0xe8 | 0xff | 0x15)
    }

    pub fn is_int(&self) -> bool {
        matches!(self.opcode, 0xcc..=0xcf)
    }
}
