//! Flag word layout of the reference HDE64 engine, for differential tests
//! against it.

use crate::{Flag, Instruction};

pub const F_MODRM: u32 = 0x0000_0001;
pub const F_SIB: u32 = 0x0000_0002;
pub const F_IMM8: u32 = 0x0000_0004;
pub const F_IMM16: u32 = 0x0000_0008;
pub const F_IMM32: u32 = 0x0000_0010;
pub const F_IMM64: u32 = 0x0000_0020;
pub const F_DISP8: u32 = 0x0000_0040;
pub const F_DISP16: u32 = 0x0000_0080;
pub const F_DISP32: u32 = 0x0000_0100;
pub const F_RELATIVE: u32 = 0x0000_0200;
pub const F_ERROR: u32 = 0x0000_1000;
pub const F_ERROR_OPCODE: u32 = 0x0000_2000;
pub const F_ERROR_LENGTH: u32 = 0x0000_4000;
pub const F_ERROR_LOCK: u32 = 0x0000_8000;
pub const F_ERROR_OPERAND: u32 = 0x0001_0000;
pub const F_PREFIX_NONE: u32 = 0x0080_0000;
pub const F_PREFIX_REPNZ: u32 = 0x0100_0000;
pub const F_PREFIX_REPX: u32 = 0x0200_0000;
pub const F_PREFIX_66: u32 = 0x0400_0000;
pub const F_PREFIX_67: u32 = 0x0800_0000;
pub const F_PREFIX_LOCK: u32 = 0x1000_0000;
pub const F_PREFIX_SEG: u32 = 0x2000_0000;
pub const F_PREFIX_REX: u32 = 0x4000_0000;

/// Structure bits shared with [`Flag`] unchanged.
const STRUCTURE_MASK: u32 = 0x3ff;

const PREFIX_MAP: [(Flag, u32); 7] = [
    (Flag::NOT_PREFIXED, F_PREFIX_NONE),
    (Flag::REPNZ, F_PREFIX_REPNZ),
    (Flag::REP, F_PREFIX_REPX),
    (Flag::OPSIZE, F_PREFIX_66),
    (Flag::ADDRSIZE, F_PREFIX_67),
    (Flag::LOCK, F_PREFIX_LOCK),
    (Flag::REX, F_PREFIX_REX),
];

/// Returns the reference flag word and its `p_seg` byte (zero if none).
pub fn flags(flag: Flag) -> (u32, u8) {
    let mut raw = flag.bits() & STRUCTURE_MASK;
    for (from, to) in PREFIX_MAP {
        if flag.contains(from) {
            raw |= to;
        }
    }
    let segment = match flag.segment() {
        Some(segment) => {
            raw |= F_PREFIX_SEG;
            segment.prefix()
        }
        None => 0,
    };
    (raw, segment)
}

/// Fields of an instruction in the order the reference record stores them.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub len: u8,
    pub p_rep: u8,
    pub p_lock: u8,
    pub p_seg: u8,
    pub p_66: u8,
    pub p_67: u8,
    pub rex: u8,
    pub opcode: u8,
    pub opcode2: u8,
    pub modrm: u8,
    pub sib: u8,
    pub imm: u64,
    pub disp: u64,
    pub flags: u32,
}

impl From<&Instruction> for Record {
    fn from(insn: &Instruction) -> Self {
        let (flags, p_seg) = flags(insn.flags());
        Self {
            len: insn.len() as u8,
            p_rep: insn.rep_prefix().unwrap_or(0),
            p_lock: insn.lock_prefix().unwrap_or(0),
            p_seg,
            p_66: insn.opsize_prefix().unwrap_or(0),
            p_67: insn.addrsize_prefix().unwrap_or(0),
            rex: insn.rex().map_or(0, |rex| rex.raw()),
            opcode: insn.opcode(),
            opcode2: insn.opcode2(),
            modrm: insn.modrm().map_or(0, |modrm| modrm.raw()),
            sib: insn.sib().map_or(0, |sib| sib.raw()),
            imm: insn.imm().as_unsigned().unwrap_or(0),
            disp: insn.disp().as_unsigned().unwrap_or(0),
            flags,
        }
    }
}
