use core::fmt;

use ldasm_core::Error;

use crate::{
    decode,
    tables::{TABLE32, TABLE32_OFFSETS, TABLE64, TABLE64_OFFSETS},
    Instruction,
};

/// Start of each sub-table inside a mode's classification data.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Offsets {
    pub(crate) opcodes2: usize,
    pub(crate) fpu_reg: usize,
    pub(crate) fpu_modrm: usize,
    pub(crate) prefixes2: usize,
    pub(crate) lock: usize,
    pub(crate) lock2: usize,
    pub(crate) only_mem: usize,
    pub(crate) only_mem2: usize,
}

/// Operating width together with its opcode classification tables.
pub struct Mode {
    long: bool,
    table: &'static [u8],
    offsets: Offsets,
}

/// Protected mode, 32-bit default operand and address size.
pub static MODE32: Mode = Mode {
    long: false,
    table: &TABLE32,
    offsets: TABLE32_OFFSETS,
};

/// Long mode.
pub static MODE64: Mode = Mode {
    long: true,
    table: &TABLE64,
    offsets: TABLE64_OFFSETS,
};

impl fmt::Debug for Mode {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Mode({})", self.bits())
    }
}

impl PartialEq for Mode {
    fn eq(&self, other: &Self) -> bool {
        self.long == other.long
    }
}

impl Eq for Mode {}

impl Mode {
    pub fn is_64bit(&self) -> bool {
        self.long
    }

    pub fn bits(&self) -> u32 {
        if self.long {
            64
        } else {
            32
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Instruction, Error> {
        decode::decode(self, bytes)
    }

    /// Two-level lookup: `opcode >> 2` selects a row start and `opcode & 3`
    /// the entry inside it. Rows are relative to `base`.
    fn lookup(&self, base: usize, opcode: u8) -> u8 {
        let table = &self.table[base..];
        table[table[opcode as usize >> 2] as usize + (opcode as usize & 3)]
    }

    /// Shape bits of a one-byte (`two_byte == false`) or 0x0f-escaped opcode.
    pub(crate) fn shape(&self, two_byte: bool, opcode: u8) -> u8 {
        let base = if two_byte { self.offsets.opcodes2 } else { 0 };
        self.lookup(base, opcode)
    }

    /// Resolves a group entry into real shape bits and an illegal-reg mask.
    pub(crate) fn group(&self, two_byte: bool, index: u8) -> (u8, u8) {
        let base = if two_byte { self.offsets.opcodes2 } else { 0 };
        let table = &self.table[base..];
        let index = index as usize;
        (table[index], table[index + 1])
    }

    /// Prefixes forbidden for a 0x0f-escaped opcode.
    pub(crate) fn illegal_prefixes2(&self, opcode: u8) -> u8 {
        self.lookup(self.offsets.prefixes2, opcode)
    }

    /// Illegal-encoding mask for x87 escapes 0xd9..=0xdf; `opcode` is the
    /// offset from 0xd9.
    pub(crate) fn fpu_mask(&self, opcode: u8, modrm_reg: Option<u8>) -> u8 {
        let index = opcode as usize;
        match modrm_reg {
            Some(reg) => self.table[self.offsets.fpu_modrm + index * 8 + reg as usize],
            None => self.table[self.offsets.fpu_reg + index],
        }
    }

    /// LOCK legality; only the first matching entry counts.
    pub(crate) fn lock_allowed(&self, two_byte: bool, opcode: u8, reg: u8) -> bool {
        let (range, opcode) = if two_byte {
            (self.offsets.lock2..self.offsets.only_mem, opcode)
        } else {
            (self.offsets.lock..self.offsets.lock2, opcode & 0xfe)
        };
        self.table[range]
            .chunks_exact(2)
            .find(|entry| entry[0] == opcode)
            .map_or(false, |entry| !reg_excluded(entry[1], reg))
    }

    /// Register-form restriction: the entry lists the prefixes it applies
    /// to and the `reg` values that stay legal.
    pub(crate) fn register_form_denied(
        &self,
        two_byte: bool,
        opcode: u8,
        prefixes: u8,
        reg: u8,
    ) -> bool {
        let range = if two_byte {
            self.offsets.only_mem2..self.table.len()
        } else {
            self.offsets.only_mem..self.offsets.only_mem2
        };
        self.table[range]
            .chunks_exact(3)
            .find(|entry| entry[0] == opcode)
            .map_or(false, |entry| {
                entry[1] & prefixes != 0 && !reg_excluded(entry[2], reg)
            })
    }
}

/// Tests bit `7 - reg` of a per-register mask.
pub(crate) fn reg_excluded(mask: u8, reg: u8) -> bool {
    (mask << reg) & 0x80 != 0
}
