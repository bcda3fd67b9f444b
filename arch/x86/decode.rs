use ldasm_core::{Bytes, Error};

use crate::{
    fields::{ModRM, Rex, Sib},
    insn::{Flag, Instruction},
    mode::{reg_excluded, Mode},
    prefix::{PrefixId, PrefixSet},
    INSN_MAX_LEN,
};

/// Upper bound of prefix bytes examined before the opcode.
const PREFIX_LOOP_MAX: usize = 16;

// Shape bits from the opcode tables.
const C_MODRM: u8 = 0x01;
const C_IMM8: u8 = 0x02;
const C_IMM16: u8 = 0x04;
const C_IMM_P66: u8 = 0x10;
const C_REL8: u8 = 0x20;
const C_REL32: u8 = 0x40;
const C_GROUP: u8 = 0x80;
const C_ERROR: u8 = 0xff;

// Prefix bits as stored in the tables.
const T_NONE: u8 = 0x01;
const T_REPNZ: u8 = 0x02;
const T_REP: u8 = 0x04;
const T_OPSIZE: u8 = 0x08;

const OPCODE_ESCAPE: u8 = 0x0f;

/// Decodes the instruction at the start of `code`.
///
/// At most [`INSN_MAX_LEN`] bytes are examined.
pub fn decode(mode: &Mode, code: &[u8]) -> Result<Instruction, Error> {
    Decoder {
        mode,
        bytes: Bytes::limit(code, INSN_MAX_LEN),
        insn: Instruction::default(),
        prefixes: PrefixSet::empty(),
        force64: false,
    }
    .decode()
}

struct Decoder<'a> {
    mode: &'a Mode,
    bytes: Bytes<'a>,
    insn: Instruction,
    prefixes: PrefixSet,
    /// Operand forced to 64 bits (MOV r64, imm64 and moffs forms).
    force64: bool,
}

impl Decoder<'_> {
    fn has(&self, id: PrefixId) -> bool {
        self.prefixes.contains(id)
    }

    fn set(&mut self, flag: Flag) {
        self.insn.flags.insert(flag);
    }

    fn read_imm(&mut self, flag: Flag, bits: u8) -> Result<(), Error> {
        self.set(flag);
        self.insn.imm.read(&mut self.bytes, bits)
    }

    fn read_disp(&mut self, flag: Flag, bits: u8) -> Result<(), Error> {
        self.set(flag);
        self.insn.disp.read(&mut self.bytes, bits)
    }

    fn decode(mut self) -> Result<Instruction, Error> {
        let mut byte = 0;
        for _ in 0..PREFIX_LOOP_MAX {
            byte = self.bytes.read_u8()?;
            match PrefixId::from_byte(byte) {
                Some(id) => {
                    self.prefixes.add(id);
                }
                None => break,
            }
        }
        if self.prefixes.is_empty() {
            self.prefixes.add(PrefixId::Unprefixed);
        }
        self.insn.flags = Flag::empty().with_prefixes(self.prefixes);

        if self.mode.is_64bit() && byte & 0xf0 == 0x40 {
            let rex = Rex::new(byte);
            self.set(Flag::REX);
            self.insn.rex = rex;
            if rex.w() && matches!(self.bytes.peek_u8(), Some(next) if next & 0xf8 == 0xb8) {
                self.force64 = true;
            }
            byte = self.bytes.read_u8()?;
            if byte & 0xf0 == 0x40 {
                return Err(Error::UnknownOpcode);
            }
        }

        self.insn.opcode = byte;
        let escaped = byte == OPCODE_ESCAPE;
        let opcode = if escaped {
            let opcode = self.bytes.read_u8()?;
            self.insn.opcode2 = opcode;
            opcode
        } else {
            if (0xa0..=0xa3).contains(&byte) {
                self.force64 = true;
                if self.has(PrefixId::AddrSize) {
                    self.prefixes.add(PrefixId::OpSize);
                } else {
                    self.prefixes.remove(PrefixId::OpSize);
                }
            }
            byte
        };

        let mut shape = self.mode.shape(escaped, opcode);
        if shape == C_ERROR {
            return Err(Error::UnknownOpcode);
        }
        let mut illegal_regs = 0;
        if shape & C_GROUP != 0 {
            (shape, illegal_regs) = self.mode.group(escaped, shape & !C_GROUP);
        }

        // 0x0f 0x00 takes the one-byte paths below
        let two_byte = self.insn.opcode2 != 0;
        let table_prefixes = self.prefixes.table_mask();
        if two_byte && self.mode.illegal_prefixes2(opcode) & table_prefixes != 0 {
            return Err(Error::UnknownOpcode);
        }

        if shape & C_MODRM != 0 {
            let modrm = ModRM::new(self.bytes.read_u8()?);
            self.set(Flag::MODRM);
            self.insn.modrm = modrm;
            shape = self.decode_modrm(modrm, two_byte, opcode, shape, illegal_regs)?;
        } else if self.has(PrefixId::Lock) {
            return Err(Error::InvalidLock);
        }

        self.decode_immediates(shape)?;
        self.insn.len = self.bytes.offset() as u8;
        Ok(self.insn)
    }

    /// Validates the ModRM form and reads SIB and displacement. Returns the
    /// shape with immediates promoted for the 0xf6/0xf7 groups.
    fn decode_modrm(
        &mut self,
        modrm: ModRM,
        two_byte: bool,
        opcode: u8,
        mut shape: u8,
        illegal_regs: u8,
    ) -> Result<u8, Error> {
        let mut mod_ = modrm.mod_();
        let reg = modrm.reg();
        let rm = modrm.rm();

        if illegal_regs != 0 && reg_excluded(illegal_regs, reg) {
            return Err(Error::UnknownOpcode);
        }

        if !two_byte && (0xd9..=0xdf).contains(&opcode) {
            let index = opcode - 0xd9;
            let illegal = if mod_ == 3 {
                reg_excluded(self.mode.fpu_mask(index, Some(reg)), rm)
            } else {
                reg_excluded(self.mode.fpu_mask(index, None), reg)
            };
            if illegal {
                return Err(Error::UnknownOpcode);
            }
        }

        if self.has(PrefixId::Lock)
            && (mod_ == 3 || !self.mode.lock_allowed(two_byte, opcode, reg))
        {
            return Err(Error::InvalidLock);
        }

        match (two_byte, opcode) {
            // mov to/from control registers
            (true, 0x20 | 0x22) => {
                mod_ = 3;
                if reg > 4 || reg == 1 {
                    return Err(Error::BadOperand);
                }
            }
            // mov to/from debug registers
            (true, 0x21 | 0x23) => {
                mod_ = 3;
                if reg == 4 || reg == 5 {
                    return Err(Error::BadOperand);
                }
            }
            (false, 0x8c) if reg > 5 => return Err(Error::BadOperand),
            (false, 0x8e) if reg == 1 || reg > 5 => return Err(Error::BadOperand),
            _ => {}
        }

        let table_prefixes = self.prefixes.table_mask();
        if mod_ == 3 {
            if self
                .mode
                .register_form_denied(two_byte, opcode, table_prefixes, reg)
            {
                return Err(Error::BadOperand);
            }
        } else if two_byte {
            // register-only forms given a memory operand
            let denied = match opcode {
                0x50 | 0xd7 | 0xf7 => table_prefixes & (T_NONE | T_OPSIZE) != 0,
                0xd6 => table_prefixes & (T_REPNZ | T_REP) != 0,
                0xc5 => true,
                _ => false,
            };
            if denied {
                return Err(Error::BadOperand);
            }
        }

        // test r/m, imm; also hit by 0x0f 0xf6 and 0x0f 0xf7
        if reg <= 1 {
            match opcode {
                0xf6 => shape |= C_IMM8,
                0xf7 => shape |= C_IMM_P66,
                _ => {}
            }
        }

        let addr16 = self.has(PrefixId::AddrSize);
        let mut disp_size = match mod_ {
            0 if addr16 && rm == 6 => 2,
            0 if !addr16 && rm == 5 => 4,
            1 => 1,
            2 if addr16 => 2,
            2 => 4,
            _ => 0,
        };

        if mod_ != 3 && rm == 4 && (self.mode.is_64bit() || !addr16) {
            let sib = Sib::new(self.bytes.read_u8()?);
            self.set(Flag::SIB);
            self.insn.sib = sib;
            if sib.base() == 5 && mod_ & 1 == 0 {
                disp_size = 4;
            }
        }

        match disp_size {
            1 => self.read_disp(Flag::DISP8, 8)?,
            2 => self.read_disp(Flag::DISP16, 16)?,
            4 => self.read_disp(Flag::DISP32, 32)?,
            _ => {}
        }

        Ok(shape)
    }

    fn decode_immediates(&mut self, mut shape: u8) -> Result<(), Error> {
        let long = self.mode.is_64bit();
        let opsize = self.has(PrefixId::OpSize);

        if shape & C_IMM_P66 != 0 {
            if shape & C_REL32 != 0 {
                if opsize {
                    // near relative with 16-bit operand, nothing follows
                    return self.read_imm(Flag::RELATIVE | Flag::IMM16, 16);
                }
                shape &= !(C_IMM16 | C_IMM8);
            } else if long {
                if self.force64 {
                    self.read_imm(Flag::IMM64, 64)?;
                } else if !opsize {
                    self.read_imm(Flag::IMM32, 32)?;
                } else {
                    shape |= C_IMM16;
                }
            } else if opsize {
                self.read_imm(Flag::IMM16, 16)?;
            } else {
                self.read_imm(Flag::IMM32, 32)?;
            }
        }

        if shape & C_IMM16 != 0 {
            let flags = self.insn.flags;
            if long {
                self.read_imm(Flag::IMM16, 16)?;
            } else if flags.has_imm32() {
                self.read_disp(Flag::IMM16, 16)?;
            } else if flags.has_imm16() {
                self.read_disp(Flag::TWO_IMM16, 16)?;
            } else {
                self.read_imm(Flag::IMM16, 16)?;
            }
        }

        if shape & C_IMM8 != 0 {
            self.read_imm(Flag::IMM8, 8)?;
        }

        if shape & C_REL32 != 0 {
            self.read_imm(Flag::RELATIVE | Flag::IMM32, 32)?;
        } else if shape & C_REL8 != 0 {
            self.read_imm(Flag::RELATIVE | Flag::IMM8, 8)?;
        }

        Ok(())
    }
}
