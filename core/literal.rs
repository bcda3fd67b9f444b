use core::fmt;

use crate::{utils::sextract, Bytes, Error};

/// Integer payload that remembers how many bits it was read from.
///
/// A zero width marks an absent value.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    value: u64,
    bits: u8,
}

impl Literal {
    pub const NONE: Self = Self { value: 0, bits: 0 };

    /// Creates a literal of `bits` width, truncating `value` to fit.
    pub const fn new(value: u64, bits: u8) -> Self {
        let value = match bits {
            0 => 0,
            64.. => value,
            _ => value & ((1 << bits) - 1),
        };
        Self { value, bits }
    }

    pub const fn is_valid(&self) -> bool {
        self.bits != 0
    }

    pub const fn bits(&self) -> u8 {
        self.bits
    }

    pub fn as_signed(&self) -> Option<i64> {
        match self.bits {
            0 => None,
            64 => Some(self.value as i64),
            bits => Some(sextract(self.value, 0, bits as u32)),
        }
    }

    pub fn as_unsigned(&self) -> Option<u64> {
        self.is_valid().then_some(self.value)
    }

    /// Reads a little-endian value of `bits` width from `bytes`.
    ///
    /// On failure neither `self` nor `bytes` is modified. Widths other than
    /// 8, 16, 32 and 64 are rejected with [`Error::BadOperand`].
    pub fn read(&mut self, bytes: &mut Bytes, bits: u8) -> Result<(), Error> {
        let value = match bits {
            8 => bytes.read_u8()? as u64,
            16 => bytes.read_u16()? as u64,
            32 => bytes.read_u32()? as u64,
            64 => bytes.read_u64()?,
            _ => return Err(Error::BadOperand),
        };
        *self = Self { value, bits };
        Ok(())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self.as_signed() {
            Some(signed) => write!(fmt, "i{}(0x{:x} / {signed})", self.bits, self.value),
            None => fmt.write_str("-"),
        }
    }
}
