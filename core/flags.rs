use core::fmt::{self, Write};

use crate::utils::{deposit, zextract};

#[derive(Copy, Clone, Debug)]
pub struct Field {
    start: u8,
    size: u8,
}

impl Field {
    pub const fn new(start: u8, size: u8) -> Self {
        debug_assert!(size != 0 && start < 32 && (start + size) <= 32);
        Self { start, size }
    }

    pub const fn start(&self) -> u32 {
        self.start as u32
    }

    pub const fn size(&self) -> u32 {
        self.size as u32
    }

    pub const fn mask(&self) -> u32 {
        (u32::MAX >> (32 - self.size as u32)) << self.start
    }
}

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Flags {
    raw: u32,
}

impl Flags {
    pub const fn empty() -> Self {
        Self { raw: 0 }
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self { raw }
    }

    pub const fn raw(&self) -> u32 {
        self.raw
    }

    pub fn clear(&mut self, flags: u32) -> &mut Self {
        self.raw &= !flags;
        self
    }

    pub fn set(&mut self, flags: u32) -> &mut Self {
        self.raw |= flags;
        self
    }

    pub fn set_if(&mut self, flags: u32, cond: bool) -> &mut Self {
        if cond {
            self.raw |= flags;
        } else {
            self.raw &= !flags;
        }
        self
    }

    pub const fn any(&self, flags: u32) -> bool {
        self.raw & flags != 0
    }

    pub const fn all(&self, flags: u32) -> bool {
        self.raw & flags == flags
    }

    pub fn field(&self, field: Field) -> u32 {
        zextract(self.raw, field.start(), field.size())
    }

    pub fn field_set(&mut self, field: Field, value: u32) -> &mut Self {
        self.raw = deposit(self.raw, field.start(), field.size(), value);
        self
    }
}

/// Names for the bits of a flag word, used for debug output.
///
/// Bits named with an empty string are hidden from the output.
pub struct BitNames {
    type_name: &'static str,
    names: &'static [(u32, &'static str)],
}

impl BitNames {
    pub const fn new(type_name: &'static str, names: &'static [(u32, &'static str)]) -> Self {
        Self { type_name, names }
    }

    fn hidden_mask(&self) -> u32 {
        self.names
            .iter()
            .filter(|(_, name)| name.is_empty())
            .fold(0, |mask, (bits, _)| mask | bits)
    }

    fn name(&self, bit: u32) -> Option<&'static str> {
        self.names
            .iter()
            .find(|(bits, name)| *bits == bit && !name.is_empty())
            .map(|(_, name)| *name)
    }

    pub fn format(&self, fmt: &mut fmt::Formatter, raw: u32) -> fmt::Result {
        let value = raw & !self.hidden_mask();
        if value == 0 {
            return fmt.write_str("None");
        }

        let mut unknown = 0;
        let mut first = true;
        let mut rest = value;
        while rest != 0 {
            let bit = 1 << rest.trailing_zeros();
            rest &= !bit;
            match self.name(bit) {
                Some(name) => {
                    if !first {
                        fmt.write_char('|')?;
                    }
                    fmt.write_str(name)?;
                    first = false;
                }
                None => unknown |= bit,
            }
        }

        if unknown != 0 {
            if !first {
                fmt.write_char('|')?;
            }
            write!(fmt, "{}({unknown:#x})", self.type_name)?;
        }
        Ok(())
    }
}
