//! Length disassembler for x86 and x86-64 machine code.
//!
//! ```
//! use ldasm::{Decoder, Options, Summary, MODE64};
//!
//! // push rbp; mov rbp, rsp; an invalid 0x0f 0xff; ret
//! let code = [0x55, 0x48, 0x89, 0xe5, 0x0f, 0xff, 0xc3];
//! let decoder = Decoder::new(&MODE64, 0x1000, Options::default());
//! let summary = Summary::collect(decoder.walk(&code));
//! // resync lands on 0xff 0xc3
//! assert_eq!(summary.insns(), 3);
//! assert_eq!(summary.errors(), 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "print")]
mod printer;

use core::fmt;

pub use ldasm_core::{Error, Literal};
pub use ldasm_x86::{
    self as x86, Flag, Instruction, Mode, PrefixId, PrefixSet, Segment, INSN_MAX_LEN, MODE32,
    MODE64,
};

#[cfg(feature = "print")]
pub use crate::printer::{FormatterFn, Printer, PrinterExt, Style, Symbols, SymbolsInfo};

/// Zero runs are elided in blocks of this size.
const SKIP_ZEROES: usize = 8;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Decode runs of zero bytes instead of eliding them.
    pub decode_zeroes: bool,
    /// Print raw instruction bytes in listings.
    pub show_raw_insn: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            decode_zeroes: false,
            show_raw_insn: true,
        }
    }
}

/// Returns the length of the zero run at the front of `data` that should be
/// elided, or `None` if the bytes must be decoded.
///
/// Runs are elided in whole blocks; a run shorter than two blocks is kept.
#[cfg_attr(not(feature = "print"), allow(dead_code))]
fn elided_zeroes(data: &[u8], limit: usize) -> Option<usize> {
    let data = &data[..limit.min(data.len())];
    if data.len() < SKIP_ZEROES || data[..SKIP_ZEROES].iter().any(|i| *i != 0) {
        return None;
    }
    let zeroes = data.iter().position(|i| *i != 0).unwrap_or(data.len());
    if zeroes == data.len() || zeroes >= SKIP_ZEROES * 2 - 1 {
        Some(zeroes & !(SKIP_ZEROES - 1)).filter(|n| *n != 0)
    } else {
        None
    }
}

/// Address-tracking decoder over a code buffer.
#[derive(Clone, Debug)]
pub struct Decoder {
    address: u64,
    opts: Options,
    mode: &'static Mode,
}

impl Decoder {
    pub fn new(mode: &'static Mode, address: u64, opts: Options) -> Self {
        Self {
            address,
            opts,
            mode,
        }
    }

    #[cfg(feature = "print")]
    pub fn printer<E: PrinterExt>(self, ext: E, section_name: &str) -> Printer<E> {
        Printer::new(self, ext, section_name)
    }

    /// Current decoding address.
    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn mode(&self) -> &'static Mode {
        self.mode
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    /// Decodes one instruction at the current address and moves past it.
    ///
    /// The address is left unchanged on failure.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<Instruction, Error> {
        let insn = self.mode.decode(bytes)?;
        self.address = self.address.wrapping_add(insn.len() as u64);
        Ok(insn)
    }

    /// Do not decode `size` bytes.
    pub fn skip(&mut self, size: u64) {
        self.address = self.address.wrapping_add(size);
    }

    /// Returns the number of bytes at the front of `data` that form whole
    /// instructions, elided zero runs, or undecodable bytes.
    ///
    /// Stops before an instruction that runs past the end of `data`.
    pub fn decode_len(&self, data: &[u8]) -> usize {
        let mut cur = data;
        while !cur.is_empty() {
            if !self.opts.decode_zeroes {
                if cur.len() < SKIP_ZEROES {
                    break;
                }
                if cur[..SKIP_ZEROES].iter().all(|i| *i == 0) {
                    let zeroes = match cur.iter().position(|i| *i != 0) {
                        Some(i) => i,
                        None => break,
                    };
                    if zeroes >= SKIP_ZEROES * 2 - 1 {
                        cur = &cur[zeroes & !(SKIP_ZEROES - 1)..];
                        continue;
                    }
                }
            }
            let len = match self.mode.decode(cur) {
                Ok(insn) => insn.len(),
                Err(Error::InsufficientLength) => break,
                Err(_) => 1,
            };
            cur = &cur[len..];
        }

        data.len() - cur.len()
    }

    /// Iterates over every instruction in `data`, starting at the current
    /// address. A failed decode is reported and skipped by one byte.
    pub fn walk<'a>(&self, data: &'a [u8]) -> Walk<'a> {
        Walk {
            mode: self.mode,
            address: self.address,
            data,
        }
    }
}

/// One decode attempt of a [`Walk`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub address: u64,
    /// Bytes consumed, one for a failed decode.
    pub len: usize,
    pub result: Result<Instruction, Error>,
}

pub struct Walk<'a> {
    mode: &'static Mode,
    address: u64,
    data: &'a [u8],
}

impl Walk<'_> {
    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn remaining(&self) -> usize {
        self.data.len()
    }
}

impl Iterator for Walk<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        if self.data.is_empty() {
            return None;
        }
        let result = self.mode.decode(self.data);
        let len = result.as_ref().map_or(1, |insn| insn.len());
        let step = Step {
            address: self.address,
            len,
            result,
        };
        self.data = &self.data[len..];
        self.address = self.address.wrapping_add(len as u64);
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.data.len();
        ((len + INSN_MAX_LEN - 1) / INSN_MAX_LEN, Some(len))
    }
}

/// Instruction and error counts of a walk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    insns: usize,
    bytes: usize,
    errors: [usize; Error::ALL.len()],
}

impl Summary {
    pub fn collect<I: IntoIterator<Item = Step>>(steps: I) -> Self {
        let mut summary = Self::default();
        for step in steps {
            summary.add(&step);
        }
        summary
    }

    pub fn add(&mut self, step: &Step) {
        self.bytes += step.len;
        match step.result {
            Ok(_) => self.insns += 1,
            Err(err) => self.errors[err as usize] += 1,
        }
    }

    pub fn merge(&mut self, other: &Summary) {
        self.insns += other.insns;
        self.bytes += other.bytes;
        for (a, b) in self.errors.iter_mut().zip(other.errors) {
            *a += b;
        }
    }

    /// Number of decoded instructions.
    pub fn insns(&self) -> usize {
        self.insns
    }

    /// Number of bytes covered by the walk.
    pub fn bytes(&self) -> usize {
        self.bytes
    }

    /// Total number of failed decodes.
    pub fn errors(&self) -> usize {
        self.errors.iter().sum()
    }

    pub fn count(&self, error: Error) -> usize {
        self.errors[error as usize]
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{} instructions, {} bytes", self.insns, self.bytes)?;
        for error in Error::ALL {
            let count = self.count(error);
            if count != 0 {
                write!(fmt, ", {count} {error}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elide() {
        assert_eq!(elided_zeroes(&[0; 7], 7), None);
        assert_eq!(elided_zeroes(&[0; 8], 8), Some(8));
        assert_eq!(elided_zeroes(&[0; 20], 20), Some(16));

        let mut data = [0; 16];
        data[14] = 0x90;
        assert_eq!(elided_zeroes(&data, 16), None);
        data[14] = 0;
        data[15] = 0x90;
        assert_eq!(elided_zeroes(&data, 16), Some(8));
    }
}
