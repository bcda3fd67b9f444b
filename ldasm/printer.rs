use std::{
    cmp, fmt,
    io::{self, Write},
    ops::{Deref, DerefMut},
    string::FromUtf8Error,
};

use ldasm_x86::{Instruction, INSN_MAX_LEN};

use crate::{elided_zeroes, Decoder, Error, SKIP_ZEROES};

pub use ldasm_core::{
    printer::{FormatterFn, PrinterExt, Style},
    symbols::{Symbols, SymbolsInfo},
};

const BYTES_PER_LINE: usize = 7;

pub trait WriteExt: Write {
    fn write_u8_hex(&mut self, byte: u8) -> io::Result<()> {
        const MAP: [u8; 16] = *b"0123456789abcdef";
        let buf = [MAP[(byte >> 4) as usize & 15], MAP[byte as usize & 15]];
        self.write_all(&buf)
    }

    fn write_spaces(&mut self, mut width: usize) -> io::Result<()> {
        while width > 0 {
            const FILL: [u8; 32] = [b' '; 32];
            let len = cmp::min(width, FILL.len());
            self.write_all(&FILL[..len])?;
            width -= len;
        }
        Ok(())
    }
}

impl<T: Write> WriteExt for T {}

/// Target of a relative branch, with the symbol it falls into.
fn print_target<E: PrinterExt>(
    fmt: &mut fmt::Formatter,
    ext: &E,
    address: u64,
    insn: &Instruction,
) -> fmt::Result {
    let offset = match insn.imm().as_signed() {
        Some(offset) => offset,
        None => return Ok(()),
    };
    let target = address
        .wrapping_add(insn.len() as u64)
        .wrapping_add(offset as u64);
    let symbol = ext.get_symbol(target);
    ext.print_comment(
        fmt,
        FormatterFn(|fmt| {
            write!(fmt, "\t# ")?;
            ext.print_address(fmt, FormatterFn(|fmt| write!(fmt, "{target:x}")))?;
            if let Some((addr, name)) = symbol {
                fmt.write_str(" <")?;
                ext.print_symbol(fmt, name)?;
                if target != addr {
                    write!(fmt, "+{:#x}", target - addr)?;
                }
                fmt.write_str(">")?;
            }
            Ok(())
        }),
    )
}

/// Objdump-like listing of decoded instructions.
pub struct Printer<E: PrinterExt = ()> {
    decoder: Decoder,
    printer: ldasm_x86::Printer,
    ext: E,
    section_name: Box<str>,
}

impl<E: PrinterExt> Printer<E> {
    pub(crate) fn new(decoder: Decoder, ext: E, section_name: &str) -> Self {
        Self {
            decoder,
            printer: ldasm_x86::Printer,
            ext,
            section_name: section_name.to_owned().into_boxed_str(),
        }
    }

    pub fn ext(&self) -> &E {
        &self.ext
    }

    fn print_impl<W: Write>(
        &mut self,
        out: &mut W,
        data: &[u8],
        first: bool,
        has_more: bool,
    ) -> io::Result<(usize, usize)> {
        let address = self.decoder.address();
        let mut next_symbol = self.ext.get_symbol_after(address);
        let mut first_symbol = match self.ext.get_symbol(address) {
            Some((addr, name)) if address == addr => Some((name, 0)),
            _ if first => match next_symbol {
                Some((addr, name)) => Some((name, addr - address)),
                _ => Some((self.section_name.as_ref(), 0)),
            },
            _ => None,
        };

        let ext = &self.ext;
        let width = self.decoder.mode().bits() as usize / 4;
        let mut print_symbol = |out: &mut W, address, next_symbol: &mut _| -> io::Result<()> {
            let label = |name, offset: u64| {
                FormatterFn(move |fmt| {
                    fmt.write_str("<")?;
                    ext.print_symbol(fmt, name)?;
                    if offset != 0 {
                        write!(fmt, "-{offset:#x}")?;
                    }
                    fmt.write_str(">")
                })
            };
            if let Some((name, offset)) = first_symbol.take() {
                writeln!(out, "\n{address:0width$x} {}:", label(name, offset))?;
            } else if let Some((addr, name)) = *next_symbol {
                if addr == address {
                    writeln!(out, "\n{address:0width$x} {}:", label(name, 0))?;
                    *next_symbol = ext.get_symbol_after(address);
                }
            }
            Ok(())
        };

        let opts = *self.decoder.options();
        let mut cur = data;
        while !cur.is_empty() {
            let address = self.decoder.address();
            let offset = data.len() - cur.len();

            if !opts.decode_zeroes {
                let limit = ext
                    .get_symbol_after(address)
                    .map_or(cur.len(), |(addr, _)| (addr - address) as usize);
                if has_more {
                    if cur.len() < SKIP_ZEROES {
                        return Ok((offset, SKIP_ZEROES));
                    }
                    // the zero run may continue in the next chunk
                    if limit >= cur.len() && cur.iter().all(|i| *i == 0) {
                        return Ok((offset, cur.len() + 1));
                    }
                }
                if let Some(zeroes) = elided_zeroes(cur, limit) {
                    print_symbol(out, address, &mut next_symbol)?;
                    writeln!(out, "\t...")?;
                    self.decoder.skip(zeroes as u64);
                    cur = &cur[zeroes..];
                    continue;
                }
            }

            let result = match self.decoder.decode(cur) {
                Err(Error::InsufficientLength) if has_more && cur.len() < INSN_MAX_LEN => {
                    return Ok((offset, INSN_MAX_LEN));
                }
                Err(err) => {
                    // the byte is reported and skipped
                    self.decoder.skip(1);
                    Err(err)
                }
                Ok(insn) => Ok(insn),
            };
            let len = result.as_ref().map_or(1, |insn| insn.len());

            print_symbol(out, address, &mut next_symbol)?;

            let printer = &self.printer;
            let display = FormatterFn(|fmt| match &result {
                Ok(insn) => {
                    printer.print_insn(fmt, ext, insn)?;
                    if insn.flags().is_relative() {
                        print_target(fmt, ext, address, insn)?;
                    }
                    Ok(())
                }
                Err(err) => printer.print_error(fmt, ext, *err),
            });

            let addr_width = if address >= 0x1000 { 8 } else { 4 };
            if opts.show_raw_insn {
                for (i, chunk) in cur[..len].chunks(BYTES_PER_LINE).enumerate() {
                    let line_address = address.wrapping_add((i * BYTES_PER_LINE) as u64);
                    write!(out, "{line_address:addr_width$x}:\t")?;
                    for byte in chunk {
                        out.write_u8_hex(*byte)?;
                        out.write_all(b" ")?;
                    }
                    if i == 0 {
                        out.write_spaces((BYTES_PER_LINE - chunk.len()) * 3)?;
                        write!(out, "\t{display}")?;
                    }
                    out.write_all(b"\n")?;
                }
            } else {
                writeln!(out, "{address:addr_width$x}:\t{display}")?;
            }

            cur = &cur[len..];
        }

        Ok((data.len() - cur.len(), 0))
    }

    pub fn print<W>(&mut self, out: &mut W, data: &[u8], first: bool) -> io::Result<()>
    where
        W: Write,
    {
        self.print_impl(out, data, first, false).map(|_| ())
    }

    /// Prints a chunk of a larger buffer.
    ///
    /// Returns the number of bytes consumed and, if non-zero, how many bytes
    /// must be available at the returned offset to continue.
    pub fn print_streaming<W>(
        &mut self,
        out: &mut W,
        data: &[u8],
        first: bool,
    ) -> Result<(usize, usize), io::Error>
    where
        W: Write,
    {
        self.print_impl(out, data, first, true)
    }

    pub fn print_to_vec(&mut self, data: &[u8], first: bool) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.print(&mut buf, data, first)?;
        Ok(buf)
    }

    pub fn print_to_string(&mut self, data: &[u8], first: bool) -> Result<String, FromUtf8Error> {
        // writes into a Vec do not fail
        let buf = self.print_to_vec(data, first).unwrap_or_default();
        String::from_utf8(buf)
    }
}

impl<E: PrinterExt> Deref for Printer<E> {
    type Target = Decoder;

    fn deref(&self) -> &Self::Target {
        &self.decoder
    }
}

impl<E: PrinterExt> DerefMut for Printer<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.decoder
    }
}
