use std::fmt::{self, Write};

use ldasm_core::{
    printer::{FormatterFn, PrinterExt},
    Error, Literal,
};

use crate::Instruction;

/// Renders the decoded fields of an instruction on one line:
///
/// ```text
/// op=0f op2=b6 modrm=04 sib=24 flags=ModRM|SIB
/// ```
#[derive(Copy, Clone, Debug, Default)]
pub struct Printer;

impl Printer {
    fn print_byte<E: PrinterExt>(
        &self,
        fmt: &mut fmt::Formatter,
        ext: &E,
        name: &str,
        byte: u8,
    ) -> fmt::Result {
        fmt.write_char(' ')?;
        ext.print_field_name(fmt, name)?;
        ext.print_field(fmt, FormatterFn(|fmt| write!(fmt, "{byte:02x}")))
    }

    fn print_literal<E: PrinterExt>(
        &self,
        fmt: &mut fmt::Formatter,
        ext: &E,
        name: &str,
        literal: Literal,
        immediate: bool,
    ) -> fmt::Result {
        if !literal.is_valid() {
            return Ok(());
        }
        fmt.write_char(' ')?;
        ext.print_field_name(fmt, name)?;
        if immediate {
            ext.print_immediate(fmt, literal)
        } else {
            ext.print_displacement(fmt, literal)
        }
    }

    pub fn print_insn<E: PrinterExt>(
        &self,
        fmt: &mut fmt::Formatter,
        ext: &E,
        insn: &Instruction,
    ) -> fmt::Result {
        ext.print_field_name(fmt, "op=")?;
        let opcode = insn.opcode();
        ext.print_opcode(fmt, FormatterFn(|fmt| write!(fmt, "{opcode:02x}")))?;
        if insn.is_two_byte() {
            fmt.write_char(' ')?;
            ext.print_field_name(fmt, "op2=")?;
            let opcode2 = insn.opcode2();
            ext.print_opcode(fmt, FormatterFn(|fmt| write!(fmt, "{opcode2:02x}")))?;
        }
        if let Some(rex) = insn.rex() {
            self.print_byte(fmt, ext, "rex=", rex.raw())?;
        }
        if let Some(modrm) = insn.modrm() {
            self.print_byte(fmt, ext, "modrm=", modrm.raw())?;
        }
        if let Some(sib) = insn.sib() {
            self.print_byte(fmt, ext, "sib=", sib.raw())?;
        }
        self.print_literal(fmt, ext, "disp=", insn.disp(), false)?;
        self.print_literal(fmt, ext, "imm=", insn.imm(), true)?;
        fmt.write_char(' ')?;
        ext.print_field_name(fmt, "flags=")?;
        ext.print_flags(fmt, insn.flags())
    }

    pub fn print_error<E: PrinterExt>(
        &self,
        fmt: &mut fmt::Formatter,
        ext: &E,
        error: Error,
    ) -> fmt::Result {
        ext.print_error(fmt, FormatterFn(|fmt| write!(fmt, "error: {error}")))
    }

    /// Plain rendering of a decode result.
    pub fn display<'a>(&'a self, result: &'a Result<Instruction, Error>) -> impl fmt::Display + 'a {
        FormatterFn(move |fmt| match result {
            Ok(insn) => self.print_insn(fmt, &(), insn),
            Err(error) => self.print_error(fmt, &(), *error),
        })
    }
}
