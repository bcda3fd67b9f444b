use std::fmt;

pub struct FormatterFn<F>(pub F)
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result;

impl<F> fmt::Display for FormatterFn<F>
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result,
{
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.0(fmt)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Style {
    Address,
    FieldName,
    Opcode,
    Field,
    Immediate,
    Displacement,
    Flags,
    Symbol,
    Error,
    Comment,
}

pub trait PrinterExt {
    /// Get symbol with address less then or equal to `address`.
    fn get_symbol(&self, address: u64) -> Option<(u64, &str)>;

    /// Get symbol with address greater then `address`.
    fn get_symbol_after(&self, address: u64) -> Option<(u64, &str)>;

    fn print_styled(
        &self,
        fmt: &mut fmt::Formatter,
        #[allow(unused_variables)] style: Style,
        display: impl fmt::Display,
    ) -> fmt::Result {
        display.fmt(fmt)
    }

    fn print_address(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Address, display)
    }

    fn print_field_name(&self, fmt: &mut fmt::Formatter, name: &str) -> fmt::Result {
        self.print_styled(fmt, Style::FieldName, name)
    }

    fn print_opcode(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Opcode, display)
    }

    fn print_field(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Field, display)
    }

    fn print_immediate(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Immediate, display)
    }

    fn print_displacement(
        &self,
        fmt: &mut fmt::Formatter,
        display: impl fmt::Display,
    ) -> fmt::Result {
        self.print_styled(fmt, Style::Displacement, display)
    }

    fn print_flags(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Flags, display)
    }

    fn print_error(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Error, display)
    }

    fn print_comment(&self, fmt: &mut fmt::Formatter, display: impl fmt::Display) -> fmt::Result {
        self.print_styled(fmt, Style::Comment, display)
    }

    /// Prints a symbol name, implementors may demangle it here.
    fn print_symbol(&self, fmt: &mut fmt::Formatter, name: &str) -> fmt::Result {
        self.print_styled(fmt, Style::Symbol, name)
    }
}

impl PrinterExt for () {
    fn get_symbol(&self, _: u64) -> Option<(u64, &str)> {
        None
    }

    fn get_symbol_after(&self, _: u64) -> Option<(u64, &str)> {
        None
    }
}
