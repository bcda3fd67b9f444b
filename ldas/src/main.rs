#[macro_use]
extern crate log;

mod cli;

#[cfg(feature = "parallel")]
mod parallel;

use std::{
    error::Error,
    fmt, fs,
    io::{self, Write},
    process,
    sync::Arc,
};

use ldasm::{Decoder, Mode, Options, PrinterExt, Summary, MODE32, MODE64};
use object::{Object, ObjectSection, Section, SymbolMap, SymbolMapName};

#[cfg(any(feature = "color", feature = "demangle"))]
use std::fmt::Display;

#[cfg(feature = "color")]
use ldasm::Style;

use crate::cli::{Cli, Color, Demangle};

fn unsupported_arch() -> ! {
    eprintln!("error: unsupported architecture");
    process::exit(1);
}

#[cfg(feature = "demangle")]
enum DemangledSymbol<'a> {
    Cpp(cpp_demangle::Symbol<&'a str>),
    Rust(rustc_demangle::Demangle<'a>),
}

#[cfg(feature = "demangle")]
impl fmt::Display for DemangledSymbol<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Cpp(s) => s.fmt(fmt),
            Self::Rust(s) => s.fmt(fmt),
        }
    }
}

#[derive(Clone)]
struct Info<'a> {
    #[cfg_attr(not(feature = "color"), allow(dead_code))]
    color: Color,
    symbols: Arc<SymbolMap<SymbolMapName<'a>>>,
    #[cfg_attr(not(feature = "demangle"), allow(dead_code))]
    demangle: Demangle,
}

impl Info<'_> {
    #[cfg(feature = "demangle")]
    fn demangle<'s>(&self, symbol: &'s str) -> Option<DemangledSymbol<'s>> {
        let ret = match self.demangle {
            Demangle::None => return None,
            Demangle::Auto => match rustc_demangle::try_demangle(symbol) {
                Ok(s) => DemangledSymbol::Rust(s),
                Err(_) => DemangledSymbol::Cpp(cpp_demangle::Symbol::new(symbol).ok()?),
            },
            Demangle::Gnuv3 => DemangledSymbol::Cpp(cpp_demangle::Symbol::new(symbol).ok()?),
            Demangle::Rust => DemangledSymbol::Rust(rustc_demangle::try_demangle(symbol).ok()?),
        };
        Some(ret)
    }
}

impl PrinterExt for Info<'_> {
    fn get_symbol(&self, address: u64) -> Option<(u64, &str)> {
        self.symbols.get(address).map(|s| (s.address(), s.name()))
    }

    fn get_symbol_after(&self, address: u64) -> Option<(u64, &str)> {
        let symbols = self.symbols.symbols();
        let symbol = match symbols.binary_search_by_key(&address, |symbol| symbol.address()) {
            Ok(index) => symbols.iter().skip(index).find(|i| i.address() != address),
            Err(index) => symbols.get(index),
        };
        symbol.map(|s| (s.address(), s.name()))
    }

    #[cfg(feature = "color")]
    fn print_styled(
        &self,
        fmt: &mut fmt::Formatter,
        style: Style,
        display: impl fmt::Display,
    ) -> fmt::Result {
        use owo_colors::OwoColorize;

        match self.color {
            Color::Off => display.fmt(fmt),
            Color::On => match style {
                Style::FieldName => display.fmt(fmt),
                Style::Opcode => display.yellow().fmt(fmt),
                Style::Field => display.blue().fmt(fmt),
                Style::Immediate => display.magenta().fmt(fmt),
                Style::Displacement => display.cyan().fmt(fmt),
                Style::Flags => display.fmt(fmt),
                Style::Address => display.magenta().fmt(fmt),
                Style::Symbol => display.green().fmt(fmt),
                Style::Error => display.red().fmt(fmt),
                Style::Comment => display.fmt(fmt),
            },
        }
    }

    fn print_symbol(&self, fmt: &mut fmt::Formatter, name: &str) -> fmt::Result {
        #[cfg(feature = "demangle")]
        if let Some(demangled) = self.demangle(name) {
            return self.print_styled(fmt, ldasm::Style::Symbol, demangled);
        }
        self.print_styled(fmt, ldasm::Style::Symbol, name)
    }
}

struct App<'a> {
    opts: Options,
    mode: &'static Mode,

    color: Color,
    demangle: Demangle,
    symbols: Arc<SymbolMap<SymbolMapName<'a>>>,

    summary: bool,

    start_address: u64,
    stop_address: u64,

    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    threads: usize,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    threads_block_size: usize,
}

impl<'a> App<'a> {
    /// Mode forced with `-M`, the last option wins.
    fn mode_override(cli: &Cli) -> Option<&'static Mode> {
        let mut mode = None;
        for i in &cli.disassembler_options {
            match i.as_str() {
                "i386" => mode = Some(&MODE32),
                "x86-64" => mode = Some(&MODE64),
                _ => warn!("unsupported option `{i}`"),
            }
        }
        mode
    }

    fn get_mode(file: &object::File, cli: &Cli) -> &'static Mode {
        use object::Architecture as A;

        let mode = match file.architecture() {
            A::I386 => &MODE32,
            A::X86_64 | A::X86_64_X32 => &MODE64,
            _ => unsupported_arch(),
        };
        Self::mode_override(cli).unwrap_or(mode)
    }

    fn get_file_format(file: &object::File) -> String {
        use object::{Architecture as A, BinaryFormat as F};

        let container = match file.format() {
            F::Elf if file.is_64() => "elf64",
            F::Elf => "elf32",
            F::Pe => "pei",
            F::Coff => "pe",
            F::MachO => "mach-o",
            _ => "unknown",
        };
        let arch = match file.architecture() {
            A::I386 => "i386",
            A::X86_64 | A::X86_64_X32 => "x86-64",
            _ => "unknown",
        };
        format!("{container}-{arch}")
    }

    fn new(
        cli: &Cli,
        path: &str,
        format: &str,
        mode: &'static Mode,
        symbols: SymbolMap<SymbolMapName<'a>>,
    ) -> Self {
        let opts = Options {
            decode_zeroes: cli.disassemble_zeroes,
            show_raw_insn: cli.show_raw_insn,
        };

        debug!("decoding in {}-bit mode", mode.bits());

        println!();
        println!("{path}:     file format {format}");
        println!();

        Self {
            opts,
            mode,
            color: cli.disassembler_color,
            demangle: cli.demangle,
            symbols: Arc::new(symbols),
            summary: cli.summary,
            start_address: cli.start_address,
            stop_address: cli.stop_address,
            threads: cli.threads,
            threads_block_size: cli.threads_block_size,
        }
    }

    fn create_info(&self) -> Info<'a> {
        Info {
            color: self.color,
            symbols: self.symbols.clone(),
            demangle: self.demangle,
        }
    }

    fn create_decoder(&self, address: u64) -> Decoder {
        Decoder::new(self.mode, address, self.opts)
    }

    fn disassemble_section(&self, section: Section) -> Result<Option<Summary>, Box<dyn Error>> {
        let section_name = section.name()?;
        let data = section.data()?;
        self.disassemble_range(section_name, section.address(), data)
    }

    /// Returns the section summary in `--summary` mode.
    fn disassemble_range(
        &self,
        section_name: &str,
        start_address: u64,
        data: &[u8],
    ) -> Result<Option<Summary>, Box<dyn Error>> {
        // ignore broken pipe error
        fn helper(result: io::Result<()>) -> io::Result<()> {
            if matches!(result, Err(ref e) if e.kind() == io::ErrorKind::BrokenPipe) {
                Ok(())
            } else {
                result
            }
        }

        let (start_address, data) =
            match clip_range(start_address, data, self.start_address, self.stop_address) {
                Some(range) => range,
                None => {
                    debug!("{section_name}: out of the address range");
                    return Ok(None);
                }
            };

        debug!(
            "{section_name}: {start_address:#x}..{:#x}",
            start_address.saturating_add(data.len() as u64)
        );

        if self.summary {
            let summary = Summary::collect(self.create_decoder(start_address).walk(data));
            helper({
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{section_name}: {summary}")
            })?;
            return Ok(Some(summary));
        }

        helper({
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "\nDisassembly of section {section_name}:")
        })?;

        #[cfg(feature = "parallel")]
        if self.threads > 1 && data.len() >= 1024 * 64 {
            parallel::disassemble_code(self, start_address, data, section_name)?;
            return Ok(None);
        }
        helper(self.disassemble_code(start_address, data, section_name))?;
        Ok(None)
    }

    fn disassemble_code(&self, address: u64, data: &[u8], section_name: &str) -> io::Result<()> {
        let stdout = std::io::stdout();

        #[allow(unused_mut)]
        let mut out = stdout.lock();

        #[cfg(all(unix, feature = "block-buffering"))]
        let mut out = {
            use std::{
                fs::File,
                io::BufWriter,
                os::fd::{AsRawFd, FromRawFd},
            };
            BufWriter::new(unsafe { File::from_raw_fd(out.as_raw_fd()) })
        };

        let info = self.create_info();
        let res = self
            .create_decoder(address)
            .printer(info, section_name)
            .print(&mut out, data, true);

        // do not close stdout if BufWriter is used
        #[cfg(all(unix, feature = "block-buffering"))]
        {
            use std::os::fd::IntoRawFd;
            match out.into_inner() {
                Ok(out) => {
                    let _ = out.into_raw_fd();
                }
                Err(err) => {
                    let (err, out) = err.into_parts();
                    let (out, _) = out.into_parts();
                    let _ = out.into_raw_fd();
                    return Err(err);
                }
            }
        }

        res
    }
}

/// Restricts `data` loaded at `address` to `start..stop`.
///
/// The end of the data saturates at `u64::MAX`.
fn clip_range(address: u64, mut data: &[u8], start: u64, stop: u64) -> Option<(u64, &[u8])> {
    let end = address.saturating_add(data.len() as u64);
    if address >= stop || end <= start {
        return None;
    }
    if stop < end {
        data = &data[..(stop - address) as usize];
    }
    if address < start {
        return Some((start, &data[(start - address) as usize..]));
    }
    Some((address, data))
}

fn print_total(total: Option<Summary>) {
    if let Some(total) = total {
        println!("total: {total}");
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let cli = cli::parse_cli();
    let data = fs::read(&cli.path)?;

    if cli.binary {
        let mode = App::mode_override(&cli).unwrap_or_else(|| {
            debug!("no mode given for a raw image, using x86-64");
            &MODE64
        });
        let format = "binary";
        let app = App::new(&cli, &cli.path, format, mode, SymbolMap::new(Vec::new()));
        app.disassemble_range(".data", cli.adjust_vma, &data)?;
        return Ok(());
    }

    let file = object::File::parse(&*data)?;
    let mode = App::get_mode(&file, &cli);
    let format = App::get_file_format(&file);
    let app = App::new(&cli, &cli.path, &format, mode, file.symbol_map());

    let mut total: Option<Summary> = None;
    let mut count = 0;
    let mut add = |summary: Option<Summary>| {
        if let Some(summary) = summary {
            total.get_or_insert_with(Summary::default).merge(&summary);
            count += 1;
        }
    };

    if cli.sections.is_empty() {
        for section in file.sections() {
            if object::SectionKind::Text == section.kind() {
                add(app.disassemble_section(section)?);
            }
        }
    } else {
        for section_name in &cli.sections {
            match file.section_by_name(section_name) {
                Some(section) => add(app.disassemble_section(section)?),
                None => warn!("section `{section_name}` not found"),
            }
        }
    }

    if count > 1 {
        print_total(total);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg_attr(not(any(feature = "color", feature = "demangle")), allow(dead_code))]
    fn info(color: Color, demangle: Demangle) -> Info<'static> {
        Info {
            color,
            symbols: Arc::new(SymbolMap::new(Vec::new())),
            demangle,
        }
    }

    #[cfg(feature = "color")]
    #[test]
    fn styled_output() {
        use ldasm::FormatterFn;
        use owo_colors::OwoColorize;

        let styled = |info: &Info, style| {
            FormatterFn(|fmt| info.print_styled(fmt, style, "0f")).to_string()
        };

        let plain = info(Color::Off, Demangle::None);
        assert_eq!(styled(&plain, Style::Opcode), "0f");
        assert_eq!(styled(&plain, Style::Error), "0f");

        let colored = info(Color::On, Demangle::None);
        assert_eq!(styled(&colored, Style::Opcode), "0f".yellow().to_string());
        assert_eq!(styled(&colored, Style::Error), "0f".red().to_string());
        assert_eq!(styled(&colored, Style::FieldName), "0f");
    }

    #[cfg(feature = "demangle")]
    #[test]
    fn demangled_symbols() {
        use ldasm::FormatterFn;

        let symbol = |info: &Info, name| {
            FormatterFn(|fmt| info.print_symbol(fmt, name)).to_string()
        };

        let auto = info(Color::Off, Demangle::Auto);
        assert_eq!(symbol(&auto, "_ZN3foo3barE"), "foo::bar");
        assert_eq!(symbol(&auto, "_Z3foov"), "foo()");
        assert_eq!(symbol(&auto, "main"), "main");

        let none = info(Color::Off, Demangle::None);
        assert_eq!(symbol(&none, "_Z3foov"), "_Z3foov");
    }

    #[test]
    fn clip() {
        let data = [0u8; 16];
        assert_eq!(clip_range(0x100, &data, 0, u64::MAX), Some((0x100, &data[..])));
        assert_eq!(clip_range(0x100, &data, 0x104, 0x10c), Some((0x104, &data[4..12])));
        assert_eq!(clip_range(0x100, &data, 0x110, u64::MAX), None);
        assert_eq!(clip_range(0x100, &data, 0, 0x100), None);
    }

    #[test]
    fn clip_near_address_space_end() {
        let data = [0u8; 16];
        let address = u64::MAX - 4;
        assert_eq!(clip_range(address, &data, 0, u64::MAX), Some((address, &data[..])));
        assert_eq!(clip_range(address, &data, 0, u64::MAX - 2), Some((address, &data[..2])));
        assert_eq!(
            clip_range(address, &data, u64::MAX - 1, u64::MAX),
            Some((u64::MAX - 1, &data[3..]))
        );
    }
}
