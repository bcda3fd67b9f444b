use std::fmt::{self, Write as _};

struct Hex<'a>(&'a [u8]);

impl fmt::Display for Hex<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for b in self.0 {
            if !first {
                fmt.write_char(' ')?;
            }
            first = false;
            write!(fmt, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Makes trailing spaces visible.
struct Visible<'a>(&'a str);

impl fmt::Display for Visible<'_> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let body = self.0.trim_end();
        fmt.write_str(body)?;
        for c in self.0[body.len()..].chars() {
            match c {
                ' ' => fmt.write_char('•')?,
                '\t' => fmt.write_char('→')?,
                _ => {}
            }
        }
        Ok(())
    }
}

pub struct Diff<'a> {
    file: &'a str,
    line: usize,
    bytes: &'a [u8],
    expect: &'a str,
    result: &'a str,
}

impl<'a> Diff<'a> {
    pub fn new(
        file: &'a str,
        line: usize,
        bytes: &'a [u8],
        expect: &'a str,
        result: &'a str,
    ) -> Self {
        Self {
            file,
            line,
            bytes,
            expect,
            result,
        }
    }
}

impl fmt::Display for Diff<'_> {
    fn fmt(&self, out: &mut fmt::Formatter) -> fmt::Result {
        use diff::Result as E;

        let w = 5;
        if !self.file.is_empty() {
            writeln!(out, "{:w$}--> {}:{}", ' ', self.file, self.line)?;
        }
        if !self.bytes.is_empty() {
            writeln!(out, "{:>w$} | {}", "raw", Hex(self.bytes))?;
        }
        for diff in diff::lines(self.expect, self.result) {
            match diff {
                E::Left(l) => writeln!(out, "{:>w$} - {}↴", "", Visible(l))?,
                E::Both(l, _) => writeln!(out, "{:>w$} | {}↴", "", Visible(l))?,
                E::Right(r) => writeln!(out, "{:>w$} + {}↴", "", Visible(r))?,
            }
        }
        Ok(())
    }
}

pub fn check(file: &str, line: usize, left: &str, right: &str) -> Result<(), String> {
    if left != right {
        let err = "invalid result";
        eprintln!("error: {err}");
        eprintln!("{}", Diff::new(file, line, &[], left, right));
        return Err(err.to_string());
    }
    Ok(())
}
