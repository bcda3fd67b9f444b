use ldasm_test::test::{parse_flags, Parser, Runner, Test};

#[test]
fn flags() {
    let src = " +a\t+b  -abc-foo -foo  +bar+foo";
    let mut flags = parse_flags(src);
    assert_eq!(flags.next(), Some(("a", true)));
    assert_eq!(flags.next(), Some(("b", true)));
    assert_eq!(flags.next(), Some(("abc-foo", false)));
    assert_eq!(flags.next(), Some(("foo", false)));
    assert_eq!(flags.next(), Some(("bar+foo", true)));
    assert_eq!(flags.next(), None);
}

#[test]
fn parse() -> Result<(), String> {
    let src = r#"# title
        90                 op=90 flags=None # +amd64
        c2 08 00           op=c2 imm=i16(0x8 / 8) flags=Imm16

        1000: e9 00 00 00 00    op=e9 flags=Imm32|Relative
        f0 01 c8 error: invalid lock
    "#;

    let mut parser = Parser::new("input", src);
    let mut test = Test::default();

    assert!(parser.parse(&mut test)?);
    assert_eq!(test.line, 2);
    assert_eq!(test.address, 0);
    assert_eq!(test.bytes, &[0x90]);
    assert_eq!(test.expect, "op=90 flags=None");
    assert_eq!(test.comment, "+amd64");
    assert!(!test.expects_error());

    assert!(parser.parse(&mut test)?);
    assert_eq!(test.line, 3);
    assert_eq!(test.bytes, &[0xc2, 0x08, 0x00]);
    assert_eq!(test.expect, "op=c2 imm=i16(0x8 / 8) flags=Imm16");
    assert_eq!(test.comment, "");

    assert!(parser.parse(&mut test)?);
    assert_eq!(test.line, 5);
    assert_eq!(test.address, 0x1000);
    assert_eq!(test.bytes, &[0xe9, 0, 0, 0, 0]);

    assert!(parser.parse(&mut test)?);
    assert_eq!(test.address, 0);
    assert_eq!(test.bytes, &[0xf0, 0x01, 0xc8]);
    assert_eq!(test.expect, "error: invalid lock");
    assert!(test.expects_error());

    assert!(!parser.parse(&mut test)?);
    Ok(())
}

#[test]
fn missing_bytes() {
    let mut parser = Parser::new("input", "  op=90\n");
    let mut test = Test::default();
    assert!(parser.parse(&mut test).is_err());
}

#[test]
fn parse_all() -> Result<(), String> {
    let src = "10: 90  a\n12: c3  b\n";
    let (start, data) = Parser::parse_all(src)?;
    assert_eq!(start, 0x10);
    assert_eq!(data, &[0x90, 0x00, 0xc3]);
    Ok(())
}

/// Accepts anything and echoes the byte count.
struct Echo;

impl Runner for Echo {
    fn decode(&mut self, test: &Test) -> (usize, String) {
        if test.expects_error() {
            (0, test.expect.to_owned())
        } else {
            (test.bytes.len(), format!("len={}", test.bytes.len()))
        }
    }
}

#[test]
fn runner() {
    let ok = "90  len=1\n01 c8   len=2\nff  error: whatever\n";
    assert_eq!(Echo.run("ok", ok), Ok(()));

    let bad = "90  len=2\n";
    assert!(Echo.run("bad", bad).is_err());
}
