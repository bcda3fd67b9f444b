use core::fmt;

use ldasm_core::{
    flags::{BitNames, Field, Flags},
    Bytes, Error, Literal,
};

#[test]
fn bytes_read_is_bounds_checked() {
    let mut bytes = Bytes::new(&[0x11, 0x22, 0x33]);
    assert_eq!(bytes.read_u16(), Ok(0x2211));
    assert_eq!(bytes.read_u16(), Err(Error::InsufficientLength));
    assert_eq!(bytes.offset(), 2);
    assert_eq!(bytes.read_u8(), Ok(0x33));
    assert_eq!(bytes.read_u8(), Err(Error::InsufficientLength));
    assert_eq!(bytes.remaining(), 0);
}

#[test]
fn bytes_limit() {
    let data = [0x90; 20];
    let bytes = Bytes::limit(&data, 15);
    assert_eq!(bytes.len(), 15);
    let bytes = Bytes::limit(&data[..3], 15);
    assert_eq!(bytes.len(), 3);
}

#[test]
fn literal_read() {
    let data = [0xfe, 0xff, 0xff, 0xff, 0x01];
    let mut bytes = Bytes::new(&data);
    let mut lit = Literal::NONE;
    lit.read(&mut bytes, 32).unwrap();
    assert_eq!(bytes.offset(), 4);
    assert_eq!(lit.bits(), 32);
    assert_eq!(lit.as_unsigned(), Some(0xffff_fffe));
    assert_eq!(lit.as_signed(), Some(-2));
}

#[test]
fn literal_read_failure_keeps_state() {
    let data = [0x01, 0x02, 0x03];
    let mut bytes = Bytes::new(&data);
    let mut lit = Literal::new(0x7f, 8);
    assert_eq!(lit.read(&mut bytes, 32), Err(Error::InsufficientLength));
    assert_eq!(lit, Literal::new(0x7f, 8));
    assert_eq!(bytes.offset(), 0);
}

#[test]
fn literal_read_bad_width() {
    let data = [0x01, 0x02, 0x03];
    let mut bytes = Bytes::new(&data);
    let mut lit = Literal::new(0x7f, 8);
    for bits in [0, 1, 12, 24, 128] {
        assert_eq!(lit.read(&mut bytes, bits), Err(Error::BadOperand));
        assert_eq!(lit, Literal::new(0x7f, 8));
        assert_eq!(bytes.offset(), 0);
    }
    lit.read(&mut bytes, 16).unwrap();
    assert_eq!(lit.as_unsigned(), Some(0x0201));
}

#[test]
fn literal_sign_extension() {
    let cases = [
        (0x80, 8, -128),
        (0x7f, 8, 127),
        (0x8000, 16, -32768),
        (0x1234, 16, 0x1234),
        (0x8000_0000, 32, i32::MIN as i64),
        (0xffff_ffff, 32, -1),
        (u64::MAX, 64, -1),
        (0x7fff_ffff_ffff_ffff, 64, i64::MAX),
    ];
    for (value, bits, signed) in cases {
        let lit = Literal::new(value, bits);
        assert_eq!(lit.as_signed(), Some(signed), "{value:#x}/{bits}");
        assert_eq!(lit.as_unsigned(), Some(value));
    }
}

#[test]
fn literal_invalid() {
    let lit = Literal::NONE;
    assert!(!lit.is_valid());
    assert_eq!(lit.as_signed(), None);
    assert_eq!(lit.as_unsigned(), None);
    assert_eq!(lit.to_string(), "-");
}

#[test]
fn literal_display() {
    assert_eq!(Literal::new(0xfe, 8).to_string(), "i8(0xfe / -2)");
    assert_eq!(Literal::new(0x10, 32).to_string(), "i32(0x10 / 16)");
}

#[test]
fn literal_new_truncates() {
    assert_eq!(Literal::new(0x1ff, 8), Literal::new(0xff, 8));
}

#[test]
fn flags_field() {
    let field = Field::new(4, 4);
    let mut flags = Flags::empty();
    flags.set(1).field_set(field, 0xa);
    assert_eq!(flags.raw(), 0xa1);
    assert_eq!(flags.field(field), 0xa);
    assert!(flags.all(0x81));
    assert!(!flags.any(0x100));
    assert_eq!(field.mask(), 0xf0);
}

static NAMES: BitNames = BitNames::new("Bits", &[(1, "A"), (2, "B"), (4, ""), (8, "D")]);

struct Show(u32);

impl fmt::Display for Show {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        NAMES.format(fmt, self.0)
    }
}

#[test]
fn bit_names() {
    assert_eq!(Show(0).to_string(), "None");
    assert_eq!(Show(4).to_string(), "None");
    assert_eq!(Show(2).to_string(), "B");
    assert_eq!(Show(2 | 4).to_string(), "B");
    assert_eq!(Show(1 | 2 | 8).to_string(), "A|B|D");
    assert_eq!(Show(0x30).to_string(), "Bits(0x30)");
    assert_eq!(Show(0x31).to_string(), "A|Bits(0x30)");
}
