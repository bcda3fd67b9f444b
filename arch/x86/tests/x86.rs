use ldasm_test::test::{self, Runner, Test};
use ldasm_x86::{
    hde, Error, Flag, Mode, PrefixId, PrefixSet, Printer, Segment, INSN_MAX_LEN, MODE32, MODE64,
};

#[derive(Default)]
struct X86 {
    flags: &'static str,
}

impl X86 {
    fn mode(&self, test: &Test) -> &'static Mode {
        let mut amd64 = false;
        let flags = test::parse_flags(self.flags).chain(test::parse_flags(test.comment));
        for (name, state) in flags {
            match name {
                "amd64" => amd64 = state,
                _ => panic!("unexpected flag {name}"),
            }
        }
        if amd64 {
            &MODE64
        } else {
            &MODE32
        }
    }
}

impl Runner for X86 {
    fn decode(&mut self, test: &Test) -> (usize, String) {
        let result = self.mode(test).decode(&test.bytes);
        let len = result.as_ref().map_or(0, |insn| insn.len());
        let out = Printer.display(&result).to_string();
        (len, out)
    }
}

macro_rules! test {
    ($name:ident, $file:expr, $flags:expr) => {
        #[test]
        fn $name() -> Result<(), String> {
            X86 { flags: $flags }.run($file, include_str!($file))
        }
    };
}

test!(mode32, "mode32.test", "-amd64");
test!(mode64, "mode64.test", "+amd64");

/// Deterministic byte soup for property checks.
struct XorShift(u64);

impl XorShift {
    fn fill(&mut self, buf: &mut [u8]) {
        for b in buf {
            self.0 ^= self.0 << 13;
            self.0 ^= self.0 >> 7;
            self.0 ^= self.0 << 17;
            *b = self.0 as u8;
        }
    }
}

#[test]
fn ret() {
    let insn = MODE64.decode(&[0xc3]).unwrap();
    assert_eq!(insn.len(), 1);
    assert_eq!(insn.opcode(), 0xc3);
    assert_eq!(insn.modrm(), None);
    assert!(insn.is_ret());
    assert!(!insn.is_jmp());
}

#[test]
fn nop_is_only_unprefixed() {
    for mode in [&MODE32, &MODE64] {
        let insn = mode.decode(&[0x90]).unwrap();
        assert_eq!(insn.len(), 1);
        assert_eq!(insn.flags().bits(), Flag::NOT_PREFIXED.bits());
        assert!(insn.prefixes().contains(PrefixId::Unprefixed));
        assert_eq!(insn.rex(), None);
        assert_eq!(insn.modrm(), None);
        assert!(!insn.imm().is_valid());
        assert!(!insn.disp().is_valid());
    }
}

#[test]
fn lock_on_register() {
    assert_eq!(MODE64.decode(&[0xf0, 0x01, 0xc8]), Err(Error::InvalidLock));
    assert_eq!(MODE32.decode(&[0xf0, 0x01, 0xc8]), Err(Error::InvalidLock));
}

#[test]
fn empty_input() {
    assert_eq!(MODE32.decode(&[]), Err(Error::InsufficientLength));
    assert_eq!(MODE64.decode(&[]), Err(Error::InsufficientLength));
}

#[test]
fn unknown_two_byte() {
    assert_eq!(MODE64.decode(&[0x0f, 0xff]), Err(Error::UnknownOpcode));
}

#[test]
fn near_jmp() {
    let insn = MODE64.decode(&[0xe9, 0x10, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(insn.len(), 5);
    assert!(insn.is_jmp());
    assert!(insn.flags().is_relative());
    assert!(insn.flags().has_imm32());
    assert_eq!(insn.imm().as_signed(), Some(0x10));
}

#[test]
fn branch_classes() {
    let jcc = MODE64.decode(&[0x0f, 0x84, 0, 0, 0, 0]).unwrap();
    assert!(jcc.is_jcc());
    assert!(jcc.is_two_byte());
    assert_eq!(jcc.len(), 6);

    let short = MODE64.decode(&[0x75, 0xfe]).unwrap();
    assert!(short.is_jcc());
    assert_eq!(short.imm().as_signed(), Some(-2));

    let call = MODE64.decode(&[0xff, 0x15, 0, 0, 0, 0]).unwrap();
    assert!(call.is_call());

    let int3 = MODE32.decode(&[0xcc]).unwrap();
    assert!(int3.is_int());
}

#[test]
fn length_bound() {
    let mut rng = XorShift(0x2545_f491_4f6c_dd1d);
    let mut buf = [0; 32];
    for _ in 0..20_000 {
        rng.fill(&mut buf);
        for mode in [&MODE32, &MODE64] {
            if let Ok(insn) = mode.decode(&buf) {
                assert!((1..=INSN_MAX_LEN).contains(&insn.len()), "{buf:02x?}");
            }
        }
    }
}

#[test]
fn decode_is_pure() {
    let mut rng = XorShift(0x9e37_79b9_7f4a_7c15);
    let mut buf = [0; 16];
    for _ in 0..5_000 {
        rng.fill(&mut buf);
        let a = MODE64.decode(&buf);
        let b = MODE64.decode(&buf);
        assert_eq!(a, b);

        // trailing bytes past the instruction do not matter
        if let Ok(insn) = a {
            assert_eq!(MODE64.decode(&buf[..insn.len()]), Ok(insn));
        }
    }
}

#[test]
fn truncated_never_succeeds() {
    let code = [0x48, 0xb8, 0x88, 0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11];
    for len in 0..code.len() {
        assert_eq!(
            MODE64.decode(&code[..len]),
            Err(Error::InsufficientLength),
            "{len}"
        );
    }
    assert_eq!(MODE64.decode(&code).map(|i| i.len()), Ok(code.len()));
}

#[test]
fn clamp_to_max_length() {
    let mut code = vec![0x66; 12];
    code.extend_from_slice(&[0x05, 0x00, 0x00, 0x00]);
    let insn = MODE32.decode(&code).unwrap();
    assert_eq!(insn.len(), INSN_MAX_LEN);
    assert!(insn.flags().has_imm16());

    // the immediate needs bytes beyond the window
    let mut code = vec![0x66; 14];
    code.extend_from_slice(&[0x05, 0x00, 0x00]);
    assert_eq!(MODE32.decode(&code), Err(Error::InsufficientLength));
}

#[test]
fn prefix_exclusion() {
    let insn = MODE64.decode(&[0xf3, 0xf2, 0xa4]).unwrap();
    assert!(insn.flags().contains(Flag::REPNZ));
    assert!(!insn.flags().contains(Flag::REP));
    assert_eq!(insn.rep_prefix(), Some(0xf2));

    let insn = MODE32.decode(&[0x2e, 0x64, 0x8b, 0x00]).unwrap();
    assert_eq!(insn.flags().segment(), Some(Segment::Fs));
    assert_eq!(insn.segment_prefix(), Some(0x64));
    assert!(!insn.flags().contains(Flag::SEG_CS));

    let mut set = PrefixSet::empty();
    set.add(PrefixId::SegCs).add(PrefixId::SegGs).add(PrefixId::Lock);
    assert_eq!(set.segment(), Some(Segment::Gs));
    assert!(!set.contains(PrefixId::SegCs));
    assert!(set.contains(PrefixId::Lock));
    set.remove(PrefixId::Lock);
    assert_eq!(set.iter().collect::<Vec<_>>(), [PrefixId::SegGs]);
}

#[test]
fn prefix_accessors() {
    let insn = MODE64
        .decode(&[0x66, 0x67, 0xf0, 0x01, 0x00])
        .unwrap();
    assert_eq!(insn.opsize_prefix(), Some(0x66));
    assert_eq!(insn.addrsize_prefix(), Some(0x67));
    assert_eq!(insn.lock_prefix(), Some(0xf0));
    assert_eq!(insn.segment_prefix(), None);
    assert!(!insn.prefixes().contains(PrefixId::Unprefixed));
}

#[test]
fn rex_fields() {
    let insn = MODE64.decode(&[0x4c, 0x8b, 0x04, 0x24]).unwrap();
    let rex = insn.rex().unwrap();
    assert!(rex.w() && rex.r());
    assert!(!rex.x() && !rex.b());
    let modrm = insn.modrm().unwrap();
    assert_eq!((modrm.mod_(), modrm.reg(), modrm.rm()), (0, 0, 4));
    assert!(!modrm.is_register());
    let sib = insn.sib().unwrap();
    assert_eq!((sib.scale(), sib.index(), sib.base()), (0, 4, 4));

    // REX is an instruction in 32-bit mode
    let insn = MODE32.decode(&[0x48, 0x8b, 0x04, 0x24]).unwrap();
    assert_eq!(insn.len(), 1);
    assert_eq!(insn.rex(), None);
}

#[test]
fn flag_display() {
    let flags = Flag::MODRM | Flag::DISP8 | Flag::LOCK | Flag::SEG_FS;
    assert_eq!(flags.to_string(), "ModRM|Disp8|Lock|FS");
    assert_eq!(Flag::empty().to_string(), "None");
    assert_eq!(Flag::NOT_PREFIXED.to_string(), "None");
}

#[test]
fn enter_has_two_immediates() {
    let insn = MODE32.decode(&[0xc8, 0x10, 0x00, 0x01]).unwrap();
    assert_eq!(insn.len(), 4);
    assert!(insn.flags().has_imm8());
    assert!(insn.flags().has_imm16());
    assert_eq!(insn.imm().bits(), 8);
}

#[test]
fn hde_record() {
    let insn = MODE64
        .decode(&[0x64, 0xf0, 0x48, 0x83, 0x40, 0x08, 0x01])
        .unwrap();
    let record = hde::Record::from(&insn);
    assert_eq!(record.len, 7);
    assert_eq!(record.p_seg, 0x64);
    assert_eq!(record.p_lock, 0xf0);
    assert_eq!(record.rex, 0x48);
    assert_eq!(record.opcode, 0x83);
    assert_eq!(record.modrm, 0x40);
    assert_eq!(record.disp, 8);
    assert_eq!(record.imm, 1);
    assert_eq!(
        record.flags,
        hde::F_MODRM
            | hde::F_IMM8
            | hde::F_DISP8
            | hde::F_PREFIX_LOCK
            | hde::F_PREFIX_SEG
            | hde::F_PREFIX_REX
    );

    let nop = MODE64.decode(&[0x90]).unwrap();
    assert_eq!(hde::flags(nop.flags()), (hde::F_PREFIX_NONE, 0));
}

#[test]
fn flag_prefix_field() {
    let mut lock = PrefixSet::empty();
    lock.add(PrefixId::Lock);
    let mut fs = PrefixSet::empty();
    fs.add(PrefixId::SegFs);

    let flags = Flag::MODRM.with_prefixes(lock).add_prefixes(fs);
    assert!(flags.has_modrm());
    assert!(flags.contains(Flag::LOCK));
    assert!(flags.contains(Flag::SEG_FS));
    assert_eq!(flags.segment(), Some(Segment::Fs));

    let flags = flags.with_prefixes(PrefixSet::empty());
    assert!(flags.prefixes().is_empty());
    assert!(flags.has_modrm());

    assert!(Flag::TWO_IMM16.has_imm64());
    assert!(Flag::IMM64.has_two_imm16());
}
