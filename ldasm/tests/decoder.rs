use ldasm::{Decoder, Error, Options, Step, Summary, MODE32, MODE64};

#[test]
fn decode_advances_address() {
    let mut decoder = Decoder::new(&MODE64, 0x400000, Options::default());
    let insn = decoder.decode(&[0x48, 0x89, 0xe5]).unwrap();
    assert_eq!(insn.len(), 3);
    assert_eq!(decoder.address(), 0x400003);

    assert_eq!(decoder.decode(&[0x0f, 0xff]), Err(Error::UnknownOpcode));
    assert_eq!(decoder.address(), 0x400003);

    decoder.skip(5);
    assert_eq!(decoder.address(), 0x400008);
}

#[test]
fn address_wraps_at_the_end() {
    let code = [0x90, 0x90, 0x90];
    let decoder = Decoder::new(&MODE32, u64::MAX - 1, Options::default());
    let addresses: Vec<u64> = decoder.walk(&code).map(|step| step.address).collect();
    assert_eq!(addresses, [u64::MAX - 1, u64::MAX, 0]);

    let mut decoder = Decoder::new(&MODE32, u64::MAX, Options::default());
    decoder.decode(&code).unwrap();
    assert_eq!(decoder.address(), 0);
}

#[test]
fn walk_resyncs_by_one_byte() {
    let code = [0x90, 0xf0, 0x90, 0xc3, 0x66];
    let decoder = Decoder::new(&MODE32, 0x10, Options::default());
    let steps: Vec<Step> = decoder.walk(&code).collect();

    let summary: Vec<_> = steps
        .iter()
        .map(|step| (step.address, step.len, step.result.map(|i| i.opcode())))
        .collect();
    assert_eq!(
        summary,
        [
            (0x10, 1, Ok(0x90)),
            (0x11, 1, Err(Error::InvalidLock)),
            (0x12, 1, Ok(0x90)),
            (0x13, 1, Ok(0xc3)),
            (0x14, 1, Err(Error::InsufficientLength)),
        ]
    );

    // the decoder itself does not move
    assert_eq!(decoder.address(), 0x10);
}

#[test]
fn walk_covers_every_byte() {
    let code: Vec<u8> = (0..=255).rev().collect();
    let decoder = Decoder::new(&MODE64, 0, Options::default());
    let mut next = 0;
    for step in decoder.walk(&code) {
        assert_eq!(step.address, next);
        assert!(step.len >= 1);
        next += step.len as u64;
    }
    assert_eq!(next, code.len() as u64);
}

#[test]
fn decode_len_stops_on_truncation() {
    let decoder = Decoder::new(
        &MODE64,
        0,
        Options {
            decode_zeroes: true,
            ..Options::default()
        },
    );
    // push; mov; truncated call
    let code = [0x55, 0x48, 0x89, 0xe5, 0xe8, 0x00, 0x00];
    assert_eq!(decoder.decode_len(&code), 4);
    // undecodable bytes are consumed one at a time
    assert_eq!(decoder.decode_len(&[0x0f, 0xff, 0xc3]), 3);
    assert_eq!(decoder.decode_len(&[]), 0);
}

#[test]
fn decode_len_skips_zero_runs() {
    let decoder = Decoder::new(&MODE64, 0, Options::default());
    let mut code = vec![0; 24];
    code.extend_from_slice(&[0x90; 8]);
    // the run is skipped whole, a tail shorter than a zero block is left
    assert_eq!(decoder.decode_len(&code), 25);
    assert_eq!(decoder.decode_len(&[0x90, 0x90, 0x90]), 0);
}

#[test]
fn summary() {
    let code = [0x55, 0xf0, 0x01, 0xc8, 0x0f, 0xff, 0xc3];
    let decoder = Decoder::new(&MODE64, 0, Options::default());
    let summary = Summary::collect(decoder.walk(&code));

    // 55, error f0, 01 c8, error 0f, ff c3
    assert_eq!(summary.insns(), 3);
    assert_eq!(summary.bytes(), code.len());
    assert_eq!(summary.errors(), 2);
    assert_eq!(summary.count(Error::InvalidLock), 1);
    assert_eq!(summary.count(Error::UnknownOpcode), 1);
    assert_eq!(summary.count(Error::BadOperand), 0);
    assert_eq!(
        summary.to_string(),
        "3 instructions, 7 bytes, 1 unknown opcode, 1 invalid lock"
    );

    let mut total = Summary::default();
    total.merge(&summary);
    total.merge(&summary);
    assert_eq!(total.insns(), 6);
    assert_eq!(total.errors(), 4);
    assert_eq!(Summary::default().to_string(), "0 instructions, 0 bytes");
}
