use core::fmt;

pub const PREFIX_SEG_CS: u8 = 0x2e;
pub const PREFIX_SEG_SS: u8 = 0x36;
pub const PREFIX_SEG_DS: u8 = 0x3e;
pub const PREFIX_SEG_ES: u8 = 0x26;
pub const PREFIX_SEG_FS: u8 = 0x64;
pub const PREFIX_SEG_GS: u8 = 0x65;
pub const PREFIX_LOCK: u8 = 0xf0;
pub const PREFIX_REPNZ: u8 = 0xf2;
pub const PREFIX_REP: u8 = 0xf3;
pub const PREFIX_OPERAND_SIZE: u8 = 0x66;
pub const PREFIX_ADDRESS_SIZE: u8 = 0x67;

/// Segment override.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    Ds,
    Cs,
    Ss,
    Es,
    Fs,
    Gs,
}

impl Segment {
    const ALL: [Segment; 6] = [
        Self::Ds,
        Self::Cs,
        Self::Ss,
        Self::Es,
        Self::Fs,
        Self::Gs,
    ];

    /// Returns the override prefix byte.
    pub const fn prefix(self) -> u8 {
        match self {
            Self::Ds => PREFIX_SEG_DS,
            Self::Cs => PREFIX_SEG_CS,
            Self::Ss => PREFIX_SEG_SS,
            Self::Es => PREFIX_SEG_ES,
            Self::Fs => PREFIX_SEG_FS,
            Self::Gs => PREFIX_SEG_GS,
        }
    }

    pub fn from_prefix(byte: u8) -> Option<Self> {
        PrefixId::from_byte(byte).and_then(PrefixId::segment)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Ds => "ds",
            Self::Cs => "cs",
            Self::Ss => "ss",
            Self::Es => "es",
            Self::Fs => "fs",
            Self::Gs => "gs",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

/// Prefix kinds; the discriminant is the bit position in [`PrefixSet`].
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PrefixId {
    /// Marker for an instruction without legacy prefixes.
    Unprefixed = 0,
    RepNZ,
    Rep,
    OpSize,
    AddrSize,
    Lock,
    Rex,
    SegDs,
    SegCs,
    SegSs,
    SegEs,
    SegFs,
    SegGs,
}

static PREFIX_TABLE: [Option<PrefixId>; 256] = {
    let mut table = [None; 256];
    table[PREFIX_REP as usize] = Some(PrefixId::Rep);
    table[PREFIX_REPNZ as usize] = Some(PrefixId::RepNZ);
    table[PREFIX_LOCK as usize] = Some(PrefixId::Lock);
    table[PREFIX_SEG_CS as usize] = Some(PrefixId::SegCs);
    table[PREFIX_SEG_SS as usize] = Some(PrefixId::SegSs);
    table[PREFIX_SEG_DS as usize] = Some(PrefixId::SegDs);
    table[PREFIX_SEG_ES as usize] = Some(PrefixId::SegEs);
    table[PREFIX_SEG_FS as usize] = Some(PrefixId::SegFs);
    table[PREFIX_SEG_GS as usize] = Some(PrefixId::SegGs);
    table[PREFIX_OPERAND_SIZE as usize] = Some(PrefixId::OpSize);
    table[PREFIX_ADDRESS_SIZE as usize] = Some(PrefixId::AddrSize);
    table
};

impl PrefixId {
    pub const ALL: [PrefixId; 13] = [
        Self::Unprefixed,
        Self::RepNZ,
        Self::Rep,
        Self::OpSize,
        Self::AddrSize,
        Self::Lock,
        Self::Rex,
        Self::SegDs,
        Self::SegCs,
        Self::SegSs,
        Self::SegEs,
        Self::SegFs,
        Self::SegGs,
    ];

    /// Classifies a legacy prefix byte. REX is mode dependent and never
    /// reported here.
    pub fn from_byte(byte: u8) -> Option<Self> {
        PREFIX_TABLE[byte as usize]
    }

    pub const fn bit(self) -> u16 {
        1 << self as u16
    }

    pub fn segment(self) -> Option<Segment> {
        let index = (self as u8).checked_sub(Self::SegDs as u8)?;
        Segment::ALL.get(index as usize).copied()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Unprefixed => "None",
            Self::RepNZ => "RepNZ",
            Self::Rep => "Rep",
            Self::OpSize => "OpSize",
            Self::AddrSize => "AddrSize",
            Self::Lock => "Lock",
            Self::Rex => "REX",
            Self::SegDs => "DS",
            Self::SegCs => "CS",
            Self::SegSs => "SS",
            Self::SegEs => "ES",
            Self::SegFs => "FS",
            Self::SegGs => "GS",
        }
    }
}

impl fmt::Display for PrefixId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

const SEGMENT_MASK: u16 = PrefixId::SegDs.bit()
    | PrefixId::SegCs.bit()
    | PrefixId::SegSs.bit()
    | PrefixId::SegEs.bit()
    | PrefixId::SegFs.bit()
    | PrefixId::SegGs.bit();

const REP_MASK: u16 = PrefixId::Rep.bit() | PrefixId::RepNZ.bit();

/// Bit in the table prefix masks standing for any segment override.
const TABLE_SEGMENT: u8 = 0x40;

/// Set of prefixes with at most one segment and at most one of REP/REPNZ.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PrefixSet(u16);

impl PrefixSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u16 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Adds a prefix, replacing a conflicting segment or repeat prefix.
    pub fn add(&mut self, id: PrefixId) -> &mut Self {
        if id.segment().is_some() {
            self.0 &= !SEGMENT_MASK;
        }
        if matches!(id, PrefixId::Rep | PrefixId::RepNZ) {
            self.0 &= !REP_MASK;
        }
        self.0 |= id.bit();
        self
    }

    pub fn remove(&mut self, id: PrefixId) -> &mut Self {
        self.0 &= !id.bit();
        self
    }

    pub const fn contains(&self, id: PrefixId) -> bool {
        self.0 & id.bit() != 0
    }

    /// Returns the prefix with the lowest bit position.
    pub fn first(&self) -> Option<PrefixId> {
        PrefixId::ALL
            .get(self.0.trailing_zeros() as usize)
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = PrefixId> {
        let raw = self.0;
        PrefixId::ALL
            .into_iter()
            .filter(move |id| raw & id.bit() != 0)
    }

    pub fn segment(&self) -> Option<Segment> {
        PrefixSet(self.0 & SEGMENT_MASK).first()?.segment()
    }

    /// Projects the set onto the prefix masks stored in the opcode tables,
    /// where all segment overrides share one bit.
    pub(crate) fn table_mask(&self) -> u8 {
        let mut mask = (self.0 & 0x3f) as u8;
        if self.0 & SEGMENT_MASK != 0 {
            mask |= TABLE_SEGMENT;
        }
        mask
    }
}

impl FromIterator<PrefixId> for PrefixSet {
    fn from_iter<T: IntoIterator<Item = PrefixId>>(iter: T) -> Self {
        let mut set = PrefixSet::empty();
        for id in iter {
            set.add(id);
        }
        set
    }
}

impl fmt::Debug for PrefixSet {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}
