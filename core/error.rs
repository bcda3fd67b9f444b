use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Error {
    /// Input ended before the instruction was complete.
    InsufficientLength,
    /// No valid instruction form for the opcode, prefixes and mode.
    UnknownOpcode,
    /// LOCK prefix on a form without an atomic memory operand.
    InvalidLock,
    /// ModRM.reg or the register/memory form is not allowed for the opcode.
    BadOperand,
}

impl Error {
    pub const ALL: [Error; 4] = [
        Self::InsufficientLength,
        Self::UnknownOpcode,
        Self::InvalidLock,
        Self::BadOperand,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientLength => "insufficient length",
            Self::UnknownOpcode => "unknown opcode",
            Self::InvalidLock => "invalid lock",
            Self::BadOperand => "bad operand",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
