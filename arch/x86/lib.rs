//! x86 and x86-64 length decoder.
//!
//! ```
//! use ldasm_x86::MODE64;
//!
//! let insn = MODE64.decode(&[0xe9, 0x10, 0x00, 0x00, 0x00]).unwrap();
//! assert_eq!(insn.len(), 5);
//! assert!(insn.is_jmp());
//! assert!(insn.flags().is_relative());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

mod decode;
mod fields;
mod insn;
mod mode;
mod prefix;
mod tables;

pub mod hde;

#[cfg(feature = "print")]
mod printer;

pub use ldasm_core::{Error, Literal};

pub use crate::{
    decode::decode,
    fields::{ModRM, Rex, Sib},
    insn::{Flag, Instruction},
    mode::{Mode, MODE32, MODE64},
    prefix::*,
};

#[cfg(feature = "print")]
pub use crate::printer::Printer;

/// Longest legal encoding.
pub const INSN_MAX_LEN: usize = 15;
