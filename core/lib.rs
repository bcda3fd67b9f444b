#![cfg_attr(not(feature = "std"), no_std)]

pub mod bytes;
pub mod error;
pub mod flags;
pub mod literal;
pub mod macros;
pub mod utils;

#[cfg(feature = "print")]
pub mod printer;
#[cfg(feature = "print")]
pub mod symbols;

pub use crate::{bytes::Bytes, error::Error, literal::Literal};
