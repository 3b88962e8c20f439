//! File format handlers

pub mod common;
pub mod xsb;

pub use common::BinaryCursor;
pub use xsb::{SoundBankBuilder, SoundBankData, parse_soundbank_bytes, read_soundbank};
