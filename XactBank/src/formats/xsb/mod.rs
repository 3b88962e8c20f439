//! XACT `SoundBank` (`.xsb`, magic `SDBK`) format
//!
//! A `SoundBank` names cues and describes how each one plays: a single sound
//! record, or a weighted variation table of alternatives. Audio data itself
//! lives in separate wave banks, referenced here by name and track index.
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

pub mod clip;
pub mod cue_names;
pub mod cues;
pub mod header;
pub mod reader;
pub mod sound;
pub mod variation;
pub mod wave_banks;
pub mod writer;

pub use clip::{Clip, ClipEvent, LOOP_INFINITE};
pub use cues::{CueBody, CueDefinition, CueKind};
pub use header::SoundBankHeader;
pub use reader::{SoundBankData, compute_checksum, parse_soundbank_bytes, read_soundbank};
pub use sound::{SoundBody, SoundRecord, WaveRef, XactSound};
pub use variation::{VariationEntry, VariationTable, VariationTableType};
pub use wave_banks::WaveBankRef;
pub use writer::{ClipSpec, SoundBankBuilder, SoundSpec, VariationSpec};

/// Magic bytes at offset 0
pub const SDBK_MAGIC: [u8; 4] = *b"SDBK";

/// Size of the fixed header block
pub const HEADER_SIZE: usize = 138;

/// Width of the NUL-padded bank name and wave bank name fields
pub const BANK_NAME_SIZE: usize = 64;

/// Tool version this decoder was written against
pub const EXPECTED_TOOL_VERSION: u16 = 46;

/// Offset of the header checksum field
pub const CHECKSUM_OFFSET: usize = 8;

/// The checksum covers every byte from here to the end of the stream
pub const CHECKSUM_COVERAGE_START: usize = 10;
