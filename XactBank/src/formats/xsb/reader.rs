//! `SoundBank` file reading and parsing
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;

use super::cue_names::read_cue_names;
use super::cues::{CueDefinition, read_cues};
use super::header::{SoundBankHeader, parse_header};
use super::wave_banks::{WaveBankRef, WaveResolver, read_wave_bank_table};
use super::CHECKSUM_COVERAGE_START;
use crate::config::LoadOptions;
use crate::engine::WaveBankRegistry;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;
use crate::utils::fcs16;

/// Everything decoded from one `SoundBank`
#[derive(Debug, Clone)]
pub struct SoundBankData {
    pub header: SoundBankHeader,
    pub wave_banks: Vec<WaveBankRef>,
    /// Cues keyed by name, in cue name table order
    pub cues: IndexMap<String, CueDefinition>,
}

impl SoundBankData {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.header.name
    }
}

/// Read a `SoundBank` file from disk
///
/// # Errors
/// Returns [`Error::Io`] if the file cannot be read, or any decode error
/// from [`parse_soundbank_bytes`].
pub fn read_soundbank<P: AsRef<Path>>(
    path: P,
    registry: &dyn WaveBankRegistry,
    options: &LoadOptions,
) -> Result<SoundBankData> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;
    parse_soundbank_bytes(&buffer, registry, options)
}

/// Parse `SoundBank` data from bytes.
///
/// Decoding is all-or-nothing: the first error aborts and nothing partial
/// is returned.
pub fn parse_soundbank_bytes(
    data: &[u8],
    registry: &dyn WaveBankRegistry,
    options: &LoadOptions,
) -> Result<SoundBankData> {
    let mut cursor = BinaryCursor::new(data);
    let header = parse_header(&mut cursor)?;

    if header.tool_version != options.expected_tool_version {
        tracing::warn!(
            "SoundBank '{}' has tool version {} (expected {}), decoding anyway",
            header.name,
            header.tool_version,
            options.expected_tool_version
        );
    }

    if options.verify_checksum {
        verify_checksum(data, header.checksum)?;
    }

    let wave_banks = read_wave_bank_table(&mut cursor, &header, registry)?;
    let names = read_cue_names(&mut cursor, &header)?;
    let resolver = WaveResolver::new(&wave_banks, registry);
    let cues = read_cues(&mut cursor, &header, &names, &resolver)?;

    tracing::info!(
        "Decoded SoundBank '{}': {} cues, {} wave banks",
        header.name,
        cues.len(),
        wave_banks.len()
    );

    Ok(SoundBankData {
        header,
        wave_banks,
        cues,
    })
}

/// Recompute the FCS-16 over everything after the checksum field
pub fn compute_checksum(data: &[u8]) -> Result<u16> {
    let covered = data.get(CHECKSUM_COVERAGE_START..).ok_or(Error::Truncated {
        offset: 0,
        needed: CHECKSUM_COVERAGE_START,
        available: data.len(),
    })?;
    Ok(fcs16(covered))
}

fn verify_checksum(data: &[u8], expected: u16) -> Result<()> {
    let actual = compute_checksum(data)?;
    if actual != expected {
        return Err(Error::ChecksumMismatch { expected, actual });
    }
    Ok(())
}
