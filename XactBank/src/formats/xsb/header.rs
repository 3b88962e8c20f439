//! `SoundBank` header (the fixed 138-byte block at the start of the stream)
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use chrono::{DateTime, Utc};

use super::{BANK_NAME_SIZE, SDBK_MAGIC};
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Seconds between 1601-01-01 (FILETIME epoch) and 1970-01-01
const FILETIME_UNIX_OFFSET_SECS: i64 = 11_644_473_600;

/// Decoded header. Offsets are absolute from the start of the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBankHeader {
    pub tool_version: u16,
    pub format_version: u16,
    /// FCS-16 over every byte after this field
    pub checksum: u16,
    pub last_modified_low: u32,
    pub last_modified_high: u32,
    pub platform: u8,

    pub num_simple_cues: u16,
    pub num_complex_cues: u16,
    pub num_total_cues: u16,
    pub num_wave_banks: u8,
    pub num_sounds: u16,
    pub cue_name_table_len: u16,

    pub simple_cues_offset: u32,
    pub complex_cues_offset: u32,
    pub cue_names_offset: u32,
    pub variation_tables_offset: u32,
    pub wave_bank_name_table_offset: u32,
    pub cue_name_hash_table_offset: u32,
    pub cue_name_hash_values_offset: u32,
    pub sounds_offset: u32,

    pub name: String,
}

impl SoundBankHeader {
    /// Number of cues the bank must produce
    #[must_use]
    pub fn cue_count(&self) -> usize {
        usize::from(self.num_simple_cues) + usize::from(self.num_complex_cues)
    }

    /// Last-modified stamp as a 64-bit FILETIME (100ns ticks since 1601)
    #[must_use]
    pub fn last_modified_filetime(&self) -> u64 {
        (u64::from(self.last_modified_high) << 32) | u64::from(self.last_modified_low)
    }

    /// Last-modified stamp as UTC, `None` for zero or out-of-range stamps
    #[must_use]
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        let ticks = self.last_modified_filetime();
        if ticks == 0 {
            return None;
        }
        let secs = (ticks / 10_000_000) as i64 - FILETIME_UNIX_OFFSET_SECS;
        let nanos = ((ticks % 10_000_000) * 100) as u32;
        DateTime::from_timestamp(secs, nanos)
    }
}

/// Parse the header from the start of the stream.
///
/// Only the magic is checked here. Version policy is applied by the reader.
pub fn parse_header(cursor: &mut BinaryCursor<'_>) -> Result<SoundBankHeader> {
    cursor.seek(0)?;

    let magic = cursor.read_array::<4>()?;
    if magic != SDBK_MAGIC {
        return Err(Error::BadMagic(magic));
    }

    let tool_version = cursor.read_u16()?;
    let format_version = cursor.read_u16()?;
    let checksum = cursor.read_u16()?;
    let last_modified_low = cursor.read_u32()?;
    let last_modified_high = cursor.read_u32()?;
    let platform = cursor.read_u8()?;

    let num_simple_cues = cursor.read_u16()?;
    let num_complex_cues = cursor.read_u16()?;
    cursor.read_u16()?; // reserved
    let num_total_cues = cursor.read_u16()?;
    let num_wave_banks = cursor.read_u8()?;
    let num_sounds = cursor.read_u16()?;
    let cue_name_table_len = cursor.read_u16()?;
    cursor.read_u16()?; // reserved

    let simple_cues_offset = cursor.read_u32()?;
    let complex_cues_offset = cursor.read_u32()?;
    let cue_names_offset = cursor.read_u32()?;
    cursor.read_u32()?; // reserved
    let variation_tables_offset = cursor.read_u32()?;
    cursor.read_u32()?; // reserved
    let wave_bank_name_table_offset = cursor.read_u32()?;
    let cue_name_hash_table_offset = cursor.read_u32()?;
    let cue_name_hash_values_offset = cursor.read_u32()?;
    let sounds_offset = cursor.read_u32()?;

    let name = cursor.read_fixed_string(BANK_NAME_SIZE)?;

    Ok(SoundBankHeader {
        tool_version,
        format_version,
        checksum,
        last_modified_low,
        last_modified_high,
        platform,
        num_simple_cues,
        num_complex_cues,
        num_total_cues,
        num_wave_banks,
        num_sounds,
        cue_name_table_len,
        simple_cues_offset,
        complex_cues_offset,
        cue_names_offset,
        variation_tables_offset,
        wave_bank_name_table_offset,
        cue_name_hash_table_offset,
        cue_name_hash_values_offset,
        sounds_offset,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xsb::HEADER_SIZE;
    use crate::formats::xsb::writer::SoundBankBuilder;

    #[test]
    fn test_parse_header_fields() {
        let bytes = SoundBankBuilder::new("UI Sounds")
            .wave_bank("UI Waves")
            .simple_cue("click", 3, 0, 4)
            .simple_cue("hover", 3, 0, 5)
            .build()
            .unwrap();

        let mut cursor = BinaryCursor::new(&bytes);
        let header = parse_header(&mut cursor).unwrap();

        assert_eq!(cursor.position(), HEADER_SIZE);
        assert_eq!(header.name, "UI Sounds");
        assert_eq!(header.tool_version, 46);
        assert_eq!(header.num_simple_cues, 2);
        assert_eq!(header.num_complex_cues, 0);
        assert_eq!(header.num_total_cues, 2);
        assert_eq!(header.num_wave_banks, 1);
        assert_eq!(header.cue_count(), 2);
        assert!(header.cue_names_offset as usize >= HEADER_SIZE);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = SoundBankBuilder::new("Bank").build().unwrap();
        bytes[..4].copy_from_slice(b"WBND");
        let mut cursor = BinaryCursor::new(&bytes);
        assert!(matches!(
            parse_header(&mut cursor),
            Err(Error::BadMagic(magic)) if &magic == b"WBND"
        ));
    }

    #[test]
    fn test_truncated_header() {
        let bytes = SoundBankBuilder::new("Bank").build().unwrap();
        for len in [0, 3, 4, 20, HEADER_SIZE - 1] {
            let mut cursor = BinaryCursor::new(&bytes[..len]);
            let err = parse_header(&mut cursor).unwrap_err();
            assert!(err.is_truncation(), "len {len}: {err:?}");
        }
    }

    #[test]
    fn test_last_modified_conversion() {
        let bytes = SoundBankBuilder::new("Bank").build().unwrap();
        let mut header = parse_header(&mut BinaryCursor::new(&bytes)).unwrap();

        header.last_modified_low = 0;
        header.last_modified_high = 0;
        assert_eq!(header.last_modified(), None);

        // 2000-01-01T00:00:00Z
        let filetime: u64 = 125_911_584_000_000_000;
        header.last_modified_low = filetime as u32;
        header.last_modified_high = (filetime >> 32) as u32;
        let stamp = header.last_modified().unwrap();
        assert_eq!(stamp.timestamp(), 946_684_800);
    }
}
