//! Cue name table
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::header::SoundBankHeader;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Decode the packed cue name block.
///
/// Simple cue `i` takes name `i`, complex cue `i` takes name
/// `num_simple_cues + i`. Extra names past the declared cue count are kept.
pub fn read_cue_names(
    cursor: &mut BinaryCursor<'_>,
    header: &SoundBankHeader,
) -> Result<Vec<String>> {
    cursor.seek(header.cue_names_offset as usize)?;
    let names = cursor.read_cstring_block(usize::from(header.cue_name_table_len))?;

    let expected = header.cue_count();
    if names.len() < expected {
        return Err(Error::CorruptNameTable {
            expected,
            found: names.len(),
        });
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::xsb::header::parse_header;
    use crate::formats::xsb::writer::SoundBankBuilder;

    #[test]
    fn test_names_in_table_order() {
        let bytes = SoundBankBuilder::new("Bank")
            .wave_bank("Waves")
            .simple_cue("zeta", 1, 0, 0)
            .simple_cue("alpha", 1, 0, 1)
            .simple_cue("mid", 1, 0, 2)
            .build()
            .unwrap();
        let mut cursor = BinaryCursor::new(&bytes);
        let header = parse_header(&mut cursor).unwrap();
        let names = read_cue_names(&mut cursor, &header).unwrap();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_short_name_table() {
        let bytes = SoundBankBuilder::new("Bank")
            .wave_bank("Waves")
            .simple_cue("one", 1, 0, 0)
            .simple_cue("two", 1, 0, 1)
            .build()
            .unwrap();
        let mut cursor = BinaryCursor::new(&bytes);
        let mut header = parse_header(&mut cursor).unwrap();
        // Only "one\0" fits
        header.cue_name_table_len = 4;
        assert!(matches!(
            read_cue_names(&mut cursor, &header),
            Err(Error::CorruptNameTable {
                expected: 2,
                found: 1
            })
        ));
    }
}
