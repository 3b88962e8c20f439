//! Variation tables: weighted alternatives for complex cues
//!
//! Tables live out-of-line from the cue records. They are always parsed
//! through [`BinaryCursor::with_seek`], so the complex-cue cursor is back on
//! the instance-limit trailer when this returns.
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use rand::Rng;

use super::sound::{WaveRef, XactSound, parse_sound};
use super::wave_banks::WaveResolver;
use crate::engine::CategoryId;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Weight band given to `CompactWave` entries, which store no weights
pub const DEFAULT_WEIGHT_MIN: u8 = 0;
pub const DEFAULT_WEIGHT_MAX: u8 = u8::MAX;

/// On-disk entry shape, from `(variation_flags >> 3) & 0x7`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariationTableType {
    Wave,
    Sound,
    CompactWave,
}

impl VariationTableType {
    /// Map the 3-bit tag. Tags 2, 3, 5, 6 and 7 exist in the format but are not implemented.
    pub fn from_tag(tag: u8, offset: u32) -> Result<Self> {
        match tag {
            0 => Ok(Self::Wave),
            1 => Ok(Self::Sound),
            4 => Ok(Self::CompactWave),
            _ => Err(Error::UnsupportedVariationType {
                offset,
                table_type: tag,
            }),
        }
    }

    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Wave => 0,
            Self::Sound => 1,
            Self::CompactWave => 4,
        }
    }

    #[must_use]
    pub fn from_flags(variation_flags: u16) -> u8 {
        ((variation_flags >> 3) & 0x7) as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationEntry {
    pub sound: XactSound,
    pub weight_min: u8,
    pub weight_max: u8,
}

impl VariationEntry {
    /// Width of the entry's likelihood band. Inverted bands count as 1.
    #[must_use]
    pub fn weight(&self) -> u32 {
        u32::from(self.weight_max.saturating_sub(self.weight_min)) + 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationTable {
    pub offset: u32,
    pub table_type: VariationTableType,
    pub flags: u16,
    pub entries: Vec<VariationEntry>,
}

impl VariationTable {
    /// Pick an entry with probability proportional to its band width.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&VariationEntry> {
        let total: u32 = self.entries.iter().map(VariationEntry::weight).sum();
        if total == 0 {
            return None;
        }
        let mut roll = rng.gen_range(0..total);
        for entry in &self.entries {
            let weight = entry.weight();
            if roll < weight {
                return Some(entry);
            }
            roll -= weight;
        }
        None
    }

    /// The single category shared by every categorised entry.
    ///
    /// Direct-track entries carry no category and never conflict. A table
    /// with no categorised entry falls back to [`CategoryId::DEFAULT`].
    pub fn category(&self, cue_name: &str) -> Result<CategoryId> {
        let mut first: Option<CategoryId> = None;
        for category in self.entries.iter().filter_map(|e| e.sound.category()) {
            match first {
                None => first = Some(category),
                Some(existing) if existing != category => {
                    return Err(Error::MixedCategoryVariation {
                        cue: cue_name.to_string(),
                        first: existing.0,
                        other: category.0,
                    });
                }
                Some(_) => {}
            }
        }
        Ok(first.unwrap_or(CategoryId::DEFAULT))
    }
}

/// Parse the variation table at `offset` without moving the caller's cursor.
pub fn parse_variation_table(
    cursor: &mut BinaryCursor<'_>,
    resolver: &WaveResolver<'_>,
    offset: u32,
) -> Result<VariationTable> {
    cursor.with_seek(offset as usize, |cursor| {
        let num_entries = cursor.read_u16()?;
        let variation_flags = cursor.read_u16()?;
        cursor.read_u8()?; // reserved
        cursor.read_u16()?; // reserved
        cursor.read_u8()?; // reserved

        let table_type =
            VariationTableType::from_tag(VariationTableType::from_flags(variation_flags), offset)?;

        let mut entries = Vec::with_capacity(usize::from(num_entries));
        for _ in 0..num_entries {
            let entry = match table_type {
                VariationTableType::Wave => {
                    let track_index = cursor.read_u16()?;
                    let wave_bank_index = cursor.read_u8()?;
                    let weight_min = cursor.read_u8()?;
                    let weight_max = cursor.read_u8()?;
                    VariationEntry {
                        sound: XactSound::DirectTrack(WaveRef::resolve(
                            resolver,
                            wave_bank_index,
                            track_index,
                        )?),
                        weight_min,
                        weight_max,
                    }
                }
                VariationTableType::Sound => {
                    let sound_offset = cursor.read_u32()?;
                    let weight_min = cursor.read_u8()?;
                    let weight_max = cursor.read_u8()?;
                    VariationEntry {
                        sound: XactSound::Composite(parse_sound(cursor, resolver, sound_offset)?),
                        weight_min,
                        weight_max,
                    }
                }
                VariationTableType::CompactWave => {
                    let track_index = cursor.read_u16()?;
                    let wave_bank_index = cursor.read_u8()?;
                    VariationEntry {
                        sound: XactSound::DirectTrack(WaveRef::resolve(
                            resolver,
                            wave_bank_index,
                            track_index,
                        )?),
                        weight_min: DEFAULT_WEIGHT_MIN,
                        weight_max: DEFAULT_WEIGHT_MAX,
                    }
                }
            };
            entries.push(entry);
        }

        tracing::debug!(
            "Variation table at {:#x}: {:?}, {} entries",
            offset,
            table_type,
            entries.len()
        );

        Ok(VariationTable {
            offset,
            table_type,
            flags: variation_flags,
            entries,
        })
    })
}
