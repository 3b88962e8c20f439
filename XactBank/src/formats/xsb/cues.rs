//! Simple and complex cue records
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use super::header::SoundBankHeader;
use super::sound::{XactSound, parse_sound};
use super::variation::{VariationTable, parse_variation_table};
use super::wave_banks::WaveResolver;
use crate::engine::CategoryId;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Complex cue flag: the record points at one sound instead of a variation table
pub const COMPLEX_CUE_DIRECT_SOUND: u8 = 0x04;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    Simple,
    Complex,
}

/// What a cue plays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueBody {
    Sound(XactSound),
    Variation(VariationTable),
}

/// A decoded cue, before it is handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueDefinition {
    pub name: String,
    pub kind: CueKind,
    pub flags: u8,
    pub category: CategoryId,
    pub body: CueBody,
}

impl CueDefinition {
    /// Sounds reachable from this cue, in record order
    pub fn sounds(&self) -> impl Iterator<Item = &XactSound> {
        let (single, table) = match &self.body {
            CueBody::Sound(sound) => (Some(sound), None),
            CueBody::Variation(table) => (None, Some(table)),
        };
        single
            .into_iter()
            .chain(table.into_iter().flat_map(|t| t.entries.iter().map(|e| &e.sound)))
    }
}

/// How a complex cue record reaches its sound(s)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComplexCueRecord {
    DirectSound {
        sound_offset: u32,
    },
    Variation {
        variation_table_offset: u32,
        // Reserved: interactive-music transitions are not decoded
        _transition_table_offset: u32,
    },
}

impl ComplexCueRecord {
    fn read(cursor: &mut BinaryCursor<'_>, flags: u8) -> Result<Self> {
        if flags & COMPLEX_CUE_DIRECT_SOUND != 0 {
            let sound_offset = cursor.read_u32()?;
            cursor.read_u32()?; // reserved
            Ok(Self::DirectSound { sound_offset })
        } else {
            let variation_table_offset = cursor.read_u32()?;
            let transition_table_offset = cursor.read_u32()?;
            Ok(Self::Variation {
                variation_table_offset,
                _transition_table_offset: transition_table_offset,
            })
        }
    }
}

/// Decode every cue of the bank into a name-keyed map in table order.
pub fn read_cues(
    cursor: &mut BinaryCursor<'_>,
    header: &SoundBankHeader,
    names: &[String],
    resolver: &WaveResolver<'_>,
) -> Result<IndexMap<String, CueDefinition>> {
    let mut cues = IndexMap::with_capacity(header.cue_count());

    cursor.seek(header.simple_cues_offset as usize)?;
    for name in names.iter().take(usize::from(header.num_simple_cues)) {
        let cue = read_simple_cue(cursor, resolver, name)?;
        insert_cue(&mut cues, cue)?;
    }

    cursor.seek(header.complex_cues_offset as usize)?;
    for name in names
        .iter()
        .skip(usize::from(header.num_simple_cues))
        .take(usize::from(header.num_complex_cues))
    {
        let cue = read_complex_cue(cursor, resolver, name)?;
        insert_cue(&mut cues, cue)?;
    }

    tracing::debug!(
        "Decoded {} simple and {} complex cues",
        header.num_simple_cues,
        header.num_complex_cues
    );
    Ok(cues)
}

fn insert_cue(cues: &mut IndexMap<String, CueDefinition>, cue: CueDefinition) -> Result<()> {
    if cues.contains_key(&cue.name) {
        return Err(Error::DuplicateCue(cue.name));
    }
    cues.insert(cue.name.clone(), cue);
    Ok(())
}

fn read_simple_cue(
    cursor: &mut BinaryCursor<'_>,
    resolver: &WaveResolver<'_>,
    name: &str,
) -> Result<CueDefinition> {
    let flags = cursor.read_u8()?;
    let sound_offset = cursor.read_u32()?;
    let record = parse_sound(cursor, resolver, sound_offset)?;

    Ok(CueDefinition {
        name: name.to_string(),
        kind: CueKind::Simple,
        flags,
        category: record.category,
        body: CueBody::Sound(XactSound::Composite(record)),
    })
}

fn read_complex_cue(
    cursor: &mut BinaryCursor<'_>,
    resolver: &WaveResolver<'_>,
    name: &str,
) -> Result<CueDefinition> {
    let flags = cursor.read_u8()?;

    let (category, body) = match ComplexCueRecord::read(cursor, flags)? {
        ComplexCueRecord::DirectSound { sound_offset } => {
            let record = parse_sound(cursor, resolver, sound_offset)?;
            (record.category, CueBody::Sound(XactSound::Composite(record)))
        }
        ComplexCueRecord::Variation {
            variation_table_offset,
            ..
        } => {
            let table = parse_variation_table(cursor, resolver, variation_table_offset)?;
            (table.category(name)?, CueBody::Variation(table))
        }
    };

    // Instance limit: not modelled
    cursor.read_u32()?;
    cursor.read_u8()?;
    cursor.read_u8()?;

    Ok(CueDefinition {
        name: name.to_string(),
        kind: CueKind::Complex,
        flags,
        category,
        body,
    })
}
