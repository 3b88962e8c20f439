//! `SoundBank` writing
//!
//! Builds well-formed SDBK containers from a declarative description. The
//! layout is header, wave bank names, cue names, simple cue records, complex
//! cue records, variation tables, then each sound record followed by its clips.
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use super::clip::LOOP_INFINITE;
use super::cues::COMPLEX_CUE_DIRECT_SOUND;
use super::sound::flags;
use super::variation::VariationTableType;
use super::{
    BANK_NAME_SIZE, CHECKSUM_COVERAGE_START, CHECKSUM_OFFSET, EXPECTED_TOOL_VERSION, HEADER_SIZE,
    SDBK_MAGIC,
};
use crate::error::{Error, Result};
use crate::utils::fcs16;

const FORMAT_VERSION: u16 = 43;
const PLATFORM_WINDOWS: u8 = 1;
const ABSENT_OFFSET: u32 = u32::MAX;

const SIMPLE_CUE_SIZE: usize = 5;
const COMPLEX_CUE_SIZE: usize = 15;
const VARIATION_HEADER_SIZE: usize = 8;
const SOUND_FIXED_SIZE: usize = 9;
const CLIP_ENTRY_SIZE: usize = 9;
const PLAY_WAVE_EVENT_SIZE: usize = 15;
const CLIP_SIZE: usize = 1 + PLAY_WAVE_EVENT_SIZE;

fn overflow(field: &'static str, value: usize, max: usize) -> Error {
    Error::FieldOverflow { field, value, max }
}

fn fit_u8(field: &'static str, value: usize) -> Result<u8> {
    u8::try_from(value).map_err(|_| overflow(field, value, usize::from(u8::MAX)))
}

fn fit_u16(field: &'static str, value: usize) -> Result<u16> {
    u16::try_from(value).map_err(|_| overflow(field, value, usize::from(u16::MAX)))
}

fn fit_u32(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| overflow(field, value, u32::MAX as usize))
}

/// NUL-padded name field. The name must leave room for its terminator.
fn write_bank_name<W: Write>(writer: &mut W, field: &'static str, name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.len() >= BANK_NAME_SIZE {
        return Err(overflow(field, bytes.len(), BANK_NAME_SIZE - 1));
    }
    writer.write_all(bytes)?;
    writer.write_all(&[0u8; BANK_NAME_SIZE][bytes.len()..])?;
    Ok(())
}

/// A play-wave clip (one event)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSpec {
    pub volume: u8,
    pub wave_bank_index: u8,
    pub track_index: u16,
    pub loop_count: u8,
}

impl ClipSpec {
    #[must_use]
    pub fn play_wave(wave_bank_index: u8, track_index: u16, loop_count: u8) -> Self {
        Self {
            volume: u8::MAX,
            wave_bank_index,
            track_index,
            loop_count,
        }
    }

    #[must_use]
    pub fn looped(wave_bank_index: u8, track_index: u16) -> Self {
        Self::play_wave(wave_bank_index, track_index, LOOP_INFINITE)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(CLIP_SIZE);
        out.write_u8(1)?; // one event
        out.write_u32::<LittleEndian>(1)?; // play wave at t=0
        out.write_u16::<LittleEndian>(0)?; // random offset
        out.write_u8(0)?;
        out.write_u16::<LittleEndian>(self.track_index)?;
        out.write_u8(self.wave_bank_index)?;
        out.write_u8(self.loop_count)?;
        out.write_u16::<LittleEndian>(0)?; // pan angle
        out.write_u16::<LittleEndian>(0)?; // pan arc
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SoundSpecBody {
    Track { wave_bank_index: u8, track_index: u16 },
    Clips(Vec<ClipSpec>),
}

/// Description of one sound record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSpec {
    pub category: u16,
    pub volume: u8,
    pub pitch: i16,
    pub priority: u8,
    extra_data: Vec<u8>,
    body: SoundSpecBody,
}

impl SoundSpec {
    #[must_use]
    pub fn track(category: u16, wave_bank_index: u8, track_index: u16) -> Self {
        Self {
            category,
            volume: u8::MAX,
            pitch: 0,
            priority: 0,
            extra_data: Vec::new(),
            body: SoundSpecBody::Track {
                wave_bank_index,
                track_index,
            },
        }
    }

    #[must_use]
    pub fn clips(category: u16, clips: Vec<ClipSpec>) -> Self {
        Self {
            body: SoundSpecBody::Clips(clips),
            ..Self::track(category, 0, 0)
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: u8) -> Self {
        self.volume = volume;
        self
    }

    #[must_use]
    pub fn with_pitch(mut self, pitch: i16) -> Self {
        self.pitch = pitch;
        self
    }

    /// Attach an opaque RPC/DSP block (sets the first extra-data flag bit)
    #[must_use]
    pub fn with_extra_data(mut self, data: Vec<u8>) -> Self {
        self.extra_data = data;
        self
    }

    #[must_use]
    pub fn clip_specs(&self) -> &[ClipSpec] {
        match &self.body {
            SoundSpecBody::Track { .. } => &[],
            SoundSpecBody::Clips(clips) => clips,
        }
    }

    fn flags(&self) -> u8 {
        let mut value = 0;
        if matches!(self.body, SoundSpecBody::Clips(_)) {
            value |= flags::COMPLEX;
        }
        if !self.extra_data.is_empty() {
            value |= 0x02;
        }
        value
    }

    fn record_len(&self) -> usize {
        let body = match &self.body {
            SoundSpecBody::Track { .. } => 3,
            SoundSpecBody::Clips(clips) => 1 + CLIP_ENTRY_SIZE * clips.len(),
        };
        let extra = if self.extra_data.is_empty() {
            0
        } else {
            2 + self.extra_data.len()
        };
        SOUND_FIXED_SIZE + body + extra
    }

    /// Record plus the clips written right after it
    fn block_len(&self) -> usize {
        self.record_len() + CLIP_SIZE * self.clip_specs().len()
    }

    /// Record followed by its clips, for a record placed at `offset`
    fn encode_block(&self, offset: usize) -> Result<Vec<u8>> {
        let mut clip_offsets = Vec::with_capacity(self.clip_specs().len());
        let mut next = offset + self.record_len();
        for _ in self.clip_specs() {
            clip_offsets.push(fit_u32("clip offset", next)?);
            next += CLIP_SIZE;
        }

        let mut out = encode_sound_record(self, &clip_offsets)?;
        for clip in self.clip_specs() {
            out.extend(clip.encode()?);
        }
        Ok(out)
    }
}

/// Encode a sound record. `clip_offsets` gives the absolute offset of each clip.
pub fn encode_sound_record(spec: &SoundSpec, clip_offsets: &[u32]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(spec.record_len());
    out.write_u8(spec.flags())?;
    out.write_u16::<LittleEndian>(spec.category)?;
    out.write_u8(spec.volume)?;
    out.write_i16::<LittleEndian>(spec.pitch)?;
    out.write_u8(spec.priority)?;
    out.write_u16::<LittleEndian>(fit_u16("sound record length", spec.record_len())?)?;

    match &spec.body {
        SoundSpecBody::Track {
            wave_bank_index,
            track_index,
        } => {
            out.write_u16::<LittleEndian>(*track_index)?;
            out.write_u8(*wave_bank_index)?;
        }
        SoundSpecBody::Clips(clips) => out.write_u8(fit_u8("clip count", clips.len())?)?,
    }

    if !spec.extra_data.is_empty() {
        out.write_u16::<LittleEndian>(fit_u16("extra data length", spec.extra_data.len())?)?;
        out.write_all(&spec.extra_data)?;
    }

    for (clip, &clip_offset) in spec.clip_specs().iter().zip(clip_offsets) {
        out.write_u8(clip.volume)?;
        out.write_u32::<LittleEndian>(clip_offset)?;
        out.write_u32::<LittleEndian>(0)?; // filter
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum VariationEntries {
    Wave(Vec<(u16, u8, u8, u8)>),
    Sound(Vec<(SoundSpec, u8, u8)>),
    CompactWave(Vec<(u16, u8)>),
}

/// Description of one variation table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationSpec {
    entries: VariationEntries,
}

impl VariationSpec {
    /// Entries of `(track_index, wave_bank_index, weight_min, weight_max)`
    #[must_use]
    pub fn wave(entries: Vec<(u16, u8, u8, u8)>) -> Self {
        Self {
            entries: VariationEntries::Wave(entries),
        }
    }

    /// Entries of `(sound, weight_min, weight_max)`
    #[must_use]
    pub fn sound(entries: Vec<(SoundSpec, u8, u8)>) -> Self {
        Self {
            entries: VariationEntries::Sound(entries),
        }
    }

    /// Entries of `(track_index, wave_bank_index)`
    #[must_use]
    pub fn compact_wave(entries: Vec<(u16, u8)>) -> Self {
        Self {
            entries: VariationEntries::CompactWave(entries),
        }
    }

    #[must_use]
    pub fn table_type(&self) -> VariationTableType {
        match self.entries {
            VariationEntries::Wave(_) => VariationTableType::Wave,
            VariationEntries::Sound(_) => VariationTableType::Sound,
            VariationEntries::CompactWave(_) => VariationTableType::CompactWave,
        }
    }

    #[must_use]
    pub fn sound_entries(&self) -> &[(SoundSpec, u8, u8)] {
        match &self.entries {
            VariationEntries::Sound(entries) => entries,
            _ => &[],
        }
    }

    fn len(&self) -> usize {
        match &self.entries {
            VariationEntries::Wave(e) => e.len(),
            VariationEntries::Sound(e) => e.len(),
            VariationEntries::CompactWave(e) => e.len(),
        }
    }

    fn encoded_len(&self) -> usize {
        let entry_size = match self.entries {
            VariationEntries::Wave(_) => 5,
            VariationEntries::Sound(_) => 6,
            VariationEntries::CompactWave(_) => 3,
        };
        VARIATION_HEADER_SIZE + entry_size * self.len()
    }

    /// Encode the table. `sound_offsets` gives the record offset of each
    /// Sound entry and is ignored for the other table types.
    pub fn encode(&self, sound_offsets: &[u32]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.write_u16::<LittleEndian>(fit_u16("variation entry count", self.len())?)?;
        out.write_u16::<LittleEndian>(u16::from(self.table_type().tag()) << 3)?;
        out.write_u8(0)?;
        out.write_u16::<LittleEndian>(0)?;
        out.write_u8(0)?;

        match &self.entries {
            VariationEntries::Wave(entries) => {
                for &(track_index, wave_bank_index, weight_min, weight_max) in entries {
                    out.write_u16::<LittleEndian>(track_index)?;
                    out.write_u8(wave_bank_index)?;
                    out.write_u8(weight_min)?;
                    out.write_u8(weight_max)?;
                }
            }
            VariationEntries::Sound(entries) => {
                for ((_, weight_min, weight_max), &offset) in entries.iter().zip(sound_offsets) {
                    out.write_u32::<LittleEndian>(offset)?;
                    out.write_u8(*weight_min)?;
                    out.write_u8(*weight_max)?;
                }
            }
            VariationEntries::CompactWave(entries) => {
                for &(track_index, wave_bank_index) in entries {
                    out.write_u16::<LittleEndian>(track_index)?;
                    out.write_u8(wave_bank_index)?;
                }
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Clone)]
enum ComplexCueSpec {
    Sound(SoundSpec),
    Variation(VariationSpec),
}

/// Declarative `SoundBank` builder
#[derive(Debug, Clone)]
pub struct SoundBankBuilder {
    name: String,
    tool_version: u16,
    last_modified: u64,
    wave_banks: Vec<String>,
    simple_cues: Vec<(String, SoundSpec)>,
    complex_cues: Vec<(String, ComplexCueSpec)>,
}

impl SoundBankBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tool_version: EXPECTED_TOOL_VERSION,
            last_modified: 0,
            wave_banks: Vec::new(),
            simple_cues: Vec::new(),
            complex_cues: Vec::new(),
        }
    }

    #[must_use]
    pub fn tool_version(mut self, version: u16) -> Self {
        self.tool_version = version;
        self
    }

    /// Last-modified stamp as a FILETIME
    #[must_use]
    pub fn last_modified(mut self, filetime: u64) -> Self {
        self.last_modified = filetime;
        self
    }

    #[must_use]
    pub fn wave_bank(mut self, name: &str) -> Self {
        self.wave_banks.push(name.to_string());
        self
    }

    /// Simple cue playing one track
    #[must_use]
    pub fn simple_cue(self, name: &str, category: u16, wave_bank_index: u8, track_index: u16) -> Self {
        self.simple_cue_sound(name, SoundSpec::track(category, wave_bank_index, track_index))
    }

    #[must_use]
    pub fn simple_cue_sound(mut self, name: &str, sound: SoundSpec) -> Self {
        self.simple_cues.push((name.to_string(), sound));
        self
    }

    /// Complex cue in its direct-sound shape
    #[must_use]
    pub fn complex_cue_sound(mut self, name: &str, sound: SoundSpec) -> Self {
        self.complex_cues
            .push((name.to_string(), ComplexCueSpec::Sound(sound)));
        self
    }

    #[must_use]
    pub fn complex_cue_variation(mut self, name: &str, table: VariationSpec) -> Self {
        self.complex_cues
            .push((name.to_string(), ComplexCueSpec::Variation(table)));
        self
    }

    #[must_use]
    pub fn cue_count(&self) -> usize {
        self.simple_cues.len() + self.complex_cues.len()
    }

    /// Serialize the bank, including a valid FCS-16 checksum.
    ///
    /// Fails with [`Error::FieldOverflow`] when a count, name or offset does
    /// not fit its header field.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; HEADER_SIZE];

        let wave_bank_table_offset = out.len();
        for name in &self.wave_banks {
            write_bank_name(&mut out, "wave bank name length", name)?;
        }

        let cue_names_offset = out.len();
        for name in self.cue_names() {
            out.write_all(name.as_bytes())?;
            out.write_u8(0)?;
        }
        let cue_name_table_len = out.len() - cue_names_offset;

        // Lay out everything after the names before writing any record
        let simple_cues_offset = out.len();
        let complex_cues_offset = simple_cues_offset + SIMPLE_CUE_SIZE * self.simple_cues.len();
        let variation_tables_offset = complex_cues_offset + COMPLEX_CUE_SIZE * self.complex_cues.len();

        let mut next = variation_tables_offset;
        let mut table_offsets = Vec::new();
        for (_, cue) in &self.complex_cues {
            if let ComplexCueSpec::Variation(table) = cue {
                table_offsets.push(fit_u32("variation table offset", next)?);
                next += table.encoded_len();
            }
        }

        let sounds_offset = next;
        let mut sounds: Vec<(&SoundSpec, usize)> = Vec::new();
        let mut simple_sound_offsets = Vec::with_capacity(self.simple_cues.len());
        for (_, sound) in &self.simple_cues {
            let offset = place(sound, &mut next);
            sounds.push((sound, offset));
            simple_sound_offsets.push(fit_u32("sound offset", offset)?);
        }
        let mut complex_sound_offsets: Vec<Vec<u32>> = Vec::with_capacity(self.complex_cues.len());
        for (_, cue) in &self.complex_cues {
            let placed: Vec<(&SoundSpec, usize)> = match cue {
                ComplexCueSpec::Sound(sound) => vec![(sound, place(sound, &mut next))],
                ComplexCueSpec::Variation(table) => table
                    .sound_entries()
                    .iter()
                    .map(|(sound, _, _)| (sound, place(sound, &mut next)))
                    .collect(),
            };
            let mut offsets = Vec::with_capacity(placed.len());
            for (sound, offset) in placed {
                sounds.push((sound, offset));
                offsets.push(fit_u32("sound offset", offset)?);
            }
            complex_sound_offsets.push(offsets);
        }

        for &offset in &simple_sound_offsets {
            out.write_u8(0)?;
            out.write_u32::<LittleEndian>(offset)?;
        }

        let mut tables = table_offsets.iter();
        for ((_, cue), offsets) in self.complex_cues.iter().zip(&complex_sound_offsets) {
            match cue {
                ComplexCueSpec::Sound(_) => {
                    out.write_u8(COMPLEX_CUE_DIRECT_SOUND)?;
                    out.write_u32::<LittleEndian>(offsets.first().copied().unwrap_or(ABSENT_OFFSET))?;
                    out.write_u32::<LittleEndian>(0)?;
                }
                ComplexCueSpec::Variation(_) => {
                    out.write_u8(0)?;
                    out.write_u32::<LittleEndian>(tables.next().copied().unwrap_or(ABSENT_OFFSET))?;
                    out.write_u32::<LittleEndian>(ABSENT_OFFSET)?; // transition table
                }
            }
            // Instance limit
            out.write_u32::<LittleEndian>(0)?;
            out.write_u8(0)?;
            out.write_u8(0)?;
        }

        for ((_, cue), offsets) in self.complex_cues.iter().zip(&complex_sound_offsets) {
            if let ComplexCueSpec::Variation(table) = cue {
                out.extend(table.encode(offsets)?);
            }
        }

        debug_assert_eq!(out.len(), sounds_offset);
        for (sound, offset) in &sounds {
            debug_assert_eq!(out.len(), *offset);
            out.extend(sound.encode_block(*offset)?);
        }

        let header = self.encode_header(&HeaderLayout {
            num_sounds: sounds.len(),
            cue_name_table_len,
            simple_cues_offset,
            complex_cues_offset,
            cue_names_offset,
            variation_tables_offset,
            wave_bank_table_offset,
            sounds_offset,
        })?;
        out[..HEADER_SIZE].copy_from_slice(&header);

        let checksum = fcs16(&out[CHECKSUM_COVERAGE_START..]);
        LittleEndian::write_u16(&mut out[CHECKSUM_OFFSET..CHECKSUM_OFFSET + 2], checksum);
        Ok(out)
    }

    /// Write the bank to disk
    ///
    /// # Errors
    /// Returns an error if the bank does not fit the format or file writing fails.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.build()?;
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    fn cue_names(&self) -> impl Iterator<Item = &str> {
        self.simple_cues
            .iter()
            .map(|(name, _)| name.as_str())
            .chain(self.complex_cues.iter().map(|(name, _)| name.as_str()))
    }

    fn encode_header(&self, layout: &HeaderLayout) -> Result<Vec<u8>> {
        let mut header = Vec::with_capacity(HEADER_SIZE);
        header.write_all(&SDBK_MAGIC)?;
        header.write_u16::<LittleEndian>(self.tool_version)?;
        header.write_u16::<LittleEndian>(FORMAT_VERSION)?;
        header.write_u16::<LittleEndian>(0)?; // checksum, patched once the body is final
        header.write_u64::<LittleEndian>(self.last_modified)?;
        header.write_u8(PLATFORM_WINDOWS)?;

        header.write_u16::<LittleEndian>(fit_u16("simple cue count", self.simple_cues.len())?)?;
        header.write_u16::<LittleEndian>(fit_u16("complex cue count", self.complex_cues.len())?)?;
        header.write_u16::<LittleEndian>(0)?;
        header.write_u16::<LittleEndian>(fit_u16("cue count", self.cue_count())?)?;
        header.write_u8(fit_u8("wave bank count", self.wave_banks.len())?)?;
        header.write_u16::<LittleEndian>(fit_u16("sound count", layout.num_sounds)?)?;
        header.write_u16::<LittleEndian>(fit_u16("cue name table length", layout.cue_name_table_len)?)?;
        header.write_u16::<LittleEndian>(0)?;

        for offset in [
            Some(layout.simple_cues_offset),
            Some(layout.complex_cues_offset),
            Some(layout.cue_names_offset),
            None,
            Some(layout.variation_tables_offset),
            None,
            Some(layout.wave_bank_table_offset),
            None, // cue name hash table
            None, // cue name hash values
            Some(layout.sounds_offset),
        ] {
            let value = match offset {
                Some(offset) => fit_u32("table offset", offset)?,
                None => ABSENT_OFFSET,
            };
            header.write_u32::<LittleEndian>(value)?;
        }
        write_bank_name(&mut header, "bank name length", &self.name)?;

        debug_assert_eq!(header.len(), HEADER_SIZE);
        Ok(header)
    }
}

/// Reserve room for `sound` at `*next` and return its offset
fn place(sound: &SoundSpec, next: &mut usize) -> usize {
    let offset = *next;
    *next += sound.block_len();
    offset
}

struct HeaderLayout {
    num_sounds: usize,
    cue_name_table_len: usize,
    simple_cues_offset: usize,
    complex_cues_offset: usize,
    cue_names_offset: usize,
    variation_tables_offset: usize,
    wave_bank_table_offset: usize,
    sounds_offset: usize,
}
