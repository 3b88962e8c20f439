//! Sound records (`XactSound`)
//!
//! Record layout at an absolute offset:
//!
//! ```text
//! flags u8 | category u16 | volume u8 | pitch i16 | priority u8 | entry_length u16
//! flags & COMPLEX == 0:  track_index u16 | wave_bank_index u8
//! flags & COMPLEX != 0:  num_clips u8
//! flags & EXTRA_DATA:    extra_len u16 | extra_len bytes (RPC/DSP presets, skipped)
//! COMPLEX only:          num_clips x (volume u8 | clip_offset u32 | filter u32)
//! ```
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::clip::{Clip, ClipEvent, parse_clip};
use super::wave_banks::WaveResolver;
use crate::engine::{CategoryId, PlayParams, TrackHandle};
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

/// Sound record flag bits
pub mod flags {
    /// Body is a clip list rather than a single track
    pub const COMPLEX: u8 = 0x01;
    /// Any of these announces a length-prefixed RPC/DSP block
    pub const EXTRA_DATA: u8 = 0x1E;
    /// Bits with no known meaning
    pub const UNKNOWN: u8 = 0xE0;
}

/// A resolved `(wave bank, track)` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveRef {
    pub wave_bank_index: u8,
    pub track_index: u16,
    pub track: TrackHandle,
}

impl WaveRef {
    pub fn resolve(resolver: &WaveResolver<'_>, wave_bank_index: u8, track_index: u16) -> Result<Self> {
        Ok(Self {
            wave_bank_index,
            track_index,
            track: resolver.resolve(wave_bank_index, track_index)?,
        })
    }
}

/// A single playable sound reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XactSound {
    /// Built straight from a Wave/`CompactWave` variation entry; no on-disk record
    DirectTrack(WaveRef),
    /// Decoded from a sound record
    Composite(SoundRecord),
}

impl XactSound {
    /// Category of the sound. Direct tracks have none and inherit the cue's.
    #[must_use]
    pub fn category(&self) -> Option<CategoryId> {
        match self {
            XactSound::DirectTrack(_) => None,
            XactSound::Composite(record) => Some(record.category),
        }
    }

    /// Tracks to start, with their voice parameters, when this sound plays
    #[must_use]
    pub fn voices(&self) -> Vec<(TrackHandle, PlayParams)> {
        match self {
            XactSound::DirectTrack(wave) => vec![(wave.track, PlayParams::default())],
            XactSound::Composite(record) => record.voices(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundRecord {
    pub offset: u32,
    pub flags: u8,
    pub category: CategoryId,
    pub volume: u8,
    pub pitch: i16,
    pub priority: u8,
    pub body: SoundBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundBody {
    Track(WaveRef),
    Clips(Vec<Clip>),
}

impl SoundRecord {
    #[must_use]
    pub fn voices(&self) -> Vec<(TrackHandle, PlayParams)> {
        let base = PlayParams {
            volume: self.volume,
            pitch: self.pitch,
            looped: false,
        };
        match &self.body {
            SoundBody::Track(wave) => vec![(wave.track, base)],
            SoundBody::Clips(clips) => clips
                .iter()
                .flat_map(|clip| clip.events.iter())
                .map(|event| match event {
                    ClipEvent::PlayWave { wave, .. } => (
                        wave.track,
                        PlayParams {
                            looped: event.is_looped(),
                            ..base
                        },
                    ),
                })
                .collect(),
        }
    }
}

/// Parse the sound record at `offset` without moving the caller's cursor.
pub fn parse_sound(
    cursor: &mut BinaryCursor<'_>,
    resolver: &WaveResolver<'_>,
    offset: u32,
) -> Result<SoundRecord> {
    cursor.with_seek(offset as usize, |cursor| {
        let record_flags = cursor.read_u8()?;
        if record_flags & flags::UNKNOWN != 0 {
            return Err(Error::UnsupportedSoundFlags {
                offset,
                flags: record_flags,
            });
        }

        let category = CategoryId(cursor.read_u16()?);
        let volume = cursor.read_u8()?;
        let pitch = cursor.read_i16()?;
        let priority = cursor.read_u8()?;
        cursor.read_u16()?; // entry length

        let is_complex = record_flags & flags::COMPLEX != 0;
        let (single_track, num_clips) = if is_complex {
            (None, cursor.read_u8()?)
        } else {
            let track_index = cursor.read_u16()?;
            let wave_bank_index = cursor.read_u8()?;
            (
                Some(WaveRef::resolve(resolver, wave_bank_index, track_index)?),
                0,
            )
        };

        if record_flags & flags::EXTRA_DATA != 0 {
            let extra_len = cursor.read_u16()?;
            cursor.skip(usize::from(extra_len))?;
        }

        let body = match single_track {
            Some(wave) => SoundBody::Track(wave),
            None => {
                let mut clips = Vec::with_capacity(usize::from(num_clips));
                for _ in 0..num_clips {
                    let clip_volume = cursor.read_u8()?;
                    let clip_offset = cursor.read_u32()?;
                    cursor.read_u32()?; // filter
                    clips.push(parse_clip(cursor, resolver, clip_offset, clip_volume)?);
                }
                SoundBody::Clips(clips)
            }
        };

        Ok(SoundRecord {
            offset,
            flags: record_flags,
            category,
            volume,
            pitch,
            priority,
            body,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{PermissiveWaveBanks, WaveBankHandle};
    use crate::formats::xsb::wave_banks::WaveBankRef;
    use crate::formats::xsb::writer::{ClipSpec, SoundSpec, encode_sound_record};
    use pretty_assertions::assert_eq;

    fn banks() -> Vec<WaveBankRef> {
        vec![
            WaveBankRef {
                name: "A".to_string(),
                handle: WaveBankHandle(0),
            },
            WaveBankRef {
                name: "B".to_string(),
                handle: WaveBankHandle(1),
            },
        ]
    }

    /// Place `record` at `offset` inside an otherwise zeroed buffer
    fn place(record: &[u8], offset: usize, total: usize) -> Vec<u8> {
        let mut data = vec![0u8; total];
        data[offset..offset + record.len()].copy_from_slice(record);
        data
    }

    #[test]
    fn test_single_track_record() {
        let spec = SoundSpec::track(4, 1, 9).with_volume(200).with_pitch(-120);
        let data = place(&encode_sound_record(&spec, &[]).unwrap(), 16, 64);

        let banks = banks();
        let registry = PermissiveWaveBanks::new();
        let resolver = WaveResolver::new(&banks, &registry);
        let mut cursor = BinaryCursor::new(&data);
        cursor.seek(3).unwrap();

        let record = parse_sound(&mut cursor, &resolver, 16).unwrap();
        assert_eq!(cursor.position(), 3);
        assert_eq!(record.category, CategoryId(4));
        assert_eq!(record.volume, 200);
        assert_eq!(record.pitch, -120);
        assert_eq!(
            record.body,
            SoundBody::Track(WaveRef {
                wave_bank_index: 1,
                track_index: 9,
                track: TrackHandle {
                    wave_bank: WaveBankHandle(1),
                    track: 9
                },
            })
        );
    }

    #[test]
    fn test_extra_data_is_skipped() {
        let spec = SoundSpec::track(2, 0, 3).with_extra_data(vec![0xAA; 11]);
        let data = place(&encode_sound_record(&spec, &[]).unwrap(), 0, 48);

        let banks = banks();
        let registry = PermissiveWaveBanks::new();
        let resolver = WaveResolver::new(&banks, &registry);
        let record = parse_sound(&mut BinaryCursor::new(&data), &resolver, 0).unwrap();
        assert_eq!(record.flags & flags::EXTRA_DATA, 0x02);
        assert!(matches!(record.body, SoundBody::Track(wave) if wave.track_index == 3));
    }

    #[test]
    fn test_complex_record_with_clips() {
        let spec = SoundSpec::clips(
            7,
            vec![
                ClipSpec::play_wave(0, 1, 0),
                ClipSpec::play_wave(1, 5, 255),
            ],
        );
        // Clips live after the record at fixed offsets
        let clip_offsets = [40u32, 60];
        let record = encode_sound_record(&spec, &clip_offsets).unwrap();
        let mut data = place(&record, 0, 96);
        for (clip, &offset) in spec.clip_specs().iter().zip(&clip_offsets) {
            let encoded = clip.encode().unwrap();
            data[offset as usize..offset as usize + encoded.len()].copy_from_slice(&encoded);
        }

        let banks = banks();
        let registry = PermissiveWaveBanks::new();
        let resolver = WaveResolver::new(&banks, &registry);
        let record = parse_sound(&mut BinaryCursor::new(&data), &resolver, 0).unwrap();

        let SoundBody::Clips(clips) = &record.body else {
            panic!("expected clips, got {:?}", record.body);
        };
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[1].offset, 60);

        let voices = record.voices();
        assert_eq!(voices.len(), 2);
        assert_eq!(voices[0].0.track, 1);
        assert!(!voices[0].1.looped);
        assert_eq!(voices[1].0.wave_bank, WaveBankHandle(1));
        assert!(voices[1].1.looped);
    }

    #[test]
    fn test_unknown_flags_rejected() {
        let data = place(&[0x80, 0, 0, 0, 0, 0, 0, 0, 0], 0, 32);
        let banks = banks();
        let registry = PermissiveWaveBanks::new();
        let resolver = WaveResolver::new(&banks, &registry);
        assert!(matches!(
            parse_sound(&mut BinaryCursor::new(&data), &resolver, 0),
            Err(Error::UnsupportedSoundFlags {
                offset: 0,
                flags: 0x80
            })
        ));
    }

    #[test]
    fn test_unsupported_clip_event() {
        let spec = SoundSpec::clips(1, vec![ClipSpec::play_wave(0, 0, 0)]);
        let mut data = place(&encode_sound_record(&spec, &[32]).unwrap(), 0, 64);
        // One event of type 6 (marker)
        data[32] = 1;
        data[33] = 6;

        let banks = banks();
        let registry = PermissiveWaveBanks::new();
        let resolver = WaveResolver::new(&banks, &registry);
        assert!(matches!(
            parse_sound(&mut BinaryCursor::new(&data), &resolver, 0),
            Err(Error::UnsupportedClipEvent {
                offset: 32,
                event_type: 6
            })
        ));
    }

    #[test]
    fn test_direct_track_has_no_category() {
        let sound = XactSound::DirectTrack(WaveRef {
            wave_bank_index: 0,
            track_index: 0,
            track: TrackHandle {
                wave_bank: WaveBankHandle(0),
                track: 0,
            },
        });
        assert_eq!(sound.category(), None);
        assert_eq!(sound.voices().len(), 1);
    }
}
