//! Clips inside complex sound records
//!
//! A clip is a small event timeline. Only play-wave events are decoded; the
//! other event kinds (pitch/volume/marker) are rejected so a bank that relies
//! on them fails loudly instead of playing silently wrong.
//!
//! SPDX-FileCopyrightText: 2026 `CyberDeco`, 2006 The Mono.Xna Team (`MonoGame`, MIT)
//!
//! SPDX-License-Identifier: MIT

use super::sound::WaveRef;
use super::wave_banks::WaveResolver;
use crate::error::{Error, Result};
use crate::formats::common::BinaryCursor;

const EVENT_TYPE_MASK: u32 = 0x1F;
const EVENT_PLAY_WAVE: u8 = 1;

/// Loop count meaning "loop forever"
pub const LOOP_INFINITE: u8 = 255;

/// A decoded clip event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipEvent {
    PlayWave {
        /// Start time within the clip, in milliseconds
        time_ms: u32,
        random_offset: u16,
        wave: WaveRef,
        loop_count: u8,
        pan_angle: u16,
        pan_arc: u16,
    },
}

impl ClipEvent {
    #[must_use]
    pub fn is_looped(&self) -> bool {
        match self {
            ClipEvent::PlayWave { loop_count, .. } => *loop_count == LOOP_INFINITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clip {
    pub volume: u8,
    pub offset: u32,
    pub events: Vec<ClipEvent>,
}

/// Parse the clip at `offset` without moving the caller's cursor.
pub fn parse_clip(
    cursor: &mut BinaryCursor<'_>,
    resolver: &WaveResolver<'_>,
    offset: u32,
    volume: u8,
) -> Result<Clip> {
    cursor.with_seek(offset as usize, |cursor| {
        let num_events = cursor.read_u8()?;
        let mut events = Vec::with_capacity(usize::from(num_events));

        for _ in 0..num_events {
            let event_info = cursor.read_u32()?;
            let random_offset = cursor.read_u16()?;
            let event_type = (event_info & EVENT_TYPE_MASK) as u8;
            let time_ms = event_info >> 5;

            match event_type {
                EVENT_PLAY_WAVE => {
                    cursor.read_u8()?; // reserved
                    let track_index = cursor.read_u16()?;
                    let wave_bank_index = cursor.read_u8()?;
                    let loop_count = cursor.read_u8()?;
                    let pan_angle = cursor.read_u16()?;
                    let pan_arc = cursor.read_u16()?;

                    events.push(ClipEvent::PlayWave {
                        time_ms,
                        random_offset,
                        wave: WaveRef::resolve(resolver, wave_bank_index, track_index)?,
                        loop_count,
                        pan_angle,
                        pan_arc,
                    });
                }
                other => {
                    return Err(Error::UnsupportedClipEvent {
                        offset,
                        event_type: other,
                    });
                }
            }
        }

        Ok(Clip {
            volume,
            offset,
            events,
        })
    })
}
