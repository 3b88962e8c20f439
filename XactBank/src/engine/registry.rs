//! Engine collaborator seams
//!
//! The `SoundBank` core never owns wave banks, categories or voices. It talks to
//! the surrounding engine through these traits, which keeps decoding testable
//! without a real audio backend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::cue::Cue;
use super::spatial::{AudioEmitter, AudioListener};
use crate::error::Result;

/// Opaque handle to a wave bank owned by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaveBankHandle(pub u32);

/// A playable track: one entry inside one wave bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackHandle {
    pub wave_bank: WaveBankHandle,
    pub track: u16,
}

/// Category index as stored in sound records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryId(pub u16);

impl CategoryId {
    /// Category used by cues whose sounds carry no category of their own
    pub const DEFAULT: CategoryId = CategoryId(0);
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to an engine-owned audio category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CategoryHandle(pub u32);

/// Identifier of a voice started by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoiceId(pub u64);

/// Per-voice parameters taken from the sound record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayParams {
    pub volume: u8,
    pub pitch: i16,
    pub looped: bool,
}

impl Default for PlayParams {
    fn default() -> Self {
        Self {
            volume: u8::MAX,
            pitch: 0,
            looped: false,
        }
    }
}

/// Wave banks loaded by the engine, keyed by name
pub trait WaveBankRegistry {
    fn wave_bank(&self, name: &str) -> Option<WaveBankHandle>;

    /// Validate a track reference. Engines that know their track counts
    /// should return `None` for indices past the end.
    fn track(&self, wave_bank: WaveBankHandle, track: u16) -> Option<TrackHandle> {
        Some(TrackHandle { wave_bank, track })
    }
}

/// Audio categories owned by the engine
///
/// `register_cue` is append-only: the bank hands each cue to its category
/// once, after the whole bank decoded successfully.
pub trait CategoryRegistry {
    fn category(&self, id: CategoryId) -> Option<CategoryHandle>;
    fn register_cue(&self, category: CategoryHandle, cue: Arc<Cue>);
}

/// Native voice playback
pub trait AudioBackend {
    fn play(&self, track: TrackHandle, params: PlayParams) -> Result<VoiceId>;
    fn apply_3d(&self, voice: VoiceId, listener: &AudioListener, emitter: &AudioEmitter);
    fn is_playing(&self, voice: VoiceId) -> bool;
    fn stop(&self, voice: VoiceId);
}

/// Everything a [`SoundBank`](super::SoundBank) needs from its engine
pub trait AudioEngine: WaveBankRegistry + CategoryRegistry + AudioBackend + Send + Sync {}

impl<T> AudioEngine for T where T: WaveBankRegistry + CategoryRegistry + AudioBackend + Send + Sync {}

/// Registry that accepts every wave bank name
///
/// Handles are assigned in first-seen order. Used for inspecting banks
/// without the wave banks they reference.
#[derive(Debug, Default)]
pub struct PermissiveWaveBanks {
    names: Mutex<HashMap<String, WaveBankHandle>>,
}

impl PermissiveWaveBanks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl WaveBankRegistry for PermissiveWaveBanks {
    fn wave_bank(&self, name: &str) -> Option<WaveBankHandle> {
        let mut names = self.names.lock();
        let next = WaveBankHandle(names.len() as u32);
        Some(*names.entry(name.to_string()).or_insert(next))
    }
}
