//! Cue runtime: playback state for one decoded cue

use parking_lot::Mutex;
use rand::Rng;

use super::registry::{AudioBackend, CategoryId, VoiceId};
use super::spatial::{AudioEmitter, AudioListener};
use crate::error::Result;
use crate::formats::xsb::{CueBody, CueDefinition, CueKind, XactSound};

/// Playback state of a cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueState {
    /// Decoded, never played
    Prepared,
    Playing { voices: Vec<VoiceId> },
    Stopped,
}

/// A playable cue owned by a loaded [`SoundBank`](super::SoundBank)
#[derive(Debug)]
pub struct Cue {
    definition: CueDefinition,
    state: Mutex<CueState>,
}

impl Cue {
    #[must_use]
    pub fn new(definition: CueDefinition) -> Self {
        Self {
            definition,
            state: Mutex::new(CueState::Prepared),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    #[must_use]
    pub fn kind(&self) -> CueKind {
        self.definition.kind
    }

    #[must_use]
    pub fn category(&self) -> CategoryId {
        self.definition.category
    }

    #[must_use]
    pub fn definition(&self) -> &CueDefinition {
        &self.definition
    }

    #[must_use]
    pub fn state(&self) -> CueState {
        self.state.lock().clone()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(*self.state.lock(), CueState::Playing { .. })
    }

    /// Pick the sound to play. Variation bodies are resolved by weight on
    /// every call.
    pub fn choose_sound<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&XactSound> {
        match &self.definition.body {
            CueBody::Sound(sound) => Some(sound),
            CueBody::Variation(table) => table.choose(rng).map(|entry| &entry.sound),
        }
    }

    /// Start the voices of one sound and return their ids.
    ///
    /// If the backend rejects a voice, the voices already started for this
    /// call are stopped again and the error is returned.
    pub fn play<R: Rng + ?Sized>(&self, backend: &dyn AudioBackend, rng: &mut R) -> Result<Vec<VoiceId>> {
        let Some(sound) = self.choose_sound(rng) else {
            tracing::debug!("Cue '{}' has nothing to play", self.name());
            return Ok(Vec::new());
        };

        let mut started = Vec::new();
        for (track, params) in sound.voices() {
            match backend.play(track, params) {
                Ok(voice) => started.push(voice),
                Err(err) => {
                    for voice in started {
                        backend.stop(voice);
                    }
                    return Err(err);
                }
            }
        }

        let mut state = self.state.lock();
        match &mut *state {
            CueState::Playing { voices } => voices.extend(started.iter().copied()),
            other => {
                *other = CueState::Playing {
                    voices: started.clone(),
                };
            }
        }
        Ok(started)
    }

    /// Like [`Cue::play`], then position every new voice in 3D
    pub fn play_3d<R: Rng + ?Sized>(
        &self,
        backend: &dyn AudioBackend,
        rng: &mut R,
        listener: &AudioListener,
        emitter: &AudioEmitter,
    ) -> Result<Vec<VoiceId>> {
        let voices = self.play(backend, rng)?;
        for &voice in &voices {
            backend.apply_3d(voice, listener, emitter);
        }
        Ok(voices)
    }

    /// Reposition every active voice
    pub fn apply_3d(&self, backend: &dyn AudioBackend, listener: &AudioListener, emitter: &AudioEmitter) {
        if let CueState::Playing { voices } = &*self.state.lock() {
            for &voice in voices {
                backend.apply_3d(voice, listener, emitter);
            }
        }
    }

    pub fn stop(&self, backend: &dyn AudioBackend) {
        let mut state = self.state.lock();
        if let CueState::Playing { voices } = &*state {
            for &voice in voices {
                backend.stop(voice);
            }
            *state = CueState::Stopped;
        }
    }

    /// Drop finished voices. A cue with no voices left becomes `Stopped`.
    pub fn update(&self, backend: &dyn AudioBackend) {
        let mut state = self.state.lock();
        if let CueState::Playing { voices } = &mut *state {
            voices.retain(|&voice| backend.is_playing(voice));
            if voices.is_empty() {
                *state = CueState::Stopped;
            }
        }
    }
}
