//! Runtime side of a `SoundBank`: lazy loading, cues and engine seams

pub mod cue;
pub mod registry;
pub mod soundbank;
pub mod source;
pub mod spatial;

pub use cue::{Cue, CueState};
pub use registry::{
    AudioBackend, AudioEngine, CategoryHandle, CategoryId, CategoryRegistry, PermissiveWaveBanks,
    PlayParams, TrackHandle, VoiceId, WaveBankHandle, WaveBankRegistry,
};
pub use soundbank::{BankState, LoadedBank, SoundBank};
pub use source::{BankSource, FileSource, MemorySource};
pub use spatial::{AudioEmitter, AudioListener};
