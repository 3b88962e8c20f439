//! # XactBank
//!
//! A pure-Rust reader for XACT `SoundBank` (`.xsb`) files.
//!
//! A `SoundBank` maps cue names to the sounds they play. Each cue is either a
//! single sound or a weighted table of variations, and each belongs to one
//! playback category. Audio data lives in separate wave banks that the
//! surrounding engine owns; this crate only resolves references into them.
//!
//! ## Quick Start
//!
//! ### Inspecting a bank
//!
//! ```no_run
//! use xactbank::prelude::*;
//!
//! let data = read_soundbank("Content/Audio/Effects.xsb", &PermissiveWaveBanks::new(), &LoadOptions::default())?;
//! for (name, cue) in &data.cues {
//!     println!("{name}: category {}", cue.category);
//! }
//! # Ok::<(), xactbank::Error>(())
//! ```
//!
//! ### Playing cues through an engine
//!
//! [`SoundBank`](engine::SoundBank) loads lazily on the first cue lookup and
//! talks to the engine through the [`AudioEngine`](engine::AudioEngine) traits:
//!
//! ```ignore
//! let bank = SoundBank::open(r"Content\Audio\Effects.xsb", engine);
//! bank.play_cue("explosion")?;
//! bank.tick();
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `xactbank` command-line binary

pub mod config;
pub mod engine;
pub mod error;
pub mod formats;
pub mod utils;

pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::LoadOptions;
    pub use crate::error::{Error, Result};

    pub use crate::engine::{
        AudioBackend, AudioEmitter, AudioEngine, AudioListener, BankSource, BankState,
        CategoryHandle, CategoryId, CategoryRegistry, Cue, CueState, FileSource, MemorySource,
        PermissiveWaveBanks, PlayParams, SoundBank, TrackHandle, VoiceId, WaveBankHandle,
        WaveBankRegistry,
    };

    pub use crate::formats::xsb::{
        ClipSpec, CueBody, CueDefinition, CueKind, SoundBankBuilder, SoundBankData, SoundBankHeader,
        SoundSpec, VariationSpec, VariationTable, VariationTableType, XactSound, compute_checksum,
        parse_soundbank_bytes, read_soundbank,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
