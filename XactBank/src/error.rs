//! Error types for `XactBank`

use std::sync::Arc;

use thiserror::Error;

/// The error type for `XactBank` operations.
///
/// Errors are `Clone` so that a failed bank load can hand the same failure to
/// every caller that touches the bank afterwards.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error while reading the bank source.
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    // ==================== Stream Errors ====================
    /// The stream ended before a read could complete.
    #[error("truncated stream: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        /// Position the read started at.
        offset: usize,
        /// Number of bytes requested.
        needed: usize,
        /// Number of bytes left in the stream.
        available: usize,
    },

    /// A seek pointed past the end of the stream.
    #[error("offset {offset} is out of range for a {len} byte stream")]
    OutOfRange {
        /// The requested absolute offset.
        offset: usize,
        /// Length of the stream.
        len: usize,
    },

    /// A fixed-width or packed string was not valid UTF-8.
    #[error("invalid UTF-8 string at offset {offset}")]
    InvalidString {
        /// Position of the string field.
        offset: usize,
    },

    // ==================== Header Errors ====================
    /// The stream is not a `SoundBank` (missing SDBK magic).
    #[error("invalid SoundBank magic: expected SDBK, found {0:?}")]
    BadMagic([u8; 4]),

    /// The header checksum does not match the stream contents.
    #[error("checksum mismatch: header says {expected:#06x}, computed {actual:#06x}")]
    ChecksumMismatch {
        /// Checksum stored in the header.
        expected: u16,
        /// Checksum computed over the stream.
        actual: u16,
    },

    // ==================== Table Errors ====================
    /// A wave bank named by the `SoundBank` is not known to the engine.
    #[error("unknown wave bank: {0}")]
    UnknownWaveBank(String),

    /// A sound references a wave bank slot the `SoundBank` does not declare.
    #[error("wave bank index {index} out of range ({count} wave banks)")]
    WaveBankIndexOutOfRange {
        /// The wave bank index found in the record.
        index: u8,
        /// Number of wave banks declared by the header.
        count: usize,
    },

    /// The engine rejected a track reference.
    #[error("unknown track {track} in wave bank {wave_bank}")]
    UnknownTrack {
        /// Name of the wave bank.
        wave_bank: String,
        /// Track index inside the wave bank.
        track: u16,
    },

    /// The cue name table holds fewer names than the header declares cues.
    #[error("cue name table has {found} names, {expected} cues declared")]
    CorruptNameTable {
        /// `numSimpleCues + numComplexCues`.
        expected: usize,
        /// Names actually decoded.
        found: usize,
    },

    /// Two cues decoded to the same name.
    #[error("duplicate cue name: {0}")]
    DuplicateCue(String),

    // ==================== Record Errors ====================
    /// A sound record uses flag bits this decoder does not understand.
    #[error("unsupported sound flags {flags:#04x} at offset {offset}")]
    UnsupportedSoundFlags {
        /// Offset of the sound record.
        offset: u32,
        /// Raw flags byte.
        flags: u8,
    },

    /// A clip contains an event type this decoder does not implement.
    #[error("unsupported clip event type {event_type} at offset {offset}")]
    UnsupportedClipEvent {
        /// Offset of the clip.
        offset: u32,
        /// Event type (low five bits of the event info word).
        event_type: u8,
    },

    /// A variation table uses a table type defined by the format but not implemented.
    #[error("unsupported variation table type {table_type} at offset {offset}")]
    UnsupportedVariationType {
        /// Offset of the variation table.
        offset: u32,
        /// `(variationFlags >> 3) & 0x7`.
        table_type: u8,
    },

    /// The entries of a variation table belong to different categories.
    #[error("cue '{cue}' mixes categories {first} and {other} across its variations")]
    MixedCategoryVariation {
        /// Name of the complex cue.
        cue: String,
        /// Category of the first categorised entry.
        first: u16,
        /// The conflicting category.
        other: u16,
    },

    // ==================== Engine Errors ====================
    /// A cue is bound to a category the engine does not have.
    #[error("unknown audio category {0}")]
    UnknownCategory(u16),

    /// A cue name was looked up that the loaded bank does not contain.
    #[error("unknown cue: {0}")]
    UnknownCue(String),

    /// The bank load was re-entered from the thread already loading it.
    #[error("SoundBank '{0}' was re-entered while loading")]
    ReentrantLoad(String),

    /// The thread loading the bank panicked before the load completed.
    #[error("SoundBank '{0}' panicked while loading")]
    LoadPanicked(String),

    // ==================== Writer Errors ====================
    /// A count, length or offset does not fit the field the format gives it.
    #[error("{field} is {value}, the SoundBank layout allows at most {max}")]
    FieldOverflow {
        /// What was being written.
        field: &'static str,
        /// The value that did not fit.
        value: usize,
        /// Largest value the field can hold.
        max: usize,
    },

    // ==================== Configuration Errors ====================
    /// Load options could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

impl Error {
    /// True for the errors a short or malformed stream produces.
    pub fn is_truncation(&self) -> bool {
        matches!(self, Error::Truncated { .. } | Error::OutOfRange { .. })
    }
}

/// A specialized Result type for `XactBank` operations.
pub type Result<T> = std::result::Result<T, Error>;
