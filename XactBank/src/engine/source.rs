//! Where `SoundBank` bytes come from

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::normalize_separators;

/// A readable `SoundBank` stream
///
/// The bank only reads its source once, on first use.
pub trait BankSource: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Read the whole stream
    ///
    /// # Errors
    /// Returns an error if the stream cannot be read.
    fn read_all(&self) -> Result<Vec<u8>>;
}

/// A `SoundBank` file on disk. Paths authored with `\` separators are accepted.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = normalize_separators(path.as_ref());
        let name = path.display().to_string();
        Self { path, name }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BankSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// An in-memory bank, mostly for tools and tests
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    bytes: Vec<u8>,
}

impl MemorySource {
    #[must_use]
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            bytes,
        }
    }
}

impl BankSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_all(&self) -> Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }
}
