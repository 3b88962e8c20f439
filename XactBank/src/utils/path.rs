//! Path utilities

use std::path::{MAIN_SEPARATOR, Path, PathBuf};

/// Rewrite Windows-style `\` separators to the platform separator.
///
/// Bank paths are often authored on Windows and embedded in game data
/// verbatim, so `Content\Audio\Bank.xsb` must still open elsewhere.
pub fn normalize_separators<P: AsRef<Path>>(path: P) -> PathBuf {
    PathBuf::from(path.as_ref().to_string_lossy().replace('\\', &MAIN_SEPARATOR.to_string()))
}
