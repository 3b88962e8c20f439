//! Load options for `SoundBank` decoding (`xactbank.toml`)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::formats::xsb::EXPECTED_TOOL_VERSION;

fn default_tool_version() -> u16 {
    EXPECTED_TOOL_VERSION
}

/// How strictly a bank is decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Recompute the header FCS-16 and fail on mismatch. Off by default:
    /// the authoring tools do not always keep it current.
    #[serde(default)]
    pub verify_checksum: bool,
    /// Tool version the decoder was written against; others only warn
    #[serde(default = "default_tool_version")]
    pub expected_tool_version: u16,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            verify_checksum: false,
            expected_tool_version: default_tool_version(),
        }
    }
}

impl LoadOptions {
    pub fn from_toml_str(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Self::from_toml_str(&src)
    }

    #[must_use]
    pub fn with_checksum_verification(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_from_empty_toml() {
        let options = LoadOptions::from_toml_str("").unwrap();
        assert_eq!(options, LoadOptions::default());
        assert!(!options.verify_checksum);
        assert_eq!(options.expected_tool_version, 46);
    }

    #[test]
    fn test_parse_overrides() {
        let options =
            LoadOptions::from_toml_str("verify_checksum = true\nexpected_tool_version = 45\n").unwrap();
        assert!(options.verify_checksum);
        assert_eq!(options.expected_tool_version, 45);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            LoadOptions::from_toml_str("verify_checksum = \"yes\""),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let options = LoadOptions::default().with_checksum_verification(true);
        let text = toml::to_string_pretty(&options).unwrap();
        assert_eq!(LoadOptions::from_toml_str(&text).unwrap(), options);
    }
}
