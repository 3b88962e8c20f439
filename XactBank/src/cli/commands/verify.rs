//! `xactbank verify`

use std::path::PathBuf;

use crate::engine::PermissiveWaveBanks;
use crate::error::Error;
use crate::formats::xsb::parse_soundbank_bytes;
use crate::config::LoadOptions;

pub fn execute(paths: &[PathBuf]) -> anyhow::Result<()> {
    let options = LoadOptions::default().with_checksum_verification(true);
    let mut failed = 0usize;

    for path in paths {
        let bytes = std::fs::read(path)?;
        match parse_soundbank_bytes(&bytes, &PermissiveWaveBanks::new(), &options) {
            Ok(data) => println!("{}: ok ({} cues)", path.display(), data.cues.len()),
            Err(Error::ChecksumMismatch { expected, actual }) => {
                failed += 1;
                println!(
                    "{}: checksum mismatch (header {expected:#06x}, computed {actual:#06x})",
                    path.display()
                );
            }
            Err(err) => {
                failed += 1;
                println!("{}: {err}", path.display());
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed verification", failed, paths.len());
    }
    Ok(())
}
