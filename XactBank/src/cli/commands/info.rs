//! `xactbank info`

use std::path::Path;

use crate::engine::PermissiveWaveBanks;
use crate::formats::xsb::{EXPECTED_TOOL_VERSION, compute_checksum, read_soundbank};

pub fn execute(path: &Path, config: Option<&Path>) -> anyhow::Result<()> {
    let options = super::load_options(config)?;
    let data = read_soundbank(path, &PermissiveWaveBanks::new(), &options)?;
    let header = &data.header;

    println!("{}:", path.display());
    println!("  Name: {}", header.name);
    println!(
        "  Tool version: {}{}",
        header.tool_version,
        if header.tool_version == EXPECTED_TOOL_VERSION {
            ""
        } else {
            " (unexpected)"
        }
    );
    println!("  Format version: {}", header.format_version);
    println!("  Platform: {}", header.platform);
    match header.last_modified() {
        Some(stamp) => println!("  Last modified: {}", stamp.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("  Last modified: (unset)"),
    }

    let bytes = std::fs::read(path)?;
    let actual = compute_checksum(&bytes)?;
    println!(
        "  Checksum: {:#06x} ({})",
        header.checksum,
        if actual == header.checksum { "ok" } else { "mismatch" }
    );

    println!(
        "  Cues: {} ({} simple, {} complex)",
        data.cues.len(),
        header.num_simple_cues,
        header.num_complex_cues
    );
    println!("  Sounds: {}", header.num_sounds);
    println!("  Wave banks: {}", data.wave_banks.len());
    for bank in &data.wave_banks {
        println!("    - {}", bank.name);
    }

    Ok(())
}
