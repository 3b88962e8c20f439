//! `xactbank synth`

use std::path::Path;

use crate::formats::xsb::{SoundBankBuilder, VariationSpec};

/// Variation cues get this many entries with equal bands
const ENTRIES_PER_VARIATION: u16 = 3;

pub fn execute(
    output: &Path,
    cues: u16,
    variations: u16,
    name: &str,
    wave_bank: &str,
) -> anyhow::Result<()> {
    let builder = synthesize(cues, variations, name, wave_bank);
    builder.write_to(output)?;

    println!(
        "Wrote {} cue(s) to {} ({} simple, {} with variations)",
        builder.cue_count(),
        output.display(),
        cues,
        variations
    );
    Ok(())
}

/// Simple cues play tracks `0..cues`; variation cues continue after them.
fn synthesize(cues: u16, variations: u16, name: &str, wave_bank: &str) -> SoundBankBuilder {
    let mut builder = SoundBankBuilder::new(name).wave_bank(wave_bank);

    for i in 0..cues {
        builder = builder.simple_cue(&format!("cue_{i:04}"), 0, 0, i);
    }

    let band = 256 / ENTRIES_PER_VARIATION;
    for i in 0..variations {
        let first_track = cues.saturating_add(i.saturating_mul(ENTRIES_PER_VARIATION));
        let entries = (0..ENTRIES_PER_VARIATION)
            .map(|j| {
                let min = (j * band) as u8;
                let max = if j + 1 == ENTRIES_PER_VARIATION {
                    u8::MAX
                } else {
                    ((j + 1) * band - 1) as u8
                };
                (first_track.saturating_add(j), 0, min, max)
            })
            .collect();
        builder = builder.complex_cue_variation(&format!("variation_{i:04}"), VariationSpec::wave(entries));
    }

    builder
}
