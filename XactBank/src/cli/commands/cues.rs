//! `xactbank cues`

use std::path::Path;

use crate::engine::PermissiveWaveBanks;
use crate::formats::xsb::{CueBody, CueDefinition, SoundBody, XactSound, read_soundbank};

pub fn execute(
    path: &Path,
    filter: Option<&str>,
    detailed: bool,
    config: Option<&Path>,
) -> anyhow::Result<()> {
    let options = super::load_options(config)?;
    let data = read_soundbank(path, &PermissiveWaveBanks::new(), &options)?;
    let filter_lower = filter.map(str::to_lowercase);

    let matches: Vec<&CueDefinition> = data
        .cues
        .values()
        .filter(|cue| {
            filter_lower
                .as_deref()
                .is_none_or(|f| cue.name.to_lowercase().contains(f))
        })
        .collect();

    if matches.is_empty() {
        println!("No cues found");
        return Ok(());
    }

    for cue in &matches {
        println!(
            "{}  [{:?}, category {}] {}",
            cue.name,
            cue.kind,
            cue.category,
            describe_body(&cue.body)
        );
        if detailed {
            for sound in cue.sounds() {
                println!("    {}", describe_sound(sound, &data.wave_banks));
            }
        }
    }

    if matches.len() != data.cues.len() {
        println!("\n{} of {} cues shown", matches.len(), data.cues.len());
    }
    Ok(())
}

fn describe_body(body: &CueBody) -> String {
    match body {
        CueBody::Sound(_) => "single sound".to_string(),
        CueBody::Variation(table) => format!(
            "{:?} variation, {} entries",
            table.table_type,
            table.entries.len()
        ),
    }
}

fn describe_sound(sound: &XactSound, wave_banks: &[crate::formats::xsb::WaveBankRef]) -> String {
    let bank_name = |index: u8| {
        wave_banks
            .get(usize::from(index))
            .map_or("?", |b| b.name.as_str())
            .to_string()
    };

    match sound {
        XactSound::DirectTrack(wave) => {
            format!("track {} in {}", wave.track_index, bank_name(wave.wave_bank_index))
        }
        XactSound::Composite(record) => match &record.body {
            SoundBody::Track(wave) => format!(
                "sound @{:#x}: track {} in {} (volume {}, pitch {})",
                record.offset,
                wave.track_index,
                bank_name(wave.wave_bank_index),
                record.volume,
                record.pitch
            ),
            SoundBody::Clips(clips) => format!(
                "sound @{:#x}: {} clip(s), {} voice(s)",
                record.offset,
                clips.len(),
                record.voices().len()
            ),
        },
    }
}
