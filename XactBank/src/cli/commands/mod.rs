use clap::Subcommand;
use std::path::PathBuf;

pub mod cues;
pub mod execute;
pub mod info;
pub mod synth;
pub mod verify;

#[derive(Subcommand)]
pub enum Commands {
    /// Show header details of a sound bank
    Info {
        /// Sound bank file (.xsb)
        path: PathBuf,

        /// Load options file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the cues of a sound bank
    Cues {
        /// Sound bank file (.xsb)
        path: PathBuf,

        /// Only show cues whose name contains this text (case-insensitive)
        #[arg(short = 'f', long)]
        filter: Option<String>,

        /// Show the sounds behind each cue
        #[arg(short, long)]
        detailed: bool,

        /// Load options file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check the header checksum
    Verify {
        /// Sound bank file(s) (.xsb)
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Write a synthetic sound bank for testing
    Synth {
        /// Output file
        output: PathBuf,

        /// Number of simple cues
        #[arg(long, default_value_t = 8)]
        cues: u16,

        /// Number of complex cues with a wave variation table
        #[arg(long, default_value_t = 0)]
        variations: u16,

        /// Bank name stored in the header
        #[arg(long, default_value = "Synthetic")]
        name: String,

        /// Wave bank the cues reference
        #[arg(long, default_value = "SyntheticWaves")]
        wave_bank: String,
    },
}

/// Load options from `--config`, or the defaults
fn load_options(config: Option<&std::path::Path>) -> anyhow::Result<crate::config::LoadOptions> {
    Ok(match config {
        Some(path) => crate::config::LoadOptions::from_path(path)?,
        None => crate::config::LoadOptions::default(),
    })
}
