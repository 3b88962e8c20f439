//! Command execution implementations

use super::Commands;
use super::{cues, info, synth, verify};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { path, config } => info::execute(path, config.as_deref()),
            Commands::Cues {
                path,
                filter,
                detailed,
                config,
            } => cues::execute(path, filter.as_deref(), *detailed, config.as_deref()),
            Commands::Verify { paths } => verify::execute(paths),
            Commands::Synth {
                output,
                cues,
                variations,
                name,
                wave_bank,
            } => synth::execute(output, *cues, *variations, name, wave_bank),
        }
    }
}
