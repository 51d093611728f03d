//! CLI subcommands.

pub mod receipt;
pub mod statement;

use std::fs;
use std::path::{Path, PathBuf};

use billfold_core::ExtractConfig;

/// Output rendering for both subcommands.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Load the extraction config from `--config`, or use defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ExtractConfig> {
    match config_path {
        Some(path) => Ok(ExtractConfig::from_file(Path::new(path))?),
        None => Ok(ExtractConfig::default()),
    }
}

/// Write to the output path, or stdout when none was given.
pub fn write_output(output: Option<&PathBuf>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, rendered)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
