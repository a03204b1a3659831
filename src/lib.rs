//! # Enclosure Gen
//!
//! Command-line front end for the acrylic NAS enclosure generator. The
//! geometry lives in `enclosure-panels`; settings files are handled by
//! `enclosure-settings`. This crate wires them to the filesystem.

pub mod cli;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

pub use enclosure_panels::{
    generate, generate_with, Artifact, ConsistencyReport, EnclosureError, Generation,
    OutputOptions, Parameters,
};
pub use enclosure_settings::{OutputSettings, Settings, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File name of the consistency report written next to the panels.
pub const REPORT_FILE_NAME: &str = "consistency.json";

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Writes every artifact into `dir`, creating it if needed. Existing files
/// with the same names are replaced.
pub fn write_artifacts(dir: &Path, artifacts: &[Artifact]) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = dir.join(&artifact.file_name);
        {
            let mut file = File::create(&path)?;
            file.write_all(&artifact.bytes)?;
            file.flush()?;
        }
        debug!(path = %path.display(), bytes = artifact.bytes.len(), "Wrote document");
        written.push(path);
    }
    Ok(written)
}

/// Writes the consistency report as pretty JSON.
pub fn write_report(dir: &Path, report: &ConsistencyReport) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(REPORT_FILE_NAME);
    fs::write(&path, serde_json::to_vec_pretty(report)?)?;
    Ok(path)
}
