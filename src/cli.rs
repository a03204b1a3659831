//! Command-line interface.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};

use enclosure_panels::{generate_with, DocumentFormat};
use enclosure_settings::Settings;

use crate::{write_artifacts, write_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Svg,
    Dxf,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Svg => DocumentFormat::Svg,
            FormatArg::Dxf => DocumentFormat::Dxf,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "enclosure-gen",
    about = "Generate laser-cut panel drawings for an acrylic NAS enclosure",
    version
)]
pub struct Cli {
    /// Settings file (.toml or .json). Defaults to the user config dir.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory for the generated documents.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Acrylic wall thickness in mm.
    #[arg(long)]
    pub wall: Option<f64>,

    /// Number of drives.
    #[arg(long)]
    pub drives: Option<usize>,

    /// Laser kerf in mm.
    #[arg(long)]
    pub kerf: Option<f64>,

    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Also write DXF documents.
    #[arg(long)]
    pub dxf: bool,

    /// Nest the parts onto stock sheets.
    #[arg(long)]
    pub nest: bool,

    /// Skip the review sheet.
    #[arg(long = "no-review")]
    pub no_review: bool,

    /// Save the effective settings back to the settings file.
    #[arg(long = "save-config")]
    pub save_config: bool,
}

impl Cli {
    /// Applies command-line overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(out) = &self.out {
            settings.output.directory = out.clone();
        }
        if let Some(wall) = self.wall {
            settings.parameters.wall.thickness = wall;
        }
        if let Some(drives) = self.drives {
            settings.parameters.drives.count = drives;
        }
        if let Some(kerf) = self.kerf {
            settings.parameters.wall.kerf = kerf;
        }
        if let Some(format) = self.format {
            settings.output.format = format.into();
        }
        settings.output.dxf |= self.dxf;
        settings.output.nest |= self.nest;
        if self.no_review {
            settings.output.review = false;
        }
    }

    fn settings_path(&self) -> Option<PathBuf> {
        match &self.config {
            Some(path) => Some(path.clone()),
            None => match Settings::default_path() {
                Ok(path) => Some(path),
                Err(err) => {
                    warn!(error = %err, "Falling back to default settings");
                    None
                }
            },
        }
    }

    /// Loads settings, explicitly named files must exist.
    pub fn load_settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match (&self.config, self.settings_path()) {
            (Some(path), _) => Settings::load_from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            (None, Some(path)) => Settings::load_or_default(&path)?,
            (None, None) => Settings::default(),
        };
        self.apply(&mut settings);
        Ok(settings)
    }
}

/// Runs one generation and writes its documents.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = cli.load_settings()?;

    let generation = generate_with(&settings.parameters, &settings.output.to_options())
        .context("generating panels")?;

    let dir = &settings.output.directory;
    let written = write_artifacts(dir, &generation.artifacts)
        .with_context(|| format!("writing documents to {}", dir.display()))?;
    let report = write_report(dir, &generation.report)?;
    info!(
        documents = written.len(),
        report = %report.display(),
        "Generation complete"
    );

    if cli.save_config {
        if let Some(path) = cli.settings_path() {
            settings.save_to_file(&path)?;
            info!(path = %path.display(), "Saved settings");
        }
    }
    Ok(())
}
