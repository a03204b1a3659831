//! Settings file model.
//!
//! A settings file is TOML or JSON, chosen by extension. Every section is
//! optional; anything missing takes its default.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use enclosure_panels::{Dimensions, DocumentFormat, OutputOptions, Parameters, SheetSpec};

use crate::error::{Result, SettingsError};

/// Directory under the platform config dir holding the settings file.
pub const APP_DIR: &str = "acrylic-enclosure";
pub const FILE_NAME: &str = "settings.toml";

/// Where and in which formats documents are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub format: DocumentFormat,
    /// Also write DXF next to the primary format.
    pub dxf: bool,
    /// Write the single-page review sheet.
    pub review: bool,
    /// Nest the parts onto `sheet`-sized stock.
    pub nest: bool,
    pub sheet: SheetSpec,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("panels"),
            format: DocumentFormat::Svg,
            dxf: false,
            review: true,
            nest: false,
            sheet: SheetSpec::default(),
        }
    }
}

impl OutputSettings {
    pub fn to_options(&self) -> OutputOptions {
        OutputOptions {
            format: self.format,
            dxf: self.dxf,
            review: self.review,
            nest: self.nest.then_some(self.sheet),
        }
    }
}

/// Complete generator settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub parameters: Parameters,
    pub output: OutputSettings,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SettingsError::UnsupportedFormat(format!(
            "{} (expected .toml or .json)",
            path.display()
        ))),
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings file location.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load settings from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)?;
        let settings: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };
        settings.validate()?;
        info!(path = %path.display(), "Loaded settings");
        Ok(settings)
    }

    /// Save settings to file (JSON or TOML), creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Loads `path` when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!(path = %path.display(), "No settings file, using defaults");
            Ok(Self::default())
        }
    }

    /// Checks the parameters resolve to a buildable enclosure.
    pub fn validate(&self) -> Result<Dimensions> {
        Ok(Dimensions::resolve(&self.parameters)?)
    }
}
