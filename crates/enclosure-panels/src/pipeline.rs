//! End-to-end generation: resolve, assemble, check, emit.
//!
//! Panels are assembled and emitted in parallel; the consistency check in
//! between is the only point that needs every panel at once. Any failure
//! stops the run before a single document is produced.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::consistency::{check, ConsistencyReport};
use crate::emit::{emit_panel, file_name, review, DocumentFormat};
use crate::error::{EmissionResult, EnclosureError};
use crate::nesting::{nest, SheetSpec};
use crate::panels::{assemble, Panel, PanelKind};
use crate::params::{Dimensions, Parameters};

/// Which documents a run produces besides one drawing per panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    pub format: DocumentFormat,
    /// Also write a DXF next to each SVG.
    pub dxf: bool,
    pub review: bool,
    /// Nest the parts onto stock sheets of this size.
    pub nest: Option<SheetSpec>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Svg,
            dxf: false,
            review: false,
            nest: None,
        }
    }
}

/// A finished document, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct Generation {
    pub dims: Dimensions,
    pub panels: Vec<Panel>,
    pub report: ConsistencyReport,
    pub artifacts: Vec<Artifact>,
}

/// Builds every panel, failing with the first panel that could not be built
/// after logging all of them.
pub fn assemble_all(dims: &Dimensions) -> Result<Vec<Panel>, EnclosureError> {
    let results: Vec<_> = PanelKind::ALL
        .par_iter()
        .map(|&kind| assemble(kind, dims))
        .collect();

    let mut panels = Vec::with_capacity(results.len());
    let mut first_error = None;
    for result in results {
        match result {
            Ok(panel) => panels.push(panel),
            Err(err) => {
                error!(panel = %err.panel, error = %err.source, "Panel assembly failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }
    }
    match first_error {
        Some(err) => Err(err.into()),
        None => Ok(panels),
    }
}

fn emit_documents(panels: &[Panel], options: &OutputOptions) -> EmissionResult<Vec<Artifact>> {
    let mut formats = vec![options.format];
    if options.dxf && options.format != DocumentFormat::Dxf {
        formats.push(DocumentFormat::Dxf);
    }

    let per_panel: Vec<EmissionResult<Vec<Artifact>>> = panels
        .par_iter()
        .map(|panel| {
            formats
                .iter()
                .map(|&format| {
                    let bytes = emit_panel(panel, format)?;
                    Ok(Artifact::new(file_name(panel, format), bytes))
                })
                .collect()
        })
        .collect();

    let mut artifacts = Vec::new();
    for result in per_panel {
        artifacts.extend(result?);
    }

    if options.review {
        let svg = review::review_svg(panels)?;
        artifacts.push(Artifact::new(review::REVIEW_FILE_NAME, svg.into_bytes()));
    }
    if let Some(spec) = &options.nest {
        for sheet in nest(panels, spec)? {
            artifacts.push(Artifact::new(sheet.file_name(), sheet.to_svg()?.into_bytes()));
        }
    }
    Ok(artifacts)
}

/// Runs the whole pipeline with default output options.
pub fn generate(params: &Parameters) -> Result<Generation, EnclosureError> {
    generate_with(params, &OutputOptions::default())
}

pub fn generate_with(
    params: &Parameters,
    options: &OutputOptions,
) -> Result<Generation, EnclosureError> {
    let dims = Dimensions::resolve(params)?;
    info!(
        exterior_x = dims.exterior_x,
        exterior_y = dims.exterior_y,
        height = dims.z.total_height,
        "Resolved enclosure dimensions"
    );

    let panels = assemble_all(&dims)?;
    info!(count = panels.len(), "Assembled panels");

    let report = check(&panels, &dims).into_result().map_err(|err| {
        error!(error = %err, "Consistency check failed, no documents written");
        err
    })?;
    info!(matings = report.results.len(), "All matings consistent");

    let artifacts = emit_documents(&panels, options)?;
    info!(count = artifacts.len(), "Emitted documents");

    Ok(Generation {
        dims,
        panels,
        report,
        artifacts,
    })
}
