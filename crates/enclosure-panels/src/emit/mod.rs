//! Document emitter.
//!
//! Serializes one panel into a vector drawing. The page spans the nominal
//! panel bounds plus a margin wide enough for anything the panel's edges
//! push outward; every coordinate written is checked against that page.

pub mod dxf;
pub mod review;
pub mod svg;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EmissionError, EmissionResult};
use crate::geometry::{Element, Point, Rect, Shape};
use crate::panels::Panel;

pub use svg::SvgDocument;

/// Margin around every panel drawing.
pub const BASE_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Svg,
    Dxf,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Svg => "svg",
            DocumentFormat::Dxf => "dxf",
        }
    }
}

/// Document margin for a panel: wider when tabs or fingers stand proud.
pub fn margin_for(panel: &Panel) -> f64 {
    BASE_MARGIN + panel.protrusion()
}

/// Page rectangle of a panel's document, in panel coordinates.
pub fn page_for(panel: &Panel) -> Rect {
    let margin = margin_for(panel);
    panel.bounds().inflate(margin)
}

/// Points an element writes, used for the page check. Circles contribute
/// their extreme points and text only its anchor.
fn element_points(shape: &Shape) -> Vec<Point> {
    match shape {
        Shape::Path { points, .. } => points.clone(),
        Shape::Rect { rect, .. } => rect.corners().to_vec(),
        Shape::Circle { center, radius } => vec![
            center.translate(-radius, 0.0),
            center.translate(*radius, 0.0),
            center.translate(0.0, -radius),
            center.translate(0.0, *radius),
        ],
        Shape::Text { at, .. } => vec![*at],
    }
}

/// Fails with [`EmissionError::OutOfBounds`] on the first point of `element`
/// lying outside `page`.
pub fn check_bounds(document: &str, page: &Rect, element: &Element) -> EmissionResult<()> {
    for p in element_points(&element.shape) {
        if !p.x.is_finite() || !p.y.is_finite() || !page.contains_point(p) {
            return Err(EmissionError::OutOfBounds {
                document: document.to_string(),
                x: p.x,
                y: p.y,
                min_x: page.x,
                min_y: page.y,
                max_x: page.max_x(),
                max_y: page.max_y(),
            });
        }
    }
    Ok(())
}

/// Renders one panel in the requested format.
pub fn emit_panel(panel: &Panel, format: DocumentFormat) -> EmissionResult<Vec<u8>> {
    debug!(panel = %panel.kind(), format = ?format, "Emitting panel document");
    match format {
        DocumentFormat::Svg => svg::panel_svg(panel).map(String::into_bytes),
        DocumentFormat::Dxf => dxf::panel_dxf(panel),
    }
}

/// File name of a panel's document.
pub fn file_name(panel: &Panel, format: DocumentFormat) -> String {
    format!("{}.{}", panel.kind().file_stem(), format.extension())
}
