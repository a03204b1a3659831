//! Error types for the panel generator.
//!
//! Every failure names the panel, edge or field it concerns. Nothing here is
//! downgraded to a warning: a silently drifted joint produces parts that do not
//! fit together.

use std::io;
use thiserror::Error;

use crate::geometry::Side;
use crate::panels::PanelKind;

/// The dimension set is invalid or structurally impossible.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A length, thickness or pitch that must be strictly positive.
    #[error("Parameter '{name}' must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// A clearance or overhang that must not be negative.
    #[error("Parameter '{name}' must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    /// A value outside its permitted range.
    #[error("Parameter '{name}' out of range: {value} (valid: {min}..{max})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Two or more parameters cannot be satisfied together.
    #[error("Incompatible parameters: {0}")]
    Incompatible(String),
}

/// Degenerate edge, hole or vent parameters found while building geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// An edge or joint span that is zero, negative or not finite.
    #[error("Degenerate edge: length {length}")]
    DegenerateEdge { length: f64 },

    /// A joint pitch that is zero, negative or not finite.
    #[error("Invalid joint pitch {pitch}")]
    InvalidPitch { pitch: f64 },

    /// A negative protrusion or notch depth.
    #[error("Invalid joint depth {depth}")]
    InvalidDepth { depth: f64 },

    /// A partition finer than any cutter could reproduce.
    #[error("Joint over {length} mm at pitch {pitch} needs {count} segments")]
    TooManySegments { length: f64, pitch: f64, count: f64 },

    /// A joint zone that runs past the end of its edge.
    #[error("Joint zone {start}..{end} exceeds edge length {length}")]
    JointOutsideEdge { start: f64, end: f64, length: f64 },

    /// A hole or cutout that does not lie inside the panel.
    #[error("{feature} at ({x:.3}, {y:.3}) does not fit inside the panel")]
    HoleOutsidePanel { feature: String, x: f64, y: f64 },

    /// A vent region too small to hold a single slot.
    #[error("Vent region {width:.3}x{height:.3} cannot hold a {slot_width:.3}x{slot_height:.3} slot")]
    VentRegionTooSmall {
        width: f64,
        height: f64,
        slot_width: f64,
        slot_height: f64,
    },

    /// Adjacent vents closer together than the minimum material bridge.
    #[error("Vent bridge {gap:.3} mm is below the minimum of {min:.3} mm")]
    BridgeTooThin { gap: f64, min: f64 },

    /// A vent opening too close to another cutout or to the panel's edge.
    #[error("{feature} leaves {gap:.3} mm to {other}, below the minimum of {min:.3} mm")]
    CutoutTooClose {
        feature: String,
        other: String,
        gap: f64,
        min: f64,
    },

    /// A vent that crosses the boundary of its region.
    #[error("Vent at ({x:.3}, {y:.3}) leaves its region")]
    VentOutsideRegion { x: f64, y: f64 },

    /// A kerf offset that collapsed or split an outline.
    #[error("Kerf offset of {offset} mm failed: {reason}")]
    Offset { offset: f64, reason: String },
}

/// Assembly of a single panel failed.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{panel}: {source}")]
pub struct PanelError {
    pub panel: PanelKind,
    #[source]
    pub source: GeometryError,
}

impl PanelError {
    pub fn new(panel: PanelKind, source: GeometryError) -> Self {
        Self { panel, source }
    }
}

/// Two mating panels disagree on their shared geometry.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{panel_a} {edge_a} and {panel_b} {edge_b} disagree on {field}: expected {expected}, found {actual}")]
pub struct MismatchError {
    pub panel_a: PanelKind,
    pub edge_a: EdgeLabel,
    pub panel_b: PanelKind,
    pub edge_b: EdgeLabel,
    pub field: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Which part of a panel a mismatch refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeLabel {
    Edge(Side),
    CombSlot,
    RodHoles,
    Panel,
}

impl std::fmt::Display for EdgeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edge(side) => write!(f, "{} edge", side),
            Self::CombSlot => write!(f, "comb slot"),
            Self::RodHoles => write!(f, "rod holes"),
            Self::Panel => write!(f, "panel"),
        }
    }
}

/// Writing a panel into a document failed.
#[derive(Error, Debug)]
pub enum EmissionError {
    /// Geometry lies outside the declared page.
    #[error("{document}: coordinate ({x:.3}, {y:.3}) lies outside the page {min_x:.3}..{max_x:.3} x {min_y:.3}..{max_y:.3}")]
    OutOfBounds {
        document: String,
        x: f64,
        y: f64,
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    /// A part does not fit on an empty sheet, even rotated.
    #[error("{panel} ({width:.1}x{height:.1} mm) does not fit on a {sheet_width:.1}x{sheet_height:.1} mm sheet")]
    PartTooLarge {
        panel: PanelKind,
        width: f64,
        height: f64,
        sheet_width: f64,
        sheet_height: f64,
    },

    /// The DXF writer failed.
    #[error("DXF export error: {0}")]
    Dxf(String),

    /// I/O error while writing a document.
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

/// Any failure of a generation run.
#[derive(Error, Debug)]
pub enum EnclosureError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Geometry error in {panel}: {source}")]
    Geometry {
        panel: PanelKind,
        #[source]
        source: GeometryError,
    },

    #[error("Mismatch: {0}")]
    Mismatch(#[from] MismatchError),

    #[error("Emission error: {0}")]
    Emission(#[from] EmissionError),
}

impl From<PanelError> for EnclosureError {
    fn from(err: PanelError) -> Self {
        Self::Geometry {
            panel: err.panel,
            source: err.source,
        }
    }
}

/// Result type alias for parameter resolution.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Result type alias for geometry construction.
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Result type alias for document output.
pub type EmissionResult<T> = Result<T, EmissionError>;

/// Result type alias for a full generation run.
pub type EnclosureResult<T> = Result<T, EnclosureError>;
