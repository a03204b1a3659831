//! # Enclosure Panels
//!
//! Parametric geometry for a laser-cut acrylic enclosure holding a single
//! board computer, a row of 3.5" drives on comb rails, and a top fan.
//!
//! Data flows one way:
//!
//! 1. [`params`] resolves user parameters into a [`Dimensions`] set
//! 2. [`joints`] lays out finger joints, tabs and slots along an edge
//! 3. [`vents`] fills regions with slot grids and the fan grille
//! 4. [`panels`] assembles each [`Panel`] from edges, holes and vents
//! 5. [`consistency`] checks every mating pair of panels agrees
//! 6. [`emit`] writes SVG or DXF documents; [`nesting`] packs cut sheets
//!
//! [`pipeline::generate`] runs the whole chain.

pub mod consistency;
pub mod emit;
pub mod error;
pub mod geometry;
pub mod joints;
pub mod nesting;
pub mod panels;
pub mod params;
pub mod pipeline;
pub mod vents;

pub use consistency::{check, declared_matings, ConsistencyReport, Mating, MatingResult};
pub use emit::{emit_panel, DocumentFormat, SvgDocument};
pub use error::{
    ConfigurationError, EmissionError, EnclosureError, EnclosureResult, GeometryError,
    MismatchError, PanelError,
};
pub use geometry::{Element, Layer, Point, Rect, Shape, Side};
pub use joints::{EdgeTreatment, JointLayout, JointSpec};
pub use nesting::{nest, Sheet, SheetSpec};
pub use panels::{assemble, Panel, PanelKind, RailPosition};
pub use params::{Dimensions, Parameters};
pub use pipeline::{generate, generate_with, Artifact, Generation, OutputOptions};
