//! Panel assembler.
//!
//! One builder per [`PanelKind`], dispatched through [`assemble`]. Builders
//! read the resolved [`Dimensions`], take their jointed edges from
//! [`scheme`], and hand everything to a [`PanelBuilder`] which traces the
//! outline, punches through-slots and checks every cutout fits.

pub mod comb_rail;
pub mod fan_bracket;
pub mod horizontal;
pub mod outline;
pub mod scheme;
pub mod side;
pub mod wall;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeometryError, GeometryResult, PanelError};
use crate::geometry::{Element, Frame, Point, Rect, Shape, Side, EPSILON};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;

/// Font size for panel labels on the score layer.
pub const LABEL_SIZE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RailPosition {
    Front,
    Rear,
}

impl RailPosition {
    pub fn index(self) -> usize {
        match self {
            RailPosition::Front => 0,
            RailPosition::Rear => 1,
        }
    }
}

/// The closed set of panels making up the enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelKind {
    Bottom,
    Top,
    Front,
    Back,
    LeftSide,
    RightSide,
    CombRail(RailPosition),
    FanBracket,
}

impl PanelKind {
    pub const ALL: [PanelKind; 9] = [
        PanelKind::Bottom,
        PanelKind::Top,
        PanelKind::Front,
        PanelKind::Back,
        PanelKind::LeftSide,
        PanelKind::RightSide,
        PanelKind::CombRail(RailPosition::Front),
        PanelKind::CombRail(RailPosition::Rear),
        PanelKind::FanBracket,
    ];

    /// Output file name without extension, numbered in assembly order.
    pub fn file_stem(self) -> &'static str {
        match self {
            PanelKind::Bottom => "01_bottom_panel",
            PanelKind::Top => "02_top_panel",
            PanelKind::Front => "03_front_panel",
            PanelKind::Back => "04_back_panel",
            PanelKind::LeftSide => "05_left_side_panel",
            PanelKind::RightSide => "06_right_side_panel",
            PanelKind::CombRail(RailPosition::Front) => "07_front_comb_rail",
            PanelKind::CombRail(RailPosition::Rear) => "08_rear_comb_rail",
            PanelKind::FanBracket => "09_fan_bracket",
        }
    }

    /// Short engraved label.
    pub fn label(self) -> &'static str {
        match self {
            PanelKind::Bottom => "BOTTOM",
            PanelKind::Top => "TOP",
            PanelKind::Front => "FRONT",
            PanelKind::Back => "BACK",
            PanelKind::LeftSide => "LEFT SIDE",
            PanelKind::RightSide => "RIGHT SIDE",
            PanelKind::CombRail(RailPosition::Front) => "COMB RAIL (FRONT)",
            PanelKind::CombRail(RailPosition::Rear) => "COMB RAIL (REAR)",
            PanelKind::FanBracket => "FAN BRACKET",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelKind::Bottom => write!(f, "bottom panel"),
            PanelKind::Top => write!(f, "top panel"),
            PanelKind::Front => write!(f, "front panel"),
            PanelKind::Back => write!(f, "back panel"),
            PanelKind::LeftSide => write!(f, "left side panel"),
            PanelKind::RightSide => write!(f, "right side panel"),
            PanelKind::CombRail(RailPosition::Front) => write!(f, "front comb rail"),
            PanelKind::CombRail(RailPosition::Rear) => write!(f, "rear comb rail"),
            PanelKind::FanBracket => write!(f, "fan bracket"),
        }
    }
}

/// What a cutout is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CutoutRole {
    Rod,
    /// Through-slot row along the given edge.
    EdgeSlot(Side),
    CombSlot(RailPosition),
    Vent,
    Grille,
    FanOpening,
    FanScrew,
    BoardMount,
    SdAccess,
    Port(&'static str),
    PowerJack,
    DriveScrew,
}

impl CutoutRole {
    /// Ventilation openings, which must leave a material bridge to
    /// everything else cut into the panel.
    pub fn is_vent(self) -> bool {
        matches!(self, CutoutRole::Vent | CutoutRole::Grille)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cutout {
    pub role: CutoutRole,
    pub shape: Shape,
    /// Distance from the nearest panel edge used to place it, where relevant.
    pub inset: Option<f64>,
}

impl Cutout {
    pub fn center(&self) -> Option<Point> {
        self.shape.extent().map(|r| r.center())
    }
}

/// Comb rail specifics needed downstream.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombLayout {
    pub position: RailPosition,
    /// Enclosure Y of the rail's mid-plane.
    pub center_y: f64,
    pub thickness: f64,
    pub tooth_pitch: f64,
    pub tooth_width: f64,
    pub teeth: Vec<Rect>,
    pub screw_holes_per_tooth: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PanelDetail {
    Plain,
    Comb(CombLayout),
}

/// A fully assembled, immutable panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    kind: PanelKind,
    width: f64,
    height: f64,
    thickness: f64,
    frame: Frame,
    edges: [EdgeTreatment; 4],
    outline: Vec<Point>,
    cutouts: Vec<Cutout>,
    annotations: Vec<Element>,
    detail: PanelDetail,
    kerf: f64,
}

impl Panel {
    pub fn kind(&self) -> PanelKind {
        self.kind
    }

    /// Nominal bounding box, excluding anything protruding past the edges.
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Stock thickness the panel is cut from.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Kerf already applied to the outline and cutouts.
    pub fn kerf(&self) -> f64 {
        self.kerf
    }

    pub fn edge(&self, side: Side) -> &EdgeTreatment {
        &self.edges[side.index()]
    }

    pub fn edges(&self) -> &[EdgeTreatment; 4] {
        &self.edges
    }

    /// Length of the nominal edge on the given side.
    pub fn edge_length(&self, side: Side) -> f64 {
        if side.is_horizontal() {
            self.width
        } else {
            self.height
        }
    }

    pub fn outline(&self) -> &[Point] {
        &self.outline
    }

    pub fn cutouts(&self) -> &[Cutout] {
        &self.cutouts
    }

    pub fn cutouts_by(&self, role: CutoutRole) -> impl Iterator<Item = &Cutout> {
        self.cutouts.iter().filter(move |c| c.role == role)
    }

    pub fn annotations(&self) -> &[Element] {
        &self.annotations
    }

    pub fn detail(&self) -> &PanelDetail {
        &self.detail
    }

    pub fn comb(&self) -> Option<&CombLayout> {
        match &self.detail {
            PanelDetail::Comb(comb) => Some(comb),
            PanelDetail::Plain => None,
        }
    }

    /// Deepest protrusion past the nominal bounds.
    pub fn protrusion(&self) -> f64 {
        self.edges
            .iter()
            .map(EdgeTreatment::protrusion)
            .fold(0.0, f64::max)
    }

    /// Every drawn element: outline and cutouts on the cut layer, then the
    /// annotations.
    pub fn elements(&self) -> Vec<Element> {
        let mut elements = Vec::with_capacity(1 + self.cutouts.len() + self.annotations.len());
        elements.push(Element::cut(Shape::closed_path(self.outline.clone())));
        elements.extend(self.cutouts.iter().map(|c| Element::cut(c.shape.clone())));
        elements.extend(self.annotations.iter().cloned());
        elements
    }

    /// Bounding box of everything drawn on the cut layer.
    pub fn cut_extent(&self) -> Rect {
        self.elements()
            .iter()
            .filter(|e| e.layer == crate::geometry::Layer::Cut)
            .filter_map(|e| e.shape.extent())
            .fold(self.bounds(), |acc, r| acc.union(&r))
    }
}

/// Accumulates a panel's parts; [`PanelBuilder::build`] validates and freezes
/// them.
#[derive(Debug, Clone)]
pub struct PanelBuilder {
    kind: PanelKind,
    width: f64,
    height: f64,
    thickness: f64,
    frame: Frame,
    edges: [EdgeTreatment; 4],
    outline: Option<Vec<Point>>,
    cutouts: Vec<Cutout>,
    annotations: Vec<Element>,
    detail: PanelDetail,
    kerf: f64,
    min_bridge: f64,
}

impl PanelBuilder {
    pub fn new(
        kind: PanelKind,
        width: f64,
        height: f64,
        thickness: f64,
        frame: Frame,
        dims: &Dimensions,
    ) -> Self {
        Self {
            kind,
            width,
            height,
            thickness,
            frame,
            edges: [EdgeTreatment::Straight; 4],
            outline: None,
            cutouts: Vec::new(),
            annotations: Vec::new(),
            detail: PanelDetail::Plain,
            kerf: dims.kerf,
            min_bridge: dims.params.vents.min_bridge,
        }
    }

    pub fn edge(mut self, side: Side, treatment: EdgeTreatment) -> Self {
        self.edges[side.index()] = treatment;
        self
    }

    /// Replaces the traced outline with a custom one.
    pub fn outline(mut self, points: Vec<Point>) -> Self {
        self.outline = Some(points);
        self
    }

    pub fn detail(mut self, detail: PanelDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn cutout(&mut self, role: CutoutRole, shape: Shape, inset: Option<f64>) {
        self.cutouts.push(Cutout { role, shape, inset });
    }

    pub fn score(&mut self, shape: Shape) {
        self.annotations.push(Element::score(shape));
    }

    /// Panel label placed in the margin above the top edge.
    pub fn label(&mut self, text: &str) {
        let lift = self.edges[Side::Top.index()].protrusion() + 2.0;
        self.score(Shape::text(Point::new(0.0, -lift), text, LABEL_SIZE));
    }

    /// Label with the panel name, nominal size and stock thickness.
    pub fn size_label(&mut self) {
        let text = format!(
            "{} {:.1}x{:.1} mm ({} mm)",
            self.kind.label(),
            self.width,
            self.height,
            self.thickness
        );
        self.label(&text);
    }

    pub fn build(self) -> GeometryResult<Panel> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(GeometryError::DegenerateEdge { length: self.width });
        }
        if !(self.height.is_finite() && self.height > 0.0) {
            return Err(GeometryError::DegenerateEdge {
                length: self.height,
            });
        }

        let outline = match self.outline {
            Some(points) => points,
            None => outline::rect_outline(self.width, self.height, &self.edges)?,
        };

        let mut cutouts = outline::through_slots(self.width, self.height, &self.edges)?;
        cutouts.extend(self.cutouts);

        let bounds = Rect::new(0.0, 0.0, self.width, self.height);
        for cutout in &cutouts {
            let extent = cutout.shape.extent().unwrap_or(bounds);
            if !bounds.contains_rect(&extent) || extent.width < EPSILON && extent.height < EPSILON
            {
                let center = extent.center();
                return Err(GeometryError::HoleOutsidePanel {
                    feature: format!("{:?}", cutout.role),
                    x: center.x,
                    y: center.y,
                });
            }
        }

        check_bridges(
            &cutouts,
            self.width,
            self.height,
            &self.edges,
            self.min_bridge,
        )?;

        let (outline, cutouts) = if self.kerf > 0.0 {
            outline::apply_kerf(outline, cutouts, self.kerf)?
        } else {
            (outline, cutouts)
        };

        Ok(Panel {
            kind: self.kind,
            width: self.width,
            height: self.height,
            thickness: self.thickness,
            frame: self.frame,
            edges: self.edges,
            outline,
            cutouts,
            annotations: self.annotations,
            detail: self.detail,
            kerf: self.kerf,
        })
    }
}

/// Fails when a vent leaves less than `min_bridge` of material to a
/// non-vent cutout, to the root of a notched edge or to the panel border.
fn check_bridges(
    cutouts: &[Cutout],
    width: f64,
    height: f64,
    edges: &[EdgeTreatment; 4],
    min_bridge: f64,
) -> GeometryResult<()> {
    let notch = |side: Side| match &edges[side.index()] {
        EdgeTreatment::FingerNotch(joint) => joint.depth,
        _ => 0.0,
    };
    let solid = Rect::new(
        notch(Side::Left),
        notch(Side::Top),
        width - notch(Side::Left) - notch(Side::Right),
        height - notch(Side::Top) - notch(Side::Bottom),
    );
    let too_close = |vent: &Cutout, other: String, gap: f64| GeometryError::CutoutTooClose {
        feature: format!("{:?}", vent.role),
        other,
        gap: gap.max(0.0),
        min: min_bridge,
    };

    for vent in cutouts.iter().filter(|c| c.role.is_vent()) {
        let Some(extent) = vent.shape.extent() else {
            continue;
        };
        let edge = (extent.x - solid.x)
            .min(extent.y - solid.y)
            .min(solid.max_x() - extent.max_x())
            .min(solid.max_y() - extent.max_y());
        if edge < min_bridge - EPSILON {
            return Err(too_close(vent, "the panel edge".to_string(), edge));
        }

        for other in cutouts.iter().filter(|c| !c.role.is_vent()) {
            match other.shape.extent() {
                Some(bounds) if extent.gap(&bounds) < min_bridge => {}
                _ => continue,
            }
            if let Some(gap) = vent.shape.clearance(&other.shape) {
                if gap < min_bridge - EPSILON {
                    return Err(too_close(vent, format!("{:?}", other.role), gap));
                }
            }
        }
    }
    Ok(())
}

/// Checks that a feature's extent lies inside `region`.
pub(crate) fn require_inside(region: Rect, shape_extent: Rect, feature: &str) -> GeometryResult<()> {
    if region.contains_rect(&shape_extent) {
        Ok(())
    } else {
        let c = shape_extent.center();
        Err(GeometryError::HoleOutsidePanel {
            feature: feature.to_string(),
            x: c.x,
            y: c.y,
        })
    }
}

/// Builds one panel from the dimension set.
pub fn assemble(kind: PanelKind, dims: &Dimensions) -> Result<Panel, PanelError> {
    let built = match kind {
        PanelKind::Bottom => horizontal::bottom(dims),
        PanelKind::Top => horizontal::top(dims),
        PanelKind::Front => wall::front(dims),
        PanelKind::Back => wall::back(dims),
        PanelKind::LeftSide => side::side(PanelKind::LeftSide, dims),
        PanelKind::RightSide => side::side(PanelKind::RightSide, dims),
        PanelKind::CombRail(position) => comb_rail::comb_rail(position, dims),
        PanelKind::FanBracket => fan_bracket::fan_bracket(dims),
    };
    built.map_err(|source| PanelError::new(kind, source))
}
