//! Consistency checker.
//!
//! Every declared [`Mating`] is re-checked on the assembled panels: both
//! sides of a joint are mapped into enclosure coordinates through their
//! panels' frames and compared field by field. Any disagreement is a
//! [`MismatchError`]; the run stops before anything is written.

use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

use crate::error::{EdgeLabel, GeometryError, MismatchError};
use crate::geometry::{Point, Rect, Side, EPSILON};
use crate::joints::{EdgeTreatment, JointLayout, JointSegment};
use crate::panels::{CutoutRole, Panel, PanelKind, RailPosition};
use crate::params::Dimensions;

/// How the two edges of a joint relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JointStyle {
    /// Interlocking fingers: each side's material fills the other's gaps.
    Finger,
    /// The first edge's teeth pass through the second edge's slots.
    TabSlot,
}

/// A declared pairing whose geometry must agree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Mating {
    EdgeJoint {
        a: PanelKind,
        a_side: Side,
        b: PanelKind,
        b_side: Side,
        style: JointStyle,
        /// The two edges also share their full extent.
        flush: bool,
    },
    RailTab {
        rail: RailPosition,
        side_panel: PanelKind,
        rail_side: Side,
    },
    RodAlignment {
        a: PanelKind,
        b: PanelKind,
    },
}

impl fmt::Display for Mating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mating::EdgeJoint {
                a,
                a_side,
                b,
                b_side,
                style,
                ..
            } => write!(
                f,
                "{} {} edge <-> {} {} edge ({:?})",
                a, a_side, b, b_side, style
            ),
            Mating::RailTab {
                rail, side_panel, ..
            } => write!(
                f,
                "{} <-> {} comb slot",
                PanelKind::CombRail(*rail),
                side_panel
            ),
            Mating::RodAlignment { a, b } => write!(f, "{} <-> {} rod holes", a, b),
        }
    }
}

fn edge(
    a: PanelKind,
    a_side: Side,
    b: PanelKind,
    b_side: Side,
    style: JointStyle,
    flush: bool,
) -> Mating {
    Mating::EdgeJoint {
        a,
        a_side,
        b,
        b_side,
        style,
        flush,
    }
}

/// The fixed interlocking scheme of the enclosure.
pub fn declared_matings() -> Vec<Mating> {
    use JointStyle::{Finger, TabSlot};
    use PanelKind::*;

    let mut matings = vec![
        edge(LeftSide, Side::Top, Top, Side::Left, Finger, true),
        edge(LeftSide, Side::Bottom, Bottom, Side::Left, Finger, true),
        edge(RightSide, Side::Top, Top, Side::Right, Finger, true),
        edge(RightSide, Side::Bottom, Bottom, Side::Right, Finger, true),
        edge(Front, Side::Top, Top, Side::Top, TabSlot, false),
        edge(Front, Side::Bottom, Bottom, Side::Top, TabSlot, false),
        edge(Back, Side::Top, Top, Side::Bottom, TabSlot, false),
        edge(Back, Side::Bottom, Bottom, Side::Bottom, TabSlot, false),
        edge(Front, Side::Left, LeftSide, Side::Left, TabSlot, false),
        edge(Front, Side::Right, RightSide, Side::Left, TabSlot, false),
        edge(Back, Side::Left, LeftSide, Side::Right, TabSlot, false),
        edge(Back, Side::Right, RightSide, Side::Right, TabSlot, false),
    ];
    for rail in [RailPosition::Front, RailPosition::Rear] {
        matings.push(Mating::RailTab {
            rail,
            side_panel: LeftSide,
            rail_side: Side::Left,
        });
        matings.push(Mating::RailTab {
            rail,
            side_panel: RightSide,
            rail_side: Side::Right,
        });
    }
    matings.push(Mating::RodAlignment {
        a: Bottom,
        b: Top,
    });
    matings.push(Mating::RodAlignment {
        a: Bottom,
        b: FanBracket,
    });
    matings
}

/// Outcome of one mating.
#[derive(Debug, Clone, Serialize)]
pub struct MatingResult {
    pub mating: Mating,
    pub description: String,
    pub passed: bool,
    pub failure: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub results: Vec<MatingResult>,
    #[serde(skip)]
    mismatches: Vec<MismatchError>,
}

impl ConsistencyReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatches(&self) -> &[MismatchError] {
        &self.mismatches
    }

    /// The report when every mating passed, otherwise the first mismatch.
    pub fn into_result(self) -> Result<ConsistencyReport, MismatchError> {
        match self.mismatches.first() {
            Some(err) => Err(err.clone()),
            None => Ok(self),
        }
    }
}

/// Runs every declared mating against the assembled panels.
pub fn check(panels: &[Panel], dims: &Dimensions) -> ConsistencyReport {
    let mut results = Vec::new();
    let mut mismatches = Vec::new();

    for mating in declared_matings() {
        let outcome = check_mating(&mating, panels, dims);
        let description = mating.to_string();
        match outcome {
            Ok(()) => {
                debug!(mating = %description, "Mating passed");
                results.push(MatingResult {
                    mating,
                    description,
                    passed: true,
                    failure: None,
                });
            }
            Err(err) => {
                warn!(mating = %description, error = %err, "Mating failed");
                results.push(MatingResult {
                    mating,
                    description,
                    passed: false,
                    failure: Some(err.to_string()),
                });
                mismatches.push(err);
            }
        }
    }

    ConsistencyReport {
        results,
        mismatches,
    }
}

fn check_mating(
    mating: &Mating,
    panels: &[Panel],
    dims: &Dimensions,
) -> Result<(), MismatchError> {
    match *mating {
        Mating::EdgeJoint {
            a,
            a_side,
            b,
            b_side,
            style,
            flush,
        } => {
            let (la, lb) = (EdgeLabel::Edge(a_side), EdgeLabel::Edge(b_side));
            let pa = find(panels, a, la, b, lb)?;
            let pb = find(panels, b, lb, a, la)?;
            EdgePair {
                a: pa,
                a_side,
                b: pb,
                b_side,
            }
            .check(style, flush)
        }
        Mating::RailTab {
            rail,
            side_panel,
            rail_side,
        } => {
            let kind = PanelKind::CombRail(rail);
            let tab = EdgeLabel::Edge(rail_side);
            let rail_panel = find(panels, kind, tab, side_panel, EdgeLabel::CombSlot)?;
            let side = find(panels, side_panel, EdgeLabel::CombSlot, kind, tab)?;
            check_rail(rail_panel, rail_side, side, rail, dims)
        }
        Mating::RodAlignment { a, b } => {
            let pa = find(panels, a, EdgeLabel::RodHoles, b, EdgeLabel::RodHoles)?;
            let pb = find(panels, b, EdgeLabel::RodHoles, a, EdgeLabel::RodHoles)?;
            check_rods(pa, pb, dims)
        }
    }
}

fn find(
    panels: &[Panel],
    kind: PanelKind,
    label: EdgeLabel,
    other: PanelKind,
    other_label: EdgeLabel,
) -> Result<&Panel, MismatchError> {
    panels
        .iter()
        .find(|p| p.kind() == kind)
        .ok_or_else(|| MismatchError {
            panel_a: other,
            edge_a: other_label,
            panel_b: kind,
            edge_b: label,
            field: "panel",
            expected: "assembled".to_string(),
            actual: "missing".to_string(),
        })
}

fn same(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn fmt_intervals(intervals: &[(f64, f64)]) -> String {
    let parts: Vec<String> = intervals
        .iter()
        .map(|(s, e)| format!("{:.4}..{:.4}", s, e))
        .collect();
    format!("[{}]", parts.join(", "))
}

struct EdgePair<'a> {
    a: &'a Panel,
    a_side: Side,
    b: &'a Panel,
    b_side: Side,
}

impl EdgePair<'_> {
    fn mismatch(&self, field: &'static str, expected: String, actual: String) -> MismatchError {
        MismatchError {
            panel_a: self.a.kind(),
            edge_a: EdgeLabel::Edge(self.a_side),
            panel_b: self.b.kind(),
            edge_b: EdgeLabel::Edge(self.b_side),
            field,
            expected,
            actual,
        }
    }

    fn geometry(&self, err: GeometryError) -> MismatchError {
        self.mismatch("layout", "valid joint".to_string(), err.to_string())
    }

    fn compare(&self, field: &'static str, expected: f64, actual: f64) -> Result<(), MismatchError> {
        if same(expected, actual) {
            Ok(())
        } else {
            Err(self.mismatch(
                field,
                format!("{:.4}", expected),
                format!("{:.4}", actual),
            ))
        }
    }

    fn compare_intervals(
        &self,
        field: &'static str,
        expected: &[(f64, f64)],
        actual: &[(f64, f64)],
    ) -> Result<(), MismatchError> {
        let equal = expected.len() == actual.len()
            && expected
                .iter()
                .zip(actual)
                .all(|(e, a)| same(e.0, a.0) && same(e.1, a.1));
        if equal {
            Ok(())
        } else {
            Err(self.mismatch(field, fmt_intervals(expected), fmt_intervals(actual)))
        }
    }

    fn layout(&self, panel: &Panel, side: Side) -> Result<JointLayout, MismatchError> {
        match panel.edge(side).layout().map_err(|e| self.geometry(e))? {
            Some(layout) => Ok(layout),
            None => Err(self.mismatch(
                "treatment",
                "jointed edge".to_string(),
                panel.edge(side).name().to_string(),
            )),
        }
    }

    /// Segments mapped onto the enclosure axis the edge runs along, sorted.
    fn mapped(panel: &Panel, side: Side, segments: &[JointSegment]) -> Vec<(f64, f64)> {
        let map = panel.frame().along(side);
        let mut out: Vec<(f64, f64)> = segments
            .iter()
            .map(|s| map.map_interval(s.start, s.end))
            .collect();
        out.sort_by(|x, y| x.0.total_cmp(&y.0));
        out
    }

    /// Enclosure interval across the edge between `from` and `to`, both
    /// measured outward from the nominal edge line.
    fn band(panel: &Panel, side: Side, from: f64, to: f64) -> (f64, f64) {
        let (edge, outward) = match side {
            Side::Top | Side::Left => (0.0, -1.0),
            Side::Bottom => (panel.height(), 1.0),
            Side::Right => (panel.width(), 1.0),
        };
        panel
            .frame()
            .across(side)
            .map_interval(edge + outward * from, edge + outward * to)
    }

    /// The male edge must reach through the full thickness of the mating
    /// panel, and the notch or slot row must sit exactly where the male
    /// panel stands.
    fn check_planes(&self, depth: f64) -> Result<(), MismatchError> {
        let tb = self.b.edge(self.b_side);
        let inset = match tb {
            EdgeTreatment::FingerNotch(_) => 0.0,
            EdgeTreatment::ThroughSlot { inset, .. } => *inset,
            other => {
                return Err(self.mismatch(
                    "treatment",
                    "notch or through slot".to_string(),
                    other.name().to_string(),
                ))
            }
        };

        for (across, panel) in [
            (self.a.frame().across(self.a_side), self.b),
            (self.b.frame().across(self.b_side), self.a),
        ] {
            if across.axis != panel.frame().normal.axis {
                return Err(self.mismatch(
                    "plane_axis",
                    panel.frame().normal.axis.to_string(),
                    across.axis.to_string(),
                ));
            }
        }

        let reach = Self::band(self.a, self.a_side, 0.0, depth);
        self.compare_intervals("reach", &[self.b.frame().material(self.b.thickness())], &[reach])?;

        let socket = Self::band(self.b, self.b_side, -(inset + depth), -inset);
        self.compare_intervals(
            "slot_plane",
            &[self.a.frame().material(self.a.thickness())],
            &[socket],
        )
    }

    fn check(&self, style: JointStyle, flush: bool) -> Result<(), MismatchError> {
        let ta = self.a.edge(self.a_side);
        let tb = self.b.edge(self.b_side);
        let la = self.layout(self.a, self.a_side)?;
        let lb = self.layout(self.b, self.b_side)?;

        if la.count != lb.count {
            return Err(self.mismatch(
                "count",
                la.count.to_string(),
                lb.count.to_string(),
            ));
        }
        self.compare("width", la.width, lb.width)?;
        self.compare("depth", la.depth, lb.depth)?;

        let zone_a = self
            .a
            .frame()
            .along(self.a_side)
            .map_interval(la.origin, la.origin + la.span);
        let zone_b = self
            .b
            .frame()
            .along(self.b_side)
            .map_interval(lb.origin, lb.origin + lb.span);
        self.compare("origin", zone_a.0, zone_b.0)?;
        self.compare("span", zone_a.1 - zone_a.0, zone_b.1 - zone_b.0)?;

        let a_engaged = ta.engaged().map_err(|e| self.geometry(e))?;
        let b_receiving = tb.receiving().map_err(|e| self.geometry(e))?;
        self.compare_intervals(
            "engaged",
            &Self::mapped(self.a, self.a_side, &a_engaged),
            &Self::mapped(self.b, self.b_side, &b_receiving),
        )?;

        if style == JointStyle::Finger {
            let a_receiving = ta.receiving().map_err(|e| self.geometry(e))?;
            let b_engaged = tb.engaged().map_err(|e| self.geometry(e))?;
            self.compare_intervals(
                "receiving",
                &Self::mapped(self.a, self.a_side, &a_receiving),
                &Self::mapped(self.b, self.b_side, &b_engaged),
            )?;
        }

        self.check_planes(la.depth)?;

        if flush {
            let ea = self
                .a
                .frame()
                .along(self.a_side)
                .map_interval(0.0, self.a.edge_length(self.a_side));
            let eb = self
                .b
                .frame()
                .along(self.b_side)
                .map_interval(0.0, self.b.edge_length(self.b_side));
            self.compare_intervals("extent", &[ea], &[eb])?;
        }
        Ok(())
    }
}

fn check_rail(
    rail: &Panel,
    rail_side: Side,
    side: &Panel,
    position: RailPosition,
    dims: &Dimensions,
) -> Result<(), MismatchError> {
    let mismatch = |field: &'static str, expected: String, actual: String| MismatchError {
        panel_a: rail.kind(),
        edge_a: EdgeLabel::Edge(rail_side),
        panel_b: side.kind(),
        edge_b: EdgeLabel::CombSlot,
        field,
        expected,
        actual,
    };
    let compare = |field: &'static str, expected: f64, actual: f64| {
        if same(expected, actual) {
            Ok(())
        } else {
            Err(mismatch(
                field,
                format!("{:.4}", expected),
                format!("{:.4}", actual),
            ))
        }
    };

    let comb = rail
        .comb()
        .ok_or_else(|| mismatch("detail", "comb layout".to_string(), "none".to_string()))?;
    let joint = match rail.edge(rail_side) {
        EdgeTreatment::OuterTab(joint) => *joint,
        other => {
            return Err(mismatch(
                "treatment",
                "outer tab".to_string(),
                other.name().to_string(),
            ))
        }
    };
    // Compare against the nominal slot, before kerf compensation.
    let slot: Rect = side
        .cutouts_by(CutoutRole::CombSlot(position))
        .find_map(|c| c.shape.extent())
        .map(|r| r.inflate(side.kerf() / 2.0))
        .ok_or_else(|| mismatch("slot", "comb slot".to_string(), "missing".to_string()))?;

    let slot_center = slot.center();
    compare("rail_y", comb.center_y, side.frame().u.map(slot_center.x))?;
    compare("slot_width", comb.thickness, slot.width)?;
    compare(
        "tab_center_z",
        rail.frame().v.map(joint.origin + joint.span / 2.0),
        side.frame().v.map(slot_center.y),
    )?;
    compare(
        "slot_clearance",
        dims.params.joints.rail_slot_clearance,
        slot.height - joint.span,
    )?;
    compare("tab_depth", side.thickness(), joint.depth)
}

/// Rod hole centres in enclosure coordinates with their diameters.
fn rod_centers(panel: &Panel) -> Vec<(Point, f64)> {
    let frame = panel.frame();
    let mut rods: Vec<(Point, f64)> = panel
        .cutouts_by(CutoutRole::Rod)
        .filter_map(|c| {
            let extent = c.shape.extent()?;
            let center = extent.center();
            Some((
                Point::new(frame.u.map(center.x), frame.v.map(center.y)),
                extent.width,
            ))
        })
        .collect();
    rods.sort_by(|x, y| x.0.y.total_cmp(&y.0.y).then(x.0.x.total_cmp(&y.0.x)));
    rods
}

/// Distance of a rod centre from the nearest outer edge of the caps.
fn enclosure_inset(center: Point, dims: &Dimensions) -> f64 {
    center
        .x
        .min(center.y)
        .min(dims.exterior_x - center.x)
        .min(dims.panel_depth - center.y)
}

fn check_rods(a: &Panel, b: &Panel, dims: &Dimensions) -> Result<(), MismatchError> {
    let mismatch = |field: &'static str, expected: String, actual: String| MismatchError {
        panel_a: a.kind(),
        edge_a: EdgeLabel::RodHoles,
        panel_b: b.kind(),
        edge_b: EdgeLabel::RodHoles,
        field,
        expected,
        actual,
    };

    let ra = rod_centers(a);
    let rb = rod_centers(b);
    if ra.len() != rb.len() {
        return Err(mismatch(
            "rod_count",
            ra.len().to_string(),
            rb.len().to_string(),
        ));
    }
    for ((ca, da), (cb, db)) in ra.iter().zip(&rb) {
        if !ca.approx_eq(*cb) {
            return Err(mismatch(
                "rod_center",
                format!("({:.4}, {:.4})", ca.x, ca.y),
                format!("({:.4}, {:.4})", cb.x, cb.y),
            ));
        }
        if !same(*da, *db) {
            return Err(mismatch(
                "rod_diameter",
                format!("{:.4}", da),
                format!("{:.4}", db),
            ));
        }
        for center in [ca, cb] {
            let inset = enclosure_inset(*center, dims);
            if !same(dims.rod_inset, inset) {
                return Err(mismatch(
                    "rod_inset",
                    format!("{:.4}", dims.rod_inset),
                    format!("{:.4}", inset),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::assemble;
    use crate::params::Parameters;

    fn all_panels(dims: &Dimensions) -> Vec<Panel> {
        PanelKind::ALL
            .iter()
            .map(|&k| assemble(k, dims).unwrap())
            .collect()
    }

    #[test]
    fn test_eighteen_declared_matings() {
        let matings = declared_matings();
        assert_eq!(matings.len(), 18);
        let rails = matings
            .iter()
            .filter(|m| matches!(m, Mating::RailTab { .. }))
            .count();
        assert_eq!(rails, 4);
    }

    #[test]
    fn test_default_enclosure_is_consistent() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let report = check(&all_panels(&dims), &dims);
        for result in &report.results {
            assert!(result.passed, "{}: {:?}", result.description, result.failure);
        }
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_corner_rods_sit_at_rod_inset() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let panels = all_panels(&dims);
        for kind in [PanelKind::Bottom, PanelKind::Top, PanelKind::FanBracket] {
            let panel = panels.iter().find(|p| p.kind() == kind).unwrap();
            let rods = rod_centers(panel);
            assert_eq!(rods.len(), 4);
            for (center, _) in rods {
                assert!(same(enclosure_inset(center, &dims), 11.0), "{}", kind);
            }
        }
    }

    #[test]
    fn test_missing_panel_is_a_mismatch() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let panels: Vec<Panel> = all_panels(&dims)
            .into_iter()
            .filter(|p| p.kind() != PanelKind::FanBracket)
            .collect();
        let err = check(&panels, &dims).into_result().unwrap_err();
        assert_eq!(err.field, "panel");
        assert_eq!(err.panel_b, PanelKind::FanBracket);
    }

    #[test]
    fn test_drifted_pitch_is_caught() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let mut drifted_params = Parameters::default();
        drifted_params.joints.finger_pitch = 9.0;
        let drifted = Dimensions::resolve(&drifted_params).unwrap();

        let mut panels = all_panels(&dims);
        let index = panels
            .iter()
            .position(|p| p.kind() == PanelKind::Front)
            .unwrap();
        panels[index] = assemble(PanelKind::Front, &drifted).unwrap();

        let report = check(&panels, &dims);
        assert!(!report.passed());
        let err = &report.mismatches()[0];
        assert_eq!(err.panel_a, PanelKind::Front);
        assert_eq!(err.field, "count");
    }
}
