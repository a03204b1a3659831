//! The interlocking scheme.
//!
//! Each jointed edge pair takes its [`JointSpec`] from exactly one function
//! here, so the panel cutting the tab and the panel cutting the slot cannot
//! drift apart. Builders only choose where the zone starts on their own edge.
//!
//! | Joint | Male edge | Female edge |
//! |---|---|---|
//! | [`side_cap_joint`] | side top/bottom (finger protrusion) | cap left/right (finger notch) |
//! | [`wall_cap_joint`] | front/back top/bottom (finger protrusion) | cap front/back (through slot) |
//! | [`wall_side_joint`] | front/back left/right (outer tab) | side front/back (through slot) |
//! | [`rail_side_joint`] | comb rail ends (outer tab) | side comb slot |
//!
//! Frames place each drawing in the enclosure: X left to right from the left
//! side's outer face, Y front to back from the caps' front edge, Z upward from
//! the underside of the bottom panel.

use super::{PanelKind, RailPosition};
use crate::geometry::{Axis, AxisMap, Frame};
use crate::joints::JointSpec;
use crate::params::Dimensions;

/// Side panel top/bottom edges into the caps' left/right edges, flush over
/// the full panel depth.
pub fn side_cap_joint(dims: &Dimensions) -> JointSpec {
    JointSpec::new(dims.panel_depth, dims.params.joints.finger_pitch, dims.wall)
}

/// Front/back top and bottom edges through the slot rows in the caps.
pub fn wall_cap_joint(dims: &Dimensions) -> JointSpec {
    JointSpec::new(dims.interior_x, dims.params.joints.finger_pitch, dims.wall).skipping_ends()
}

/// Front/back side edges through the slot columns in the side panels.
pub fn wall_side_joint(dims: &Dimensions) -> JointSpec {
    JointSpec::new(dims.side_height, dims.params.joints.finger_pitch, dims.wall).skipping_ends()
}

/// A single tab at each end of a comb rail.
pub fn rail_side_joint(dims: &Dimensions) -> JointSpec {
    let tab = dims.params.joints.rail_tab_height;
    JointSpec::new(tab, tab, dims.wall)
}

/// Where the rail tab starts along the rail's end edge.
pub fn rail_tab_origin(dims: &Dimensions) -> f64 {
    (dims.params.comb.bar_height - dims.params.joints.rail_tab_height) / 2.0
}

/// Top and bottom panels, seen from above with the front edge at the top.
pub fn cap_frame(dims: &Dimensions, kind: PanelKind) -> Frame {
    let z = match kind {
        PanelKind::Top => dims.z.top_panel,
        _ => 0.0,
    };
    Frame::new(
        AxisMap::forward(Axis::X, 0.0),
        AxisMap::forward(Axis::Y, 0.0),
        AxisMap::forward(Axis::Z, z),
    )
}

/// Front and back panels, seen from the front, between the caps. Each stands
/// one overhang in from the caps' edge.
pub fn wall_frame(dims: &Dimensions, kind: PanelKind) -> Frame {
    let y = match kind {
        PanelKind::Back => dims.panel_depth - dims.overlap,
        _ => dims.params.wall.side_overhang,
    };
    Frame::new(
        AxisMap::forward(Axis::X, dims.wall),
        AxisMap::reverse(Axis::Z, dims.z.top_panel),
        AxisMap::forward(Axis::Y, y),
    )
}

/// Side panels, seen from outside with the front edge on the left.
pub fn side_frame(dims: &Dimensions, kind: PanelKind) -> Frame {
    let x = match kind {
        PanelKind::RightSide => dims.exterior_x - dims.wall,
        _ => 0.0,
    };
    Frame::new(
        AxisMap::forward(Axis::Y, 0.0),
        AxisMap::reverse(Axis::Z, dims.z.top_panel),
        AxisMap::forward(Axis::X, x),
    )
}

/// Comb rails hang from the drive top, spanning between the side panels.
pub fn rail_frame(dims: &Dimensions, position: RailPosition) -> Frame {
    let near_y = dims.rail_center_y[position.index()] - dims.params.comb.thickness / 2.0;
    Frame::new(
        AxisMap::forward(Axis::X, dims.wall),
        AxisMap::reverse(Axis::Z, dims.z.drive_top),
        AxisMap::forward(Axis::Y, near_y),
    )
}

/// Fan bracket, seen from above, standing clear of every wall.
pub fn fan_frame(dims: &Dimensions) -> Frame {
    let c = dims.params.fan.bracket_clearance;
    Frame::new(
        AxisMap::forward(Axis::X, dims.wall + c),
        AxisMap::forward(Axis::Y, dims.overlap + c),
        AxisMap::forward(Axis::Z, dims.z.fan_bracket),
    )
}

/// Enclosure positions of the four corner rods, shared by every panel they
/// pass through.
pub fn rod_positions(dims: &Dimensions) -> [(f64, f64); 4] {
    let i = dims.rod_inset;
    let (w, d) = (dims.exterior_x, dims.panel_depth);
    [(i, i), (w - i, i), (i, d - i), (w - i, d - i)]
}
