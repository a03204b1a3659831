//! Left and right side panels.
//!
//! Drawn from outside with the front edge on the left. Fingers on the top
//! and bottom edges sit in the caps' corner notches. The front and back
//! panels' tabs pass through slot columns inset from the left and right
//! edges, and the comb rail tabs pass through one slot per rail.

use super::{scheme, CutoutRole, Panel, PanelBuilder, PanelKind, RailPosition};
use crate::error::GeometryResult;
use crate::geometry::{Point, Rect, Shape, Side};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;
use crate::vents::slot_rows;

/// Material kept between a rail slot and the vent columns.
const RAIL_VENT_MARGIN: f64 = 2.0;
const VENT_COLUMNS: usize = 3;
const CABLE_VENT_ROWS: usize = 4;
const DRIVE_VENT_ROWS: usize = 6;

/// Rectangle of the comb rail slot for the given rail, in side-panel
/// coordinates.
pub fn comb_slot(dims: &Dimensions, position: RailPosition) -> Rect {
    let comb = &dims.params.comb;
    let joints = &dims.params.joints;
    let bar_center_z = dims.z.drive_top - comb.bar_height / 2.0;
    let frame = scheme::side_frame(dims, PanelKind::LeftSide);
    let x = dims.rail_center_y[position.index()] - frame.u.origin;
    let y = frame.v.origin - bar_center_z;
    Rect::from_center(
        Point::new(x, y),
        comb.thickness,
        joints.rail_tab_height + joints.rail_slot_clearance,
    )
}

pub fn side(kind: PanelKind, dims: &Dimensions) -> GeometryResult<Panel> {
    let fingers = EdgeTreatment::FingerProtrusion(scheme::side_cap_joint(dims));
    let slots = EdgeTreatment::ThroughSlot {
        joint: scheme::wall_side_joint(dims),
        inset: dims.params.wall.side_overhang,
    };
    let mut builder = PanelBuilder::new(
        kind,
        dims.panel_depth,
        dims.side_height,
        dims.wall,
        scheme::side_frame(dims, kind),
        dims,
    )
    .edge(Side::Top, fingers)
    .edge(Side::Bottom, fingers)
    .edge(Side::Left, slots)
    .edge(Side::Right, slots);

    let front_slot = comb_slot(dims, RailPosition::Front);
    let rear_slot = comb_slot(dims, RailPosition::Rear);
    builder.cutout(
        CutoutRole::CombSlot(RailPosition::Front),
        Shape::rect(front_slot),
        None,
    );
    builder.cutout(
        CutoutRole::CombSlot(RailPosition::Rear),
        Shape::rect(rear_slot),
        None,
    );

    // Vent columns run in the clear band between the two rails.
    let vents = &dims.params.vents;
    let margin = RAIL_VENT_MARGIN.max(vents.min_bridge);
    let x0 = front_slot.max_x() + margin;
    let x1 = rear_slot.x - margin;
    let zones = [
        (dims.z.hat_top + 15.0, dims.z.drive_bottom - 10.0, CABLE_VENT_ROWS),
        (dims.z.drive_bottom + 20.0, dims.z.drive_top - 10.0, DRIVE_VENT_ROWS),
    ];
    for (z0, z1, rows) in zones {
        if z1 <= z0 || x1 - x0 < vents.side_slot_length {
            continue;
        }
        let region = Rect::new(
            x0,
            dims.z.top_panel - z1,
            x1 - x0,
            z1 - z0 + vents.row_slot_height,
        );
        for slot in slot_rows(
            region,
            vents.side_slot_length,
            vents.row_slot_height,
            VENT_COLUMNS,
            rows,
            vents.min_bridge,
        )? {
            builder.cutout(CutoutRole::Vent, Shape::slot(slot), None);
        }
    }

    builder.size_label();
    builder.build()
}
