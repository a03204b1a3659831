//! Front and back panels.
//!
//! Both sit between the side panels. Fingers on the top and bottom edges pass
//! through the caps' slot rows; tabs on the left and right edges pass through
//! the side panels' slot columns. The front carries the board's port openings
//! and the power jack.

use super::{scheme, CutoutRole, Panel, PanelBuilder, PanelKind};
use crate::error::GeometryResult;
use crate::geometry::{Point, Rect, Shape, Side};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;
use crate::vents::slot_rows;

/// Board connector openings as `(name, x from board edge, z above PCB
/// underside, width, height)`.
const PORTS: [(&str, f64, f64, f64, f64); 4] = [
    ("GbE", 1.25, 0.45, 17.9, 16.5),
    ("USB3", 21.30, 1.45, 15.6, 17.6),
    ("USB2", 39.10, 1.45, 15.8, 17.6),
    ("HAT", 34.60, 21.55, 20.8, 8.1),
];
const PORT_RADIUS: f64 = 1.5;
/// Extra room above each connector.
const PORT_LIFT: f64 = 1.0;

const JACK_RADIUS: f64 = 4.0;
const JACK_OFFSET_X: f64 = 17.0;
const JACK_HEIGHT: f64 = 15.0;

const VENT_COLUMNS: usize = 3;
const VENT_SIDE_MARGIN: f64 = 20.0;
const CABLE_VENT_ROWS: usize = 5;
const DRIVE_VENT_ROWS: usize = 8;

fn wall_builder(kind: PanelKind, dims: &Dimensions) -> PanelBuilder {
    let fingers = EdgeTreatment::FingerProtrusion(scheme::wall_cap_joint(dims));
    let tabs = EdgeTreatment::OuterTab(scheme::wall_side_joint(dims));
    PanelBuilder::new(
        kind,
        dims.interior_x,
        dims.side_height,
        dims.wall,
        scheme::wall_frame(dims, kind),
        dims,
    )
    .edge(Side::Top, fingers)
    .edge(Side::Bottom, fingers)
    .edge(Side::Left, tabs)
    .edge(Side::Right, tabs)
}

/// Local y of an enclosure height on a wall panel.
fn z_to_y(dims: &Dimensions, z: f64) -> f64 {
    dims.z.top_panel - z
}

/// Vent rows in the cable zone above the HAT and along the drives.
fn add_vents(builder: &mut PanelBuilder, dims: &Dimensions) -> GeometryResult<()> {
    let vents = &dims.params.vents;
    let width = dims.interior_x - 2.0 * VENT_SIDE_MARGIN;
    let zones = [
        (dims.z.hat_top + 15.0, dims.z.drive_bottom - 10.0, CABLE_VENT_ROWS),
        (dims.z.drive_bottom + 15.0, dims.z.drive_top - 10.0, DRIVE_VENT_ROWS),
    ];
    for (z0, z1, rows) in zones {
        if z1 <= z0 {
            continue;
        }
        let region = Rect::new(
            VENT_SIDE_MARGIN,
            z_to_y(dims, z1),
            width,
            z1 - z0 + vents.row_slot_height,
        );
        let slots = slot_rows(
            region,
            vents.wall_slot_length,
            vents.row_slot_height,
            VENT_COLUMNS,
            rows,
            vents.min_bridge,
        )?;
        for slot in slots {
            builder.cutout(CutoutRole::Vent, Shape::slot(slot), None);
        }
    }
    Ok(())
}

pub fn front(dims: &Dimensions) -> GeometryResult<Panel> {
    let mut builder = wall_builder(PanelKind::Front, dims);
    let board = &dims.params.board;

    // The board is centred left to right, matching the bottom panel.
    let board_x = (dims.interior_x - board.width) / 2.0;
    let pcb_y = z_to_y(dims, dims.z.board_pcb);

    for (name, dx, dz, w, h) in PORTS {
        let rect = Rect::new(board_x + dx, pcb_y - dz - h - PORT_LIFT, w, h);
        builder.cutout(
            CutoutRole::Port(name),
            Shape::Rect {
                rect,
                corner_radius: PORT_RADIUS,
            },
            None,
        );
        builder.score(Shape::text(Point::new(rect.x, rect.y - 1.5), name, 2.0));
    }

    let jack = Point::new(
        board_x - JACK_OFFSET_X,
        z_to_y(dims, dims.z.bottom_top + JACK_HEIGHT),
    );
    builder.cutout(CutoutRole::PowerJack, Shape::circle(jack, JACK_RADIUS), None);
    builder.score(Shape::text(jack.translate(6.0, 1.0), "DC 12V", 2.0));

    add_vents(&mut builder, dims)?;
    builder.size_label();
    builder.build()
}

pub fn back(dims: &Dimensions) -> GeometryResult<Panel> {
    let mut builder = wall_builder(PanelKind::Back, dims);
    add_vents(&mut builder, dims)?;
    builder.size_label();
    builder.build()
}
