//! Bottom and top panels ("caps").
//!
//! Both caps span the full exterior width and the full panel depth. The
//! side panels' fingers drop into notches along the left and right edges,
//! and the front and back panels pass through slot rows near the front and
//! back edges. Four corner rods clamp the stack together.

use tracing::debug;

use super::{require_inside, scheme, CutoutRole, Panel, PanelBuilder, PanelKind};
use crate::error::GeometryResult;
use crate::geometry::{Point, Rect, Shape, Side};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;
use crate::vents::{finger_guard, slot_grid, FingerGuard, SlotPattern};

/// SD card slot position along the board's short edge, from the GPIO corner.
const SD_SLOT_START: f64 = 22.05;
const SD_SLOT_END: f64 = 34.0;
const SD_HOLE_WIDTH: f64 = 14.0;
const SD_HOLE_LENGTH: f64 = 20.0;
const SD_HOLE_RADIUS: f64 = 3.0;

/// Margin kept clear around each mounting hole by the vent grid.
const MOUNT_KEEP_OUT: f64 = 4.0;
const SD_KEEP_OUT: f64 = 2.0;

fn cap_builder(kind: PanelKind, dims: &Dimensions) -> PanelBuilder {
    let slot_joint = scheme::wall_cap_joint(dims).at(dims.wall);
    let inset = dims.params.wall.side_overhang;
    let notch = EdgeTreatment::FingerNotch(scheme::side_cap_joint(dims));

    let mut builder = PanelBuilder::new(
        kind,
        dims.exterior_x,
        dims.panel_depth,
        dims.wall,
        scheme::cap_frame(dims, kind),
        dims,
    )
    .edge(
        Side::Top,
        EdgeTreatment::ThroughSlot {
            joint: slot_joint,
            inset,
        },
    )
    .edge(
        Side::Bottom,
        EdgeTreatment::ThroughSlot {
            joint: slot_joint,
            inset,
        },
    )
    .edge(Side::Left, notch)
    .edge(Side::Right, notch);

    let rods = &dims.params.rods;
    for (x, y) in scheme::rod_positions(dims) {
        let center = Point::new(x, y);
        builder.cutout(
            CutoutRole::Rod,
            Shape::circle(center, rods.clearance_hole / 2.0),
            Some(dims.rod_inset),
        );
        if rods.grommet_od > 0.0 {
            builder.score(Shape::circle(center, rods.grommet_od / 2.0));
        }
    }
    builder
}

fn rod_keep_outs(dims: &Dimensions) -> Vec<Rect> {
    let size = dims.params.rods.grommet_od.max(dims.params.rods.clearance_hole)
        + 2.0 * dims.params.vents.min_bridge;
    scheme::rod_positions(dims)
        .iter()
        .map(|&(x, y)| Rect::from_center(Point::new(x, y), size, size))
        .collect()
}

pub fn bottom(dims: &Dimensions) -> GeometryResult<Panel> {
    let mut builder = cap_builder(PanelKind::Bottom, dims);
    let board = &dims.params.board;
    let bounds = Rect::new(0.0, 0.0, dims.exterior_x, dims.panel_depth);

    // Ports face the front panel: the board's long edge runs front to back.
    let origin = Point::new(
        (dims.exterior_x - board.width) / 2.0,
        dims.overlap + board.front_clearance,
    );
    let footprint = Rect::new(origin.x, origin.y, board.width, board.length);
    require_inside(bounds, footprint, "board footprint")?;

    let min_bridge = dims.params.vents.min_bridge;
    let mount_keep_out = MOUNT_KEEP_OUT.max(board.hole_diameter / 2.0 + min_bridge);
    let mut keep_out = rod_keep_outs(dims);
    let native = [
        (board.hole_offset, board.hole_offset),
        (board.hole_offset + board.hole_spacing_x, board.hole_offset),
        (board.hole_offset, board.hole_offset + board.hole_spacing_y),
        (
            board.hole_offset + board.hole_spacing_x,
            board.hole_offset + board.hole_spacing_y,
        ),
    ];
    for (nx, ny) in native {
        let center = Point::new(origin.x + ny, origin.y + board.length - nx);
        builder.cutout(
            CutoutRole::BoardMount,
            Shape::circle(center, board.hole_diameter / 2.0),
            None,
        );
        keep_out.push(Rect::from_center(
            center,
            2.0 * mount_keep_out,
            2.0 * mount_keep_out,
        ));
    }

    // SD card sits on the rear short edge; the hole runs past it for a finger.
    let sd = Rect::new(
        origin.x + SD_SLOT_START + (SD_SLOT_END - SD_SLOT_START - SD_HOLE_WIDTH) / 2.0,
        origin.y + board.length - SD_HOLE_LENGTH / 4.0,
        SD_HOLE_WIDTH,
        SD_HOLE_LENGTH,
    );
    builder.cutout(
        CutoutRole::SdAccess,
        Shape::Rect {
            rect: sd,
            corner_radius: SD_HOLE_RADIUS,
        },
        None,
    );
    keep_out.push(sd.inflate(SD_KEEP_OUT.max(min_bridge)));

    let vents = &dims.params.vents;
    let region = Rect::new(
        dims.wall + 5.0,
        dims.overlap + 5.0,
        dims.exterior_x - 2.0 * (dims.wall + 5.0),
        dims.panel_depth - 2.0 * (dims.overlap + 5.0),
    );
    let pattern = SlotPattern {
        length: vents.grid_slot_length,
        height: vents.grid_slot_height,
        bridge: vents.grid_bridge,
    };
    let slots = slot_grid(region, &pattern, &keep_out)?;
    debug!(count = slots.len(), "bottom panel vent grid");
    for slot in slots {
        builder.cutout(CutoutRole::Vent, Shape::slot(slot), None);
    }

    builder.score(Shape::rect(footprint));
    builder.score(Shape::text(
        Point::new(sd.x, sd.y - 1.5),
        "SD card",
        2.0,
    ));
    builder.score(Shape::text(
        Point::new(origin.x + 2.0, origin.y + 10.0),
        "BOARD (ports at front)",
        3.0,
    ));
    builder.size_label();
    builder.build()
}

pub fn top(dims: &Dimensions) -> GeometryResult<Panel> {
    let mut builder = cap_builder(PanelKind::Top, dims);
    let fan = &dims.params.fan;
    let vents = &dims.params.vents;

    // Fan and grille sit on the enclosure's centre line.
    let center = Point::new(dims.exterior_x / 2.0, dims.panel_depth / 2.0);
    let guard = FingerGuard {
        outer_radius: fan.opening / 2.0,
        hub_radius: vents.grille_hub,
        slot_width: vents.grille_slot_width,
        ring_gap: vents.grille_ring_gap,
        spoke: vents.grille_spoke,
        min_bridge: vents.min_bridge,
    };
    let slots = finger_guard(center, &guard)?;
    debug!(count = slots.len(), "top panel grille slots");
    for slot in &slots {
        builder.cutout(CutoutRole::Grille, Shape::closed_path(slot.to_polygon()), None);
    }

    builder.score(Shape::rect(Rect::from_center(center, fan.size, fan.size)));
    builder.size_label();
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    fn dims() -> Dimensions {
        Dimensions::resolve(&Parameters::default()).unwrap()
    }

    #[test]
    fn test_caps_share_rod_holes() {
        let dims = dims();
        let bottom = bottom(&dims).unwrap();
        let top = top(&dims).unwrap();
        let centers = |p: &Panel| -> Vec<Point> {
            p.cutouts_by(CutoutRole::Rod)
                .filter_map(|c| c.center())
                .collect()
        };
        assert_eq!(centers(&bottom), centers(&top));
        assert_eq!(centers(&bottom)[0], Point::new(11.0, 11.0));
    }

    #[test]
    fn test_bottom_has_board_and_sd_access() {
        let bottom = bottom(&dims()).unwrap();
        assert_eq!(bottom.cutouts_by(CutoutRole::BoardMount).count(), 4);
        assert_eq!(bottom.cutouts_by(CutoutRole::SdAccess).count(), 1);
        assert!(bottom.cutouts_by(CutoutRole::Vent).count() > 40);
    }

    #[test]
    fn test_bottom_vents_avoid_mounting_holes() {
        let bottom = bottom(&dims()).unwrap();
        let holes: Vec<Rect> = bottom
            .cutouts_by(CutoutRole::BoardMount)
            .filter_map(|c| c.shape.extent())
            .collect();
        for vent in bottom.cutouts_by(CutoutRole::Vent) {
            let extent = vent.shape.extent().unwrap();
            assert!(holes.iter().all(|h| !h.intersects(&extent)));
        }
    }

    #[test]
    fn test_cap_slot_rows_match_wall_fingers() {
        let top = top(&dims()).unwrap();
        let front_slots = top.cutouts_by(CutoutRole::EdgeSlot(Side::Top)).count();
        let back_slots = top.cutouts_by(CutoutRole::EdgeSlot(Side::Bottom)).count();
        assert_eq!(front_slots, 6);
        assert_eq!(back_slots, 6);
    }

    #[test]
    fn test_top_grille_is_centred() {
        let top = top(&dims()).unwrap();
        let grille: Vec<_> = top.cutouts_by(CutoutRole::Grille).collect();
        assert!(!grille.is_empty());
        let union = grille
            .iter()
            .filter_map(|c| c.shape.extent())
            .reduce(|a, b| a.union(&b))
            .unwrap();
        let c = union.center();
        assert!((c.x - 95.5).abs() < 0.5);
        assert!((c.y - 69.0).abs() < 0.5);
    }
}
