//! Drive comb rails.
//!
//! A horizontal bar spans between the side panels with one tab at each end
//! and one tooth per drive hanging below it. Each drive is screwed to the
//! face of its tooth, front rail and rear rail alike.

use super::{
    require_inside, scheme, CombLayout, CutoutRole, Panel, PanelBuilder, PanelDetail, PanelKind,
    RailPosition,
};
use crate::error::GeometryResult;
use crate::geometry::{simplify_closed, Point, Rect, Shape, Side};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;

/// One tooth per drive, centred as a group across `width`.
pub fn tooth_rects(dims: &Dimensions, width: f64) -> Vec<Rect> {
    let drives = &dims.params.drives;
    let comb = &dims.params.comb;
    let first_center = (width - drives.count as f64 * drives.pitch) / 2.0 + drives.pitch / 2.0;
    (0..drives.count)
        .map(|i| {
            let center = first_center + i as f64 * drives.pitch;
            Rect::new(
                center - comb.tooth_width / 2.0,
                comb.bar_height,
                comb.tooth_width,
                dims.comb_height - comb.bar_height,
            )
        })
        .collect()
}

fn rail_outline(
    width: f64,
    height: f64,
    bar_height: f64,
    tab: &EdgeTreatment,
    teeth: &[Rect],
) -> GeometryResult<Vec<Point>> {
    let mut points = vec![Point::new(0.0, 0.0), Point::new(width, 0.0)];
    for (along, offset) in tab.profile(bar_height)? {
        points.push(Point::new(width + offset, along));
    }
    for tooth in teeth.iter().rev() {
        points.push(Point::new(tooth.max_x(), bar_height));
        points.push(Point::new(tooth.max_x(), height));
        points.push(Point::new(tooth.x, height));
        points.push(Point::new(tooth.x, bar_height));
    }
    for (along, offset) in tab.profile(bar_height)?.into_iter().rev() {
        points.push(Point::new(-offset, along));
    }
    Ok(simplify_closed(&points))
}

pub fn comb_rail(position: RailPosition, dims: &Dimensions) -> GeometryResult<Panel> {
    let comb = &dims.params.comb;
    let drives = &dims.params.drives;
    let width = dims.interior_x;
    let height = dims.comb_height;

    let joint = scheme::rail_side_joint(dims).at(scheme::rail_tab_origin(dims));
    let tab = EdgeTreatment::OuterTab(joint);
    let teeth = tooth_rects(dims, width);
    let outline = rail_outline(width, height, comb.bar_height, &tab, &teeth)?;

    let layout = CombLayout {
        position,
        center_y: dims.rail_center_y[position.index()],
        thickness: comb.thickness,
        tooth_pitch: drives.pitch,
        tooth_width: comb.tooth_width,
        teeth: teeth.clone(),
        screw_holes_per_tooth: drives.side_hole_z.len(),
    };

    let mut builder = PanelBuilder::new(
        PanelKind::CombRail(position),
        width,
        height,
        comb.thickness,
        scheme::rail_frame(dims, position),
        dims,
    )
    .edge(Side::Right, tab)
    .edge(Side::Left, tab)
    .outline(outline)
    .detail(PanelDetail::Comb(layout));

    // Rail y = 0 is the drive top; the drive's connector end is `length` below.
    for (i, tooth) in teeth.iter().enumerate() {
        let cx = tooth.center().x;
        for &hz in &drives.side_hole_z {
            let center = Point::new(cx, drives.length - hz);
            let hole = Shape::circle(center, drives.screw_hole / 2.0);
            if let Some(extent) = hole.extent() {
                require_inside(*tooth, extent, "drive screw")?;
            }
            builder.cutout(CutoutRole::DriveScrew, hole, None);
            if drives.washer_od > 0.0 {
                builder.score(Shape::circle(center, drives.washer_od / 2.0));
            }
        }

        let footprint = Rect::new(
            cx - drives.thickness / 2.0,
            0.0,
            drives.thickness,
            drives.length.min(height),
        );
        builder.score(Shape::rect(footprint));
        builder.score(Shape::text(
            Point::new(tooth.x + 1.0, (comb.bar_height + height) / 2.0),
            format!("HDD{}", i + 1),
            3.0,
        ));
    }

    builder.size_label();
    builder.build()
}
