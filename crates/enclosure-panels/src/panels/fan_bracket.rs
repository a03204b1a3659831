//! Fan bracket: an internal shelf above the drives carrying the fan.
//!
//! It stands clear of every wall by the bracket clearance and is held only by
//! the corner rods, so its holes must line up with the caps'.

use super::{scheme, CutoutRole, Panel, PanelBuilder, PanelKind};
use crate::error::GeometryResult;
use crate::geometry::{Point, Shape, Side};
use crate::joints::EdgeTreatment;
use crate::params::Dimensions;

pub fn fan_bracket(dims: &Dimensions) -> GeometryResult<Panel> {
    let fan = &dims.params.fan;
    let c = fan.bracket_clearance;
    let width = dims.interior_x - 2.0 * c;
    let height = dims.exterior_y - 2.0 * c;
    let frame = scheme::fan_frame(dims);

    let clear = EdgeTreatment::FlatOverlap { overlap: -c };
    let mut builder = PanelBuilder::new(
        PanelKind::FanBracket,
        width,
        height,
        dims.bracket_thickness(),
        frame,
        dims,
    )
    .edge(Side::Top, clear)
    .edge(Side::Right, clear)
    .edge(Side::Bottom, clear)
    .edge(Side::Left, clear);

    for (x, y) in scheme::rod_positions(dims) {
        let local = Point::new(x - frame.u.origin, y - frame.v.origin);
        let inset = local
            .x
            .min(local.y)
            .min(width - local.x)
            .min(height - local.y);
        builder.cutout(
            CutoutRole::Rod,
            Shape::circle(local, dims.params.rods.clearance_hole / 2.0),
            Some(inset),
        );
    }

    let center = Point::new(width / 2.0, height / 2.0);
    builder.cutout(
        CutoutRole::FanOpening,
        Shape::circle(center, fan.opening / 2.0),
        None,
    );
    let half = fan.hole_spacing / 2.0;
    for (dx, dy) in [(-half, -half), (half, -half), (-half, half), (half, half)] {
        builder.cutout(
            CutoutRole::FanScrew,
            Shape::circle(center.translate(dx, dy), fan.mount_hole / 2.0),
            None,
        );
    }

    builder.size_label();
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Parameters;

    #[test]
    fn test_bracket_clears_walls() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let bracket = fan_bracket(&dims).unwrap();
        assert_eq!(bracket.width(), 183.0);
        assert_eq!(bracket.height(), 124.0);
        assert_eq!(bracket.thickness(), 5.0);
        assert_eq!(bracket.protrusion(), 0.0);
    }

    #[test]
    fn test_bracket_rods_map_to_enclosure_positions() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let bracket = fan_bracket(&dims).unwrap();
        let first = bracket
            .cutouts_by(CutoutRole::Rod)
            .next()
            .and_then(|c| c.center())
            .unwrap();
        assert!((first.x - 7.0).abs() < 1e-9);
        assert!((first.y - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_bracket_rod_inset_is_measured_from_its_own_edges() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let bracket = fan_bracket(&dims).unwrap();
        for rod in bracket.cutouts_by(CutoutRole::Rod) {
            let inset = rod.inset.unwrap();
            assert!((inset - 4.0).abs() < 1e-9, "inset {}", inset);
        }
    }

    #[test]
    fn test_bracket_carries_fan_mounting() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let bracket = fan_bracket(&dims).unwrap();
        assert_eq!(bracket.cutouts_by(CutoutRole::FanOpening).count(), 1);
        assert_eq!(bracket.cutouts_by(CutoutRole::FanScrew).count(), 4);
    }
}
