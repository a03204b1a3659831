//! Outline tracing and kerf compensation.

use cavalier_contours::polyline::{PlineSource, PlineSourceMut, PlineVertex, Polyline};
use std::cmp::Ordering;
use std::panic;
use tracing::warn;

use super::{Cutout, CutoutRole};
use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{signed_area, simplify_closed, Point, Rect, Shape, Side};
use crate::joints::EdgeTreatment;

/// Traces a closed outline clockwise from the top-left corner, applying each
/// edge's profile. Edges are given in [`Side::ALL`] order.
pub fn rect_outline(
    width: f64,
    height: f64,
    edges: &[EdgeTreatment; 4],
) -> GeometryResult<Vec<Point>> {
    let mut points = Vec::new();

    for (along, offset) in edges[Side::Top.index()].profile(width)? {
        points.push(Point::new(along, -offset));
    }
    for (along, offset) in edges[Side::Right.index()].profile(height)? {
        points.push(Point::new(width + offset, along));
    }
    for (along, offset) in edges[Side::Bottom.index()].profile(width)?.into_iter().rev() {
        points.push(Point::new(along, height + offset));
    }
    for (along, offset) in edges[Side::Left.index()].profile(height)?.into_iter().rev() {
        points.push(Point::new(-offset, along));
    }

    Ok(simplify_closed(&points))
}

/// Rectangular slots for every through-slot edge, one per tooth.
pub fn through_slots(
    width: f64,
    height: f64,
    edges: &[EdgeTreatment; 4],
) -> GeometryResult<Vec<Cutout>> {
    let mut slots = Vec::new();
    for side in Side::ALL {
        let EdgeTreatment::ThroughSlot { joint, inset } = &edges[side.index()] else {
            continue;
        };
        let layout = joint.layout()?;
        let depth = layout.depth;
        for tooth in layout.teeth() {
            let w = tooth.width();
            let rect = match side {
                Side::Top => Rect::new(tooth.start, *inset, w, depth),
                Side::Bottom => Rect::new(tooth.start, height - inset - depth, w, depth),
                Side::Left => Rect::new(*inset, tooth.start, depth, w),
                Side::Right => Rect::new(width - inset - depth, tooth.start, depth, w),
            };
            slots.push(Cutout {
                role: CutoutRole::EdgeSlot(side),
                shape: Shape::rect(rect),
                inset: Some(*inset),
            });
        }
    }
    Ok(slots)
}

/// Grows the outline and shrinks every cutout by half the kerf.
pub fn apply_kerf(
    outline: Vec<Point>,
    cutouts: Vec<Cutout>,
    kerf: f64,
) -> GeometryResult<(Vec<Point>, Vec<Cutout>)> {
    let half = kerf / 2.0;
    let outline = offset_closed(&outline, half)?;
    let cutouts = cutouts
        .into_iter()
        .map(|cutout| {
            let shape = match cutout.shape {
                Shape::Circle { center, radius } => Shape::Circle {
                    center,
                    radius: radius - half,
                },
                Shape::Rect {
                    rect,
                    corner_radius,
                } => Shape::Rect {
                    rect: rect.inflate(-half),
                    corner_radius: (corner_radius - half).max(0.0),
                },
                Shape::Path { points, closed } => Shape::Path {
                    points: offset_closed(&points, -half)?,
                    closed,
                },
                text @ Shape::Text { .. } => text,
            };
            Ok(Cutout { shape, ..cutout })
        })
        .collect::<GeometryResult<Vec<_>>>()?;
    Ok((outline, cutouts))
}

fn to_clockwise_pline(points: &[Point]) -> Polyline<f64> {
    let mut ordered = points.to_vec();
    if signed_area(&ordered) > 0.0 {
        ordered.reverse();
    }
    let mut pline = Polyline::new();
    for p in ordered {
        pline.add_vertex(PlineVertex::new(p.x, p.y, 0.0));
    }
    pline.set_is_closed(true);
    pline
}

/// Parallel offset of a closed loop; positive grows it, negative shrinks it.
/// Rounded corners from the offset are flattened back to points.
pub fn offset_closed(points: &[Point], distance: f64) -> GeometryResult<Vec<Point>> {
    if distance == 0.0 {
        return Ok(points.to_vec());
    }
    let pline = to_clockwise_pline(points);
    let base_area = signed_area(points).abs();

    let attempt = |d: f64| -> Option<Polyline<f64>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| pline.parallel_offset(d))) {
            Ok(results) => results.into_iter().max_by(|a, b| {
                a.area()
                    .abs()
                    .partial_cmp(&b.area().abs())
                    .unwrap_or(Ordering::Equal)
            }),
            Err(_) => {
                warn!("Panic during parallel offset of outline");
                None
            }
        }
    };

    let failed = || GeometryError::Offset {
        offset: distance,
        reason: "offset produced no closed loop".to_string(),
    };

    let mut result = attempt(distance).ok_or_else(failed)?;
    let grew = result.area().abs() > base_area;
    if grew != (distance > 0.0) {
        result = attempt(-distance).ok_or_else(failed)?;
    }
    Ok(flatten(&result))
}

/// Converts a polyline with arc segments into straight segments no longer
/// than about half a millimetre.
fn flatten(pline: &Polyline<f64>) -> Vec<Point> {
    let vertices = &pline.vertex_data;
    let n = vertices.len();
    let mut points = Vec::with_capacity(n);
    for i in 0..n {
        let v0 = vertices[i];
        let v1 = vertices[(i + 1) % n];
        let p0 = Point::new(v0.x, v0.y);
        points.push(p0);
        if v0.bulge.abs() < 1e-9 {
            continue;
        }
        let p1 = Point::new(v1.x, v1.y);
        let chord = p0.distance(p1);
        if chord < 1e-9 {
            continue;
        }
        let b = v0.bulge;
        let sweep = 4.0 * b.atan();
        let (mx, my) = ((p0.x + p1.x) / 2.0, (p0.y + p1.y) / 2.0);
        let (nx, ny) = (-(p1.y - p0.y) / chord, (p1.x - p0.x) / chord);
        let offset = chord * (1.0 - b * b) / (4.0 * b);
        let center = Point::new(mx + nx * offset, my + ny * offset);
        let radius = center.distance(p0);
        let start = (p0.y - center.y).atan2(p0.x - center.x);
        let steps = ((radius * sweep.abs()) / 0.5).ceil().max(2.0) as usize;
        for s in 1..steps {
            let angle = start + sweep * s as f64 / steps as f64;
            points.push(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joints::JointSpec;

    fn square(size: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]
    }

    #[test]
    fn test_plain_rectangle_has_four_corners() {
        let outline = rect_outline(100.0, 50.0, &[EdgeTreatment::Straight; 4]).unwrap();
        assert_eq!(outline.len(), 4);
    }

    #[test]
    fn test_protrusions_extend_outline() {
        let tab = EdgeTreatment::FingerProtrusion(JointSpec::new(138.0, 12.0, 3.0));
        let edges = [tab, EdgeTreatment::Straight, tab, EdgeTreatment::Straight];
        let outline = rect_outline(138.0, 100.0, &edges).unwrap();
        let min_y = outline.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = outline.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(min_y, -3.0);
        assert_eq!(max_y, 103.0);
    }

    #[test]
    fn test_notches_stay_inside_bounds() {
        let notch = EdgeTreatment::FingerNotch(JointSpec::new(138.0, 12.0, 3.0));
        let edges = [EdgeTreatment::Straight, notch, EdgeTreatment::Straight, notch];
        let outline = rect_outline(191.0, 138.0, &edges).unwrap();
        let bounds = Rect::new(0.0, 0.0, 191.0, 138.0);
        assert!(outline.iter().all(|p| bounds.contains_point(*p)));
        // Corner notches remove the original corner points.
        assert!(!outline.contains(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_through_slots_follow_teeth() {
        let joint = JointSpec::new(185.0, 12.0, 3.0).at(3.0).skipping_ends();
        let edges = [
            EdgeTreatment::ThroughSlot { joint, inset: 3.0 },
            EdgeTreatment::Straight,
            EdgeTreatment::Straight,
            EdgeTreatment::Straight,
        ];
        let slots = through_slots(191.0, 138.0, &edges).unwrap();
        assert_eq!(slots.len(), 6);
        for slot in &slots {
            let Shape::Rect { rect, .. } = slot.shape else {
                panic!("slot is not a rectangle");
            };
            assert_eq!(rect.y, 3.0);
            assert_eq!(rect.height, 3.0);
        }
    }

    #[test]
    fn test_offset_grows_and_shrinks() {
        let grown = offset_closed(&square(10.0), 0.5).unwrap();
        assert!(signed_area(&grown).abs() > 100.0);
        let shrunk = offset_closed(&square(10.0), -0.5).unwrap();
        assert!((signed_area(&shrunk).abs() - 81.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_kerf_is_identity() {
        let pts = square(10.0);
        assert_eq!(offset_closed(&pts, 0.0).unwrap(), pts);
    }
}
