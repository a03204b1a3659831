//! DXF writer.
//!
//! Geometry goes onto two layers, `CUT` in red and `SCORE` in blue. DXF is
//! y-up, so panel coordinates are mirrored about the x axis on the way out.

use dxf::entities::{Circle, Entity, EntityType, LwPolyline, Text};
use dxf::enums::AcadVersion;
use dxf::tables::Layer as DxfLayer;
use dxf::{Color, Drawing, LwPolylineVertex};

use super::{check_bounds, page_for};
use crate::error::{EmissionError, EmissionResult};
use crate::geometry::{Element, Layer, Point, Rect, Shape, EPSILON};
use crate::panels::Panel;

pub const CUT_LAYER: &str = "CUT";
pub const SCORE_LAYER: &str = "SCORE";
const CUT_ACI: u8 = 1;
const SCORE_ACI: u8 = 5;

/// Bulge of a quarter-circle arc traversed counter-clockwise.
const QUARTER_BULGE: f64 = 0.414_213_562_373_095_1;

fn layer_name(layer: Layer) -> &'static str {
    match layer {
        Layer::Cut => CUT_LAYER,
        Layer::Score => SCORE_LAYER,
    }
}

fn flip(p: Point) -> dxf::Point {
    dxf::Point::new(p.x, -p.y, 0.0)
}

fn vertex(x: f64, y: f64, bulge: f64) -> LwPolylineVertex {
    let mut v = LwPolylineVertex::default();
    v.x = x;
    v.y = y;
    v.bulge = bulge;
    v
}

/// Pushes a vertex, merging it into the previous one when they coincide so
/// the later bulge wins.
fn push_vertex(vertices: &mut Vec<LwPolylineVertex>, v: LwPolylineVertex) {
    if let Some(last) = vertices.last_mut() {
        if (last.x - v.x).abs() < EPSILON && (last.y - v.y).abs() < EPSILON {
            last.bulge = v.bulge;
            return;
        }
    }
    vertices.push(v);
}

/// Closed polyline for a rectangle in DXF space, corners rounded with bulges.
fn rounded_rect(rect: Rect, radius: f64) -> LwPolyline {
    // Mirror first so the walk below is counter-clockwise in y-up space.
    let x0 = rect.x;
    let x1 = rect.max_x();
    let y0 = -rect.max_y();
    let y1 = -rect.y;
    let r = radius.clamp(0.0, rect.width.min(rect.height) / 2.0);

    let mut vertices = Vec::with_capacity(8);
    if r < EPSILON {
        for (x, y) in [(x0, y0), (x1, y0), (x1, y1), (x0, y1)] {
            vertices.push(vertex(x, y, 0.0));
        }
    } else {
        let corners = [
            ((x1 - r, y0), (x1, y0 + r)),
            ((x1, y1 - r), (x1 - r, y1)),
            ((x0 + r, y1), (x0, y1 - r)),
            ((x0, y0 + r), (x0 + r, y0)),
        ];
        for ((sx, sy), (ex, ey)) in corners {
            push_vertex(&mut vertices, vertex(sx, sy, QUARTER_BULGE));
            push_vertex(&mut vertices, vertex(ex, ey, 0.0));
        }
        if vertices.len() > 1 {
            let first = vertices[0].clone();
            if let Some(last) = vertices.last() {
                if (last.x - first.x).abs() < EPSILON && (last.y - first.y).abs() < EPSILON {
                    vertices.pop();
                }
            }
        }
    }

    let mut poly = LwPolyline::default();
    poly.set_is_closed(true);
    poly.vertices = vertices;
    poly
}

fn to_entity(element: &Element) -> Entity {
    let specific = match &element.shape {
        Shape::Path { points, closed } => {
            let mut poly = LwPolyline::default();
            poly.set_is_closed(*closed);
            poly.vertices = points
                .iter()
                .map(|p| vertex(p.x, -p.y, 0.0))
                .collect();
            EntityType::LwPolyline(poly)
        }
        Shape::Rect {
            rect,
            corner_radius,
        } => EntityType::LwPolyline(rounded_rect(*rect, *corner_radius)),
        Shape::Circle { center, radius } => {
            let mut circle = Circle::default();
            circle.center = flip(*center);
            circle.radius = *radius;
            EntityType::Circle(circle)
        }
        Shape::Text { at, text, size } => {
            let mut dxf_text = Text::default();
            dxf_text.location = flip(*at);
            dxf_text.text_height = *size;
            dxf_text.value = text.clone();
            EntityType::Text(dxf_text)
        }
    };
    let mut entity = Entity::new(specific);
    entity.common.layer = layer_name(element.layer).to_string();
    entity
}

/// Builds the drawing for a set of elements, checking each against `page`.
pub fn drawing_for(name: &str, page: &Rect, elements: &[Element]) -> EmissionResult<Drawing> {
    let mut drawing = Drawing::new();
    // LWPOLYLINE needs R14 or later.
    drawing.header.version = AcadVersion::R2000;

    for (name, aci) in [(CUT_LAYER, CUT_ACI), (SCORE_LAYER, SCORE_ACI)] {
        let mut layer = DxfLayer::default();
        layer.name = name.to_string();
        layer.color = Color::from_index(aci);
        drawing.add_layer(layer);
    }

    for element in elements {
        check_bounds(name, page, element)?;
        drawing.add_entity(to_entity(element));
    }
    Ok(drawing)
}

/// Serialized DXF document for one panel.
pub fn panel_dxf(panel: &Panel) -> EmissionResult<Vec<u8>> {
    let drawing = drawing_for(panel.kind().file_stem(), &page_for(panel), &panel.elements())?;
    let mut buf = Vec::new();
    drawing
        .save(&mut buf)
        .map_err(|e| EmissionError::Dxf(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::{assemble, PanelKind};
    use crate::params::{Dimensions, Parameters};

    #[test]
    fn test_plain_rect_has_four_vertices() {
        let poly = rounded_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 0.0);
        assert_eq!(poly.vertices.len(), 4);
        assert!(poly.vertices.iter().all(|v| v.bulge == 0.0));
        assert!(poly.vertices.iter().all(|v| v.y <= 0.0));
    }

    #[test]
    fn test_full_slot_collapses_straight_ends() {
        // A 10x4 slot has straight long sides and semicircular ends.
        let poly = rounded_rect(Rect::new(0.0, 0.0, 10.0, 4.0), 2.0);
        assert_eq!(poly.vertices.len(), 6);
        let arcs = poly.vertices.iter().filter(|v| v.bulge > 0.0).count();
        assert_eq!(arcs, 4);
    }

    #[test]
    fn test_round_cornered_rect_has_eight_vertices() {
        let poly = rounded_rect(Rect::new(0.0, 0.0, 20.0, 10.0), 1.5);
        assert_eq!(poly.vertices.len(), 8);
    }

    #[test]
    fn test_entities_land_on_named_layers() {
        let page = Rect::new(-5.0, -5.0, 30.0, 30.0);
        let elements = vec![
            Element::cut(Shape::circle(Point::new(10.0, 10.0), 2.0)),
            Element::score(Shape::text(Point::new(0.0, -2.0), "X", 2.0)),
        ];
        let drawing = drawing_for("probe", &page, &elements).unwrap();
        let layers: Vec<String> = drawing.entities().map(|e| e.common.layer.clone()).collect();
        assert_eq!(layers, vec![CUT_LAYER.to_string(), SCORE_LAYER.to_string()]);
    }

    #[test]
    fn test_off_page_geometry_fails() {
        let page = Rect::new(0.0, 0.0, 10.0, 10.0);
        let elements = vec![Element::cut(Shape::circle(Point::new(9.0, 5.0), 2.0))];
        assert!(matches!(
            drawing_for("probe", &page, &elements),
            Err(EmissionError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_panel_dxf_serializes() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let panel = assemble(PanelKind::FanBracket, &dims).unwrap();
        let bytes = panel_dxf(&panel).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("LWPOLYLINE"));
        assert!(text.contains("CUT"));
        assert!(text.trim_end().ends_with("EOF"));
    }
}
