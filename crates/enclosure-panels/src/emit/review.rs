//! Review sheet: every panel at 1:1 on a single page with a reference scale
//! bar, for checking a print against a ruler before cutting.

use tracing::debug;

use super::{margin_for, SvgDocument};
use crate::error::EmissionResult;
use crate::geometry::{Element, Point, Rect, Shape};
use crate::nesting::LayoutCursor;
use crate::panels::Panel;

/// Row width after which panels wrap onto the next row.
pub const REVIEW_ROW_WIDTH: f64 = 700.0;
pub const SCALE_BAR_LENGTH: f64 = 100.0;
const SCALE_TICK: f64 = 10.0;
const SPACING: f64 = 10.0;
/// Band reserved above the panels for the scale bar.
const HEADER: f64 = 20.0;

pub const REVIEW_FILE_NAME: &str = "00_review.svg";

fn scale_bar(origin: Point) -> Vec<Element> {
    let mut elements = vec![Element::cut(Shape::Path {
        points: vec![origin, origin.translate(SCALE_BAR_LENGTH, 0.0)],
        closed: false,
    })];
    let ticks = (SCALE_BAR_LENGTH / SCALE_TICK).round() as usize;
    for i in 0..=ticks {
        let x = origin.x + i as f64 * SCALE_TICK;
        let len = if i % 5 == 0 { 4.0 } else { 2.0 };
        elements.push(Element::cut(Shape::Path {
            points: vec![Point::new(x, origin.y), Point::new(x, origin.y - len)],
            closed: false,
        }));
    }
    elements.push(Element::score(Shape::text(
        origin.translate(SCALE_BAR_LENGTH + 3.0, 0.0),
        format!("{} mm", SCALE_BAR_LENGTH),
        3.0,
    )));
    elements
}

/// One SVG page holding every panel in its own cell.
pub fn review_svg(panels: &[Panel]) -> EmissionResult<String> {
    let mut cursor = LayoutCursor::new(SPACING);
    let mut cells = Vec::with_capacity(panels.len());
    for panel in panels {
        let cell = panel.bounds().inflate(margin_for(panel));
        if !cursor.row_is_empty() && cursor.peek().0 + cell.width > REVIEW_ROW_WIDTH {
            cursor.next_row();
        }
        let (x, y) = cursor.place(cell.width, cell.height);
        cells.push((panel, cell, Point::new(x, HEADER + y)));
    }

    let width = cells
        .iter()
        .map(|(_, cell, at)| at.x + cell.width)
        .fold(SCALE_BAR_LENGTH + 30.0, f64::max);
    let page = Rect::new(0.0, 0.0, width, HEADER + cursor.extent_y());
    let mut doc = SvgDocument::new("review", page);

    doc.push_all(&scale_bar(Point::new(5.0, HEADER / 2.0)))?;
    for (panel, cell, at) in cells {
        debug!(panel = %panel.kind(), x = at.x, y = at.y, "Review cell");
        let dx = at.x - cell.x;
        let dy = at.y - cell.y;
        for element in panel.elements() {
            doc.push(&Element {
                layer: element.layer,
                shape: element.shape.map_points(&|p: Point| p.translate(dx, dy)),
            })?;
        }
    }
    Ok(doc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::{assemble, PanelKind};
    use crate::params::{Dimensions, Parameters};

    #[test]
    fn test_scale_bar_is_one_hundred_mm() {
        let bar = scale_bar(Point::new(5.0, 10.0));
        match &bar[0].shape {
            Shape::Path { points, .. } => {
                assert_eq!(points[1].x - points[0].x, 100.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
        // Eleven ticks, the bar itself and the caption.
        assert_eq!(bar.len(), 13);
    }

    #[test]
    fn test_review_holds_every_panel() {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let panels: Vec<Panel> = PanelKind::ALL
            .iter()
            .map(|&k| assemble(k, &dims).unwrap())
            .collect();
        let svg = review_svg(&panels).unwrap();
        assert!(svg.contains("100 mm"));
        for kind in PanelKind::ALL {
            assert!(svg.contains(kind.label()), "missing label for {}", kind);
        }
    }
}
