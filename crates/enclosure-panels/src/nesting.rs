//! Sheet nesting.
//!
//! Lays panels of the same stock thickness onto fixed-size sheets with a
//! simple shelf packer: tallest parts first, left to right, a new shelf when
//! the row is full and a new sheet when the shelf would run off the bottom.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::emit::SvgDocument;
use crate::error::{EmissionError, EmissionResult};
use crate::geometry::{Element, Point, Rect, Shape, EPSILON};
use crate::panels::{Panel, PanelKind};

/// Stock sheet size and spacing, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSpec {
    pub width: f64,
    pub height: f64,
    /// Space between parts.
    pub gap: f64,
    /// Unused border around the sheet.
    pub margin: f64,
}

impl Default for SheetSpec {
    fn default() -> Self {
        Self {
            width: 790.0,
            height: 384.0,
            gap: 3.0,
            margin: 3.0,
        }
    }
}

impl SheetSpec {
    fn usable_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    fn usable_height(&self) -> f64 {
        self.height - 2.0 * self.margin
    }

    fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.usable_width() + EPSILON && height <= self.usable_height() + EPSILON
    }
}

/// Left-to-right, top-to-bottom placement cursor.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LayoutCursor {
    x: f64,
    y: f64,
    row_height: f64,
    spacing: f64,
}

impl LayoutCursor {
    pub(crate) fn new(spacing: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            row_height: 0.0,
            spacing,
        }
    }

    /// Position the next part would take on the current row.
    pub(crate) fn peek(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub(crate) fn place(&mut self, width: f64, height: f64) -> (f64, f64) {
        let position = (self.x, self.y);
        self.x += width + self.spacing;
        self.row_height = self.row_height.max(height);
        position
    }

    pub(crate) fn next_row(&mut self) {
        self.y += self.row_height + self.spacing;
        self.x = 0.0;
        self.row_height = 0.0;
    }

    pub(crate) fn row_is_empty(&self) -> bool {
        self.x == 0.0
    }

    /// Bottom of everything placed so far.
    pub(crate) fn extent_y(&self) -> f64 {
        self.y + self.row_height
    }
}

/// A panel's position on a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub panel: PanelKind,
    /// Area the part occupies on the sheet.
    pub footprint: Rect,
    /// Turned a quarter turn to fit.
    pub rotated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sheet {
    pub index: usize,
    pub thickness: f64,
    pub spec: SheetSpec,
    pub placements: Vec<Placement>,
    #[serde(skip)]
    elements: Vec<Element>,
}

impl Sheet {
    pub fn file_name(&self) -> String {
        format!("sheet_{}mm_{:02}.svg", self.thickness, self.index + 1)
    }

    /// Cut and score geometry of every placed part; labels are left off.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn to_svg(&self) -> EmissionResult<String> {
        let page = Rect::new(0.0, 0.0, self.spec.width, self.spec.height);
        let mut doc = SvgDocument::new(self.file_name(), page);
        doc.push_all(&self.elements)?;
        Ok(doc.finish())
    }
}

/// Area covered by everything drawn except labels.
fn part_extent(panel: &Panel) -> Rect {
    panel
        .elements()
        .iter()
        .filter(|e| !matches!(e.shape, Shape::Text { .. }))
        .filter_map(|e| e.shape.extent())
        .fold(panel.cut_extent(), |acc, r| acc.union(&r))
}

/// Maps a panel's geometry into a footprint whose top-left corner is
/// `origin`, optionally turned so that local `(x, y)` lands at
/// `(h - y, x)`.
fn place_elements(panel: &Panel, origin: Point, rotated: bool) -> Vec<Element> {
    let extent = part_extent(panel);
    let transform = move |p: Point| {
        let lx = p.x - extent.x;
        let ly = p.y - extent.y;
        if rotated {
            Point::new(origin.x + extent.height - ly, origin.y + lx)
        } else {
            Point::new(origin.x + lx, origin.y + ly)
        }
    };
    panel
        .elements()
        .into_iter()
        .filter(|e| !matches!(e.shape, Shape::Text { .. }))
        .map(|e| Element {
            layer: e.layer,
            shape: e.shape.map_points(&transform),
        })
        .collect()
}

/// Groups panels by stock thickness and packs each group onto sheets.
pub fn nest(panels: &[Panel], spec: &SheetSpec) -> EmissionResult<Vec<Sheet>> {
    let mut groups: Vec<(f64, Vec<&Panel>)> = Vec::new();
    for panel in panels {
        match groups
            .iter_mut()
            .find(|(t, _)| (t - panel.thickness()).abs() < EPSILON)
        {
            Some((_, group)) => group.push(panel),
            None => groups.push((panel.thickness(), vec![panel])),
        }
    }
    groups.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut sheets = Vec::new();
    for (thickness, group) in groups {
        let mut parts = Vec::with_capacity(group.len());
        for panel in group {
            let extent = part_extent(panel);
            let (w, h) = (extent.width, extent.height);
            let rotated = if spec.fits(w, h) {
                false
            } else if spec.fits(h, w) {
                true
            } else {
                return Err(EmissionError::PartTooLarge {
                    panel: panel.kind(),
                    width: w,
                    height: h,
                    sheet_width: spec.width,
                    sheet_height: spec.height,
                });
            };
            let (w, h) = if rotated { (h, w) } else { (w, h) };
            parts.push((panel, w, h, rotated));
        }
        parts.sort_by(|a, b| b.2.total_cmp(&a.2));

        let mut cursor = LayoutCursor::new(spec.gap);
        let mut current = Sheet {
            index: sheets.len(),
            thickness,
            spec: *spec,
            placements: Vec::new(),
            elements: Vec::new(),
        };
        for (panel, w, h, rotated) in parts {
            if !cursor.row_is_empty() && cursor.peek().0 + w > spec.usable_width() + EPSILON {
                cursor.next_row();
            }
            if cursor.peek().1 + h > spec.usable_height() + EPSILON {
                let next = Sheet {
                    index: current.index + 1,
                    thickness,
                    spec: *spec,
                    placements: Vec::new(),
                    elements: Vec::new(),
                };
                sheets.push(std::mem::replace(&mut current, next));
                cursor = LayoutCursor::new(spec.gap);
            }
            let (x, y) = cursor.place(w, h);
            let origin = Point::new(spec.margin + x, spec.margin + y);
            debug!(panel = %panel.kind(), x = origin.x, y = origin.y, rotated, "Placed part");
            current.placements.push(Placement {
                panel: panel.kind(),
                footprint: Rect::new(origin.x, origin.y, w, h),
                rotated,
            });
            current
                .elements
                .extend(place_elements(panel, origin, rotated));
        }
        if !current.placements.is_empty() {
            sheets.push(current);
        }
    }

    info!(sheets = sheets.len(), parts = panels.len(), "Nested panels");
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panels::assemble;
    use crate::params::{Dimensions, Parameters};

    fn all_panels() -> Vec<Panel> {
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        PanelKind::ALL
            .iter()
            .map(|&k| assemble(k, &dims).unwrap())
            .collect()
    }

    #[test]
    fn test_cursor_wraps_rows() {
        let mut cursor = LayoutCursor::new(2.0);
        assert_eq!(cursor.place(10.0, 5.0), (0.0, 0.0));
        assert_eq!(cursor.place(10.0, 8.0), (12.0, 0.0));
        cursor.next_row();
        assert_eq!(cursor.place(4.0, 1.0), (0.0, 10.0));
        assert_eq!(cursor.extent_y(), 11.0);
    }

    #[test]
    fn test_sheets_hold_one_thickness_each() {
        let panels = all_panels();
        let sheets = nest(&panels, &SheetSpec::default()).unwrap();
        let placed: usize = sheets.iter().map(|s| s.placements.len()).sum();
        assert_eq!(placed, panels.len());
        for sheet in &sheets {
            for placement in &sheet.placements {
                let panel = panels.iter().find(|p| p.kind() == placement.panel).unwrap();
                assert_eq!(panel.thickness(), sheet.thickness);
            }
        }
    }

    #[test]
    fn test_parts_stay_on_sheet_and_apart() {
        let spec = SheetSpec::default();
        let sheets = nest(&all_panels(), &spec).unwrap();
        let usable = Rect::new(
            spec.margin,
            spec.margin,
            spec.width - 2.0 * spec.margin,
            spec.height - 2.0 * spec.margin,
        );
        for sheet in &sheets {
            for (i, a) in sheet.placements.iter().enumerate() {
                assert!(usable.contains_rect(&a.footprint));
                for b in &sheet.placements[i + 1..] {
                    assert!(a.footprint.gap(&b.footprint) >= spec.gap - 1e-9);
                }
            }
            sheet.to_svg().unwrap();
        }
    }

    #[test]
    fn test_sheet_svg_has_no_text() {
        let sheets = nest(&all_panels(), &SheetSpec::default()).unwrap();
        let svg = sheets[0].to_svg().unwrap();
        assert!(!svg.contains("<text"));
        assert!(svg.contains("<path"));
    }

    #[test]
    fn test_tall_part_is_rotated() {
        let spec = SheetSpec {
            width: 400.0,
            height: 250.0,
            ..SheetSpec::default()
        };
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let side = assemble(PanelKind::LeftSide, &dims).unwrap();
        let sheets = nest(std::slice::from_ref(&side), &spec).unwrap();
        let placement = sheets[0].placements[0];
        assert!(placement.rotated);
        assert!(placement.footprint.width > placement.footprint.height);
        sheets[0].to_svg().unwrap();
    }

    #[test]
    fn test_oversized_part_is_rejected() {
        let spec = SheetSpec {
            width: 100.0,
            height: 100.0,
            ..SheetSpec::default()
        };
        let dims = Dimensions::resolve(&Parameters::default()).unwrap();
        let front = assemble(PanelKind::Front, &dims).unwrap();
        assert!(matches!(
            nest(&[front], &spec),
            Err(EmissionError::PartTooLarge {
                panel: PanelKind::Front,
                ..
            })
        ));
    }
}
