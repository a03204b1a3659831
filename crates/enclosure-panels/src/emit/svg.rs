//! SVG writer.
//!
//! Cut geometry is stroked red and score geometry blue, both hairline with no
//! fill, which is what most laser drivers map to vector cut and vector
//! engrave. Labels are filled grey text on the score layer.

use std::fmt::Write as _;

use super::{check_bounds, page_for};
use crate::error::EmissionResult;
use crate::geometry::{Element, Layer, Point, Rect, Shape};
use crate::panels::Panel;

pub const CUT_COLOR: &str = "#ff0000";
pub const SCORE_COLOR: &str = "#0000ff";
pub const TEXT_COLOR: &str = "#999";
pub const STROKE_WIDTH: f64 = 0.1;

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub fn fmt_num(value: f64) -> String {
    let mut s = format!("{:.3}", value);
    if s.contains('.') {
        while s.ends_with('0') {
            s.pop();
        }
        if s.ends_with('.') {
            s.pop();
        }
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn path_data(points: &[Point], closed: bool) -> String {
    let mut d = String::new();
    for (i, p) in points.iter().enumerate() {
        let cmd = if i == 0 { "M" } else { "L" };
        let _ = write!(d, "{} {} {} ", cmd, fmt_num(p.x), fmt_num(p.y));
    }
    if closed {
        d.push('Z');
    }
    d.trim_end().to_string()
}

/// An SVG page in millimetres whose viewBox is the given page rectangle.
#[derive(Debug, Clone)]
pub struct SvgDocument {
    name: String,
    page: Rect,
    cut: String,
    score: String,
}

impl SvgDocument {
    pub fn new(name: impl Into<String>, page: Rect) -> Self {
        Self {
            name: name.into(),
            page,
            cut: String::new(),
            score: String::new(),
        }
    }

    /// Empty document sized for a panel, named after its file stem.
    pub fn for_panel(panel: &Panel) -> Self {
        Self::new(panel.kind().file_stem(), page_for(panel))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page(&self) -> Rect {
        self.page
    }

    /// Appends an element after checking it stays on the page.
    pub fn push(&mut self, element: &Element) -> EmissionResult<()> {
        check_bounds(&self.name, &self.page, element)?;
        let body = match element.layer {
            Layer::Cut => &mut self.cut,
            Layer::Score => &mut self.score,
        };
        write_shape(body, &element.shape);
        Ok(())
    }

    pub fn push_all<'a>(
        &mut self,
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> EmissionResult<()> {
        for element in elements {
            self.push(element)?;
        }
        Ok(())
    }

    pub fn finish(self) -> String {
        let p = self.page;
        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<svg width="{w}mm" height="{h}mm" viewBox="{x} {y} {w} {h}" xmlns="http://www.w3.org/2000/svg">
<title>{name}</title>
"#,
            w = fmt_num(p.width),
            h = fmt_num(p.height),
            x = fmt_num(p.x),
            y = fmt_num(p.y),
            name = escape(&self.name),
        ));
        svg.push_str(&format!(
            "<g id=\"cut\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\">\n{}</g>\n",
            CUT_COLOR,
            STROKE_WIDTH,
            self.cut
        ));
        svg.push_str(&format!(
            "<g id=\"score\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\">\n{}</g>\n",
            SCORE_COLOR,
            STROKE_WIDTH,
            self.score
        ));
        svg.push_str("</svg>\n");
        svg
    }
}

fn write_shape(out: &mut String, shape: &Shape) {
    let _ = match shape {
        Shape::Path { points, closed } => {
            writeln!(out, r#"<path d="{}"/>"#, path_data(points, *closed))
        }
        Shape::Rect {
            rect,
            corner_radius,
        } if *corner_radius > 0.0 => writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"/>"#,
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.width),
            fmt_num(rect.height),
            fmt_num(*corner_radius),
            fmt_num(*corner_radius)
        ),
        Shape::Rect { rect, .. } => writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}"/>"#,
            fmt_num(rect.x),
            fmt_num(rect.y),
            fmt_num(rect.width),
            fmt_num(rect.height)
        ),
        Shape::Circle { center, radius } => writeln!(
            out,
            r#"<circle cx="{}" cy="{}" r="{}"/>"#,
            fmt_num(center.x),
            fmt_num(center.y),
            fmt_num(*radius)
        ),
        Shape::Text { at, text, size } => writeln!(
            out,
            r#"<text x="{}" y="{}" font-family="monospace" font-size="{}" fill="{}" stroke="none">{}</text>"#,
            fmt_num(at.x),
            fmt_num(at.y),
            fmt_num(*size),
            TEXT_COLOR,
            escape(text)
        ),
    };
}

/// Full SVG document for one panel.
pub fn panel_svg(panel: &Panel) -> EmissionResult<String> {
    let mut doc = SvgDocument::for_panel(panel);
    doc.push_all(&panel.elements())?;
    Ok(doc.finish())
}
