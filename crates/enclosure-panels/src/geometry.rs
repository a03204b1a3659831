//! Planar primitives shared by the joint engine, the panel builders and the
//! emitters. All values are millimetres in panel-local coordinates with y
//! growing downward, as on the cut sheet.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used for coordinate comparisons.
pub const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }
}

pub fn push_unique_point(path: &mut Vec<Point>, point: Point) {
    if let Some(last) = path.last() {
        if last.approx_eq(point) {
            return;
        }
    }
    path.push(point);
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Point, width: f64, height: f64) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            width,
            height,
        )
    }

    /// Smallest rectangle holding both corners, whatever their order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + 2.0 * amount,
            self.height + 2.0 * amount,
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.x - EPSILON
            && p.x <= self.max_x() + EPSILON
            && p.y >= self.y - EPSILON
            && p.y <= self.max_y() + EPSILON
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x - EPSILON
            && other.y >= self.y - EPSILON
            && other.max_x() <= self.max_x() + EPSILON
            && other.max_y() <= self.max_y() + EPSILON
    }

    /// True when the interiors overlap; touching edges do not count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x() - EPSILON
            && other.x < self.max_x() - EPSILON
            && self.y < other.max_y() - EPSILON
            && other.y < self.max_y() - EPSILON
    }

    /// Shortest distance between the two rectangles, zero when they overlap.
    pub fn gap(&self, other: &Rect) -> f64 {
        let dx = (other.x - self.max_x()).max(self.x - other.max_x()).max(0.0);
        let dy = (other.y - self.max_y()).max(self.y - other.max_y()).max(0.0);
        dx.hypot(dy)
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect::new(
            x,
            y,
            self.max_x().max(other.max_x()) - x,
            self.max_y().max(other.max_y()) - y,
        )
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x, self.max_y()),
        ]
    }
}

/// Edge of a rectangular panel, named as drawn on the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Clockwise drawing order used for outlines and edge lists.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn index(self) -> usize {
        match self {
            Side::Top => 0,
            Side::Right => 1,
            Side::Bottom => 2,
            Side::Left => 3,
        }
    }

    /// Whether the edge runs along the panel's local x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Top | Side::Bottom)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Top => write!(f, "top"),
            Side::Right => write!(f, "right"),
            Side::Bottom => write!(f, "bottom"),
            Side::Left => write!(f, "left"),
        }
    }
}

/// Enclosure axis: X left to right, Y front to back, Z bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Maps one local panel coordinate onto an enclosure axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisMap {
    pub axis: Axis,
    pub origin: f64,
    /// +1.0 when the local axis runs with the enclosure axis, -1.0 against it.
    pub sign: f64,
}

impl AxisMap {
    pub fn forward(axis: Axis, origin: f64) -> Self {
        Self {
            axis,
            origin,
            sign: 1.0,
        }
    }

    pub fn reverse(axis: Axis, origin: f64) -> Self {
        Self {
            axis,
            origin,
            sign: -1.0,
        }
    }

    pub fn map(&self, local: f64) -> f64 {
        self.origin + self.sign * local
    }

    /// Maps a local interval, returning it in ascending enclosure order.
    pub fn map_interval(&self, start: f64, end: f64) -> (f64, f64) {
        let a = self.map(start);
        let b = self.map(end);
        (a.min(b), a.max(b))
    }
}

/// Placement of a panel's drawing inside the enclosure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub u: AxisMap,
    pub v: AxisMap,
    /// Through the stock: the material occupies `normal` over
    /// `0..thickness`.
    pub normal: AxisMap,
}

impl Frame {
    pub fn new(u: AxisMap, v: AxisMap, normal: AxisMap) -> Self {
        Self { u, v, normal }
    }

    /// The map for coordinates running along the given edge.
    pub fn along(&self, side: Side) -> &AxisMap {
        if side.is_horizontal() {
            &self.u
        } else {
            &self.v
        }
    }

    /// The map for coordinates running across the given edge.
    pub fn across(&self, side: Side) -> &AxisMap {
        if side.is_horizontal() {
            &self.v
        } else {
            &self.u
        }
    }

    /// Enclosure interval filled by stock of the given thickness.
    pub fn material(&self, thickness: f64) -> (f64, f64) {
        self.normal.map_interval(0.0, thickness)
    }
}

/// Output layer of a drawn element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Cut,
    Score,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::Cut => write!(f, "cut"),
            Layer::Score => write!(f, "score"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Path { points: Vec<Point>, closed: bool },
    Rect { rect: Rect, corner_radius: f64 },
    Circle { center: Point, radius: f64 },
    Text { at: Point, text: String, size: f64 },
}

impl Shape {
    pub fn rect(rect: Rect) -> Self {
        Shape::Rect {
            rect,
            corner_radius: 0.0,
        }
    }

    /// Rectangle with fully rounded ends, as used for vent slots.
    pub fn slot(rect: Rect) -> Self {
        Shape::Rect {
            rect,
            corner_radius: rect.width.min(rect.height) / 2.0,
        }
    }

    pub fn circle(center: Point, radius: f64) -> Self {
        Shape::Circle { center, radius }
    }

    pub fn closed_path(points: Vec<Point>) -> Self {
        Shape::Path {
            points,
            closed: true,
        }
    }

    pub fn text(at: Point, text: impl Into<String>, size: f64) -> Self {
        Shape::Text {
            at,
            text: text.into(),
            size,
        }
    }

    /// Bounding box of the drawn geometry. Text contributes only its anchor.
    pub fn extent(&self) -> Option<Rect> {
        match self {
            Shape::Path { points, .. } => {
                let first = points.first()?;
                let mut bounds = Rect::new(first.x, first.y, 0.0, 0.0);
                for p in &points[1..] {
                    bounds = bounds.union(&Rect::new(p.x, p.y, 0.0, 0.0));
                }
                Some(bounds)
            }
            Shape::Rect { rect, .. } => Some(*rect),
            Shape::Circle { center, radius } => {
                Some(Rect::from_center(*center, 2.0 * radius, 2.0 * radius))
            }
            Shape::Text { at, .. } => Some(Rect::new(at.x, at.y, 0.0, 0.0)),
        }
    }

    /// Closest approach between two cut shapes, zero when they touch or
    /// overlap. Rounded rectangles are measured by their square corners, so
    /// the result never overstates the material left between them. `None`
    /// when either shape is text.
    pub fn clearance(&self, other: &Shape) -> Option<f64> {
        if let (Shape::Rect { rect: a, .. }, Shape::Rect { rect: b, .. }) = (self, other) {
            return Some(a.gap(b));
        }
        let gap = match (Contour::of(self)?, Contour::of(other)?) {
            (Contour::Round(a, ra), Contour::Round(b, rb)) => a.distance(b) - ra - rb,
            (Contour::Round(c, r), Contour::Loop(points, closed))
            | (Contour::Loop(points, closed), Contour::Round(c, r)) => {
                if closed && contains(&points, c) {
                    0.0
                } else {
                    edges(&points, closed)
                        .map(|(a, b)| point_segment_distance(c, a, b))
                        .fold(f64::INFINITY, f64::min)
                        - r
                }
            }
            (Contour::Loop(a, a_closed), Contour::Loop(b, b_closed)) => {
                let nested = (a_closed && b.first().is_some_and(|p| contains(&a, *p)))
                    || (b_closed && a.first().is_some_and(|p| contains(&b, *p)));
                if nested {
                    0.0
                } else {
                    let mut best = f64::INFINITY;
                    for (a0, a1) in edges(&a, a_closed) {
                        for (b0, b1) in edges(&b, b_closed) {
                            best = best.min(segment_distance(a0, a1, b0, b1));
                        }
                    }
                    best
                }
            }
        };
        Some(gap.max(0.0))
    }

    /// Applies a point mapping made of translations and quarter turns.
    pub fn map_points(&self, f: &dyn Fn(Point) -> Point) -> Shape {
        match self {
            Shape::Path { points, closed } => Shape::Path {
                points: points.iter().map(|p| f(*p)).collect(),
                closed: *closed,
            },
            Shape::Rect {
                rect,
                corner_radius,
            } => Shape::Rect {
                rect: Rect::from_corners(
                    f(Point::new(rect.x, rect.y)),
                    f(Point::new(rect.max_x(), rect.max_y())),
                ),
                corner_radius: *corner_radius,
            },
            Shape::Circle { center, radius } => Shape::Circle {
                center: f(*center),
                radius: *radius,
            },
            Shape::Text { at, text, size } => Shape::Text {
                at: f(*at),
                text: text.clone(),
                size: *size,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub layer: Layer,
    pub shape: Shape,
}

impl Element {
    pub fn cut(shape: Shape) -> Self {
        Self {
            layer: Layer::Cut,
            shape,
        }
    }

    pub fn score(shape: Shape) -> Self {
        Self {
            layer: Layer::Score,
            shape,
        }
    }
}

/// A cut shape reduced to what distance queries need.
enum Contour {
    Round(Point, f64),
    Loop(Vec<Point>, bool),
}

impl Contour {
    fn of(shape: &Shape) -> Option<Contour> {
        match shape {
            Shape::Path { points, closed } => Some(Contour::Loop(points.clone(), *closed)),
            Shape::Rect { rect, .. } => Some(Contour::Loop(rect.corners().to_vec(), true)),
            Shape::Circle { center, radius } => Some(Contour::Round(*center, *radius)),
            Shape::Text { .. } => None,
        }
    }
}

fn edges(points: &[Point], closed: bool) -> impl Iterator<Item = (Point, Point)> + '_ {
    let n = points.len();
    let count = match n {
        0 => 0,
        1 => 1,
        _ if closed => n,
        _ => n - 1,
    };
    (0..count).map(move |i| (points[i], points[(i + 1) % n]))
}

/// Even-odd test; points on the boundary may land either way.
fn contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    for (a, b) in edges(points, true) {
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let length_sq = dx * dx + dy * dy;
    if length_sq < EPSILON * EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / length_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

fn segment_distance(a0: Point, a1: Point, b0: Point, b1: Point) -> f64 {
    let cross = |o: Point, p: Point, q: Point| (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x);
    let (d1, d2) = (cross(b0, b1, a0), cross(b0, b1, a1));
    let (d3, d4) = (cross(a0, a1, b0), cross(a0, a1, b1));
    if d1 * d2 < 0.0 && d3 * d4 < 0.0 {
        return 0.0;
    }
    point_segment_distance(a0, b0, b1)
        .min(point_segment_distance(a1, b0, b1))
        .min(point_segment_distance(b0, a0, a1))
        .min(point_segment_distance(b1, a0, a1))
}

/// Shoelace area; negative for clockwise loops in a y-up frame.
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        area += a.x * b.y - b.x * a.y;
    }
    area / 2.0
}

/// Removes repeated and collinear vertices from a closed loop.
///
/// Collinear includes back-tracking spikes, which appear where a notch starts
/// exactly at a panel corner.
pub fn simplify_closed(points: &[Point]) -> Vec<Point> {
    let mut pts: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        push_unique_point(&mut pts, *p);
    }
    while pts.len() > 1 && pts[0].approx_eq(pts[pts.len() - 1]) {
        pts.pop();
    }

    let mut changed = true;
    while changed && pts.len() >= 3 {
        changed = false;
        let mut i = 0;
        while i < pts.len() && pts.len() >= 3 {
            let n = pts.len();
            let a = pts[(i + n - 1) % n];
            let b = pts[i];
            let c = pts[(i + 1) % n];
            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if a.approx_eq(b) || cross.abs() < EPSILON {
                pts.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
    pts
}
