//! Joint geometry engine.
//!
//! A jointed edge zone is split into an odd number of equal segments that tile
//! the zone exactly. Even-indexed segments are *teeth*; what a tooth means
//! depends on the [`EdgeTreatment`]: a finger sticking out, a notch cut in, or
//! a slot punched next to the edge. Both panels of a joint build their layout
//! from the same [`JointSpec`], so tab and slot agree by construction.

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::EPSILON;

/// Upper bound on segments along one edge.
pub const MAX_SEGMENTS: usize = 10_000;

/// Number of segments for an edge: the odd integer nearest `length / pitch`,
/// never less than one.
pub fn finger_count(length: f64, pitch: f64) -> GeometryResult<usize> {
    if !(length.is_finite() && length > 0.0) {
        return Err(GeometryError::DegenerateEdge { length });
    }
    if !(pitch.is_finite() && pitch > 0.0) {
        return Err(GeometryError::InvalidPitch { pitch });
    }

    let ratio = length / pitch;
    let count = (2.0 * ((ratio - 1.0) / 2.0).round() + 1.0).max(1.0);
    if count > MAX_SEGMENTS as f64 {
        return Err(GeometryError::TooManySegments {
            length,
            pitch,
            count,
        });
    }
    Ok(count as usize)
}

/// One segment of a partitioned edge, in panel-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSegment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl JointSegment {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Shared description of one jointed edge zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSpec {
    /// Length of the zone being partitioned.
    pub span: f64,
    /// Nominal segment width.
    pub pitch: f64,
    /// How far a tooth protrudes, notches or how wide a slot is.
    pub depth: f64,
    /// Start of the zone along the edge, in panel-local coordinates.
    pub origin: f64,
    /// Leave the first and last segments plain.
    pub skip_ends: bool,
}

impl JointSpec {
    pub fn new(span: f64, pitch: f64, depth: f64) -> Self {
        Self {
            span,
            pitch,
            depth,
            origin: 0.0,
            skip_ends: false,
        }
    }

    /// Same joint, placed at a different local origin.
    pub fn at(self, origin: f64) -> Self {
        Self { origin, ..self }
    }

    pub fn skipping_ends(self) -> Self {
        Self {
            skip_ends: true,
            ..self
        }
    }

    pub fn end(&self) -> f64 {
        self.origin + self.span
    }

    pub fn layout(&self) -> GeometryResult<JointLayout> {
        if !(self.depth.is_finite() && self.depth >= 0.0) {
            return Err(GeometryError::InvalidDepth { depth: self.depth });
        }
        let count = finger_count(self.span, self.pitch)?;

        let boundary = |i: usize| {
            if i == count {
                self.origin + self.span
            } else {
                self.origin + self.span * i as f64 / count as f64
            }
        };
        let segments = (0..count)
            .map(|i| JointSegment {
                index: i,
                start: boundary(i),
                end: boundary(i + 1),
            })
            .collect();

        Ok(JointLayout {
            count,
            width: self.span / count as f64,
            depth: self.depth,
            origin: self.origin,
            span: self.span,
            skip_ends: self.skip_ends,
            segments,
        })
    }
}

/// Resolved partition of a [`JointSpec`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointLayout {
    pub count: usize,
    /// Actual segment width, `span / count`.
    pub width: f64,
    pub depth: f64,
    pub origin: f64,
    pub span: f64,
    pub skip_ends: bool,
    segments: Vec<JointSegment>,
}

impl JointLayout {
    pub fn segments(&self) -> &[JointSegment] {
        &self.segments
    }

    pub fn is_tooth(&self, index: usize) -> bool {
        if index % 2 != 0 {
            return false;
        }
        !(self.skip_ends && self.count > 1 && (index == 0 || index + 1 == self.count))
    }

    pub fn teeth(&self) -> Vec<JointSegment> {
        self.segments
            .iter()
            .filter(|s| self.is_tooth(s.index))
            .copied()
            .collect()
    }

    pub fn gaps(&self) -> Vec<JointSegment> {
        self.segments
            .iter()
            .filter(|s| !self.is_tooth(s.index))
            .copied()
            .collect()
    }
}

/// How one side of a panel meets its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeTreatment {
    /// Plain edge with no joint.
    Straight,
    /// Teeth stand proud of the edge and interlock with a notched or slotted mate.
    FingerProtrusion(JointSpec),
    /// Teeth are cut into the edge to receive a mate's fingers.
    FingerNotch(JointSpec),
    /// Teeth stand proud of the edge and pass through slots in a mate's face.
    OuterTab(JointSpec),
    /// Edge stays flat; teeth become slots `inset` from the edge.
    ThroughSlot { joint: JointSpec, inset: f64 },
    /// Plain edge running `overlap` past the face it meets; negative stands clear.
    FlatOverlap { overlap: f64 },
}

impl EdgeTreatment {
    pub fn name(&self) -> &'static str {
        match self {
            EdgeTreatment::Straight => "straight",
            EdgeTreatment::FingerProtrusion(_) => "finger protrusion",
            EdgeTreatment::FingerNotch(_) => "finger notch",
            EdgeTreatment::OuterTab(_) => "outer tab",
            EdgeTreatment::ThroughSlot { .. } => "through slot",
            EdgeTreatment::FlatOverlap { .. } => "flat overlap",
        }
    }

    pub fn joint(&self) -> Option<&JointSpec> {
        match self {
            EdgeTreatment::FingerProtrusion(joint)
            | EdgeTreatment::FingerNotch(joint)
            | EdgeTreatment::OuterTab(joint)
            | EdgeTreatment::ThroughSlot { joint, .. } => Some(joint),
            EdgeTreatment::Straight | EdgeTreatment::FlatOverlap { .. } => None,
        }
    }

    pub fn layout(&self) -> GeometryResult<Option<JointLayout>> {
        self.joint().map(JointSpec::layout).transpose()
    }

    /// Signed outward offset applied to teeth when tracing the outline.
    fn tooth_offset(&self) -> f64 {
        match self {
            EdgeTreatment::FingerProtrusion(joint) | EdgeTreatment::OuterTab(joint) => joint.depth,
            EdgeTreatment::FingerNotch(joint) => -joint.depth,
            _ => 0.0,
        }
    }

    /// How far material stands proud of the nominal edge.
    pub fn protrusion(&self) -> f64 {
        self.tooth_offset().max(0.0)
    }

    /// Outline profile as `(along, outward offset)` pairs from 0 to `edge_length`.
    pub fn profile(&self, edge_length: f64) -> GeometryResult<Vec<(f64, f64)>> {
        if !(edge_length.is_finite() && edge_length > 0.0) {
            return Err(GeometryError::DegenerateEdge {
                length: edge_length,
            });
        }

        let mut profile = vec![(0.0, 0.0)];
        if let Some(layout) = self.layout()? {
            if layout.origin < -EPSILON || layout.origin + layout.span > edge_length + EPSILON {
                return Err(GeometryError::JointOutsideEdge {
                    start: layout.origin,
                    end: layout.origin + layout.span,
                    length: edge_length,
                });
            }
            let offset = self.tooth_offset();
            if offset != 0.0 {
                for tooth in layout.teeth() {
                    profile.push((tooth.start, 0.0));
                    profile.push((tooth.start, offset));
                    profile.push((tooth.end, offset));
                    profile.push((tooth.end, 0.0));
                }
            }
        }
        profile.push((edge_length, 0.0));
        Ok(profile)
    }

    /// Segments where this panel's material occupies the joint zone shared
    /// with its mate.
    pub fn engaged(&self) -> GeometryResult<Vec<JointSegment>> {
        Ok(match (self, self.layout()?) {
            (EdgeTreatment::FingerProtrusion(_) | EdgeTreatment::OuterTab(_), Some(layout)) => {
                layout.teeth()
            }
            (EdgeTreatment::FingerNotch(_) | EdgeTreatment::ThroughSlot { .. }, Some(layout)) => {
                layout.gaps()
            }
            _ => Vec::new(),
        })
    }

    /// Segments left open for the mate's material.
    pub fn receiving(&self) -> GeometryResult<Vec<JointSegment>> {
        Ok(match (self, self.layout()?) {
            (EdgeTreatment::FingerNotch(_) | EdgeTreatment::ThroughSlot { .. }, Some(layout)) => {
                layout.teeth()
            }
            (EdgeTreatment::FingerProtrusion(_), Some(layout)) => layout.gaps(),
            _ => Vec::new(),
        })
    }
}
