//! Vent pattern generator.
//!
//! Produces slot grids, evenly spread slot rows and the concentric-ring
//! finger guard placed over a fan. Every generator guarantees its vents stay
//! inside the region and keep a minimum material bridge between each other.

use serde::Serialize;
use std::f64::consts::PI;

use crate::error::{GeometryError, GeometryResult};
use crate::geometry::{Point, Rect, EPSILON};
use crate::joints::finger_count;

/// Slot size and bridge used for a dense grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotPattern {
    pub length: f64,
    pub height: f64,
    /// Material between neighbouring slots, both directions.
    pub bridge: f64,
}

/// Centred grid of slots filling `region`. Cells that touch a keep-out
/// rectangle are dropped.
pub fn slot_grid(region: Rect, pattern: &SlotPattern, keep_out: &[Rect]) -> GeometryResult<Vec<Rect>> {
    if region.width < pattern.length || region.height < pattern.height {
        return Err(GeometryError::VentRegionTooSmall {
            width: region.width,
            height: region.height,
            slot_width: pattern.length,
            slot_height: pattern.height,
        });
    }

    let pitch_x = pattern.length + pattern.bridge;
    let pitch_y = pattern.height + pattern.bridge;
    let cols = ((region.width + pattern.bridge + EPSILON) / pitch_x).floor() as usize;
    let rows = ((region.height + pattern.bridge + EPSILON) / pitch_y).floor() as usize;

    let grid_w = cols as f64 * pitch_x - pattern.bridge;
    let grid_h = rows as f64 * pitch_y - pattern.bridge;
    let x0 = region.x + (region.width - grid_w) / 2.0;
    let y0 = region.y + (region.height - grid_h) / 2.0;

    let mut slots = Vec::with_capacity(cols * rows);
    for col in 0..cols {
        for row in 0..rows {
            let slot = Rect::new(
                x0 + col as f64 * pitch_x,
                y0 + row as f64 * pitch_y,
                pattern.length,
                pattern.height,
            );
            if keep_out.iter().any(|k| k.gap(&slot) < EPSILON) {
                continue;
            }
            slots.push(slot);
        }
    }

    verify_clearance(&slots, region, pattern.bridge)?;
    Ok(slots)
}

/// `columns` x `rows` slots spread evenly across `region`, the outer slots
/// flush with its bounds.
pub fn slot_rows(
    region: Rect,
    slot_length: f64,
    slot_height: f64,
    columns: usize,
    rows: usize,
    min_bridge: f64,
) -> GeometryResult<Vec<Rect>> {
    if columns == 0 || rows == 0 {
        return Ok(Vec::new());
    }
    if region.width < slot_length || region.height < slot_height {
        return Err(GeometryError::VentRegionTooSmall {
            width: region.width,
            height: region.height,
            slot_width: slot_length,
            slot_height,
        });
    }

    let positions = |start: f64, extent: f64, size: f64, count: usize| -> Vec<f64> {
        if count == 1 {
            return vec![start + (extent - size) / 2.0];
        }
        let step = (extent - size) / (count - 1) as f64;
        (0..count).map(|i| start + i as f64 * step).collect()
    };

    let xs = positions(region.x, region.width, slot_length, columns);
    let ys = positions(region.y, region.height, slot_height, rows);

    let mut slots = Vec::with_capacity(columns * rows);
    for &y in &ys {
        for &x in &xs {
            slots.push(Rect::new(x, y, slot_length, slot_height));
        }
    }

    verify_clearance(&slots, region, min_bridge)?;
    Ok(slots)
}

/// Fails when a vent leaves `region` or two vents come closer than
/// `min_bridge`.
pub fn verify_clearance(vents: &[Rect], region: Rect, min_bridge: f64) -> GeometryResult<()> {
    for vent in vents {
        if !region.contains_rect(vent) {
            return Err(GeometryError::VentOutsideRegion {
                x: vent.x,
                y: vent.y,
            });
        }
    }
    for (i, a) in vents.iter().enumerate() {
        for b in &vents[i + 1..] {
            let gap = a.gap(b);
            if gap < min_bridge - EPSILON {
                return Err(GeometryError::BridgeTooThin {
                    gap,
                    min: min_bridge,
                });
            }
        }
    }
    Ok(())
}

/// Concentric-ring guard over a circular fan opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerGuard {
    pub outer_radius: f64,
    pub hub_radius: f64,
    /// Radial width of each ring of slots.
    pub slot_width: f64,
    /// Material between rings.
    pub ring_gap: f64,
    /// Material between slots of one ring, measured at the mean radius.
    pub spoke: f64,
    pub min_bridge: f64,
}

/// One arc-shaped slot of a guard ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcSlot {
    pub center: Point,
    pub ring: usize,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcSlot {
    pub fn mean_radius(&self) -> f64 {
        (self.inner_radius + self.outer_radius) / 2.0
    }

    /// Closed outline: outer arc forward, inner arc back.
    pub fn to_polygon(&self) -> Vec<Point> {
        let arc_len = self.outer_radius * self.sweep;
        let steps = ((arc_len / 2.0).ceil() as usize).max(4);
        let at = |radius: f64, angle: f64| {
            Point::new(
                self.center.x + radius * angle.cos(),
                self.center.y + radius * angle.sin(),
            )
        };

        let mut points = Vec::with_capacity(2 * (steps + 1));
        for i in 0..=steps {
            let angle = self.start_angle + self.sweep * i as f64 / steps as f64;
            points.push(at(self.outer_radius, angle));
        }
        for i in (0..=steps).rev() {
            let angle = self.start_angle + self.sweep * i as f64 / steps as f64;
            points.push(at(self.inner_radius, angle));
        }
        points
    }
}

/// Rings of arc slots from the hub out to `outer_radius`. Each ring is split
/// with the same odd-count rule as a finger joint, applied to its mean
/// circumference.
pub fn finger_guard(center: Point, guard: &FingerGuard) -> GeometryResult<Vec<ArcSlot>> {
    if !(guard.outer_radius.is_finite() && guard.outer_radius > 0.0) {
        return Err(GeometryError::DegenerateEdge {
            length: guard.outer_radius,
        });
    }
    if !(guard.slot_width.is_finite() && guard.slot_width > 0.0) {
        return Err(GeometryError::DegenerateEdge {
            length: guard.slot_width,
        });
    }
    if guard.ring_gap < guard.min_bridge - EPSILON {
        return Err(GeometryError::BridgeTooThin {
            gap: guard.ring_gap,
            min: guard.min_bridge,
        });
    }

    let ring_pitch = guard.slot_width + guard.ring_gap;
    let cell_pitch = 3.0 * guard.slot_width + guard.spoke;

    let mut slots = Vec::new();
    let mut inner = guard.hub_radius;
    let mut ring = 0;
    while inner + guard.slot_width <= guard.outer_radius + EPSILON {
        let outer = inner + guard.slot_width;
        let mean = (inner + outer) / 2.0;
        let count = finger_count(2.0 * PI * mean, cell_pitch)?;
        let cell = 2.0 * PI / count as f64;
        let spoke_angle = guard.spoke / mean;
        let sweep = cell - spoke_angle;
        if sweep <= 0.0 {
            return Err(GeometryError::BridgeTooThin {
                gap: 0.0,
                min: guard.spoke,
            });
        }
        // A single slot still leaves one spoke between its two ends.
        let narrowest = spoke_angle * inner;
        if narrowest < guard.min_bridge - EPSILON {
            return Err(GeometryError::BridgeTooThin {
                gap: narrowest,
                min: guard.min_bridge,
            });
        }

        for i in 0..count {
            slots.push(ArcSlot {
                center,
                ring,
                inner_radius: inner,
                outer_radius: outer,
                start_angle: i as f64 * cell + spoke_angle / 2.0,
                sweep,
            });
        }

        inner += ring_pitch;
        ring += 1;
    }
    Ok(slots)
}
