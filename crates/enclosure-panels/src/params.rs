//! Parameter model.
//!
//! [`Parameters`] holds the primitives a user may override; every group is
//! `#[serde(default)]` so a sparse settings file fills in the rest.
//! [`Dimensions::resolve`] validates them and computes each derived quantity
//! exactly once. Builders read only from the resolved [`Dimensions`].

use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ConfigurationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallParams {
    /// Thickness of the main panel stock.
    pub thickness: f64,
    /// Material left between a through-slot and the panel edge.
    pub side_overhang: f64,
    /// Width of material removed by the beam, compensated uniformly.
    pub kerf: f64,
}

impl Default for WallParams {
    fn default() -> Self {
        Self {
            thickness: 3.0,
            side_overhang: 3.0,
            kerf: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointParams {
    /// Nominal finger width; the real width is adjusted to tile each edge.
    pub finger_pitch: f64,
    pub rail_tab_height: f64,
    pub rail_slot_clearance: f64,
}

impl Default for JointParams {
    fn default() -> Self {
        Self {
            finger_pitch: 12.0,
            rail_tab_height: 10.0,
            rail_slot_clearance: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RodParams {
    pub diameter: f64,
    pub clearance_hole: f64,
    pub grommet_od: f64,
}

impl Default for RodParams {
    fn default() -> Self {
        Self {
            diameter: 4.0,
            clearance_hole: 4.5,
            grommet_od: 10.0,
        }
    }
}

/// Single-board computer mounted on the bottom panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    pub length: f64,
    pub width: f64,
    pub hole_spacing_x: f64,
    pub hole_spacing_y: f64,
    pub hole_offset: f64,
    pub hole_diameter: f64,
    pub standoff: f64,
    /// PCB underside to the top of the tallest connector.
    pub envelope: f64,
    /// Distance from the front panel's inner face to the board edge.
    pub front_clearance: f64,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            length: 85.0,
            width: 56.0,
            hole_spacing_x: 58.0,
            hole_spacing_y: 49.0,
            hole_offset: 3.5,
            hole_diameter: 2.7,
            standoff: 10.0,
            envelope: 18.0,
            front_clearance: 5.0,
        }
    }
}

/// SATA HAT stacked on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatParams {
    pub length: f64,
    pub gap: f64,
    pub envelope: f64,
}

impl Default for HatParams {
    fn default() -> Self {
        Self {
            length: 100.0,
            gap: 3.0,
            envelope: 12.25,
        }
    }
}

/// 3.5" drives standing on their connector end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParams {
    pub count: usize,
    pub thickness: f64,
    /// Centre-to-centre spacing of adjacent drives.
    pub pitch: f64,
    pub width: f64,
    pub length: f64,
    /// Side mounting holes, measured from the connector end.
    pub side_hole_z: Vec<f64>,
    pub screw_hole: f64,
    pub washer_od: f64,
}

impl Default for DriveParams {
    fn default() -> Self {
        Self {
            count: 4,
            thickness: 26.11,
            pitch: 46.11,
            width: 101.6,
            length: 146.99,
            side_hole_z: vec![28.5, 70.5, 130.5],
            screw_hole: 3.4,
            washer_od: 7.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombParams {
    /// Bracket stock, shared by the comb rails and the fan bracket.
    pub thickness: f64,
    pub bar_height: f64,
    pub tooth_width: f64,
    /// Gap left below the tooth tips, above the drive connectors.
    pub tip_clearance: f64,
    pub screw_head_clearance: f64,
}

impl Default for CombParams {
    fn default() -> Self {
        Self {
            thickness: 5.0,
            bar_height: 12.0,
            tooth_width: 20.0,
            tip_clearance: 10.0,
            screw_head_clearance: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FanParams {
    pub size: f64,
    pub depth: f64,
    pub opening: f64,
    pub hole_spacing: f64,
    pub mount_hole: f64,
    /// Airflow gap between the drive tops and the fan bracket.
    pub gap: f64,
    pub top_clearance: f64,
    pub bracket_clearance: f64,
}

impl Default for FanParams {
    fn default() -> Self {
        Self {
            size: 80.0,
            depth: 25.0,
            opening: 74.0,
            hole_spacing: 71.5,
            mount_hole: 4.3,
            gap: 10.0,
            top_clearance: 5.0,
            bracket_clearance: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VentParams {
    pub min_bridge: f64,
    pub grid_slot_length: f64,
    pub grid_slot_height: f64,
    pub grid_bridge: f64,
    pub wall_slot_length: f64,
    pub side_slot_length: f64,
    pub row_slot_height: f64,
    pub cable_zone: f64,
    pub grille_slot_width: f64,
    pub grille_ring_gap: f64,
    pub grille_spoke: f64,
    pub grille_hub: f64,
}

impl Default for VentParams {
    fn default() -> Self {
        Self {
            min_bridge: 2.0,
            grid_slot_length: 22.0,
            grid_slot_height: 3.0,
            grid_bridge: 5.0,
            wall_slot_length: 22.0,
            side_slot_length: 18.0,
            row_slot_height: 2.5,
            cable_zone: 82.0,
            grille_slot_width: 3.0,
            grille_ring_gap: 4.0,
            grille_spoke: 3.0,
            grille_hub: 6.0,
        }
    }
}

/// User-facing primitives. Everything else is derived.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub wall: WallParams,
    pub joints: JointParams,
    pub rods: RodParams,
    pub board: BoardParams,
    pub hat: HatParams,
    pub drives: DriveParams,
    pub comb: CombParams,
    pub fan: FanParams,
    pub vents: VentParams,
}

/// Z levels of the stack, measured from the underside of the bottom panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZStack {
    pub bottom_top: f64,
    pub board_pcb: f64,
    pub board_top: f64,
    pub hat_pcb: f64,
    pub hat_top: f64,
    pub drive_bottom: f64,
    pub drive_top: f64,
    pub fan_bracket: f64,
    pub fan_top: f64,
    pub top_panel: f64,
    pub total_height: f64,
}

/// Fully resolved, immutable dimension set for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    pub params: Parameters,
    pub wall: f64,
    pub kerf: f64,
    pub drive_bay_width: f64,
    pub interior_x: f64,
    pub interior_y: f64,
    pub exterior_x: f64,
    pub exterior_y: f64,
    /// Wing of the caps and sides past the front/back panels' inner faces.
    pub overlap: f64,
    /// Front-to-back depth of the top, bottom and side panels.
    pub panel_depth: f64,
    pub rod_inset: f64,
    pub z: ZStack,
    /// Height of the side panels, between the caps.
    pub side_height: f64,
    pub comb_height: f64,
    /// Enclosure Y of the front and rear comb rail mid-planes.
    pub rail_center_y: [f64; 2],
}

fn round_up_to(value: f64, step: f64) -> f64 {
    (value / step - 1e-9).ceil() * step
}

fn positive(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigurationError::Negative { name, value })
    }
}

impl Parameters {
    /// Checks every primitive on its own.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("wall.thickness", self.wall.thickness)?;
        non_negative("wall.side_overhang", self.wall.side_overhang)?;
        non_negative("wall.kerf", self.wall.kerf)?;
        if self.wall.kerf >= self.wall.thickness / 2.0 {
            return Err(ConfigurationError::OutOfRange {
                name: "wall.kerf",
                value: self.wall.kerf,
                min: 0.0,
                max: self.wall.thickness / 2.0,
            });
        }

        positive("joints.finger_pitch", self.joints.finger_pitch)?;
        positive("joints.rail_tab_height", self.joints.rail_tab_height)?;
        non_negative("joints.rail_slot_clearance", self.joints.rail_slot_clearance)?;

        positive("rods.diameter", self.rods.diameter)?;
        positive("rods.clearance_hole", self.rods.clearance_hole)?;
        non_negative("rods.grommet_od", self.rods.grommet_od)?;
        if self.rods.clearance_hole < self.rods.diameter {
            return Err(ConfigurationError::Incompatible(format!(
                "rod clearance hole {} is smaller than the rod diameter {}",
                self.rods.clearance_hole, self.rods.diameter
            )));
        }

        let b = &self.board;
        positive("board.length", b.length)?;
        positive("board.width", b.width)?;
        positive("board.hole_spacing_x", b.hole_spacing_x)?;
        positive("board.hole_spacing_y", b.hole_spacing_y)?;
        positive("board.hole_diameter", b.hole_diameter)?;
        non_negative("board.hole_offset", b.hole_offset)?;
        non_negative("board.standoff", b.standoff)?;
        positive("board.envelope", b.envelope)?;
        non_negative("board.front_clearance", b.front_clearance)?;

        positive("hat.length", self.hat.length)?;
        non_negative("hat.gap", self.hat.gap)?;
        positive("hat.envelope", self.hat.envelope)?;

        let d = &self.drives;
        if d.count == 0 {
            return Err(ConfigurationError::NonPositive {
                name: "drives.count",
                value: 0.0,
            });
        }
        positive("drives.thickness", d.thickness)?;
        positive("drives.pitch", d.pitch)?;
        positive("drives.width", d.width)?;
        positive("drives.length", d.length)?;
        positive("drives.screw_hole", d.screw_hole)?;
        non_negative("drives.washer_od", d.washer_od)?;
        if d.pitch < d.thickness {
            return Err(ConfigurationError::Incompatible(format!(
                "drive pitch {} is less than the drive thickness {}",
                d.pitch, d.thickness
            )));
        }
        for &hz in &d.side_hole_z {
            if !(hz > 0.0 && hz < d.length) {
                return Err(ConfigurationError::OutOfRange {
                    name: "drives.side_hole_z",
                    value: hz,
                    min: 0.0,
                    max: d.length,
                });
            }
        }

        let c = &self.comb;
        positive("comb.thickness", c.thickness)?;
        positive("comb.bar_height", c.bar_height)?;
        positive("comb.tooth_width", c.tooth_width)?;
        non_negative("comb.tip_clearance", c.tip_clearance)?;
        non_negative("comb.screw_head_clearance", c.screw_head_clearance)?;
        if c.tooth_width >= d.pitch {
            return Err(ConfigurationError::Incompatible(format!(
                "comb tooth width {} leaves no gap at drive pitch {}",
                c.tooth_width, d.pitch
            )));
        }
        if self.joints.rail_tab_height > c.bar_height {
            return Err(ConfigurationError::OutOfRange {
                name: "joints.rail_tab_height",
                value: self.joints.rail_tab_height,
                min: 0.0,
                max: c.bar_height,
            });
        }

        let f = &self.fan;
        positive("fan.size", f.size)?;
        positive("fan.depth", f.depth)?;
        positive("fan.opening", f.opening)?;
        positive("fan.hole_spacing", f.hole_spacing)?;
        positive("fan.mount_hole", f.mount_hole)?;
        non_negative("fan.gap", f.gap)?;
        non_negative("fan.top_clearance", f.top_clearance)?;
        non_negative("fan.bracket_clearance", f.bracket_clearance)?;
        if f.opening > f.size {
            return Err(ConfigurationError::OutOfRange {
                name: "fan.opening",
                value: f.opening,
                min: 0.0,
                max: f.size,
            });
        }
        if f.hole_spacing >= f.size {
            return Err(ConfigurationError::OutOfRange {
                name: "fan.hole_spacing",
                value: f.hole_spacing,
                min: 0.0,
                max: f.size,
            });
        }

        let v = &self.vents;
        positive("vents.min_bridge", v.min_bridge)?;
        positive("vents.grid_slot_length", v.grid_slot_length)?;
        positive("vents.grid_slot_height", v.grid_slot_height)?;
        positive("vents.grid_bridge", v.grid_bridge)?;
        positive("vents.wall_slot_length", v.wall_slot_length)?;
        positive("vents.side_slot_length", v.side_slot_length)?;
        positive("vents.row_slot_height", v.row_slot_height)?;
        positive("vents.cable_zone", v.cable_zone)?;
        positive("vents.grille_slot_width", v.grille_slot_width)?;
        positive("vents.grille_ring_gap", v.grille_ring_gap)?;
        positive("vents.grille_spoke", v.grille_spoke)?;
        non_negative("vents.grille_hub", v.grille_hub)?;
        if v.grid_bridge < v.min_bridge {
            return Err(ConfigurationError::OutOfRange {
                name: "vents.grid_bridge",
                value: v.grid_bridge,
                min: v.min_bridge,
                max: f64::INFINITY,
            });
        }

        Ok(())
    }
}

impl Dimensions {
    /// Resolves the full dimension set from the given primitives.
    pub fn resolve(params: &Parameters) -> ConfigResult<Self> {
        params.validate()?;

        let wall = params.wall.thickness;
        let drives = &params.drives;
        let comb = &params.comb;

        let drive_bay_width = drives.count as f64 * drives.pitch;
        let interior_x = round_up_to(
            drive_bay_width
                .max(params.hat.length + 20.0)
                .max(params.board.length + 20.0),
            5.0,
        );
        let interior_y = round_up_to(
            (2.0 * comb.screw_head_clearance + 2.0 * comb.thickness + drives.width)
                .max(params.board.width + 20.0),
            5.0,
        );
        let exterior_x = interior_x + 2.0 * wall;
        let exterior_y = interior_y + 2.0 * wall;
        let overlap = params.wall.side_overhang + wall;
        let panel_depth = exterior_y + 2.0 * overlap;
        let rod_inset = wall + 2.0 * params.rods.diameter;

        let bottom_top = wall;
        let board_pcb = bottom_top + params.board.standoff;
        let board_top = board_pcb + params.board.envelope;
        let hat_pcb = board_top + params.hat.gap;
        let hat_top = hat_pcb + params.hat.envelope;
        let drive_bottom = hat_top + params.vents.cable_zone;
        let drive_top = drive_bottom + drives.length;
        let fan_bracket = drive_top + params.fan.gap;
        let fan_top = fan_bracket + comb.thickness + params.fan.depth;
        let top_panel = fan_top + params.fan.top_clearance;
        let total_height = top_panel + wall;
        let z = ZStack {
            bottom_top,
            board_pcb,
            board_top,
            hat_pcb,
            hat_top,
            drive_bottom,
            drive_top,
            fan_bracket,
            fan_top,
            top_panel,
            total_height,
        };

        let side_height = top_panel - wall;
        let comb_height = drives.length - comb.tip_clearance;
        if comb_height <= comb.bar_height {
            return Err(ConfigurationError::Incompatible(format!(
                "comb height {:.3} leaves no teeth below a {:.3} mm bar",
                comb_height, comb.bar_height
            )));
        }

        let rail_offset = (drives.width + comb.thickness) / 2.0;
        let rail_center_y = [panel_depth / 2.0 - rail_offset, panel_depth / 2.0 + rail_offset];
        let front_inner = overlap;
        if rail_center_y[0] - comb.thickness / 2.0 < front_inner + comb.screw_head_clearance - 1e-9 {
            return Err(ConfigurationError::Incompatible(format!(
                "comb rails at Y={:.3} leave less than {:.3} mm screw head clearance",
                rail_center_y[0], comb.screw_head_clearance
            )));
        }

        let half_footprint = exterior_x.min(panel_depth) / 2.0;
        if rod_inset >= half_footprint {
            return Err(ConfigurationError::OutOfRange {
                name: "rod_inset",
                value: rod_inset,
                min: 0.0,
                max: half_footprint,
            });
        }

        Ok(Self {
            params: params.clone(),
            wall,
            kerf: params.wall.kerf,
            drive_bay_width,
            interior_x,
            interior_y,
            exterior_x,
            exterior_y,
            overlap,
            panel_depth,
            rod_inset,
            z,
            side_height,
            comb_height,
            rail_center_y,
        })
    }

    /// Bracket stock thickness.
    pub fn bracket_thickness(&self) -> f64 {
        self.params.comb.thickness
    }
}
