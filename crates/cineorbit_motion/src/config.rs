// SPDX-License-Identifier: MIT OR Apache-2.0
//! Serializable block configuration model.
//!
//! A [`BlockConfig`] is one entry of an authored sequence: the block type
//! (selected by the `id` prefix), its duration and easing, and the per-type
//! parameters. Editors and storage produce and consume this shape; the
//! factory in [`crate::block`] turns it into an executable motion block.

use crate::rig::CameraRig;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The closed catalog of motion block types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Move along the viewing axis
    Dolly,
    /// Rotate the look-at target around a fixed camera
    Pan,
    /// Translate sideways
    Truck,
    /// Change the polar angle
    Tilt,
    /// Translate vertically
    Pedestal,
    /// Rotate the up vector about the viewing axis
    Roll,
    /// Change the field of view
    Zoom,
    /// Zoom with distance compensation (constant subject size)
    DollyZoom,
    /// Simultaneous azimuth rotation and distance change
    Arc,
    /// Several maneuvers from one shared progress driver
    Composite,
    /// Full camera-state interpolation to an absolute pose
    MoveTo,
    /// Follow a spline through control points
    BezierCurve,
}

impl BlockKind {
    /// Parse a kind from a block id.
    ///
    /// The type key is the substring before the first `-` (ids carry a
    /// timestamp suffix, e.g. `"dolly-1718035200000"`), or the whole id when
    /// there is none. Unknown keys yield `None`; the sequencer skips them.
    pub fn parse(id: &str) -> Option<Self> {
        let key = id.split('-').next().unwrap_or(id);
        match key {
            "dolly" => Some(Self::Dolly),
            "pan" => Some(Self::Pan),
            "truck" => Some(Self::Truck),
            "tilt" => Some(Self::Tilt),
            "pedestal" => Some(Self::Pedestal),
            "roll" => Some(Self::Roll),
            "zoom" => Some(Self::Zoom),
            "dollyZoom" => Some(Self::DollyZoom),
            "arc" => Some(Self::Arc),
            "composite" => Some(Self::Composite),
            "moveTo" => Some(Self::MoveTo),
            "bezierCurve" => Some(Self::BezierCurve),
            _ => None,
        }
    }

    /// The type key this kind matches in block ids.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Dolly => "dolly",
            Self::Pan => "pan",
            Self::Truck => "truck",
            Self::Tilt => "tilt",
            Self::Pedestal => "pedestal",
            Self::Roll => "roll",
            Self::Zoom => "zoom",
            Self::DollyZoom => "dollyZoom",
            Self::Arc => "arc",
            Self::Composite => "composite",
            Self::MoveTo => "moveTo",
            Self::BezierCurve => "bezierCurve",
        }
    }

    /// Duration in seconds used when the config gives none.
    pub fn default_duration(&self) -> f64 {
        match self {
            Self::Dolly | Self::Truck | Self::Tilt | Self::Pedestal | Self::Roll | Self::Zoom => {
                2.0
            }
            Self::Pan | Self::DollyZoom | Self::Arc | Self::Composite | Self::BezierCurve => 3.0,
            Self::MoveTo => 2.0,
        }
    }
}

/// A full or partial camera-state snapshot.
///
/// Every field is independent and optional: a block's `startState` applies
/// only the fields it carries, and a `moveTo` end state holds missing fields
/// at their captured start values. Angles are radians, `fov` is degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    /// Horizontal orbit angle, radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azimuth: Option<f64>,
    /// Vertical orbit angle, radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polar: Option<f64>,
    /// Distance from the target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Orbit target point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<[f64; 3]>,
    /// Vertical field of view, degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    /// Roll about the viewing axis, radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll: Option<f64>,
}

impl CameraState {
    /// Snapshot every field of the rig's current state.
    pub fn capture(rig: &dyn CameraRig) -> Self {
        Self {
            azimuth: Some(rig.azimuth()),
            polar: Some(rig.polar()),
            distance: Some(rig.distance()),
            center: Some(rig.target().to_array()),
            fov: rig.fov(),
            roll: Some(rig.roll()),
        }
    }

    /// Synchronously apply every present field to the rig.
    ///
    /// Field-of-view changes are skipped on cameras without one.
    pub fn apply(&self, rig: &mut dyn CameraRig) {
        if let Some(azimuth) = self.azimuth {
            rig.set_azimuth(azimuth);
        }
        if let Some(polar) = self.polar {
            rig.set_polar(polar);
        }
        if let Some(distance) = self.distance {
            rig.dolly_to(distance, false);
        }
        if let Some(center) = self.center {
            rig.set_target(DVec3::from_array(center));
        }
        if let Some(fov) = self.fov {
            if rig.fov().is_some() {
                rig.set_fov(fov);
                rig.update_projection();
            }
        }
        if let Some(roll) = self.roll {
            rig.set_roll(roll);
        }
    }
}

/// Spline path configuration for a `bezierCurve` block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BezierCurveConfig {
    /// Points the camera path passes through; fewer than two falls back to
    /// a synthetic path from the camera's current position.
    #[serde(default)]
    pub control_points: Vec<[f64; 3]>,
    /// Fixed point to look at while traveling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look_at_target: Option<[f64; 3]>,
    /// Keep the orientation captured at the block start
    #[serde(default)]
    pub maintain_orientation: bool,
}

/// One entry of an authored sequence.
///
/// Angle parameters (`angleDelta`, `arcAngle`, `rotateAzimuth`,
/// `rotatePolar`) are degrees; camera-state snapshots inside `startState`
/// and `endState` use radians, matching what is captured from the rig.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConfig {
    /// Type selector and unique instance id, e.g. `"dolly-1718035200000"`
    pub id: String,
    /// Duration in seconds; per-type default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Named easing curve; `"power2.inOut"` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<String>,
    /// Distance change for dolly and arc blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_delta: Option<f64>,
    /// Rotation amount in degrees for pan, tilt and roll blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle_delta: Option<f64>,
    /// Azimuth sweep in degrees for arc blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_angle: Option<f64>,
    /// Target field of view in degrees for zoom and dollyZoom blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_fov: Option<f64>,
    /// Horizontal translate amount (legacy name `truckAmount`)
    #[serde(default, alias = "truckAmount", skip_serializing_if = "Option::is_none")]
    pub truck_x: Option<f64>,
    /// Vertical translate amount for pedestal and composite blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truck_y: Option<f64>,
    /// Azimuth rotation in degrees for composite blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_azimuth: Option<f64>,
    /// Polar rotation in degrees for composite blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate_polar: Option<f64>,
    /// Distance change for composite blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dolly: Option<f64>,
    /// Absolute camera position for repositioning blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_position: Option<[f64; 3]>,
    /// Absolute target position for repositioning blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<[f64; 3]>,
    /// Legacy moveTo azimuth target, radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_azimuth: Option<f64>,
    /// Legacy moveTo polar target, radians
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_polar: Option<f64>,
    /// Legacy moveTo distance target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_distance: Option<f64>,
    /// Legacy moveTo target point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_target: Option<[f64; 3]>,
    /// State applied synchronously before the block starts interpolating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_state: Option<CameraState>,
    /// End state for moveTo blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_state: Option<CameraState>,
    /// Spline path for bezierCurve blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bezier_curve: Option<BezierCurveConfig>,
}

impl BlockConfig {
    /// A config carrying only a type key — the legacy shorthand form.
    pub fn from_key(key: impl Into<String>) -> Self {
        Self {
            id: key.into(),
            ..Self::default()
        }
    }

    /// The block kind this config selects, if its id prefix is known.
    pub fn kind(&self) -> Option<BlockKind> {
        BlockKind::parse(&self.id)
    }

    /// The end state a `moveTo` block should interpolate toward, merging
    /// the `endState` form with the legacy `to*` fields (the explicit end
    /// state wins per field).
    pub fn move_to_state(&self) -> CameraState {
        let explicit = self.end_state.unwrap_or_default();
        CameraState {
            azimuth: explicit.azimuth.or(self.to_azimuth),
            polar: explicit.polar.or(self.to_polar),
            distance: explicit.distance.or(self.to_distance),
            center: explicit.center.or(self.to_target),
            fov: explicit.fov,
            roll: explicit.roll,
        }
    }
}
