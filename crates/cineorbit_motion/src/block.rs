// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion block factory and per-run interpolation records.
//!
//! A [`MotionBlock`] is one camera maneuver resolved from a [`BlockConfig`]:
//! duration, easing, and a variant carrying the typed parameters. Execution
//! is split into an explicit start/update pair:
//!
//! - [`MotionBlock::on_start`] applies the forced start state (if any),
//!   captures the rig's current state into a [`RunState`], and precomputes
//!   anything path-shaped.
//! - [`MotionBlock::on_update`] writes the interpolated values for an eased
//!   progress in `[0, 1]` to the rig, reading its captured "from" values
//!   from the run state.
//!
//! Capturing at start time rather than resolve time is what lets sequential
//! blocks chain continuously from wherever the previous block left the rig.

use crate::config::{BlockConfig, BlockKind, CameraState};
use crate::easing::Easing;
use crate::math::{lerp, shortest_angle_target, CatmullRom};
use crate::rig::CameraRig;
use glam::{DQuat, DVec3};

/// Scale hints handed to the factory at resolve time.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext {
    /// Bounding radius of the displayed subject; sizes default magnitudes
    /// for blocks that omit an explicit delta.
    pub radius: f64,
}

impl BlockContext {
    /// Context for a subject of the given bounding radius.
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl Default for BlockContext {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Full snapshot of rig state captured when a block starts.
#[derive(Debug, Clone, Copy)]
pub struct RigSnapshot {
    /// Horizontal orbit angle, radians
    pub azimuth: f64,
    /// Vertical orbit angle, radians
    pub polar: f64,
    /// Distance from the target
    pub distance: f64,
    /// Camera world position
    pub position: DVec3,
    /// Orbit target point
    pub target: DVec3,
    /// Field of view in degrees, if the camera has one
    pub fov: Option<f64>,
    /// Up vector
    pub up: DVec3,
    /// Viewing direction
    pub forward: DVec3,
    /// Roll angle, radians
    pub roll: f64,
}

impl RigSnapshot {
    /// Capture the rig's current state.
    pub fn capture(rig: &dyn CameraRig) -> Self {
        Self {
            azimuth: rig.azimuth(),
            polar: rig.polar(),
            distance: rig.distance(),
            position: rig.position(),
            target: rig.target(),
            fov: rig.fov(),
            up: rig.up(),
            forward: rig.forward(),
            roll: rig.roll(),
        }
    }
}

/// Absolute targets a `moveTo` block interpolates toward, resolved once at
/// block start so azimuth takes the shortest angular path.
#[derive(Debug, Clone, Copy)]
struct MoveTarget {
    azimuth: f64,
    polar: f64,
    distance: f64,
    center: DVec3,
    fov: Option<f64>,
    roll: f64,
}

/// Per-run state for one block execution.
///
/// Created by [`MotionBlock::on_start`] and threaded through every
/// [`MotionBlock::on_update`] call of the same run. Owns nothing beyond the
/// run; a new playback gets a fresh record.
#[derive(Debug, Clone)]
pub struct RunState {
    /// State captured at block start
    pub from: RigSnapshot,
    /// Progress of the previous update, for incremental translate steps
    prev_progress: f64,
    /// Precomputed path for spline-following blocks
    spline: Option<CatmullRom>,
    /// Resolved absolute targets for moveTo blocks
    move_target: Option<MoveTarget>,
}

/// Typed parameters of one block variant. Angles are radians, FOV degrees.
#[derive(Debug, Clone)]
enum Motion {
    Dolly { delta: f64 },
    Pan { angle: f64 },
    Truck { dx: f64 },
    Tilt { angle: f64 },
    Pedestal { dy: f64 },
    Roll { angle: f64 },
    Zoom { fov: f64 },
    DollyZoom { fov: f64 },
    Arc { angle: f64, distance_delta: f64 },
    Composite {
        rotate_azimuth: f64,
        rotate_polar: f64,
        dolly: f64,
        truck_x: f64,
        truck_y: f64,
    },
    MoveTo { state: CameraState },
    Bezier {
        points: Vec<DVec3>,
        look_at: Option<DVec3>,
        maintain_orientation: bool,
        fallback_scale: f64,
    },
    /// Degraded block that consumes its duration without touching the rig.
    Idle,
}

/// One executable camera maneuver.
#[derive(Debug, Clone)]
pub struct MotionBlock {
    id: String,
    duration: f64,
    easing: Easing,
    start_state: Option<CameraState>,
    motion: Motion,
}

impl MotionBlock {
    /// Resolve a config into an executable block.
    ///
    /// Returns `None` when the id prefix matches no known block type; the
    /// sequencer skips such entries without consuming timeline time. A
    /// `bezierCurve` block without its sub-configuration resolves to an
    /// inert block that still consumes its duration.
    pub fn resolve(config: &BlockConfig, ctx: &BlockContext) -> Option<Self> {
        let kind = config.kind()?;
        let radius = ctx.radius;
        let motion = match kind {
            BlockKind::Dolly => Motion::Dolly {
                delta: config.distance_delta.unwrap_or(radius * 0.5),
            },
            BlockKind::Pan => Motion::Pan {
                angle: config.angle_delta.unwrap_or(45.0).to_radians(),
            },
            BlockKind::Truck => Motion::Truck {
                dx: config.truck_x.unwrap_or(radius * 0.5),
            },
            BlockKind::Tilt => Motion::Tilt {
                angle: config.angle_delta.unwrap_or(30.0).to_radians(),
            },
            BlockKind::Pedestal => Motion::Pedestal {
                dy: config.truck_y.unwrap_or(radius * 0.5),
            },
            BlockKind::Roll => Motion::Roll {
                angle: config.angle_delta.unwrap_or(30.0).to_radians(),
            },
            BlockKind::Zoom => Motion::Zoom {
                fov: config.zoom_fov.unwrap_or(20.0),
            },
            BlockKind::DollyZoom => Motion::DollyZoom {
                fov: config.zoom_fov.unwrap_or(10.0),
            },
            BlockKind::Arc => Motion::Arc {
                angle: config.arc_angle.unwrap_or(90.0).to_radians(),
                distance_delta: config.distance_delta.unwrap_or(radius * 0.3),
            },
            BlockKind::Composite => Motion::Composite {
                rotate_azimuth: config.rotate_azimuth.unwrap_or(0.0).to_radians(),
                rotate_polar: config.rotate_polar.unwrap_or(0.0).to_radians(),
                dolly: config.dolly.unwrap_or(0.0),
                truck_x: config.truck_x.unwrap_or(0.0),
                truck_y: config.truck_y.unwrap_or(0.0),
            },
            BlockKind::MoveTo => Motion::MoveTo {
                state: resolve_move_to(config),
            },
            BlockKind::BezierCurve => match &config.bezier_curve {
                Some(curve) => Motion::Bezier {
                    points: curve
                        .control_points
                        .iter()
                        .map(|p| DVec3::from_array(*p))
                        .collect(),
                    look_at: curve.look_at_target.map(DVec3::from_array),
                    maintain_orientation: curve.maintain_orientation,
                    fallback_scale: radius,
                },
                None => {
                    tracing::warn!(
                        id = %config.id,
                        "bezierCurve block without curve config, holding for its duration"
                    );
                    Motion::Idle
                }
            },
        };

        let duration = config
            .duration
            .filter(|d| *d > 0.0)
            .unwrap_or_else(|| kind.default_duration());

        Some(Self {
            id: config.id.clone(),
            duration,
            easing: Easing::resolve(config.ease.as_deref()),
            start_state: config.start_state,
            motion,
        })
    }

    /// Unique instance id of the originating config.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Duration of this block's timeline segment, seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Easing curve driving this block's progress.
    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Begin a run: apply the forced start state, then capture the rig.
    ///
    /// The forced state is applied before capture so the captured "from"
    /// values already reflect it.
    pub fn on_start(&self, rig: &mut dyn CameraRig) -> RunState {
        if let Some(state) = &self.start_state {
            state.apply(rig);
        }
        let from = RigSnapshot::capture(rig);

        let spline = match &self.motion {
            Motion::Bezier {
                points,
                fallback_scale,
                ..
            } => {
                let spline = CatmullRom::new(points.clone())
                    .or_else(|| CatmullRom::new(fallback_path(&from, *fallback_scale)));
                debug_assert!(spline.is_some());
                spline
            }
            _ => None,
        };

        let move_target = match &self.motion {
            Motion::MoveTo { state } => Some(resolve_move_target(state, &from)),
            _ => None,
        };

        RunState {
            from,
            prev_progress: 0.0,
            spline,
            move_target,
        }
    }

    /// Apply the interpolated state for an eased progress `p` in `[0, 1]`.
    ///
    /// At `p = 0` the rig equals the captured start state; at `p = 1` it
    /// equals the start state plus the full delta (or the absolute target).
    pub fn on_update(&self, rig: &mut dyn CameraRig, state: &mut RunState, p: f64) {
        let from = state.from;
        match &self.motion {
            Motion::Dolly { delta } => {
                rig.dolly_to(from.distance + delta * p, false);
            }
            Motion::Pan { angle } => {
                // Camera stays put; the look-at target orbits around it.
                let offset = from.target - from.position;
                let rotation = DQuat::from_axis_angle(DVec3::Y, angle * p);
                rig.set_look_at(from.position, from.position + rotation * offset, false);
            }
            Motion::Truck { dx } => {
                let step = dx * (p - state.prev_progress);
                rig.truck(step, 0.0, false);
                state.prev_progress = p;
            }
            Motion::Tilt { angle } => {
                rig.set_polar(from.polar + angle * p);
            }
            Motion::Pedestal { dy } => {
                let step = dy * (p - state.prev_progress);
                rig.truck(0.0, step, false);
                state.prev_progress = p;
            }
            Motion::Roll { angle } => {
                let rotation = DQuat::from_axis_angle(from.forward, angle * p);
                rig.set_up(rotation * from.up);
                rig.set_roll(from.roll + angle * p);
            }
            Motion::Zoom { fov } => {
                if let Some(from_fov) = from.fov {
                    rig.set_fov(lerp(from_fov, *fov, p));
                    rig.update_projection();
                }
            }
            Motion::DollyZoom { fov } => {
                // Hitchcock zoom: the FOV changes while the distance is
                // recomputed so the subject's apparent size stays constant.
                if let Some(from_fov) = from.fov {
                    let current = lerp(from_fov, *fov, p);
                    rig.set_fov(current);
                    rig.update_projection();
                    let compensation = (from_fov.to_radians() / 2.0).tan()
                        / (current.to_radians() / 2.0).tan();
                    rig.dolly_to(from.distance * compensation, false);
                }
            }
            Motion::Arc {
                angle,
                distance_delta,
            } => {
                rig.set_azimuth(from.azimuth + angle * p);
                rig.dolly_to(from.distance + distance_delta * p, false);
            }
            Motion::Composite {
                rotate_azimuth,
                rotate_polar,
                dolly,
                truck_x,
                truck_y,
            } => {
                // One shared progress driver for every channel; independent
                // blocks would fight over the same rig properties.
                rig.set_azimuth(from.azimuth + rotate_azimuth * p);
                rig.set_polar(from.polar + rotate_polar * p);
                rig.dolly_to(from.distance + dolly * p, false);
                let step = p - state.prev_progress;
                rig.truck(truck_x * step, truck_y * step, false);
                state.prev_progress = p;
            }
            Motion::MoveTo { .. } => {
                if let Some(to) = state.move_target {
                    rig.set_azimuth(lerp(from.azimuth, to.azimuth, p));
                    rig.set_polar(lerp(from.polar, to.polar, p));
                    rig.dolly_to(lerp(from.distance, to.distance, p), false);
                    rig.set_target(from.target.lerp(to.center, p));
                    if let (Some(a), Some(b)) = (from.fov, to.fov) {
                        rig.set_fov(lerp(a, b, p));
                        rig.update_projection();
                    }
                    rig.set_roll(lerp(from.roll, to.roll, p));
                }
            }
            Motion::Bezier {
                look_at,
                maintain_orientation,
                ..
            } => {
                if let Some(spline) = &state.spline {
                    let position = spline.position(p);
                    if *maintain_orientation {
                        let look = position + from.forward * from.distance;
                        rig.set_look_at(position, look, false);
                        rig.set_up(from.up);
                    } else if let Some(target) = look_at {
                        rig.set_look_at(position, *target, false);
                    } else {
                        let direction = spline.tangent(p).unwrap_or(from.forward);
                        rig.set_look_at(position, position + direction * from.distance, false);
                    }
                }
            }
            Motion::Idle => {}
        }
    }
}

/// End state for a moveTo block, merging the `endState`/legacy fields with
/// an absolute camera/target position pair when one is given instead.
fn resolve_move_to(config: &BlockConfig) -> CameraState {
    let mut state = config.move_to_state();
    if let (Some(position), Some(target)) = (config.camera_position, config.target_position) {
        let (azimuth, polar, distance) =
            spherical_from(DVec3::from_array(position), DVec3::from_array(target));
        state.azimuth = state.azimuth.or(Some(azimuth));
        state.polar = state.polar.or(Some(polar));
        state.distance = state.distance.or(Some(distance));
        state.center = state.center.or(Some(target));
    }
    state
}

/// Fill a moveTo end state's gaps with the captured start values and route
/// azimuth through the shortest angular path.
fn resolve_move_target(state: &CameraState, from: &RigSnapshot) -> MoveTarget {
    let azimuth = match state.azimuth {
        Some(end) => shortest_angle_target(from.azimuth, end),
        None => from.azimuth,
    };
    MoveTarget {
        azimuth,
        polar: state.polar.unwrap_or(from.polar),
        distance: state.distance.unwrap_or(from.distance),
        center: state.center.map_or(from.target, DVec3::from_array),
        fov: state.fov.or(from.fov),
        roll: state.roll.unwrap_or(from.roll),
    }
}

/// Spherical orbit state for a camera at `position` looking at `target`.
fn spherical_from(position: DVec3, target: DVec3) -> (f64, f64, f64) {
    let offset = position - target;
    let distance = offset.length().max(1e-9);
    let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
    let azimuth = offset.x.atan2(offset.z);
    (azimuth, polar, distance)
}

/// Synthetic four-point path swept from the camera's current position, used
/// when a bezier block gives fewer than two control points.
fn fallback_path(from: &RigSnapshot, scale: f64) -> Vec<DVec3> {
    let s = scale.max(1e-3);
    let right = from.forward.cross(from.up).normalize_or_zero();
    let start = from.position;
    vec![
        start,
        start + right * (0.6 * s) + from.forward * (0.2 * s),
        start + right * (1.2 * s) + from.forward * (0.6 * s) + DVec3::Y * (0.2 * s),
        start + right * (1.5 * s) + from.forward * (1.2 * s),
    ]
}
