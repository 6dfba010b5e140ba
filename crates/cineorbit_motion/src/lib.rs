// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera motion blocks for CineOrbit.
//!
//! This crate turns declarative, serializable camera-move descriptions into
//! deterministic frame-by-frame interpolation over an orbit camera rig:
//! - Block configuration model (type id, duration, easing, parameters)
//! - Motion block factory over a closed catalog of maneuvers
//! - Named easing curve catalog
//! - Camera rig adapter contract plus a reference orbit rig
//!
//! ## Architecture
//!
//! The engine is built on:
//! - A [`CameraRig`] capability trait hosts adapt their camera controls to
//! - [`MotionBlock`] values with explicit `on_start`/`on_update` run records
//! - Shortest-angle and centripetal Catmull-Rom helpers
//! - Eased `[0, 1]` progress supplied by the sequencer's timeline

pub mod block;
pub mod config;
pub mod easing;
pub mod math;
pub mod rig;

pub use block::{BlockContext, MotionBlock, RigSnapshot, RunState};
pub use config::{BezierCurveConfig, BlockConfig, BlockKind, CameraState};
pub use easing::{EaseCurve, EaseMode, Easing};
pub use math::{lerp, shortest_angle_target, CatmullRom};
pub use rig::{CameraRig, OrbitRig};
