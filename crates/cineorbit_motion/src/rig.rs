// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera rig adapter contract and a reference orbit rig.
//!
//! Motion blocks never talk to a renderer directly; they mutate a
//! [`CameraRig`] once per frame. Hosts adapt their camera-control object to
//! this trait. [`OrbitRig`] is a complete, deterministic implementation used
//! by the engine's tests and usable headless.

use glam::DVec3;
use std::f64::consts::PI;

/// Capability interface over an orbit-style camera control.
///
/// All angles are radians except the field of view, which is degrees. The
/// `transition` flags on the mutating operations ask the adapter to skip its
/// own built-in smoothing; the engine always passes `false` because the
/// timeline supplies the interpolation itself.
pub trait CameraRig {
    /// Horizontal orbit angle around the target, radians.
    fn azimuth(&self) -> f64;
    /// Set the horizontal orbit angle, radians.
    fn set_azimuth(&mut self, azimuth: f64);

    /// Vertical orbit angle from the up axis, radians.
    fn polar(&self) -> f64;
    /// Set the vertical orbit angle, radians.
    fn set_polar(&mut self, polar: f64);

    /// Distance from the camera to its orbit target.
    fn distance(&self) -> f64;
    /// Move the camera to an absolute distance from the target.
    fn dolly_to(&mut self, distance: f64, transition: bool);

    /// Translate camera and target together in view-plane units.
    fn truck(&mut self, dx: f64, dy: f64, transition: bool);

    /// Current orbit target point.
    fn target(&self) -> DVec3;
    /// Set the orbit target point.
    fn set_target(&mut self, target: DVec3);

    /// Current camera world position.
    fn position(&self) -> DVec3;
    /// Reposition camera and target absolutely.
    fn set_look_at(&mut self, position: DVec3, target: DVec3, transition: bool);

    /// Vertical field of view in degrees, `None` for cameras without one
    /// (orthographic projections).
    fn fov(&self) -> Option<f64>;
    /// Set the field of view in degrees. Ignored by cameras without one.
    fn set_fov(&mut self, fov_degrees: f64);
    /// Refresh the projection matrix after a field-of-view change.
    fn update_projection(&mut self);

    /// Camera up vector.
    fn up(&self) -> DVec3;
    /// Set the camera up vector.
    fn set_up(&mut self, up: DVec3);
    /// World-space viewing direction, unit length.
    fn forward(&self) -> DVec3;

    /// Roll angle about the viewing axis, radians.
    fn roll(&self) -> f64;
    /// Set the roll angle, radians.
    fn set_roll(&mut self, roll: f64);

    /// Smoothing factor applied to manual camera input.
    fn damping(&self) -> f64;
    /// Set the smoothing factor.
    fn set_damping(&mut self, damping: f64);
}

/// Polar clamp keeping the camera off the exact poles, where azimuth
/// degenerates.
const POLAR_LIMIT: f64 = 1e-4;

/// A spherical-state orbit rig with a derived Cartesian position.
///
/// State is azimuth/polar/distance around a target point; the world
/// position is recomputed from them on demand. Matches the common
/// `y`-up spherical convention: `x = r sin(polar) sin(azimuth)`,
/// `y = r cos(polar)`, `z = r sin(polar) cos(azimuth)`.
#[derive(Debug, Clone)]
pub struct OrbitRig {
    azimuth: f64,
    polar: f64,
    distance: f64,
    target: DVec3,
    fov: Option<f64>,
    up: DVec3,
    roll: f64,
    damping: f64,
    projection_dirty: bool,
}

impl OrbitRig {
    /// A perspective rig with the given vertical field of view in degrees.
    pub fn perspective(fov_degrees: f64) -> Self {
        Self {
            azimuth: 0.0,
            polar: PI / 2.0,
            distance: 5.0,
            target: DVec3::ZERO,
            fov: Some(fov_degrees),
            up: DVec3::Y,
            roll: 0.0,
            damping: 0.05,
            projection_dirty: false,
        }
    }

    /// An orthographic rig; field-of-view dependent blocks become no-ops.
    pub fn orthographic() -> Self {
        Self {
            fov: None,
            ..Self::perspective(0.0)
        }
    }

    /// Unit vector from the target toward the camera.
    fn radial(&self) -> DVec3 {
        DVec3::new(
            self.polar.sin() * self.azimuth.sin(),
            self.polar.cos(),
            self.polar.sin() * self.azimuth.cos(),
        )
    }

    /// Whether a projection refresh is pending.
    pub fn projection_dirty(&self) -> bool {
        self.projection_dirty
    }
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self::perspective(50.0)
    }
}

impl CameraRig for OrbitRig {
    fn azimuth(&self) -> f64 {
        self.azimuth
    }

    fn set_azimuth(&mut self, azimuth: f64) {
        self.azimuth = azimuth;
    }

    fn polar(&self) -> f64 {
        self.polar
    }

    fn set_polar(&mut self, polar: f64) {
        self.polar = polar.clamp(POLAR_LIMIT, PI - POLAR_LIMIT);
    }

    fn distance(&self) -> f64 {
        self.distance
    }

    fn dolly_to(&mut self, distance: f64, _transition: bool) {
        self.distance = distance.max(POLAR_LIMIT);
    }

    fn truck(&mut self, dx: f64, dy: f64, _transition: bool) {
        let forward = self.forward();
        let right = forward.cross(self.up).normalize_or_zero();
        let view_up = right.cross(forward);
        // Position is derived from the target, so shifting the target
        // translates the whole rig without changing the orbit angles.
        self.target += right * dx + view_up * dy;
    }

    fn target(&self) -> DVec3 {
        self.target
    }

    fn set_target(&mut self, target: DVec3) {
        self.target = target;
    }

    fn position(&self) -> DVec3 {
        self.target + self.radial() * self.distance
    }

    fn set_look_at(&mut self, position: DVec3, target: DVec3, _transition: bool) {
        let offset = position - target;
        let distance = offset.length();
        self.target = target;
        if distance < POLAR_LIMIT {
            return;
        }
        self.distance = distance;
        self.polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        self.azimuth = offset.x.atan2(offset.z);
    }

    fn fov(&self) -> Option<f64> {
        self.fov
    }

    fn set_fov(&mut self, fov_degrees: f64) {
        if self.fov.is_some() {
            self.fov = Some(fov_degrees);
            self.projection_dirty = true;
        }
    }

    fn update_projection(&mut self) {
        self.projection_dirty = false;
    }

    fn up(&self) -> DVec3 {
        self.up
    }

    fn set_up(&mut self, up: DVec3) {
        self.up = up.normalize_or_zero();
    }

    fn forward(&self) -> DVec3 {
        (-self.radial()).normalize_or_zero()
    }

    fn roll(&self) -> f64 {
        self.roll
    }

    fn set_roll(&mut self, roll: f64) {
        self.roll = roll;
    }

    fn damping(&self) -> f64 {
        self.damping
    }

    fn set_damping(&mut self, damping: f64) {
        self.damping = damping;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_spherical_state() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_azimuth(0.0);
        rig.set_polar(PI / 2.0);
        rig.dolly_to(4.0, false);
        rig.set_target(DVec3::ZERO);
        // Azimuth 0, polar 90deg looks down +z from (0, 0, 4).
        assert!(rig.position().distance(DVec3::new(0.0, 0.0, 4.0)) < 1e-12);
        assert!(rig.forward().distance(DVec3::new(0.0, 0.0, -1.0)) < 1e-12);
    }

    #[test]
    fn test_look_at_round_trip() {
        let mut rig = OrbitRig::perspective(50.0);
        let position = DVec3::new(3.0, 2.0, -1.0);
        let target = DVec3::new(0.5, 1.0, 0.5);
        rig.set_look_at(position, target, false);
        assert!(rig.position().distance(position) < 1e-9);
        assert!(rig.target().distance(target) < 1e-9);
    }

    #[test]
    fn test_truck_preserves_orbit_angles() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_azimuth(0.7);
        rig.set_polar(1.1);
        let azimuth = rig.azimuth();
        let polar = rig.polar();
        let distance = rig.distance();
        rig.truck(1.5, -0.5, false);
        assert_eq!(rig.azimuth(), azimuth);
        assert_eq!(rig.polar(), polar);
        assert_eq!(rig.distance(), distance);
        assert!(rig.target().distance(DVec3::ZERO) > 1.0);
    }

    #[test]
    fn test_orthographic_ignores_fov() {
        let mut rig = OrbitRig::orthographic();
        assert_eq!(rig.fov(), None);
        rig.set_fov(30.0);
        assert_eq!(rig.fov(), None);
        assert!(!rig.projection_dirty());
    }

    #[test]
    fn test_fov_marks_projection_dirty() {
        let mut rig = OrbitRig::perspective(50.0);
        rig.set_fov(30.0);
        assert!(rig.projection_dirty());
        rig.update_projection();
        assert!(!rig.projection_dirty());
    }
}
