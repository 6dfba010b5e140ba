// SPDX-License-Identifier: MIT OR Apache-2.0
//! Angle and spline helpers shared by the motion blocks.

use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Minimum knot spacing for the centripetal parameterization.
const KNOT_EPSILON: f64 = 1e-9;

/// Resolve the azimuth value that reaches `end` from `start` along the
/// shortest angular path.
///
/// Both angles are radians. The returned value is `start` plus a difference
/// normalized into `(-PI, PI]`, so the rotation never exceeds a half turn in
/// either direction. Angles exactly half a turn apart resolve to the
/// positive direction.
pub fn shortest_angle_target(start: f64, end: f64) -> f64 {
    let mut diff = ((end - start) % TAU + TAU) % TAU;
    if diff > PI {
        diff -= TAU;
    }
    start + diff
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// A centripetal Catmull-Rom spline through a list of control points.
///
/// The curve passes through every control point. Centripetal
/// parameterization avoids the loops and cusps the uniform variant produces
/// on unevenly spaced points.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<DVec3>,
}

impl CatmullRom {
    /// Build a spline through `points`. Requires at least two points.
    pub fn new(points: Vec<DVec3>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self { points })
    }

    /// The control points the curve passes through.
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Sample the curve position at `t` in `[0, 1]`.
    ///
    /// `t = 0` yields the first control point and `t = 1` the last, exactly.
    pub fn position(&self, t: f64) -> DVec3 {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.0 {
            return self.points[0];
        }
        if t >= 1.0 {
            return self.points[self.points.len() - 1];
        }

        let segment_count = self.points.len() - 1;
        let scaled = t * segment_count as f64;
        let index = (scaled as usize).min(segment_count - 1);
        let local = scaled - index as f64;

        let p1 = self.points[index];
        let p2 = self.points[index + 1];
        let p0 = if index == 0 {
            // Mirror the first point to pad the open end.
            p1 * 2.0 - p2
        } else {
            self.points[index - 1]
        };
        let p3 = if index + 2 < self.points.len() {
            self.points[index + 2]
        } else {
            p2 * 2.0 - p1
        };

        sample_segment(p0, p1, p2, p3, local)
    }

    /// Approximate the curve tangent at `t` via central differences.
    ///
    /// Returns `None` when the curve is locally degenerate (coincident
    /// points), in which case the caller keeps its previous orientation.
    pub fn tangent(&self, t: f64) -> Option<DVec3> {
        let h = 1e-4;
        let ahead = self.position((t + h).min(1.0));
        let behind = self.position((t - h).max(0.0));
        (ahead - behind).try_normalize()
    }
}

/// Evaluate one centripetal Catmull-Rom segment at `u` in `[0, 1]` using the
/// Barry-Goldman pyramid.
fn sample_segment(p0: DVec3, p1: DVec3, p2: DVec3, p3: DVec3, u: f64) -> DVec3 {
    let t0 = 0.0;
    let t1 = t0 + knot_interval(p0, p1);
    let t2 = t1 + knot_interval(p1, p2);
    let t3 = t2 + knot_interval(p2, p3);
    let t = lerp(t1, t2, u);

    let a1 = blend(p0, p1, t0, t1, t);
    let a2 = blend(p1, p2, t1, t2, t);
    let a3 = blend(p2, p3, t2, t3, t);
    let b1 = blend(a1, a2, t0, t2, t);
    let b2 = blend(a2, a3, t1, t3, t);
    blend(b1, b2, t1, t2, t)
}

/// Centripetal knot spacing: square root of the chord length.
fn knot_interval(a: DVec3, b: DVec3) -> f64 {
    a.distance(b).sqrt().max(KNOT_EPSILON)
}

fn blend(a: DVec3, b: DVec3, ta: f64, tb: f64, t: f64) -> DVec3 {
    let span = tb - ta;
    if span.abs() < KNOT_EPSILON {
        return a;
    }
    a * ((tb - t) / span) + b * ((t - ta) / span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deg(d: f64) -> f64 {
        d.to_radians()
    }

    #[test]
    fn test_shortest_angle_wraparound() {
        // 341 degrees to 19 degrees is a +38 degree rotation, not -322.
        let target = shortest_angle_target(deg(341.0), deg(19.0));
        assert!((target - (deg(341.0) + deg(38.0))).abs() < 1e-9);

        // 350 to 10 crosses zero with a +20 degree rotation.
        let target = shortest_angle_target(deg(350.0), deg(10.0));
        assert!((target - (deg(350.0) + deg(20.0))).abs() < 1e-9);

        // 10 to 350 rotates -20 degrees.
        let target = shortest_angle_target(deg(10.0), deg(350.0));
        assert!((target - (deg(10.0) - deg(20.0))).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_angle_plain_difference() {
        let target = shortest_angle_target(deg(30.0), deg(75.0));
        assert!((target - deg(75.0)).abs() < 1e-9);
    }

    #[test]
    fn test_shortest_angle_half_turn_is_positive() {
        // Exactly 180 degrees apart must deterministically pick the
        // positive direction.
        let target = shortest_angle_target(0.0, PI);
        assert!((target - PI).abs() < 1e-9);

        let target = shortest_angle_target(deg(90.0), deg(270.0));
        assert!((target - (deg(90.0) + PI)).abs() < 1e-9);
    }

    #[test]
    fn test_spline_requires_two_points() {
        assert!(CatmullRom::new(vec![]).is_none());
        assert!(CatmullRom::new(vec![DVec3::ZERO]).is_none());
        assert!(CatmullRom::new(vec![DVec3::ZERO, DVec3::X]).is_some());
    }

    #[test]
    fn test_spline_hits_endpoints() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 2.0, 0.0),
            DVec3::new(3.0, 2.0, -1.0),
            DVec3::new(4.0, 0.0, -2.0),
        ];
        let spline = CatmullRom::new(points.clone()).unwrap();
        assert!(spline.position(0.0).distance(points[0]) < 1e-12);
        assert!(spline.position(1.0).distance(points[3]) < 1e-12);
    }

    #[test]
    fn test_spline_passes_through_interior_points() {
        let points = vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::new(2.0, 0.0, 0.0),
        ];
        let spline = CatmullRom::new(points.clone()).unwrap();
        // Interior control point sits at the segment boundary t = 0.5.
        assert!(spline.position(0.5).distance(points[1]) < 1e-9);
    }

    #[test]
    fn test_spline_tangent_follows_travel_direction() {
        let spline = CatmullRom::new(vec![
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 0.0, 0.0),
        ])
        .unwrap();
        let tangent = spline.tangent(0.5).unwrap();
        assert!(tangent.dot(DVec3::X) > 0.99);
    }
}
