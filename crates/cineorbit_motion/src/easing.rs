// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named easing curves for motion block progress.
//!
//! Block configs reference easings by name (`"power2.inOut"` style). The
//! catalog is a fixed set of acceleration profiles; unknown names degrade to
//! the default curve rather than failing, matching the engine's
//! skip-don't-abort philosophy.

use indexmap::IndexMap;
use std::f64::consts::PI;
use std::sync::LazyLock;

/// Base curve family of an easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseCurve {
    /// Constant velocity
    Linear,
    /// Quadratic
    Power1,
    /// Cubic
    Power2,
    /// Quartic
    Power3,
    /// Quintic
    Power4,
    /// Sinusoidal
    Sine,
    /// Exponential
    Expo,
    /// Overshooting
    Back,
    /// Oscillating spring
    Elastic,
    /// Bouncing settle
    Bounce,
}

/// Which end(s) of the curve accelerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseMode {
    /// Accelerate from rest
    In,
    /// Decelerate to rest
    Out,
    /// Accelerate then decelerate
    InOut,
}

/// A named easing curve: family plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Easing {
    /// Curve family
    pub curve: EaseCurve,
    /// Direction
    pub mode: EaseMode,
}

/// Catalog of every named easing, in a stable enumeration order.
static CATALOG: LazyLock<IndexMap<&'static str, Easing>> = LazyLock::new(|| {
    use EaseCurve::*;
    use EaseMode::*;
    let entries: [(&'static str, EaseCurve, EaseMode); 28] = [
        ("linear", Linear, InOut),
        ("power1.in", Power1, In),
        ("power1.out", Power1, Out),
        ("power1.inOut", Power1, InOut),
        ("power2.in", Power2, In),
        ("power2.out", Power2, Out),
        ("power2.inOut", Power2, InOut),
        ("power3.in", Power3, In),
        ("power3.out", Power3, Out),
        ("power3.inOut", Power3, InOut),
        ("power4.in", Power4, In),
        ("power4.out", Power4, Out),
        ("power4.inOut", Power4, InOut),
        ("sine.in", Sine, In),
        ("sine.out", Sine, Out),
        ("sine.inOut", Sine, InOut),
        ("expo.in", Expo, In),
        ("expo.out", Expo, Out),
        ("expo.inOut", Expo, InOut),
        ("back.in", Back, In),
        ("back.out", Back, Out),
        ("back.inOut", Back, InOut),
        ("elastic.in", Elastic, In),
        ("elastic.out", Elastic, Out),
        ("elastic.inOut", Elastic, InOut),
        ("bounce.in", Bounce, In),
        ("bounce.out", Bounce, Out),
        ("bounce.inOut", Bounce, InOut),
    ];
    entries
        .into_iter()
        .map(|(name, curve, mode)| (name, Easing { curve, mode }))
        .collect()
});

impl Easing {
    /// The default easing applied when a block names none: `power2.inOut`.
    pub const DEFAULT: Easing = Easing {
        curve: EaseCurve::Power2,
        mode: EaseMode::InOut,
    };

    /// Look up an easing by its catalog name.
    pub fn by_name(name: &str) -> Option<Easing> {
        CATALOG.get(name).copied()
    }

    /// Resolve a possibly-absent or unknown name, degrading to the default.
    pub fn resolve(name: Option<&str>) -> Easing {
        match name {
            None => Easing::DEFAULT,
            Some(name) => Easing::by_name(name).unwrap_or_else(|| {
                tracing::warn!(ease = name, "unknown easing name, using default");
                Easing::DEFAULT
            }),
        }
    }

    /// Enumerate the catalog names in a stable order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        CATALOG.keys().copied()
    }

    /// Map a linear time fraction to eased progress.
    ///
    /// Input is clamped to `[0, 1]`. The endpoints are exact: `apply(0.0)`
    /// is `0.0` and `apply(1.0)` is `1.0` for every curve, which the
    /// timeline relies on for gapless block chaining.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        if t == 0.0 {
            return 0.0;
        }
        if t == 1.0 {
            return 1.0;
        }
        if self.curve == EaseCurve::Linear {
            return t;
        }
        match self.mode {
            EaseMode::In => ease_in(self.curve, t),
            EaseMode::Out => 1.0 - ease_in(self.curve, 1.0 - t),
            EaseMode::InOut => {
                if t < 0.5 {
                    ease_in(self.curve, t * 2.0) / 2.0
                } else {
                    1.0 - ease_in(self.curve, (1.0 - t) * 2.0) / 2.0
                }
            }
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Easing::DEFAULT
    }
}

/// The ease-in primitive for each curve family.
fn ease_in(curve: EaseCurve, t: f64) -> f64 {
    match curve {
        EaseCurve::Linear => t,
        EaseCurve::Power1 => t * t,
        EaseCurve::Power2 => t * t * t,
        EaseCurve::Power3 => t * t * t * t,
        EaseCurve::Power4 => t * t * t * t * t,
        EaseCurve::Sine => 1.0 - (t * PI / 2.0).cos(),
        EaseCurve::Expo => (10.0 * (t - 1.0)).exp2(),
        EaseCurve::Back => {
            const C1: f64 = 1.70158;
            const C3: f64 = C1 + 1.0;
            C3 * t * t * t - C1 * t * t
        }
        EaseCurve::Elastic => {
            const C4: f64 = (2.0 * PI) / 3.0;
            -(10.0 * t - 10.0).exp2() * ((t * 10.0 - 10.75) * C4).sin()
        }
        EaseCurve::Bounce => 1.0 - bounce_out(1.0 - t),
    }
}

fn bounce_out(t: f64) -> f64 {
    const N1: f64 = 7.5625;
    const D1: f64 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_lookup() {
        let ease = Easing::by_name("power2.inOut").unwrap();
        assert_eq!(ease.curve, EaseCurve::Power2);
        assert_eq!(ease.mode, EaseMode::InOut);

        let ease = Easing::by_name("bounce.out").unwrap();
        assert_eq!(ease.curve, EaseCurve::Bounce);
        assert_eq!(ease.mode, EaseMode::Out);

        assert!(Easing::by_name("spring.hyper").is_none());
    }

    #[test]
    fn test_resolve_degrades_to_default() {
        assert_eq!(Easing::resolve(None), Easing::DEFAULT);
        assert_eq!(Easing::resolve(Some("not-a-curve")), Easing::DEFAULT);
        assert_eq!(
            Easing::resolve(Some("sine.in")),
            Easing::by_name("sine.in").unwrap()
        );
    }

    #[test]
    fn test_endpoints_are_exact_for_every_curve() {
        for name in Easing::names() {
            let ease = Easing::by_name(name).unwrap();
            assert_eq!(ease.apply(0.0), 0.0, "apply(0) for {name}");
            assert_eq!(ease.apply(1.0), 1.0, "apply(1) for {name}");
            // Out-of-range inputs clamp to the endpoints.
            assert_eq!(ease.apply(-0.5), 0.0, "apply(-0.5) for {name}");
            assert_eq!(ease.apply(1.5), 1.0, "apply(1.5) for {name}");
        }
    }

    #[test]
    fn test_monotonic_power_curves() {
        let ease = Easing::by_name("power2.inOut").unwrap();
        let mut last = 0.0;
        for i in 1..=100 {
            let p = ease.apply(i as f64 / 100.0);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_catalog_enumeration_order_is_stable() {
        let names: Vec<_> = Easing::names().collect();
        assert_eq!(names[0], "linear");
        assert_eq!(names[1], "power1.in");
        assert!(names.contains(&"elastic.inOut"));
    }
}
