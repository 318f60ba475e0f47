//! Per-radius manufacturing envelopes derived from the propeller parameters.

use crate::error::{GeomError, GeomResult};
use crate::interp::{Pchip, PiecewiseLinear};
use prop_core::PropellerParameters;

/// Power-law exponent of the thickness taper.
const THICKNESS_EXPONENT: f64 = 0.3;

/// Geometry envelope queries for one parameter set.
///
/// All interpolators are owned fields built once in [`GeometryConstraints::new`];
/// a different parameter set means constructing a new value, so a cache can
/// never be silently reused across designs.
#[derive(Clone, Debug)]
pub struct GeometryConstraints {
    radius: f64,
    hub_radius: f64,
    tip_chord: f64,
    blade_count: u32,
    max_depth: PiecewiseLinear,
    scimitar: Pchip,
    // foil_thickness(r) = thickness_offset + thickness_gain * r^p, solved so
    // both boundary conditions hold exactly.
    thickness_offset: f64,
    thickness_gain: f64,
}

impl GeometryConstraints {
    pub fn new(params: &PropellerParameters) -> GeomResult<Self> {
        let radius = params.radius.value;
        let hub_radius = params.hub_radius.value;
        let hub_depth = params.hub_depth.value;
        if !(hub_radius > 0.0 && hub_radius < radius) {
            return Err(GeomError::InvalidArg {
                what: "hub radius must lie inside the tip radius",
            });
        }

        // Depth envelope: flat at hub depth across the hub, 3x hub depth at
        // a third of the span, tapering to 2x hub depth at the tip.
        let max_depth = PiecewiseLinear::new(
            vec![
                0.0,
                hub_radius / 2.0,
                hub_radius,
                1.1 * hub_radius,
                1.5 * hub_radius,
                radius / 3.0,
                0.9 * radius,
                radius,
            ],
            vec![
                hub_depth,
                hub_depth,
                hub_depth,
                hub_depth,
                1.1 * hub_depth,
                3.0 * hub_depth,
                2.4 * hub_depth,
                2.0 * hub_depth,
            ],
        )?;

        // Forward/aft sweep: zero at the hub, peak at 80% span, back to zero
        // at the tip.
        let peak = radius * params.scimitar_percent / 100.0;
        let scimitar = Pchip::new(
            vec![0.0, hub_radius, 0.8 * radius, radius],
            vec![0.0, 0.0, peak, 0.0],
        )?;

        // Thickness power law with t(hub_radius) = hub_depth and
        // t(radius) = 0.1 * hub_depth.
        let t_root = hub_depth;
        let t_tip = 0.1 * hub_depth;
        let gain = (t_root - t_tip)
            / (hub_radius.powf(THICKNESS_EXPONENT) - radius.powf(THICKNESS_EXPONENT));
        let offset = t_tip - gain * radius.powf(THICKNESS_EXPONENT);

        Ok(Self {
            radius,
            hub_radius,
            tip_chord: params.tip_chord.value,
            blade_count: params.blade_count,
            max_depth,
            scimitar,
            thickness_offset: offset,
            thickness_gain: gain,
        })
    }

    fn check_radius(&self, r: f64) -> GeomResult<()> {
        if !(0.0..=self.radius * (1.0 + 1e-9)).contains(&r) {
            return Err(GeomError::OutOfRange {
                what: "radius",
                value: r,
            });
        }
        Ok(())
    }

    /// Allowed blade depth along the prop axis (m).
    pub fn max_depth(&self, r: f64) -> GeomResult<f64> {
        self.check_radius(r)?;
        Ok(self.max_depth.eval(r))
    }

    /// Allowed chord (m): the binding one of the inverse-square strength
    /// limit and the blade-count rotational clearance limit.
    pub fn max_chord(&self, r: f64, twist: f64) -> GeomResult<f64> {
        self.check_radius(r)?;
        if r <= 0.0 {
            return Err(GeomError::OutOfRange {
                what: "radius",
                value: r,
            });
        }
        if twist.abs() >= std::f64::consts::FRAC_PI_2 {
            return Err(GeomError::InvalidArg {
                what: "twist must lie in (-pi/2, pi/2)",
            });
        }
        let k = self.tip_chord * self.radius * self.radius;
        let strength = k / (r * r);
        let clearance =
            2.0 * std::f64::consts::PI * r / (self.blade_count as f64 + 2.0) / twist.cos();
        Ok(strength.min(clearance))
    }

    /// Allowed foil thickness (m), power-law taper from hub depth at the hub
    /// to a tenth of it at the tip.
    pub fn foil_thickness(&self, r: f64) -> GeomResult<f64> {
        self.check_radius(r)?;
        Ok(self.thickness_offset + self.thickness_gain * r.powf(THICKNESS_EXPONENT))
    }

    /// Forward/aft sweep offset (m). Export only, never force computation.
    pub fn scimitar_offset(&self, r: f64) -> GeomResult<f64> {
        self.check_radius(r)?;
        Ok(self.scimitar.eval(r))
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn hub_radius(&self) -> f64 {
        self.hub_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use prop_core::units::{m, mm, mps};
    use prop_core::PropellerParameters;

    fn reference() -> PropellerParameters {
        PropellerParameters {
            name: "test".to_string(),
            radius: m(0.15),
            hub_radius: m(0.02),
            hub_depth: m(0.01),
            tip_chord: m(0.01),
            trailing_edge: mm(0.5),
            center_hole: mm(5.0),
            scimitar_percent: 10.0,
            forward_airspeed: mps(0.0),
            blade_count: 2,
        }
    }

    #[test]
    fn thickness_boundary_conditions_hold_exactly() {
        let g = GeometryConstraints::new(&reference()).unwrap();
        assert_relative_eq!(g.foil_thickness(0.02).unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(g.foil_thickness(0.15).unwrap(), 0.001, epsilon = 1e-12);
    }

    #[test]
    fn depth_envelope_follows_control_points() {
        let g = GeometryConstraints::new(&reference()).unwrap();
        assert_relative_eq!(g.max_depth(0.0).unwrap(), 0.01);
        assert_relative_eq!(g.max_depth(0.05).unwrap(), 0.03);
        assert_relative_eq!(g.max_depth(0.15).unwrap(), 0.02);
    }

    #[test]
    fn out_of_range_radius_rejected() {
        let g = GeometryConstraints::new(&reference()).unwrap();
        assert!(g.max_depth(-0.01).is_err());
        assert!(g.max_depth(0.2).is_err());
        assert!(g.foil_thickness(0.151).is_err());
    }

    #[test]
    fn scimitar_vanishes_at_hub_and_tip() {
        let g = GeometryConstraints::new(&reference()).unwrap();
        assert_relative_eq!(g.scimitar_offset(0.0).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(g.scimitar_offset(0.15).unwrap(), 0.0, epsilon = 1e-12);
        assert!(g.scimitar_offset(0.12).unwrap() > 0.0);
    }

    #[test]
    fn near_vertical_twist_rejected() {
        let g = GeometryConstraints::new(&reference()).unwrap();
        assert!(g.max_chord(0.1, 1.6).is_err());
    }

    proptest! {
        #[test]
        fn max_chord_never_exceeds_clearance(r in 0.021f64..0.15, twist in -0.6f64..0.6) {
            let g = GeometryConstraints::new(&reference()).unwrap();
            let c = g.max_chord(r, twist).unwrap();
            let clearance = 2.0 * std::f64::consts::PI * r / 4.0 / twist.cos();
            prop_assert!(c <= clearance * (1.0 + 1e-12));
        }

        #[test]
        fn max_chord_non_increasing_where_strength_binds(
            r in 0.09f64..0.14, dr in 0.001f64..0.01
        ) {
            // Outboard of mid-span the inverse-square limit dominates for the
            // reference parameters, so the limit must decay with radius.
            let g = GeometryConstraints::new(&reference()).unwrap();
            let c0 = g.max_chord(r, 0.0).unwrap();
            let c1 = g.max_chord(r + dr, 0.0).unwrap();
            let clearance0 = 2.0 * std::f64::consts::PI * r / 4.0;
            if c0 < clearance0 {
                prop_assert!(c1 <= c0 * (1.0 + 1e-12));
            }
        }
    }
}
