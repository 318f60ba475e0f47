//! Symmetric 4-digit-style section with a thin-airfoil polar.

use crate::adapter::{cosine_spacing, AeroCoefficients, FoilAdapter};
use crate::error::{FoilError, FoilResult};

/// Angle of attack where the linear lift range ends (rad).
pub(crate) const STALL_ALPHA: f64 = 0.24;

/// Lift-curve slope per radian.
const LIFT_SLOPE: f64 = 2.0 * std::f64::consts::PI;

/// Thin-airfoil lift with a post-stall fade toward flat-plate behavior, plus
/// a quadratic drag polar that rises sharply past stall.
pub(crate) fn thin_airfoil_polar(alpha: f64, cl_zero: f64, cd_zero: f64) -> AeroCoefficients {
    let lift = if alpha.abs() <= STALL_ALPHA {
        cl_zero + LIFT_SLOPE * alpha
    } else {
        let cl_stall = cl_zero + LIFT_SLOPE * STALL_ALPHA * alpha.signum();
        let fade = ((alpha.abs() - STALL_ALPHA) / 0.35).min(1.0);
        cl_stall * (1.0 - fade) + 1.1 * (2.0 * alpha).sin() * fade
    };

    let mut drag = cd_zero + 1.2 * alpha * alpha;
    if alpha.abs() > STALL_ALPHA {
        let over = alpha.abs() - STALL_ALPHA;
        drag += 2.0 * over * over;
    }

    AeroCoefficients { lift, drag }
}

/// NACA 4-digit half-thickness at unit-chord position `x`.
///
/// The trailing-edge coefficient is the closed-section variant (-0.1036).
pub(crate) fn half_thickness(x: f64, thickness_ratio: f64) -> f64 {
    5.0 * thickness_ratio
        * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x * x + 0.2843 * x * x * x
            - 0.1036 * x * x * x * x)
}

pub(crate) fn validate_section(
    chord: f64,
    thickness_ratio: f64,
    trailing_edge: f64,
) -> FoilResult<()> {
    if !(chord > 0.0 && chord.is_finite()) {
        return Err(FoilError::InvalidArg {
            what: "chord must be positive",
        });
    }
    if !(thickness_ratio > 0.0 && thickness_ratio < 0.8) {
        return Err(FoilError::InvalidArg {
            what: "thickness ratio must be in (0, 0.8)",
        });
    }
    if trailing_edge < 0.0 {
        return Err(FoilError::InvalidArg {
            what: "trailing edge thickness cannot be negative",
        });
    }
    Ok(())
}

/// Symmetric section: zero camber, printable trailing-edge pad.
#[derive(Clone, Debug)]
pub struct SymmetricFoil {
    chord: f64,
    twist: f64,
    thickness_ratio: f64,
    trailing_edge: f64,
}

impl SymmetricFoil {
    pub fn new(chord: f64, thickness_ratio: f64, trailing_edge: f64) -> FoilResult<Self> {
        validate_section(chord, thickness_ratio, trailing_edge)?;
        Ok(Self {
            chord,
            twist: 0.0,
            thickness_ratio,
            trailing_edge,
        })
    }
}

impl FoilAdapter for SymmetricFoil {
    fn name(&self) -> &str {
        "symmetric"
    }

    fn chord(&self) -> f64 {
        self.chord
    }

    fn set_chord(&mut self, chord: f64) {
        self.chord = chord.max(f64::EPSILON);
    }

    fn twist(&self) -> f64 {
        self.twist
    }

    fn set_twist(&mut self, twist: f64) {
        self.twist = twist;
    }

    fn thickness_ratio(&self) -> f64 {
        self.thickness_ratio
    }

    fn query_aero(&self, alpha: f64) -> AeroCoefficients {
        thin_airfoil_polar(alpha, 0.0, 0.010)
    }

    fn unit_section(&self, n: usize) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let te_half = 0.5 * self.trailing_edge / self.chord;
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for x in cosine_spacing(n) {
            let yt = half_thickness(x, self.thickness_ratio) + te_half * x;
            lower.push([x, -yt]);
            upper.push([x, yt]);
        }
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_bad_arguments() {
        assert!(SymmetricFoil::new(0.0, 0.1, 0.0).is_err());
        assert!(SymmetricFoil::new(0.02, 0.9, 0.0).is_err());
        assert!(SymmetricFoil::new(0.02, 0.1, -1.0).is_err());
    }

    #[test]
    fn zero_lift_at_zero_alpha() {
        let foil = SymmetricFoil::new(0.02, 0.1, 0.0).unwrap();
        let aero = foil.query_aero(0.0);
        assert_relative_eq!(aero.lift, 0.0, epsilon = 1e-12);
        assert!(aero.drag > 0.0);
    }

    #[test]
    fn lift_linear_before_stall() {
        let foil = SymmetricFoil::new(0.02, 0.1, 0.0).unwrap();
        let a1 = foil.query_aero(0.05).lift;
        let a2 = foil.query_aero(0.10).lift;
        assert_relative_eq!(a2 / a1, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn stall_caps_lift() {
        let foil = SymmetricFoil::new(0.02, 0.1, 0.0).unwrap();
        let pre = foil.query_aero(STALL_ALPHA).lift;
        let post = foil.query_aero(STALL_ALPHA + 0.2).lift;
        assert!(post < pre);
    }

    #[test]
    fn section_is_symmetric() {
        let foil = SymmetricFoil::new(0.02, 0.12, 0.0).unwrap();
        let (lower, upper) = foil.unit_section(21);
        for (l, u) in lower.iter().zip(upper.iter()) {
            assert_relative_eq!(l[1], -u[1], epsilon = 1e-12);
        }
    }

    #[test]
    fn max_chord_respects_depth_limit() {
        let foil = SymmetricFoil::new(0.02, 0.1, 0.0).unwrap();
        // Untwisted, the section height is ~thickness, so depth binds at
        // roughly depth_limit / thickness_ratio.
        let c = foil.max_chord(1.0, 0.002, 0.0);
        assert!(c < 1.0);
        assert!(c * foil.thickness_ratio() <= 0.002 * 1.05);
    }
}
