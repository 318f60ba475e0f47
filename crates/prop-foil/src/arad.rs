//! Tabulated ARA-D style research section.
//!
//! The polar comes from a small built-in table (low-Reynolds prop data),
//! linearly interpolated and clamped at the tabulated ends. Geometry reuses
//! the 4-digit thickness distribution over the ARA-D camber line.

use crate::adapter::{cosine_spacing, AeroCoefficients, FoilAdapter};
use crate::error::FoilResult;
use crate::symmetric::{half_thickness, validate_section};

/// (alpha_deg, cl, cd) rows, ascending in alpha.
const POLAR_TABLE: &[(f64, f64, f64)] = &[
    (-10.0, -0.50, 0.045),
    (-5.0, 0.05, 0.018),
    (0.0, 0.55, 0.010),
    (5.0, 1.05, 0.014),
    (10.0, 1.45, 0.028),
    (15.0, 1.35, 0.075),
    (20.0, 1.00, 0.160),
];

const ARAD_CAMBER: f64 = 0.035;
const ARAD_CAMBER_POS: f64 = 0.35;

#[derive(Clone, Debug)]
pub struct AradFoil {
    chord: f64,
    twist: f64,
    thickness_ratio: f64,
    trailing_edge: f64,
}

impl AradFoil {
    pub fn new(chord: f64, thickness_ratio: f64, trailing_edge: f64) -> FoilResult<Self> {
        validate_section(chord, thickness_ratio, trailing_edge)?;
        Ok(Self {
            chord,
            twist: 0.0,
            thickness_ratio,
            trailing_edge,
        })
    }

    fn camber_line(x: f64) -> f64 {
        let m = ARAD_CAMBER;
        let p = ARAD_CAMBER_POS;
        if x < p {
            m / (p * p) * (2.0 * p * x - x * x)
        } else {
            m / ((1.0 - p) * (1.0 - p)) * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x)
        }
    }
}

impl FoilAdapter for AradFoil {
    fn name(&self) -> &str {
        "arad"
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
        let alpha_deg = alpha.to_degrees();
        let first = POLAR_TABLE[0];
        let last = POLAR_TABLE[POLAR_TABLE.len() - 1];
        if alpha_deg <= first.0 {
            return AeroCoefficients {
                lift: first.1,
                drag: first.2,
            };
        }
        if alpha_deg >= last.0 {
            return AeroCoefficients {
                lift: last.1,
                drag: last.2,
            };
        }
        for pair in POLAR_TABLE.windows(2) {
            let (a0, cl0, cd0) = pair[0];
            let (a1, cl1, cd1) = pair[1];
            if alpha_deg <= a1 {
                let t = (alpha_deg - a0) / (a1 - a0);
                return AeroCoefficients {
                    lift: cl0 + t * (cl1 - cl0),
                    drag: cd0 + t * (cd1 - cd0),
                };
            }
        }
        // Table is ascending, so the loop always returns.
        AeroCoefficients {
            lift: last.1,
            drag: last.2,
        }
    }

    fn unit_section(&self, n: usize) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let te_half = 0.5 * self.trailing_edge / self.chord;
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for x in cosine_spacing(n) {
            let yc = Self::camber_line(x);
            let yt = half_thickness(x, self.thickness_ratio) + te_half * x;
            lower.push([x, yc - yt]);
            upper.push([x, yc + yt]);
        }
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn polar_interpolates_between_rows() {
        let foil = AradFoil::new(0.02, 0.1, 0.0).unwrap();
        let aero = foil.query_aero(2.5_f64.to_radians());
        assert_relative_eq!(aero.lift, 0.8, epsilon = 1e-9);
        assert_relative_eq!(aero.drag, 0.012, epsilon = 1e-9);
    }

    #[test]
    fn polar_clamps_outside_table() {
        let foil = AradFoil::new(0.02, 0.1, 0.0).unwrap();
        let low = foil.query_aero(-0.5);
        let high = foil.query_aero(0.6);
        assert_relative_eq!(low.lift, -0.50, epsilon = 1e-12);
        assert_relative_eq!(high.lift, 1.00, epsilon = 1e-12);
    }
}
