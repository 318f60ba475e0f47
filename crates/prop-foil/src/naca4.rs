//! NACA 4-digit camber-series section.

use crate::adapter::{cosine_spacing, AeroCoefficients, FoilAdapter};
use crate::error::{FoilError, FoilResult};
use crate::symmetric::{half_thickness, thin_airfoil_polar, validate_section};

#[derive(Clone, Debug)]
pub struct Naca4Foil {
    chord: f64,
    twist: f64,
    thickness_ratio: f64,
    trailing_edge: f64,
    /// Maximum camber as a fraction of chord (the "2" in 2412 is 0.02).
    camber: f64,
    /// Chordwise position of maximum camber (the "4" in 2412 is 0.4).
    camber_pos: f64,
}

impl Naca4Foil {
    pub fn new(
        chord: f64,
        thickness_ratio: f64,
        trailing_edge: f64,
        camber: f64,
        camber_pos: f64,
    ) -> FoilResult<Self> {
        validate_section(chord, thickness_ratio, trailing_edge)?;
        if !(0.0..0.1).contains(&camber) {
            return Err(FoilError::InvalidArg {
                what: "camber must be in [0, 0.1)",
            });
        }
        if !(camber_pos > 0.0 && camber_pos < 1.0) {
            return Err(FoilError::InvalidArg {
                what: "camber position must be in (0, 1)",
            });
        }
        Ok(Self {
            chord,
            twist: 0.0,
            thickness_ratio,
            trailing_edge,
            camber,
            camber_pos,
        })
    }

    fn camber_line(&self, x: f64) -> f64 {
        let m = self.camber;
        let p = self.camber_pos;
        if x < p {
            m / (p * p) * (2.0 * p * x - x * x)
        } else {
            m / ((1.0 - p) * (1.0 - p)) * ((1.0 - 2.0 * p) + 2.0 * p * x - x * x)
        }
    }
}

impl FoilAdapter for Naca4Foil {
    fn name(&self) -> &str {
        "naca4"
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
        // Thin-airfoil zero-alpha lift for a 4-digit camber line.
        let cl_zero = 4.0 * std::f64::consts::PI * self.camber;
        thin_airfoil_polar(alpha, cl_zero, 0.008)
    }

    fn unit_section(&self, n: usize) -> (Vec<[f64; 2]>, Vec<[f64; 2]>) {
        let te_half = 0.5 * self.trailing_edge / self.chord;
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for x in cosine_spacing(n) {
            let yc = self.camber_line(x);
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

    fn naca2412(chord: f64) -> Naca4Foil {
        Naca4Foil::new(chord, 0.12, 0.0, 0.02, 0.4).unwrap()
    }

    #[test]
    fn camber_line_peaks_at_camber_pos() {
        let foil = naca2412(0.02);
        assert_relative_eq!(foil.camber_line(0.4), 0.02, epsilon = 1e-12);
        assert!(foil.camber_line(0.2) < 0.02);
        assert!(foil.camber_line(0.8) < 0.02);
        assert_relative_eq!(foil.camber_line(0.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn cambered_foil_lifts_at_zero_alpha() {
        let foil = naca2412(0.02);
        let aero = foil.query_aero(0.0);
        assert!(aero.lift > 0.2 && aero.lift < 0.3);
    }

    #[test]
    fn rejects_out_of_range_camber() {
        assert!(Naca4Foil::new(0.02, 0.12, 0.0, 0.2, 0.4).is_err());
        assert!(Naca4Foil::new(0.02, 0.12, 0.0, 0.02, 0.0).is_err());
    }
}
