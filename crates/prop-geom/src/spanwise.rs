//! Smooth spanwise twist and chord curves fitted through station results.

use crate::error::{GeomError, GeomResult};
use crate::interp::{moving_average, polyfit, Pchip, Polynomial};

/// Highest twist polynomial degree, matching the original blade form fit.
const MAX_TWIST_DEGREE: usize = 4;

/// Smoothing window applied to chords before the monotone fit.
const CHORD_SMOOTH_WINDOW: usize = 3;

/// Continuous twist and chord as functions of radius.
///
/// Derived from one station sequence; rebuilt whenever the sequence changes.
#[derive(Clone, Debug)]
pub struct SpanwiseProfile {
    twist: Polynomial,
    chord: Pchip,
}

impl SpanwiseProfile {
    /// Fit curves through per-station results, ordered hub to tip with
    /// strictly ascending radii.
    ///
    /// The chord fit is anchored by synthetic near-hub control points at
    /// 90% of the hub depth so evaluation near the center cannot blow up
    /// the way an unanchored extrapolation would.
    pub fn fit(
        radii: &[f64],
        twists: &[f64],
        chords: &[f64],
        hub_radius: f64,
        hub_depth: f64,
    ) -> GeomResult<Self> {
        if radii.len() != twists.len() || radii.len() != chords.len() {
            return Err(GeomError::InvalidArg {
                what: "station arrays must have equal length",
            });
        }
        if radii.len() < 2 {
            return Err(GeomError::InvalidArg {
                what: "at least two stations are required",
            });
        }
        if !radii.windows(2).all(|w| w[1] > w[0]) {
            return Err(GeomError::NonMonotone {
                what: "station radii",
            });
        }
        if radii[0] < 0.9 * hub_radius {
            return Err(GeomError::InvalidArg {
                what: "stations must start outboard of the chord anchor points",
            });
        }

        let degree = MAX_TWIST_DEGREE.min(radii.len() - 1);
        let twist = polyfit(radii, twists, degree)?;

        let anchor = 0.9 * hub_depth;
        let mut xs = vec![0.0, hub_radius / 2.0, 0.9 * hub_radius];
        xs.extend_from_slice(radii);
        let mut ys = vec![anchor, anchor, anchor];
        ys.extend_from_slice(chords);
        let chord = Pchip::new(xs, moving_average(&ys, CHORD_SMOOTH_WINDOW))?;

        Ok(Self { twist, chord })
    }

    pub fn twist_at(&self, r: f64) -> f64 {
        self.twist.eval(r)
    }

    pub fn chord_at(&self, r: f64) -> f64 {
        self.chord.eval(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_stations() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let radii: Vec<f64> = (0..14).map(|i| 0.02 + i as f64 * 0.01).collect();
        // Twist falls off roughly like atan(1/r), chord decays smoothly.
        let twists: Vec<f64> = radii.iter().map(|&r| (0.02 / r).atan() + 0.1).collect();
        let chords: Vec<f64> = radii.iter().map(|&r| 0.012 * 0.05 / (0.03 + r)).collect();
        (radii, twists, chords)
    }

    #[test]
    fn fit_tracks_station_values() {
        let (radii, twists, chords) = sample_stations();
        let p = SpanwiseProfile::fit(&radii, &twists, &chords, 0.02, 0.01).unwrap();
        for i in 0..radii.len() {
            assert_relative_eq!(p.twist_at(radii[i]), twists[i], epsilon = 0.05);
            assert_relative_eq!(p.chord_at(radii[i]), chords[i], epsilon = 0.002);
        }
    }

    #[test]
    fn refit_is_idempotent() {
        let (radii, twists, chords) = sample_stations();
        let first = SpanwiseProfile::fit(&radii, &twists, &chords, 0.02, 0.01).unwrap();

        let twists2: Vec<f64> = radii.iter().map(|&r| first.twist_at(r)).collect();
        let chords2: Vec<f64> = radii.iter().map(|&r| first.chord_at(r)).collect();
        let second = SpanwiseProfile::fit(&radii, &twists2, &chords2, 0.02, 0.01).unwrap();

        for &r in &radii {
            assert_relative_eq!(first.twist_at(r), second.twist_at(r), epsilon = 1e-6);
            assert_relative_eq!(first.chord_at(r), second.chord_at(r), epsilon = 1.5e-3);
        }
    }

    #[test]
    fn chord_stays_bounded_near_center() {
        let (radii, twists, chords) = sample_stations();
        let p = SpanwiseProfile::fit(&radii, &twists, &chords, 0.02, 0.01).unwrap();
        for i in 0..20 {
            let r = i as f64 * 0.001;
            let c = p.chord_at(r);
            assert!(c > 0.0 && c < 0.02, "chord {} unbounded at r={}", c, r);
        }
    }

    #[test]
    fn rejects_unsorted_radii() {
        let err = SpanwiseProfile::fit(
            &[0.05, 0.03, 0.08],
            &[0.3, 0.2, 0.1],
            &[0.01, 0.01, 0.01],
            0.02,
            0.01,
        )
        .unwrap_err();
        assert!(matches!(err, GeomError::NonMonotone { .. }));
    }
}
