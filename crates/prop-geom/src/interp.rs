//! Interpolation kit: piecewise linear, monotone cubic (Fritsch-Carlson),
//! least-squares polynomial fit, and a moving-average smoother.

use crate::error::{GeomError, GeomResult};
use nalgebra::{DMatrix, DVector};

fn check_knots(xs: &[f64], ys: &[f64]) -> GeomResult<()> {
    if xs.len() != ys.len() {
        return Err(GeomError::InvalidArg {
            what: "knot and value arrays must have equal length",
        });
    }
    if xs.len() < 2 {
        return Err(GeomError::InvalidArg {
            what: "at least two knots are required",
        });
    }
    if !xs.windows(2).all(|w| w[1] > w[0]) {
        return Err(GeomError::NonMonotone {
            what: "interpolation knots",
        });
    }
    if !xs.iter().chain(ys.iter()).all(|v| v.is_finite()) {
        return Err(GeomError::InvalidArg {
            what: "knots and values must be finite",
        });
    }
    Ok(())
}

/// Index of the segment containing `x`, clamped to the knot range.
fn segment_index(xs: &[f64], x: f64) -> usize {
    let i = xs.partition_point(|&k| k <= x);
    i.clamp(1, xs.len() - 1) - 1
}

/// Piecewise-linear interpolation through strictly increasing knots.
///
/// Evaluation outside the knot range clamps to the boundary value; callers
/// wanting hard range errors check bounds first.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl PiecewiseLinear {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> GeomResult<Self> {
        check_knots(&xs, &ys)?;
        Ok(Self { xs, ys })
    }

    pub fn eval(&self, x: f64) -> f64 {
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[self.xs.len() - 1] {
            return self.ys[self.ys.len() - 1];
        }
        let i = segment_index(&self.xs, x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + t * (self.ys[i + 1] - self.ys[i])
    }
}

/// Shape-preserving monotone cubic interpolation (Fritsch-Carlson slopes).
#[derive(Clone, Debug)]
pub struct Pchip {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> GeomResult<Self> {
        check_knots(&xs, &ys)?;
        let slopes = fritsch_carlson_slopes(&xs, &ys);
        Ok(Self { xs, ys, slopes })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return self.ys[0];
        }
        if x >= self.xs[n - 1] {
            return self.ys[n - 1];
        }
        let i = segment_index(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        let t = (x - self.xs[i]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.ys[i] + h10 * h * self.slopes[i] + h01 * self.ys[i + 1]
            + h11 * h * self.slopes[i + 1]
    }
}

fn fritsch_carlson_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<f64> = ys
        .windows(2)
        .zip(h.iter())
        .map(|(w, &hi)| (w[1] - w[0]) / hi)
        .collect();

    let mut d = vec![0.0; n];
    if n == 2 {
        d[0] = delta[0];
        d[1] = delta[0];
        return d;
    }

    for i in 1..n - 1 {
        if delta[i - 1] * delta[i] <= 0.0 {
            d[i] = 0.0;
        } else {
            let w1 = 2.0 * h[i] + h[i - 1];
            let w2 = h[i] + 2.0 * h[i - 1];
            d[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
        }
    }
    d[0] = endpoint_slope(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = endpoint_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

/// One-sided three-point endpoint slope, limited to preserve monotonicity.
fn endpoint_slope(h0: f64, h1: f64, delta0: f64, delta1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * delta0 - h0 * delta1) / (h0 + h1);
    if d * delta0 <= 0.0 {
        0.0
    } else if delta0 * delta1 < 0.0 && d.abs() > 3.0 * delta0.abs() {
        3.0 * delta0
    } else {
        d
    }
}

/// Polynomial in ascending coefficient order.
#[derive(Clone, Debug)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self { coeffs }
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Least-squares polynomial fit of the given degree, solved by SVD.
pub fn polyfit(xs: &[f64], ys: &[f64], degree: usize) -> GeomResult<Polynomial> {
    if xs.len() != ys.len() || xs.is_empty() {
        return Err(GeomError::InvalidArg {
            what: "fit needs equal-length, non-empty samples",
        });
    }
    if xs.len() <= degree {
        return Err(GeomError::InvalidArg {
            what: "fit needs more samples than the polynomial degree",
        });
    }

    let n = xs.len();
    let cols = degree + 1;
    let a = DMatrix::from_fn(n, cols, |i, j| xs[i].powi(j as i32));
    let b = DVector::from_column_slice(ys);

    let svd = a.svd(true, true);
    let coeffs = svd.solve(&b, 1e-12).map_err(|_| GeomError::FitFailed {
        what: "singular least-squares system",
    })?;

    Ok(Polynomial::new(coeffs.iter().copied().collect()))
}

/// Centered moving average with a truncated window at the edges.
pub fn moving_average(ys: &[f64], window: usize) -> Vec<f64> {
    let half = window.max(1) / 2;
    (0..ys.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(ys.len());
            ys[lo..hi].iter().sum::<f64>() / (hi - lo) as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn linear_interpolates_and_clamps() {
        let f = PiecewiseLinear::new(vec![0.0, 1.0, 2.0], vec![0.0, 10.0, 0.0]).unwrap();
        assert_relative_eq!(f.eval(0.5), 5.0);
        assert_relative_eq!(f.eval(1.5), 5.0);
        assert_relative_eq!(f.eval(-1.0), 0.0);
        assert_relative_eq!(f.eval(3.0), 0.0);
    }

    #[test]
    fn linear_rejects_non_monotone_knots() {
        let err = PiecewiseLinear::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).unwrap_err();
        assert!(matches!(err, GeomError::NonMonotone { .. }));
    }

    #[test]
    fn pchip_reproduces_knot_values() {
        let xs = vec![0.0, 0.3, 1.0, 2.0];
        let ys = vec![1.0, 2.0, 2.5, 4.0];
        let f = Pchip::new(xs.clone(), ys.clone()).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(f.eval(*x), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn pchip_preserves_monotone_data() {
        let xs = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = vec![0.0, 0.5, 0.6, 2.0, 2.1];
        let f = Pchip::new(xs, ys).unwrap();
        let mut prev = f.eval(0.0);
        for i in 1..=400 {
            let y = f.eval(i as f64 * 0.01);
            assert!(y >= prev - 1e-12, "overshoot at {}", i);
            prev = y;
        }
    }

    #[test]
    fn polyfit_recovers_exact_polynomial() {
        let xs: Vec<f64> = (0..10).map(|i| i as f64 * 0.1).collect();
        let ys: Vec<f64> = xs.iter().map(|&x| 1.0 - 2.0 * x + 3.0 * x * x).collect();
        let p = polyfit(&xs, &ys, 2).unwrap();
        for &x in &xs {
            assert_relative_eq!(p.eval(x), 1.0 - 2.0 * x + 3.0 * x * x, epsilon = 1e-8);
        }
    }

    #[test]
    fn polyfit_rejects_underdetermined_fit() {
        assert!(polyfit(&[0.0, 1.0], &[0.0, 1.0], 4).is_err());
    }

    #[test]
    fn moving_average_flattens_spikes() {
        let smoothed = moving_average(&[0.0, 0.0, 9.0, 0.0, 0.0], 3);
        assert_relative_eq!(smoothed[2], 3.0);
        assert_relative_eq!(smoothed[0], 0.0);
    }
}
