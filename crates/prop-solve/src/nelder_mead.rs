//! Nelder-Mead simplex minimizer.
//!
//! Derivative-free black-box primitive used as the outer search of the
//! station optimization. Small dimension (two to four variables), so the
//! simple simplex recipe is plenty.

use crate::error::{SolveError, SolveResult};

/// Nelder-Mead configuration.
#[derive(Clone, Copy, Debug)]
pub struct NelderMeadConfig {
    /// Maximum objective evaluations
    pub max_evals: usize,
    /// Simplex spread below which the position has converged
    pub x_tol: f64,
    /// Objective spread below which the value has converged
    pub f_tol: f64,
    /// Reflection coefficient
    pub reflection: f64,
    /// Expansion coefficient
    pub expansion: f64,
    /// Contraction coefficient
    pub contraction: f64,
    /// Shrink coefficient
    pub shrink: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_evals: 400,
            x_tol: 1e-6,
            f_tol: 1e-9,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

/// Minimization result.
#[derive(Clone, Debug)]
pub struct MinimizeResult {
    /// Best point found
    pub x: Vec<f64>,
    /// Objective at the best point
    pub fx: f64,
    /// Objective evaluations used
    pub evals: usize,
    /// Converged before the evaluation budget ran out
    pub converged: bool,
}

/// Minimize `f` starting from `x0`, with the initial simplex spanned by
/// per-coordinate `scales`.
pub fn minimize<F>(
    mut f: F,
    x0: &[f64],
    scales: &[f64],
    config: &NelderMeadConfig,
) -> SolveResult<MinimizeResult>
where
    F: FnMut(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 || scales.len() != n {
        return Err(SolveError::InvalidArg {
            what: "minimize needs a non-empty start point with matching scales",
        });
    }
    if scales.iter().any(|s| *s == 0.0 || !s.is_finite()) {
        return Err(SolveError::InvalidArg {
            what: "simplex scales must be finite and non-zero",
        });
    }

    let mut evals = 0usize;
    let mut eval = |x: &[f64], evals: &mut usize| -> SolveResult<f64> {
        let fx = f(x);
        *evals += 1;
        if fx.is_nan() {
            return Err(SolveError::NonFinite {
                what: "objective",
                value: fx,
            });
        }
        Ok(fx)
    };

    // Initial simplex: x0 plus one offset vertex per coordinate.
    let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(n + 1);
    let f0 = eval(x0, &mut evals)?;
    simplex.push((x0.to_vec(), f0));
    for i in 0..n {
        let mut xi = x0.to_vec();
        xi[i] += scales[i];
        let fi = eval(&xi, &mut evals)?;
        simplex.push((xi, fi));
    }

    while evals < config.max_evals {
        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let best = &simplex[0];
        let worst = &simplex[n];

        // Convergence: simplex collapsed in value and position.
        let f_spread = worst.1 - best.1;
        let x_spread = (0..n)
            .map(|i| (worst.0[i] - best.0[i]).abs())
            .fold(0.0f64, f64::max);
        if f_spread < config.f_tol || x_spread < config.x_tol {
            return Ok(MinimizeResult {
                x: best.0.clone(),
                fx: best.1,
                evals,
                converged: true,
            });
        }

        // Centroid of all but the worst vertex.
        let mut centroid = vec![0.0; n];
        for (x, _) in simplex.iter().take(n) {
            for i in 0..n {
                centroid[i] += x[i] / n as f64;
            }
        }

        let lerp = |a: &[f64], b: &[f64], t: f64| -> Vec<f64> {
            (0..n).map(|i| a[i] + t * (b[i] - a[i])).collect()
        };

        // Reflect the worst vertex through the centroid.
        let reflected = lerp(&centroid, &simplex[n].0, -config.reflection);
        let f_reflected = eval(&reflected, &mut evals)?;

        if f_reflected < simplex[0].1 {
            // Try expanding further along the same direction.
            let expanded = lerp(&centroid, &simplex[n].0, -config.expansion);
            let f_expanded = eval(&expanded, &mut evals)?;
            simplex[n] = if f_expanded < f_reflected {
                (expanded, f_expanded)
            } else {
                (reflected, f_reflected)
            };
        } else if f_reflected < simplex[n - 1].1 {
            simplex[n] = (reflected, f_reflected);
        } else {
            // Contract toward the centroid.
            let contracted = lerp(&centroid, &simplex[n].0, config.contraction);
            let f_contracted = eval(&contracted, &mut evals)?;
            if f_contracted < simplex[n].1 {
                simplex[n] = (contracted, f_contracted);
            } else {
                // Shrink everything toward the best vertex.
                let best_x = simplex[0].0.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    vertex.0 = lerp(&best_x, &vertex.0, config.shrink);
                    vertex.1 = eval(&vertex.0, &mut evals)?;
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
    Ok(MinimizeResult {
        x: simplex[0].0.clone(),
        fx: simplex[0].1,
        evals,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn minimizes_shifted_quadratic() {
        let f = |x: &[f64]| (x[0] - 1.5).powi(2) + (x[1] + 0.5).powi(2);
        let result = minimize(f, &[0.0, 0.0], &[0.5, 0.5], &NelderMeadConfig::default()).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.x[0], 1.5, epsilon = 1e-3);
        assert_relative_eq!(result.x[1], -0.5, epsilon = 1e-3);
    }

    #[test]
    fn minimizes_rosenbrock_valley() {
        let f = |x: &[f64]| {
            let a = 1.0 - x[0];
            let b = x[1] - x[0] * x[0];
            a * a + 100.0 * b * b
        };
        let config = NelderMeadConfig {
            max_evals: 2000,
            ..Default::default()
        };
        let result = minimize(f, &[-1.0, 1.0], &[0.5, 0.5], &config).unwrap();
        assert!(result.fx < 1e-4, "fx = {}", result.fx);
    }

    #[test]
    fn respects_evaluation_budget() {
        let f = |x: &[f64]| x[0].sin() * x[1].cos();
        let config = NelderMeadConfig {
            max_evals: 25,
            x_tol: 0.0,
            f_tol: 0.0,
            ..Default::default()
        };
        let result = minimize(f, &[0.3, 0.3], &[0.1, 0.1], &config).unwrap();
        // One simplex update can add a few evaluations past the budget check.
        assert!(result.evals <= 25 + 4);
        assert!(!result.converged);
    }

    #[test]
    fn rejects_zero_scales() {
        let f = |x: &[f64]| x[0] * x[0];
        assert!(minimize(f, &[1.0], &[0.0], &NelderMeadConfig::default()).is_err());
    }
}
