use crate::CoreError;

/// Scalar type for all aerodynamic and geometric quantities.
pub type Real = f64;

/// Absolute/relative tolerance pair for float comparisons.
///
/// The defaults suit quantities of order one, such as radii in metres or
/// induction factors. Solver convergence checks carry their own thresholds.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True when `a` and `b` agree within `tol`. The absolute test runs first so
/// values straddling zero do not fail the relative one.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Reject NaN and infinities early, naming the offending quantity.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}
