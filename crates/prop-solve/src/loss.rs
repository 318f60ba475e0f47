//! Prandtl-style tip and hub loss correction.

use crate::error::{SolveError, SolveResult};

/// Inflow angles with |sin(phi)| below this are treated as degenerate.
const SIN_PHI_FLOOR: f64 = 1e-9;

/// Empirical margin scaling the effective tip radius.
const TIP_MARGIN: f64 = 0.96;

/// Empirical margin scaling the effective hub radius.
const HUB_MARGIN: f64 = 0.95;

/// Finite-blade-count loading correction, applied to the induced-velocity
/// goal before the station optimization.
#[derive(Clone, Copy, Debug)]
pub struct TipHubLoss {
    blade_count: u32,
    tip_radius: f64,
    hub_radius: f64,
}

impl TipHubLoss {
    pub fn new(blade_count: u32, tip_radius: f64, hub_radius: f64) -> SolveResult<Self> {
        if blade_count == 0 {
            return Err(SolveError::InvalidArg {
                what: "blade count must be at least one",
            });
        }
        if !(hub_radius > 0.0 && hub_radius < tip_radius) {
            return Err(SolveError::InvalidArg {
                what: "hub radius must be positive and inside the tip radius",
            });
        }
        Ok(Self {
            blade_count,
            tip_radius,
            hub_radius,
        })
    }

    /// Combined loss factor in `(0, 1]` at radius `r` and inflow angle `phi`.
    ///
    /// `phi = 0` (pure axial stall) is degenerate and rejected; callers guard
    /// before querying.
    pub fn factor(&self, r: f64, phi: f64) -> SolveResult<f64> {
        let sin_phi = phi.sin();
        if sin_phi.abs() < SIN_PHI_FLOOR {
            return Err(SolveError::DegenerateKinematics {
                what: "tip loss undefined at zero inflow angle",
            });
        }
        if !(r > 0.0 && r <= self.tip_radius * (1.0 + 1e-9)) {
            return Err(SolveError::InvalidArg {
                what: "radius outside the blade for loss correction",
            });
        }

        let b = self.blade_count as f64;
        let f_tip = (b * (self.tip_radius - r * TIP_MARGIN)) / (2.0 * r * sin_phi);
        let f_hub = (b * (r - self.hub_radius * HUB_MARGIN)) / (2.0 * r * sin_phi);

        Ok(prandtl(f_tip) * prandtl(f_hub))
    }
}

/// `2/pi * acos(exp(-f))`, clamped so the exponent never pushes acos out of
/// its domain.
fn prandtl(f: f64) -> f64 {
    let f = f.max(0.0);
    2.0 / std::f64::consts::PI * (-f).exp().acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_is_in_unit_interval() {
        let loss = TipHubLoss::new(2, 0.15, 0.02).unwrap();
        for i in 1..15 {
            let r = 0.02 + i as f64 * 0.009;
            let f = loss.factor(r, 0.15).unwrap();
            assert!(f > 0.0 && f <= 1.0, "factor {} at r={}", f, r);
        }
    }

    #[test]
    fn loading_drops_toward_tip_and_hub() {
        let loss = TipHubLoss::new(2, 0.15, 0.02).unwrap();
        let mid = loss.factor(0.08, 0.15).unwrap();
        let near_tip = loss.factor(0.148, 0.15).unwrap();
        let near_hub = loss.factor(0.021, 0.15).unwrap();
        assert!(near_tip < mid);
        assert!(near_hub < mid);
    }

    #[test]
    fn more_blades_lose_less() {
        let two = TipHubLoss::new(2, 0.15, 0.02).unwrap();
        let four = TipHubLoss::new(4, 0.15, 0.02).unwrap();
        let r = 0.13;
        assert!(four.factor(r, 0.15).unwrap() > two.factor(r, 0.15).unwrap());
    }

    #[test]
    fn zero_inflow_angle_is_degenerate() {
        let loss = TipHubLoss::new(2, 0.15, 0.02).unwrap();
        let err = loss.factor(0.08, 0.0).unwrap_err();
        assert!(matches!(err, SolveError::DegenerateKinematics { .. }));
    }

    #[test]
    fn invalid_geometry_rejected() {
        assert!(TipHubLoss::new(0, 0.15, 0.02).is_err());
        assert!(TipHubLoss::new(2, 0.02, 0.15).is_err());
    }
}
