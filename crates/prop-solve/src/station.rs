//! Constrained per-station optimization: an outer Nelder-Mead search over
//! twist and chord wrapping the inner induction fixed point.

use crate::bem::{solve_induction, BemConfig, InductionSeed, StationKinematics};
use crate::error::{SolveError, SolveResult};
use crate::nelder_mead::{minimize, NelderMeadConfig};
use prop_foil::AeroCoefficients;

/// Twist search window (rad); sections past this are unbuildable anyway.
const TWIST_MIN: f64 = -0.2;
const TWIST_MAX: f64 = 1.35;

/// Loss-corrected induced-velocity target for one station.
#[derive(Clone, Copy, Debug)]
pub struct StationGoal {
    pub dv_goal: f64,
}

/// Chord envelope at the station, from the geometry constraints and the
/// foil's own depth fit.
#[derive(Clone, Copy, Debug)]
pub struct StationBounds {
    pub min_chord: f64,
    pub max_chord: f64,
}

impl StationBounds {
    fn validate(&self) -> SolveResult<()> {
        if !(self.min_chord > 0.0 && self.min_chord < self.max_chord) {
            return Err(SolveError::InvalidArg {
                what: "chord bounds must satisfy 0 < min < max",
            });
        }
        Ok(())
    }
}

/// Station optimizer configuration.
#[derive(Clone, Copy, Debug)]
pub struct StationConfig {
    pub bem: BemConfig,
    pub search: NelderMeadConfig,
    /// Objective above which the result counts as non-converged
    pub tolerance: f64,
    /// Objective above which the induction state is reset to safe defaults
    pub hard_error: f64,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            bem: BemConfig::default(),
            search: NelderMeadConfig::default(),
            tolerance: 0.05,
            hard_error: 0.5,
        }
    }
}

/// Best station geometry and induction state found by the search.
#[derive(Clone, Copy, Debug)]
pub struct StationSolution {
    pub twist: f64,
    pub chord: f64,
    pub dv: f64,
    pub a_prime: f64,
    /// Relative deviation from the induced-velocity goal
    pub objective: f64,
    pub converged: bool,
}

/// Search `(twist, chord)` for the geometry whose self-consistent induction
/// best matches the loss-corrected goal, respecting the chord envelope.
///
/// Non-convergence is not an error: the returned solution carries
/// `converged = false` and, above the hard error threshold, induction reset
/// to `dv = dv_goal, a_prime = 0` so a stale state is never trusted.
pub fn optimize_station(
    kin: &StationKinematics,
    goal: StationGoal,
    seed_twist: f64,
    bounds: StationBounds,
    aero: &dyn Fn(f64) -> AeroCoefficients,
    config: &StationConfig,
) -> SolveResult<StationSolution> {
    kin.validate()?;
    bounds.validate()?;
    if !(goal.dv_goal > 0.0 && goal.dv_goal.is_finite()) {
        return Err(SolveError::InvalidArg {
            what: "induced-velocity goal must be positive",
        });
    }

    let seed = InductionSeed {
        dv: goal.dv_goal,
        a_prime: 0.001,
    };
    let dv_scale = goal.dv_goal.max(1e-3);

    let evaluate = |twist: f64, chord: f64| -> f64 {
        match solve_induction(kin, twist, chord, aero, seed, &config.bem) {
            Ok(sol) => {
                let mut objective = (sol.dv - goal.dv_goal).abs() / dv_scale;
                if !sol.converged {
                    objective += sol.residual;
                }
                objective
            }
            // Out-of-domain trial points are steered away from, not fatal.
            Err(_) => 10.0,
        }
    };

    let clamp_x = |x: &[f64]| -> (f64, f64, f64) {
        let twist = x[0].clamp(TWIST_MIN, TWIST_MAX);
        let chord = x[1].clamp(bounds.min_chord, bounds.max_chord);
        // Penalize envelope violations so the simplex returns to bounds.
        let overshoot = (x[0] - twist).abs() / 0.5 + (x[1] - chord).abs() / bounds.max_chord;
        (twist, chord, overshoot)
    };

    let objective_fn = |x: &[f64]| {
        let (twist, chord, overshoot) = clamp_x(x);
        evaluate(twist, chord) + overshoot
    };

    // Seed at the inflow angle plus a few degrees when the continuity seed
    // sits below it, otherwise continue from the neighbor's twist.
    let u = kin.u_0 + goal.dv_goal / 2.0;
    let phi = u.atan2(kin.omega * kin.r);
    let twist0 = seed_twist.max(phi + 0.07).clamp(TWIST_MIN, TWIST_MAX);
    let chord0 = (0.8 * bounds.max_chord).max(bounds.min_chord);
    let scales = [0.08, -0.2 * (bounds.max_chord - bounds.min_chord)];

    let result = minimize(objective_fn, &[twist0, chord0], &scales, &config.search)?;

    let (twist, chord, _) = clamp_x(&result.x);
    let best = solve_induction(kin, twist, chord, aero, seed, &config.bem)?;
    let objective = (best.dv - goal.dv_goal).abs() / dv_scale;

    let converged = objective < config.tolerance && best.converged;
    if converged {
        return Ok(StationSolution {
            twist,
            chord,
            dv: best.dv,
            a_prime: best.a_prime,
            objective,
            converged: true,
        });
    }

    tracing::debug!(
        r = kin.r,
        objective,
        twist,
        chord,
        "station search missed the induced-velocity goal"
    );

    // Single fallback policy: past the hard threshold the state resets to
    // safe defaults; in between, values are kept but flagged.
    let (dv, a_prime) = if objective > config.hard_error {
        (goal.dv_goal, 0.0)
    } else {
        (best.dv, best.a_prime)
    };

    Ok(StationSolution {
        twist,
        chord,
        dv,
        a_prime,
        objective,
        converged: false,
    })
}
