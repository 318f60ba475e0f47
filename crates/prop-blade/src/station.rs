//! One radial station: section geometry plus its induction state.

use prop_foil::FoilAdapter;
use prop_solve::{
    element_loads, solve_induction, BemConfig, BemSolution, InductionSeed, SolveResult,
    StationKinematics,
};

/// Objective/residual above which a stale state is discarded on re-solve.
const RESET_RESIDUAL: f64 = 0.5;

/// Induction state carried between solves.
#[derive(Clone, Copy, Debug)]
pub struct InductionState {
    /// Axial induced velocity increment at the disk (m/s)
    pub dv: f64,
    /// Tangential induction factor
    pub a_prime: f64,
    /// Residual (or search objective) of the last solve
    pub residual: f64,
    pub converged: bool,
}

impl InductionState {
    /// Safe default seeded at the design goal; never trusted for loads.
    pub fn reset(dv_target: f64) -> Self {
        Self {
            dv: dv_target,
            a_prime: 0.0,
            residual: f64::INFINITY,
            converged: false,
        }
    }
}

/// One annulus of the blade: radius, span width, a sized cross-section and
/// the induction state of the last solve at that geometry.
///
/// Twist and chord live on the foil itself; the station only adds the
/// spanwise placement and the aerodynamic state.
pub struct RadialStation {
    r: f64,
    dr: f64,
    dv_target: f64,
    foil: Box<dyn FoilAdapter>,
    pub induction: InductionState,
}

impl RadialStation {
    pub fn new(r: f64, dr: f64, dv_target: f64, foil: Box<dyn FoilAdapter>) -> Self {
        Self {
            r,
            dr,
            dv_target,
            foil,
            induction: InductionState::reset(dv_target),
        }
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn dr(&self) -> f64 {
        self.dr
    }

    /// Loss-corrected induced-velocity goal this station was sized for.
    pub fn dv_target(&self) -> f64 {
        self.dv_target
    }

    pub fn twist(&self) -> f64 {
        self.foil.twist()
    }

    pub fn chord(&self) -> f64 {
        self.foil.chord()
    }

    pub fn set_twist(&mut self, twist: f64) {
        self.foil.set_twist(twist);
    }

    pub fn set_chord(&mut self, chord: f64) {
        self.foil.set_chord(chord);
    }

    pub fn foil(&self) -> &dyn FoilAdapter {
        self.foil.as_ref()
    }

    /// Kinematic inputs for this station at the given operating point.
    pub fn kinematics(
        &self,
        u_0: f64,
        omega: f64,
        blade_count: u32,
        rho: f64,
    ) -> StationKinematics {
        StationKinematics {
            r: self.r,
            dr: self.dr,
            u_0,
            omega,
            blade_count,
            rho,
        }
    }

    /// Re-run the induction fixed point at the current geometry, seeding from
    /// the stored state. A badly stale state is reset before seeding so the
    /// fixed point never starts from garbage.
    pub fn resolve(
        &mut self,
        kin: &StationKinematics,
        config: &BemConfig,
    ) -> SolveResult<BemSolution> {
        if !self.induction.residual.is_finite() || self.induction.residual > RESET_RESIDUAL {
            self.induction = InductionState::reset(self.dv_target);
        }
        let seed = InductionSeed {
            dv: self.induction.dv,
            a_prime: self.induction.a_prime,
        };
        let sol = solve_induction(
            kin,
            self.foil.twist(),
            self.foil.chord(),
            &|alpha| self.foil.query_aero(alpha),
            seed,
            config,
        )?;
        self.induction = InductionState {
            dv: sol.dv,
            a_prime: sol.a_prime,
            residual: sol.residual,
            converged: sol.converged,
        };
        Ok(sol)
    }

    /// Differential thrust and torque `(dT, dQ)` of this annulus at the
    /// stored induction state.
    pub fn loads(&self, kin: &StationKinematics) -> SolveResult<(f64, f64)> {
        element_loads(
            kin,
            self.foil.twist(),
            self.foil.chord(),
            self.induction.dv,
            self.induction.a_prime,
            &|alpha| self.foil.query_aero(alpha),
        )
    }
}
