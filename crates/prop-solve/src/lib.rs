//! prop-solve: the numerical core of the blade design.
//!
//! - `bem`: coupled induction fixed point for one station
//! - `loss`: Prandtl-style tip/hub loss correction
//! - `nelder_mead`: derivative-free minimizer primitive
//! - `station`: constrained outer search wrapping the inner induction solve

pub mod bem;
pub mod error;
pub mod loss;
pub mod nelder_mead;
pub mod station;

pub use bem::{
    dv_from_thrust, element_loads, solve_induction, BemConfig, BemSolution, InductionSeed,
    StationKinematics,
};
pub use error::{SolveError, SolveResult};
pub use loss::TipHubLoss;
pub use nelder_mead::{minimize, MinimizeResult, NelderMeadConfig};
pub use station::{optimize_station, StationBounds, StationConfig, StationGoal, StationSolution};
