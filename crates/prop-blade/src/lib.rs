//! prop-blade: blade assembly and force integration.
//!
//! The assembler walks the discretized radii tip to hub, optimizes each
//! station against its loss-corrected induced-velocity goal, smooths the
//! spanwise twist and chord curves, and publishes an immutable hub-to-tip
//! station sequence with aggregate forces.

pub mod assembler;
pub mod error;
pub mod forces;
pub mod station;

pub use assembler::{Blade, BladeAssembler, DesignTargets, StationTrace};
pub use error::{BladeError, BladeResult};
pub use forces::{integrate_forces, BladeForces};
pub use station::{InductionState, RadialStation};
