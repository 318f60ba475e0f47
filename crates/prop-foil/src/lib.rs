//! prop-foil: 2-D airfoil cross-sections for blade stations.
//!
//! The rest of the workspace only sees the [`FoilAdapter`] capability trait;
//! the concrete families (symmetric, NACA 4-digit, tabulated ARA-D) are
//! selected once at blade-construction time via [`FoilFamily`].

pub mod adapter;
pub mod arad;
pub mod error;
pub mod factory;
pub mod naca4;
pub mod symmetric;

pub use adapter::{AeroCoefficients, FoilAdapter, FoilBounds};
pub use arad::AradFoil;
pub use error::{FoilError, FoilResult};
pub use factory::FoilFamily;
pub use naca4::Naca4Foil;
pub use symmetric::SymmetricFoil;
