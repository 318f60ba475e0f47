//! prop-geom: geometric envelopes and spanwise curve fitting.
//!
//! - `interp`: the interpolation kit (piecewise linear, monotone cubic,
//!   least-squares polynomial, moving average)
//! - `constraints`: per-radius depth/chord/thickness/scimitar envelopes
//! - `spanwise`: smooth twist and chord curves through station results

pub mod constraints;
pub mod error;
pub mod interp;
pub mod spanwise;

pub use constraints::GeometryConstraints;
pub use error::{GeomError, GeomResult};
pub use interp::{moving_average, polyfit, Pchip, PiecewiseLinear, Polynomial};
pub use spanwise::SpanwiseProfile;
