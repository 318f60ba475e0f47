//! prop-export: printable artifacts from a designed blade.
//!
//! - `stl`: watertight ASCII STL of one blade, millimeter scale
//! - `scad`: OpenSCAD assembly joining the blade mesh to a hub

pub mod error;
pub mod scad;
pub mod stl;

pub use error::{ExportError, ExportResult};
pub use scad::write_prop_scad;
pub use stl::{write_blade_stl, HubBand};
