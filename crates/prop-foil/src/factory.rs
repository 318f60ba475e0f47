//! Foil family selection, fixed once per blade design.

use std::str::FromStr;

use crate::adapter::FoilAdapter;
use crate::arad::AradFoil;
use crate::error::{FoilError, FoilResult};
use crate::naca4::Naca4Foil;
use crate::symmetric::SymmetricFoil;

/// Closed set of supported section families.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FoilFamily {
    Symmetric,
    Naca4 { camber: f64, camber_pos: f64 },
    Arad,
}

impl FoilFamily {
    /// Build a station section: `chord` and `trailing_edge` in meters,
    /// `thickness_ratio` relative to chord.
    pub fn build(
        &self,
        chord: f64,
        thickness_ratio: f64,
        trailing_edge: f64,
    ) -> FoilResult<Box<dyn FoilAdapter>> {
        Ok(match *self {
            FoilFamily::Symmetric => {
                Box::new(SymmetricFoil::new(chord, thickness_ratio, trailing_edge)?)
            }
            FoilFamily::Naca4 { camber, camber_pos } => Box::new(Naca4Foil::new(
                chord,
                thickness_ratio,
                trailing_edge,
                camber,
                camber_pos,
            )?),
            FoilFamily::Arad => Box::new(AradFoil::new(chord, thickness_ratio, trailing_edge)?),
        })
    }
}

impl FromStr for FoilFamily {
    type Err = FoilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "symmetric" => Ok(FoilFamily::Symmetric),
            "naca4" => Ok(FoilFamily::Naca4 {
                camber: 0.04,
                camber_pos: 0.4,
            }),
            "arad" => Ok(FoilFamily::Arad),
            other => Err(FoilError::UnknownFamily {
                name: other.to_string(),
            }),
        }
    }
}
