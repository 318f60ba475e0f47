//! YAML design file: plain-number envelope parameters plus design defaults.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use prop_core::units::{m, mm, mps};
use prop_core::PropellerParameters;
use prop_foil::FoilFamily;

use crate::AppError;

fn default_trailing_edge_mm() -> f64 {
    0.5
}

fn default_center_hole_mm() -> f64 {
    5.0
}

fn default_resolution_mm() -> f64 {
    10.0
}

fn default_foil() -> String {
    "symmetric".to_string()
}

/// On-disk design description. Lengths in millimeters, speeds in m/s.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DesignFile {
    pub name: String,
    pub radius_mm: f64,
    pub hub_radius_mm: f64,
    pub hub_depth_mm: f64,
    pub tip_chord_mm: f64,
    #[serde(default = "default_trailing_edge_mm")]
    pub trailing_edge_mm: f64,
    #[serde(default = "default_center_hole_mm")]
    pub center_hole_mm: f64,
    #[serde(default)]
    pub scimitar_percent: f64,
    #[serde(default)]
    pub forward_airspeed_m_s: f64,
    pub blade_count: u32,
    #[serde(default = "default_foil")]
    pub foil: String,
    #[serde(default = "default_resolution_mm")]
    pub resolution_mm: f64,
}

impl DesignFile {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn parameters(&self) -> PropellerParameters {
        PropellerParameters {
            name: self.name.clone(),
            radius: mm(self.radius_mm),
            hub_radius: mm(self.hub_radius_mm),
            hub_depth: mm(self.hub_depth_mm),
            tip_chord: mm(self.tip_chord_mm),
            trailing_edge: mm(self.trailing_edge_mm),
            center_hole: mm(self.center_hole_mm),
            scimitar_percent: self.scimitar_percent,
            forward_airspeed: mps(self.forward_airspeed_m_s),
            blade_count: self.blade_count,
        }
    }

    pub fn family(&self) -> Result<FoilFamily, AppError> {
        Ok(FoilFamily::from_str(&self.foil)?)
    }

    pub fn resolution(&self) -> prop_core::units::Length {
        // Guard zero so the assembler reports the problem, not a NaN.
        if self.resolution_mm > 0.0 {
            mm(self.resolution_mm)
        } else {
            m(0.0)
        }
    }
}
