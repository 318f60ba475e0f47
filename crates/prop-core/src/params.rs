//! Immutable propeller design parameters.

use crate::error::{CoreError, CoreResult};
use crate::units::{Length, Velocity};

/// Designer-chosen envelope and operating parameters for one propeller.
///
/// Owned by the caller and read-only to every downstream component. Derived
/// caches (geometry interpolators, spanwise fits) are keyed to one parameter
/// set by construction; changing parameters means building new values.
#[derive(Clone, Debug)]
pub struct PropellerParameters {
    /// Identifier used for exported file names.
    pub name: String,
    /// Blade tip radius.
    pub radius: Length,
    /// Hub radius; stations start just outboard of this.
    pub hub_radius: Length,
    /// Hub depth along the prop axis; anchors the depth and thickness envelopes.
    pub hub_depth: Length,
    /// Chord limit at the tip, anchor of the inverse-square chord decay.
    pub tip_chord: Length,
    /// Printable trailing-edge pad thickness.
    pub trailing_edge: Length,
    /// Center bore diameter, export only.
    pub center_hole: Length,
    /// Scimitar sweep at 80% span, percent of radius. Export only.
    pub scimitar_percent: f64,
    /// Incoming axial airspeed at the disk.
    pub forward_airspeed: Velocity,
    /// Number of blades.
    pub blade_count: u32,
}

impl PropellerParameters {
    /// Reject invalid configurations before any station processing begins.
    pub fn validate(&self) -> CoreResult<()> {
        let radius = self.radius.value;
        let hub_radius = self.hub_radius.value;
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(CoreError::InvalidArg {
                what: "radius must be positive",
            });
        }
        if hub_radius <= 0.0 || hub_radius >= radius {
            return Err(CoreError::InvalidArg {
                what: "hub radius must be positive and smaller than the tip radius",
            });
        }
        if self.hub_depth.value <= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "hub depth must be positive",
            });
        }
        if self.tip_chord.value <= 0.0 {
            return Err(CoreError::InvalidArg {
                what: "tip chord must be positive",
            });
        }
        if self.trailing_edge.value < 0.0 {
            return Err(CoreError::InvalidArg {
                what: "trailing edge thickness cannot be negative",
            });
        }
        if self.center_hole.value < 0.0 {
            return Err(CoreError::InvalidArg {
                what: "center hole diameter cannot be negative",
            });
        }
        if self.forward_airspeed.value < 0.0 {
            return Err(CoreError::InvalidArg {
                what: "forward airspeed cannot be negative",
            });
        }
        if self.blade_count == 0 {
            return Err(CoreError::InvalidArg {
                what: "blade count must be at least one",
            });
        }
        Ok(())
    }
}
