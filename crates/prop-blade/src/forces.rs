//! Blade element force integration at an arbitrary operating point.

use prop_core::units::constants::RHO_AIR_KG_M3;
use prop_core::units::{newton, newton_meter, AngularVelocity, Force, Torque};
use prop_solve::BemConfig;

use crate::assembler::Blade;
use crate::error::{BladeError, BladeResult};

/// Integrated loads over all stations and blades.
#[derive(Clone, Debug)]
pub struct BladeForces {
    pub thrust: Force,
    pub torque: Torque,
    /// Radii whose induction did not converge; their annuli contribute
    /// nothing to the totals.
    pub skipped: Vec<f64>,
}

/// Re-solve every station's induction at `rpm` and sum the element loads.
///
/// Each station seeds from its stored state, so evaluating near the design
/// point converges in a handful of iterations. Stations that fail to
/// converge are skipped and reported rather than polluting the totals.
pub fn integrate_forces(
    blade: &mut Blade,
    rpm: AngularVelocity,
    config: &BemConfig,
) -> BladeResult<BladeForces> {
    let omega = rpm.value;
    if !(omega > 0.0 && omega.is_finite()) {
        return Err(BladeError::InvalidConfiguration {
            what: "rotational speed must be positive",
        });
    }
    let u_0 = blade.params().forward_airspeed.value;
    let blade_count = blade.params().blade_count;

    let mut thrust = 0.0;
    let mut torque = 0.0;
    let mut skipped = Vec::new();

    for station in blade.stations_mut() {
        let kin = station.kinematics(u_0, omega, blade_count, RHO_AIR_KG_M3);
        match station.resolve(&kin, config) {
            Ok(sol) if sol.converged => {
                let (dt, dq) = station.loads(&kin)?;
                thrust += dt;
                torque += dq;
            }
            Ok(sol) => {
                tracing::warn!(
                    r = station.r(),
                    residual = sol.residual,
                    "station skipped in force integration"
                );
                skipped.push(station.r());
            }
            Err(error) => {
                tracing::warn!(r = station.r(), %error, "station solve failed");
                skipped.push(station.r());
            }
        }
    }

    tracing::debug!(thrust, torque, skipped = skipped.len(), "forces integrated");
    Ok(BladeForces {
        thrust: newton(thrust),
        torque: newton_meter(torque),
        skipped,
    })
}
