//! Blade assembly: tip-to-hub station sizing, spanwise smoothing, totals.

use std::f64::consts::PI;

use prop_core::ensure_finite;
use prop_core::units::constants::RHO_AIR_KG_M3;
use prop_core::units::{newton, newton_meter, AngularVelocity, Force, Length, Torque};
use prop_core::PropellerParameters;
use prop_foil::FoilFamily;
use prop_geom::{GeometryConstraints, SpanwiseProfile};
use prop_solve::{
    dv_from_thrust, optimize_station, StationBounds, StationConfig, StationGoal, TipHubLoss,
};

use crate::error::{BladeError, BladeResult};
use crate::forces::integrate_forces;
use crate::station::{InductionState, RadialStation};

/// Chord floor (m); anything thinner is unprintable and numerically useless.
const CHORD_FLOOR: f64 = 1e-4;

/// Twist window for the smoothed overwrite, slightly wider than the search
/// window so the polynomial fit is not clipped at interior stations.
const SMOOTH_TWIST_MIN: f64 = -0.3;
const SMOOTH_TWIST_MAX: f64 = 1.5;

/// Thickness-to-chord ratios the section families accept.
const THICKNESS_RATIO_MIN: f64 = 0.02;
const THICKNESS_RATIO_MAX: f64 = 0.6;

/// Operating point the blade is designed for.
#[derive(Clone, Copy, Debug)]
pub struct DesignTargets {
    pub thrust: Force,
    pub rpm: AngularVelocity,
}

/// Per-station diagnostic emitted as each station is sized.
#[derive(Clone, Copy, Debug)]
pub struct StationTrace {
    pub r: f64,
    pub twist: f64,
    pub chord: f64,
    /// Loss-corrected induced-velocity goal
    pub dv_goal: f64,
    pub dv: f64,
    pub a_prime: f64,
    /// Annulus thrust across all blades (N); zero when the station carries
    /// no usable induction state.
    pub thrust: f64,
    /// Annulus torque across all blades (N m)
    pub torque: f64,
    /// Thrust per unit torque, dT/dQ (1/m)
    pub efficiency: f64,
    pub objective: f64,
    pub converged: bool,
}

/// Sizes every radial station of one blade against a thrust and speed target.
///
/// Construction validates the parameters and builds the geometry envelopes;
/// an assembler value is immutable and reusable across operating points.
pub struct BladeAssembler {
    params: PropellerParameters,
    constraints: GeometryConstraints,
    family: FoilFamily,
    radial_steps: usize,
    station_config: StationConfig,
}

impl BladeAssembler {
    pub fn new(
        params: PropellerParameters,
        resolution: Length,
        family: FoilFamily,
    ) -> BladeResult<Self> {
        params.validate()?;
        let step = resolution.value;
        if !(step > 0.0 && step.is_finite()) {
            return Err(BladeError::InvalidConfiguration {
                what: "radial resolution must be positive",
            });
        }
        // Nudge before truncating so ratios like 0.15/0.01 do not round
        // down to one station short.
        let radial_steps = (params.radius.value / step + 1e-9) as usize;
        if radial_steps < 2 {
            return Err(BladeError::InvalidConfiguration {
                what: "resolution too coarse for at least two stations",
            });
        }
        let constraints = GeometryConstraints::new(&params)?;
        Ok(Self {
            params,
            constraints,
            family,
            radial_steps,
            station_config: StationConfig::default(),
        })
    }

    pub fn with_station_config(mut self, config: StationConfig) -> Self {
        self.station_config = config;
        self
    }

    pub fn params(&self) -> &PropellerParameters {
        &self.params
    }

    pub fn radial_steps(&self) -> usize {
        self.radial_steps
    }

    /// Design a blade for the target operating point.
    pub fn design(&self, targets: DesignTargets) -> BladeResult<Blade> {
        self.design_with(targets, None)
    }

    /// Design a blade, feeding each station's result to `observer` as it is
    /// produced. The walk runs tip to hub so each station seeds its inboard
    /// neighbor's twist; the finished blade stores stations hub to tip.
    pub fn design_with(
        &self,
        targets: DesignTargets,
        mut observer: Option<&mut dyn FnMut(&StationTrace)>,
    ) -> BladeResult<Blade> {
        let radius = self.params.radius.value;
        let hub_radius = self.params.hub_radius.value;
        let u_0 = self.params.forward_airspeed.value;
        let omega = targets.rpm.value;
        let thrust_target = targets.thrust.value;
        if !(omega > 0.0 && omega.is_finite()) {
            return Err(BladeError::InvalidConfiguration {
                what: "design rotational speed must be positive",
            });
        }
        if !(thrust_target > 0.0 && thrust_target.is_finite()) {
            return Err(BladeError::InvalidConfiguration {
                what: "design thrust must be positive",
            });
        }

        let rho = RHO_AIR_KG_M3;
        let dv_goal = dv_from_thrust(thrust_target, radius, u_0, rho)?;
        let loss = TipHubLoss::new(self.params.blade_count, radius, hub_radius)?;

        tracing::info!(
            name = %self.params.name,
            thrust_target,
            dv_goal,
            stations = self.radial_steps,
            "designing blade"
        );

        // Tip to hub, so each station continues from its outboard neighbor.
        let dr = (radius - hub_radius) / (self.radial_steps - 1) as f64;
        let radii: Vec<f64> = (0..self.radial_steps)
            .map(|i| radius - i as f64 * dr)
            .collect();

        // Loss-corrected goal per station. The inflow angle of the fully
        // loaded disk keeps the loss factor off the degenerate phi = 0 axis.
        let mut goals = Vec::with_capacity(radii.len());
        for &r in &radii {
            let phi = (u_0 + dv_goal).atan2(omega * r);
            goals.push(dv_goal * loss.factor(r, phi)?);
        }

        // Loss-corrected goals under-deliver: the momentum thrust of an
        // annulus scales with the square of its loss factor. Scale the goals
        // so the annulus momentum sum reproduces the target,
        //   sum rho 2 pi r dr (u_0 + gain g / 2) gain g = thrust_target,
        // a quadratic in the gain.
        let (mut quad, mut lin) = (0.0, 0.0);
        for (&r, &g) in radii.iter().zip(&goals) {
            let annulus = rho * 2.0 * PI * r * dr;
            quad += annulus * g * g / 2.0;
            lin += annulus * u_0 * g;
        }
        if !(quad > 0.0) {
            return Err(BladeError::InvalidConfiguration {
                what: "station goals vanished under the loss correction",
            });
        }
        let gain = ensure_finite(
            (-lin + (lin * lin + 4.0 * quad * thrust_target).sqrt()) / (2.0 * quad),
            "station goal gain",
        )?;
        for g in &mut goals {
            *g *= gain;
        }
        tracing::debug!(gain, "station goals renormalized to the thrust target");

        let mut stations: Vec<RadialStation> = Vec::with_capacity(self.radial_steps);
        let mut flagged: Vec<f64> = Vec::new();
        let mut prev_twist = 0.0;
        let mut raw_thrust = 0.0;
        let mut raw_torque = 0.0;

        for (&r, &goal) in radii.iter().zip(&goals) {
            let depth_limit = self.constraints.max_depth(r)?;
            let chord_limit = self.constraints.max_chord(r, prev_twist)?;
            let thickness = self.constraints.foil_thickness(r)?;
            let ratio =
                (thickness / chord_limit).clamp(THICKNESS_RATIO_MIN, THICKNESS_RATIO_MAX);
            let mut foil =
                self.family
                    .build(chord_limit, ratio, self.params.trailing_edge.value)?;

            // Largest chord whose rotated section fits the depth envelope.
            let fit_chord = foil.max_chord(chord_limit, depth_limit, prev_twist);
            let max_chord = fit_chord.min(chord_limit);

            if max_chord <= 2.0 * CHORD_FLOOR {
                tracing::warn!(r, max_chord, "no buildable chord inside the envelope");
                foil.set_chord(CHORD_FLOOR);
                foil.set_twist(prev_twist);
                let mut station = RadialStation::new(r, dr, goal, foil);
                station.induction = InductionState::reset(goal);
                flagged.push(r);
                stations.push(station);
                let trace = StationTrace {
                    r,
                    twist: prev_twist,
                    chord: CHORD_FLOOR,
                    dv_goal: goal,
                    dv: goal,
                    a_prime: 0.0,
                    thrust: 0.0,
                    torque: 0.0,
                    efficiency: 0.0,
                    objective: f64::INFINITY,
                    converged: false,
                };
                if let Some(callback) = observer.as_mut() {
                    callback(&trace);
                }
                continue;
            }

            let bounds = StationBounds {
                min_chord: (0.05 * max_chord).max(CHORD_FLOOR),
                max_chord,
            };
            let kin = prop_solve::StationKinematics {
                r,
                dr,
                u_0,
                omega,
                blade_count: self.params.blade_count,
                rho,
            };

            // Bound separately so the aero borrow of the foil ends before
            // the match arms mutate it.
            let result = optimize_station(
                &kin,
                StationGoal { dv_goal: goal },
                prev_twist,
                bounds,
                &|alpha| foil.query_aero(alpha),
                &self.station_config,
            );
            let solution = match result {
                Ok(solution) => solution,
                Err(error) => {
                    tracing::warn!(r, %error, "station solve failed");
                    foil.set_chord(bounds.min_chord);
                    foil.set_twist(prev_twist);
                    let mut station = RadialStation::new(r, dr, goal, foil);
                    station.induction = InductionState::reset(goal);
                    flagged.push(r);
                    stations.push(station);
                    let trace = StationTrace {
                        r,
                        twist: prev_twist,
                        chord: bounds.min_chord,
                        dv_goal: goal,
                        dv: goal,
                        a_prime: 0.0,
                        thrust: 0.0,
                        torque: 0.0,
                        efficiency: 0.0,
                        objective: f64::INFINITY,
                        converged: false,
                    };
                    if let Some(callback) = observer.as_mut() {
                        callback(&trace);
                    }
                    continue;
                }
            };

            // Annulus loads at the searched state. Past the hard threshold
            // the state was reset to the goal and carries no usable loads.
            let (dt, dq) = if solution.objective <= self.station_config.hard_error {
                prop_solve::element_loads(
                    &kin,
                    solution.twist,
                    solution.chord,
                    solution.dv,
                    solution.a_prime,
                    &|alpha| foil.query_aero(alpha),
                )?
            } else {
                (0.0, 0.0)
            };
            raw_thrust += dt;
            raw_torque += dq;

            foil.set_twist(solution.twist);
            foil.set_chord(solution.chord);
            let mut station = RadialStation::new(r, dr, goal, foil);
            station.induction = InductionState {
                dv: solution.dv,
                a_prime: solution.a_prime,
                residual: solution.objective,
                converged: solution.converged,
            };
            if !solution.converged {
                flagged.push(r);
            }

            let trace = StationTrace {
                r,
                twist: solution.twist,
                chord: solution.chord,
                dv_goal: goal,
                dv: solution.dv,
                a_prime: solution.a_prime,
                thrust: dt,
                torque: dq,
                efficiency: if dq > 0.0 { dt / dq } else { 0.0 },
                objective: solution.objective,
                converged: solution.converged,
            };
            tracing::debug!(
                r,
                twist = trace.twist,
                chord = trace.chord,
                dv = trace.dv,
                thrust = trace.thrust,
                objective = trace.objective,
                converged = trace.converged,
                "station sized"
            );
            if let Some(callback) = observer.as_mut() {
                callback(&trace);
            }

            prev_twist = solution.twist;
            stations.push(station);
        }

        // Canonical order is hub to tip, ascending radius.
        stations.reverse();
        flagged.reverse();

        let radii: Vec<f64> = stations.iter().map(|s| s.r()).collect();
        let twists: Vec<f64> = stations.iter().map(|s| s.twist()).collect();
        let chords: Vec<f64> = stations.iter().map(|s| s.chord()).collect();
        let profile = SpanwiseProfile::fit(
            &radii,
            &twists,
            &chords,
            hub_radius,
            self.params.hub_depth.value,
        )?;

        // Overwrite stations with the smoothed curves, re-checking the chord
        // envelope at the smoothed twist.
        for station in &mut stations {
            let twist = profile
                .twist_at(station.r())
                .clamp(SMOOTH_TWIST_MIN, SMOOTH_TWIST_MAX);
            let limit = self.constraints.max_chord(station.r(), twist)?;
            let chord = profile.chord_at(station.r()).min(limit).max(CHORD_FLOOR);
            station.set_twist(twist);
            station.set_chord(chord);
        }

        let mut blade = Blade {
            params: self.params.clone(),
            constraints: self.constraints.clone(),
            stations,
            profile,
            flagged,
            design_rpm: targets.rpm,
            thrust: newton(0.0),
            torque: newton_meter(0.0),
            unsmoothed_thrust: newton(raw_thrust),
            unsmoothed_torque: newton_meter(raw_torque),
        };

        // Totals at the design point, post-smoothing.
        let forces = integrate_forces(&mut blade, targets.rpm, &self.station_config.bem)?;
        blade.thrust = forces.thrust;
        blade.torque = forces.torque;

        tracing::info!(
            name = %blade.params.name,
            thrust = blade.thrust.value,
            unsmoothed_thrust = raw_thrust,
            torque = blade.torque.value,
            flagged = blade.flagged.len(),
            "blade design complete"
        );
        Ok(blade)
    }
}

/// A designed blade: hub-to-tip stations, smoothed spanwise curves and
/// aggregate forces at the design point.
pub struct Blade {
    params: PropellerParameters,
    constraints: GeometryConstraints,
    stations: Vec<RadialStation>,
    profile: SpanwiseProfile,
    flagged: Vec<f64>,
    design_rpm: AngularVelocity,
    thrust: Force,
    torque: Torque,
    unsmoothed_thrust: Force,
    unsmoothed_torque: Torque,
}

impl Blade {
    pub fn params(&self) -> &PropellerParameters {
        &self.params
    }

    /// Geometry envelopes the blade was designed against.
    pub fn constraints(&self) -> &GeometryConstraints {
        &self.constraints
    }

    /// Stations in ascending radius order, hub first.
    pub fn stations(&self) -> &[RadialStation] {
        &self.stations
    }

    pub fn stations_mut(&mut self) -> &mut [RadialStation] {
        &mut self.stations
    }

    pub fn profile(&self) -> &SpanwiseProfile {
        &self.profile
    }

    /// Radii of stations that missed their induction goal or envelope.
    pub fn flagged(&self) -> &[f64] {
        &self.flagged
    }

    pub fn design_rpm(&self) -> AngularVelocity {
        self.design_rpm
    }

    /// Total thrust of all blades at the design point.
    pub fn thrust(&self) -> Force {
        self.thrust
    }

    /// Total shaft torque of all blades at the design point.
    pub fn torque(&self) -> Torque {
        self.torque
    }

    /// Sum of the annulus thrusts as the stations were sized, before the
    /// spanwise smoothing pass. Matches the sum of the emitted traces.
    pub fn unsmoothed_thrust(&self) -> Force {
        self.unsmoothed_thrust
    }

    /// Sum of the annulus torques as the stations were sized.
    pub fn unsmoothed_torque(&self) -> Torque {
        self.unsmoothed_torque
    }
}
