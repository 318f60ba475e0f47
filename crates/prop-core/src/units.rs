// prop-core/src/units.rs

use uom::si::f64::{
    Angle as UomAngle, AngularVelocity as UomAngularVelocity, Force as UomForce,
    Length as UomLength, MassDensity as UomMassDensity, Power as UomPower, Ratio as UomRatio,
    Torque as UomTorque, Velocity as UomVelocity,
};

// Public canonical unit types (SI, f64)
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type Force = UomForce;
pub type Length = UomLength;
pub type Density = UomMassDensity;
pub type Power = UomPower;
pub type Ratio = UomRatio;
pub type Torque = UomTorque;
pub type Velocity = UomVelocity;

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mm(v: f64) -> Length {
    use uom::si::length::millimeter;
    Length::new::<millimeter>(v)
}

#[inline]
pub fn mps(v: f64) -> Velocity {
    use uom::si::velocity::meter_per_second;
    Velocity::new::<meter_per_second>(v)
}

#[inline]
pub fn newton(v: f64) -> Force {
    use uom::si::force::newton;
    Force::new::<newton>(v)
}

#[inline]
pub fn newton_meter(v: f64) -> Torque {
    use uom::si::torque::newton_meter;
    Torque::new::<newton_meter>(v)
}

#[inline]
pub fn rpm(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::revolution_per_minute;
    AngularVelocity::new::<revolution_per_minute>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn unitless(v: f64) -> Ratio {
    use uom::si::ratio::ratio;
    Ratio::new::<ratio>(v)
}

pub mod constants {
    use super::*;

    /// Sea-level air density, kg/m^3.
    pub const RHO_AIR_KG_M3: f64 = 1.225;

    #[inline]
    pub fn rho_air() -> Density {
        use uom::si::mass_density::kilogram_per_cubic_meter;
        Density::new::<kilogram_per_cubic_meter>(RHO_AIR_KG_M3)
    }
}

/// Convert a rotational speed in rev/min to rad/s.
#[inline]
pub fn rpm_to_rad_s(v: f64) -> f64 {
    v / 60.0 * 2.0 * std::f64::consts::PI
}
