// pd-core/src/units.rs

use uom::si::f64::{
    Acceleration as UomAcceleration, Angle as UomAngle, AngularVelocity as UomAngularVelocity,
    Length as UomLength, Mass as UomMass, Time as UomTime,
};

// Public canonical unit types (SI, f64)
pub type Accel = UomAcceleration;
pub type Angle = UomAngle;
pub type AngularVelocity = UomAngularVelocity;
pub type Length = UomLength;
pub type Mass = UomMass;
pub type Time = UomTime;

#[inline]
pub fn kg(v: f64) -> Mass {
    use uom::si::mass::kilogram;
    Mass::new::<kilogram>(v)
}

#[inline]
pub fn m(v: f64) -> Length {
    use uom::si::length::meter;
    Length::new::<meter>(v)
}

#[inline]
pub fn mps2(v: f64) -> Accel {
    use uom::si::acceleration::meter_per_second_squared;
    Accel::new::<meter_per_second_squared>(v)
}

#[inline]
pub fn s(v: f64) -> Time {
    use uom::si::time::second;
    Time::new::<second>(v)
}

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

#[inline]
pub fn rad_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::radian_per_second;
    AngularVelocity::new::<radian_per_second>(v)
}

#[inline]
pub fn deg_per_s(v: f64) -> AngularVelocity {
    use uom::si::angular_velocity::degree_per_second;
    AngularVelocity::new::<degree_per_second>(v)
}

/// Degrees to radians, routed through `uom` so both directions share one factor.
#[inline]
pub fn deg_to_rad(v: f64) -> f64 {
    use uom::si::angle::radian;
    deg(v).get::<radian>()
}

#[inline]
pub fn rad_to_deg(v: f64) -> f64 {
    use uom::si::angle::degree;
    rad(v).get::<degree>()
}

pub mod constants {
    use super::*;

    /// Standard gravity.
    pub const G0_MPS2: f64 = 9.806_65;

    /// Rounded surface gravity used by most pendulum demos.
    pub const G_EARTH_MPS2: f64 = 9.81;

    #[inline]
    pub fn g0() -> Accel {
        mps2(G0_MPS2)
    }
}
