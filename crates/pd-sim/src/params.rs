//! Physical parameters of the pendulum.

use pd_core::units::{Accel, Length, Mass, constants::G_EARTH_MPS2};
use pd_core::{ensure_non_negative, ensure_positive};

use crate::error::SimResult;

/// Immutable physical description of a rigid-rod pendulum.
///
/// Fields are private so that every instance has passed validation:
/// mass and length strictly positive, gravity and both drag coefficients
/// finite and non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalParameters {
    mass: f64,
    length: f64,
    gravity: f64,
    linear_drag: f64,
    quadratic_drag: f64,
}

impl PhysicalParameters {
    /// Create validated parameters from raw SI values.
    ///
    /// # Arguments
    /// * `mass` - Pendulum mass (kg), must be positive
    /// * `length` - Rod length (m), must be positive
    /// * `gravity` - Gravitational acceleration (m/s²), must be >= 0
    /// * `linear_drag` - Viscous drag coefficient c1 (1/s), must be >= 0
    /// * `quadratic_drag` - Form drag coefficient c2 (1/rad), must be >= 0
    ///
    /// # Errors
    /// Returns `SimError::InvalidConfig` if any value is non-physical.
    pub fn new(
        mass: f64,
        length: f64,
        gravity: f64,
        linear_drag: f64,
        quadratic_drag: f64,
    ) -> SimResult<Self> {
        Ok(Self {
            mass: ensure_positive(mass, "mass")?,
            length: ensure_positive(length, "length")?,
            gravity: ensure_non_negative(gravity, "gravity")?,
            linear_drag: ensure_non_negative(linear_drag, "linear_drag")?,
            quadratic_drag: ensure_non_negative(quadratic_drag, "quadratic_drag")?,
        })
    }

    /// Create validated parameters from unit-carrying quantities.
    pub fn from_quantities(
        mass: Mass,
        length: Length,
        gravity: Accel,
        linear_drag: f64,
        quadratic_drag: f64,
    ) -> SimResult<Self> {
        use uom::si::{
            acceleration::meter_per_second_squared, length::meter, mass::kilogram,
        };
        Self::new(
            mass.get::<kilogram>(),
            length.get::<meter>(),
            gravity.get::<meter_per_second_squared>(),
            linear_drag,
            quadratic_drag,
        )
    }

    /// Same pendulum without any drag.
    pub fn without_drag(&self) -> Self {
        Self {
            linear_drag: 0.0,
            quadratic_drag: 0.0,
            ..*self
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn linear_drag(&self) -> f64 {
        self.linear_drag
    }

    pub fn quadratic_drag(&self) -> f64 {
        self.quadratic_drag
    }

    /// True when either drag coefficient is non-zero.
    pub fn is_damped(&self) -> bool {
        self.linear_drag > 0.0 || self.quadratic_drag > 0.0
    }
}

impl Default for PhysicalParameters {
    /// 1 kg, 1 m rod under 9.81 m/s² with c1 = c2 = 0.1.
    fn default() -> Self {
        Self {
            mass: 1.0,
            length: 1.0,
            gravity: G_EARTH_MPS2,
            linear_drag: 0.1,
            quadratic_drag: 0.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimError;
    use pd_core::units::{kg, m, mps2};

    #[test]
    fn accepts_physical_values() {
        let p = PhysicalParameters::new(1.0, 2.0, 9.81, 0.0, 0.3).unwrap();
        assert_eq!(p.length(), 2.0);
        assert_eq!(p.quadratic_drag(), 0.3);
        assert!(p.is_damped());
        assert!(!p.without_drag().is_damped());
    }

    #[test]
    fn rejects_non_positive_mass_and_length() {
        for (mass, length) in [(-1.0, 1.0), (0.0, 1.0), (1.0, 0.0), (1.0, -0.5)] {
            let err = PhysicalParameters::new(mass, length, 9.81, 0.1, 0.1).unwrap_err();
            assert!(matches!(err, SimError::InvalidConfig { .. }), "{err}");
        }
    }

    #[test]
    fn rejects_negative_drag_and_nan() {
        assert!(PhysicalParameters::new(1.0, 1.0, 9.81, -0.1, 0.0).is_err());
        assert!(PhysicalParameters::new(1.0, 1.0, 9.81, 0.0, -0.1).is_err());
        assert!(PhysicalParameters::new(1.0, 1.0, f64::NAN, 0.0, 0.0).is_err());
        assert!(PhysicalParameters::new(f64::INFINITY, 1.0, 9.81, 0.0, 0.0).is_err());
    }

    #[test]
    fn quantities_match_raw_values() {
        let from_units =
            PhysicalParameters::from_quantities(kg(2.0), m(0.5), mps2(9.8), 0.1, 0.2).unwrap();
        let raw = PhysicalParameters::new(2.0, 0.5, 9.8, 0.1, 0.2).unwrap();
        assert_eq!(from_units, raw);
    }
}
