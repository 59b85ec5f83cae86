//! Rigid-rod pendulum with linear and quadratic drag.

use pd_core::Tolerances;

use crate::error::SimResult;
use crate::model::TransientModel;
use crate::params::PhysicalParameters;
use crate::state::PendulumState;

/// Equation of motion of a uniform rod pivoting about one end:
///
/// ```text
/// dθ/dt = ω
/// dω/dt = -(3/2)·g·sin(θ)/l - c1·ω - c2·ω·|ω|
/// ```
///
/// The 3/2 factor comes from the rod's moment of inertia about the pivot
/// (m·l²/3) and its centre of mass at l/2. The quadratic term uses `ω·|ω|`
/// so the drag always opposes the direction of motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumModel {
    params: PhysicalParameters,
}

impl PendulumModel {
    pub fn new(params: PhysicalParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PhysicalParameters {
        &self.params
    }

    /// Time derivative of the state. `t` is unused: the system is autonomous.
    pub fn derivative(&self, state: &PendulumState, _t: f64) -> PendulumState {
        PendulumState {
            theta: state.omega,
            omega: self.gravity_term(state.theta) + self.drag_torque_per_inertia(state.omega),
        }
    }

    /// Restoring angular acceleration `-(3/2)·g·sin(θ)/l` (rad/s²).
    pub fn gravity_term(&self, theta: f64) -> f64 {
        -1.5 * self.params.gravity() * theta.sin() / self.params.length()
    }

    /// Drag angular acceleration `-c1·ω - c2·ω·|ω|` (rad/s²), opposite in sign to ω.
    pub fn drag_torque_per_inertia(&self, omega: f64) -> f64 {
        -self.params.linear_drag() * omega - self.params.quadratic_drag() * omega * omega.abs()
    }

    /// Moment of inertia about the pivot, m·l²/3 (kg·m²).
    pub fn moment_of_inertia(&self) -> f64 {
        self.params.mass() * self.params.length().powi(2) / 3.0
    }

    /// Mechanical energy (J), zero at rest hanging straight down.
    ///
    /// ```text
    /// E = ½·(m·l²/3)·ω² + m·g·(l/2)·(1 - cos θ)
    /// ```
    ///
    /// Conserved by the undamped dynamics; non-increasing under drag.
    pub fn mechanical_energy(&self, state: &PendulumState) -> f64 {
        let p = &self.params;
        let kinetic = 0.5 * self.moment_of_inertia() * state.omega * state.omega;
        let potential = p.mass() * p.gravity() * 0.5 * p.length() * (1.0 - state.theta.cos());
        kinetic + potential
    }

    /// Linearised angular frequency `sqrt(1.5·g/l)` (rad/s).
    pub fn small_angle_frequency(&self) -> f64 {
        (1.5 * self.params.gravity() / self.params.length()).sqrt()
    }

    /// Linearised period (s). Infinite when gravity is zero.
    pub fn small_angle_period(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.small_angle_frequency()
    }
}

impl TransientModel for PendulumModel {
    type State = PendulumState;

    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State> {
        Ok(self.derivative(x, t))
    }

    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State {
        PendulumState::new(a.theta + b.theta, a.omega + b.omega)
    }

    fn scale(&self, a: &Self::State, scale: f64) -> Self::State {
        PendulumState::new(a.theta * scale, a.omega * scale)
    }

    fn error_norm(
        &self,
        err: &Self::State,
        x0: &Self::State,
        x1: &Self::State,
        tol: Tolerances,
    ) -> f64 {
        let e_theta = weighted(err.theta, tol.scale(x0.theta, x1.theta));
        let e_omega = weighted(err.omega, tol.scale(x0.omega, x1.omega));
        (0.5 * (e_theta * e_theta + e_omega * e_omega)).sqrt()
    }

    fn is_finite(&self, x: &Self::State) -> bool {
        x.is_finite()
    }
}

/// `err / scale`, with an exact zero error counting as zero even when a
/// purely relative tolerance gives a zero scale.
fn weighted(err: f64, scale: f64) -> f64 {
    if err == 0.0 { 0.0 } else { err / scale }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(c1: f64, c2: f64) -> PendulumModel {
        PendulumModel::new(PhysicalParameters::new(1.0, 1.0, 9.81, c1, c2).unwrap())
    }

    #[test]
    fn derivative_matches_equation_of_motion() {
        let m = model(0.1, 0.2);
        let s = PendulumState::new(0.5, -2.0);
        let d = m.derivative(&s, 0.0);

        let expected = -1.5 * 9.81 * 0.5_f64.sin() - 0.1 * -2.0 - 0.2 * -2.0 * 2.0;
        assert_eq!(d.theta, -2.0);
        assert!((d.omega - expected).abs() < 1e-12);
    }

    #[test]
    fn derivative_ignores_time() {
        let m = model(0.1, 0.1);
        let s = PendulumState::new(1.0, 0.7);
        assert_eq!(m.derivative(&s, 0.0), m.derivative(&s, 123.4));
    }

    #[test]
    fn rest_at_bottom_is_equilibrium() {
        let d = model(0.1, 0.1).derivative(&PendulumState::default(), 0.0);
        assert_eq!(d, PendulumState::default());
    }

    #[test]
    fn quadratic_drag_opposes_motion_in_both_directions() {
        let m = model(0.0, 0.5);
        // omega² would give the same sign for both directions
        assert!(m.drag_torque_per_inertia(3.0) < 0.0);
        assert!(m.drag_torque_per_inertia(-3.0) > 0.0);
        assert_eq!(
            m.drag_torque_per_inertia(3.0),
            -m.drag_torque_per_inertia(-3.0)
        );
        assert!((m.drag_torque_per_inertia(-3.0) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn energy_zero_at_rest_and_positive_when_displaced() {
        let m = model(0.0, 0.0);
        assert_eq!(m.mechanical_energy(&PendulumState::default()), 0.0);
        // θ = π/2: m·g·l/2
        let e = m.mechanical_energy(&PendulumState::new(std::f64::consts::FRAC_PI_2, 0.0));
        assert!((e - 0.5 * 9.81).abs() < 1e-12);
    }

    #[test]
    fn small_angle_frequency_uses_rod_factor() {
        let m = model(0.0, 0.0);
        assert!((m.small_angle_frequency() - (1.5_f64 * 9.81).sqrt()).abs() < 1e-12);
        assert!((m.small_angle_period() * m.small_angle_frequency() - 2.0 * std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn error_norm_zero_error_over_zero_scale() {
        let m = model(0.1, 0.1);
        let tol = Tolerances { abs: 0.0, rel: 1e-9 };
        let rest = PendulumState::default();
        let norm = m.error_norm(&PendulumState::default(), &rest, &rest, tol);
        assert_eq!(norm, 0.0);

        let moving = PendulumState::new(0.0, 2.0);
        let norm = m.error_norm(&PendulumState::new(0.0, 2e-9), &moving, &moving, tol);
        assert!((norm - 0.5_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn error_norm_is_unity_at_tolerance() {
        let m = model(0.0, 0.0);
        let tol = Tolerances { abs: 1e-6, rel: 0.0 };
        let zero = PendulumState::default();
        let err = PendulumState::new(1e-6, 1e-6);
        assert!((m.error_norm(&err, &zero, &zero, tol) - 1.0).abs() < 1e-12);
    }
}
