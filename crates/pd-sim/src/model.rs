//! TransientModel trait for pluggable dynamic systems.

use pd_core::Tolerances;

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - RHS (right-hand side) computation: x_dot = f(t, x)
/// - Vector arithmetic for integration: add states, scale by scalar
/// - An error norm and a finiteness check for step control
///
/// `rhs` must be a pure function of `(t, x)`: integrators evaluate it at
/// intermediate stages that are never committed.
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Weighted RMS norm of a local error estimate.
    ///
    /// Each component of `err` is divided by `tol.scale(x0_i, x1_i)`; a
    /// result <= 1 means the step meets the tolerance.
    fn error_norm(
        &self,
        err: &Self::State,
        x0: &Self::State,
        x1: &Self::State,
        tol: Tolerances,
    ) -> f64;

    /// True when every component is finite.
    fn is_finite(&self, x: &Self::State) -> bool;
}
