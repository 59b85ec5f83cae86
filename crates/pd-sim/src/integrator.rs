//! Time integrators.
//!
//! Every integrator advances a [`TransientModel`] across a whole physical
//! interval `dt`, taking as many internal substeps as it needs. The substep
//! policy never changes what `dt` means.

use pd_core::Tolerances;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Solver work done for one call to [`Integrator::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Accepted internal substeps
    pub accepted: usize,
    /// Rejected internal substeps (adaptive only)
    pub rejected: usize,
    /// Right-hand side evaluations
    pub rhs_evals: usize,
}

impl StepStats {
    pub fn merge(&mut self, other: StepStats) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.rhs_evals += other.rhs_evals;
    }
}

/// State at the end of the interval plus the work it took.
#[derive(Clone, Debug)]
pub struct StepOutcome<S> {
    pub state: S,
    pub stats: StepStats,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Advance `x` from `t` to `t + dt` using the transient model.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<StepOutcome<M::State>>;
}

/// `x + h * Σ a_i k_i`, skipping zero coefficients.
fn combine<M: TransientModel>(
    model: &M,
    x: &M::State,
    h: f64,
    terms: &[(f64, &M::State)],
) -> M::State {
    terms
        .iter()
        .filter(|&&(a, _)| a != 0.0)
        .fold(x.clone(), |acc, &(a, k)| model.add(&acc, &model.scale(k, a * h)))
}

/// Classical RK4 (Runge-Kutta 4th order) with a bounded substep.
///
/// The interval is split into `ceil(dt / max_substep)` equal substeps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RK4 {
    /// Largest internal substep (s)
    pub max_substep: f64,
}

impl RK4 {
    /// Hard cap on substeps per call.
    pub const MAX_SUBSTEPS: usize = 10_000_000;

    fn single<M: TransientModel>(model: &M, t: f64, x: &M::State, h: f64) -> SimResult<M::State> {
        let k1 = model.rhs(t, x)?;

        let x2 = model.add(x, &model.scale(&k1, 0.5 * h));
        let k2 = model.rhs(t + 0.5 * h, &x2)?;

        let x3 = model.add(x, &model.scale(&k2, 0.5 * h));
        let k3 = model.rhs(t + 0.5 * h, &x3)?;

        let x4 = model.add(x, &model.scale(&k3, h));
        let k4 = model.rhs(t + h, &x4)?;

        // Combine: x_new = x + (h/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = model.add(
            &model.add(&k1, &model.scale(&k2, 2.0)),
            &model.add(&model.scale(&k3, 2.0), &k4),
        );

        Ok(model.add(x, &model.scale(&k_sum, h / 6.0)))
    }

    fn validate(&self) -> SimResult<()> {
        if !(self.max_substep.is_finite() && self.max_substep > 0.0) {
            return Err(SimError::InvalidConfig {
                what: format!("RK4 max_substep must be positive, got {}", self.max_substep),
            });
        }
        Ok(())
    }
}

impl Default for RK4 {
    fn default() -> Self {
        Self { max_substep: 1e-3 }
    }
}

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<StepOutcome<M::State>> {
        let substeps = (dt / self.max_substep).ceil().max(1.0);
        if !substeps.is_finite() || substeps > Self::MAX_SUBSTEPS as f64 {
            return Err(SimError::ConvergenceFailed {
                what: "RK4 substep budget exceeded",
                t,
            });
        }
        let n = substeps as usize;
        let h = dt / n as f64;

        let mut state = x.clone();
        for i in 0..n {
            let t_i = t + i as f64 * h;
            state = Self::single(model, t_i, &state, h)?;
            if !model.is_finite(&state) {
                return Err(SimError::NonPhysical {
                    what: "non-finite state during RK4 substep",
                    t: t_i,
                });
            }
        }

        Ok(StepOutcome {
            state,
            stats: StepStats {
                accepted: n,
                rejected: 0,
                rhs_evals: 4 * n,
            },
        })
    }
}

/// Adaptive Dormand-Prince 5(4) integrator.
///
/// Propagates the 5th-order solution and uses the embedded 4th-order one
/// for the local error estimate. The first trial substep is the whole
/// interval; rejected substeps shrink by the usual `0.9·err^(-1/5)` rule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DormandPrince {
    /// Local error target per substep
    pub tolerances: Tolerances,
    /// Maximum attempted substeps (accepted + rejected) per call
    pub max_steps: usize,
    /// Smallest substep before giving up (s)
    pub min_step: f64,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            tolerances: Tolerances {
                abs: 1e-10,
                rel: 1e-9,
            },
            max_steps: 100_000,
            min_step: 1e-12,
        }
    }
}

// Butcher tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus embedded 4th-order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

struct Attempt<S> {
    state: S,
    /// Weighted error norm, infinite when the trial cannot be accepted
    error: f64,
    /// The trial state or error estimate contained NaN or infinity
    non_finite: bool,
}

impl DormandPrince {
    fn attempt<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        h: f64,
    ) -> SimResult<Attempt<M::State>> {
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + C2 * h, &combine(model, x, h, &[(A21, &k1)]))?;
        let k3 = model.rhs(t + C3 * h, &combine(model, x, h, &[(A31, &k1), (A32, &k2)]))?;
        let k4 = model.rhs(
            t + C4 * h,
            &combine(model, x, h, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
        )?;
        let k5 = model.rhs(
            t + C5 * h,
            &combine(model, x, h, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
        )?;
        let k6 = model.rhs(
            t + h,
            &combine(
                model,
                x,
                h,
                &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
            ),
        )?;

        let state = combine(
            model,
            x,
            h,
            &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
        );
        let k7 = model.rhs(t + h, &state)?;

        // Error estimate relative to a zero base: h * Σ e_i k_i
        let zero = model.scale(x, 0.0);
        let err = combine(
            model,
            &zero,
            h,
            &[(E1, &k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
        );

        let non_finite = !(model.is_finite(&state) && model.is_finite(&err));
        let error = if non_finite {
            f64::INFINITY
        } else {
            let norm = model.error_norm(&err, x, &state, self.tolerances);
            if norm.is_nan() { f64::INFINITY } else { norm }
        };

        Ok(Attempt {
            state,
            error,
            non_finite,
        })
    }

    fn validate(&self) -> SimResult<()> {
        let tol = self.tolerances;
        let tol_ok = tol.abs.is_finite()
            && tol.rel.is_finite()
            && tol.abs >= 0.0
            && tol.rel >= 0.0
            && (tol.abs > 0.0 || tol.rel > 0.0);
        if !tol_ok {
            return Err(SimError::InvalidConfig {
                what: format!(
                    "Dormand-Prince tolerances must be non-negative and not both zero, got abs={} rel={}",
                    tol.abs, tol.rel
                ),
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidConfig {
                what: "Dormand-Prince max_steps must be positive".to_string(),
            });
        }
        if !(self.min_step.is_finite() && self.min_step > 0.0) {
            return Err(SimError::InvalidConfig {
                what: format!("Dormand-Prince min_step must be positive, got {}", self.min_step),
            });
        }
        Ok(())
    }
}

impl Integrator for DormandPrince {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<StepOutcome<M::State>> {
        // Local time runs 0..dt; the absolute clock only feeds `rhs`.
        let mut t_local = 0.0;
        let mut state = x.clone();
        let mut h = dt;
        let mut stats = StepStats::default();
        let mut rejected_non_finite = false;

        loop {
            let remaining = dt - t_local;
            if remaining <= 0.0 {
                break;
            }
            let last = h >= remaining;
            if last {
                h = remaining;
            } else if h < self.min_step {
                return Err(if rejected_non_finite {
                    SimError::NonPhysical {
                        what: "non-finite state during adaptive step",
                        t: t + t_local,
                    }
                } else {
                    SimError::ConvergenceFailed {
                        what: "adaptive step size fell below minimum",
                        t: t + t_local,
                    }
                });
            }

            if stats.accepted + stats.rejected >= self.max_steps {
                return Err(SimError::ConvergenceFailed {
                    what: "adaptive step budget exhausted",
                    t: t + t_local,
                });
            }

            let trial = self.attempt(model, t + t_local, &state, h)?;
            stats.rhs_evals += 7;

            let factor = if trial.error == 0.0 {
                MAX_FACTOR
            } else {
                (SAFETY * trial.error.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
            };

            if trial.error <= 1.0 {
                stats.accepted += 1;
                rejected_non_finite = false;
                state = trial.state;
                if last {
                    break;
                }
                t_local += h;
                h *= factor;
            } else {
                stats.rejected += 1;
                rejected_non_finite = trial.non_finite;
                h *= factor.min(1.0);
            }
        }

        Ok(StepOutcome { state, stats })
    }
}

/// Integrator selection, serializable for configuration files.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum IntegratorType {
    /// Adaptive 5(4) pair (default, error-controlled).
    DormandPrince(DormandPrince),
    /// Fixed-substep classical RK4.
    RK4(RK4),
}

impl Default for IntegratorType {
    fn default() -> Self {
        IntegratorType::DormandPrince(DormandPrince::default())
    }
}

impl IntegratorType {
    /// Check solver settings before any stepping.
    pub fn validate(&self) -> SimResult<()> {
        match self {
            IntegratorType::DormandPrince(dp) => dp.validate(),
            IntegratorType::RK4(rk4) => rk4.validate(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IntegratorType::DormandPrince(_) => "DormandPrince",
            IntegratorType::RK4(_) => "RK4",
        }
    }
}

impl Integrator for IntegratorType {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &M::State,
        dt: f64,
    ) -> SimResult<StepOutcome<M::State>> {
        match self {
            IntegratorType::DormandPrince(dp) => dp.step(model, t, x, dt),
            IntegratorType::RK4(rk4) => rk4.step(model, t, x, dt),
        }
    }
}
